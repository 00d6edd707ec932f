//! Standard handlers every element exposes.
//!
//! The Router installs these after the configure phases succeed:
//! `class`, `name`, `config` (writable when live reconfiguration is
//! allowed), `ports`, `handlers`, and the statistics handlers `icounts`,
//! `ocounts`, and `cycles`. Task-owning elements additionally register
//! the task handlers from [`add_task_handlers`].

use crate::config;
use crate::element::{Element, ElementContext};
use crate::error::{Error, Result};
use crate::handler::{ReadContext, Registrar, WriteContext};
use crate::report::ErrorHandler;
use crate::task::{Task, MAX_TICKETS};
use std::fmt::Write as _;
use std::sync::Arc;

/// Install the standard handlers for an element.
///
/// The `config` write handler is registered only when `allow_write_config`
/// is set and the element reports
/// [`can_live_reconfigure`](Element::can_live_reconfigure).
pub fn add_default_handlers(
    reg: &mut Registrar<'_>,
    element: &dyn Element,
    allow_write_config: bool,
) {
    reg.add_read_handler(
        "class",
        Arc::new(|cx: ReadContext<'_>| format!("{}\n", cx.node.class_name())),
    );
    reg.add_read_handler(
        "name",
        Arc::new(|cx: ReadContext<'_>| {
            let name = cx
                .node
                .eindex()
                .and_then(|eindex| cx.router.name(eindex))
                .unwrap_or_else(|| "<unknown>".to_string());
            format!("{name}\n")
        }),
    );
    reg.add_read_handler("config", Arc::new(read_config));
    if allow_write_config && element.can_live_reconfigure() {
        reg.add_write_handler("config", Arc::new(write_config));
    }
    reg.add_read_handler(
        "ports",
        Arc::new(|cx: ReadContext<'_>| {
            cx.node
                .eindex()
                .map(|eindex| cx.router.element_ports_string(eindex))
                .unwrap_or_default()
        }),
    );
    reg.add_read_handler("handlers", Arc::new(read_handlers));
    reg.add_read_handler(
        "icounts",
        Arc::new(|cx: ReadContext<'_>| {
            let mut out = String::new();
            for port in cx.node.ports().inputs() {
                let _ = writeln!(out, "{}", port.npackets());
            }
            out
        }),
    );
    reg.add_read_handler(
        "ocounts",
        Arc::new(|cx: ReadContext<'_>| {
            let mut out = String::new();
            for port in cx.node.ports().outputs() {
                let _ = writeln!(out, "{}", port.npackets());
            }
            out
        }),
    );
    reg.add_read_handler(
        "cycles",
        Arc::new(|cx: ReadContext<'_>| {
            let stats = cx.node.stats();
            format!(
                "{}\n{}\n{}\n",
                stats.calls, stats.self_cycles, stats.child_cycles
            )
        }),
    );
}

/// The `config` read handler: the configuration string, newline-terminated
/// unless empty.
fn read_config(cx: ReadContext<'_>) -> String {
    let s = cx.node.configuration_string(cx.router);
    if !s.is_empty() && !s.ends_with('\n') {
        s + "\n"
    } else {
        s
    }
}

/// The `config` write handler: split, live-reconfigure, and on success
/// store the written string as the element's configuration.
fn write_config(data: &str, cx: WriteContext<'_>, errh: &dyn ErrorHandler) -> Result<()> {
    let WriteContext { node, router } = cx;
    let args = config::split_args(data);
    let eindex = node.eindex();
    let element_cx = ElementContext::new(router, eindex);
    let element = node
        .element_mut()
        .ok_or_else(|| Error::Invalid("element was taken".into()))?;
    element.live_reconfigure(&element_cx, &args, errh)?;
    if let Some(eindex) = eindex {
        router.set_default_configuration_string(eindex, data);
    }
    Ok(())
}

/// The `handlers` read handler: one `name\t<r?><w?>` line per visible
/// handler.
fn read_handlers(cx: ReadContext<'_>) -> String {
    let mut out = String::new();
    let Some(eindex) = cx.node.eindex() else {
        return out;
    };
    for handler in cx.table.element_handlers(eindex) {
        if !handler.read_visible() && !handler.write_visible() {
            continue;
        }
        out.push_str(handler.name());
        out.push('\t');
        if handler.read_visible() {
            out.push('r');
        }
        if handler.write_visible() {
            out.push('w');
        }
        out.push('\n');
    }
    out
}

/// Install the standard handlers for a scheduler task.
///
/// Registers `scheduled` (read), `tickets` (read/write, clamped into
/// `[1, MAX_TICKETS]` with a warning on clamp), and `home_thread` (read),
/// each prefixed with `prefix` so an element with several tasks can
/// register all of them.
pub fn add_task_handlers(reg: &mut Registrar<'_>, task: &Arc<Task>, prefix: &str) {
    let t = Arc::clone(task);
    reg.add_read_handler(
        &format!("{prefix}scheduled"),
        Arc::new(move |_cx: ReadContext<'_>| format!("{}\n", t.scheduled())),
    );
    let t = Arc::clone(task);
    reg.add_read_handler(
        &format!("{prefix}tickets"),
        Arc::new(move |_cx: ReadContext<'_>| format!("{}\n", t.tickets())),
    );
    let t = Arc::clone(task);
    reg.add_write_handler(
        &format!("{prefix}tickets"),
        Arc::new(move |data: &str, _cx: WriteContext<'_>, errh: &dyn ErrorHandler| {
            let data = config::uncomment(data);
            let mut tickets: u32 = match data.parse() {
                Ok(n) => n,
                Err(_) => {
                    errh.error(&format!(
                        "'tickets' takes an integer between 1 and {MAX_TICKETS}"
                    ));
                    return Err(Error::Invalid("bad tickets value".into()));
                }
            };
            if tickets < 1 {
                errh.warning("tickets pinned at 1");
                tickets = 1;
            } else if tickets > MAX_TICKETS {
                errh.warning(&format!("tickets pinned at {MAX_TICKETS}"));
                tickets = MAX_TICKETS;
            }
            t.set_tickets(tickets);
            Ok(())
        }),
    );
    let t = Arc::clone(task);
    reg.add_read_handler(
        &format!("{prefix}home_thread"),
        Arc::new(move |_cx: ReadContext<'_>| format!("{}\n", t.home_thread())),
    );
}

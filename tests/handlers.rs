//! Integration tests for the handler registry, the built-in handlers,
//! and the reconfiguration helpers.

mod common;

use common::{role_ref, DefaultConfig, Mirror, Stored, TestRouter};
use crossbar::element::{Element, Node};
use crossbar::handler::reconfigure::{
    read_keyword_handler, read_positional_handler, reconfigure_keyword_handler,
    reconfigure_positional_handler, DYNAMICALLY_RECONFIGURED,
};
use crossbar::handler::{builtin, HandlerHook, HandlerTable, Registrar, OP_WRITE};
use crossbar::report::{BufferedReporter, SilentReporter};
use crossbar::task::{Task, MAX_TICKETS};
use std::sync::Arc;

fn stored_node(router_config: &str) -> (TestRouter, Node, HandlerTable) {
    let router = TestRouter::new(&["shaper"]).with_config(0, router_config);
    let mut node = Node::new(Box::new(Stored::default()));
    node.attach(0);
    let mut table = HandlerTable::new();
    let mut reg = Registrar::new(&mut table, 0);
    let element = node.element().unwrap();
    builtin::add_default_handlers(&mut reg, element, true);
    (router, node, table)
}

#[test]
fn test_class_and_name_handlers() {
    let (router, node, table) = stored_node("");
    assert_eq!(
        table.call_read("class", &node, &router).unwrap(),
        "Stored\n"
    );
    assert_eq!(table.call_read("name", &node, &router).unwrap(), "shaper\n");
}

#[test]
fn test_config_read_is_newline_terminated_or_empty() {
    let (router, mut node, table) = stored_node("");
    // empty configuration reads back empty
    assert_eq!(table.call_read("config", &node, &router).unwrap(), "");

    // a nonempty configuration gains a trailing newline
    if let Some(element) = node.element_mut() {
        let any = element.as_role_mut("Stored").unwrap();
        any.downcast_mut::<Stored>().unwrap().args = vec!["A".into(), "B".into()];
    }
    assert_eq!(
        table.call_read("config", &node, &router).unwrap(),
        "A, B\n"
    );
}

#[test]
fn test_config_write_reconfigures_and_stores() {
    let (router, mut node, table) = stored_node("");
    let errh = SilentReporter::new();

    let result = table
        .call_write("config", "A, B", &mut node, &router, &errh)
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(router.configs.borrow()[0], "A, B");

    let stored: &Stored = role_ref(&node, "Stored");
    assert_eq!(stored.args, vec!["A", "B"]);
    assert_eq!(stored.reconfigured, 1);
}

#[test]
fn test_config_write_absent_without_live_reconfigure() {
    let router = TestRouter::new(&["m"]);
    let mut node = Node::new(Box::new(Mirror));
    node.attach(0);
    let mut table = HandlerTable::new();
    let mut reg = Registrar::new(&mut table, 0);
    builtin::add_default_handlers(&mut reg, node.element().unwrap(), true);

    let errh = SilentReporter::new();
    assert!(table
        .call_write("config", "x", &mut node, &router, &errh)
        .is_none());
    // but the read side is present
    assert!(table.call_read("config", &node, &router).is_some());
}

#[test]
fn test_handlers_listing() {
    let (router, node, table) = stored_node("");
    let listing = table.call_read("handlers", &node, &router).unwrap();

    assert!(listing.contains("class\tr\n"));
    assert!(listing.contains("name\tr\n"));
    // Stored is live-reconfigurable, so config is read/write
    assert!(listing.contains("config\trw\n"));
    assert!(listing.contains("handlers\tr\n"));
    assert!(listing.contains("icounts\tr\n"));
    assert!(listing.contains("ocounts\tr\n"));
    assert!(listing.contains("cycles\tr\n"));
    // each visible handler appears exactly once
    assert_eq!(listing.matches("config\t").count(), 1);
}

#[test]
fn test_handler_override_round_trip() {
    let (router, mut node, mut table) = stored_node("");
    let errh = SilentReporter::new();

    {
        let mut reg = Registrar::new(&mut table, 0);
        reg.add_read_handler("version", Arc::new(|_cx| "1\n".to_string()));
    }
    assert_eq!(table.call_read("version", &node, &router).unwrap(), "1\n");
    let listing = table.call_read("handlers", &node, &router).unwrap();
    assert!(listing.contains("version\tr\n"));

    // a later read registration overrides the read binding
    {
        let mut reg = Registrar::new(&mut table, 0);
        reg.add_read_handler("version", Arc::new(|_cx| "2\n".to_string()));
    }
    assert_eq!(table.call_read("version", &node, &router).unwrap(), "2\n");
    assert_eq!(
        table
            .call_read("handlers", &node, &router)
            .unwrap()
            .matches("version\t")
            .count(),
        1
    );

    // a comprehensive registration replaces both directions
    {
        let mut reg = Registrar::new(&mut table, 0);
        reg.set_handler(
            "version",
            OP_WRITE,
            HandlerHook::Write(Arc::new(|_data, _cx, _errh| Ok(()))),
        );
    }
    assert!(table.call_read("version", &node, &router).is_none());
    assert!(table
        .call_write("version", "3", &mut node, &router, &errh)
        .unwrap()
        .is_ok());
    let listing = table.call_read("handlers", &node, &router).unwrap();
    assert!(listing.contains("version\tw\n"));
}

#[test]
fn test_read_handler_keeps_sibling_write() {
    let (router, mut node, mut table) = stored_node("");
    let errh = SilentReporter::new();

    {
        let mut reg = Registrar::new(&mut table, 0);
        reg.add_write_handler("knob", Arc::new(|_data, _cx, _errh| Ok(())));
        reg.add_read_handler("knob", Arc::new(|_cx| "k\n".to_string()));
    }
    // re-registering the read side leaves the write binding intact
    {
        let mut reg = Registrar::new(&mut table, 0);
        reg.add_read_handler("knob", Arc::new(|_cx| "k2\n".to_string()));
    }
    assert_eq!(table.call_read("knob", &node, &router).unwrap(), "k2\n");
    assert!(table
        .call_write("knob", "x", &mut node, &router, &errh)
        .unwrap()
        .is_ok());
}

#[test]
fn test_read_positional_and_keyword_handlers() {
    let (router, mut node, mut table) = stored_node("");
    {
        let mut reg = Registrar::new(&mut table, 0);
        reg.add_read_handler("rate", read_positional_handler(0));
        reg.add_read_handler("burst", read_keyword_handler("BURST"));
        reg.add_read_handler("missing", read_positional_handler(5));
    }
    if let Some(element) = node.element_mut() {
        element
            .as_role_mut("Stored")
            .unwrap()
            .downcast_mut::<Stored>()
            .unwrap()
            .args = vec!["10".into(), "BURST 5".into(), "BURST 8".into()];
    }

    assert_eq!(table.call_read("rate", &node, &router).unwrap(), "10\n");
    // later keyword occurrences win
    assert_eq!(table.call_read("burst", &node, &router).unwrap(), "8\n");
    assert_eq!(table.call_read("missing", &node, &router).unwrap(), "");
}

#[test]
fn test_reconfigure_positional_handler_rewrites_argument() {
    let (router, mut node, mut table) = stored_node("");
    {
        let mut reg = Registrar::new(&mut table, 0);
        reg.add_write_handler("second", reconfigure_positional_handler(1));
    }
    if let Some(element) = node.element_mut() {
        element
            .as_role_mut("Stored")
            .unwrap()
            .downcast_mut::<Stored>()
            .unwrap()
            .args = vec!["A".into(), "B".into(), "C".into()];
    }

    let errh = SilentReporter::new();
    table
        .call_write("second", "42", &mut node, &router, &errh)
        .unwrap()
        .unwrap();

    let stored: &Stored = role_ref(&node, "Stored");
    assert_eq!(stored.args, vec!["A", "42", "C"]);
    assert_eq!(router.configs.borrow()[0], "A, 42, C");
}

#[test]
fn test_reconfigure_positional_pads_missing_arguments() {
    let (router, mut node, mut table) = stored_node("");
    {
        let mut reg = Registrar::new(&mut table, 0);
        reg.add_write_handler("third", reconfigure_positional_handler(2));
    }
    let errh = SilentReporter::new();
    table
        .call_write("third", "9 /* uncommented */", &mut node, &router, &errh)
        .unwrap()
        .unwrap();

    let stored: &Stored = role_ref(&node, "Stored");
    assert_eq!(stored.args, vec!["", "", "9"]);
}

#[test]
fn test_reconfigure_keyword_handler_appends_and_stores_sentinel() {
    let (router, mut node, mut table) = stored_node("");
    {
        let mut reg = Registrar::new(&mut table, 0);
        reg.add_write_handler("burst", reconfigure_keyword_handler("BURST"));
    }
    if let Some(element) = node.element_mut() {
        element
            .as_role_mut("Stored")
            .unwrap()
            .downcast_mut::<Stored>()
            .unwrap()
            .args = vec!["10".into()];
    }

    let errh = SilentReporter::new();
    table
        .call_write("burst", "9", &mut node, &router, &errh)
        .unwrap()
        .unwrap();

    let stored: &Stored = role_ref(&node, "Stored");
    assert_eq!(stored.args, vec!["10", "BURST 9"]);
    assert_eq!(router.configs.borrow()[0], DYNAMICALLY_RECONFIGURED);
}

#[test]
fn test_reconfigure_keyword_rejects_default_readback() {
    let router = TestRouter::new(&["d"]).with_config(0, "10");
    let mut node = Node::new(Box::new(DefaultConfig::default()));
    node.attach(0);
    let mut table = HandlerTable::new();
    {
        let mut reg = Registrar::new(&mut table, 0);
        reg.add_write_handler("burst", reconfigure_keyword_handler("BURST"));
    }

    let errh = BufferedReporter::new();
    let result = table
        .call_write("burst", "9", &mut node, &router, &errh)
        .unwrap();
    assert!(result.is_err());
    assert!(errh.messages()[0].contains("default configuration"));
    // the stored configuration is untouched
    assert_eq!(router.configs.borrow()[0], "10");
}

#[test]
fn test_task_handlers_clamp_and_report() {
    let (router, mut node, mut table) = stored_node("");
    let task = Arc::new(Task::new());
    {
        let mut reg = Registrar::new(&mut table, 0);
        builtin::add_task_handlers(&mut reg, &task, "");
    }

    assert_eq!(
        table.call_read("scheduled", &node, &router).unwrap(),
        "false\n"
    );
    task.schedule();
    assert_eq!(
        table.call_read("scheduled", &node, &router).unwrap(),
        "true\n"
    );

    let errh = BufferedReporter::new();
    table
        .call_write("tickets", "100000", &mut node, &router, &errh)
        .unwrap()
        .unwrap();
    assert_eq!(task.tickets(), MAX_TICKETS);
    assert!(errh.messages()[0].contains("pinned"));

    table
        .call_write("tickets", "0", &mut node, &router, &errh)
        .unwrap()
        .unwrap();
    assert_eq!(task.tickets(), 1);

    assert!(table
        .call_write("tickets", "not a number", &mut node, &router, &errh)
        .unwrap()
        .is_err());
    assert_eq!(task.tickets(), 1);

    assert_eq!(
        table.call_read("home_thread", &node, &router).unwrap(),
        "0\n"
    );
}

#[test]
fn test_task_handlers_with_prefix() {
    let (router, node, mut table) = stored_node("");
    let task = Arc::new(Task::new());
    {
        let mut reg = Registrar::new(&mut table, 0);
        builtin::add_task_handlers(&mut reg, &task, "tx_");
    }
    assert!(table.call_read("tx_scheduled", &node, &router).is_some());
    assert!(table.call_read("scheduled", &node, &router).is_none());
}

//! Argument-rewriting handlers for live reconfiguration.
//!
//! These constructors build read and write hooks that expose single
//! configuration arguments as handlers. A rate limiter configured as
//! `"10, BURST 5"` can register `rate` handlers over positional argument
//! 0 and `burst` handlers over the `BURST` keyword; writing them rewrites
//! the argument vector and funnels it through
//! [`live_reconfigure`](crate::element::Element::live_reconfigure).
//!
//! Use the positional variants only for mandatory positional arguments;
//! optional positions might be polluted by keywords.

use crate::config;
use crate::element::{ElementContext, ReadbackMode};
use crate::error::{Error, Result};
use crate::handler::{ReadContext, ReadHook, WriteContext, WriteHook};
use crate::report::ErrorHandler;
use std::sync::Arc;

/// Display configuration stored after a keyword reconfiguration, in place
/// of an argument string the element no longer matches.
pub const DYNAMICALLY_RECONFIGURED: &str = "/* dynamically reconfigured */";

fn terminated(s: &str) -> String {
    if s.ends_with('\n') {
        s.to_string()
    } else {
        format!("{s}\n")
    }
}

fn read_args(cx: &ReadContext<'_>) -> Vec<String> {
    let Some(element) = cx.node.element() else {
        return Vec::new();
    };
    let element_cx = ElementContext::new(cx.router, cx.node.eindex());
    element.configuration(&element_cx, ReadbackMode::Split).args
}

/// Build a read hook returning positional configuration argument `index`.
///
/// Returns the empty string when the configuration has no such argument;
/// otherwise the argument with a trailing newline appended if missing.
pub fn read_positional_handler(index: usize) -> ReadHook {
    Arc::new(move |cx: ReadContext<'_>| {
        match read_args(&cx).get(index) {
            Some(arg) if !arg.is_empty() => terminated(arg),
            _ => String::new(),
        }
    })
}

/// Build a read hook returning the value of keyword argument `keyword`.
///
/// Scans the configuration right to left so later occurrences win.
/// Returns the empty string when the keyword is absent.
pub fn read_keyword_handler(keyword: impl Into<String>) -> ReadHook {
    let keyword = keyword.into();
    Arc::new(move |cx: ReadContext<'_>| {
        for arg in read_args(&cx).iter().rev() {
            if let Some(value) = config::keyword_value(arg, &keyword) {
                if value.is_empty() {
                    return value;
                }
                return terminated(&value);
            }
        }
        String::new()
    })
}

enum Target {
    Positional(usize),
    Keyword(String),
}

fn reconfigure(
    data: &str,
    cx: WriteContext<'_>,
    errh: &dyn ErrorHandler,
    target: &Target,
) -> Result<()> {
    let WriteContext { node, router } = cx;
    let eindex = node.eindex();
    let element_cx = ElementContext::new(router, eindex);
    let element = node
        .element_mut()
        .ok_or_else(|| Error::Invalid("element was taken".into()))?;

    let readback = element.configuration(&element_cx, ReadbackMode::Split);
    let mut args = readback.args;
    let new_config = match target {
        Target::Keyword(keyword) => {
            if readback.was_default {
                errh.error(
                    "can't use a keyword reconfigure handler with the default configuration method",
                );
                return Err(Error::Invalid(
                    "keyword reconfiguration needs a configuration override".into(),
                ));
            }
            args.push(format!("{keyword} {data}"));
            DYNAMICALLY_RECONFIGURED.to_string()
        }
        Target::Positional(index) => {
            while args.len() <= *index {
                args.push(String::new());
            }
            args[*index] = config::uncomment(data);
            config::join_args(&args)
        }
    };

    if element.live_reconfigure(&element_cx, &args, errh).is_err() {
        return Err(Error::Invalid("live reconfiguration failed".into()));
    }
    if let Some(eindex) = eindex {
        router.set_default_configuration_string(eindex, &new_config);
    }
    Ok(())
}

/// Build a write hook that reconfigures the element by replacing
/// positional configuration argument `index`.
///
/// Writing fetches the current arguments, pads the vector out to the
/// index if needed, substitutes the uncommented data, and calls
/// [`live_reconfigure`](crate::element::Element::live_reconfigure); on
/// success the rejoined arguments become the stored configuration.
pub fn reconfigure_positional_handler(index: usize) -> WriteHook {
    Arc::new(move |data: &str, cx: WriteContext<'_>, errh: &dyn ErrorHandler| {
        reconfigure(data, cx, errh, &Target::Positional(index))
    })
}

/// Build a write hook that reconfigures the element by appending a
/// `keyword value` argument (which overrides earlier occurrences).
///
/// Requires the element to override
/// [`configuration`](crate::element::Element::configuration) and rebuild
/// its arguments from live state; with the default readback the write
/// fails with a descriptive error. On success the stored configuration
/// becomes the [`DYNAMICALLY_RECONFIGURED`] sentinel.
pub fn reconfigure_keyword_handler(keyword: impl Into<String>) -> WriteHook {
    let keyword = keyword.into();
    Arc::new(move |data: &str, cx: WriteContext<'_>, errh: &dyn ErrorHandler| {
        reconfigure(data, cx, errh, &Target::Keyword(keyword.clone()))
    })
}

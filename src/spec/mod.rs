//! Parsers for the declarative element specifiers.
//!
//! Elements describe themselves to the framework through three string
//! mini-languages, each returned by a query method on
//! [`Element`](crate::element::Element):
//!
//! - [`port_count`]: acceptable input/output port-count ranges
//!   (`"1/1"`, `"1-2/0"`, `"1-/="`)
//! - [`processing`]: per-port push/pull/agnostic kinds (`"a/ah"`, `"h/l"`)
//! - [`flow`]: which input ports reach which output ports internally
//!   (`"x/x"`, `"xy/x"`, `"#/[^#]"`)
//!
//! The parsers are tolerant where the contract requires it: a malformed
//! flow or processing code is reported to the error handler and a safe
//! default takes its place, so one bad specifier cannot abort graph
//! construction.

pub mod flow;
pub mod port_count;
pub mod processing;

pub use flow::port_flow;
pub use port_count::PortCountSpec;
pub use processing::{processing_vector, PortKind};

//! Element system for Crossbar routers.
//!
//! This module defines the core types for router elements:
//!
//! - [`Element`]: the behavior trait every element implements
//! - [`Node`]: the per-element record a Router owns (element box, port
//!   arrays, element index, statistics)
//! - [`Port`]/[`Ports`]: direction-indexed endpoints and their state
//! - [`ElementContext`]/[`FlowContext`]: the services handed to lifecycle
//!   hooks and to the push/pull data plane
//!
//! # Design
//!
//! Elements are behavior only; all shared state (ports, index, counters)
//! lives in the [`Node`]. The Router owns its nodes in a flat indexed
//! collection and wires ports together with plain indices, so no
//! reference cycles arise. Packet transfer goes through a
//! [`Conduit`](crate::router::Conduit) the Router provides, and within a
//! worker the resulting push and pull chains are synchronous calls.

mod context;
mod node;
mod ports;
mod traits;

pub use context::{ElementContext, FlowContext};
pub use node::{live_nodes, ElementStats, Node};
pub use ports::{Link, Port, Ports};
pub use traits::{CleanupStage, Element, Readback, ReadbackMode};

pub use crate::spec::flow::COMPLETE_FLOW;

/// Port-count specifier: no inputs, no outputs.
pub const PORTS_0_0: &str = "0";
/// Port-count specifier: no inputs, one output.
pub const PORTS_0_1: &str = "0/1";
/// Port-count specifier: one input, no outputs.
pub const PORTS_1_0: &str = "1/0";
/// Port-count specifier: one input, one output.
pub const PORTS_1_1: &str = "1";

/// Processing specifier: all ports agnostic.
pub const AGNOSTIC: &str = "a";
/// Processing specifier: all ports push.
pub const PUSH: &str = "h";
/// Processing specifier: all ports pull.
pub const PULL: &str = "l";
/// Processing specifier: push inputs, pull outputs.
pub const PUSH_TO_PULL: &str = "h/l";
/// Processing specifier: pull inputs, push outputs.
pub const PULL_TO_PUSH: &str = "l/h";

/// Configure-phase landmarks.
///
/// The Router configures and initializes elements in ascending
/// [`configure_phase`](Element::configure_phase) order, ties broken by
/// element index; cleanup runs in the inverse order.
pub mod configure_phase {
    /// Configure before everything else.
    pub const FIRST: i32 = 0;
    /// Configure early; information elements other elements consult.
    pub const INFO: i32 = 20;
    /// Elements that need privileges still held early in startup.
    pub const PRIVILEGED: i32 = 90;
    /// The default phase; most elements configure here.
    pub const DEFAULT: i32 = 100;
    /// Configure after everything else.
    pub const LAST: i32 = 200;
}

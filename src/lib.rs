//! # Crossbar
//!
//! The element and port substrate of a modular packet-processing runtime.
//!
//! Crossbar defines *elements* — small packet-processing units with typed
//! input and output ports — and the machinery a router builder needs to
//! compose them into a dataflow graph: port-count negotiation, push/pull
//! kind resolution, internal flow analysis, a handler-based control
//! plane, and live reconfiguration. Packets move between connected ports
//! either by upstream-driven *push* or downstream-driven *pull*.
//!
//! The graph object itself, the scheduler, and the I/O selector are
//! collaborators declared as traits in [`router`]; concrete elements and
//! the configuration language live outside this crate.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crossbar::prelude::*;
//!
//! struct Mirror;
//!
//! impl Element for Mirror {
//!     fn class_name(&self) -> &'static str { "Mirror" }
//!     fn port_count(&self) -> &str { crossbar::element::PORTS_1_1 }
//! }
//!
//! let mut node = Node::new(Box::new(Mirror));
//! node.attach(0);
//! node.notify_nports(1, 1, &router, report::default_handler())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod element;
pub mod error;
pub mod handler;
pub mod llrpc;
pub mod observability;
pub mod packet;
pub mod report;
pub mod router;
pub mod spec;
pub mod task;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::element::{
        CleanupStage, Element, ElementContext, FlowContext, Node, Readback, ReadbackMode,
    };
    pub use crate::error::{Error, Result};
    pub use crate::handler::{HandlerTable, Registrar};
    pub use crate::packet::Packet;
    pub use crate::report::ErrorHandler;
    pub use crate::router::{Conduit, Router, RouterState};
    pub use crate::spec::PortKind;
}

pub use error::{Error, Result};

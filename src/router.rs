//! Collaborator interfaces: the Router, its packet-transfer engine, and
//! the Master I/O selector.
//!
//! Crossbar is the element/port substrate of a larger runtime. The graph
//! object that owns the elements, the scheduler that drives them, and the
//! select loop that watches file descriptors live outside this crate;
//! these traits declare exactly what the core needs from them.

use crate::error::Result;
use crate::packet::Packet;

/// Lifecycle state of the surrounding Router.
///
/// Port counts may be mutated while the Router is before
/// [`Preinitialize`](RouterState::Preinitialize); at or beyond it the
/// ports are frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RouterState {
    /// Elements are being constructed and attached.
    New,
    /// Port counts are being negotiated and connections recorded.
    Preconfigure,
    /// Configuration succeeded; push/pull assignment is final.
    Preinitialize,
    /// The router is installed and running.
    Live,
    /// The router has been taken off line.
    Dead,
}

/// Select for readability.
pub const SELECT_READ: u32 = 1 << 0;
/// Select for writability.
pub const SELECT_WRITE: u32 = 1 << 1;

/// The I/O selector collaborator.
///
/// Elements register interest in file-descriptor events through their
/// [`ElementContext`](crate::element::ElementContext); when a descriptor
/// is ready the Master invokes the element's
/// [`selected`](crate::element::Element::selected) hook.
pub trait Master {
    /// Register interest in `mask` events (a bitwise-or of
    /// [`SELECT_READ`] and [`SELECT_WRITE`]) on `fd` for the element at
    /// `eindex`. Overrides any previous registration by the same element
    /// for the same events.
    fn add_select(&self, fd: i32, eindex: usize, mask: u32) -> Result<()>;

    /// Remove any existing registrations for `mask` events on `fd`.
    fn remove_select(&self, fd: i32, eindex: usize, mask: u32) -> Result<()>;
}

/// The packet-transfer engine behind [`FlowContext`](crate::element::FlowContext).
///
/// When an element pushes on an output port, the port names its peer by
/// `(element index, port index)` and the conduit delivers the packet
/// there; pulls draw from the peer symmetrically. A Router implements
/// this over its element table, typically by calling
/// [`Node::dispatch_push`](crate::element::Node::dispatch_push) /
/// [`Node::dispatch_pull`](crate::element::Node::dispatch_pull) on the
/// target, so transfers form synchronous call chains.
pub trait Conduit {
    /// Deliver `packet` to input `port` of `element`.
    fn push(&mut self, element: usize, port: usize, packet: Packet);

    /// Draw the next packet from output `port` of `element`, if any.
    fn pull(&mut self, element: usize, port: usize) -> Option<Packet>;
}

/// The router collaborator.
///
/// Methods that conceptually mutate router bookkeeping
/// ([`invalidate_connections`](Router::invalidate_connections),
/// [`set_default_configuration_string`](Router::set_default_configuration_string))
/// take `&self`; implementations are expected to use interior mutability
/// so handler hooks can hold element state and the router at once.
pub trait Router {
    /// Current lifecycle state.
    fn state(&self) -> RouterState;

    /// Whether any connections have been recorded.
    fn connections_recorded(&self) -> bool;

    /// Discard recorded connections after a port-count change.
    fn invalidate_connections(&self);

    /// Name of the element at `eindex`, as declared in the configuration.
    fn name(&self, eindex: usize) -> Option<String>;

    /// Where the element at `eindex` was declared
    /// (`"filename:linenumber"`).
    fn landmark(&self, eindex: usize) -> Option<String>;

    /// The stored configuration string of the element at `eindex`.
    fn default_configuration_string(&self, eindex: usize) -> String;

    /// Replace the stored configuration string of the element at `eindex`.
    fn set_default_configuration_string(&self, eindex: usize, config: &str);

    /// Render the port connectivity of the element at `eindex` for the
    /// `ports` handler.
    fn element_ports_string(&self, eindex: usize) -> String;

    /// The predecessor router during a hot-swap, if any.
    fn hotswap_router(&self) -> Option<&dyn Router>;

    /// Look up an element index by name.
    fn find(&self, name: &str) -> Option<usize>;

    /// The I/O selector, when the runtime provides one.
    fn master(&self) -> Option<&dyn Master> {
        None
    }
}

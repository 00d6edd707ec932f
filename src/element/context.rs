//! Element runtime contexts.
//!
//! Lifecycle hooks receive an [`ElementContext`] giving access to the
//! Router's services; the data-plane hooks receive a [`FlowContext`]
//! that resolves the element's own ports to their peers and transfers
//! packets through the Router's [`Conduit`].

use crate::element::ports::{Link, Ports};
use crate::error::{Error, Result};
use crate::observability;
use crate::packet::Packet;
use crate::router::{Conduit, Master, Router};

/// Runtime services for an element's lifecycle hooks.
///
/// Bundles the Router collaborator with the element's index so hooks can
/// look up their own name, configuration string, and I/O selector.
#[derive(Clone, Copy)]
pub struct ElementContext<'a> {
    router: &'a dyn Router,
    eindex: Option<usize>,
}

impl<'a> ElementContext<'a> {
    /// Create a context for the element at `eindex`.
    pub fn new(router: &'a dyn Router, eindex: Option<usize>) -> Self {
        Self { router, eindex }
    }

    /// The surrounding router.
    pub fn router(&self) -> &'a dyn Router {
        self.router
    }

    /// The element's index within the router, if attached.
    pub fn eindex(&self) -> Option<usize> {
        self.eindex
    }

    /// The element's configured name.
    pub fn name(&self) -> Option<String> {
        self.router.name(self.eindex?)
    }

    /// Where the element was declared.
    pub fn landmark(&self) -> Option<String> {
        self.router.landmark(self.eindex?)
    }

    /// Register interest in `mask` events on `fd` with the Master.
    ///
    /// The element's [`selected`](crate::element::Element::selected) hook
    /// is invoked when the descriptor is ready.
    pub fn add_select(&self, fd: i32, mask: u32) -> Result<()> {
        let master = self.master_or_err()?;
        let eindex = self.eindex_or_err()?;
        master.add_select(fd, eindex, mask)
    }

    /// Remove a previous [`add_select`](ElementContext::add_select)
    /// registration.
    pub fn remove_select(&self, fd: i32, mask: u32) -> Result<()> {
        let master = self.master_or_err()?;
        let eindex = self.eindex_or_err()?;
        master.remove_select(fd, eindex, mask)
    }

    fn master_or_err(&self) -> Result<&'a dyn Master> {
        self.router
            .master()
            .ok_or_else(|| Error::Invalid("no master in this runtime".into()))
    }

    fn eindex_or_err(&self) -> Result<usize> {
        self.eindex
            .ok_or_else(|| Error::Invalid("element is not attached to a router".into()))
    }
}

impl std::fmt::Debug for ElementContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementContext")
            .field("eindex", &self.eindex)
            .finish()
    }
}

/// Data-plane context for one `push` or `pull` invocation.
///
/// Gives the element its two stylized moves: push a packet out on an
/// output port, or pull the next packet from an input port. The context
/// borrows the element's own port table for peer lookup and per-port
/// counters, and the Router's [`Conduit`] for the actual transfer.
pub struct FlowContext<'a> {
    ports: &'a mut Ports,
    conduit: &'a mut dyn Conduit,
}

impl<'a> FlowContext<'a> {
    /// Build a context over an element's ports and the transfer engine.
    pub fn new(ports: &'a mut Ports, conduit: &'a mut dyn Conduit) -> Self {
        Self { ports, conduit }
    }

    /// Number of input ports.
    pub fn ninputs(&self) -> usize {
        self.ports.ninputs()
    }

    /// Number of output ports.
    pub fn noutputs(&self) -> usize {
        self.ports.noutputs()
    }

    /// Push `packet` out on output `port`.
    ///
    /// Ownership passes downstream. A packet pushed on an out-of-range or
    /// unconnected output is dropped (and counted as such).
    pub fn push(&mut self, port: usize, packet: Packet) {
        match self.ports.get(true, port).map(|p| p.link()) {
            Some(Link::Connected { element, port: peer_port }) => {
                if let Some(p) = self.ports.output_mut(port) {
                    p.note_packet();
                }
                observability::record_push();
                self.conduit.push(element, peer_port, packet);
            }
            _ => {
                observability::record_drop();
                tracing::trace!(port, "packet dropped on unconnected output");
            }
        }
    }

    /// Pull the next packet from input `port`.
    ///
    /// Returns `None` when the upstream has nothing available, or when
    /// the port is out of range or unconnected.
    pub fn pull(&mut self, port: usize) -> Option<Packet> {
        match self.ports.get(false, port).map(|p| p.link()) {
            Some(Link::Connected { element, port: peer_port }) => {
                let packet = self.conduit.pull(element, peer_port)?;
                if let Some(p) = self.ports.input_mut(port) {
                    p.note_packet();
                }
                observability::record_pull();
                Some(packet)
            }
            _ => None,
        }
    }
}

impl std::fmt::Debug for FlowContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowContext")
            .field("ninputs", &self.ninputs())
            .field("noutputs", &self.noutputs())
            .finish()
    }
}

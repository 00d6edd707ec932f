//! Port state for elements.
//!
//! Each element carries two arrays of [`Port`]s, one per direction. A
//! port is *active* when it is the side that initiates transfer: a push
//! output (the sender) or a pull input (the puller). Active ports connect
//! to exactly one peer; inactive ports (push inputs, pull outputs) are
//! passive receivers that the Router may fan to any number of peers, so
//! they store no peer at all.

use crate::error::{Error, Result};
use crate::spec::PortKind;
use smallvec::SmallVec;

/// Connection state of a single port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Link {
    /// A passive receiver (push input or pull output); fanned outside the
    /// port itself.
    #[default]
    Inactive,
    /// An active port that has not been connected yet.
    Pending,
    /// An active port connected to its single peer, by plain indices.
    Connected {
        /// Element index of the peer within the router.
        element: usize,
        /// Port index on the peer element.
        port: usize,
    },
}

/// One endpoint on an element.
#[derive(Debug, Clone, Default)]
pub struct Port {
    link: Link,
    npackets: u64,
}

impl Port {
    /// The port's connection state.
    pub fn link(&self) -> Link {
        self.link
    }

    /// Whether this port initiates transfer (push output or pull input).
    pub fn is_active(&self) -> bool {
        !matches!(self.link, Link::Inactive)
    }

    /// Whether this port has a peer.
    pub fn is_connected(&self) -> bool {
        matches!(self.link, Link::Connected { .. })
    }

    /// The peer `(element, port)` pair of a connected active port.
    pub fn peer(&self) -> Option<(usize, usize)> {
        match self.link {
            Link::Connected { element, port } => Some((element, port)),
            _ => None,
        }
    }

    /// Packets transferred through this port.
    pub fn npackets(&self) -> u64 {
        self.npackets
    }

    pub(crate) fn note_packet(&mut self) {
        self.npackets += 1;
    }
}

/// Inline capacity per direction; larger port arrays spill to the heap.
const INLINE_PORTS: usize = 4;

/// An element's input and output port arrays.
#[derive(Debug, Default)]
pub struct Ports {
    inputs: SmallVec<[Port; INLINE_PORTS]>,
    outputs: SmallVec<[Port; INLINE_PORTS]>,
}

impl Ports {
    /// Create empty port arrays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of input ports.
    pub fn ninputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of output ports.
    pub fn noutputs(&self) -> usize {
        self.outputs.len()
    }

    /// Number of ports in one direction.
    pub fn nports(&self, is_output: bool) -> usize {
        if is_output {
            self.noutputs()
        } else {
            self.ninputs()
        }
    }

    /// Input port `port`.
    ///
    /// # Panics
    ///
    /// Panics if `port` is out of range.
    pub fn input(&self, port: usize) -> &Port {
        &self.inputs[port]
    }

    /// Output port `port`.
    ///
    /// # Panics
    ///
    /// Panics if `port` is out of range.
    pub fn output(&self, port: usize) -> &Port {
        &self.outputs[port]
    }

    /// All input ports.
    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    /// All output ports.
    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    /// Port `port` in the given direction, if in range.
    pub fn get(&self, is_output: bool, port: usize) -> Option<&Port> {
        if is_output {
            self.outputs.get(port)
        } else {
            self.inputs.get(port)
        }
    }

    fn get_mut(&mut self, is_output: bool, port: usize) -> Option<&mut Port> {
        if is_output {
            self.outputs.get_mut(port)
        } else {
            self.inputs.get_mut(port)
        }
    }

    pub(crate) fn output_mut(&mut self, port: usize) -> Option<&mut Port> {
        self.outputs.get_mut(port)
    }

    pub(crate) fn input_mut(&mut self, port: usize) -> Option<&mut Port> {
        self.inputs.get_mut(port)
    }

    /// Replace both arrays with freshly initialized ports: peerless,
    /// inactive, zero counters.
    pub(crate) fn resize(&mut self, ninputs: usize, noutputs: usize) {
        self.inputs.clear();
        self.inputs.resize(ninputs, Port::default());
        self.outputs.clear();
        self.outputs.resize(noutputs, Port::default());
    }

    /// Fix each port's active flag from the resolved kinds: an input is
    /// active iff it pulls, an output iff it does not pull. Active ports
    /// start unconnected.
    pub(crate) fn initialize(&mut self, in_kinds: &[PortKind], out_kinds: &[PortKind]) {
        debug_assert_eq!(in_kinds.len(), self.inputs.len());
        debug_assert_eq!(out_kinds.len(), self.outputs.len());
        for (port, kind) in self.inputs.iter_mut().zip(in_kinds) {
            *port = Port::default();
            if *kind == PortKind::Pull {
                port.link = Link::Pending;
            }
        }
        for (port, kind) in self.outputs.iter_mut().zip(out_kinds) {
            *port = Port::default();
            if *kind != PortKind::Pull {
                port.link = Link::Pending;
            }
        }
    }

    /// Establish the peer link of an active port.
    pub(crate) fn connect(
        &mut self,
        is_output: bool,
        port: usize,
        peer: usize,
        peer_port: usize,
    ) -> Result<()> {
        let direction = if is_output { "output" } else { "input" };
        let p = self
            .get_mut(is_output, port)
            .ok_or_else(|| Error::Invalid(format!("no {direction} port {port}")))?;
        if !p.is_active() {
            return Err(Error::Invalid(format!(
                "{direction} port {port} is not active"
            )));
        }
        p.link = Link::Connected {
            element: peer,
            port: peer_port,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ports_are_peerless_and_inactive() {
        let mut ports = Ports::new();
        ports.resize(3, 2);
        assert_eq!(ports.ninputs(), 3);
        assert_eq!(ports.noutputs(), 2);
        for p in ports.inputs().iter().chain(ports.outputs()) {
            assert!(!p.is_active());
            assert!(p.peer().is_none());
            assert_eq!(p.npackets(), 0);
        }
    }

    #[test]
    fn test_initialize_marks_active_sides() {
        let mut ports = Ports::new();
        ports.resize(2, 2);
        ports.initialize(
            &[PortKind::Push, PortKind::Pull],
            &[PortKind::Push, PortKind::Pull],
        );
        // pull inputs and push outputs initiate transfer
        assert!(!ports.input(0).is_active());
        assert!(ports.input(1).is_active());
        assert!(ports.output(0).is_active());
        assert!(!ports.output(1).is_active());
    }

    #[test]
    fn test_connect_requires_active_port() {
        let mut ports = Ports::new();
        ports.resize(1, 1);
        ports.initialize(&[PortKind::Push], &[PortKind::Push]);
        assert!(ports.connect(true, 0, 5, 0).is_ok());
        assert_eq!(ports.output(0).peer(), Some((5, 0)));
        // the push input is passive; the Router fans it externally
        assert!(ports.connect(false, 0, 5, 0).is_err());
        // out of range
        assert!(ports.connect(true, 1, 5, 0).is_err());
    }

    #[test]
    fn test_resize_discards_old_state() {
        let mut ports = Ports::new();
        ports.resize(1, 1);
        ports.initialize(&[PortKind::Pull], &[PortKind::Push]);
        ports.connect(true, 0, 2, 0).unwrap();
        ports.resize(2, 2);
        assert!(!ports.output(0).is_active());
        assert!(ports.output(0).peer().is_none());
    }
}

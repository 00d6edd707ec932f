//! The per-element record a Router owns.

use crate::config;
use crate::element::context::{ElementContext, FlowContext};
use crate::element::ports::Ports;
use crate::element::traits::{Element, ReadbackMode};
use crate::error::{Error, Result};
use crate::packet::Packet;
use crate::report::{self, ContextReporter, ErrorHandler};
use crate::router::{Conduit, Router, RouterState};
use crate::spec::{self, PortCountSpec, PortKind};
use std::sync::atomic::{AtomicUsize, Ordering};

static LIVE_NODES: AtomicUsize = AtomicUsize::new(0);

/// Number of element nodes currently alive in this process.
pub fn live_nodes() -> usize {
    LIVE_NODES.load(Ordering::Relaxed)
}

/// Per-element call and cycle counters.
///
/// The Router's dispatch loop feeds these; `dispatch_push` and
/// `dispatch_pull` bump the call count, cycle accounting is up to the
/// scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementStats {
    /// Number of push or pull calls into this element.
    pub calls: u64,
    /// Cycles spent in this element itself.
    pub self_cycles: u64,
    /// Cycles spent in the elements this one pushes to or pulls from.
    pub child_cycles: u64,
}

/// A node in the router: one element together with its shared state.
///
/// The Router owns a flat indexed collection of nodes. Each node holds
/// the boxed [`Element`], its two port arrays, its element index
/// (assigned at attach time), and its statistics. The element can be
/// taken out for execution and put back, so executors can hold it
/// mutably while the node stays addressable.
pub struct Node {
    class_name: &'static str,
    /// The element itself; `None` while taken for execution.
    element: Option<Box<dyn Element>>,
    ports: Ports,
    eindex: Option<usize>,
    stats: ElementStats,
}

impl Node {
    /// Wrap an element in a fresh node with no ports and no router
    /// attachment.
    pub fn new(element: Box<dyn Element>) -> Self {
        LIVE_NODES.fetch_add(1, Ordering::Relaxed);
        Self {
            class_name: element.class_name(),
            element: Some(element),
            ports: Ports::new(),
            eindex: None,
            stats: ElementStats::default(),
        }
    }

    /// Wrap an element and size its ports immediately (deprecated).
    ///
    /// Port counts should come from the element's
    /// [`port_count`](Element::port_count) specifier through
    /// [`notify_nports`](Node::notify_nports); this constructor exists
    /// for elements that still fix their counts at construction time.
    pub fn with_nports(element: Box<dyn Element>, ninputs: usize, noutputs: usize) -> Self {
        let mut node = Self::new(element);
        node.ports.resize(ninputs, noutputs);
        node
    }

    /// Record the element's index within its router.
    pub fn attach(&mut self, eindex: usize) {
        self.eindex = Some(eindex);
    }

    /// The element's index within its router, `None` before attach.
    pub fn eindex(&self) -> Option<usize> {
        self.eindex
    }

    /// The element's class name, cached at construction.
    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    /// Borrow the element, unless it has been taken for execution.
    pub fn element(&self) -> Option<&dyn Element> {
        self.element.as_deref()
    }

    /// Mutably borrow the element, unless it has been taken.
    pub fn element_mut(&mut self) -> Option<&mut Box<dyn Element>> {
        self.element.as_mut()
    }

    /// Take the element out for execution.
    pub fn take_element(&mut self) -> Option<Box<dyn Element>> {
        self.element.take()
    }

    /// Return a previously taken element.
    pub fn put_element(&mut self, element: Box<dyn Element>) {
        self.element = Some(element);
    }

    fn element_ref(&self) -> &dyn Element {
        match self.element.as_deref() {
            Some(element) => element,
            None => panic!("element {} was taken from its node", self.class_name),
        }
    }

    /// The element's port arrays.
    pub fn ports(&self) -> &Ports {
        &self.ports
    }

    /// Number of input ports.
    pub fn ninputs(&self) -> usize {
        self.ports.ninputs()
    }

    /// Number of output ports.
    pub fn noutputs(&self) -> usize {
        self.ports.noutputs()
    }

    /// Call and cycle counters.
    pub fn stats(&self) -> &ElementStats {
        &self.stats
    }

    /// Mutable counters, for the Router's dispatch loop.
    pub fn stats_mut(&mut self) -> &mut ElementStats {
        &mut self.stats
    }

    /// `"name :: ClassName"`, for diagnostics.
    pub fn declaration(&self, router: &dyn Router) -> String {
        let name = self
            .eindex
            .and_then(|eindex| router.name(eindex))
            .unwrap_or_else(|| "<unknown>".to_string());
        format!("{} :: {}", name, self.class_name)
    }

    // ------------------------------------------------------------------
    // Port negotiation
    // ------------------------------------------------------------------

    /// Whether the ports can no longer be mutated.
    ///
    /// Ports freeze once the router state passes
    /// [`Preconfigure`](RouterState::Preconfigure).
    pub fn ports_frozen(&self, router: &dyn Router) -> bool {
        router.state() > RouterState::Preconfigure
    }

    /// Resize the port arrays.
    ///
    /// Fails with [`Error::Busy`] once the ports are frozen (the router
    /// reached [`Preinitialize`](RouterState::Preinitialize)); before
    /// that stage, any recorded connections are silently invalidated. On
    /// success every port is fresh: peerless, inactive, zero counters.
    pub fn set_nports(
        &mut self,
        ninputs: usize,
        noutputs: usize,
        router: &dyn Router,
    ) -> Result<()> {
        if router.state() >= RouterState::Preinitialize {
            return Err(Error::Busy);
        }
        if router.connections_recorded() {
            router.invalidate_connections();
        }
        self.ports.resize(ninputs, noutputs);
        Ok(())
    }

    /// Reconcile a requested `(ninputs, noutputs)` pair with the
    /// element's port-count specifier and commit the result.
    ///
    /// An empty specifier delegates to the legacy
    /// [`notify_ninputs`](Element::notify_ninputs)/
    /// [`notify_noutputs`](Element::notify_noutputs) hooks. A malformed
    /// specifier is reported as "bad port count" and fails with
    /// [`Error::Parse`].
    pub fn notify_nports(
        &mut self,
        ninputs: usize,
        noutputs: usize,
        router: &dyn Router,
        errh: &dyn ErrorHandler,
    ) -> Result<()> {
        let spec = self.element_ref().port_count().to_string();
        if spec.is_empty() {
            let element = self
                .element
                .as_mut()
                .ok_or_else(|| Error::Invalid("element was taken".into()))?;
            let ninputs = element.notify_ninputs(ninputs);
            let noutputs = element.notify_noutputs(noutputs);
            return self.set_nports(ninputs, noutputs, router);
        }
        match PortCountSpec::parse(&spec) {
            Ok(counts) => {
                let (ninputs, noutputs) = counts.constrain(ninputs, noutputs);
                self.set_nports(ninputs, noutputs, router)
            }
            Err(err) => {
                errh.error(&format!("{}: bad port count", self.class_name));
                Err(err)
            }
        }
    }

    /// Fix each port's active flag from the Router's resolved push/pull
    /// kinds.
    ///
    /// Called once push/pull assignment is final: an input is active iff
    /// its kind is [`Pull`](PortKind::Pull), an output iff its kind is
    /// not. Active ports start unconnected until
    /// [`connect_port`](Node::connect_port) fires.
    pub fn initialize_ports(&mut self, in_kinds: &[PortKind], out_kinds: &[PortKind]) {
        self.ports.initialize(in_kinds, out_kinds);
    }

    /// Establish the peer of an active port.
    ///
    /// Inactive ports are fanned by the Router outside the port object
    /// and refuse connection with [`Error::Invalid`].
    pub fn connect_port(
        &mut self,
        is_output: bool,
        port: usize,
        peer: usize,
        peer_port: usize,
    ) -> Result<()> {
        self.ports.connect(is_output, port, peer, peer_port)
    }

    // ------------------------------------------------------------------
    // Spec analysis
    // ------------------------------------------------------------------

    /// Resolve the element's processing specifier into per-port kinds.
    pub fn processing_vector(
        &self,
        errh: &dyn ErrorHandler,
    ) -> (Vec<PortKind>, Vec<PortKind>) {
        let errh = ContextReporter::new(self.class_name, errh);
        spec::processing_vector(
            self.element_ref().processing(),
            self.ports.ninputs(),
            self.ports.noutputs(),
            &errh,
        )
    }

    /// Analyze internal packet flow with respect to one port.
    ///
    /// Returns one entry per complementary port; entry *j* is true iff
    /// packets can travel between `port` and port *j* through this
    /// element, according to its flow code. Spec errors are reported to
    /// the default handler, labeled with the element class.
    pub fn port_flow(&self, is_output: bool, port: usize) -> Vec<bool> {
        let errh = ContextReporter::new(self.class_name, report::default_handler());
        spec::port_flow(
            self.element_ref().flow_code(),
            is_output,
            port,
            self.ports.nports(is_output),
            self.ports.nports(!is_output),
            &errh,
        )
    }

    // ------------------------------------------------------------------
    // Configuration readback
    // ------------------------------------------------------------------

    /// The element's current configuration as a display string.
    ///
    /// Fetches the raw readback and joins the arguments with `", "`.
    pub fn configuration_string(&self, router: &dyn Router) -> String {
        let cx = ElementContext::new(router, self.eindex);
        let readback = self.element_ref().configuration(&cx, ReadbackMode::Raw);
        config::join_args(&readback.args)
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Deliver a packet to push input `port` of this element.
    ///
    /// Splits the element/port borrows, builds the [`FlowContext`], bumps
    /// the call count and the input's packet counter, and invokes the
    /// element's [`push`](Element::push) hook. Conduit implementations
    /// call this on the target node, so push chains are synchronous.
    pub fn dispatch_push(&mut self, conduit: &mut dyn Conduit, port: usize, packet: Packet) {
        self.stats.calls += 1;
        if let Some(p) = self.ports.input_mut(port) {
            p.note_packet();
        }
        let element = match self.element.as_deref_mut() {
            Some(element) => element,
            None => {
                tracing::trace!(port, "packet dropped: element taken from node");
                return;
            }
        };
        let mut cx = FlowContext::new(&mut self.ports, conduit);
        element.push(&mut cx, port, packet);
    }

    /// Draw the next packet from pull output `port` of this element.
    pub fn dispatch_pull(&mut self, conduit: &mut dyn Conduit, port: usize) -> Option<Packet> {
        self.stats.calls += 1;
        let element = self.element.as_deref_mut()?;
        let mut cx = FlowContext::new(&mut self.ports, conduit);
        let packet = element.pull(&mut cx, port);
        if packet.is_some() {
            if let Some(p) = self.ports.output_mut(port) {
                p.note_packet();
            }
        }
        packet
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        LIVE_NODES.fetch_sub(1, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("class_name", &self.class_name)
            .field("eindex", &self.eindex)
            .field("ninputs", &self.ports.ninputs())
            .field("noutputs", &self.ports.noutputs())
            .field("taken", &self.element.is_none())
            .finish()
    }
}

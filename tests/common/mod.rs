//! Shared scaffolding for the integration tests: a minimal Router, a
//! recording Conduit, and a handful of small elements.

#![allow(dead_code)]

use crossbar::element::{Element, ElementContext, Node, Readback, ReadbackMode};
use crossbar::error::Result;
use crossbar::packet::Packet;
use crossbar::report::ErrorHandler;
use crossbar::router::{Conduit, Router, RouterState};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// A Router collaborator backed by plain cells.
pub struct TestRouter {
    pub state: Cell<RouterState>,
    pub connections: Cell<bool>,
    pub names: Vec<String>,
    pub configs: RefCell<Vec<String>>,
    pub hotswap: Option<Box<TestRouter>>,
}

impl TestRouter {
    pub fn new(names: &[&str]) -> Self {
        Self {
            state: Cell::new(RouterState::Preconfigure),
            connections: Cell::new(false),
            names: names.iter().map(|s| s.to_string()).collect(),
            configs: RefCell::new(vec![String::new(); names.len()]),
            hotswap: None,
        }
    }

    pub fn with_config(self, eindex: usize, config: &str) -> Self {
        self.configs.borrow_mut()[eindex] = config.to_string();
        self
    }
}

impl Router for TestRouter {
    fn state(&self) -> RouterState {
        self.state.get()
    }

    fn connections_recorded(&self) -> bool {
        self.connections.get()
    }

    fn invalidate_connections(&self) {
        self.connections.set(false);
    }

    fn name(&self, eindex: usize) -> Option<String> {
        self.names.get(eindex).cloned()
    }

    fn landmark(&self, eindex: usize) -> Option<String> {
        self.names.get(eindex).map(|_| "test.router:1".to_string())
    }

    fn default_configuration_string(&self, eindex: usize) -> String {
        self.configs.borrow().get(eindex).cloned().unwrap_or_default()
    }

    fn set_default_configuration_string(&self, eindex: usize, config: &str) {
        if let Some(slot) = self.configs.borrow_mut().get_mut(eindex) {
            *slot = config.to_string();
        }
    }

    fn element_ports_string(&self, eindex: usize) -> String {
        format!("element {eindex} ports\n")
    }

    fn hotswap_router(&self) -> Option<&dyn Router> {
        self.hotswap.as_deref().map(|r| r as &dyn Router)
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// A Conduit that records pushes and serves pulls from a queue, so tests
/// can drive transfer chains step by step.
#[derive(Default)]
pub struct QueueConduit {
    pub pushed: VecDeque<(usize, usize, Packet)>,
    pub supply: VecDeque<Packet>,
}

impl Conduit for QueueConduit {
    fn push(&mut self, element: usize, port: usize, packet: Packet) {
        self.pushed.push_back((element, port, packet));
    }

    fn pull(&mut self, element: usize, port: usize) -> Option<Packet> {
        let _ = (element, port);
        self.supply.pop_front()
    }
}

/// A pass-through element relying entirely on the default hooks.
pub struct Mirror;

impl Element for Mirror {
    fn class_name(&self) -> &'static str {
        "Mirror"
    }

    fn port_count(&self) -> &str {
        crossbar::element::PORTS_1_1
    }
}

/// A push sink that counts the packets it swallows.
#[derive(Default)]
pub struct CountSink {
    pub seen: usize,
}

impl Element for CountSink {
    fn class_name(&self) -> &'static str {
        "CountSink"
    }

    fn port_count(&self) -> &str {
        crossbar::element::PORTS_1_0
    }

    fn processing(&self) -> &str {
        crossbar::element::PUSH
    }

    fn push(
        &mut self,
        _cx: &mut crossbar::element::FlowContext<'_>,
        _port: usize,
        _packet: Packet,
    ) {
        self.seen += 1;
    }

    fn as_role(&self, role: &str) -> Option<&dyn Any> {
        (role == "CountSink").then_some(self as &dyn Any)
    }

    fn as_role_mut(&mut self, role: &str) -> Option<&mut dyn Any> {
        (role == "CountSink").then_some(self as &mut dyn Any)
    }
}

/// An element whose declarative specifiers are chosen per test.
pub struct SpecElement {
    pub port_count: &'static str,
    pub processing: &'static str,
    pub flow_code: &'static str,
}

impl SpecElement {
    pub fn new(port_count: &'static str, processing: &'static str, flow_code: &'static str) -> Self {
        Self {
            port_count,
            processing,
            flow_code,
        }
    }
}

impl Element for SpecElement {
    fn class_name(&self) -> &'static str {
        "SpecElement"
    }

    fn port_count(&self) -> &str {
        self.port_count
    }

    fn processing(&self) -> &str {
        self.processing
    }

    fn flow_code(&self) -> &str {
        self.flow_code
    }
}

/// A legacy element negotiating ports through the deprecated notify
/// hooks: one input, at least one output.
pub struct Legacy;

impl Element for Legacy {
    fn class_name(&self) -> &'static str {
        "Legacy"
    }

    fn notify_ninputs(&mut self, _requested: usize) -> usize {
        1
    }

    fn notify_noutputs(&mut self, requested: usize) -> usize {
        requested.max(1)
    }
}

/// A live-reconfigurable element that keeps its argument vector and
/// rebuilds its configuration from it.
#[derive(Default)]
pub struct Stored {
    pub args: Vec<String>,
    pub reconfigured: usize,
}

impl Element for Stored {
    fn class_name(&self) -> &'static str {
        "Stored"
    }

    fn can_live_reconfigure(&self) -> bool {
        true
    }

    fn configure(
        &mut self,
        _cx: &ElementContext<'_>,
        args: &[String],
        _errh: &dyn ErrorHandler,
    ) -> Result<()> {
        self.args = args.to_vec();
        self.reconfigured += 1;
        Ok(())
    }

    fn configuration(&self, _cx: &ElementContext<'_>, _mode: ReadbackMode) -> Readback {
        Readback {
            args: self.args.clone(),
            was_default: false,
        }
    }

    fn as_role(&self, role: &str) -> Option<&dyn Any> {
        (role == "Stored").then_some(self as &dyn Any)
    }

    fn as_role_mut(&mut self, role: &str) -> Option<&mut dyn Any> {
        (role == "Stored").then_some(self as &mut dyn Any)
    }
}

/// A live-reconfigurable element that keeps the default configuration
/// readback.
#[derive(Default)]
pub struct DefaultConfig {
    pub reconfigured: usize,
}

impl Element for DefaultConfig {
    fn class_name(&self) -> &'static str {
        "DefaultConfig"
    }

    fn can_live_reconfigure(&self) -> bool {
        true
    }

    fn configure(
        &mut self,
        _cx: &ElementContext<'_>,
        _args: &[String],
        _errh: &dyn ErrorHandler,
    ) -> Result<()> {
        self.reconfigured += 1;
        Ok(())
    }
}

/// Borrow a typed view of a node's element through its role tag.
pub fn role_ref<'a, T: 'static>(node: &'a Node, role: &str) -> &'a T {
    node.element()
        .expect("element taken")
        .as_role(role)
        .expect("role not answered")
        .downcast_ref::<T>()
        .expect("role type mismatch")
}

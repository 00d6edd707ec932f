//! Handler registry: named read/write entry points on elements.
//!
//! Handlers are the control plane of a router. Every element exposes a
//! set of named handlers — some standard ([`builtin`]), some its own —
//! reachable through whatever transport the surrounding runtime offers.
//! The Router owns one [`HandlerTable`]; elements register into it
//! through the [`Registrar`] façade handed to their
//! [`add_handlers`](crate::element::Element::add_handlers) hook.
//!
//! # Override semantics
//!
//! Re-registering a read handler under an existing name replaces the read
//! binding and leaves a sibling write binding intact (and symmetrically
//! for writes); [`Registrar::set_handler`] replaces the whole entry in
//! both directions.

pub mod builtin;
pub mod reconfigure;

use crate::element::Node;
use crate::error::Result;
use crate::report::ErrorHandler;
use crate::router::Router;
use std::collections::HashMap;
use std::sync::Arc;

/// Handler flag: the handler is readable.
pub const OP_READ: u32 = 1 << 0;
/// Handler flag: the handler is writable.
pub const OP_WRITE: u32 = 1 << 1;

/// Context passed to read hooks.
pub struct ReadContext<'a> {
    /// The node being read.
    pub node: &'a Node,
    /// The surrounding router.
    pub router: &'a dyn Router,
    /// The handler table, for handlers that enumerate handlers.
    pub table: &'a HandlerTable,
}

/// Context passed to write hooks.
pub struct WriteContext<'a> {
    /// The node being written.
    pub node: &'a mut Node,
    /// The surrounding router.
    pub router: &'a dyn Router,
}

/// A read hook: renders some element state as a string.
pub type ReadHook = Arc<dyn Fn(ReadContext<'_>) -> String + Send + Sync>;

/// A write hook: applies a written string to the element.
pub type WriteHook =
    Arc<dyn Fn(&str, WriteContext<'_>, &dyn ErrorHandler) -> Result<()> + Send + Sync>;

/// A comprehensive hook covering one or both directions, for
/// [`Registrar::set_handler`].
pub enum HandlerHook {
    /// Read-only.
    Read(ReadHook),
    /// Write-only.
    Write(WriteHook),
    /// Both directions.
    ReadWrite(ReadHook, WriteHook),
}

/// A named handler bound to one element.
pub struct Handler {
    name: String,
    flags: u32,
    read: Option<ReadHook>,
    write: Option<WriteHook>,
}

impl Handler {
    /// The handler's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handler's visibility flags.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Whether the handler is visible for reading.
    pub fn read_visible(&self) -> bool {
        self.flags & OP_READ != 0
    }

    /// Whether the handler is visible for writing.
    pub fn write_visible(&self) -> bool {
        self.flags & OP_WRITE != 0
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("read_visible", &self.read_visible())
            .field("write_visible", &self.write_visible())
            .finish()
    }
}

/// The Router-owned table of element handlers.
///
/// Entries keep registration order per element, which is the order the
/// `handlers` handler lists them in.
#[derive(Default)]
pub struct HandlerTable {
    entries: Vec<(usize, Handler)>,
    index: HashMap<(usize, String), usize>,
}

impl HandlerTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, eindex: usize, name: &str) -> &mut Handler {
        if let Some(&i) = self.index.get(&(eindex, name.to_string())) {
            return &mut self.entries[i].1;
        }
        self.entries.push((
            eindex,
            Handler {
                name: name.to_string(),
                flags: 0,
                read: None,
                write: None,
            },
        ));
        let i = self.entries.len() - 1;
        self.index.insert((eindex, name.to_string()), i);
        &mut self.entries[i].1
    }

    /// Register a read handler, overriding any prior read binding for
    /// the name but leaving a sibling write binding intact.
    pub fn add_read(&mut self, eindex: usize, name: &str, hook: ReadHook) {
        let handler = self.slot(eindex, name);
        handler.read = Some(hook);
        handler.flags |= OP_READ;
    }

    /// Register a write handler, overriding any prior write binding for
    /// the name but leaving a sibling read binding intact.
    pub fn add_write(&mut self, eindex: usize, name: &str, hook: WriteHook) {
        let handler = self.slot(eindex, name);
        handler.write = Some(hook);
        handler.flags |= OP_WRITE;
    }

    /// Register a comprehensive handler, replacing any prior binding for
    /// the name in both directions.
    pub fn set(&mut self, eindex: usize, name: &str, flags: u32, hook: HandlerHook) {
        let (read, write) = match hook {
            HandlerHook::Read(r) => (Some(r), None),
            HandlerHook::Write(w) => (None, Some(w)),
            HandlerHook::ReadWrite(r, w) => (Some(r), Some(w)),
        };
        let handler = self.slot(eindex, name);
        *handler = Handler {
            name: name.to_string(),
            flags,
            read,
            write,
        };
    }

    /// Look up a handler by element and name.
    pub fn find(&self, eindex: usize, name: &str) -> Option<&Handler> {
        let &i = self.index.get(&(eindex, name.to_string()))?;
        Some(&self.entries[i].1)
    }

    /// All handlers of one element, in registration order.
    pub fn element_handlers(&self, eindex: usize) -> impl Iterator<Item = &Handler> + '_ {
        self.entries
            .iter()
            .filter(move |(e, _)| *e == eindex)
            .map(|(_, h)| h)
    }

    /// Invoke the named read handler on a node.
    ///
    /// Returns `None` when the node is unattached or has no such
    /// readable handler.
    pub fn call_read(&self, name: &str, node: &Node, router: &dyn Router) -> Option<String> {
        let eindex = node.eindex()?;
        let hook = self.find(eindex, name)?.read.clone()?;
        Some(hook(ReadContext {
            node,
            router,
            table: self,
        }))
    }

    /// Invoke the named write handler on a node with `data`.
    ///
    /// Returns `None` when the node is unattached or has no such
    /// writable handler; otherwise the hook's result.
    pub fn call_write(
        &self,
        name: &str,
        data: &str,
        node: &mut Node,
        router: &dyn Router,
        errh: &dyn ErrorHandler,
    ) -> Option<Result<()>> {
        let eindex = node.eindex()?;
        let hook = self.find(eindex, name)?.write.clone()?;
        Some(hook(data, WriteContext { node, router }, errh))
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerTable")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// The element-facing registration façade.
///
/// Wraps the Router's [`HandlerTable`] with the element's index so an
/// element's [`add_handlers`](crate::element::Element::add_handlers) hook
/// registers under the right element without seeing the whole table.
pub struct Registrar<'a> {
    table: &'a mut HandlerTable,
    eindex: usize,
}

impl<'a> Registrar<'a> {
    /// Create a registrar for the element at `eindex`.
    pub fn new(table: &'a mut HandlerTable, eindex: usize) -> Self {
        Self { table, eindex }
    }

    /// The element index registrations go to.
    pub fn eindex(&self) -> usize {
        self.eindex
    }

    /// Register a read handler named `name`.
    pub fn add_read_handler(&mut self, name: &str, hook: ReadHook) {
        self.table.add_read(self.eindex, name, hook);
    }

    /// Register a write handler named `name`.
    pub fn add_write_handler(&mut self, name: &str, hook: WriteHook) {
        self.table.add_write(self.eindex, name, hook);
    }

    /// Register a comprehensive handler named `name` with explicit
    /// visibility `flags`.
    pub fn set_handler(&mut self, name: &str, flags: u32, hook: HandlerHook) {
        self.table.set(self.eindex, name, flags, hook);
    }
}

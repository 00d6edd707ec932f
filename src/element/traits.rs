//! The element behavior trait.

use crate::config;
use crate::element::context::{ElementContext, FlowContext};
use crate::error::{Error, Result};
use crate::handler::Registrar;
use crate::packet::Packet;
use crate::report::ErrorHandler;
use crate::task::Timer;
use std::any::Any;
use std::sync::atomic::{AtomicU32, Ordering};

/// How far an element made it through initialization before cleanup.
///
/// Passed to [`Element::cleanup`], which the Router calls exactly once per
/// element, in the inverse configure-phase order of initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CleanupStage {
    /// The element was never attached to a router.
    NoRouter,
    /// `configure` was called and failed.
    ConfigureFailed,
    /// `configure` succeeded but `initialize` was never called.
    Configured,
    /// `configure` succeeded, `initialize` failed.
    InitializeFailed,
    /// `initialize` succeeded but the router was never installed.
    Initialized,
    /// The element's router was successfully installed.
    RouterInitialized,
    /// Reserved for element code calling `cleanup` explicitly.
    Manual,
}

/// How [`Element::configuration`] should shape its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadbackMode {
    /// Yield the configuration as a single whitespace-preserving string.
    Raw,
    /// Yield the configuration split into arguments.
    Split,
}

/// Result of a configuration readback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readback {
    /// The configuration arguments (or, in [`ReadbackMode::Raw`], the
    /// whole configuration as a single entry).
    pub args: Vec<String>,
    /// Whether the default readback produced this result. Elements that
    /// reconstruct their configuration from live state set this to false;
    /// the keyword reconfiguration helper requires it.
    pub was_default: bool,
}

static RUN_TIMER_WARNINGS: AtomicU32 = AtomicU32::new(0);

/// A router element: a named, configurable dataflow node with typed ports.
///
/// Implementations override the hooks they need; every method except
/// [`class_name`](Element::class_name) has a default. Shared state (port
/// arrays, element index, statistics) lives in the element's
/// [`Node`](crate::element::Node), which the Router owns.
///
/// # Lifecycle
///
/// Build-time flow: construct, negotiate port counts
/// ([`port_count`](Element::port_count) or the legacy notify hooks),
/// resolve push/pull from [`processing`](Element::processing) and
/// [`flow_code`](Element::flow_code), then
/// [`configure`](Element::configure) (in phase order),
/// [`add_handlers`](Element::add_handlers),
/// [`initialize`](Element::initialize), optionally
/// [`take_state`](Element::take_state) during a hot-swap, and eventually
/// [`cleanup`](Element::cleanup).
///
/// # Example
///
/// ```rust,ignore
/// struct Mirror;
///
/// impl Element for Mirror {
///     fn class_name(&self) -> &'static str {
///         "Mirror"
///     }
///
///     fn port_count(&self) -> &str {
///         PORTS_1_1
///     }
///
///     fn simple_action(&mut self, packet: Packet) -> Option<Packet> {
///         Some(packet)
///     }
/// }
/// ```
pub trait Element: Send {
    /// The element's class name.
    ///
    /// Distinct elements may share a class name; it is the canonical
    /// identity used by the `class` handler and by hot-swap matching.
    fn class_name(&self) -> &'static str;

    /// Answer a role-tag query with a reference to the named capability.
    ///
    /// Elements that expose extra interfaces (a storage view, a notifier)
    /// declare them here; the framework and other elements query by tag
    /// and downcast. The default answers no roles.
    fn as_role(&self, role: &str) -> Option<&dyn Any> {
        let _ = role;
        None
    }

    /// Mutable variant of [`as_role`](Element::as_role).
    fn as_role_mut(&mut self, role: &str) -> Option<&mut dyn Any> {
        let _ = role;
        None
    }

    // ------------------------------------------------------------------
    // Declarative specifiers
    // ------------------------------------------------------------------

    /// The element's port-count specifier (see
    /// [`PortCountSpec`](crate::spec::PortCountSpec)).
    ///
    /// The default empty string selects the legacy
    /// [`notify_ninputs`](Element::notify_ninputs)/
    /// [`notify_noutputs`](Element::notify_noutputs) negotiation, which
    /// with the default hooks behaves like `"0/0"`.
    fn port_count(&self) -> &str {
        ""
    }

    /// The element's processing specifier (see
    /// [`processing_vector`](crate::spec::processing_vector)).
    ///
    /// Defaults to all-agnostic.
    fn processing(&self) -> &str {
        crate::element::AGNOSTIC
    }

    /// The element's flow code (see [`port_flow`](crate::spec::port_flow)).
    ///
    /// Defaults to [`COMPLETE_FLOW`](crate::element::COMPLETE_FLOW):
    /// packets may travel from any input to any output, which is right
    /// for the vast majority of elements.
    fn flow_code(&self) -> &str {
        crate::element::COMPLETE_FLOW
    }

    /// Free-form element flags string. Defaults to empty.
    fn flags(&self) -> &str {
        ""
    }

    /// The element's configure phase (see
    /// [`configure_phase`](crate::element::configure_phase)).
    fn configure_phase(&self) -> i32 {
        crate::element::configure_phase::DEFAULT
    }

    // ------------------------------------------------------------------
    // Legacy port negotiation (deprecated)
    // ------------------------------------------------------------------

    /// Reconcile the number of input ports the configuration uses
    /// (deprecated; use [`port_count`](Element::port_count)).
    ///
    /// Called only when the port-count specifier is empty. Returns the
    /// input port count to commit; the default ignores the request and
    /// keeps zero ports.
    fn notify_ninputs(&mut self, requested: usize) -> usize {
        let _ = requested;
        0
    }

    /// Output-side counterpart of
    /// [`notify_ninputs`](Element::notify_ninputs) (deprecated).
    fn notify_noutputs(&mut self, requested: usize) -> usize {
        let _ = requested;
        0
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Parse the element's configuration arguments.
    ///
    /// Called in configure-phase order, before
    /// [`add_handlers`](Element::add_handlers) and
    /// [`initialize`](Element::initialize). Errors go to `errh`; a
    /// failure prevents the router from initializing. Avoid side effects
    /// outside the element (no file opens, no device binding) — those
    /// belong in [`initialize`](Element::initialize), which only runs if
    /// the whole configuration is sound.
    ///
    /// The default accepts only an empty argument list.
    fn configure(
        &mut self,
        cx: &ElementContext<'_>,
        args: &[String],
        errh: &dyn ErrorHandler,
    ) -> Result<()> {
        let _ = cx;
        if args.is_empty() {
            Ok(())
        } else {
            errh.error("expected no configuration arguments");
            Err(Error::Configure("unexpected arguments".into()))
        }
    }

    /// Install the element's handlers through the registrar.
    ///
    /// Called after every `configure` succeeded and before `initialize`.
    /// The standard handlers (`class`, `name`, `config`, `ports`,
    /// `handlers`, statistics) are installed by the Router; this hook is
    /// for element-specific ones. The default does nothing.
    fn add_handlers(&mut self, reg: &mut Registrar<'_>) {
        let _ = reg;
    }

    /// Acquire external resources and perform final checks.
    ///
    /// Called just before the router goes on line, in configure-phase
    /// order; the first failure stops initialization. The default
    /// succeeds.
    fn initialize(&mut self, cx: &ElementContext<'_>, errh: &dyn ErrorHandler) -> Result<()> {
        let _ = (cx, errh);
        Ok(())
    }

    /// Take over `old`'s state during a hot-swap.
    ///
    /// Called after `initialize`, only when a configuration is hot-swapped
    /// in and [`hotswap_index`](Element::hotswap_index) named a
    /// predecessor. Most overrides start by downcasting `old` through
    /// [`as_role_mut`](Element::as_role_mut) and silently return on a
    /// class mismatch. Must leave both elements in a safe state. The
    /// default does nothing.
    fn take_state(&mut self, old: &mut dyn Element, errh: &dyn ErrorHandler) {
        let _ = (old, errh);
    }

    /// Locate a compatible element in the hot-swap router.
    ///
    /// The default returns the index of an element with the same name,
    /// which is often too loose; overriders typically add a class check.
    fn hotswap_index(&self, cx: &ElementContext<'_>) -> Option<usize> {
        let name = cx.name()?;
        cx.router().hotswap_router()?.find(&name)
    }

    /// Release state acquired during initialization.
    ///
    /// `stage` records how far the element got. Called exactly once per
    /// element, in the inverse configure-phase order, whether or not the
    /// router installed successfully. The default does nothing.
    fn cleanup(&mut self, stage: CleanupStage) {
        let _ = stage;
    }

    // ------------------------------------------------------------------
    // Live reconfiguration
    // ------------------------------------------------------------------

    /// Whether the element supports reconfiguration while the router runs.
    ///
    /// When true, the Router makes the `config` handler writable; writes
    /// invoke [`live_reconfigure`](Element::live_reconfigure).
    fn can_live_reconfigure(&self) -> bool {
        false
    }

    /// Reconfigure the element while the router is running.
    ///
    /// Like [`configure`](Element::configure), but the element already has
    /// a working configuration, which must be left undisturbed if `args`
    /// has an error. On success the Router updates the stored
    /// configuration string. The default delegates to `configure` when
    /// [`can_live_reconfigure`](Element::can_live_reconfigure) allows it.
    fn live_reconfigure(
        &mut self,
        cx: &ElementContext<'_>,
        args: &[String],
        errh: &dyn ErrorHandler,
    ) -> Result<()> {
        if self.can_live_reconfigure() {
            self.configure(cx, args, errh)
        } else {
            errh.error("cannot be reconfigured live");
            Err(Error::Invalid("live reconfiguration unsupported".into()))
        }
    }

    /// Fetch the element's current configuration arguments.
    ///
    /// The default reads the Router-stored configuration string, either
    /// whole ([`ReadbackMode::Raw`], preserving whitespace) or split into
    /// arguments, and reports `was_default = true`. Elements whose
    /// configuration can drift from the stored string (through handlers,
    /// say) override this to rebuild arguments from live state and report
    /// `was_default = false`.
    fn configuration(&self, cx: &ElementContext<'_>, mode: ReadbackMode) -> Readback {
        let stored = cx
            .eindex()
            .map(|eindex| cx.router().default_configuration_string(eindex))
            .unwrap_or_default();
        let args = match mode {
            ReadbackMode::Raw if stored.is_empty() => Vec::new(),
            ReadbackMode::Raw => vec![stored],
            ReadbackMode::Split => config::split_args(&stored),
        };
        Readback {
            args,
            was_default: true,
        }
    }

    // ------------------------------------------------------------------
    // Data plane
    // ------------------------------------------------------------------

    /// Accept a packet arriving on push input `port`.
    ///
    /// Ownership of the packet passes to the element, which must forward
    /// it downstream, queue it, or drop it. The default runs
    /// [`simple_action`](Element::simple_action) and pushes any result on
    /// output 0.
    fn push(&mut self, cx: &mut FlowContext<'_>, port: usize, packet: Packet) {
        let _ = port;
        if let Some(packet) = self.simple_action(packet) {
            cx.push(0, packet);
        }
    }

    /// Produce the next packet for pull output `port`, or `None` if no
    /// packet is available.
    ///
    /// The default pulls from input 0 and filters through
    /// [`simple_action`](Element::simple_action).
    fn pull(&mut self, cx: &mut FlowContext<'_>, port: usize) -> Option<Packet> {
        let _ = port;
        let packet = cx.pull(0)?;
        self.simple_action(packet)
    }

    /// Convenience filter hook for single-input, single-output elements.
    ///
    /// Works identically on push and pull paths; return the packet (same
    /// or replacement) to forward it, `None` to drop it. The default is
    /// the identity.
    fn simple_action(&mut self, packet: Packet) -> Option<Packet> {
        Some(packet)
    }

    // ------------------------------------------------------------------
    // Scheduler, timer, and select hooks
    // ------------------------------------------------------------------

    /// Run one quantum of the element's task.
    ///
    /// Returns true iff the call accomplished meaningful work. Elements
    /// that own a [`Task`](crate::task::Task) must override this.
    fn run_task(&mut self) -> bool {
        panic!("{}::run_task not overridden", self.class_name());
    }

    /// Run the element's timer.
    ///
    /// Elements that own a [`Timer`](crate::task::Timer) should override
    /// this. The default calls the deprecated parameterless
    /// [`run_timer_legacy`](Element::run_timer_legacy) with a one-shot
    /// warning.
    fn run_timer(&mut self, timer: &mut Timer) {
        let _ = timer;
        if RUN_TIMER_WARNINGS.fetch_add(1, Ordering::Relaxed) < 3 {
            tracing::warn!(
                element = self.class_name(),
                "calling deprecated run_timer_legacy; override run_timer(&mut Timer) instead"
            );
        }
        self.run_timer_legacy();
    }

    /// Parameterless timer hook (deprecated; override
    /// [`run_timer`](Element::run_timer) instead).
    fn run_timer_legacy(&mut self) {
        panic!("{}::run_timer not overridden", self.class_name());
    }

    /// Handle a ready file descriptor.
    ///
    /// The Master calls this when a descriptor the element registered
    /// through [`ElementContext::add_select`] is readable or writable.
    fn selected(&mut self, fd: i32) {
        let _ = fd;
        panic!("{}::selected not overridden", self.class_name());
    }

    // ------------------------------------------------------------------
    // LLRPC
    // ------------------------------------------------------------------

    /// Handle a low-level remote procedure call.
    ///
    /// Overrides should handle the commands they understand and defer the
    /// rest to the default, which returns
    /// [`Error::UnknownCommand`] so callers can fall back. Use
    /// [`local_llrpc`](crate::llrpc::local_llrpc) to invoke another
    /// element's LLRPC from element code.
    fn llrpc(&mut self, command: u32, data: &mut dyn Any) -> Result<()> {
        let _ = data;
        Err(Error::UnknownCommand(command))
    }
}

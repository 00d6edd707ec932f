//! Error reporting for configuration and spec parsing.
//!
//! Lifecycle hooks and the specifier parsers report user-facing problems through
//! an [`ErrorHandler`] rather than failing outright: a malformed flow code
//! should produce a diagnostic and a safe default, not abort graph
//! construction. The handler that receives a message decides where it goes
//! (the log, a capture buffer, or nowhere).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Sink for errors and warnings raised during element configuration,
/// initialization, and spec parsing.
pub trait ErrorHandler {
    /// Report an error.
    fn error(&self, message: &str);

    /// Report a warning.
    fn warning(&self, message: &str);

    /// Number of errors reported so far.
    fn nerrors(&self) -> usize;
}

/// Error handler that forwards to the `tracing` log.
#[derive(Debug, Default)]
pub struct LogReporter {
    errors: AtomicUsize,
}

impl LogReporter {
    /// Create a new log reporter.
    pub const fn new() -> Self {
        Self {
            errors: AtomicUsize::new(0),
        }
    }
}

impl ErrorHandler for LogReporter {
    fn error(&self, message: &str) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        tracing::error!(target: "crossbar", "{message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!(target: "crossbar", "{message}");
    }

    fn nerrors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

/// Error handler that swallows messages but still counts errors.
#[derive(Debug, Default)]
pub struct SilentReporter {
    errors: AtomicUsize,
}

impl SilentReporter {
    /// Create a new silent reporter.
    pub const fn new() -> Self {
        Self {
            errors: AtomicUsize::new(0),
        }
    }
}

impl ErrorHandler for SilentReporter {
    fn error(&self, _message: &str) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    fn warning(&self, _message: &str) {}

    fn nerrors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

/// Error handler that captures messages for later inspection.
///
/// Used by tests and by control planes that relay diagnostics to a remote
/// caller.
#[derive(Debug, Default)]
pub struct BufferedReporter {
    errors: AtomicUsize,
    messages: Mutex<Vec<String>>,
}

impl BufferedReporter {
    /// Create a new buffering reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of all captured messages, errors and warnings alike.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Drain the captured messages.
    pub fn take_messages(&self) -> Vec<String> {
        std::mem::take(&mut self.messages.lock().unwrap())
    }
}

impl ErrorHandler for BufferedReporter {
    fn error(&self, message: &str) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn warning(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn nerrors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

/// Error handler that prefixes every message with an element label before
/// forwarding it to an inner handler.
///
/// This is how diagnostics raised deep in spec parsing name the element
/// they belong to.
pub struct ContextReporter<'a> {
    label: String,
    inner: &'a dyn ErrorHandler,
}

impl<'a> ContextReporter<'a> {
    /// Wrap `inner`, prefixing messages with `label`.
    pub fn new(label: impl Into<String>, inner: &'a dyn ErrorHandler) -> Self {
        Self {
            label: label.into(),
            inner,
        }
    }
}

impl ErrorHandler for ContextReporter<'_> {
    fn error(&self, message: &str) {
        self.inner.error(&format!("{}: {message}", self.label));
    }

    fn warning(&self, message: &str) {
        self.inner.warning(&format!("{}: {message}", self.label));
    }

    fn nerrors(&self) -> usize {
        self.inner.nerrors()
    }
}

static DEFAULT_REPORTER: LogReporter = LogReporter::new();
static SILENT_REPORTER: SilentReporter = SilentReporter::new();

/// The process-wide default error handler (logs through `tracing`).
pub fn default_handler() -> &'static dyn ErrorHandler {
    &DEFAULT_REPORTER
}

/// The process-wide silent error handler.
pub fn silent_handler() -> &'static dyn ErrorHandler {
    &SILENT_REPORTER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_reporter_captures() {
        let errh = BufferedReporter::new();
        errh.error("bad spec");
        errh.warning("tickets pinned at 1");
        assert_eq!(errh.nerrors(), 1);
        assert_eq!(errh.messages(), vec!["bad spec", "tickets pinned at 1"]);
    }

    #[test]
    fn test_context_reporter_prefixes() {
        let inner = BufferedReporter::new();
        let errh = ContextReporter::new("Classifier", &inner);
        errh.error("bad port count");
        assert_eq!(inner.messages(), vec!["Classifier: bad port count"]);
        assert_eq!(errh.nerrors(), 1);
    }

    #[test]
    fn test_silent_reporter_counts() {
        let errh = SilentReporter::new();
        errh.error("one");
        errh.error("two");
        assert_eq!(errh.nerrors(), 2);
    }
}

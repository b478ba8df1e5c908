//! Messages raised by components while initializing or stepping.

use core::fmt;

/// Severity of a diagnostic. `Fatal` requests a stop at the next step
/// boundary; everything below is informational.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub component: String,
    /// Steps completed when the message was raised.
    pub step: u64,
    pub time: f64,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} (step {}, t = {} s): {}",
            self.severity, self.component, self.step, self.time, self.message
        )
    }
}

/// Receiver of diagnostics. Shared by every component of a batch, so it must
/// tolerate concurrent calls.
pub trait DiagnosticSink: Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

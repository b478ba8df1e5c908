//! Run-wide diagnostics log and stop flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tlm_components::{Diagnostic, DiagnosticSink, Severity};

/// Collects diagnostics from every component and mirrors them to `tracing`.
///
/// A `Fatal` record raises the stop flag; the scheduler checks it between
/// steps.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    records: Mutex<Vec<Diagnostic>>,
    stop: AtomicBool,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Diagnostic> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// First fatal record still held, if any.
    pub fn first_fatal(&self) -> Option<Diagnostic> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|d| d.severity == Severity::Fatal)
            .cloned()
    }

    pub fn reset(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.stop.store(false, Ordering::Release);
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn emit(&self, d: Diagnostic) {
        let (component, step, time) = (d.component.as_str(), d.step, d.time);
        match d.severity {
            Severity::Debug => tracing::debug!(component, step, time, "{}", d.message),
            Severity::Info => tracing::info!(component, step, time, "{}", d.message),
            Severity::Warning => tracing::warn!(component, step, time, "{}", d.message),
            Severity::Error => tracing::error!(component, step, time, "{}", d.message),
            Severity::Fatal => {
                tracing::error!(component, step, time, fatal = true, "{}", d.message);
                self.stop.store(true, Ordering::Release);
            }
        }
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(severity: Severity, message: &str) -> Diagnostic {
        Diagnostic {
            severity,
            component: "c".into(),
            step: 0,
            time: 0.0,
            message: message.into(),
        }
    }

    #[test]
    fn fatal_raises_stop() {
        let log = DiagnosticLog::new();
        log.emit(record(Severity::Warning, "w"));
        assert!(!log.stop_requested());
        log.emit(record(Severity::Fatal, "boom"));
        assert!(log.stop_requested());
        assert_eq!(log.first_fatal().unwrap().message, "boom");
    }

    #[test]
    fn take_drains_but_keeps_stop() {
        let log = DiagnosticLog::new();
        log.emit(record(Severity::Fatal, "boom"));
        assert_eq!(log.take().len(), 1);
        assert!(log.records().is_empty());
        assert!(log.stop_requested());
        log.reset();
        assert!(!log.stop_requested());
    }
}

//! User-facing message channel.
//!
//! Components that need to tell the user something (a skipped file, a
//! finished analysis, a failed request) go through [`Notifier`] rather than
//! printing, so the same code drives the CLI and the tests.

use std::sync::Mutex;

/// Message severity, in increasing order of importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Sink for user-visible diagnostics.
pub trait Notifier: Send + Sync {
    /// Emit one message at the given severity.
    fn notify(&self, severity: Severity, message: &str);

    fn info(&self, message: &str) {
        self.notify(Severity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.notify(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(Severity::Error, message);
    }
}

/// Notifier that drops every message.
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _severity: Severity, _message: &str) {}
}

/// Notifier that keeps every message in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all messages received so far.
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Messages of one severity.
    pub fn with_severity(&self, severity: Severity) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((severity, message.to_string()));
    }
}

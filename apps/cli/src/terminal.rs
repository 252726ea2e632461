//! Terminal front end for session feedback: messages on stderr and an
//! indicatif spinner while the model is working.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use studybuddy_core::{Activity, ProgressReporter};
use studybuddy_shared::{Notifier, Severity};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Prints notifications and drives one spinner at a time.
#[derive(Default)]
pub(crate) struct Terminal {
    spinner: Mutex<Option<ProgressBar>>,
}

impl Terminal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn spinner(message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }
}

/// Prefix shown before a message of the given severity.
pub(crate) fn prefix(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "",
        Severity::Warning => "warning: ",
        Severity::Error => "error: ",
    }
}

impl Notifier for Terminal {
    fn notify(&self, severity: Severity, message: &str) {
        let line = format!("{}{message}", prefix(severity));
        let guard = self
            .spinner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match guard.as_ref() {
            // Keep the spinner line intact while printing above it.
            Some(spinner) => spinner.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }
    }
}

impl ProgressReporter for Terminal {
    fn started(&self, activity: Activity) {
        let mut guard = self
            .spinner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = guard.take() {
            previous.finish_and_clear();
        }
        *guard = Some(Self::spinner(activity.label()));
    }

    fn finished(&self, _activity: Activity) {
        let mut guard = self
            .spinner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(spinner) = guard.take() {
            spinner.finish_and_clear();
        }
    }
}

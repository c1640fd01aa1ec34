//! User-visible alerts and diagnostic reporting.
//!
//! Every side effect of a voice session flows through one of two traits:
//! [`AlertSink`] for modal, user-facing messages and [`DiagnosticReporter`]
//! for log-only messages. Collector implementations record what was emitted.

use crate::defaults;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// A modal message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Shown when microphone permission was not granted.
    pub fn permission_required() -> Self {
        Self::new(
            defaults::PERMISSION_ALERT_TITLE,
            defaults::PERMISSION_ALERT_MESSAGE,
        )
    }

    /// Shown when the engine reports a microphone failure.
    pub fn microphone_unavailable() -> Self {
        Self::new(
            defaults::MICROPHONE_ALERT_TITLE,
            defaults::MICROPHONE_ALERT_MESSAGE,
        )
    }
}

/// Severity of a diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Warn,
    Error,
}

/// A log-only message; never shown as an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

impl Diagnostic {
    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warn,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            DiagnosticLevel::Warn => write!(f, "warning: {}", self.message),
            DiagnosticLevel::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// Presents alerts to the user.
pub trait AlertSink: Send + Sync {
    fn show(&self, alert: &Alert);
}

/// Receives diagnostic lines.
pub trait DiagnosticReporter: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl DiagnosticReporter for LogReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic.level {
            DiagnosticLevel::Warn => log::warn!("{}", diagnostic.message),
            DiagnosticLevel::Error => log::error!("{}", diagnostic.message),
        }
    }
}

/// Records alerts in memory. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct CollectorAlertSink {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl CollectorAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts shown so far, oldest first.
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self) -> usize {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl AlertSink for CollectorAlertSink {
    fn show(&self, alert: &Alert) {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(alert.clone());
    }
}

/// Records diagnostics in memory and also forwards them to [`LogReporter`].
#[derive(Debug, Clone, Default)]
pub struct CollectorReporter {
    diagnostics: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CollectorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self) -> usize {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl DiagnosticReporter for CollectorReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        LogReporter.report(diagnostic);
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}

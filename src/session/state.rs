//! Session state types.

use std::fmt;

/// What the UI renders: the listening flag and the current transcript.
///
/// `text` is always replaced as a whole, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub listening: bool,
    pub text: String,
}

impl SessionState {
    pub fn new(listening: bool, text: impl Into<String>) -> Self {
        Self {
            listening,
            text: text.into(),
        }
    }

    /// Same transcript, different listening flag.
    pub fn with_listening(&self, listening: bool) -> Self {
        Self {
            listening,
            text: self.text.clone(),
        }
    }
}

/// Controller lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Not listening, nothing in flight
    #[default]
    Idle,
    /// Waiting for the permission gate
    RequestingPermission,
    /// Permission granted, waiting for the engine to start
    Starting,
    /// Engine started
    Listening,
    /// Waiting for the engine to stop
    Stopping,
}

impl Phase {
    /// A transition is awaiting a collaborator.
    pub fn is_transitioning(self) -> bool {
        matches!(
            self,
            Phase::RequestingPermission | Phase::Starting | Phase::Stopping
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Idle => "idle",
            Phase::RequestingPermission => "requesting permission",
            Phase::Starting => "starting",
            Phase::Listening => "listening",
            Phase::Stopping => "stopping",
        };
        f.write_str(label)
    }
}

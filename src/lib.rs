//! listenkit - permission-gated voice sessions
//!
//! Requests microphone access, drives a speech-recognition engine, and reduces
//! its events into a listening flag plus the live transcript.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod notify;
pub mod permission;
pub mod session;
#[cfg(feature = "cli")]
pub mod terminal;
pub mod view;

// Collaborator traits
pub use engine::{RecognitionEngine, RecognitionEvent, Subscription};
pub use notify::{AlertSink, DiagnosticReporter};
pub use permission::{PermissionApi, PermissionGate};

// Session
pub use session::{Phase, SessionController, SessionParts, SessionState, ToggleOutcome};
pub use view::SessionView;

// Error handling
pub use error::{ListenError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(ver.contains('+'), "expected '+' in {}", ver);
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}

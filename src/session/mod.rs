//! Voice session: state, event reducer and controller.

pub mod controller;
pub mod reducer;
pub mod state;

pub use controller::{SessionController, SessionParts, ToggleOutcome};
pub use reducer::{Effect, Reduction, reduce, replay};
pub use state::{Phase, SessionState};

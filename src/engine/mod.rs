//! Speech-recognition engine boundary.

pub mod event;
pub mod recognizer;
pub mod simulated;
pub mod subscription;

pub use event::{ErrorCode, RecognitionEvent};
pub use recognizer::{EventSender, RecognitionEngine};
pub use simulated::SimulatedEngine;
pub use subscription::Subscription;

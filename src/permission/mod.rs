//! Microphone authorization.

pub mod api;
pub mod fake;
pub mod gate;

pub use api::{Capability, PermissionApi, PermissionStatus, Platform};
pub use fake::FakePermissionApi;
pub use gate::{PermissionDecision, PermissionGate};

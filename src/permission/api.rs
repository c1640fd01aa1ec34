//! Platform permission service boundary.

use crate::error::{ListenError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An OS-mediated access right that needs user authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Microphone,
}

impl Capability {
    /// Permission identifier the platform expects for this capability.
    pub fn platform_name(self, platform: Platform) -> &'static str {
        match (self, platform) {
            (Capability::Microphone, Platform::Ios) => "ios.permission.MICROPHONE",
            (Capability::Microphone, Platform::Android) => "android.permission.RECORD_AUDIO",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Microphone => write!(f, "microphone"),
        }
    }
}

/// Target platform; decides how capabilities are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Android,
    Ios,
}

impl FromStr for Platform {
    type Err = ListenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            other => Err(ListenError::ConfigInvalidValue {
                key: "session.platform".to_string(),
                message: format!("unknown platform '{other}', expected android or ios"),
            }),
        }
    }
}

/// Raw status reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    /// Not granted; the platform may still prompt.
    Denied,
    /// Permanently denied; the platform will not prompt again.
    Blocked,
    Limited,
    Unavailable,
}

impl PermissionStatus {
    /// Only a full grant authorizes capture.
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Queryable permission service.
///
/// `request` may suspend while a system dialog is on screen.
#[async_trait::async_trait]
pub trait PermissionApi: Send + Sync {
    async fn check(&self, capability: Capability) -> Result<PermissionStatus>;
    async fn request(&self, capability: Capability) -> Result<PermissionStatus>;
}

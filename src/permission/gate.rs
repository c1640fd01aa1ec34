//! Permission gate: turns platform statuses into a grant decision.

use crate::error::Result;
use crate::notify::{Diagnostic, DiagnosticReporter};
use crate::permission::api::{Capability, PermissionApi, PermissionStatus};
use std::sync::Arc;

/// Outcome of a start attempt's permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    Granted,
    Denied,
}

impl From<PermissionStatus> for PermissionDecision {
    fn from(status: PermissionStatus) -> Self {
        if status.is_granted() {
            PermissionDecision::Granted
        } else {
            PermissionDecision::Denied
        }
    }
}

/// Checks, and if needed requests, a capability.
///
/// Decisions are never cached: every call goes back to the platform, which
/// owns the "prompt at most once" policy.
pub struct PermissionGate {
    api: Arc<dyn PermissionApi>,
    diagnostics: Arc<dyn DiagnosticReporter>,
}

impl PermissionGate {
    pub fn new(api: Arc<dyn PermissionApi>, diagnostics: Arc<dyn DiagnosticReporter>) -> Self {
        Self { api, diagnostics }
    }

    /// Resolve `capability` to a decision. Never fails: platform errors are
    /// reported and count as [`PermissionDecision::Denied`].
    pub async fn ensure_granted(&self, capability: Capability) -> PermissionDecision {
        match self.resolve(capability).await {
            Ok(decision) => decision,
            Err(e) => {
                self.diagnostics
                    .report(&Diagnostic::error(format!("Permission error: {e}")));
                PermissionDecision::Denied
            }
        }
    }

    async fn resolve(&self, capability: Capability) -> Result<PermissionDecision> {
        if self.api.check(capability).await?.is_granted() {
            return Ok(PermissionDecision::Granted);
        }
        let status = self.api.request(capability).await?;
        log::debug!("{capability} request answered with {status:?}");
        Ok(status.into())
    }
}

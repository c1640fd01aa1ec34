//! In-process permission service for tests and the terminal demo.

use crate::error::{ListenError, Result};
use crate::permission::api::{Capability, PermissionApi, PermissionStatus};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug)]
struct FakeState {
    status: PermissionStatus,
    prompt_answer: PermissionStatus,
    permanent_denial: bool,
    failure: Option<String>,
    prompt_delay: Option<Duration>,
}

/// Permission service with scripted answers.
///
/// Models the platform contract: a prompt is only shown while the status is
/// neither granted nor blocked, and with permanent denial enabled a refused
/// prompt moves the status to [`PermissionStatus::Blocked`].
#[derive(Debug)]
pub struct FakePermissionApi {
    state: Mutex<FakeState>,
    checks: AtomicUsize,
    requests: AtomicUsize,
    prompts: AtomicUsize,
}

impl FakePermissionApi {
    fn with_status(status: PermissionStatus, prompt_answer: PermissionStatus) -> Self {
        Self {
            state: Mutex::new(FakeState {
                status,
                prompt_answer,
                permanent_denial: false,
                failure: None,
                prompt_delay: None,
            }),
            checks: AtomicUsize::new(0),
            requests: AtomicUsize::new(0),
            prompts: AtomicUsize::new(0),
        }
    }

    /// Capability already granted; no prompt will be shown.
    pub fn granted() -> Self {
        Self::with_status(PermissionStatus::Granted, PermissionStatus::Granted)
    }

    /// Not yet decided; the prompt will be answered with `answer`.
    pub fn undetermined(answer: PermissionStatus) -> Self {
        Self::with_status(PermissionStatus::Denied, answer)
    }

    /// A refused prompt blocks further prompting.
    pub fn with_permanent_denial(self) -> Self {
        self.lock().permanent_denial = true;
        self
    }

    /// Every check and request fails with a platform error.
    pub fn with_failure(self, message: &str) -> Self {
        self.lock().failure = Some(message.to_string());
        self
    }

    /// Prompts take this long to be answered.
    pub fn with_prompt_delay(self, delay: Duration) -> Self {
        self.lock().prompt_delay = Some(delay);
        self
    }

    pub fn status(&self) -> PermissionStatus {
        self.lock().status
    }

    pub fn check_count(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Number of system dialogs that would have been shown.
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fail_if_configured(&self, capability: Capability) -> Result<()> {
        match &self.lock().failure {
            Some(message) => Err(ListenError::PermissionQuery {
                capability: capability.to_string(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl PermissionApi for FakePermissionApi {
    async fn check(&self, capability: Capability) -> Result<PermissionStatus> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.fail_if_configured(capability)?;
        Ok(self.status())
    }

    async fn request(&self, capability: Capability) -> Result<PermissionStatus> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.fail_if_configured(capability)?;

        let (status, delay) = {
            let state = self.lock();
            (state.status, state.prompt_delay)
        };
        if matches!(status, PermissionStatus::Granted | PermissionStatus::Blocked) {
            return Ok(status);
        }

        self.prompts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        let answer = state.prompt_answer;
        state.status = if !answer.is_granted() && state.permanent_denial {
            PermissionStatus::Blocked
        } else {
            answer
        };
        Ok(answer)
    }
}

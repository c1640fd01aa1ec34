//! Voice session controller.
//!
//! Owns the session state, gates start on the permission check, drives the
//! engine, and applies engine events through the reducer. A single pump task
//! consumes the event channel so events are applied in emission order.

use crate::engine::event::RecognitionEvent;
use crate::engine::recognizer::RecognitionEngine;
use crate::engine::subscription::Subscription;
use crate::notify::{Alert, AlertSink, Diagnostic, DiagnosticReporter};
use crate::permission::{Capability, PermissionApi, PermissionDecision, PermissionGate};
use crate::session::reducer::{Effect, reduce};
use crate::session::state::{Phase, SessionState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// What a call to [`SessionController::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Permission granted and the engine started
    Started,
    /// The engine stopped
    Stopped,
    /// Permission refused; the engine was not called
    PermissionDenied,
    /// Another transition was in flight
    Ignored,
    /// The engine call failed; the session is back to idle
    Failed,
}

/// External collaborators of a session.
pub struct SessionParts {
    pub engine: Arc<dyn RecognitionEngine>,
    pub permissions: Arc<dyn PermissionApi>,
    pub alerts: Arc<dyn AlertSink>,
    pub diagnostics: Arc<dyn DiagnosticReporter>,
}

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    phase: Phase,
    /// A terminal event arrived while the engine was starting.
    ended_while_starting: bool,
    /// The controller was torn down; events are no longer applied.
    released: bool,
}

/// State shared between the controller and its event pump.
struct Core {
    inner: Mutex<Inner>,
    published: watch::Sender<SessionState>,
    alerts: Arc<dyn AlertSink>,
    diagnostics: Arc<dyn DiagnosticReporter>,
}

impl Core {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::Alert(alert) => self.alerts.show(&alert),
            Effect::Diagnostic(diagnostic) => self.diagnostics.report(&diagnostic),
        }
    }

    /// Effects run before the new state is published, so an observer that
    /// sees the state also sees its alert.
    fn commit(&self, inner: &mut Inner, state: SessionState, effect: Option<Effect>) {
        if let Some(effect) = effect {
            self.run_effect(effect);
        }
        inner.state = state.clone();
        self.published.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    fn apply(&self, event: &RecognitionEvent) {
        let mut inner = self.lock();
        if inner.released {
            log::trace!("Dropped {event:?} after release");
            return;
        }
        let reduction = reduce(event, &inner.state);

        match inner.phase {
            Phase::Idle if reduction.state.listening => inner.phase = Phase::Listening,
            Phase::Listening if !reduction.state.listening => inner.phase = Phase::Idle,
            Phase::Starting if event.is_terminal() => inner.ended_while_starting = true,
            _ => {}
        }

        log::trace!("{event:?} -> {:?} ({})", reduction.state, inner.phase);
        self.commit(&mut inner, reduction.state, reduction.effect);
    }

    /// Permission granted; only terminal events from here on can cancel
    /// the start.
    fn begin_start(&self) {
        let mut inner = self.lock();
        inner.ended_while_starting = false;
        inner.phase = Phase::Starting;
    }

    fn release(&self) {
        self.lock().released = true;
    }

    fn settle_idle(&self, effect: Option<Effect>) {
        let mut inner = self.lock();
        inner.phase = Phase::Idle;
        let state = inner.state.with_listening(false);
        self.commit(&mut inner, state, effect);
    }

    fn settle_listening(&self) {
        let mut inner = self.lock();
        if std::mem::take(&mut inner.ended_while_starting) {
            log::debug!("Session ended before start completed");
            inner.phase = Phase::Idle;
            return;
        }
        inner.phase = Phase::Listening;
        let state = inner.state.with_listening(true);
        self.commit(&mut inner, state, None);
    }
}

/// Controller for a single voice session.
///
/// Created by [`SessionController::mount`], which subscribes to the engine;
/// torn down by [`SessionController::dispose`] or by dropping it. Either way
/// the subscription is released exactly once and no event is published
/// afterwards. Only `dispose` also waits for the event pump to finish.
pub struct SessionController {
    core: Arc<Core>,
    engine: Arc<dyn RecognitionEngine>,
    gate: PermissionGate,
    locale: String,
    subscription: Option<Subscription>,
    pump: Option<JoinHandle<()>>,
}

impl SessionController {
    /// Subscribe to the engine and start applying its events.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(parts: SessionParts, locale: impl Into<String>) -> Self {
        let SessionParts {
            engine,
            permissions,
            alerts,
            diagnostics,
        } = parts;

        let (published, _) = watch::channel(SessionState::default());
        let core = Arc::new(Core {
            inner: Mutex::new(Inner::default()),
            published,
            alerts,
            diagnostics: Arc::clone(&diagnostics),
        });

        let (tx, mut rx) = mpsc::unbounded_channel::<RecognitionEvent>();
        let subscription = engine.subscribe(tx);

        let pump_core = Arc::clone(&core);
        let pump = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                pump_core.apply(&event);
            }
        });

        Self {
            core,
            engine,
            gate: PermissionGate::new(permissions, diagnostics),
            locale: locale.into(),
            subscription: Some(subscription),
            pump: Some(pump),
        }
    }

    /// Start listening when idle, stop when listening.
    ///
    /// Never fails. A call made while another transition is still awaiting
    /// the permission gate or the engine is ignored.
    pub async fn toggle(&self) -> ToggleOutcome {
        let starting = {
            let mut inner = self.core.lock();
            if inner.phase.is_transitioning() {
                log::debug!("Toggle ignored while {}", inner.phase);
                return ToggleOutcome::Ignored;
            }
            let starting = !(inner.state.listening || inner.phase == Phase::Listening);
            if starting {
                inner.phase = Phase::RequestingPermission;
            } else {
                inner.phase = Phase::Stopping;
            }
            starting
        };

        if starting {
            self.start_session().await
        } else {
            self.stop_session().await
        }
    }

    async fn start_session(&self) -> ToggleOutcome {
        if self.gate.ensure_granted(Capability::Microphone).await == PermissionDecision::Denied {
            log::info!("Microphone permission denied");
            self.core
                .settle_idle(Some(Effect::Alert(Alert::permission_required())));
            return ToggleOutcome::PermissionDenied;
        }

        self.core.begin_start();
        match self.engine.start(&self.locale).await {
            Ok(()) => {
                log::info!("Listening ({})", self.locale);
                self.core.settle_listening();
                ToggleOutcome::Started
            }
            Err(e) => {
                self.core.settle_idle(Some(Effect::Diagnostic(Diagnostic::error(
                    format!("Engine start error: {e}"),
                ))));
                ToggleOutcome::Failed
            }
        }
    }

    async fn stop_session(&self) -> ToggleOutcome {
        match self.engine.stop().await {
            Ok(()) => {
                log::info!("Stopped listening");
                self.core.settle_idle(None);
                ToggleOutcome::Stopped
            }
            Err(e) => {
                self.core.settle_idle(Some(Effect::Diagnostic(Diagnostic::error(
                    format!("Engine stop error: {e}"),
                ))));
                ToggleOutcome::Failed
            }
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.core.lock().state.clone()
    }

    pub fn phase(&self) -> Phase {
        self.core.lock().phase
    }

    /// Receiver that observes every published state change.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.core.published.subscribe()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Release the engine subscription and stop applying events.
    ///
    /// Safe while listening; the engine is not stopped.
    pub async fn dispose(mut self) {
        self.release();
        if let Some(pump) = self.pump.take()
            && let Err(e) = pump.await
            && !e.is_cancelled()
        {
            log::warn!("Event pump ended abnormally: {e}");
        }
    }

    fn release(&mut self) {
        self.core.release();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        if let Some(pump) = &self.pump {
            pump.abort();
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.release();
    }
}

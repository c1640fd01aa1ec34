//! In-process recognition engine.
//!
//! Nothing is recognized here: events are injected with
//! [`SimulatedEngine::emit`] and fanned out to every live subscriber. The
//! engine records the calls it receives so tests can assert on them.

use crate::engine::event::RecognitionEvent;
use crate::engine::recognizer::{EventSender, RecognitionEngine};
use crate::engine::subscription::Subscription;
use crate::error::{ListenError, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct EngineState {
    subscribers: Vec<(u64, EventSender)>,
    next_id: u64,
    running: bool,
    start_calls: Vec<String>,
    stop_calls: usize,
    start_failure: Option<String>,
    stop_failure: Option<String>,
    start_delay: Option<Duration>,
    stop_delay: Option<Duration>,
    announce_start: bool,
}

/// Scriptable engine. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct SimulatedEngine {
    state: Arc<Mutex<EngineState>>,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// `start` fails with this message.
    pub fn with_start_failure(self, message: &str) -> Self {
        self.lock().start_failure = Some(message.to_string());
        self
    }

    /// `stop` fails with this message.
    pub fn with_stop_failure(self, message: &str) -> Self {
        self.lock().stop_failure = Some(message.to_string());
        self
    }

    /// `start` takes this long to complete.
    pub fn with_start_delay(self, delay: Duration) -> Self {
        self.lock().start_delay = Some(delay);
        self
    }

    pub fn with_stop_delay(self, delay: Duration) -> Self {
        self.lock().stop_delay = Some(delay);
        self
    }

    /// Emit [`RecognitionEvent::Start`] as soon as `start` succeeds.
    pub fn announcing_start(self) -> Self {
        self.lock().announce_start = true;
        self
    }

    /// Deliver `event` to every live subscriber; returns how many received it.
    pub fn emit(&self, event: RecognitionEvent) -> usize {
        let mut state = self.lock();
        if event.is_terminal() {
            state.running = false;
        }
        state
            .subscribers
            .retain(|(_, sender)| sender.send(event.clone()).is_ok());
        state.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Locales passed to `start`, in call order.
    pub fn start_calls(&self) -> Vec<String> {
        self.lock().start_calls.clone()
    }

    pub fn stop_calls(&self) -> usize {
        self.lock().stop_calls
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl RecognitionEngine for SimulatedEngine {
    async fn start(&self, locale: &str) -> Result<()> {
        let delay = {
            let mut state = self.lock();
            state.start_calls.push(locale.to_string());
            state.start_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let announce = {
            let mut state = self.lock();
            if let Some(message) = &state.start_failure {
                return Err(ListenError::EngineStart {
                    message: message.clone(),
                });
            }
            state.running = true;
            state.announce_start
        };
        if announce {
            self.emit(RecognitionEvent::Start);
        }
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        let delay = {
            let mut state = self.lock();
            state.stop_calls += 1;
            state.stop_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        if let Some(message) = &state.stop_failure {
            return Err(ListenError::EngineStop {
                message: message.clone(),
            });
        }
        state.running = false;
        Ok(())
    }

    fn subscribe(&self, events: EventSender) -> Subscription {
        let id = {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.push((id, events));
            id
        };

        let shared = Arc::clone(&self.state);
        Subscription::new(move || {
            shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .subscribers
                .retain(|(sub_id, _)| *sub_id != id);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn emit_reaches_subscribers_in_order() {
        let engine = SimulatedEngine::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _sub = engine.subscribe(tx);

        assert_eq!(engine.emit(RecognitionEvent::Start), 1);
        assert_eq!(engine.emit(RecognitionEvent::partial(["hi"])), 1);

        assert_eq!(rx.recv().await.unwrap(), RecognitionEvent::Start);
        assert_eq!(rx.recv().await.unwrap(), RecognitionEvent::partial(["hi"]));
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let engine = SimulatedEngine::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sub = engine.subscribe(tx);
        sub.unsubscribe();

        assert_eq!(engine.subscriber_count(), 0);
        assert_eq!(engine.emit(RecognitionEvent::Start), 0);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn only_the_released_subscriber_is_removed() {
        let engine = SimulatedEngine::new();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, _rx_b) = mpsc::unbounded_channel();
        let sub_a = engine.subscribe(tx_a);
        let _sub_b = engine.subscribe(tx_b);

        drop(sub_a);
        assert_eq!(engine.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn closed_receivers_are_pruned_on_emit() {
        let engine = SimulatedEngine::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let _sub = engine.subscribe(tx);
        drop(rx);

        assert_eq!(engine.emit(RecognitionEvent::Start), 0);
        assert_eq!(engine.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn start_records_locale_and_runs() {
        let engine = SimulatedEngine::new();
        engine.start("fr-FR").await.unwrap();

        assert_eq!(engine.start_calls(), vec!["fr-FR".to_string()]);
        assert!(engine.is_running());

        engine.stop().await.unwrap();
        assert!(!engine.is_running());
        assert_eq!(engine.stop_calls(), 1);
    }

    #[tokio::test]
    async fn announcing_start_emits_start_event() {
        let engine = SimulatedEngine::new().announcing_start();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _sub = engine.subscribe(tx);

        engine.start("en-US").await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), RecognitionEvent::Start);
    }

    #[tokio::test]
    async fn configured_failures_surface_as_engine_errors() {
        let engine = SimulatedEngine::new()
            .with_start_failure("mic busy")
            .with_stop_failure("not started");

        assert!(matches!(
            engine.start("fr-FR").await,
            Err(ListenError::EngineStart { .. })
        ));
        assert!(!engine.is_running());
        assert!(matches!(
            engine.stop().await,
            Err(ListenError::EngineStop { .. })
        ));
    }

    #[tokio::test]
    async fn delayed_stop_counts_the_call_immediately() {
        let engine = SimulatedEngine::new().with_stop_delay(Duration::from_millis(30));
        engine.start("fr-FR").await.unwrap();

        let stopping = engine.clone();
        let handle = tokio::spawn(async move { stopping.stop().await });
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(engine.stop_calls(), 1);
        assert!(engine.is_running());

        handle.await.unwrap().unwrap();
        assert!(!engine.is_running());
    }

    #[tokio::test]
    async fn terminal_event_clears_running() {
        let engine = SimulatedEngine::new();
        engine.start("fr-FR").await.unwrap();
        engine.emit(RecognitionEvent::final_result(["done"]));
        assert!(!engine.is_running());
    }
}

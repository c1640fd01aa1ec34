use crate::engine::event::RecognitionEvent;
use crate::engine::subscription::Subscription;
use crate::error::Result;
use tokio::sync::mpsc;

/// Channel end an engine pushes events into.
pub type EventSender = mpsc::UnboundedSender<RecognitionEvent>;

/// Trait for speech-recognition engines.
///
/// Callbacks are replaced by a channel: `subscribe` hands the engine a sender
/// and returns a [`Subscription`]. Once that subscription is released the
/// engine must not deliver further events to the sender.
#[async_trait::async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Begin recognition in `locale`.
    async fn start(&self, locale: &str) -> Result<()>;

    /// End recognition.
    async fn stop(&self) -> Result<()>;

    /// Register an event listener.
    fn subscribe(&self, events: EventSender) -> Subscription;
}

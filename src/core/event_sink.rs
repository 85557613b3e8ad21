use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use crate::tutor::types::AnswerEvent;

const DEFAULT_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("transient sink failure: {0}")]
    Transient(String),
}

/// Destination for graded answers.
///
/// `record` is called on the answer path, so implementations hand the event
/// off and return immediately; they never wait on storage.
pub trait EventSink: Send + Sync {
    fn record(&self, event: AnswerEvent) -> Result<(), SinkError>;
}

/// Queues events onto a bounded channel drained by a background task.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: mpsc::Sender<AnswerEvent>,
}

impl ChannelEventSink {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<AnswerEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    pub fn with_default_capacity() -> (Self, mpsc::Receiver<AnswerEvent>) {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl EventSink for ChannelEventSink {
    fn record(&self, event: AnswerEvent) -> Result<(), SinkError> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(event)) => Err(SinkError::Transient(format!(
                "event queue full, dropped {}",
                event.item_id
            ))),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(SinkError::Transient("event queue closed".to_string()))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<AnswerEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnswerEvent> {
        self.events.lock().clone()
    }
}

impl EventSink for MemoryEventSink {
    fn record(&self, event: AnswerEvent) -> Result<(), SinkError> {
        debug!(item_id = %event.item_id, correct = event.correct, "answer event recorded");
        self.events.lock().push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutor::types::Mode;

    fn sample_event(item: &str) -> AnswerEvent {
        AnswerEvent {
            mode: Mode::Vocabulary,
            item_id: item.to_string(),
            correct: true,
            timestamp: 1_700_000_000_000,
        }
    }

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let (sink, mut receiver) = ChannelEventSink::new(4);
        sink.record(sample_event("en-cat")).unwrap();
        let received = receiver.recv().await.unwrap();
        assert_eq!(received.item_id, "en-cat");
    }

    #[tokio::test]
    async fn test_channel_sink_full_and_closed_are_transient() {
        let (sink, receiver) = ChannelEventSink::new(1);
        sink.record(sample_event("en-cat")).unwrap();
        assert!(matches!(
            sink.record(sample_event("en-dog")),
            Err(SinkError::Transient(_))
        ));

        drop(receiver);
        assert!(matches!(
            sink.record(sample_event("en-sun")),
            Err(SinkError::Transient(_))
        ));
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemoryEventSink::new();
        sink.record(sample_event("en-cat")).unwrap();
        sink.record(sample_event("en-dog")).unwrap();
        let items: Vec<_> = sink.events().into_iter().map(|e| e.item_id).collect();
        assert_eq!(items, vec!["en-cat", "en-dog"]);
    }
}

pub mod event_sink;

pub use event_sink::{ChannelEventSink, EventSink, MemoryEventSink, SinkError};

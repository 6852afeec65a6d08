//! Delivery of finished log records.

mod channel;
mod error;
mod loki;

use async_trait::async_trait;

use crate::record::LogRecord;

pub use channel::ChannelSink;
pub use error::SinkError;
pub use loki::{LokiPayload, LokiSink, LokiStream};

/// Destination for classified log records.
///
/// Delivery is fire-and-forget from the monitor's point of view: an error is
/// logged and the record dropped.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Deliver a single record.
    async fn send(&self, record: &LogRecord) -> Result<(), SinkError>;
}

#[async_trait]
impl<S: Sink + ?Sized> Sink for Box<S> {
    async fn send(&self, record: &LogRecord) -> Result<(), SinkError> {
        (**self).send(record).await
    }
}

#[async_trait]
impl<S: Sink + ?Sized> Sink for std::sync::Arc<S> {
    async fn send(&self, record: &LogRecord) -> Result<(), SinkError> {
        (**self).send(record).await
    }
}

//! In-process sink that forwards records over a tokio channel.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{Sink, SinkError};
use crate::record::LogRecord;

/// Sink that hands every record to an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<LogRecord>,
}

impl ChannelSink {
    /// Create a sink and the receiver its records arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LogRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Sink for ChannelSink {
    async fn send(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.tx
            .send(record.clone())
            .map_err(|_| SinkError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn record() -> LogRecord {
        LogRecord::new(Path::new("pdv/log.txt"), "venda ok".to_string(), "pdv".to_string())
    }

    #[tokio::test]
    async fn test_delivers_records() {
        let (sink, mut rx) = ChannelSink::new();
        sink.send(&record()).await.unwrap();
        let got = rx.recv().await.unwrap();
        assert_eq!(got.message, "venda ok");
    }

    #[tokio::test]
    async fn test_closed_receiver_is_an_error() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        let err = sink.send(&record()).await.unwrap_err();
        assert!(matches!(err, SinkError::ChannelClosed));
    }
}

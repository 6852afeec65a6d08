//! Grafana Loki push API sink.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{Sink, SinkError};
use crate::config::SinkConfig;
use crate::record::LogRecord;

/// A single Loki stream: a label set and its `[timestamp, line]` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LokiStream {
    pub stream: BTreeMap<String, String>,
    pub values: Vec<[String; 2]>,
}

/// Body of a Loki push request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LokiPayload {
    pub streams: Vec<LokiStream>,
}

/// Structured log line stored as the Loki entry text.
#[derive(Serialize)]
struct LokiLine<'a> {
    level: &'a str,
    message: &'a str,
    file: &'a str,
    app: &'a str,
    timestamp: String,
}

impl LokiPayload {
    /// Build a one-stream payload for a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry line cannot be encoded.
    pub fn from_record(record: &LogRecord) -> Result<Self, SinkError> {
        let file = record.file.to_string_lossy();
        let level = record.level.as_str();

        let line = serde_json::to_string(&LokiLine {
            level,
            message: &record.message,
            file: &file,
            app: &record.app,
            timestamp: record.observed_at.to_rfc3339(),
        })?;

        let nanos = record
            .observed_at
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_string();

        let stream = BTreeMap::from([
            ("app".to_string(), record.app.clone()),
            ("file".to_string(), file.into_owned()),
            ("level".to_string(), level.to_string()),
        ]);

        Ok(Self {
            streams: vec![LokiStream {
                stream,
                values: vec![[nanos, line]],
            }],
        })
    }
}

/// Determine if a request should be retried based on status code and attempt count.
fn should_retry(status_code: u16, attempt: u32, max_retries: u32) -> bool {
    if attempt >= max_retries {
        return false;
    }
    (500..600).contains(&status_code)
}

/// Exponential backoff: 1s, 2s, 4s, ...
fn calculate_backoff(attempt: u32) -> Duration {
    Duration::from_secs(1 << attempt.min(6))
}

/// Sink that pushes each record to a Loki endpoint.
#[derive(Debug, Clone)]
pub struct LokiSink {
    client: Client,
    endpoint: Url,
    max_retries: u32,
}

impl LokiSink {
    /// Create a sink with the given endpoint and timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        endpoint: Url,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, SinkError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(SinkError::Client)?;

        Ok(Self {
            client,
            endpoint,
            max_retries: 0,
        })
    }

    /// Create a sink from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be built.
    pub fn from_config(config: &SinkConfig) -> Result<Self, SinkError> {
        let endpoint = config.endpoint()?;
        Ok(Self::new(endpoint, config.connect_timeout(), config.request_timeout())?
            .with_max_retries(config.max_retries))
    }

    /// Retry up to `max_retries` times on 5xx responses.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Sink for LokiSink {
    async fn send(&self, record: &LogRecord) -> Result<(), SinkError> {
        if record.message.is_empty() {
            return Ok(());
        }

        let payload = LokiPayload::from_record(record)?;

        let mut attempt = 0;
        loop {
            let response = self
                .client
                .post(self.endpoint.clone())
                .json(&payload)
                .send()
                .await
                .map_err(SinkError::from_request)?;

            let status = response.status();
            if status.is_success() {
                tracing::debug!(
                    status = %status,
                    file = %record.file.display(),
                    level = %record.level,
                    "Record delivered to Loki"
                );
                return Ok(());
            }

            let status_code = status.as_u16();
            if should_retry(status_code, attempt, self.max_retries) {
                let backoff = calculate_backoff(attempt);
                tracing::debug!(status = status_code, attempt, ?backoff, "Retrying Loki push");
                tokio::time::sleep(backoff).await;
                attempt += 1;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                status: status_code,
                body,
            });
        }
    }
}

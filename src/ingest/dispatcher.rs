//! Delivery of ingestion records to the downstream sink

use crate::ingest::record::IngestionRecord;
use crate::DispatchError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Posts ingestion records to a fixed endpoint
///
/// One record per request. Only an HTTP 200 answer counts as delivered; any
/// other status, or a transport failure, is logged and returned as a
/// `DispatchError`. Nothing is retried.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    endpoint: String,
}

impl Dispatcher {
    /// Creates a dispatcher with its own HTTP client
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Full URL of the ingestion endpoint
    /// * `timeout` - Per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Creates a dispatcher that reuses an existing client
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one record as an `application/x-www-form-urlencoded` body
    ///
    /// Each record field is one form field; `datasourcePayload` carries its
    /// JSON string as the field value.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The endpoint answered 200
    /// * `Err(DispatchError::Status)` - The endpoint answered anything else
    /// * `Err(DispatchError::Transport)` - Timeout, refused connection, etc.
    pub async fn dispatch(&self, record: &IngestionRecord) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(record)
            .send()
            .await
            .map_err(|source| {
                tracing::error!("{} during request at url: {}", source, self.endpoint);
                DispatchError::Transport {
                    url: self.endpoint.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(
                "Status {} during request at url: {}",
                status.as_u16(),
                self.endpoint
            );
            return Err(DispatchError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        tracing::debug!(
            "Delivered content {} to {}",
            record.content_id,
            self.endpoint
        );
        Ok(())
    }
}

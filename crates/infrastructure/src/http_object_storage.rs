use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use woreda_application::{ObjectStorage, ProbeOutcome, StoredObject};
use woreda_core::{AppError, AppResult};

/// Outbound settings for storage fetches.
#[derive(Debug, Clone)]
pub struct HttpObjectStorageConfig {
    /// `User-Agent` sent with every storage request.
    pub user_agent: String,
    /// Upper bound for a full object fetch.
    pub fetch_timeout: Duration,
    /// Upper bound for a reachability probe.
    pub probe_timeout: Duration,
    /// Largest object body accepted from storage.
    pub max_object_bytes: usize,
}

/// Object storage adapter for publicly fetchable storage URLs.
#[derive(Clone)]
pub struct HttpObjectStorage {
    http_client: reqwest::Client,
    probe_timeout: Duration,
    max_object_bytes: usize,
}

impl HttpObjectStorage {
    /// Builds the adapter and its HTTP client.
    pub fn new(config: HttpObjectStorageConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.fetch_timeout)
            .connect_timeout(config.probe_timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build storage HTTP client: {error}"))
            })?;

        Ok(Self {
            http_client,
            probe_timeout: config.probe_timeout,
            max_object_bytes: config.max_object_bytes,
        })
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn fetch_object(&self, storage_url: &str) -> AppResult<StoredObject> {
        let mut response = self
            .http_client
            .get(storage_url)
            .send()
            .await
            .map_err(|error| {
                AppError::UpstreamUnavailable(format!(
                    "storage request failed: {}",
                    error.without_url()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "storage responded with status {}",
                status.as_u16()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let too_large = || {
            AppError::UpstreamUnavailable(format!(
                "storage object exceeds {} bytes",
                self.max_object_bytes
            ))
        };
        let declared_length = response.content_length().unwrap_or(0);
        if declared_length > u64::try_from(self.max_object_bytes).unwrap_or(u64::MAX) {
            return Err(too_large());
        }

        let mut buffer =
            BytesMut::with_capacity(usize::try_from(declared_length).unwrap_or_default());
        while let Some(chunk) = response.chunk().await.map_err(|error| {
            AppError::UpstreamUnavailable(format!(
                "failed to read storage response body: {}",
                error.without_url()
            ))
        })? {
            if buffer.len() + chunk.len() > self.max_object_bytes {
                return Err(too_large());
            }
            buffer.extend_from_slice(&chunk);
        }
        let bytes = buffer.freeze();

        debug!(bytes = bytes.len(), "fetched object from storage");
        Ok(StoredObject {
            bytes,
            content_type,
        })
    }

    async fn probe_object(&self, storage_url: &str) -> ProbeOutcome {
        let response = self
            .http_client
            .head(storage_url)
            .timeout(self.probe_timeout)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => ProbeOutcome::Reachable,
            Ok(response) => ProbeOutcome::Rejected {
                status: response.status().as_u16(),
            },
            Err(error) if error.is_timeout() => ProbeOutcome::Failed {
                reason: format!("timed out after {} ms", self.probe_timeout.as_millis()),
            },
            Err(error) => ProbeOutcome::Failed {
                reason: error.without_url().to_string(),
            },
        }
    }
}

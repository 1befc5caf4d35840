use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use url::Url;
use woreda_application::StorageAdmin;
use woreda_core::{AppError, AppResult};

/// Settings for the storage REST API used by administrative deletes.
#[derive(Debug, Clone)]
pub struct StorageAdminConfig {
    /// Project base URL, e.g. `https://<project>.supabase.co`.
    pub base_url: String,
    /// Service role key authorizing object removal.
    pub service_role_key: String,
    /// Bucket holding catalogued documents.
    pub bucket: String,
    /// Upper bound for one delete call.
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct RemoveObjectsRequest<'a> {
    prefixes: [&'a str; 1],
}

/// Storage admin adapter for the Supabase storage REST API.
#[derive(Clone)]
pub struct SupabaseStorageAdmin {
    http_client: reqwest::Client,
    remove_endpoint: Url,
    service_role_key: String,
    bucket: String,
}

impl SupabaseStorageAdmin {
    /// Builds the adapter, validating the base URL.
    pub fn new(config: StorageAdminConfig) -> AppResult<Self> {
        let base_url = Url::parse(config.base_url.as_str()).map_err(|error| {
            AppError::Validation(format!("invalid storage base URL: {error}"))
        })?;
        let remove_endpoint = base_url
            .join(format!("storage/v1/object/{}", config.bucket).as_str())
            .map_err(|error| {
                AppError::Validation(format!("invalid storage bucket '{}': {error}", config.bucket))
            })?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build storage admin HTTP client: {error}"))
            })?;

        Ok(Self {
            http_client,
            remove_endpoint,
            service_role_key: config.service_role_key,
            bucket: config.bucket,
        })
    }
}

#[async_trait]
impl StorageAdmin for SupabaseStorageAdmin {
    fn bucket(&self) -> &str {
        self.bucket.as_str()
    }

    async fn remove_object(&self, object_path: &str) -> AppResult<()> {
        let response = self
            .http_client
            .delete(self.remove_endpoint.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.service_role_key))
            .header("apikey", self.service_role_key.as_str())
            .json(&RemoveObjectsRequest {
                prefixes: [object_path],
            })
            .send()
            .await
            .map_err(|error| {
                AppError::UpstreamUnavailable(format!(
                    "storage delete request failed: {}",
                    error.without_url()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(AppError::UpstreamUnavailable(format!(
                "storage delete returned status {}: {body}",
                status.as_u16()
            )));
        }

        Ok(())
    }
}

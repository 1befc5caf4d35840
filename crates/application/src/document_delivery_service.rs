use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use woreda_core::{AppError, AppResult};
use woreda_domain::{AccessGrant, DocumentRecord};

use crate::{DocumentAccessService, ObjectStorage, ProbeOutcome, TemporaryAccessService};


const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// File bytes authorized for delivery through the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredDocument {
    /// Object bytes.
    pub bytes: Bytes,
    /// Content type from storage, or `application/octet-stream`.
    pub content_type: String,
    /// Catalogued file name.
    pub file_name: String,
}

/// Directly fetchable storage URL for viewers that cannot use the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicDocumentUrl {
    /// Storage URL exactly as catalogued.
    pub public_url: String,
    /// Catalogued file name.
    pub file_name: String,
    /// Always `true`; the viewer's own fetch decides accessibility.
    pub is_accessible: bool,
    /// Probe diagnostic when the reachability check did not succeed.
    pub diagnostic: Option<String>,
}

/// Gateway that authorizes and delivers tenant documents.
#[derive(Clone)]
pub struct DocumentDeliveryService {
    access_service: TemporaryAccessService,
    document_access_service: DocumentAccessService,
    storage: Arc<dyn ObjectStorage>,
}

impl DocumentDeliveryService {
    /// Creates a gateway from the validator, resolver and storage port.
    #[must_use]
    pub fn new(
        access_service: TemporaryAccessService,
        document_access_service: DocumentAccessService,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            access_service,
            document_access_service,
            storage,
        }
    }

    /// Validates the token and resolves the document without touching storage.
    pub async fn authorize(
        &self,
        token: &str,
        document_url: &str,
    ) -> AppResult<(AccessGrant, DocumentRecord)> {
        let grant = self
            .access_service
            .validate(token)
            .await
            .ok_or_else(|| AppError::Unauthorized("invalid or expired access token".to_owned()))?;

        let document = self
            .document_access_service
            .resolve(&grant, document_url)
            .await
            .ok_or_else(|| AppError::NotFound("file not found or access denied".to_owned()))?;

        Ok((grant, document))
    }

    /// Fetches an authorized document's bytes from storage.
    pub async fn serve(&self, token: &str, document_url: &str) -> AppResult<DeliveredDocument> {
        let (grant, document) = self.authorize(token, document_url).await?;

        let object = self
            .storage
            .fetch_object(document.storage_url())
            .await
            .map_err(|error| {
                warn!(
                    document_id = %document.id(),
                    error = %error,
                    "failed to fetch document from storage"
                );
                match error {
                    AppError::UpstreamUnavailable(_) => error,
                    other => AppError::UpstreamUnavailable(other.to_string()),
                }
            })?;

        info!(
            document_id = %document.id(),
            tenant_id = %grant.tenant_id(),
            bytes = object.bytes.len(),
            "served document through proxy"
        );

        Ok(DeliveredDocument {
            bytes: object.bytes,
            content_type: object
                .content_type
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
            file_name: document.file_name().to_owned(),
        })
    }

    /// Returns the public storage URL of an authorized document.
    ///
    /// The reachability probe is advisory: its outcome is reported as a
    /// diagnostic and never turns into an error.
    pub async fn resolve_public_url(
        &self,
        token: &str,
        document_url: &str,
    ) -> AppResult<PublicDocumentUrl> {
        let (_, document) = self.authorize(token, document_url).await?;

        let outcome = self.storage.probe_object(document.storage_url()).await;
        match &outcome {
            ProbeOutcome::Reachable => {}
            ProbeOutcome::Rejected { status } => warn!(
                document_id = %document.id(),
                status,
                "public URL probe returned non-success status; reporting accessible"
            ),
            ProbeOutcome::Failed { reason } => warn!(
                document_id = %document.id(),
                reason = %reason,
                "public URL probe failed; reporting accessible"
            ),
        }

        Ok(PublicDocumentUrl {
            public_url: document.storage_url().to_owned(),
            file_name: document.file_name().to_owned(),
            is_accessible: true,
            diagnostic: outcome.diagnostic(),
        })
    }
}

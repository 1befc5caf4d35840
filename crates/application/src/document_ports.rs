use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use woreda_core::{AccessToken, AppResult, TenantId};
use woreda_domain::{AccessGrant, DocumentRecord};

/// Repository port for temporary access grants.
#[async_trait]
pub trait AccessGrantRepository: Send + Sync {
    /// Finds the grant issued for a bearer token, expired or not.
    async fn find_access_grant_by_token(&self, token: &AccessToken)
    -> AppResult<Option<AccessGrant>>;

    /// Deletes grants whose expiry is before `cutoff` and returns how many were removed.
    async fn delete_grants_expired_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// Repository port for the tenant document catalog.
#[async_trait]
pub trait DocumentCatalogRepository: Send + Sync {
    /// Lists every document catalogued for a tenant, newest first.
    async fn list_documents(&self, tenant_id: TenantId) -> AppResult<Vec<DocumentRecord>>;

    /// Finds one document by catalog id, regardless of tenant.
    async fn find_document(&self, document_id: Uuid) -> AppResult<Option<DocumentRecord>>;

    /// Deletes one catalog record.
    async fn delete_document(&self, document_id: Uuid) -> AppResult<()>;
}

/// Object payload returned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Raw object bytes.
    pub bytes: Bytes,
    /// Content type reported by storage, if any.
    pub content_type: Option<String>,
}

/// Result of a best-effort reachability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Storage answered with a success status.
    Reachable,
    /// Storage answered with a non-success status.
    Rejected {
        /// HTTP status code returned by storage.
        status: u16,
    },
    /// The probe did not complete (network error or timeout).
    Failed {
        /// Transport failure description.
        reason: String,
    },
}

impl ProbeOutcome {
    /// Returns a diagnostic message for unsuccessful probes.
    #[must_use]
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Self::Reachable => None,
            Self::Rejected { status } => Some(format!("storage responded with status {status}")),
            Self::Failed { reason } => Some(format!("storage probe failed: {reason}")),
        }
    }
}

/// Read port over the object storage backend.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Fetches an object by its public storage URL.
    async fn fetch_object(&self, storage_url: &str) -> AppResult<StoredObject>;

    /// Performs a bounded existence check; never fails.
    async fn probe_object(&self, storage_url: &str) -> ProbeOutcome;
}

/// Administrative port for removing stored objects.
#[async_trait]
pub trait StorageAdmin: Send + Sync {
    /// Returns the bucket whose public URLs this adapter manages.
    fn bucket(&self) -> &str;

    /// Removes an object by its path inside the bucket.
    async fn remove_object(&self, object_path: &str) -> AppResult<()>;
}

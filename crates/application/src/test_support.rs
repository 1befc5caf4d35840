use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;
use woreda_core::{AccessToken, AppError, AppResult, TenantId};
use woreda_domain::{AccessGrant, DocumentRecord};

use crate::{
    AccessGrantRepository, DocumentCatalogRepository, ObjectStorage, ProbeOutcome, StorageAdmin,
    StoredObject,
};

pub(crate) fn grant(tenant_id: TenantId, token: &str, expires_at: DateTime<Utc>) -> AccessGrant {
    AccessGrant::new(
        Uuid::new_v4(),
        AccessToken::parse(token).unwrap_or_else(|| panic!("test token must not be blank")),
        tenant_id,
        expires_at,
        expires_at - Duration::hours(2),
    )
}

pub(crate) fn document(tenant_id: TenantId, file_name: &str, storage_url: &str) -> DocumentRecord {
    DocumentRecord::new(
        Uuid::new_v4(),
        tenant_id,
        file_name,
        storage_url,
        Some("budget".to_owned()),
        Utc::now(),
    )
}

#[derive(Default)]
pub(crate) struct FakeGrantRepository {
    pub grants: HashMap<String, AccessGrant>,
    pub fail: bool,
    pub lookups: AtomicUsize,
    pub purge_cutoffs: Mutex<Vec<DateTime<Utc>>>,
}

impl FakeGrantRepository {
    pub(crate) fn with_grants(grants: Vec<AccessGrant>) -> Self {
        Self {
            grants: grants
                .into_iter()
                .map(|grant| (grant.token().expose().to_owned(), grant))
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessGrantRepository for FakeGrantRepository {
    async fn find_access_grant_by_token(
        &self,
        token: &AccessToken,
    ) -> AppResult<Option<AccessGrant>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::Internal("grant store unavailable".to_owned()));
        }

        Ok(self.grants.get(token.expose()).cloned())
    }

    async fn delete_grants_expired_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        self.purge_cutoffs.lock().await.push(cutoff);
        let removed = self
            .grants
            .values()
            .filter(|grant| grant.expires_at() < cutoff)
            .count();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}

#[derive(Default)]
pub(crate) struct FakeCatalogRepository {
    pub documents: Vec<DocumentRecord>,
    pub fail_listing: bool,
    pub fail_delete: bool,
    pub listings: AtomicUsize,
    pub deleted: Mutex<Vec<Uuid>>,
}

impl FakeCatalogRepository {
    pub(crate) fn with_documents(documents: Vec<DocumentRecord>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    pub(crate) fn listing_count(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentCatalogRepository for FakeCatalogRepository {
    async fn list_documents(&self, tenant_id: TenantId) -> AppResult<Vec<DocumentRecord>> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(AppError::Internal("catalog unavailable".to_owned()));
        }

        Ok(self
            .documents
            .iter()
            .filter(|document| document.tenant_id() == tenant_id)
            .cloned()
            .collect())
    }

    async fn find_document(&self, document_id: Uuid) -> AppResult<Option<DocumentRecord>> {
        Ok(self
            .documents
            .iter()
            .find(|document| document.id() == document_id)
            .cloned())
    }

    async fn delete_document(&self, document_id: Uuid) -> AppResult<()> {
        if self.fail_delete {
            return Err(AppError::Internal("catalog delete failed".to_owned()));
        }

        self.deleted.lock().await.push(document_id);
        Ok(())
    }
}

pub(crate) struct FakeObjectStorage {
    pub objects: HashMap<String, StoredObject>,
    pub probe_outcome: ProbeOutcome,
    pub fetches: AtomicUsize,
    pub probes: AtomicUsize,
}

impl Default for FakeObjectStorage {
    fn default() -> Self {
        Self {
            objects: HashMap::new(),
            probe_outcome: ProbeOutcome::Reachable,
            fetches: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
        }
    }
}

impl FakeObjectStorage {
    pub(crate) fn with_object(storage_url: &str, bytes: &'static [u8], content_type: Option<&str>) -> Self {
        let mut storage = Self::default();
        storage.objects.insert(
            storage_url.to_owned(),
            StoredObject {
                bytes: Bytes::from_static(bytes),
                content_type: content_type.map(str::to_owned),
            },
        );
        storage
    }

    pub(crate) fn network_calls(&self) -> usize {
        self.fetches.load(Ordering::SeqCst) + self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for FakeObjectStorage {
    async fn fetch_object(&self, storage_url: &str) -> AppResult<StoredObject> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.objects.get(storage_url).cloned().ok_or_else(|| {
            AppError::UpstreamUnavailable("storage responded with status 404".to_owned())
        })
    }

    async fn probe_object(&self, _storage_url: &str) -> ProbeOutcome {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.probe_outcome.clone()
    }
}

#[derive(Default)]
pub(crate) struct FakeStorageAdmin {
    pub fail: bool,
    pub removed: Mutex<Vec<String>>,
}

#[async_trait]
impl StorageAdmin for FakeStorageAdmin {
    fn bucket(&self) -> &str {
        "documents"
    }

    async fn remove_object(&self, object_path: &str) -> AppResult<()> {
        self.removed.lock().await.push(object_path.to_owned());
        if self.fail {
            return Err(AppError::UpstreamUnavailable("storage delete failed".to_owned()));
        }

        Ok(())
    }
}

//! Shared fixtures for API tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::response::Response;
use bytes::Bytes;
use chrono::{Duration, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;
use woreda_application::{
    AccessGrantRepository, ObjectStorage, ProbeOutcome, StorageAdmin, StoredObject,
};
use woreda_core::{AccessToken, AppError, AppResult, TenantId};
use woreda_domain::{AccessGrant, DocumentRecord};
use woreda_infrastructure::{InMemoryAccessGrantRepository, InMemoryDocumentCatalogRepository};

use crate::state::AppState;

pub(crate) const TOKEN: &str = "tok-7f3a9c";
pub(crate) const ADMIN_TOKEN: &str = "0123456789abcdef0123456789abcdef";
pub(crate) const BUDGET_URL: &str =
    "https://project.supabase.co/storage/v1/object/public/documents/budget/2026.pdf";
pub(crate) const OFFICE_URL: &str =
    "https://project.supabase.co/storage/v1/object/public/documents/minutes/june.docx";

pub(crate) struct CountingGrantRepository {
    pub(crate) inner: InMemoryAccessGrantRepository,
    pub(crate) lookups: AtomicUsize,
}

#[async_trait]
impl AccessGrantRepository for CountingGrantRepository {
    async fn find_access_grant_by_token(
        &self,
        token: &AccessToken,
    ) -> AppResult<Option<AccessGrant>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_access_grant_by_token(token).await
    }

    async fn delete_grants_expired_before(
        &self,
        cutoff: chrono::DateTime<Utc>,
    ) -> AppResult<u64> {
        self.inner.delete_grants_expired_before(cutoff).await
    }
}

#[derive(Default)]
pub(crate) struct FakeObjectStorage {
    pub(crate) objects: HashMap<String, (Bytes, Option<String>)>,
    pub(crate) probe_outcome: Option<ProbeOutcome>,
    pub(crate) calls: AtomicUsize,
}

#[async_trait]
impl ObjectStorage for FakeObjectStorage {
    async fn fetch_object(&self, storage_url: &str) -> AppResult<StoredObject> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.objects
            .get(storage_url)
            .map(|(bytes, content_type)| StoredObject {
                bytes: bytes.clone(),
                content_type: content_type.clone(),
            })
            .ok_or_else(|| AppError::UpstreamUnavailable("storage returned 502".to_owned()))
    }

    async fn probe_object(&self, _storage_url: &str) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.probe_outcome.clone().unwrap_or(ProbeOutcome::Reachable)
    }
}

#[derive(Default)]
pub(crate) struct FakeStorageAdmin {
    pub(crate) removed: Mutex<Vec<String>>,
}

#[async_trait]
impl StorageAdmin for FakeStorageAdmin {
    fn bucket(&self) -> &str {
        "documents"
    }

    async fn remove_object(&self, object_path: &str) -> AppResult<()> {
        self.removed.lock().await.push(object_path.to_owned());
        Ok(())
    }
}

pub(crate) struct Harness {
    pub(crate) state: AppState,
    pub(crate) grants: Arc<CountingGrantRepository>,
    pub(crate) catalog: Arc<InMemoryDocumentCatalogRepository>,
    pub(crate) storage: Arc<FakeObjectStorage>,
    pub(crate) storage_admin: Arc<FakeStorageAdmin>,
    pub(crate) budget_id: Uuid,
}

pub(crate) async fn harness(storage: FakeObjectStorage, expires_in: Duration) -> Harness {
    let tenant_id = TenantId::new();
    let now = Utc::now();

    let grants = Arc::new(CountingGrantRepository {
        inner: InMemoryAccessGrantRepository::new(),
        lookups: AtomicUsize::new(0),
    });
    let token = AccessToken::parse(TOKEN);
    assert!(token.is_some());
    if let Some(token) = token {
        let inserted = grants
            .inner
            .insert(AccessGrant::new(
                Uuid::new_v4(),
                token,
                tenant_id,
                now + expires_in,
                now - Duration::minutes(5),
            ))
            .await;
        assert!(inserted.is_ok());
    }

    let catalog = Arc::new(InMemoryDocumentCatalogRepository::new());
    let budget_id = Uuid::new_v4();
    catalog
        .insert(DocumentRecord::new(
            budget_id,
            tenant_id,
            "budget 2026.pdf",
            BUDGET_URL,
            Some("budget".to_owned()),
            now - Duration::days(2),
        ))
        .await;
    catalog
        .insert(DocumentRecord::new(
            Uuid::new_v4(),
            tenant_id,
            "june.docx",
            OFFICE_URL,
            None,
            now - Duration::days(1),
        ))
        .await;

    let storage = Arc::new(storage);
    let storage_admin = Arc::new(FakeStorageAdmin::default());
    let state = AppState::new(
        grants.clone(),
        catalog.clone(),
        storage.clone(),
        storage_admin.clone(),
        ADMIN_TOKEN,
        600,
    );

    Harness {
        state,
        grants,
        catalog,
        storage,
        storage_admin,
        budget_id,
    }
}

pub(crate) fn storage_with_budget() -> FakeObjectStorage {
    let mut storage = FakeObjectStorage::default();
    storage.objects.insert(
        BUDGET_URL.to_owned(),
        (
            Bytes::from_static(b"%PDF-1.7 budget"),
            Some("application/pdf".to_owned()),
        ),
    );
    storage
}

pub(crate) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await;
    let bytes = match bytes {
        Ok(bytes) => bytes,
        Err(error) => panic!("failed to read body: {error}"),
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(error) => panic!("body is not json: {error}"),
    }
}

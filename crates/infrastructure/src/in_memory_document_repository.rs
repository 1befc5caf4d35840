use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;
use woreda_application::{AccessGrantRepository, DocumentCatalogRepository};
use woreda_core::{AccessToken, AppError, AppResult, TenantId};
use woreda_domain::{AccessGrant, DocumentRecord};

/// In-memory temporary access grant repository.
#[derive(Debug, Default)]
pub struct InMemoryAccessGrantRepository {
    grants: RwLock<HashMap<AccessToken, AccessGrant>>,
}

impl InMemoryAccessGrantRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a grant, rejecting a token that is already issued.
    pub async fn insert(&self, grant: AccessGrant) -> AppResult<()> {
        let mut grants = self.grants.write().await;
        if grants.contains_key(grant.token()) {
            return Err(AppError::Validation(format!(
                "temporary access token '{}' already issued",
                grant.token().fingerprint()
            )));
        }

        grants.insert(grant.token().clone(), grant);
        Ok(())
    }
}

#[async_trait]
impl AccessGrantRepository for InMemoryAccessGrantRepository {
    async fn find_access_grant_by_token(
        &self,
        token: &AccessToken,
    ) -> AppResult<Option<AccessGrant>> {
        Ok(self.grants.read().await.get(token).cloned())
    }

    async fn delete_grants_expired_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut grants = self.grants.write().await;
        let before = grants.len();
        grants.retain(|_, grant| grant.expires_at() >= cutoff);

        Ok(u64::try_from(before - grants.len()).unwrap_or(u64::MAX))
    }
}

/// In-memory document catalog.
#[derive(Debug, Default)]
pub struct InMemoryDocumentCatalogRepository {
    documents: RwLock<Vec<DocumentRecord>>,
}

impl InMemoryDocumentCatalogRepository {
    /// Creates an empty in-memory catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document to the catalog.
    pub async fn insert(&self, document: DocumentRecord) {
        self.documents.write().await.push(document);
    }
}

#[async_trait]
impl DocumentCatalogRepository for InMemoryDocumentCatalogRepository {
    async fn list_documents(&self, tenant_id: TenantId) -> AppResult<Vec<DocumentRecord>> {
        let mut documents: Vec<DocumentRecord> = self
            .documents
            .read()
            .await
            .iter()
            .filter(|document| document.tenant_id() == tenant_id)
            .cloned()
            .collect();
        documents.sort_by_key(|document| std::cmp::Reverse(document.created_at()));

        Ok(documents)
    }

    async fn find_document(&self, document_id: Uuid) -> AppResult<Option<DocumentRecord>> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .find(|document| document.id() == document_id)
            .cloned())
    }

    async fn delete_document(&self, document_id: Uuid) -> AppResult<()> {
        self.documents
            .write()
            .await
            .retain(|document| document.id() != document_id);
        Ok(())
    }
}

use std::sync::Arc;

use tracing::warn;
use woreda_core::AppResult;
use woreda_domain::{AccessGrant, DocumentRecord};

use crate::DocumentCatalogRepository;

/// Resolves document URLs within the tenant scope of a grant.
#[derive(Clone)]
pub struct DocumentAccessService {
    catalog: Arc<dyn DocumentCatalogRepository>,
}

impl DocumentAccessService {
    /// Creates a resolver over the document catalog.
    #[must_use]
    pub fn new(catalog: Arc<dyn DocumentCatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Lists documents visible under a grant.
    pub async fn list_for_grant(&self, grant: &AccessGrant) -> AppResult<Vec<DocumentRecord>> {
        self.catalog.list_documents(grant.tenant_id()).await
    }

    /// Returns the catalogued document whose storage URL equals `document_url` byte for byte.
    ///
    /// Unknown documents, documents of other tenants and catalog failures all
    /// resolve to `None`.
    pub async fn resolve(&self, grant: &AccessGrant, document_url: &str) -> Option<DocumentRecord> {
        let documents = match self.catalog.list_documents(grant.tenant_id()).await {
            Ok(documents) => documents,
            Err(error) => {
                warn!(
                    tenant_id = %grant.tenant_id(),
                    error = %error,
                    "document catalog lookup failed; denying access"
                );
                return None;
            }
        };

        documents.into_iter().find(|document| {
            document.tenant_id() == grant.tenant_id() && document.storage_url() == document_url
        })
    }
}

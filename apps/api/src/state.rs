use std::sync::Arc;

use woreda_application::{
    AccessGrantRepository, DocumentAccessService, DocumentAdminService, DocumentCatalogRepository,
    DocumentDeliveryService, ObjectStorage, StorageAdmin, TemporaryAccessService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub temporary_access_service: TemporaryAccessService,
    pub document_access_service: DocumentAccessService,
    pub document_delivery_service: DocumentDeliveryService,
    pub document_admin_service: DocumentAdminService,
    pub admin_api_token: Arc<str>,
    pub document_cache_max_age_secs: u64,
}

impl AppState {
    /// Wires services over the provided adapters.
    pub fn new(
        grant_repository: Arc<dyn AccessGrantRepository>,
        document_catalog: Arc<dyn DocumentCatalogRepository>,
        object_storage: Arc<dyn ObjectStorage>,
        storage_admin: Arc<dyn StorageAdmin>,
        admin_api_token: &str,
        document_cache_max_age_secs: u64,
    ) -> Self {
        let temporary_access_service = TemporaryAccessService::new(grant_repository);
        let document_access_service = DocumentAccessService::new(document_catalog.clone());

        Self {
            document_delivery_service: DocumentDeliveryService::new(
                temporary_access_service.clone(),
                document_access_service.clone(),
                object_storage,
            ),
            document_admin_service: DocumentAdminService::new(document_catalog, storage_admin),
            temporary_access_service,
            document_access_service,
            admin_api_token: Arc::from(admin_api_token),
            document_cache_max_age_secs,
        }
    }
}

use std::sync::Arc;

use percent_encoding::percent_decode_str;
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;
use woreda_core::{AppError, AppResult};

use crate::{DocumentCatalogRepository, StorageAdmin};

/// Administrative document maintenance.
#[derive(Clone)]
pub struct DocumentAdminService {
    catalog: Arc<dyn DocumentCatalogRepository>,
    storage_admin: Arc<dyn StorageAdmin>,
}

impl DocumentAdminService {
    /// Creates the service from the catalog and storage admin ports.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn DocumentCatalogRepository>,
        storage_admin: Arc<dyn StorageAdmin>,
    ) -> Self {
        Self {
            catalog,
            storage_admin,
        }
    }

    /// Deletes a document: the stored object best-effort, then the catalog record.
    pub async fn delete_document(&self, document_id: &str) -> AppResult<()> {
        let document_id = document_id.trim();
        if document_id.is_empty() {
            return Err(AppError::Validation("document id is required".to_owned()));
        }

        let not_found = || AppError::NotFound("document not found".to_owned());
        let document_id = Uuid::parse_str(document_id).map_err(|_| not_found())?;
        let document = self
            .catalog
            .find_document(document_id)
            .await?
            .ok_or_else(not_found)?;

        match storage_object_path(document.storage_url(), self.storage_admin.bucket()) {
            Some(object_path) => match self.storage_admin.remove_object(&object_path).await {
                Ok(()) => info!(%document_id, object_path = %object_path, "deleted stored object"),
                Err(storage_error) => warn!(
                    %document_id,
                    object_path = %object_path,
                    error = %storage_error,
                    "failed to delete stored object; continuing with catalog deletion"
                ),
            },
            None => warn!(
                %document_id,
                storage_url = %document.storage_url(),
                "could not extract object path from storage URL"
            ),
        }

        self.catalog
            .delete_document(document_id)
            .await
            .map_err(|delete_error| {
                error!(%document_id, error = %delete_error, "failed to delete catalog record");
                AppError::Internal("failed to delete document from database".to_owned())
            })?;

        info!(%document_id, "deleted document");
        Ok(())
    }
}

/// Extracts the percent-decoded object path from a public storage URL of `bucket`.
///
/// Expects the `/storage/v1/object/public/<bucket>/<path>` layout.
#[must_use]
pub fn storage_object_path(storage_url: &str, bucket: &str) -> Option<String> {
    let url = Url::parse(storage_url).ok()?;
    let prefix = format!("/storage/v1/object/public/{bucket}/");
    let encoded_path = url.path().strip_prefix(prefix.as_str())?;
    if encoded_path.is_empty() {
        return None;
    }

    percent_decode_str(encoded_path)
        .decode_utf8()
        .ok()
        .map(|path| path.into_owned())
}

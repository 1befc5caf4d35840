use chrono::{DateTime, Utc};
use uuid::Uuid;
use woreda_core::TenantId;

use crate::ViewerKind;

/// Category label used when a document was uploaded without one.
pub const DEFAULT_DOCUMENT_CATEGORY: &str = "general";

/// Catalogued upload pointing at an object in external storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    id: Uuid,
    tenant_id: TenantId,
    file_name: String,
    storage_url: String,
    category: Option<String>,
    created_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Creates a document record from persisted values.
    #[must_use]
    pub fn new(
        id: Uuid,
        tenant_id: TenantId,
        file_name: impl Into<String>,
        storage_url: impl Into<String>,
        category: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            tenant_id,
            file_name: file_name.into(),
            storage_url: storage_url.into(),
            category: category.filter(|value| !value.trim().is_empty()),
            created_at,
        }
    }

    /// Returns the catalog id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the owning tenant.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the display file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Returns the storage URL exactly as catalogued.
    #[must_use]
    pub fn storage_url(&self) -> &str {
        self.storage_url.as_str()
    }

    /// Returns the category, falling back to [`DEFAULT_DOCUMENT_CATEGORY`].
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_DOCUMENT_CATEGORY)
    }

    /// Returns the upload instant.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the viewer kind implied by the file name.
    #[must_use]
    pub fn viewer_kind(&self) -> ViewerKind {
        ViewerKind::from_file_name(self.file_name.as_str())
    }
}

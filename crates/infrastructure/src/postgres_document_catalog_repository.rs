use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use woreda_application::DocumentCatalogRepository;
use woreda_core::{AppError, AppResult, TenantId};
use woreda_domain::DocumentRecord;

/// PostgreSQL-backed document catalog over the `uploads` table.
#[derive(Clone)]
pub struct PostgresDocumentCatalogRepository {
    pool: PgPool,
}

impl PostgresDocumentCatalogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UploadRow {
    id: Uuid,
    woreda_id: Uuid,
    file_name: String,
    storage_url: String,
    category: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UploadRow> for DocumentRecord {
    fn from(row: UploadRow) -> Self {
        DocumentRecord::new(
            row.id,
            TenantId::from_uuid(row.woreda_id),
            row.file_name,
            row.storage_url,
            row.category,
            row.created_at,
        )
    }
}

#[async_trait]
impl DocumentCatalogRepository for PostgresDocumentCatalogRepository {
    async fn list_documents(&self, tenant_id: TenantId) -> AppResult<Vec<DocumentRecord>> {
        let rows = sqlx::query_as::<_, UploadRow>(
            r#"
            SELECT id, woreda_id, file_name, storage_url, category, created_at
            FROM uploads
            WHERE woreda_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list documents for tenant '{tenant_id}': {error}"
            ))
        })?;

        Ok(rows.into_iter().map(DocumentRecord::from).collect())
    }

    async fn find_document(&self, document_id: Uuid) -> AppResult<Option<DocumentRecord>> {
        let row = sqlx::query_as::<_, UploadRow>(
            r#"
            SELECT id, woreda_id, file_name, storage_url, category, created_at
            FROM uploads
            WHERE id = $1
            "#,
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load document '{document_id}': {error}"))
        })?;

        Ok(row.map(DocumentRecord::from))
    }

    async fn delete_document(&self, document_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM uploads
            WHERE id = $1
            "#,
        )
        .bind(document_id)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete document '{document_id}': {error}"))
        })?;

        Ok(())
    }
}

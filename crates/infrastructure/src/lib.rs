//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_object_storage;
mod in_memory_document_repository;
mod postgres_access_grant_repository;
mod postgres_document_catalog_repository;
mod supabase_storage_admin;

pub use http_object_storage::{HttpObjectStorage, HttpObjectStorageConfig};
pub use in_memory_document_repository::{
    InMemoryAccessGrantRepository, InMemoryDocumentCatalogRepository,
};
pub use postgres_access_grant_repository::PostgresAccessGrantRepository;
pub use postgres_document_catalog_repository::PostgresDocumentCatalogRepository;
pub use supabase_storage_admin::{StorageAdminConfig, SupabaseStorageAdmin};

/// Embedded migrations for the grant and upload tables.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

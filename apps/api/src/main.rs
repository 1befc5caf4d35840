//! Woreda portal API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;
use woreda_core::AppError;
use woreda_infrastructure::{
    HttpObjectStorage, MIGRATOR, PostgresAccessGrantRepository, PostgresDocumentCatalogRepository,
    SupabaseStorageAdmin,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let object_storage = HttpObjectStorage::new(config.object_storage.clone())?;
    let storage_admin = SupabaseStorageAdmin::new(config.storage_admin.clone())?;

    let app_state = AppState::new(
        Arc::new(PostgresAccessGrantRepository::new(pool.clone())),
        Arc::new(PostgresDocumentCatalogRepository::new(pool)),
        Arc::new(object_storage),
        Arc::new(storage_admin),
        &config.admin_api_token,
        config.document_cache_max_age_secs,
    );

    let app = api_router::build_router(app_state, &config.frontend_url)?;
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "woreda-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

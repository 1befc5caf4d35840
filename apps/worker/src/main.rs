//! Woreda portal maintenance worker.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use woreda_application::TemporaryAccessService;
use woreda_core::{AppError, AppResult};
use woreda_infrastructure::PostgresAccessGrantRepository;

#[derive(Debug, Clone)]
struct WorkerConfig {
    database_url: String,
    sweep_interval_secs: u64,
    retention_hours: i64,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let pool = connect_pool(config.database_url.as_str()).await?;
    let access_service =
        TemporaryAccessService::new(Arc::new(PostgresAccessGrantRepository::new(pool)));
    let retention = chrono::Duration::hours(config.retention_hours);

    info!(
        sweep_interval_secs = config.sweep_interval_secs,
        retention_hours = config.retention_hours,
        "woreda-worker started"
    );

    loop {
        if let Err(error) = sweep_expired_grants(&access_service, retention).await {
            warn!(error = %error, "failed to sweep expired temporary access grants");
        }

        tokio::time::sleep(Duration::from_secs(config.sweep_interval_secs)).await;
    }
}

async fn sweep_expired_grants(
    access_service: &TemporaryAccessService,
    retention: chrono::Duration,
) -> AppResult<u64> {
    access_service
        .purge_expired_grants(Utc::now(), retention)
        .await
}

async fn connect_pool(database_url: &str) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

impl WorkerConfig {
    fn load() -> AppResult<Self> {
        let database_url = required_env("DATABASE_URL")?;
        let sweep_interval_secs = parse_env_u64("GRANT_SWEEP_INTERVAL_SECS", 900)?;
        let retention_hours = parse_env_i64("GRANT_SWEEP_RETENTION_HOURS", 24)?;

        if sweep_interval_secs == 0 {
            return Err(AppError::Validation(
                "GRANT_SWEEP_INTERVAL_SECS must be greater than zero".to_owned(),
            ));
        }

        if retention_hours < 0 {
            return Err(AppError::Validation(
                "GRANT_SWEEP_RETENTION_HOURS must not be negative".to_owned(),
            ));
        }

        Ok(Self {
            database_url,
            sweep_interval_secs,
            retention_hours,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_i64(name: &str, default: i64) -> AppResult<i64> {
    match env::var(name) {
        Ok(value) => value.parse::<i64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

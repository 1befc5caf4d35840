use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use woreda_core::AppError;
use woreda_infrastructure::{HttpObjectStorageConfig, StorageAdminConfig};

const MIN_ADMIN_TOKEN_LENGTH: usize = 32;
const DEFAULT_MAX_OBJECT_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub frontend_url: String,
    pub admin_api_token: String,
    pub api_host: String,
    pub api_port: u16,
    pub document_cache_max_age_secs: u64,
    pub object_storage: HttpObjectStorageConfig,
    pub storage_admin: StorageAdminConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    pub fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let database_url = required_env(&lookup, "DATABASE_URL")?;
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let admin_api_token = required_env(&lookup, "ADMIN_API_TOKEN")?;
        if admin_api_token.len() < MIN_ADMIN_TOKEN_LENGTH {
            return Err(AppError::Validation(format!(
                "ADMIN_API_TOKEN must be at least {MIN_ADMIN_TOKEN_LENGTH} characters"
            )));
        }

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parsed_env(&lookup, "API_PORT", 3001_u16)?;

        let user_agent = lookup("STORAGE_USER_AGENT")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "Mozilla/5.0".to_owned());
        let fetch_timeout = parsed_env(&lookup, "STORAGE_FETCH_TIMEOUT_SECS", 30_u64)?;
        let probe_timeout = parsed_env(&lookup, "STORAGE_PROBE_TIMEOUT_SECS", 5_u64)?;
        if fetch_timeout == 0 || probe_timeout == 0 {
            return Err(AppError::Validation(
                "storage timeouts must be greater than zero".to_owned(),
            ));
        }
        let max_object_bytes =
            parsed_env(&lookup, "STORAGE_MAX_OBJECT_BYTES", DEFAULT_MAX_OBJECT_BYTES)?;
        if max_object_bytes == 0 {
            return Err(AppError::Validation(
                "STORAGE_MAX_OBJECT_BYTES must be greater than zero".to_owned(),
            ));
        }
        let document_cache_max_age_secs =
            parsed_env(&lookup, "DOCUMENT_CACHE_MAX_AGE_SECS", 3600_u64)?;

        let storage_admin = StorageAdminConfig {
            base_url: required_non_empty_env(&lookup, "SUPABASE_URL")?,
            service_role_key: required_non_empty_env(&lookup, "SUPABASE_SERVICE_ROLE_KEY")?,
            bucket: lookup("STORAGE_BUCKET")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| "documents".to_owned()),
            timeout: Duration::from_secs(fetch_timeout),
        };

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            admin_api_token,
            api_host,
            api_port,
            document_cache_max_age_secs,
            object_storage: HttpObjectStorageConfig {
                user_agent,
                fetch_timeout: Duration::from_secs(fetch_timeout),
                probe_timeout: Duration::from_secs(probe_timeout),
                max_object_bytes,
            },
            storage_admin,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, AppError> {
    lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    let value = required_env(lookup, name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parsed_env<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}

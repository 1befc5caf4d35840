//! Shared primitives for all Rust crates in the woreda portal.

#![forbid(unsafe_code)]

/// Bearer credential primitives shared across services.
pub mod auth;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use auth::{AccessToken, secrets_match};

/// Result type used across woreda crates.
pub type AppResult<T> = Result<T, AppError>;

/// Tenant (woreda) identifier used as the isolation key for every document and grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Creates a random tenant identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a tenant identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TenantId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input, including a missing required parameter.
    #[error("validation error: {0}")]
    Validation(String),

    /// Bearer credential is absent, unknown, or expired.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Requested resource does not exist in the caller's scope.
    #[error("not found: {0}")]
    NotFound(String),

    /// Object storage could not deliver the requested content.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

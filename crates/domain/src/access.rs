use chrono::{DateTime, Utc};
use uuid::Uuid;
use woreda_core::{AccessToken, TenantId};

/// Time-boxed, tenant-scoped bearer grant for anonymous document viewing.
///
/// Grants are immutable once issued. Validity depends only on the stored
/// expiry and the time of the check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    id: Uuid,
    token: AccessToken,
    tenant_id: TenantId,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl AccessGrant {
    /// Creates a grant from persisted values.
    #[must_use]
    pub fn new(
        id: Uuid,
        token: AccessToken,
        tenant_id: TenantId,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            token,
            tenant_id,
            expires_at,
            created_at,
        }
    }

    /// Returns the persisted grant id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// Returns the tenant every document under this grant must belong to.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the absolute expiry instant.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns the issuance instant.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether the grant is valid at `now`: strictly before expiry.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use woreda_core::{AccessToken, AppResult};
use woreda_domain::AccessGrant;

use crate::AccessGrantRepository;


/// Token validator gating every document operation.
#[derive(Clone)]
pub struct TemporaryAccessService {
    repository: Arc<dyn AccessGrantRepository>,
}

impl TemporaryAccessService {
    /// Creates a validator over a grant repository.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessGrantRepository>) -> Self {
        Self { repository }
    }

    /// Returns the grant for `token` if it exists and has not expired.
    pub async fn validate(&self, token: &str) -> Option<AccessGrant> {
        self.validate_at(token, Utc::now()).await
    }

    /// Returns the grant for `token` if it exists and `now` is strictly before its expiry.
    ///
    /// Store failures resolve to `None`. Tokens are reusable until expiry.
    pub async fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Option<AccessGrant> {
        let token = AccessToken::parse(token)?;

        let grant = match self.repository.find_access_grant_by_token(&token).await {
            Ok(Some(grant)) => grant,
            Ok(None) => {
                debug!(token = %token.fingerprint(), "temporary access token not found");
                return None;
            }
            Err(error) => {
                warn!(
                    token = %token.fingerprint(),
                    error = %error,
                    "temporary access lookup failed; denying access"
                );
                return None;
            }
        };

        if !grant.is_active_at(now) {
            debug!(
                token = %token.fingerprint(),
                expires_at = %grant.expires_at(),
                "temporary access token expired"
            );
            return None;
        }

        Some(grant)
    }

    /// Deletes grants that expired more than `retention` before `now`.
    pub async fn purge_expired_grants(
        &self,
        now: DateTime<Utc>,
        retention: Duration,
    ) -> AppResult<u64> {
        let cutoff = now - retention;
        let removed = self.repository.delete_grants_expired_before(cutoff).await?;
        if removed > 0 {
            info!(removed, %cutoff, "purged expired temporary access grants");
        }

        Ok(removed)
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use woreda_application::AccessGrantRepository;
use woreda_core::{AccessToken, AppError, AppResult, TenantId};
use woreda_domain::AccessGrant;

/// PostgreSQL-backed temporary access grant repository.
#[derive(Clone)]
pub struct PostgresAccessGrantRepository {
    pool: PgPool,
}

impl PostgresAccessGrantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AccessGrantRow {
    id: Uuid,
    token: String,
    woreda_id: Uuid,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl AccessGrantRepository for PostgresAccessGrantRepository {
    async fn find_access_grant_by_token(
        &self,
        token: &AccessToken,
    ) -> AppResult<Option<AccessGrant>> {
        let row = sqlx::query_as::<_, AccessGrantRow>(
            r#"
            SELECT id, token, woreda_id, expires_at, created_at
            FROM temporary_access
            WHERE token = $1
            LIMIT 1
            "#,
        )
        .bind(token.expose())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load temporary access grant '{}': {error}",
                token.fingerprint()
            ))
        })?;

        row.map(|row| {
            let token = AccessToken::parse(row.token.as_str()).ok_or_else(|| {
                AppError::Internal(format!("temporary access grant '{}' has a blank token", row.id))
            })?;

            Ok(AccessGrant::new(
                row.id,
                token,
                TenantId::from_uuid(row.woreda_id),
                row.expires_at,
                row.created_at,
            ))
        })
        .transpose()
    }

    async fn delete_grants_expired_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM temporary_access
            WHERE expires_at < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to purge expired access grants: {error}"))
        })?;

        Ok(result.rows_affected())
    }
}

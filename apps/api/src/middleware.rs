use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;
use woreda_core::{AppError, secrets_match};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_admin_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if !is_authorized_admin(request.headers(), &state.admin_api_token) {
        warn!(path = %request.uri().path(), "rejected admin request");
        return Err(AppError::Unauthorized("admin authentication required".to_owned()).into());
    }

    Ok(next.run(request).await)
}

fn is_authorized_admin(headers: &HeaderMap, expected_token: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|presented| secrets_match(presented.trim(), expected_token))
}

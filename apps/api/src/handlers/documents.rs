use axum::Json;
use axum::extract::{Query, State};

use crate::dto::{DocumentListingQuery, DocumentListingResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_documents_handler(
    State(state): State<AppState>,
    Query(query): Query<DocumentListingQuery>,
) -> ApiResult<Json<DocumentListingResponse>> {
    let Some(token) = query.token() else {
        return Ok(Json(DocumentListingResponse::restricted()));
    };

    let Some(grant) = state.temporary_access_service.validate(token).await else {
        return Ok(Json(DocumentListingResponse::expired()));
    };

    let documents = state.document_access_service.list_for_grant(&grant).await?;

    Ok(Json(DocumentListingResponse::granted(
        &grant, token, documents,
    )))
}

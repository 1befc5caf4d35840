use axum::Json;
use axum::extract::{Query, State};

use crate::dto::{DeleteDocumentQuery, DeleteDocumentResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn delete_document_handler(
    State(state): State<AppState>,
    Query(query): Query<DeleteDocumentQuery>,
) -> ApiResult<Json<DeleteDocumentResponse>> {
    state
        .document_admin_service
        .delete_document(query.id.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(DeleteDocumentResponse { success: true }))
}

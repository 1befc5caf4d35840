use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_DISPOSITION,
    CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS,
};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use woreda_application::DeliveredDocument;

use crate::dto::{DocumentAccessQuery, PublicFileUrlResponse};
use crate::error::ApiResult;
use crate::state::AppState;

const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub async fn view_document_handler(
    State(state): State<AppState>,
    Query(query): Query<DocumentAccessQuery>,
) -> ApiResult<Response> {
    let (token, document_url) = query.required()?;

    let delivered = state
        .document_delivery_service
        .serve(token, document_url)
        .await?;

    Ok(document_response(
        delivered,
        state.document_cache_max_age_secs,
    ))
}

pub async fn public_file_url_handler(
    State(state): State<AppState>,
    Query(query): Query<DocumentAccessQuery>,
) -> ApiResult<Json<PublicFileUrlResponse>> {
    let (token, document_url) = query.required()?;

    let resolved = state
        .document_delivery_service
        .resolve_public_url(token, document_url)
        .await?;

    Ok(Json(PublicFileUrlResponse::from(resolved)))
}

fn document_response(delivered: DeliveredDocument, cache_max_age_secs: u64) -> Response {
    let content_type = HeaderValue::from_str(delivered.content_type.as_str())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&inline_disposition(&delivered.file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("inline"));
    let cache_control = HeaderValue::from_str(&format!("public, max-age={cache_max_age_secs}"))
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"));

    let mut response = Body::from(delivered.bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(CONTENT_DISPOSITION, disposition);
    headers.insert(CACHE_CONTROL, cache_control);
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    response
}

/// Builds an inline disposition with an ASCII fallback and an RFC 5987 UTF-8 name.
fn inline_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|character| match character {
            '"' | '\\' => '_',
            character if character.is_ascii() && !character.is_ascii_control() => character,
            _ => '_',
        })
        .collect();
    let encoded = utf8_percent_encode(file_name, FILENAME_ENCODE_SET);

    format!("inline; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

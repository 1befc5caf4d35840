use axum::Router;
use axum::extract::Request;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info_span;
use woreda_core::AppError;

use crate::state::AppState;
use crate::{handlers, middleware};


/// Proxied document fetch.
pub const VIEW_DOCUMENT_PATH: &str = "/api/documents/view";
/// Legacy alias of the proxied document fetch.
pub const LEGACY_VIEW_FILE_PATH: &str = "/api/view-file";
/// Public storage URL resolution for external viewers.
pub const PUBLIC_FILE_URL_PATH: &str = "/api/get-public-file-url";
/// Administrative document deletion.
pub const DELETE_DOCUMENT_PATH: &str = "/api/admin/delete-document";

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/documents",
            get(handlers::documents::list_documents_handler),
        )
        .route(
            VIEW_DOCUMENT_PATH,
            get(handlers::delivery::view_document_handler),
        )
        .route(
            LEGACY_VIEW_FILE_PATH,
            get(handlers::delivery::view_document_handler),
        )
        .route(
            PUBLIC_FILE_URL_PATH,
            get(handlers::delivery::public_file_url_handler),
        );

    let admin_routes = Router::new()
        .route(
            DELETE_DOCUMENT_PATH,
            delete(handlers::admin::delete_document_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_admin_auth,
        ))
        .layer(build_admin_cors_layer(frontend_url)?);

    Ok(Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(
            // Query strings carry bearer tokens; spans record the path only.
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path()
                )
            }),
        )
        .with_state(app_state))
}

fn build_admin_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]))
}

use std::sync::atomic::Ordering;

use axum::body::to_bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use chrono::{Duration, Utc};
use uuid::Uuid;
use woreda_application::{DocumentCatalogRepository, ProbeOutcome};
use woreda_core::TenantId;
use woreda_domain::DocumentRecord;

use super::admin::delete_document_handler;
use super::delivery::{public_file_url_handler, view_document_handler};
use super::documents::list_documents_handler;
use super::health::health_handler;
use crate::dto::{DeleteDocumentQuery, DocumentAccessQuery, DocumentListingQuery};
use crate::test_support::{
    BUDGET_URL, FakeObjectStorage, OFFICE_URL, TOKEN, harness, json_body, storage_with_budget,
};

fn access_query(token: Option<&str>, url: Option<&str>) -> Query<DocumentAccessQuery> {
    Query(DocumentAccessQuery {
        token: token.map(str::to_owned),
        url: url.map(str::to_owned),
    })
}

#[tokio::test]
async fn view_serves_bytes_with_inline_headers() {
    let harness = harness(storage_with_budget(), Duration::hours(1)).await;

    let response = view_document_handler(
        State(harness.state.clone()),
        access_query(Some(TOKEN), Some(BUDGET_URL)),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok()),
        Some("application/pdf")
    );
    assert_eq!(
        headers
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok()),
        Some("inline; filename=\"budget 2026.pdf\"; filename*=UTF-8''budget%202026.pdf")
    );
    assert_eq!(
        headers.get(CACHE_CONTROL).and_then(|value| value.to_str().ok()),
        Some("public, max-age=600")
    );
    assert_eq!(
        headers
            .get("x-content-type-options")
            .and_then(|value| value.to_str().ok()),
        Some("nosniff")
    );

    let body = to_bytes(response.into_body(), usize::MAX).await;
    assert_eq!(body.ok().as_deref(), Some(&b"%PDF-1.7 budget"[..]));
}

#[tokio::test]
async fn missing_parameters_are_rejected_before_any_lookup() {
    let harness = harness(storage_with_budget(), Duration::hours(1)).await;

    for query in [
        access_query(None, Some(BUDGET_URL)),
        access_query(Some(TOKEN), None),
        access_query(Some("   "), Some(BUDGET_URL)),
    ] {
        let response = view_document_handler(State(harness.state.clone()), query)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response =
        public_file_url_handler(State(harness.state.clone()), access_query(None, None))
            .await
            .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(harness.grants.lookups.load(Ordering::SeqCst), 0);
    assert_eq!(harness.storage.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn token_expired_one_second_ago_is_unauthorized() {
    let harness = harness(storage_with_budget(), Duration::seconds(-1)).await;

    let response = view_document_handler(
        State(harness.state.clone()),
        access_query(Some(TOKEN), Some(BUDGET_URL)),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(harness.storage.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_token_is_unauthorized() {
    let harness = harness(storage_with_budget(), Duration::hours(1)).await;

    let response = public_file_url_handler(
        State(harness.state.clone()),
        access_query(Some("tok-unknown"), Some(BUDGET_URL)),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn other_tenant_document_is_not_found_without_storage_call() {
    let harness = harness(storage_with_budget(), Duration::hours(1)).await;
    let foreign_url = "https://project.supabase.co/storage/v1/object/public/documents/other.pdf";
    harness
        .catalog
        .insert(DocumentRecord::new(
            Uuid::new_v4(),
            TenantId::new(),
            "other.pdf",
            foreign_url,
            None,
            Utc::now(),
        ))
        .await;

    for url in [foreign_url, "https://project.supabase.co/not-catalogued.pdf"] {
        let response = view_document_handler(
            State(harness.state.clone()),
            access_query(Some(TOKEN), Some(url)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_body(response).await;
        assert_eq!(body["error"], "not found: file not found or access denied");
    }

    assert_eq!(harness.storage.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn upstream_failure_is_a_server_error() {
    let harness = harness(FakeObjectStorage::default(), Duration::hours(1)).await;

    let response = view_document_handler(
        State(harness.state.clone()),
        access_query(Some(TOKEN), Some(BUDGET_URL)),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "failed to fetch file from storage");
}

#[tokio::test]
async fn public_url_stays_accessible_when_probe_times_out() {
    let storage = FakeObjectStorage {
        probe_outcome: Some(ProbeOutcome::Failed {
            reason: "operation timed out".to_owned(),
        }),
        ..FakeObjectStorage::default()
    };
    let harness = harness(storage, Duration::hours(1)).await;

    let response = public_file_url_handler(
        State(harness.state.clone()),
        access_query(Some(TOKEN), Some(OFFICE_URL)),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["publicUrl"], OFFICE_URL);
    assert_eq!(body["fileName"], "june.docx");
    assert_eq!(body["isAccessible"], true);
    assert_eq!(body["error"], "storage probe failed: operation timed out");
}

#[tokio::test]
async fn listing_distinguishes_missing_and_expired_tokens() {
    let harness = harness(storage_with_budget(), Duration::seconds(-1)).await;

    let restricted = list_documents_handler(
        State(harness.state.clone()),
        Query(DocumentListingQuery { token: None }),
    )
    .await
    .into_response();
    assert_eq!(restricted.status(), StatusCode::OK);
    assert_eq!(json_body(restricted).await["state"], "restricted");

    let expired = list_documents_handler(
        State(harness.state.clone()),
        Query(DocumentListingQuery {
            token: Some(TOKEN.to_owned()),
        }),
    )
    .await
    .into_response();
    assert_eq!(expired.status(), StatusCode::OK);
    assert_eq!(json_body(expired).await["state"], "expired");
}

#[tokio::test]
async fn listing_groups_tenant_documents_by_category() {
    let harness = harness(storage_with_budget(), Duration::hours(1)).await;
    harness
        .catalog
        .insert(DocumentRecord::new(
            Uuid::new_v4(),
            TenantId::new(),
            "foreign.pdf",
            "https://project.supabase.co/foreign.pdf",
            None,
            Utc::now(),
        ))
        .await;

    let response = list_documents_handler(
        State(harness.state.clone()),
        Query(DocumentListingQuery {
            token: Some(TOKEN.to_owned()),
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["state"], "granted");

    let categories = body["categories"].as_array().cloned().unwrap_or_default();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["category"], "general");
    assert_eq!(categories[0]["documents"][0]["viewer"], "office_document");
    assert!(
        categories[0]["documents"][0]["viewPath"]
            .as_str()
            .is_some_and(|path| path.starts_with("/api/get-public-file-url?token=tok-7f3a9c&url="))
    );
    assert_eq!(categories[1]["category"], "budget");
    assert_eq!(categories[1]["documents"][0]["viewer"], "pdf");
    assert!(
        categories[1]["documents"][0]["viewPath"]
            .as_str()
            .is_some_and(|path| path.starts_with("/api/documents/view?token=tok-7f3a9c&url="))
    );
}

#[tokio::test]
async fn admin_delete_removes_object_then_record() {
    let harness = harness(storage_with_budget(), Duration::hours(1)).await;

    let response = delete_document_handler(
        State(harness.state.clone()),
        Query(DeleteDocumentQuery {
            id: Some(harness.budget_id.to_string()),
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], true);
    assert_eq!(
        harness.storage_admin.removed.lock().await.as_slice(),
        ["budget/2026.pdf".to_owned()]
    );

    let remaining = harness.catalog.find_document(harness.budget_id).await;
    assert!(matches!(remaining, Ok(None)));
}

#[tokio::test]
async fn admin_delete_validates_id() {
    let harness = harness(storage_with_budget(), Duration::hours(1)).await;

    let missing = delete_document_handler(
        State(harness.state.clone()),
        Query(DeleteDocumentQuery { id: None }),
    )
    .await
    .into_response();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let unknown = delete_document_handler(
        State(harness.state.clone()),
        Query(DeleteDocumentQuery {
            id: Some(Uuid::new_v4().to_string()),
        }),
    )
    .await
    .into_response();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_ok() {
    let response = health_handler().await.into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

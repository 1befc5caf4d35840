use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use url::form_urlencoded;
use woreda_application::PublicDocumentUrl;
use woreda_core::AppError;
use woreda_domain::{AccessGrant, DeliveryMode, DocumentRecord};

use crate::api_router::{PUBLIC_FILE_URL_PATH, VIEW_DOCUMENT_PATH};

/// Query parameters shared by the token-gated file endpoints.
#[derive(Debug, Deserialize)]
pub struct DocumentAccessQuery {
    pub token: Option<String>,
    pub url: Option<String>,
}

impl DocumentAccessQuery {
    /// Returns `(token, url)` or a validation error when either is absent or blank.
    pub fn required(&self) -> Result<(&str, &str), AppError> {
        let token = non_blank(self.token.as_deref());
        let url = non_blank(self.url.as_deref());

        match (token, url) {
            (Some(token), Some(url)) => Ok((token, url)),
            _ => Err(AppError::Validation(
                "token and file URL are required".to_owned(),
            )),
        }
    }
}

/// Query parameters for the document listing.
#[derive(Debug, Deserialize)]
pub struct DocumentListingQuery {
    pub token: Option<String>,
}

impl DocumentListingQuery {
    pub fn token(&self) -> Option<&str> {
        non_blank(self.token.as_deref())
    }
}

/// Query parameters for administrative document deletion.
#[derive(Debug, Deserialize)]
pub struct DeleteDocumentQuery {
    pub id: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Tenant document listing, tagged by access state.
#[derive(Debug, Serialize, TS)]
#[serde(tag = "state", rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/document-listing-response.ts"
)]
pub enum DocumentListingResponse {
    /// No token was presented.
    Restricted { message: String },
    /// The token is unknown or expired.
    Expired { message: String },
    /// The token is valid.
    Granted(GrantedDocumentListing),
}

impl DocumentListingResponse {
    pub fn restricted() -> Self {
        Self::Restricted {
            message: "This portal is restricted to approved temporary users. Start the access \
                      flow via your QR code."
                .to_owned(),
        }
    }

    pub fn expired() -> Self {
        Self::Expired {
            message: "The temporary token has expired or is invalid. Request a fresh QR \
                      approval from your administrator."
                .to_owned(),
        }
    }

    pub fn granted(grant: &AccessGrant, token: &str, documents: Vec<DocumentRecord>) -> Self {
        let mut categories: Vec<DocumentCategoryResponse> = Vec::new();

        for document in documents {
            let summary = DocumentSummaryResponse::new(&document, token);
            match categories
                .iter_mut()
                .find(|category| category.category == document.category())
            {
                Some(category) => category.documents.push(summary),
                None => categories.push(DocumentCategoryResponse {
                    category: document.category().to_owned(),
                    documents: vec![summary],
                }),
            }
        }

        Self::Granted(GrantedDocumentListing {
            expires_at: grant
                .expires_at()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            categories,
        })
    }
}

/// Documents visible under a valid grant.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/granted-document-listing.ts"
)]
pub struct GrantedDocumentListing {
    pub expires_at: String,
    pub categories: Vec<DocumentCategoryResponse>,
}

/// Documents sharing one category.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/document-category-response.ts"
)]
pub struct DocumentCategoryResponse {
    pub category: String,
    pub documents: Vec<DocumentSummaryResponse>,
}

/// One listed document and how the client should open it.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/document-summary-response.ts"
)]
pub struct DocumentSummaryResponse {
    pub id: String,
    pub file_name: String,
    pub storage_url: String,
    pub viewer: String,
    pub download_only: bool,
    pub view_path: String,
}

impl DocumentSummaryResponse {
    fn new(document: &DocumentRecord, token: &str) -> Self {
        let viewer = document.viewer_kind();
        let endpoint = match viewer.delivery_mode() {
            DeliveryMode::Proxied => VIEW_DOCUMENT_PATH,
            DeliveryMode::PublicUrl => PUBLIC_FILE_URL_PATH,
        };
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("token", token)
            .append_pair("url", document.storage_url())
            .finish();

        Self {
            id: document.id().to_string(),
            file_name: document.file_name().to_owned(),
            storage_url: document.storage_url().to_owned(),
            viewer: viewer.as_str().to_owned(),
            download_only: viewer.is_download_only(),
            view_path: format!("{endpoint}?{query}"),
        }
    }
}

/// Public storage URL handed to external viewers.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/public-file-url-response.ts"
)]
pub struct PublicFileUrlResponse {
    pub public_url: String,
    pub file_name: String,
    pub is_accessible: bool,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl From<PublicDocumentUrl> for PublicFileUrlResponse {
    fn from(value: PublicDocumentUrl) -> Self {
        Self {
            public_url: value.public_url,
            file_name: value.file_name,
            is_accessible: value.is_accessible,
            error: value.diagnostic,
            message: None,
        }
    }
}

/// Result of an administrative deletion.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/delete-document-response.ts"
)]
pub struct DeleteDocumentResponse {
    pub success: bool,
}

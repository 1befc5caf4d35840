use serde::{Deserialize, Serialize};

/// Rendering strategy a client should use for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerKind {
    /// Inline image.
    Image,
    /// Embedded PDF viewer.
    Pdf,
    /// HTML video element.
    Video,
    /// HTML audio element.
    Audio,
    /// Plain text rendering.
    Text,
    /// Third-party office viewer; needs a directly fetchable URL.
    OfficeDocument,
    /// No inline rendering; download only.
    Unsupported,
}

/// How the gateway hands a file to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Bytes streamed through the portal's own endpoint.
    Proxied,
    /// Raw storage URL returned for the viewer to fetch itself.
    PublicUrl,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "csv", "json", "xml", "html", "css", "js"];
const OFFICE_EXTENSIONS: &[&str] = &["doc", "docx", "xls", "xlsx", "ppt", "pptx"];

impl ViewerKind {
    /// Classifies a file by the extension after its last `.`, case-insensitively.
    ///
    /// `ogg` resolves to [`ViewerKind::Video`]. Names without an extension are unsupported.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Self {
        let Some((_, extension)) = file_name.rsplit_once('.') else {
            return Self::Unsupported;
        };
        let extension = extension.to_ascii_lowercase();
        let extension = extension.as_str();

        if IMAGE_EXTENSIONS.contains(&extension) {
            Self::Image
        } else if extension == "pdf" {
            Self::Pdf
        } else if VIDEO_EXTENSIONS.contains(&extension) {
            Self::Video
        } else if AUDIO_EXTENSIONS.contains(&extension) {
            Self::Audio
        } else if TEXT_EXTENSIONS.contains(&extension) {
            Self::Text
        } else if OFFICE_EXTENSIONS.contains(&extension) {
            Self::OfficeDocument
        } else {
            Self::Unsupported
        }
    }

    /// Returns the delivery mode the gateway must use for this kind.
    #[must_use]
    pub fn delivery_mode(&self) -> DeliveryMode {
        match self {
            Self::OfficeDocument => DeliveryMode::PublicUrl,
            _ => DeliveryMode::Proxied,
        }
    }

    /// Returns whether the client can only offer a download.
    #[must_use]
    pub fn is_download_only(&self) -> bool {
        matches!(self, Self::Unsupported)
    }

    /// Returns a stable transport value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
            Self::OfficeDocument => "office_document",
            Self::Unsupported => "unsupported",
        }
    }
}

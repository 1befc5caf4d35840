//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod document;
mod viewer;

pub use access::AccessGrant;
pub use document::{DEFAULT_DOCUMENT_CATEGORY, DocumentRecord};
pub use viewer::{DeliveryMode, ViewerKind};

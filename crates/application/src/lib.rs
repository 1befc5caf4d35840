//! Application services and ports.

#![forbid(unsafe_code)]

mod document_access_service;
mod document_admin_service;
mod document_delivery_service;
mod document_ports;
mod temporary_access_service;

#[cfg(test)]
mod test_support;

pub use document_access_service::DocumentAccessService;
pub use document_admin_service::{DocumentAdminService, storage_object_path};
pub use document_delivery_service::{
    DeliveredDocument, DocumentDeliveryService, PublicDocumentUrl,
};
pub use document_ports::{
    AccessGrantRepository, DocumentCatalogRepository, ObjectStorage, ProbeOutcome, StorageAdmin,
    StoredObject,
};
pub use temporary_access_service::TemporaryAccessService;

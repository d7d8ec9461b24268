// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! Infrastructure adapters implement these traits; the application layer
//! only ever talks to them through `Arc<dyn Trait>`.
//!
//! # Available Ports
//!
//! - [`listing`]: bucket listing
//! - [`metadata`]: per-object caption/position read and write
//! - [`admin`]: uploads, deletions and raw metadata updates
//!
//! # Design Notes
//!
//! - All traits are `Send + Sync` and async (`async-trait`, so they stay
//!   object safe)
//! - Every failure is a [`TransportError`]; validation happens before a call
//!   reaches a port

pub mod admin;
pub mod listing;
pub mod metadata;
mod transport;

pub use admin::{
    AdminApi, DeleteFilesReport, DeleteFolderReport, PresignedPost, UploadFile, UploadRequest,
};
pub use listing::ObjectLister;
pub use metadata::{MetadataReader, MetadataWriter};
pub use transport::TransportError;

// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`s3`]: public bucket over HTTPS (implements [`ObjectLister`] and
//!   [`MetadataReader`])
//! - [`api`]: admin backend client (implements [`AdminApi`] and
//!   [`MetadataWriter`])
//! - [`memory`]: in-process bucket implementing every port, used by the demo
//!   mode and by tests
//!
//! [`ObjectLister`]: crate::application::port::ObjectLister
//! [`MetadataReader`]: crate::application::port::MetadataReader
//! [`MetadataWriter`]: crate::application::port::MetadataWriter
//! [`AdminApi`]: crate::application::port::AdminApi

pub mod api;
pub mod memory;
pub mod s3;

pub use api::BackendClient;
pub use memory::MemoryStore;
pub use s3::S3HttpStore;

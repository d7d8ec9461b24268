// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`gallery`]: the ordered gallery controller and its autoplay timer
//! - [`browse`]: bucket listing turned into a key tree
//! - [`admin`]: validated uploads, deletions and metadata updates
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The CLI uses application layer services
//!
//! # Example
//!
//! ```ignore
//! use bucket_roster::application::gallery::{GalleryController, GallerySettings};
//! use bucket_roster::infrastructure::MemoryStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::demo("https://tabs.example.com"));
//! let mut gallery =
//!     GalleryController::new(GallerySettings::default(), store.clone(), store.clone(), store);
//! gallery.load_gallery().await?;
//! ```

pub mod admin;
pub mod browse;
pub mod gallery;
pub mod port;

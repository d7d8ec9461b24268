// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core business logic.
//!
//! Pure types and rules with no I/O: nothing here talks to the network or
//! the filesystem.
//!
//! # Modules
//!
//! - [`storage`]: storage keys and listing records ([`ObjectSummary`](storage::ObjectSummary))
//! - [`tree`]: grouping of keys into a directory tree ([`TreeNode`](tree::TreeNode),
//!   [`build_tree`](tree::build_tree))
//! - [`gallery`]: the ordered gallery ([`GalleryState`](gallery::GalleryState),
//!   [`GalleryItem`](gallery::GalleryItem), [`Position`](gallery::Position))

pub mod gallery;
pub mod storage;
pub mod tree;

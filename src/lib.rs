// SPDX-License-Identifier: MPL-2.0
//! `bucket_roster` browses a public object-storage bucket and manages the
//! ordered image roster stored in it.
//!
//! It groups flat storage keys into a navigable tree, drives an ordered
//! slideshow whose order and captions live in per-object metadata, and wraps
//! the admin backend used to upload and delete files.

#![doc(html_root_url = "https://docs.rs/bucket_roster/0.3.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Storage**: where the bucket lives and how objects are addressed
//! - **Gallery**: roster folder, slideshow timing, accepted image types
//! - **Uploads**: size limits enforced before a presigned request is made

// ==========================================================================
// Storage Defaults
// ==========================================================================

/// Path-style API root used for listings and tree leaf URLs.
pub const DEFAULT_STORAGE_ROOT: &str = "https://s3.amazonaws.com";

/// Bucket served by default.
pub const DEFAULT_BUCKET: &str = "tabs.14strings.com";

/// Public (website) URL objects are displayed from.
pub const DEFAULT_PUBLIC_URL: &str = "https://tabs.14strings.com";

// ==========================================================================
// Gallery Defaults
// ==========================================================================

/// Folder holding the roster images.
pub const DEFAULT_GALLERY_FOLDER: &str = "roster";

/// Delay between two autoplay steps, in milliseconds.
pub const DEFAULT_AUTOPLAY_DELAY_MS: u64 = 3000;

/// Shortest accepted autoplay delay, in milliseconds.
pub const MIN_AUTOPLAY_DELAY_MS: u64 = 250;

/// Longest accepted autoplay delay, in milliseconds.
pub const MAX_AUTOPLAY_DELAY_MS: u64 = 60_000;

/// File extensions treated as gallery images.
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

// ==========================================================================
// Upload Limits
// ==========================================================================

/// Largest archive accepted for upload (256 MiB).
pub const MAX_ARCHIVE_UPLOAD_BYTES: u64 = 256 * 1024 * 1024;

/// Largest single non-archive file accepted for upload (10 MiB).
pub const MAX_FILE_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Extension identifying archive uploads.
pub const ARCHIVE_EXTENSION: &str = ".zip";

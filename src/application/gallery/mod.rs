// SPDX-License-Identifier: MPL-2.0
//! Ordered gallery use cases.
//!
//! [`GalleryController`] owns the gallery state and is the only place it is
//! mutated. The presentation layer either calls its methods directly or
//! sends [`GalleryCommand`]s and renders the returned [`Effect`].

mod autoplay;
mod command;
mod controller;

pub use autoplay::AutoplayTimer;
pub use command::{Effect, GalleryCommand, Notice, NoticeLevel};
pub use controller::{GalleryController, GallerySettings};

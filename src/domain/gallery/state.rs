// SPDX-License-Identifier: MPL-2.0
//! Gallery state and its transitions.
//!
//! All operations here are synchronous and never touch the network. The
//! controller in `application::gallery` wraps them with the remote calls.
//!
//! After every reorder, each item's `position` equals its index in the list,
//! so positions are contiguous from zero.

use super::item::{GalleryItem, ItemMetadata, Position};
use super::GalleryError;
use tracing::debug;

/// Loading lifecycle of the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

/// Direction of a keyboard move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Earlier,
    Later,
}

// =============================================================================
// SaveOutcome
// =============================================================================

/// Aggregated result of one save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Number of per-item updates issued.
    pub attempted: usize,
    /// Keys whose update failed.
    pub failed: Vec<String>,
}

impl SaveOutcome {
    #[must_use]
    pub fn saved(&self) -> usize {
        self.attempted.saturating_sub(self.failed.len())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// User-facing summary.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_complete() {
            format!("Saved order of {} images", self.attempted)
        } else {
            format!("Saved {} of {}", self.saved(), self.attempted)
        }
    }

    /// Converts a partial save into [`crate::error::Error::PartialFailure`].
    ///
    /// # Errors
    ///
    /// Returns the partial failure when at least one update failed.
    pub fn into_result(self) -> crate::error::Result<Self> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(crate::error::Error::PartialFailure {
                saved: self.saved(),
                attempted: self.attempted,
            })
        }
    }
}

// =============================================================================
// GalleryState
// =============================================================================

/// State of the ordered gallery. Owned by exactly one controller.
#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    items: Vec<GalleryItem>,
    current_index: usize,
    load_state: LoadState,
    is_auto_playing: bool,
    has_unsaved_changes: bool,
    is_saving: bool,
    error: Option<String>,
    /// Bumped on every local order change; lets a save tell whether the list
    /// moved while its updates were in flight.
    revision: u64,
    saving_revision: u64,
}

impl GalleryState {
    /// Creates an empty gallery in the loading state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ready gallery from already ordered items.
    #[must_use]
    pub fn with_items(items: Vec<GalleryItem>) -> Self {
        let mut state = Self::new();
        state.finish_loading(items);
        state
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Item being viewed; `None` when empty or after an out-of-range `go_to`.
    #[must_use]
    pub fn current_item(&self) -> Option<&GalleryItem> {
        self.items.get(self.current_index)
    }

    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|item| item.key == key)
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    #[must_use]
    pub fn is_auto_playing(&self) -> bool {
        self.is_auto_playing
    }

    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    /// Message of the last failed load, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn set_auto_playing(&mut self, playing: bool) {
        self.is_auto_playing = playing;
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Enters the loading state and clears any previous error.
    pub fn begin_loading(&mut self) {
        self.load_state = LoadState::Loading;
        self.error = None;
    }

    /// Installs freshly loaded items, ordered by position.
    ///
    /// The sort is stable, so items sharing a position keep listing order.
    pub fn finish_loading(&mut self, mut items: Vec<GalleryItem>) {
        items.sort_by_key(|item| item.position);
        debug!(count = items.len(), "gallery loaded");
        self.items = items;
        self.current_index = 0;
        self.load_state = LoadState::Ready;
        self.has_unsaved_changes = false;
        self.error = None;
        self.revision += 1;
    }

    /// Records a failed load. Items from a previous load are kept.
    pub fn fail_loading(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.load_state = LoadState::Failed(message.clone());
        self.error = Some(message);
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Moves to the next item, wrapping at the end.
    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.current_index = (self.current_index + 1) % self.items.len();
    }

    /// Moves to the previous item, wrapping at the start.
    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len();
        self.current_index = (self.current_index + len - 1) % len;
    }

    /// Jumps to `index`. The caller validates the bound; an out-of-range
    /// index leaves [`current_item`](Self::current_item) returning `None`.
    pub fn go_to(&mut self, index: usize) {
        if self.items.is_empty() {
            return;
        }
        self.current_index = index;
    }

    // -------------------------------------------------------------------------
    // Reordering
    // -------------------------------------------------------------------------

    /// Moves the item at `from` to `to` (drag and drop).
    ///
    /// Returns `Ok(false)` when `from == to`.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::IndexOutOfBounds`] if either index is invalid;
    /// the state is left untouched.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool, GalleryError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(false);
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);
        self.current_index = shifted_index(self.current_index, from, to);
        self.mark_reordered();
        debug!(from, to, current = self.current_index, "moved gallery item");
        Ok(true)
    }

    /// Exchanges the items at `a` and `b` (keyboard move).
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::IndexOutOfBounds`] if either index is invalid.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<bool, GalleryError> {
        self.check_index(a)?;
        self.check_index(b)?;
        if a == b {
            return Ok(false);
        }

        self.items.swap(a, b);
        if self.current_index == a {
            self.current_index = b;
        } else if self.current_index == b {
            self.current_index = a;
        }
        self.mark_reordered();
        debug!(a, b, current = self.current_index, "swapped gallery items");
        Ok(true)
    }

    /// Swaps the current item with its neighbour and keeps viewing it.
    ///
    /// Does nothing at either end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::IndexOutOfBounds`] if the current index is stale.
    pub fn move_current(&mut self, direction: Direction) -> Result<bool, GalleryError> {
        if self.items.is_empty() {
            return Ok(false);
        }
        let current = self.current_index;
        let target = match direction {
            Direction::Earlier => match current.checked_sub(1) {
                Some(target) => target,
                None => return Ok(false),
            },
            Direction::Later => current + 1,
        };
        if target >= self.items.len() {
            return Ok(false);
        }
        self.swap(current, target)
    }

    fn check_index(&self, index: usize) -> Result<(), GalleryError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(GalleryError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            })
        }
    }

    fn mark_reordered(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.position = Position::from_index(index);
        }
        self.has_unsaved_changes = true;
        self.revision += 1;
    }

    // -------------------------------------------------------------------------
    // Saving
    // -------------------------------------------------------------------------

    /// Enters the saving state and returns one update per item.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::SaveInProgress`] while another save runs and
    /// [`GalleryError::NothingToSave`] when the order is unchanged.
    pub fn begin_save(&mut self) -> Result<Vec<(String, ItemMetadata)>, GalleryError> {
        if self.is_saving {
            return Err(GalleryError::SaveInProgress);
        }
        if !self.has_unsaved_changes {
            return Err(GalleryError::NothingToSave);
        }

        self.is_saving = true;
        self.saving_revision = self.revision;
        Ok(self
            .items
            .iter()
            .map(|item| (item.key.clone(), item.metadata()))
            .collect())
    }

    /// Leaves the saving state.
    ///
    /// Unsaved changes are cleared only when every update succeeded and the
    /// order did not change while the save was running.
    pub fn finish_save(&mut self, outcome: &SaveOutcome) {
        self.is_saving = false;
        if outcome.is_complete() && self.revision == self.saving_revision {
            self.has_unsaved_changes = false;
        }
    }

    // -------------------------------------------------------------------------
    // Captions
    // -------------------------------------------------------------------------

    /// Replaces the caption of one item. Unsaved-order tracking is unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::UnknownItem`] if no item has `key`.
    pub fn set_caption(&mut self, key: &str, caption: impl Into<String>) -> Result<(), GalleryError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.key == key)
            .ok_or_else(|| GalleryError::UnknownItem(key.to_string()))?;
        item.caption = caption.into();
        Ok(())
    }
}

/// Index of the viewed item after moving `from` to `to`.
fn shifted_index(current: usize, from: usize, to: usize) -> usize {
    if current == from {
        to
    } else if from < current && current <= to {
        current - 1
    } else if to <= current && current < from {
        current + 1
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::ObjectSummary;

    fn item(key: &str, position: u32) -> GalleryItem {
        GalleryItem::from_summary(
            ObjectSummary::new(key, 1),
            "https://example.org",
            ItemMetadata::new(format!("caption {key}"), Position::new(position)),
        )
    }

    fn gallery(keys: &[&str]) -> GalleryState {
        let items = keys
            .iter()
            .enumerate()
            .map(|(i, key)| item(key, i as u32))
            .collect();
        GalleryState::with_items(items)
    }

    fn keys(state: &GalleryState) -> Vec<&str> {
        state.items().iter().map(|item| item.key.as_str()).collect()
    }

    fn positions(state: &GalleryState) -> Vec<u32> {
        state.items().iter().map(|item| item.position.value()).collect()
    }

    #[test]
    fn new_state_is_loading_and_empty() {
        let state = GalleryState::new();
        assert_eq!(state.load_state(), &LoadState::Loading);
        assert!(state.is_empty());
        assert!(state.current_item().is_none());
    }

    #[test]
    fn finish_loading_sorts_by_position_stably() {
        let mut state = GalleryState::new();
        state.finish_loading(vec![
            item("c", 100_000),
            item("a", 2),
            item("d", 100_000),
            item("b", 0),
        ]);
        assert_eq!(keys(&state), vec!["b", "a", "c", "d"]);
        assert_eq!(state.load_state(), &LoadState::Ready);
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn fail_loading_records_error_and_retry_clears_it() {
        let mut state = GalleryState::new();
        state.fail_loading("HTTP 403");
        assert_eq!(state.error(), Some("HTTP 403"));
        assert!(matches!(state.load_state(), LoadState::Failed(_)));

        state.begin_loading();
        assert_eq!(state.error(), None);
        assert_eq!(state.load_state(), &LoadState::Loading);
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut state = gallery(&["a", "b", "c"]);
        state.previous();
        assert_eq!(state.current_index(), 2);
        state.next();
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn next_then_previous_returns_to_start() {
        let mut state = gallery(&["a", "b", "c", "d"]);
        state.go_to(2);
        state.next();
        state.previous();
        assert_eq!(state.current_index(), 2);
    }

    #[test]
    fn navigation_is_noop_when_empty() {
        let mut state = GalleryState::with_items(Vec::new());
        state.next();
        state.previous();
        state.go_to(5);
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn go_to_sets_index_without_validation() {
        let mut state = gallery(&["a", "b"]);
        state.go_to(1);
        assert_eq!(state.current_index(), 1);
        state.go_to(9);
        assert_eq!(state.current_index(), 9);
        assert!(state.current_item().is_none());
    }

    #[test]
    fn reorder_moves_first_to_last() {
        let mut state = gallery(&["a", "b", "c"]);
        assert_eq!(state.reorder(0, 2), Ok(true));
        assert_eq!(keys(&state), vec!["b", "c", "a"]);
        assert_eq!(positions(&state), vec![0, 1, 2]);
        assert!(state.has_unsaved_changes());
    }

    #[test]
    fn reorder_rewrites_sentinel_positions() {
        let mut state = GalleryState::with_items(vec![
            item("a", 100_000),
            item("b", 100_000),
            item("c", 100_000),
        ]);
        state.reorder(2, 0).expect("valid reorder");
        assert_eq!(keys(&state), vec!["c", "a", "b"]);
        assert_eq!(positions(&state), vec![0, 1, 2]);
    }

    #[test]
    fn reorder_follows_moved_current_item() {
        let mut state = gallery(&["a", "b", "c", "d"]);
        state.go_to(1);
        state.reorder(1, 3).expect("valid reorder");
        assert_eq!(state.current_item().map(|i| i.key.as_str()), Some("b"));
        assert_eq!(state.current_index(), 3);
    }

    #[test]
    fn reorder_shifts_current_when_crossed() {
        let mut state = gallery(&["a", "b", "c", "d"]);
        state.go_to(2);
        state.reorder(0, 3).expect("valid reorder");
        assert_eq!(state.current_item().map(|i| i.key.as_str()), Some("c"));

        state.reorder(3, 0).expect("valid reorder");
        assert_eq!(state.current_item().map(|i| i.key.as_str()), Some("c"));
    }

    #[test]
    fn reorder_keeps_current_when_not_crossed() {
        let mut state = gallery(&["a", "b", "c", "d"]);
        state.go_to(0);
        state.reorder(2, 3).expect("valid reorder");
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.current_item().map(|i| i.key.as_str()), Some("a"));
    }

    #[test]
    fn reorder_tracks_current_for_every_move() {
        let names = ["a", "b", "c", "d", "e"];
        for from in 0..names.len() {
            for to in 0..names.len() {
                for current in 0..names.len() {
                    let mut state = gallery(&names);
                    state.go_to(current);
                    let viewed = names[current];
                    state.reorder(from, to).expect("valid reorder");

                    let mut sorted = keys(&state);
                    sorted.sort_unstable();
                    assert_eq!(sorted, names.to_vec());
                    assert_eq!(
                        state.current_item().map(|i| i.key.as_str()),
                        Some(viewed),
                        "from {from} to {to} current {current}"
                    );
                }
            }
        }
    }

    #[test]
    fn reorder_same_index_is_noop() {
        let mut state = gallery(&["a", "b"]);
        assert_eq!(state.reorder(1, 1), Ok(false));
        assert!(!state.has_unsaved_changes());
    }

    #[test]
    fn reorder_out_of_bounds_leaves_state_untouched() {
        let mut state = gallery(&["a", "b"]);
        assert_eq!(
            state.reorder(0, 2),
            Err(GalleryError::IndexOutOfBounds { index: 2, len: 2 })
        );
        assert_eq!(keys(&state), vec!["a", "b"]);
        assert!(!state.has_unsaved_changes());
    }

    #[test]
    fn swap_exchanges_pair_and_follows_current() {
        let mut state = gallery(&["a", "b", "c"]);
        state.go_to(0);
        state.swap(0, 2).expect("valid swap");
        assert_eq!(keys(&state), vec!["c", "b", "a"]);
        assert_eq!(positions(&state), vec![0, 1, 2]);
        assert_eq!(state.current_index(), 2);
        assert!(state.has_unsaved_changes());
    }

    #[test]
    fn move_current_stops_at_edges() {
        let mut state = gallery(&["a", "b", "c"]);
        assert_eq!(state.move_current(Direction::Earlier), Ok(false));

        assert_eq!(state.move_current(Direction::Later), Ok(true));
        assert_eq!(keys(&state), vec!["b", "a", "c"]);
        assert_eq!(state.current_index(), 1);

        state.go_to(2);
        assert_eq!(state.move_current(Direction::Later), Ok(false));
    }

    #[test]
    fn begin_save_requires_changes() {
        let mut state = gallery(&["a", "b"]);
        assert_eq!(state.begin_save(), Err(GalleryError::NothingToSave));
    }

    #[test]
    fn begin_save_rejects_concurrent_save() {
        let mut state = gallery(&["a", "b"]);
        state.swap(0, 1).expect("valid swap");
        let updates = state.begin_save().expect("first save starts");
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].0, "b");
        assert_eq!(updates[0].1.position, Position::new(0));
        assert!(state.is_saving());
        assert_eq!(state.begin_save(), Err(GalleryError::SaveInProgress));
    }

    #[test]
    fn complete_save_clears_unsaved_changes() {
        let mut state = gallery(&["a", "b"]);
        state.swap(0, 1).expect("valid swap");
        state.begin_save().expect("save starts");
        state.finish_save(&SaveOutcome {
            attempted: 2,
            failed: Vec::new(),
        });
        assert!(!state.is_saving());
        assert!(!state.has_unsaved_changes());
    }

    #[test]
    fn partial_save_keeps_unsaved_changes() {
        let mut state = gallery(&["a", "b", "c"]);
        state.reorder(0, 2).expect("valid reorder");
        state.begin_save().expect("save starts");
        let outcome = SaveOutcome {
            attempted: 3,
            failed: vec!["a".to_string(), "c".to_string()],
        };
        state.finish_save(&outcome);
        assert!(!state.is_saving());
        assert!(state.has_unsaved_changes());
        assert_eq!(outcome.summary(), "Saved 1 of 3");
    }

    #[test]
    fn reorder_during_save_keeps_unsaved_changes() {
        let mut state = gallery(&["a", "b", "c"]);
        state.swap(0, 1).expect("valid swap");
        state.begin_save().expect("save starts");
        state.swap(1, 2).expect("valid swap");
        state.finish_save(&SaveOutcome {
            attempted: 3,
            failed: Vec::new(),
        });
        assert!(state.has_unsaved_changes());
    }

    #[test]
    fn set_caption_leaves_order_flags_alone() {
        let mut state = gallery(&["a", "b"]);
        state.set_caption("b", "Bass").expect("known key");
        assert_eq!(state.items()[1].caption, "Bass");
        assert!(!state.has_unsaved_changes());
        assert_eq!(
            state.set_caption("zzz", "nope"),
            Err(GalleryError::UnknownItem("zzz".to_string()))
        );
    }

    #[test]
    fn outcome_into_result_maps_partial_failure() {
        let ok = SaveOutcome {
            attempted: 2,
            failed: Vec::new(),
        };
        assert_eq!(ok.summary(), "Saved order of 2 images");
        assert!(ok.into_result().is_ok());

        let partial = SaveOutcome {
            attempted: 2,
            failed: vec!["x".to_string()],
        };
        assert!(matches!(
            partial.into_result(),
            Err(crate::error::Error::PartialFailure {
                saved: 1,
                attempted: 2
            })
        ));
    }
}

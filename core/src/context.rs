//! Read-only session snapshot for platform communication.
//!
//! `Snapshot` is a simple data container with public fields. After each
//! key event the platform asks the session for a snapshot and reads these
//! fields to update the UI; it never writes back. Zero abstraction - no
//! callbacks, no traits, just data transfer.

use crate::table::Entry;

/// Everything a renderer needs about the current session state.
///
/// # Fields
///
/// - `buffer`: typed-but-uncommitted code keys (shown as preedit)
/// - `output`: the committed text area
/// - `cursor`: byte offset of the text cursor in `output` (0 = append mode)
/// - `candidates`: entries on the visible page, in display order
/// - `page` / `num_pages`: pagination position
/// - `has_prev_page` / `has_next_page`: paging affordances
/// - `is_dead`: the buffer matches nothing (空码)
/// - `auxiliary`: optional hint text, e.g. "空码" or "第2页/3"
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub buffer: String,
    pub output: String,
    pub cursor: usize,
    pub candidates: Vec<Entry>,
    pub page: usize,
    pub num_pages: usize,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub is_dead: bool,
    pub auxiliary: String,
}

impl Snapshot {
    /// Check if there is anything to draw (preedit or candidates).
    pub fn has_visible_state(&self) -> bool {
        !self.buffer.is_empty() || !self.candidates.is_empty()
    }
}

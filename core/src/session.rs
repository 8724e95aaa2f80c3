//! Typing session: the per-user state machine over a shared code table.
//!
//! A session owns the uncommitted code buffer, the text area it commits
//! into, and the current candidate page. Every mutating operation runs the
//! same deterministic pipeline before returning: forced resolution of an
//! over-long buffer first, then the candidate range is recomputed by binary
//! search, then the dead-code rule. There is no reactive dependency graph;
//! state is always consistent when control returns to the caller.
//!
//! The session never fails in steady state. A dead code and an
//! unresolvable over-long buffer are ordinary states the caller reads from
//! the snapshot, not errors.

use crate::candidates;
use crate::context::Snapshot;
use crate::table::{CodeTable, Entry};
use crate::Config;
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

/// State machine for one typing session.
///
/// The table is injected at construction and shared; multiple sessions
/// (and tests) can run over one table or use independent ones. Operations
/// are synchronous and processed to completion in call order, including
/// any cascading auto-commits.
#[derive(Debug, Clone)]
pub struct TypingSession {
    table: Arc<CodeTable>,
    config: Config,

    /// Typed-but-uncommitted code keys.
    buffer: String,

    /// Text area the session commits into.
    output: String,

    /// Byte offset of the text cursor in `output`. Position 0 with no
    /// selection means "append mode": commits go to the end of the text.
    cursor: usize,

    /// Byte length of the selected span starting at `cursor`; replaced by
    /// the next commit.
    selection: usize,

    /// Visible page within the current match range (0-based).
    page: usize,

    /// Match range for the current buffer, recomputed on every mutation.
    /// None when the buffer is empty or matches nothing.
    range: Option<Range<usize>>,
}

impl TypingSession {
    /// Create a session over a shared table with the given rules.
    pub fn new(table: Arc<CodeTable>, config: Config) -> Self {
        Self {
            table,
            config,
            buffer: String::new(),
            output: String::new(),
            cursor: 0,
            selection: 0,
            page: 0,
            range: None,
        }
    }

    pub fn table(&self) -> &CodeTable {
        &self.table
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the rules, e.g. to rebind selection keys mid-session.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The buffer is non-empty and matches nothing (空码).
    pub fn is_dead(&self) -> bool {
        !self.buffer.is_empty() && self.range.is_none()
    }

    /// Match range for the current buffer, if any.
    pub fn candidate_range(&self) -> Option<Range<usize>> {
        self.range.clone()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn num_pages(&self) -> usize {
        match &self.range {
            Some(r) => candidates::num_pages(r.len(), self.config.page_size),
            None => 0,
        }
    }

    pub fn has_prev_page(&self) -> bool {
        self.range.is_some() && self.page > 0
    }

    pub fn has_next_page(&self) -> bool {
        self.page + 1 < self.num_pages()
    }

    /// Entries on the currently visible candidate page.
    pub fn visible_page(&self) -> &[Entry] {
        match &self.range {
            Some(r) => {
                candidates::page_entries(self.table.entries(), r, self.page, self.config.page_size)
            }
            None => &[],
        }
    }

    /// Place the text cursor (byte offset, must lie on a char boundary).
    /// Clears any selection. Position 0 restores append mode.
    pub fn set_cursor(&mut self, pos: usize) -> bool {
        if pos <= self.output.len() && self.output.is_char_boundary(pos) {
            self.cursor = pos;
            self.selection = 0;
            true
        } else {
            false
        }
    }

    /// Select `len` bytes starting at `start`; the next commit replaces the
    /// span. Both ends must lie on char boundaries.
    pub fn set_selection(&mut self, start: usize, len: usize) -> bool {
        let end = match start.checked_add(len) {
            Some(e) => e,
            None => return false,
        };
        if end <= self.output.len()
            && self.output.is_char_boundary(start)
            && self.output.is_char_boundary(end)
        {
            self.cursor = start;
            self.selection = len;
            true
        } else {
            false
        }
    }

    /// Append one typed key to the code buffer. Only lowercase ASCII
    /// letters are code keys; anything else is ignored and reported as
    /// unhandled.
    pub fn append(&mut self, key: char) -> bool {
        if !key.is_ascii_lowercase() {
            return false;
        }
        self.buffer.push(key);
        self.after_buffer_change();
        true
    }

    /// Delete backwards: the last buffer key if there is one, otherwise the
    /// character before the text cursor (in append mode, the final
    /// character of the output).
    pub fn backspace(&mut self) -> bool {
        if !self.buffer.is_empty() {
            self.buffer.pop();
            self.after_buffer_change();
            return true;
        }
        if self.cursor == 0 {
            return self.output.pop().is_some();
        }
        let mut prev = self.cursor;
        while prev > 0 {
            prev -= 1;
            if self.output.is_char_boundary(prev) {
                break;
            }
        }
        self.output.remove(prev);
        self.cursor = prev;
        self.selection = 0;
        true
    }

    /// Discard the buffer without committing. The output text is untouched.
    pub fn escape(&mut self) {
        self.buffer.clear();
        self.page = 0;
        self.range = None;
    }

    /// Commit the candidate at `pos` on the visible page. Out-of-bounds
    /// positions are a no-op: they correspond to stale UI state, not a
    /// programming error.
    pub fn select(&mut self, pos: usize) -> bool {
        let Some(range) = self.range.clone() else {
            return false;
        };
        let visible = candidates::page_range(&range, self.page, self.config.page_size);
        let index = match visible.start.checked_add(pos) {
            Some(i) if i < visible.end => i,
            _ => return false,
        };
        let text = self.table.entries()[index].text.clone();
        debug!(code = %self.buffer, text = %text, "select commit");
        self.commit(&text);
        self.buffer.clear();
        self.page = 0;
        self.range = None;
        true
    }

    /// Advance to the next candidate page; no-op on the last page.
    pub fn page_forward(&mut self) -> bool {
        if self.page + 1 < self.num_pages() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Return to the previous candidate page; no-op on the first page.
    pub fn page_backward(&mut self) -> bool {
        if self.range.is_some() && self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Reset everything, output included. Fresh session over the same table.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.output.clear();
        self.cursor = 0;
        self.selection = 0;
        self.page = 0;
        self.range = None;
    }

    /// Read-only view of the current state for rendering.
    pub fn snapshot(&self) -> Snapshot {
        let num_pages = self.num_pages();
        let auxiliary = if self.is_dead() {
            "空码".to_string()
        } else if num_pages > 1 {
            format!("第{}页/{}", self.page + 1, num_pages)
        } else {
            String::new()
        };
        Snapshot {
            buffer: self.buffer.clone(),
            output: self.output.clone(),
            cursor: self.cursor,
            candidates: self.visible_page().to_vec(),
            page: self.page,
            num_pages,
            has_prev_page: self.has_prev_page(),
            has_next_page: self.has_next_page(),
            is_dead: self.is_dead(),
            auxiliary,
        }
    }

    /// Pipeline run after every buffer mutation: over-length resolution
    /// first, then the range recomputation, then the dead-code rule.
    fn after_buffer_change(&mut self) {
        self.page = 0;
        self.resolve_over_length();
        self.range = self.lookup_range();
        self.resolve_dead_code();
    }

    fn lookup_range(&self) -> Option<Range<usize>> {
        if self.buffer.is_empty() {
            None
        } else {
            self.table.range_of(&self.buffer)
        }
    }

    /// Forced resolution of a buffer longer than the scheme allows.
    ///
    /// With `pop_len > 0` (delayed top) the leading `pop_len` keys are
    /// committed and the remainder is kept for re-evaluation; when the
    /// popped prefix matches nothing the buffer is left completely
    /// unchanged and the user has to backspace. With `pop_len == 0`
    /// (fixed-length top) the leading `max_code_len` keys are resolved and
    /// discarded whether or not they match.
    fn resolve_over_length(&mut self) {
        let max_len = self.config.effective_max_code_len();
        while self.buffer.len() > max_len {
            if self.config.pop_len > 0 {
                let pop = self.config.pop_len.min(self.buffer.len());
                let Some(index) = self.table.first_match(&self.buffer[..pop]) else {
                    // No candidate for the popped prefix: leave the buffer
                    // as typed and let the user recover.
                    break;
                };
                let text = self.table.entries()[index].text.clone();
                debug!(popped = %&self.buffer[..pop], text = %text, "delayed top");
                self.commit(&text);
                self.buffer.drain(..pop);
            } else {
                let text = self
                    .table
                    .first_match(&self.buffer[..max_len])
                    .map(|index| self.table.entries()[index].text.clone());
                if let Some(text) = &text {
                    debug!(code = %&self.buffer[..max_len], text = %text, "fixed-length top");
                    self.commit(text);
                }
                // The leading code is consumed either way; a non-match is
                // silently dropped.
                self.buffer.drain(..max_len);
            }
        }
    }

    /// Auto-resolution of a dead buffer: back off one key at a time until a
    /// shorter prefix matches, commit it, and reseed the buffer with the
    /// most recently typed key so the user can keep going.
    ///
    /// The one-key-at-a-time probe order is part of the scheme semantics:
    /// it commits the earliest successful shorter prefix, not necessarily
    /// the longest match.
    fn resolve_dead_code(&mut self) {
        if self.range.is_some() || self.buffer.is_empty() {
            return;
        }
        if self.buffer.len() <= self.config.dead_code_threshold {
            return;
        }
        // A buffer forced resolution could not consume stays exactly as
        // typed; only backspace recovers it.
        if self.buffer.len() > self.config.effective_max_code_len() {
            return;
        }
        let Some(seed) = self.buffer.chars().last() else {
            return;
        };
        let mut probe = self.buffer.clone();
        loop {
            probe.pop();
            if probe.is_empty() {
                // Nothing shorter matches either; stay dead this round.
                return;
            }
            if let Some(index) = self.table.first_match(&probe) {
                let text = self.table.entries()[index].text.clone();
                debug!(dead = %self.buffer, matched = %probe, text = %text, "dead-code backoff");
                self.commit(&text);
                self.buffer.clear();
                self.buffer.push(seed);
                self.page = 0;
                self.range = self.lookup_range();
                return;
            }
        }
    }

    /// Shared commit path. Cursor at 0 with no selection appends to the
    /// end of the output; otherwise the selected span is replaced (or the
    /// text inserted at the cursor) and the cursor advances past it.
    fn commit(&mut self, text: &str) {
        if self.cursor == 0 && self.selection == 0 {
            self.output.push_str(text);
        } else {
            let end = (self.cursor + self.selection).min(self.output.len());
            self.output.replace_range(self.cursor..end, text);
            self.cursor += text.len();
            self.selection = 0;
        }
    }
}

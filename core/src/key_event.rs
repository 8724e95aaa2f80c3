//! Raw key routing with configurable selection keys.
//!
//! `process_key` is the bridge between a keyboard/UI layer and the typing
//! session operations: it translates selection and commit keys according
//! to the live `Config`, forwards code keys into the buffer, and reports
//! whether the key was consumed so unhandled keys can pass through to the
//! application.

use crate::session::TypingSession;

/// Key event types the engine can process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Character input (code keys, selection keys, commit keys)
    Char(char),
    /// Backspace key
    Backspace,
    /// Escape key (discard the buffer)
    Escape,
    /// Previous candidate page
    PageUp,
    /// Next candidate page
    PageDown,
}

/// Result of processing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// Key was handled by the engine
    Handled,
    /// Key was not handled (pass through to application)
    NotHandled,
}

impl TypingSession {
    /// Process a raw key event.
    ///
    /// Selection and commit keys are consulted only while candidates are
    /// visible, so the same characters type normally into the application
    /// when the session is idle. A selection key pointing past the end of
    /// the page is stale UI state and passes through unhandled.
    pub fn process_key(&mut self, key: KeyEvent) -> KeyResult {
        match key {
            KeyEvent::Char(ch) => {
                if !self.visible_page().is_empty() {
                    if let Some(pos) = self.config().commit_key_index(ch) {
                        return handled(self.select(pos));
                    }
                    if let Some(pos) = self.config().selection_key_index(ch) {
                        return handled(self.select(pos));
                    }
                }
                handled(self.append(ch))
            }
            KeyEvent::Backspace => handled(self.backspace()),
            KeyEvent::Escape => {
                if self.buffer().is_empty() {
                    KeyResult::NotHandled
                } else {
                    self.escape();
                    KeyResult::Handled
                }
            }
            KeyEvent::PageUp => handled(self.page_backward()),
            KeyEvent::PageDown => handled(self.page_forward()),
        }
    }
}

fn handled(did: bool) -> KeyResult {
    if did {
        KeyResult::Handled
    } else {
        KeyResult::NotHandled
    }
}

//! libmabiao-core
//!
//! Code-table (码表) lookup and typing-session engine for table-based
//! Chinese input methods such as Cangjie, Wubi and their relatives.
//!
//! The engine is a pure, synchronous function of three inputs: an immutable
//! sorted [`CodeTable`], a [`Config`] describing the scheme's commit rules,
//! and the history of key events fed into a [`TypingSession`]. Every
//! keystroke recomputes the candidate range by binary search and applies the
//! dead-code and over-length rules before control returns to the caller.
//!
//! Public API:
//! - `Entry` / `CodeTable` - Sorted code → text table with prefix lookup
//! - `TypingSession` - Per-user state machine over a shared table
//! - `KeyEvent` / `KeyResult` - Raw key routing with configurable selection keys
//! - `Snapshot` - Read-only view of session state for rendering
//! - `Config` - Scheme rules and feature flags

use serde::{Deserialize, Serialize};

// Core modules
pub mod table;
pub use table::{CodeTable, Entry};

pub mod search;
pub use search::{first_match, range_of};

pub mod candidates;

pub mod session;
pub use session::TypingSession;

pub mod key_event;
pub use key_event::{KeyEvent, KeyResult};

pub mod context;
pub use context::Snapshot;

/// Rule configuration for one input scheme.
///
/// Supplied once per session. All commit behavior of the typing session is
/// driven by these fields; the table itself carries no rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Maximum code length before forced resolution ("topping"). Must be >= 1.
    pub max_code_len: usize,

    /// If > 0, length of the prefix committed when the buffer exceeds
    /// `max_code_len` (delayed top). If 0, forced resolution matches the
    /// full `max_code_len`-length prefix instead (fixed-length top).
    pub pop_len: usize,

    /// Minimum buffer length before a no-match prefix auto-resolves by
    /// backing off. A dead buffer at or below this length stays on screen.
    pub dead_code_threshold: usize,

    /// Keys selecting candidates 1..9 on the current page
    /// (default: "123456789"). At most 9 are consulted.
    pub select_keys: String,

    /// Primary/secondary/tertiary commit keys, mapped to page positions
    /// 0, 1, 2 (default: space, semicolon, apostrophe). At most 3 are
    /// consulted.
    pub commit_keys: String,

    /// Candidates per page. The classic fixed layout shows 9; UI variants
    /// may derive another value and pass it here.
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_code_len: 4,
            pop_len: 0,
            dead_code_threshold: 2,
            select_keys: "123456789".to_string(),
            commit_keys: " ;'".to_string(),
            page_size: 9,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    // ========== Selection Keys Management ==========

    /// Set the selection keys string. Empty input is ignored; only the
    /// first 9 keys are ever consulted.
    ///
    /// # Example
    /// ```
    /// # use libmabiao_core::Config;
    /// let mut config = Config::default();
    /// config.set_select_keys("asdfghjkl"); // Use home row keys
    /// ```
    pub fn set_select_keys(&mut self, keys: &str) {
        if !keys.is_empty() {
            self.select_keys = keys.chars().take(9).collect();
        }
    }

    /// Set the commit keys string. Empty input is ignored; only the first
    /// 3 keys are ever consulted.
    pub fn set_commit_keys(&mut self, keys: &str) {
        if !keys.is_empty() {
            self.commit_keys = keys.chars().take(3).collect();
        }
    }

    /// Check if a character is a selection key and return the page
    /// position it selects (0-based). Returns None otherwise.
    pub fn selection_key_index(&self, ch: char) -> Option<usize> {
        self.select_keys.chars().take(9).position(|c| c == ch)
    }

    /// Check if a character is a commit key and return the page position
    /// it selects (0, 1 or 2). Returns None otherwise.
    pub fn commit_key_index(&self, ch: char) -> Option<usize> {
        self.commit_keys.chars().take(3).position(|c| c == ch)
    }

    // ========== Rule Management ==========

    /// Set the page size. Zero is ignored.
    pub fn set_page_size(&mut self, size: usize) {
        if size > 0 {
            self.page_size = size;
        }
    }

    /// Maximum code length with the >= 1 floor applied.
    pub fn effective_max_code_len(&self) -> usize {
        self.max_code_len.max(1)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize committed text (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.max_code_len, 4);
        assert_eq!(cfg.pop_len, 0);
        assert_eq!(cfg.page_size, 9);
        assert_eq!(cfg.select_keys, "123456789");
    }

    #[test]
    fn test_selection_key_index() {
        let cfg = Config::default();
        assert_eq!(cfg.selection_key_index('1'), Some(0));
        assert_eq!(cfg.selection_key_index('9'), Some(8));
        assert_eq!(cfg.selection_key_index('a'), None);
    }

    #[test]
    fn test_commit_key_index() {
        let cfg = Config::default();
        assert_eq!(cfg.commit_key_index(' '), Some(0));
        assert_eq!(cfg.commit_key_index(';'), Some(1));
        assert_eq!(cfg.commit_key_index('\''), Some(2));
        assert_eq!(cfg.commit_key_index('x'), None);
    }

    #[test]
    fn test_set_select_keys_truncates() {
        let mut cfg = Config::default();
        cfg.set_select_keys("abcdefghijkl");
        assert_eq!(cfg.select_keys, "abcdefghi");

        // Empty input keeps the previous keys
        cfg.set_select_keys("");
        assert_eq!(cfg.select_keys, "abcdefghi");
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.max_code_len = 5;
        cfg.pop_len = 2;
        cfg.set_select_keys("asdfghjkl");

        let s = cfg.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&s).unwrap();
        assert_eq!(parsed.max_code_len, 5);
        assert_eq!(parsed.pop_len, 2);
        assert_eq!(parsed.select_keys, "asdfghjkl");
        assert_eq!(parsed.commit_keys, " ;'");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(utils::normalize("  你好  "), "你好");
    }
}

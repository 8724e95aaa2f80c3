//! The entry table: an immutable, sorted sequence of (code, text) pairs.
//!
//! A `CodeTable` maps short alphabetic codes to committed output units and
//! is the foundation every lookup in this crate searches over. Tables are
//! built once by a loader (TSV, JSON, or the compiled bincode artifact
//! written by `convert_mabiao`), sorted at construction, and never mutated
//! afterwards; sessions share one through an `Arc`.

use crate::utils;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{info, warn};

/// One code → text mapping.
///
/// `code` is a lowercase ASCII alphabetic key sequence; `text` is one
/// committed output unit (a character or a short word treated atomically).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub code: String,
    pub text: String,
}

impl Entry {
    pub fn new<C: Into<String>, T: Into<String>>(code: C, text: T) -> Self {
        Entry {
            code: code.into(),
            text: text.into(),
        }
    }
}

/// An immutable table of entries sorted ascending by `code`.
///
/// Sort order is ordinary lexicographic string comparison across the whole
/// table, which makes entries sharing a code contiguous and makes every
/// prefix group a single half-open index interval. Lookups rely on this:
/// a table built through [`CodeTable::from_sorted`] with out-of-order input
/// yields unspecified (but memory-safe) search results. The constructors
/// that sort use a stable sort, so entries sharing a code keep their source
/// order.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    entries: Vec<Entry>,
}

impl CodeTable {
    /// Build a table from arbitrary entries. Invalid rows (empty or
    /// non-alphabetic codes, empty text) are dropped with a warning and the
    /// rest are stably sorted by code.
    pub fn new(entries: Vec<Entry>) -> Self {
        let mut entries = sanitize(entries);
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        Self { entries }
    }

    /// Build a table from entries the caller guarantees are already sorted
    /// by code. No validation beyond a debug assertion; an unsorted input
    /// produces unspecified lookup results.
    pub fn from_sorted(entries: Vec<Entry>) -> Self {
        debug_assert!(
            entries.windows(2).all(|w| w[0].code <= w[1].code),
            "entries must be sorted by code"
        );
        Self { entries }
    }

    /// Parse TSV text, one `code<TAB>text` pair per line. Blank lines and
    /// `#` comments are skipped; malformed lines are skipped with a warning.
    pub fn from_tsv_str(content: &str) -> Result<Self, String> {
        let mut entries = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '\t');
            let code = parts.next().unwrap_or("");
            match parts.next() {
                Some(text) => entries.push(Entry::new(code, text)),
                None => warn!("skipping malformed table line: {:?}", line),
            }
        }
        let table = Self::new(entries);
        if table.is_empty() {
            return Err("no valid entries in table".to_string());
        }
        info!("loaded {} entries from tsv", table.len());
        Ok(table)
    }

    /// Parse a JSON array of `{ "code": ..., "text": ... }` objects.
    pub fn from_json_str(content: &str) -> Result<Self, String> {
        let entries: Vec<Entry> =
            serde_json::from_str(content).map_err(|e| format!("parse table json: {}", e))?;
        let table = Self::new(entries);
        if table.is_empty() {
            return Err("no valid entries in table".to_string());
        }
        info!("loaded {} entries from json", table.len());
        Ok(table)
    }

    /// Deserialize a compiled bincode artifact. The entries are re-sorted
    /// once in case the artifact predates a format change.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        let entries: Vec<Entry> =
            bincode::deserialize(bytes).map_err(|e| format!("deserialize table: {}", e))?;
        Ok(Self::new(entries))
    }

    /// Serialize the table to the compiled bincode artifact format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, String> {
        bincode::serialize(&self.entries).map_err(|e| format!("serialize table: {}", e))
    }

    /// Load a table from a file, choosing the format by extension:
    /// `.tsv`/`.txt` → TSV, `.json` → JSON, anything else → bincode.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        let table = match ext {
            "tsv" | "txt" => {
                let content = std::fs::read_to_string(path)?;
                Self::from_tsv_str(&content).map_err(|e| anyhow::anyhow!(e))?
            }
            "json" => {
                let content = std::fs::read_to_string(path)?;
                Self::from_json_str(&content).map_err(|e| anyhow::anyhow!(e))?
            }
            _ => {
                let bytes = std::fs::read(path)?;
                Self::from_bytes(&bytes).map_err(|e| anyhow::anyhow!(e))?
            }
        };
        Ok(table)
    }

    /// Write the compiled bincode artifact to a file.
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let bytes = self.to_bytes().map_err(|e| anyhow::anyhow!(e))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// All entries, sorted by code.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Index range of entries whose code starts with `prefix`, or None.
    /// See [`crate::search::range_of`].
    pub fn range_of(&self, prefix: &str) -> Option<Range<usize>> {
        crate::search::range_of(&self.entries, prefix)
    }

    /// Index of the first entry whose code starts with `prefix`, or None.
    /// See [`crate::search::first_match`].
    pub fn first_match(&self, prefix: &str) -> Option<usize> {
        crate::search::first_match(&self.entries, prefix)
    }

    /// Slice of all entries whose code starts with `prefix` (empty when
    /// nothing matches).
    pub fn matches(&self, prefix: &str) -> &[Entry] {
        match self.range_of(prefix) {
            Some(range) => &self.entries[range],
            None => &[],
        }
    }
}

/// Drop rows that violate the table invariants and normalize the rest.
fn sanitize(entries: Vec<Entry>) -> Vec<Entry> {
    let total = entries.len();
    let kept: Vec<Entry> = entries
        .into_iter()
        .filter_map(|e| {
            let code = e.code.trim();
            let text = utils::normalize(&e.text);
            if code.is_empty() || !code.bytes().all(|b| b.is_ascii_lowercase()) {
                warn!("skipping entry with invalid code: {:?}", e.code);
                return None;
            }
            if text.is_empty() {
                warn!("skipping entry with empty text for code {:?}", code);
                return None;
            }
            Some(Entry::new(code, text))
        })
        .collect();
    if kept.len() < total {
        warn!("dropped {} invalid table entries", total - kept.len());
    }
    kept
}

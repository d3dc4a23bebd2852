//! Persisted per-file cursors

use crate::error::ScannerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Number of lines already attempted, per file name
///
/// Stored as a flat JSON object, e.g. `{"a.txt": 3}`. A file that is not in
/// the map has cursor 0. Cursors never move backwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessingState {
    cursors: BTreeMap<String, usize>,
}

impl ProcessingState {
    /// Empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor for `file_name` (0 when unknown)
    pub fn cursor(&self, file_name: &str) -> usize {
        self.cursors.get(file_name).copied().unwrap_or(0)
    }

    /// Move the cursor of `file_name` forward to `cursor`.
    ///
    /// Moving it backwards is an error and leaves the state unchanged.
    pub fn advance(&mut self, file_name: &str, cursor: usize) -> Result<(), ScannerError> {
        let current = self.cursor(file_name);
        if cursor < current {
            return Err(ScannerError::State(format!(
                "cursor of {} cannot move back from {} to {}",
                file_name, current, cursor
            )));
        }
        self.cursors.insert(file_name.to_string(), cursor);
        Ok(())
    }

    /// Number of tracked files
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    /// True when no file is tracked
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Iterate over `(file name, cursor)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.cursors.iter().map(|(name, cursor)| (name.as_str(), *cursor))
    }

    /// Load state from `path`.
    ///
    /// A missing, unreadable or malformed file yields empty state; the
    /// problem is logged rather than returned.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No state file at {}, starting empty", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("State load error ({}): {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(state) => state,
            Err(e) => {
                warn!("State load error ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write state to `path` via a temporary sibling file
    pub fn save(&self, path: &Path) -> Result<(), ScannerError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ScannerError::State(format!("Failed to serialize state: {}", e)))?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = Path::new(&tmp);

        fs::write(tmp, json)
            .map_err(|e| ScannerError::io(format!("writing {}", tmp.display()), e))?;
        fs::rename(tmp, path)
            .map_err(|e| ScannerError::io(format!("replacing {}", path.display()), e))?;

        debug!("Saved {} cursors to {}", self.len(), path.display());
        Ok(())
    }
}

//! Feedback stores.

use crate::error::ChatError;
use pawtrail_domain::traits::FeedbackRecorder;
use pawtrail_domain::FeedbackRecord;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// One stored row
#[derive(Debug, Serialize)]
struct FeedbackRow<'a> {
    timestamp: u64,
    content: &'a str,
    feedback: &'a str,
}

/// Appends feedback as JSON lines, one record per line
#[derive(Debug, Clone)]
pub struct JsonlFeedbackStore {
    path: PathBuf,
}

impl JsonlFeedbackStore {
    /// Store writing to `path`; the file and its directory are created on first use
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File the store appends to
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedbackRecorder for JsonlFeedbackStore {
    type Error = ChatError;

    fn record(&self, record: &FeedbackRecord) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let row = FeedbackRow {
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            content: &record.content,
            feedback: &record.feedback,
        };
        let mut line = serde_json::to_string(&row)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    records: Vec<FeedbackRecord>,
    failing: bool,
}

/// Keeps feedback in memory; can be switched into a failing mode for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryFeedbackStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryFeedbackStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `record` call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .failing = failing;
    }

    /// Records stored so far
    pub fn records(&self) -> Vec<FeedbackRecord> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .clone()
    }
}

impl FeedbackRecorder for MemoryFeedbackStore {
    type Error = ChatError;

    fn record(&self, record: &FeedbackRecord) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.failing {
            return Err(ChatError::Feedback("store unavailable".to_string()));
        }
        inner.records.push(record.clone());
        Ok(())
    }
}

//! Report types for a scan run

/// A line whose analysis failed and was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFailure {
    /// 1-based line number in the source file
    pub line_number: usize,

    /// Reason for failure
    pub reason: String,

    /// Start of the line's text
    pub content_preview: String,

    /// Start of the raw model answer, when there was one
    pub response_preview: Option<String>,
}

/// Outcome of processing the new lines of one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    /// File name (relative to the scanned directory)
    pub file_name: String,

    /// Cursor before this run
    pub previous_cursor: usize,

    /// Cursor after this run
    pub new_cursor: usize,

    /// Non-blank lines sent to the model
    pub lines_analyzed: usize,

    /// Entries appended to the result file
    pub entries_written: usize,

    /// Lines that were skipped because analysis failed
    pub failures: Vec<LineFailure>,
}

impl FileReport {
    /// Lines attempted in this run, blank lines included
    pub fn lines_attempted(&self) -> usize {
        self.new_cursor - self.previous_cursor
    }
}

/// Outcome of one scan run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Files that had new lines, in processing order
    pub files: Vec<FileReport>,

    /// Files skipped because they could not be read or written
    pub skipped_files: Vec<String>,

    /// Whether the cursor state was written
    pub state_saved: bool,
}

impl ScanReport {
    /// True when at least one file had new lines
    pub fn has_progress(&self) -> bool {
        !self.files.is_empty()
    }

    /// Total entries appended across all files
    pub fn entries_written(&self) -> usize {
        self.files.iter().map(|f| f.entries_written).sum()
    }

    /// Total failed lines across all files
    pub fn failure_count(&self) -> usize {
        self.files.iter().map(|f| f.failures.len()).sum()
    }
}

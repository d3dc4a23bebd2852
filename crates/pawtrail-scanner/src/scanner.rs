//! Core Scanner implementation

use crate::config::ScannerConfig;
use crate::error::ScannerError;
use crate::format::{format_batch, RESULT_HEADER};
use crate::parser::parse_analysis;
use crate::prompt::{PromptBuilder, RESPONSE_FORMAT};
use crate::state::ProcessingState;
use crate::types::{FileReport, LineFailure, ScanReport};
use pawtrail_domain::traits::LlmProvider;
use pawtrail_domain::Analysis;
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Lines not yet attempted: everything from `cursor` (0-based) to the end.
/// A cursor past the end yields nothing.
pub fn pending_lines<T>(lines: &[T], cursor: usize) -> &[T] {
    lines.get(cursor..).unwrap_or(&[])
}

/// The Scanner feeds new lines of text files to an LLM and records the
/// extracted entries
pub struct Scanner<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    config: ScannerConfig,
}

/// Why a single line produced no analysis
struct AnalysisFailure {
    error: ScannerError,
    raw_response: Option<String>,
}

impl<L> Scanner<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a new Scanner
    pub fn new(llm_provider: L, config: ScannerConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Provider in use
    pub fn llm_provider(&self) -> &L {
        &self.llm_provider
    }

    /// Scan every `.txt` file in the input directory once.
    ///
    /// Per-line and per-file problems are logged and reported in the
    /// returned [`ScanReport`]; only a missing input directory or an
    /// uncreatable result file fail the whole run.
    pub fn run(&self) -> Result<ScanReport, ScannerError> {
        let result_path = self.config.result_path();
        let state_path = self.config.state_path();

        let files = self.discover_files()?;
        ensure_result_file(&result_path)?;

        let mut state = ProcessingState::load(&state_path);

        info!(
            "Scanning {} file(s) in {}",
            files.len(),
            self.config.input_dir.display()
        );

        let mut report = ScanReport::default();

        for path in files {
            let file_name = file_name_of(&path);
            match self.process_file(&path, &file_name, &mut state) {
                Ok(Some(file_report)) => report.files.push(file_report),
                Ok(None) => {}
                Err(e) => {
                    warn!("File processing error {}: {}", file_name, e);
                    report.skipped_files.push(file_name);
                }
            }
        }

        if report.has_progress() {
            match state.save(&state_path) {
                Ok(()) => report.state_saved = true,
                Err(e) => error!("State save error: {}", e),
            }
            info!(
                "Scan complete: {} file(s), {} entries, {} failed line(s)",
                report.files.len(),
                report.entries_written(),
                report.failure_count()
            );
        } else {
            info!("No new content to analyze");
        }

        Ok(report)
    }

    /// `.txt` files directly inside the input directory, sorted by name,
    /// excluding the scanner's own output files
    fn discover_files(&self) -> Result<Vec<PathBuf>, ScannerError> {
        let input_dir = &self.config.input_dir;
        if !input_dir.is_dir() {
            return Err(ScannerError::Config(format!(
                "Input directory {} does not exist",
                input_dir.display()
            )));
        }

        let own_files = [
            self.config.result_path(),
            self.config.state_path(),
            self.config.log_path(),
        ];

        let mut files = Vec::new();
        for entry in WalkDir::new(input_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if !entry.file_name().to_string_lossy().ends_with(".txt") {
                continue;
            }
            if own_files.iter().any(|own| own.as_path() == entry.path()) {
                continue;
            }

            files.push(entry.into_path());
        }

        Ok(files)
    }

    /// Process the new lines of one file and advance its cursor.
    ///
    /// Returns `Ok(None)` when the file has no lines beyond its cursor. On
    /// error the cursor is left untouched.
    pub fn process_file(
        &self,
        path: &Path,
        file_name: &str,
        state: &mut ProcessingState,
    ) -> Result<Option<FileReport>, ScannerError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ScannerError::io(format!("reading {}", path.display()), e))?;
        let lines: Vec<&str> = contents.lines().collect();

        let cursor = state.cursor(file_name);
        if pending_lines(&lines, cursor).is_empty() {
            return Ok(None);
        }

        let result_path = self.config.result_path();
        let mut sink = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&result_path)
            .map_err(|e| ScannerError::io(format!("opening {}", result_path.display()), e))?;

        let report = self.process_lines(file_name, &lines, cursor, &mut sink)?;
        state.advance(file_name, report.new_cursor)?;

        Ok(Some(report))
    }

    /// Analyze `lines[cursor..]` and append entries to `sink`.
    ///
    /// Blank lines are not sent to the model but still count toward the new
    /// cursor. A failed line is logged once and skipped.
    pub fn process_lines<W: Write>(
        &self,
        file_name: &str,
        lines: &[&str],
        cursor: usize,
        sink: &mut W,
    ) -> Result<FileReport, ScannerError> {
        let pending = pending_lines(lines, cursor);
        let mut report = FileReport {
            file_name: file_name.to_string(),
            previous_cursor: cursor,
            new_cursor: cursor,
            ..FileReport::default()
        };

        debug!("{}: {} new line(s) from line {}", file_name, pending.len(), cursor + 1);

        for (offset, raw_line) in pending.iter().enumerate() {
            let line_number = cursor + offset + 1;
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            report.lines_analyzed += 1;

            match self.analyze_line(line) {
                Ok(analysis) => {
                    let entries = analysis.entries();
                    if let Some(text) = format_batch(&entries, file_name, line_number) {
                        sink.write_all(text.as_bytes())
                            .and_then(|_| sink.flush())
                            .map_err(|e| ScannerError::io("writing results", e))?;
                        report.entries_written += entries.len();
                    }
                }
                Err(failure) => {
                    let failure = LineFailure {
                        line_number,
                        reason: failure.error.to_string(),
                        content_preview: preview(line, self.config.content_preview_chars),
                        response_preview: failure
                            .raw_response
                            .as_deref()
                            .map(|raw| preview(raw, self.config.response_preview_chars)),
                    };
                    warn!(
                        "Skipped line {} in {}: {} | Content: {} | Response: {}",
                        line_number,
                        file_name,
                        failure.reason,
                        failure.content_preview,
                        failure.response_preview.as_deref().unwrap_or("<none>")
                    );
                    report.failures.push(failure);
                }
            }
        }

        report.new_cursor = cursor + pending.len();
        Ok(report)
    }

    /// Ask the model about one line and decode its answer
    fn analyze_line(&self, line: &str) -> Result<Analysis, AnalysisFailure> {
        let prompt = PromptBuilder::new(line).build();

        let raw = match self.llm_provider.generate_structured(&prompt, RESPONSE_FORMAT) {
            Ok(raw) => raw,
            Err(e) => {
                return Err(AnalysisFailure {
                    error: ScannerError::Llm(e.to_string()),
                    raw_response: None,
                })
            }
        };

        debug!("Raw model response: {}", raw);

        match parse_analysis(&raw) {
            Ok(analysis) => Ok(analysis),
            Err(error) => Err(AnalysisFailure {
                error,
                raw_response: Some(raw),
            }),
        }
    }
}

/// Create the result file with its header if it does not exist yet
fn ensure_result_file(path: &Path) -> Result<(), ScannerError> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, RESULT_HEADER)
        .map_err(|e| ScannerError::io(format!("creating {}", path.display()), e))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// First `max_chars` characters of `text`, with "..." when cut
fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

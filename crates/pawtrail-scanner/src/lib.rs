//! Pawtrail Scanner
//!
//! Resumable, line-by-line extraction of animal and NGO records from text files
//! using a local LLM.
//!
//! # Overview
//!
//! The scanner walks a directory of `.txt` files. For every file it remembers
//! how many lines earlier runs already attempted (the *cursor*) and only sends
//! lines appended since then to the model. Each answer is decoded into typed
//! records and appended to a human-readable result file.
//!
//! # Architecture
//!
//! ```text
//! *.txt → Scanner → (cursor) → LLM → parser → formatter → result file
//!                        ↑                                     |
//!                        └──── ProcessingState (JSON) ←────────┘
//! ```
//!
//! # Key Features
//!
//! - **Exactly-once lines**: cursors only move forward, after a file's new
//!   lines have all been attempted
//! - **Fail-closed decoding**: anything that is not the expected JSON shape is
//!   logged and skipped, never written
//! - **Graceful degradation**: unreadable files and corrupt state never abort
//!   the run
//!
//! # Example Usage
//!
//! ```no_run
//! use pawtrail_scanner::{Scanner, ScannerConfig};
//! use pawtrail_llm::MockProvider;
//!
//! # fn example() -> Result<(), pawtrail_scanner::ScannerError> {
//! let llm = MockProvider::new(r#"{"animal": {"type": "dog", "location": "Pune"}}"#);
//! let config = ScannerConfig::default();
//!
//! let scanner = Scanner::new(llm, config);
//! let report = scanner.run()?;
//!
//! println!("Files with new lines: {}", report.files.len());
//! println!("Entries written: {}", report.entries_written());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod format;
mod parser;
mod prompt;
mod scanner;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use config::ScannerConfig;
pub use error::ScannerError;
pub use parser::parse_analysis;
pub use prompt::PromptBuilder;
pub use scanner::{pending_lines, Scanner};
pub use state::ProcessingState;
pub use types::{FileReport, LineFailure, ScanReport};

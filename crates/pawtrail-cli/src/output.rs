//! Output formatting for the CLI.

use colored::*;
use pawtrail_chat::{ChatTurn, FeedbackStatus};
use pawtrail_domain::ChatReply;
use pawtrail_scanner::ScanReport;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Per-file table of a scan run.
    pub fn scan_summary(&self, report: &ScanReport) -> String {
        if report.files.is_empty() {
            return self.colorize("No files had new lines.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["File", "Lines", "Analyzed", "Entries", "Failed", "Cursor"]);

        for file in &report.files {
            let cursor = format!("{} → {}", file.previous_cursor, file.new_cursor);
            builder.push_record([
                file.file_name.clone(),
                file.lines_attempted().to_string(),
                file.lines_analyzed.to_string(),
                file.entries_written.to_string(),
                file.failures.len().to_string(),
                cursor,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// One history entry, numbered so feedback commands can refer to it.
    pub fn chat_turn(&self, index: usize, turn: &ChatTurn) -> String {
        let role = if turn.message.is_assistant() {
            self.colorize("assistant", "cyan")
        } else {
            self.colorize("you", "magenta")
        };

        let mut out = format!("[{}] {}: {}", index, role, turn.message.content);

        if let Some(state) = turn.feedback {
            let hint = match state.status() {
                FeedbackStatus::Pending => format!("/like {0} or /dislike {0}", index),
                FeedbackStatus::FormOpen => {
                    format!("/feedback {0} <text> or /cancel {0}", index)
                }
                FeedbackStatus::Resolved => "feedback received".to_string(),
            };
            out.push('\n');
            out.push_str(&self.colorize(&format!("    ({})", hint), "blue"));
        }

        out
    }

    /// Details of the latest answer.
    pub fn reply_details(&self, reply: &ChatReply) -> String {
        format!(
            "Model: {}\nSession: {}\nAnswer length: {} chars",
            reply.model,
            reply.session_id,
            reply.answer.chars().count()
        )
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Apply color if enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

//! Human-readable result file format

use pawtrail_domain::entry::field_label;
use pawtrail_domain::ExtractedEntry;

/// First line(s) written to a new result file
pub const RESULT_HEADER: &str = "ANIMAL AND NGO ANALYSIS RESULTS\n\n";

/// Width of the `=` line closing each line's batch of entries
pub const SEPARATOR_WIDTH: usize = 40;

/// Format one entry: header, source, then present fields in fixed order.
/// The result ends with a blank line.
pub fn format_entry(entry: &ExtractedEntry, file_name: &str, line_number: usize) -> String {
    let mut lines = vec![
        format!("=== {} ENTRY ===", entry.kind().label()),
        format!("Source File: {}", file_name),
        format!("Line Number: {}", line_number),
    ];

    for (name, value) in entry.fields() {
        lines.push(format!("{}: {}", field_label(name), value));
    }

    lines.join("\n") + "\n\n"
}

/// Format all entries produced by one source line, closed by the separator.
/// Returns `None` when there is nothing to write.
pub fn format_batch(entries: &[ExtractedEntry], file_name: &str, line_number: usize) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let formatted: Vec<String> = entries
        .iter()
        .map(|entry| format_entry(entry, file_name, line_number))
        .collect();

    Some(format!(
        "{}\n{}\n\n",
        formatted.join("\n"),
        "=".repeat(SEPARATOR_WIDTH)
    ))
}

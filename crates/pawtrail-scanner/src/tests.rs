//! Integration tests for the Scanner

#[cfg(test)]
mod tests {
    use crate::format::RESULT_HEADER;
    use crate::{ProcessingState, Scanner, ScannerConfig};
    use pawtrail_domain::traits::LlmProvider;
    use pawtrail_llm::{LlmError, MockProvider};
    use proptest::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const DOG: &str = r#"{"animal": {"type": "dog", "location": "X"}}"#;
    const NGO: &str = r#"{"ngo": {"name": "Y"}}"#;

    fn scanner_for(dir: &Path, llm: MockProvider) -> Scanner<MockProvider> {
        Scanner::new(llm, ScannerConfig::for_dir(dir))
    }

    fn read_results(dir: &Path) -> String {
        fs::read_to_string(dir.join("analysis_results.txt")).unwrap()
    }

    fn scenario_provider() -> MockProvider {
        let mut llm = MockProvider::new("{}");
        llm.add_rule("User: Found a dog", DOG);
        llm.add_rule("User: garbled", "");
        llm.add_rule("User: Call shelter", NGO);
        llm
    }

    #[test]
    fn test_three_line_scenario() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.txt"),
            "Found a dog at X\ngarbled\nCall shelter Y\n",
        )
        .unwrap();

        let scanner = scanner_for(dir.path(), scenario_provider());
        let report = scanner.run().unwrap();

        assert_eq!(report.files.len(), 1);
        let file = &report.files[0];
        assert_eq!(file.new_cursor, 3);
        assert_eq!(file.lines_analyzed, 3);
        assert_eq!(file.entries_written, 2);
        assert_eq!(file.failures.len(), 1);
        assert_eq!(file.failures[0].line_number, 2);
        assert!(report.state_saved);

        let results = read_results(dir.path());
        let expected = format!(
            "{}=== ANIMAL ENTRY ===\nSource File: a.txt\nLine Number: 1\nType: dog\nLocation: X\n\n\n{sep}\n\n\
             === NGO ENTRY ===\nSource File: a.txt\nLine Number: 3\nName: Y\n\n\n{sep}\n\n",
            RESULT_HEADER,
            sep = "=".repeat(40)
        );
        assert_eq!(results, expected);

        let state = ProcessingState::load(&dir.path().join("processing_state.json"));
        assert_eq!(state.cursor("a.txt"), 3);
    }

    #[test]
    fn test_rerun_without_changes_is_idempotent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "Found a dog at X\n").unwrap();

        let llm = scenario_provider();
        let scanner = scanner_for(dir.path(), llm.clone());
        scanner.run().unwrap();
        assert_eq!(llm.call_count(), 1);

        let state_path = dir.path().join("processing_state.json");
        let saved_at = fs::metadata(&state_path).unwrap().modified().unwrap();
        let results_before = read_results(dir.path());

        let report = scanner.run().unwrap();

        assert!(!report.has_progress());
        assert!(!report.state_saved);
        assert_eq!(llm.call_count(), 1);
        assert_eq!(read_results(dir.path()), results_before);
        assert_eq!(fs::metadata(&state_path).unwrap().modified().unwrap(), saved_at);
    }

    #[test]
    fn test_only_appended_lines_are_processed() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "Found a dog at X\n").unwrap();

        let llm = scenario_provider();
        let scanner = scanner_for(dir.path(), llm.clone());
        scanner.run().unwrap();

        fs::write(&file, "Found a dog at X\n\nCall shelter Y\n").unwrap();
        llm.reset_call_count();
        let report = scanner.run().unwrap();

        assert_eq!(llm.prompts().len(), 1);
        assert!(llm.prompts()[0].ends_with("User: Call shelter Y"));
        assert_eq!(report.files[0].previous_cursor, 1);
        assert_eq!(report.files[0].new_cursor, 3);
        assert!(read_results(dir.path()).contains("Line Number: 3\nName: Y"));
    }

    #[test]
    fn test_entry_count_matches_lines_with_records() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("posts.txt"),
            "Found a dog at X\n\nnothing here\nCall shelter Y\nFound a dog again\n",
        )
        .unwrap();

        let scanner = scanner_for(dir.path(), scenario_provider());
        let report = scanner.run().unwrap();

        assert_eq!(report.entries_written(), 3);
        assert_eq!(report.files[0].lines_analyzed, 4);
        assert_eq!(report.files[0].new_cursor, 5);
        assert_eq!(read_results(dir.path()).matches(" ENTRY ===").count(), 3);
    }

    #[test]
    fn test_corrupt_state_starts_from_scratch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "Found a dog at X\nCall shelter Y\n").unwrap();
        fs::write(dir.path().join("processing_state.json"), "{oops").unwrap();

        let llm = scenario_provider();
        let report = scanner_for(dir.path(), llm.clone()).run().unwrap();

        assert_eq!(llm.call_count(), 2);
        assert_eq!(report.files[0].previous_cursor, 0);
        assert!(report.state_saved);

        let state = ProcessingState::load(&dir.path().join("processing_state.json"));
        assert_eq!(state.cursor("a.txt"), 2);
    }

    #[test]
    fn test_no_new_content_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "one\ntwo\n").unwrap();
        fs::write(dir.path().join("processing_state.json"), r#"{"a.txt": 2}"#).unwrap();

        let llm = scenario_provider();
        let report = scanner_for(dir.path(), llm.clone()).run().unwrap();

        assert!(!report.has_progress());
        assert_eq!(llm.call_count(), 0);
        assert_eq!(
            fs::read_to_string(dir.path().join("processing_state.json")).unwrap(),
            r#"{"a.txt": 2}"#
        );
    }

    #[test]
    fn test_shrunk_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "only line\n").unwrap();
        fs::write(dir.path().join("processing_state.json"), r#"{"a.txt": 5}"#).unwrap();

        let llm = scenario_provider();
        let report = scanner_for(dir.path(), llm.clone()).run().unwrap();

        assert!(!report.has_progress());
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn test_own_files_and_other_extensions_are_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "Found a dog at X\n").unwrap();
        fs::write(dir.path().join("notes.md"), "Found a dog at X\n").unwrap();
        fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let llm = scenario_provider();
        let scanner = scanner_for(dir.path(), llm.clone());
        scanner.run().unwrap();
        // Second run must not pick up the result file it just wrote
        scanner.run().unwrap();

        assert_eq!(llm.call_count(), 1);
        let state = ProcessingState::load(&dir.path().join("processing_state.json"));
        assert_eq!(state.len(), 1);
        assert_eq!(state.cursor("analysis_results.txt"), 0);
    }

    #[test]
    fn test_files_are_processed_in_name_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "Call shelter Y\n").unwrap();
        fs::write(dir.path().join("a.txt"), "Found a dog at X\n").unwrap();

        let report = scanner_for(dir.path(), scenario_provider()).run().unwrap();

        let names: Vec<_> = report.files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), [0xff, 0xfe, 0x00, b'\n']).unwrap();
        fs::write(dir.path().join("b.txt"), "Found a dog at X\n").unwrap();

        let report = scanner_for(dir.path(), scenario_provider()).run().unwrap();

        assert_eq!(report.skipped_files, vec!["a.txt".to_string()]);
        assert_eq!(report.files.len(), 1);

        let state = ProcessingState::load(&dir.path().join("processing_state.json"));
        assert_eq!(state.cursor("a.txt"), 0);
        assert_eq!(state.cursor("b.txt"), 1);
    }

    #[test]
    fn test_header_written_once() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "Found a dog at X\n").unwrap();

        let scanner = scanner_for(dir.path(), scenario_provider());
        scanner.run().unwrap();
        fs::write(dir.path().join("b.txt"), "Found a dog at X\n").unwrap();
        scanner.run().unwrap();

        assert_eq!(read_results(dir.path()).matches("ANIMAL AND NGO ANALYSIS RESULTS").count(), 1);
    }

    #[test]
    fn test_missing_input_dir_fails_run() {
        let dir = TempDir::new().unwrap();
        let scanner = scanner_for(&dir.path().join("absent"), scenario_provider());
        assert!(scanner.run().is_err());
    }

    /// Times out on lines starting with "slow", finds a dog otherwise
    struct SlowModel;

    impl LlmProvider for SlowModel {
        type Error = LlmError;

        fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.generate_structured(prompt, "json")
        }

        fn generate_structured(&self, prompt: &str, _format: &str) -> Result<String, LlmError> {
            if prompt.contains("User: slow") {
                Err(LlmError::Timeout(1))
            } else {
                Ok(DOG.to_string())
            }
        }
    }

    #[test]
    fn test_records_without_values_are_still_written() {
        let llm = MockProvider::new(r#"{"animal": {"type": ""}, "ngo": {"website": "y.org"}}"#);
        let scanner = Scanner::new(llm, ScannerConfig::default());
        let mut sink = Vec::new();

        let report = scanner
            .process_lines("a.txt", &["stray"], 0, &mut sink)
            .unwrap();

        assert_eq!(report.entries_written, 2);
        assert!(report.failures.is_empty());
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            format!(
                "=== ANIMAL ENTRY ===\nSource File: a.txt\nLine Number: 1\n\n\n\
                 === NGO ENTRY ===\nSource File: a.txt\nLine Number: 1\nWebsite: y.org\n\n\n{}\n\n",
                "=".repeat(40)
            )
        );
    }

    #[test]
    fn test_timed_out_line_still_advances_cursor() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "slow post\nFound a dog at X\n").unwrap();

        let report = Scanner::new(SlowModel, ScannerConfig::for_dir(dir.path()))
            .run()
            .unwrap();

        let file = &report.files[0];
        assert_eq!(file.new_cursor, 2);
        assert_eq!(file.entries_written, 1);
        assert_eq!(file.failures.len(), 1);
        assert_eq!(file.failures[0].line_number, 1);
        assert!(file.failures[0].reason.contains("timed out"));

        let state = ProcessingState::load(&dir.path().join("processing_state.json"));
        assert_eq!(state.cursor("a.txt"), 2);
        assert!(read_results(dir.path()).contains("Line Number: 2\nType: dog"));
    }

    proptest! {
        #[test]
        fn prop_exactly_pending_lines_are_offered(
            blanks in proptest::collection::vec(any::<bool>(), 0..30),
            cursor_seed in 0usize..31,
        ) {
            let lines: Vec<String> = blanks
                .iter()
                .enumerate()
                .map(|(i, blank)| if *blank { String::new() } else { format!("line {}", i) })
                .collect();
            let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
            let cursor = cursor_seed.min(lines.len());

            let llm = MockProvider::new("{}");
            let scanner = Scanner::new(llm.clone(), ScannerConfig::default());
            let mut sink = Vec::new();

            let report = scanner.process_lines("a.txt", &line_refs, cursor, &mut sink).unwrap();

            let expected: Vec<String> = lines[cursor..]
                .iter()
                .filter(|l| !l.is_empty())
                .map(|l| format!("User: {}", l))
                .collect();
            let offered = llm.prompts();

            prop_assert_eq!(report.new_cursor, lines.len());
            prop_assert_eq!(offered.len(), expected.len());
            for (prompt, suffix) in offered.iter().zip(expected.iter()) {
                prop_assert!(prompt.ends_with(suffix.as_str()));
            }

            // Running again from the new cursor offers nothing
            llm.reset_call_count();
            let again = scanner.process_lines("a.txt", &line_refs, report.new_cursor, &mut sink).unwrap();
            prop_assert_eq!(again.new_cursor, lines.len());
            prop_assert_eq!(llm.call_count(), 0);
        }
    }
}

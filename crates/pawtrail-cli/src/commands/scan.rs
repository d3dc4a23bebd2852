//! Scan command implementation.

use crate::cli::ScanArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::logging;
use crate::output::Formatter;
use pawtrail_llm::OllamaProvider;
use pawtrail_scanner::{ScanReport, Scanner, ScannerConfig};
use std::path::PathBuf;

/// Execute the scan command.
pub fn execute_scan(args: ScanArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let scanner_config = scanner_config(args.dir, args.model, args.endpoint, config);
    scanner_config.validate().map_err(CliError::Config)?;

    logging::init_file_logging(&scanner_config.log_path())?;

    let provider = OllamaProvider::from_settings(scanner_config.ollama_settings())?;

    if !args.skip_check {
        println!(
            "{}",
            formatter.info(&format!(
                "Testing Ollama connection ({} at {})...",
                provider.model(),
                provider.endpoint()
            ))
        );
        match provider.check_connection() {
            Ok(reply) => {
                println!("{}", formatter.success(&format!("Ollama test response: {}", reply.trim())));
            }
            Err(e) => {
                eprintln!(
                    "{}",
                    formatter.warning("Make sure Ollama is running and the model is downloaded.")
                );
                return Err(CliError::Connection(format!("Ollama connection failed: {}", e)));
            }
        }
    }

    let scanner = Scanner::new(provider, scanner_config);
    let report = scanner.run()?;

    print_report(&report, scanner.config(), formatter);
    Ok(())
}

/// Configured scanner settings with command-line overrides applied.
pub fn scanner_config(
    dir: Option<PathBuf>,
    model: Option<String>,
    endpoint: Option<String>,
    config: &Config,
) -> ScannerConfig {
    let mut scanner_config = config.scanner.clone();
    if let Some(dir) = dir {
        scanner_config.input_dir = dir;
    }
    if let Some(model) = model {
        scanner_config.model = model;
    }
    if let Some(endpoint) = endpoint {
        scanner_config.endpoint = endpoint;
    }
    scanner_config
}

fn print_report(report: &ScanReport, config: &ScannerConfig, formatter: &Formatter) {
    for file_name in &report.skipped_files {
        eprintln!("{}", formatter.warning(&format!("Skipped {}", file_name)));
    }

    if !report.has_progress() {
        println!("{}", formatter.info("No new content to analyze."));
        return;
    }

    println!("{}", formatter.scan_summary(report));

    if report.failure_count() > 0 {
        println!(
            "{}",
            formatter.warning(&format!("{} line(s) could not be analyzed", report.failure_count()))
        );
    }
    if !report.state_saved {
        eprintln!(
            "{}",
            formatter.warning("Progress could not be saved; new lines will be analyzed again")
        );
    }

    println!(
        "{}",
        formatter.success(&format!(
            "Analysis complete. Check {} for results and {} for any errors",
            config.result_path().display(),
            config.log_path().display()
        ))
    );
}

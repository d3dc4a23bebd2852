//! Pawtrail CLI - scan text posts for animal and NGO records, chat about them.

use clap::Parser;
use pawtrail_cli::commands;
use pawtrail_cli::{Cli, Command, Config, Formatter};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> pawtrail_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load config, falling back to defaults when the file does not exist
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };
    let config = Config::load_from(&config_path)?;

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(color_enabled);

    match cli.command {
        Command::Scan(args) => commands::execute_scan(args, &config, &formatter),
        Command::Chat(args) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::execute_chat(args, &config, &formatter))
        }
        Command::Config(args) => commands::execute_config(args, &config, &config_path, &formatter),
    }
}

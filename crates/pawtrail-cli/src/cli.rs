//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pawtrail - Extract animal and NGO records from text posts and chat about them.
#[derive(Debug, Parser)]
#[command(name = "pawtrail")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PAWTRAIL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze new lines of the .txt files in a directory
    Scan(ScanArgs),

    /// Start an interactive chat with the rescue assistant
    Chat(ChatArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the scan command.
#[derive(Debug, Default, Parser)]
pub struct ScanArgs {
    /// Directory to scan (defaults to the configured input directory)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Ollama model to use
    #[arg(short, long, env = "PAWTRAIL_MODEL")]
    pub model: Option<String>,

    /// Ollama API endpoint
    #[arg(short, long, env = "OLLAMA_HOST")]
    pub endpoint: Option<String>,

    /// Skip the connectivity check before scanning
    #[arg(long)]
    pub skip_check: bool,
}

/// Arguments for the chat command.
#[derive(Debug, Default, Parser)]
pub struct ChatArgs {
    /// Base URL of the chat API
    #[arg(short, long, env = "PAWTRAIL_API_URL")]
    pub api_url: Option<String>,

    /// Model requested from the chat API
    #[arg(short, long)]
    pub model: Option<String>,

    /// File that receives submitted feedback (JSON lines)
    #[arg(short, long)]
    pub feedback_file: Option<PathBuf>,

    /// Continue an existing remote chat session
    #[arg(short, long)]
    pub session_id: Option<String>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_flags() {
        let cli = Cli::try_parse_from([
            "pawtrail",
            "--no-color",
            "scan",
            "--dir",
            "posts",
            "--model",
            "llama3",
            "--skip-check",
        ])
        .unwrap();

        assert!(cli.no_color);
        match cli.command {
            Command::Scan(args) => {
                assert_eq!(args.dir, Some(PathBuf::from("posts")));
                assert_eq!(args.model.as_deref(), Some("llama3"));
                assert!(args.skip_check);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_chat_session() {
        let cli =
            Cli::try_parse_from(["pawtrail", "chat", "--api-url", "http://x", "-s", "s-7"]).unwrap();
        match cli.command {
            Command::Chat(args) => {
                assert_eq!(args.api_url.as_deref(), Some("http://x"));
                assert_eq!(args.session_id.as_deref(), Some("s-7"));
                assert!(args.model.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from(["pawtrail", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { force: true }
            })
        ));
    }

    #[test]
    fn test_command_required() {
        assert!(Cli::try_parse_from(["pawtrail"]).is_err());
    }
}

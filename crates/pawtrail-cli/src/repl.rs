//! Interactive chat REPL.

use crate::config::app_dir;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pawtrail_chat::{ChatError, ChatSession};
use pawtrail_domain::traits::{ChatBackend, FeedbackRecorder};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::warn;

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Send a question to the assistant
    Ask(String),
    /// Thumbs up for message N
    Like(usize),
    /// Thumbs down for message N, opening its feedback form
    Dislike(usize),
    /// Close the feedback form of message N
    Cancel(usize),
    /// Submit feedback text for message N
    Feedback(usize, String),
    /// Print the conversation so far
    History,
    /// Print details of the latest answer
    Details,
    /// Print the command list
    Help,
    /// Leave the REPL
    Exit,
}

/// Parse a REPL input line.
///
/// Lines that do not start with `/` are questions.
pub fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CliError::InvalidInput("Empty input".to_string()));
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Ok(ReplCommand::Ask(line.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match name {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "history" => Ok(ReplCommand::History),
        "details" => Ok(ReplCommand::Details),
        "like" => Ok(ReplCommand::Like(parse_index(name, args)?)),
        "dislike" => Ok(ReplCommand::Dislike(parse_index(name, args)?)),
        "cancel" => Ok(ReplCommand::Cancel(parse_index(name, args)?)),
        "feedback" => {
            let (index, text) = match args.split_once(char::is_whitespace) {
                Some((index, text)) => (index, text.trim()),
                None => (args, ""),
            };
            Ok(ReplCommand::Feedback(
                parse_index(name, index)?,
                text.to_string(),
            ))
        }
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: /{}. Type /help for available commands.",
            name
        ))),
    }
}

fn parse_index(command: &str, arg: &str) -> Result<usize> {
    if arg.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "/{} needs a message number",
            command
        )));
    }
    arg.parse::<usize>().map_err(|_| {
        CliError::InvalidInput(format!("Invalid message number: {}", arg))
    })
}

/// Run the interactive chat loop until `/exit` or end of input.
pub async fn run_chat<B, R>(
    backend: &B,
    recorder: &R,
    session: &mut ChatSession,
    formatter: &Formatter,
) -> Result<()>
where
    B: ChatBackend,
    B::Error: Into<ChatError>,
    R: FeedbackRecorder,
    R::Error: Display,
{
    println!(
        "{}",
        formatter.info("Pawtrail chat - ask about animals and rescue groups, /help for commands")
    );
    println!();

    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("pawtrail> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(command) => {
                        execute_repl_command(command, backend, recorder, session, formatter)
                            .await;
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use /exit to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// Execute one REPL command against the session.
///
/// Problems are reported to the user; the loop keeps running.
pub async fn execute_repl_command<B, R>(
    command: ReplCommand,
    backend: &B,
    recorder: &R,
    session: &mut ChatSession,
    formatter: &Formatter,
) where
    B: ChatBackend,
    B::Error: Into<ChatError>,
    R: FeedbackRecorder,
    R::Error: Display,
{
    match command {
        ReplCommand::Ask(prompt) => {
            println!("{}", formatter.info("Generating response..."));
            let outcome = session.ask(backend, &prompt).await.map(|_| ());
            match outcome {
                Ok(()) => {
                    let index = session.len() - 1;
                    println!("{}", formatter.chat_turn(index, &session.turns()[index]));
                }
                Err(e) => {
                    warn!("Chat request failed: {}", e);
                    eprintln!(
                        "{}",
                        formatter.error("Failed to get a response from the API. Please try again.")
                    );
                }
            }
        }
        ReplCommand::Like(index) => match session.like(index) {
            Ok(_) => println!("{}", formatter.success("Thank you for your feedback!")),
            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
        },
        ReplCommand::Dislike(index) => match session.dislike(index) {
            Ok(_) => println!(
                "{}",
                formatter.info(&format!(
                    "Please help us improve: /feedback {0} <what was wrong>, or /cancel {0}",
                    index
                ))
            ),
            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
        },
        ReplCommand::Cancel(index) => match session.cancel_feedback(index) {
            Ok(_) => println!("{}", formatter.info("Feedback cancelled")),
            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
        },
        ReplCommand::Feedback(index, text) => {
            match session.submit_feedback(index, &text, recorder) {
                Ok(_) => println!("{}", formatter.success("Thank you for your feedback!")),
                Err(ChatError::EmptyFeedback) => {
                    println!("{}", formatter.warning("Please enter some feedback before submitting."))
                }
                Err(ChatError::Feedback(_)) => {
                    eprintln!("{}", formatter.error("Failed to save feedback."))
                }
                Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
            }
        }
        ReplCommand::History => {
            if session.is_empty() {
                println!("{}", formatter.info("No messages yet"));
            }
            for (index, turn) in session.turns().iter().enumerate() {
                println!("{}", formatter.chat_turn(index, turn));
            }
        }
        ReplCommand::Details => match session.last_reply() {
            Some(reply) => println!("{}", formatter.reply_details(reply)),
            None => println!("{}", formatter.info("No answer yet")),
        },
        ReplCommand::Help => print_help(formatter),
        ReplCommand::Exit => {}
    }
}

/// Print REPL help.
fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Type a question to ask the assistant."));
    println!();
    println!("Commands:");
    println!("  /like N              Mark answer N as helpful");
    println!("  /dislike N           Mark answer N as unhelpful and open its feedback form");
    println!("  /feedback N <text>   Submit feedback for answer N");
    println!("  /cancel N            Close the feedback form of answer N");
    println!("  /history             Show the conversation");
    println!("  /details             Show model and session of the latest answer");
    println!("  /help                Show this help");
    println!("  /exit                Leave the chat");
}

/// Get the REPL history file path.
fn get_history_path() -> Result<PathBuf> {
    let dir = app_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

//! Pawtrail Chat
//!
//! Client library for a remote chat-completion API plus the in-memory state
//! of one interactive chat session, including thumbs-up / thumbs-down
//! feedback on assistant answers.
//!
//! # Example
//!
//! ```no_run
//! use pawtrail_chat::{ChatClient, ChatSession, JsonlFeedbackStore};
//!
//! # async fn example() -> Result<(), pawtrail_chat::ChatError> {
//! let client = ChatClient::new("http://localhost:8000")?;
//! let store = JsonlFeedbackStore::new("feedback.jsonl");
//! let mut session = ChatSession::new("gpt-4o-mini");
//!
//! let reply = session.ask(&client, "Which shelters in Pune take cats?").await?;
//! println!("{}", reply.answer);
//!
//! let idx = session.len() - 1;
//! session.dislike(idx)?;
//! session.submit_feedback(idx, "Two of these shelters closed last year", &store)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod error;
mod feedback;
mod session;

pub use client::{ChatClient, DEFAULT_TIMEOUT_SECS};
pub use error::ChatError;
pub use feedback::{JsonlFeedbackStore, MemoryFeedbackStore};
pub use session::{ChatSession, ChatTurn, FeedbackOutcome, FeedbackState, FeedbackStatus};

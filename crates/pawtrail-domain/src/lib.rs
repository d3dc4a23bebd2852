//! Pawtrail Domain Layer
//!
//! This crate holds the domain model shared by the batch scanner and the chat
//! session. It has ZERO external dependencies and defines the value types and
//! trait interfaces that the infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Entry**: one extracted record, either an animal or an NGO
//! - **Analysis**: the decoded model answer for a single line of text
//! - **Chat message**: a user prompt or an assistant answer in a session
//! - **Feedback record**: a user's free-text comment on an assistant answer
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure data and formatting helpers only
//! - Trait definitions for every external collaborator (model, chat API,
//!   feedback store)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chat;
pub mod entry;
pub mod traits;

// Re-exports for convenience
pub use chat::{ChatMessage, ChatReply, FeedbackRecord, Role};
pub use entry::{AnimalRecord, Analysis, EntityKind, ExtractedEntry, NgoRecord};

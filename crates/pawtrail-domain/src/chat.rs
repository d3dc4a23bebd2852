//! Chat module - messages exchanged in an interactive session

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The person typing prompts
    User,
    /// The remote model answering them
    Assistant,
}

impl Role {
    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single message in a chat history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Who wrote the message
    pub role: Role,
    /// Message text (markdown)
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Whether feedback can be given on this message
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

/// Free-text feedback about one assistant answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    /// The assistant answer the feedback is about
    pub content: String,
    /// What the user wrote
    pub feedback: String,
}

/// Answer returned by the remote chat-completion API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Generated answer
    pub answer: String,
    /// Session identifier to send with the next prompt
    pub session_id: String,
    /// Model that produced the answer
    pub model: String,
}

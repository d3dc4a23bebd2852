//! Chat session state: ordered history and per-answer feedback.

use crate::error::ChatError;
use pawtrail_domain::traits::{ChatBackend, FeedbackRecorder};
use pawtrail_domain::{ChatMessage, ChatReply, FeedbackRecord};
use std::fmt::Display;
use tracing::{info, warn};

/// Feedback flags of one assistant message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackState {
    /// The free-text form is open
    pub show_form: bool,
    /// Feedback was given (thumbs up, or a submitted comment)
    pub submitted: bool,
}

/// Summary of a [`FeedbackState`] for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackStatus {
    /// Nothing given yet
    Pending,
    /// Waiting for the user's comment
    FormOpen,
    /// Feedback recorded
    Resolved,
}

impl FeedbackState {
    /// Current status
    pub fn status(&self) -> FeedbackStatus {
        if self.submitted {
            FeedbackStatus::Resolved
        } else if self.show_form {
            FeedbackStatus::FormOpen
        } else {
            FeedbackStatus::Pending
        }
    }
}

/// What a feedback action did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// Positive feedback accepted, nothing else needed
    Acknowledged,
    /// Form opened, waiting for text
    FormOpened,
    /// Form closed without recording anything
    Cancelled,
    /// Comment handed to the feedback store
    Recorded,
}

/// One entry of the chat history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    /// The message
    pub message: ChatMessage,
    /// Feedback flags; only assistant messages have them
    pub feedback: Option<FeedbackState>,
}

/// In-memory state of one interactive chat
#[derive(Debug, Clone)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
    session_id: Option<String>,
    model: String,
    last_reply: Option<ChatReply>,
}

impl ChatSession {
    /// Start an empty session talking to `model`
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            turns: Vec::new(),
            session_id: None,
            model: model.into(),
            last_reply: None,
        }
    }

    /// Continue an existing remote session
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// History in order
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True before the first message
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Remote session identifier, once the API assigned one
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Model requested for new prompts
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Details of the most recent successful reply
    pub fn last_reply(&self) -> Option<&ChatReply> {
        self.last_reply.as_ref()
    }

    /// Send `prompt` and append the answer.
    ///
    /// The user message is kept in history even when the request fails.
    pub async fn ask<B>(&mut self, backend: &B, prompt: &str) -> Result<&ChatReply, ChatError>
    where
        B: ChatBackend,
        B::Error: Into<ChatError>,
    {
        self.turns.push(ChatTurn {
            message: ChatMessage::user(prompt),
            feedback: None,
        });

        let reply = backend
            .send(prompt, self.session_id.as_deref(), &self.model)
            .await
            .map_err(Into::<ChatError>::into)?;

        if !reply.session_id.is_empty() {
            self.session_id = Some(reply.session_id.clone());
        }

        self.turns.push(ChatTurn {
            message: ChatMessage::assistant(reply.answer.clone()),
            feedback: Some(FeedbackState::default()),
        });

        Ok(self.last_reply.insert(reply))
    }

    /// Thumbs up: resolve immediately and hide the form
    pub fn like(&mut self, index: usize) -> Result<FeedbackOutcome, ChatError> {
        let state = self.feedback_mut(index)?;
        state.show_form = false;
        state.submitted = true;
        Ok(FeedbackOutcome::Acknowledged)
    }

    /// Thumbs down: open the free-text form
    pub fn dislike(&mut self, index: usize) -> Result<FeedbackOutcome, ChatError> {
        let state = self.feedback_mut(index)?;
        state.show_form = true;
        state.submitted = false;
        Ok(FeedbackOutcome::FormOpened)
    }

    /// Close the form without recording anything
    pub fn cancel_feedback(&mut self, index: usize) -> Result<FeedbackOutcome, ChatError> {
        let state = self.feedback_mut(index)?;
        state.show_form = false;
        state.submitted = false;
        Ok(FeedbackOutcome::Cancelled)
    }

    /// Submit the comment typed into an open form.
    ///
    /// Empty text is rejected and a store failure is reported; in both cases
    /// the form stays open so the user can retry.
    pub fn submit_feedback<R>(
        &mut self,
        index: usize,
        text: &str,
        recorder: &R,
    ) -> Result<FeedbackOutcome, ChatError>
    where
        R: FeedbackRecorder,
        R::Error: Display,
    {
        let state = self.feedback_mut(index)?;
        if !state.show_form {
            return Err(ChatError::FeedbackFormClosed(index));
        }
        if text.trim().is_empty() {
            return Err(ChatError::EmptyFeedback);
        }

        let record = FeedbackRecord {
            content: self.turns[index].message.content.clone(),
            feedback: text.to_string(),
        };

        if let Err(e) = recorder.record(&record) {
            warn!("Failed to save feedback for message #{}: {}", index, e);
            return Err(ChatError::Feedback(e.to_string()));
        }

        info!("Recorded feedback for message #{}", index);
        let state = self.feedback_mut(index)?;
        state.show_form = false;
        state.submitted = true;
        Ok(FeedbackOutcome::Recorded)
    }

    /// Feedback flags of message `index`
    pub fn feedback(&self, index: usize) -> Result<FeedbackState, ChatError> {
        let turn = self.turns.get(index).ok_or(ChatError::NoSuchMessage(index))?;
        turn.feedback.ok_or(ChatError::NotAssistantMessage(index))
    }

    fn feedback_mut(&mut self, index: usize) -> Result<&mut FeedbackState, ChatError> {
        let turn = self
            .turns
            .get_mut(index)
            .ok_or(ChatError::NoSuchMessage(index))?;
        turn.feedback
            .as_mut()
            .ok_or(ChatError::NotAssistantMessage(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryFeedbackStore;

    fn session_with_answer() -> ChatSession {
        let mut session = ChatSession::new("m");
        session.turns.push(ChatTurn {
            message: ChatMessage::user("Any shelters in Goa?"),
            feedback: None,
        });
        session.turns.push(ChatTurn {
            message: ChatMessage::assistant("Try Goa Animal Welfare Trust."),
            feedback: Some(FeedbackState::default()),
        });
        session
    }

    #[test]
    fn test_like_resolves() {
        let mut session = session_with_answer();
        assert_eq!(session.like(1).unwrap(), FeedbackOutcome::Acknowledged);
        assert_eq!(session.feedback(1).unwrap().status(), FeedbackStatus::Resolved);
    }

    #[test]
    fn test_dislike_then_cancel() {
        let mut session = session_with_answer();
        session.dislike(1).unwrap();
        assert_eq!(session.feedback(1).unwrap().status(), FeedbackStatus::FormOpen);

        session.cancel_feedback(1).unwrap();
        assert_eq!(session.feedback(1).unwrap(), FeedbackState::default());
    }

    #[test]
    fn test_dislike_after_like_reopens() {
        let mut session = session_with_answer();
        session.like(1).unwrap();
        session.dislike(1).unwrap();

        let state = session.feedback(1).unwrap();
        assert!(state.show_form);
        assert!(!state.submitted);
    }

    #[test]
    fn test_empty_feedback_keeps_form_open() {
        let mut session = session_with_answer();
        let store = MemoryFeedbackStore::new();
        session.dislike(1).unwrap();

        let result = session.submit_feedback(1, "   ", &store);
        assert!(matches!(result, Err(ChatError::EmptyFeedback)));
        assert_eq!(session.feedback(1).unwrap().status(), FeedbackStatus::FormOpen);
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_submit_records_pair() {
        let mut session = session_with_answer();
        let store = MemoryFeedbackStore::new();
        session.dislike(1).unwrap();

        let outcome = session.submit_feedback(1, "That trust moved", &store).unwrap();

        assert_eq!(outcome, FeedbackOutcome::Recorded);
        assert_eq!(session.feedback(1).unwrap().status(), FeedbackStatus::Resolved);
        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "Try Goa Animal Welfare Trust.");
        assert_eq!(records[0].feedback, "That trust moved");
    }

    #[test]
    fn test_store_failure_keeps_form_open() {
        let mut session = session_with_answer();
        let store = MemoryFeedbackStore::new();
        store.set_failing(true);
        session.dislike(1).unwrap();

        let result = session.submit_feedback(1, "wrong", &store);
        assert!(matches!(result, Err(ChatError::Feedback(_))));
        assert_eq!(session.feedback(1).unwrap().status(), FeedbackStatus::FormOpen);

        // Retry succeeds once the store recovers
        store.set_failing(false);
        assert!(session.submit_feedback(1, "wrong", &store).is_ok());
    }

    #[test]
    fn test_submit_requires_open_form() {
        let mut session = session_with_answer();
        let store = MemoryFeedbackStore::new();

        let result = session.submit_feedback(1, "text", &store);
        assert!(matches!(result, Err(ChatError::FeedbackFormClosed(1))));
    }

    #[test]
    fn test_feedback_on_user_or_missing_message() {
        let mut session = session_with_answer();
        assert!(matches!(session.like(0), Err(ChatError::NotAssistantMessage(0))));
        assert!(matches!(session.dislike(5), Err(ChatError::NoSuchMessage(5))));
    }
}

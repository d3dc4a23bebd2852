//! Chat command implementation.

use crate::cli::ChatArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging;
use crate::output::Formatter;
use crate::repl;
use pawtrail_chat::{ChatClient, ChatSession, JsonlFeedbackStore};
use tracing::info;

/// Execute the chat command.
pub async fn execute_chat(args: ChatArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    logging::init_stderr_logging()?;

    let api_url = args.api_url.unwrap_or_else(|| config.chat.api_url.clone());
    let model = args.model.unwrap_or_else(|| config.chat.model.clone());
    let feedback_file = args
        .feedback_file
        .unwrap_or_else(|| config.chat.feedback_file.clone());

    let client = ChatClient::with_timeout(&api_url, config.chat.request_timeout())?;
    let store = JsonlFeedbackStore::new(feedback_file);
    let mut session = ChatSession::new(model);
    if let Some(session_id) = args.session_id {
        session = session.with_session_id(session_id);
    }

    info!(
        "Chatting with {} (model {}), feedback goes to {}",
        client.api_url(),
        session.model(),
        store.path().display()
    );

    repl::run_chat(&client, &store, &mut session, formatter).await
}

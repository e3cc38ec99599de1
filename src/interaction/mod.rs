//! Event handling and user interactions for autoreply.
//!
//! This module wires chat messages to the core:
//! - Routing messages to handlers via an explicitly built [`Dispatcher`]
//! - Learning question/answer pairs from replies
//! - Answering questions when a confident match exists
//! - Leaving chats on request

pub mod answering;
pub mod dispatcher;
pub mod learning;
pub mod leave;

use tracing::debug;

use crate::{
    base::config::Config,
    service::{db::DbClient, matcher::Matcher},
};

use dispatcher::{Dispatcher, MessageFilter};

/// Command that makes the bot leave the current chat.
pub const LEAVE_COMMAND: &str = "leave";

/// Builds the dispatcher with the handlers enabled by the configuration.
///
/// Order matters: `/leave` first, then replies (learning), then plain text (answering).
/// A reply is therefore learned but never answered.
pub fn build_dispatcher(config: &Config, db: DbClient, matcher: Matcher) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();

    dispatcher.add_handler(MessageFilter::Command(LEAVE_COMMAND.to_string()), |message, chat| async move { leave::handle_leave(message, &chat).await });

    if config.learning {
        debug!("Enabling learning handler.");

        let config = config.clone();
        dispatcher.add_handler(MessageFilter::Reply, move |message, _chat| {
            let db = db.clone();
            let config = config.clone();
            async move { learning::handle_learning(message, &db, &config).await }
        });
    }

    if config.answering {
        debug!("Enabling answering handler.");

        let config = config.clone();
        dispatcher.add_handler(MessageFilter::Text, move |message, chat| {
            let matcher = matcher.clone();
            let config = config.clone();
            async move { answering::handle_answering(message, &chat, &matcher, &config).await }
        });
    }

    dispatcher
}

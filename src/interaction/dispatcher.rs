//! Routes incoming messages to handlers.
//!
//! A [`Dispatcher`] holds an ordered list of bindings from a [`MessageFilter`] to a
//! handler. The first binding whose filter matches a message handles it, and the
//! rest are skipped.

use std::{future::Future, pin::Pin, sync::Arc};

use tracing::{Instrument, debug, error, instrument};

use crate::{
    base::types::{ChatMessage, Void},
    service::chat::ChatClient,
};

// Types.

pub type BoxedHandler = Arc<dyn Fn(ChatMessage, ChatClient) -> Pin<Box<dyn Future<Output = Void> + Send>> + Send + Sync>;

/// Decides which messages a handler receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageFilter {
    /// `/name`, optionally addressed as `/name@bot` and followed by arguments.
    Command(String),
    /// Any message that replies to another message.
    Reply,
    /// Any text that is not a command, including whitespace-only text.
    Text,
}

impl MessageFilter {
    /// Does `message` pass this filter for a bot called `bot_name`?
    pub fn matches(&self, message: &ChatMessage, bot_name: &str) -> bool {
        match self {
            MessageFilter::Command(name) => parse_command(&message.text).is_some_and(|(command, target)| command == name.as_str() && target.is_none_or(|t| t == bot_name)),
            MessageFilter::Reply => message.reply_to_text.is_some(),
            MessageFilter::Text => !message.text.starts_with('/'),
        }
    }
}

// Structs.

/// Message router for the application.
///
/// This is constructed once at startup and handed to the chat client; it is trivially
/// cloneable.
#[derive(Clone, Default)]
pub struct Dispatcher {
    bindings: Vec<(MessageFilter, BoxedHandler)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a binding; earlier bindings take precedence.
    pub fn add_handler<F, Fut>(&mut self, filter: MessageFilter, handler: F)
    where
        F: Fn(ChatMessage, ChatClient) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Void> + Send + 'static,
    {
        debug!("Registering handler for {:?}.", filter);

        let handler: BoxedHandler = Arc::new(move |message: ChatMessage, chat: ChatClient| -> Pin<Box<dyn Future<Output = Void> + Send>> {
            Box::pin(handler(message, chat))
        });
        self.bindings.push((filter, handler));
    }

    /// The registered filters, in precedence order.
    pub fn filters(&self) -> impl Iterator<Item = &MessageFilter> {
        self.bindings.iter().map(|(filter, _)| filter)
    }

    /// Hands `message` to the first matching handler.
    ///
    /// Returns whether any handler took the message. Handler errors are logged and
    /// swallowed: users never see them.
    #[instrument(skip_all, fields(chat_id = %message.chat_id, message_id = %message.message_id))]
    pub async fn dispatch(&self, message: ChatMessage, chat: ChatClient) -> bool {
        let Some((filter, handler)) = self.bindings.iter().find(|(filter, _)| filter.matches(&message, chat.bot_name())) else {
            debug!("No handler for message.");
            return false;
        };

        debug!("Dispatching to {:?} handler.", filter);

        if let Err(err) = (**handler)(message, chat).in_current_span().await {
            error!("Error while handling: {}", err);
        }

        true
    }
}

// Helpers.

/// Splits `/name@target args` into `(name, target)`.
fn parse_command(text: &str) -> Option<(&str, Option<&str>)> {
    let word = text.trim_start().strip_prefix('/')?.split_whitespace().next()?;

    match word.split_once('@') {
        Some((name, target)) => Some((name, Some(target))),
        None => Some((word, None)),
    }
}

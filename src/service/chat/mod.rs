pub mod console;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::{base::types::Void, interaction::dispatcher::Dispatcher};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This is the seam between the bot and a messaging service. A client turns the
/// service's events into [`ChatMessage`](crate::base::types::ChatMessage)s, hands them
/// to the dispatcher, and carries out the few actions the handlers ask for.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot's user name.
    ///
    /// Commands addressed to another bot (`/leave@other_bot`) are ignored.
    fn bot_name(&self) -> &str;

    /// Start the chat client listener.
    ///
    /// Feeds every incoming message to `dispatcher` until the service disconnects
    /// or the process is asked to stop.
    async fn start(&self, dispatcher: Dispatcher) -> Void;

    /// Reply to a message in a chat.
    async fn reply(&self, chat_id: &str, message_id: &str, text: &str) -> Void;

    /// Leave a chat.
    async fn leave_chat(&self, chat_id: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}

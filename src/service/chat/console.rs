//! Local console chat client.
//!
//! Every line read from stdin is a message in a single chat. A line starting with `>`
//! replies to the message before it (which may be one of the bot's own replies), so
//! a conversation can be taught by hand:
//!
//! ```text
//! how are you?
//! > fine, thanks
//! how are you doing?
//! < fine, thanks
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, BufReader, stdin},
    sync::Mutex,
};
use tracing::{info, instrument};

use crate::{
    base::types::{ChatMessage, Void},
    interaction::dispatcher::Dispatcher,
};

use super::{ChatClient, GenericChatClient};

/// Chat id used for the single console conversation.
pub const CONSOLE_CHAT_ID: &str = "console";

/// Name the console bot answers to in commands.
pub const CONSOLE_BOT_NAME: &str = "autoreply";

// Extra methods on `ChatClient` applied by the console implementation.

impl ChatClient {
    /// Creates a chat client that talks over stdin / stdout.
    pub fn console() -> Self {
        Self::from(ConsoleChatClient::default())
    }
}

impl From<ConsoleChatClient> for ChatClient {
    fn from(client: ConsoleChatClient) -> Self {
        Self::new(Arc::new(client))
    }
}

// Structs.

#[derive(Default)]
struct ConsoleState {
    /// Text of the most recent message, from either side; `>` lines reply to it.
    last_text: Mutex<Option<String>>,
    next_message_id: AtomicU64,
    left: AtomicBool,
}

/// Console client implementation.
#[derive(Clone, Default)]
pub struct ConsoleChatClient {
    state: Arc<ConsoleState>,
}

impl ConsoleChatClient {
    fn next_message_id(&self) -> String {
        (self.state.next_message_id.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }
}

#[async_trait]
impl GenericChatClient for ConsoleChatClient {
    fn bot_name(&self) -> &str {
        CONSOLE_BOT_NAME
    }

    async fn start(&self, dispatcher: Dispatcher) -> Void {
        info!("Console chat started. Prefix a line with `>` to reply to the previous message; `/leave` quits.");

        let chat = ChatClient::from(self.clone());
        let mut lines = BufReader::new(stdin()).lines();

        loop {
            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, shutting down.");
                    break;
                }
            };

            // End of input.
            let Some(line) = line else { break };

            let message = {
                let mut last_text = self.state.last_text.lock().await;
                let Some(message) = parse_line(&line, self.next_message_id(), last_text.clone()) else { continue };
                *last_text = Some(message.text.clone());
                message
            };

            dispatcher.dispatch(message, chat.clone()).await;

            if self.state.left.load(Ordering::SeqCst) {
                break;
            }
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn reply(&self, _chat_id: &str, _message_id: &str, text: &str) -> Void {
        println!("< {text}");
        *self.state.last_text.lock().await = Some(text.to_string());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn leave_chat(&self, _chat_id: &str) -> Void {
        println!("(left the chat)");
        self.state.left.store(true, Ordering::SeqCst);

        Ok(())
    }
}

// Helpers.

/// Turns a console line into a message; blank lines are skipped.
fn parse_line(line: &str, message_id: String, previous: Option<String>) -> Option<ChatMessage> {
    let line = line.trim();

    let (text, is_reply) = match line.strip_prefix('>') {
        Some(rest) => (rest.trim(), true),
        None => (line, false),
    };

    if text.is_empty() {
        return None;
    }

    let message = ChatMessage::new(CONSOLE_CHAT_ID, message_id, text);

    match previous {
        Some(previous) if is_reply => Some(message.replying_to(previous)),
        _ => Some(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_messages() {
        let message = parse_line("  hello there ", "1".to_string(), Some("before".to_string())).unwrap();

        assert_eq!(message, ChatMessage::new(CONSOLE_CHAT_ID, "1", "hello there"));
    }

    #[test]
    fn quoted_lines_reply_to_previous() {
        let message = parse_line("> hi!", "2".to_string(), Some("hello there".to_string())).unwrap();

        assert_eq!(message.text, "hi!");
        assert_eq!(message.reply_to_text.as_deref(), Some("hello there"));
    }

    #[test]
    fn quoted_line_without_previous_is_plain() {
        let message = parse_line(">hi!", "1".to_string(), None).unwrap();

        assert_eq!(message.reply_to_text, None);
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert!(parse_line("", "1".to_string(), None).is_none());
        assert!(parse_line(">   ", "1".to_string(), Some("x".to_string())).is_none());
    }

    #[tokio::test]
    async fn replies_become_the_previous_message() {
        let client = ConsoleChatClient::default();

        client.reply(CONSOLE_CHAT_ID, "1", "fine, thanks").await.unwrap();

        assert_eq!(client.state.last_text.lock().await.as_deref(), Some("fine, thanks"));
    }

    #[tokio::test]
    async fn leaving_sets_the_flag() {
        let client = ConsoleChatClient::default();

        client.leave_chat(CONSOLE_CHAT_ID).await.unwrap();

        assert!(client.state.left.load(Ordering::SeqCst));
    }
}

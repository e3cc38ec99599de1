use thiserror::Error;

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Errors raised by the document store and the match engine.
///
/// These travel inside [`Err`]; use `err.downcast_ref::<CoreError>()` to tell them apart.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A question or answer was empty (or only whitespace).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The persistence backend failed to read or write.
    #[error("storage failure: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl CoreError {
    /// Wrap a backend error.
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self::Storage(err.into())
    }
}

/// Outcome of a best-answer lookup.
///
/// `Empty` means there was nothing to compare against, which is different from
/// a `Found` with a low score.
#[derive(Debug, Clone, PartialEq)]
pub enum BestAnswer {
    Found { answer: String, score: f64 },
    Empty,
}

impl BestAnswer {
    /// The answer and its score, if any document was compared.
    pub fn found(self) -> Option<(String, f64)> {
        match self {
            BestAnswer::Found { answer, score } => Some((answer, score)),
            BestAnswer::Empty => None,
        }
    }
}

/// An incoming chat message, as handed over by a chat client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// The chat (channel, group, conversation) the message was posted in.
    pub chat_id: String,
    /// Identifies the message within its chat; replies are threaded onto it.
    pub message_id: String,
    /// The message text.
    pub text: String,
    /// Text of the message this one replies to, if it is a reply.
    pub reply_to_text: Option<String>,
}

impl ChatMessage {
    pub fn new(chat_id: impl Into<String>, message_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            message_id: message_id.into(),
            text: text.into(),
            reply_to_text: None,
        }
    }

    /// Mark this message as a reply to a message with the given text.
    pub fn replying_to(mut self, text: impl Into<String>) -> Self {
        self.reply_to_text = Some(text.into());
        self
    }
}

//! Answers messages that closely match a learned question.

use tracing::{debug, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{BestAnswer, ChatMessage, Void},
    },
    service::{chat::ChatClient, matcher::Matcher},
};

/// Replies with the best learned answer when its score clears the threshold.
///
/// Low-confidence matches and an empty store both result in silence.
#[instrument(skip_all)]
pub async fn handle_answering(message: ChatMessage, chat: &ChatClient, matcher: &Matcher, config: &Config) -> Void {
    let question = message.text.as_str();

    match matcher.best_answer(question).await? {
        BestAnswer::Found { answer, score } if score > config.threshold => {
            info!("{} -> {} ({:.3})", question, answer, score);

            chat.reply(&message.chat_id, &message.message_id, &answer).await?;
        }
        BestAnswer::Found { score, .. } => debug!("No confident answer to `{}` (best score {:.3}).", question, score),
        BestAnswer::Empty => debug!("No answer to `{}`.", question),
    }

    Ok(())
}

//! Learns question/answer pairs from replies.

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{ChatMessage, Void},
    },
    service::db::DbClient,
};

/// Stores the replied-to text as a question and the reply as its answer.
///
/// With `skip_duplicates` on, a pair that is already stored verbatim is not added again.
#[instrument(skip_all)]
pub async fn handle_learning(message: ChatMessage, db: &DbClient, config: &Config) -> Void {
    let Some(question) = message.reply_to_text.as_deref() else {
        return Ok(());
    };
    let answer = message.text.as_str();

    let document = if config.skip_duplicates {
        let Some(document) = db.add_document_if_new(question, answer).await? else {
            info!("Already learned `{}` -> `{}`.", question, answer);
            return Ok(());
        };
        document
    } else {
        db.add_document(question, answer).await?
    };

    info!("Learned document {}: `{}` -> `{}`.", document.id, document.question, document.answer);

    Ok(())
}

use tracing::{info, instrument};

use crate::{
    base::types::{ChatMessage, Void},
    service::chat::ChatClient,
};

/// Handles the `/leave` command.
#[instrument(skip_all)]
pub async fn handle_leave(message: ChatMessage, chat: &ChatClient) -> Void {
    info!("Leave from chat {}.", message.chat_id);

    chat.leave_chat(&message.chat_id).await
}

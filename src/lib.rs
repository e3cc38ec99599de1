//! Library root for `autoreply`.
//!
//! Autoreply is a chat bot that learns by watching conversations:
//! - When a message replies to another, the pair is stored as a question and its answer
//! - When a new message closely resembles a stored question, the bot replies with that answer
//!
//! Similarity is a plain string measure (longest matching blocks), computed against
//! every stored question. The bot integrates with SurrealDB for storage, and chat
//! services plug in through the `GenericChatClient` trait.

pub mod base;
pub mod interaction;
pub mod prelude;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the autoreply runtime:
/// - Creates the runtime context with database, matcher, and chat clients
/// - Starts the chat loop for processing messages
pub async fn start(config: Config) -> Void {
    info!("Starting autoreply ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}

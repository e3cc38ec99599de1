//! Runtime services and shared state for autoreply.

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::{self, dispatcher::Dispatcher},
    service::{chat::ChatClient, db::DbClient, matcher::Matcher},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the database client, matcher, chat client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The database client instance.
    pub db: DbClient,
    /// The matcher instance.
    pub matcher: Matcher,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the database.
        let db = DbClient::surreal(&config).await?;

        // Initialize the matcher.
        let matcher = Matcher::new(db.clone());

        // Initialize the chat client.
        let chat = ChatClient::console();

        Ok(Self { config, db, matcher, chat })
    }

    /// Build the message dispatcher for this runtime.
    pub fn dispatcher(&self) -> Dispatcher {
        interaction::build_dispatcher(&self.config, self.db.clone(), self.matcher.clone())
    }

    pub async fn start(&self) -> Void {
        info!("Starting with {} documents.", self.db.count().await?);

        self.chat.start(self.dispatcher()).await
    }
}

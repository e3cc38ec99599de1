//! Document storage for learned question/answer pairs.

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::base::types::{CoreError, Res};

pub mod surreal;

// Types.

/// A stored question/answer pair.
///
/// Documents are immutable once created and are never deleted by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Assigned on insertion; strictly increasing in insertion order.
    pub id: i64,
    pub question: String,
    pub answer: String,
    /// Informational only.
    pub created_at: DateTime<Utc>,
}

// Traits.

/// Generic document store trait that backends must implement.
///
/// The store is append-only: pairs are added and read back, never updated or removed.
/// Implementations must serialize writes so that concurrent inserts never lose a record
/// or reuse an id, and every snapshot must be internally consistent.
#[async_trait]
pub trait GenericDbClient: Send + Sync + 'static {
    /// Appends a new pair and returns it with its assigned id.
    ///
    /// This never deduplicates. Empty or whitespace-only text is rejected with
    /// [`CoreError::InvalidInput`] before anything is written.
    async fn add_document(&self, question: &str, answer: &str) -> Res<Document>;

    /// Appends the pair unless exactly this pair is already stored.
    ///
    /// The check and the insert are one write, so concurrent calls with the same pair
    /// store it once. Returns `None` when the pair was already present.
    async fn add_document_if_new(&self, question: &str, answer: &str) -> Res<Option<Document>>;

    /// Returns the number of stored pairs.
    async fn count(&self) -> Res<u64>;

    /// Returns every stored pair in insertion order.
    ///
    /// This is a full scan and it runs once per query, so lookups are linear in the
    /// size of the store. That is acceptable for the thousands of pairs a chat
    /// accumulates, and there is deliberately no index behind it.
    async fn all_documents(&self) -> Res<Vec<Document>>;

    /// Returns true if exactly this question/answer pair is already stored.
    async fn has_document(&self, question: &str, answer: &str) -> Res<bool>;
}

// Structs.

/// Database client for autoreply.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct DbClient {
    inner: Arc<dyn GenericDbClient>,
}

impl Deref for DbClient {
    type Target = dyn GenericDbClient;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl DbClient {
    pub fn new(inner: Arc<dyn GenericDbClient>) -> Self {
        Self { inner }
    }
}

// Helpers.

/// Rejects text that would pollute the corpus.
pub(crate) fn validate_pair(question: &str, answer: &str) -> Res<()> {
    if question.trim().is_empty() {
        return Err(CoreError::InvalidInput("question must not be empty".to_string()).into());
    }

    if answer.trim().is_empty() {
        return Err(CoreError::InvalidInput("answer must not be empty".to_string()).into());
    }

    Ok(())
}

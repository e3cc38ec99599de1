//! SurrealDB implementation of the document store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use surrealdb::{
    Surreal,
    engine::any::{Any, connect},
    opt::auth::Root,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::base::{
    config::Config,
    types::{CoreError, Res},
};

use super::{DbClient, Document, GenericDbClient, validate_pair};

// Extra methods on `DbClient` applied by the surreal implementation.

impl DbClient {
    /// Connects to the SurrealDB endpoint named in the configuration.
    pub async fn surreal(config: &Config) -> Res<Self> {
        let client = SurrealDbClient::new(config).await?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Creates a throwaway in-memory store.
    pub async fn surreal_memory() -> Res<Self> {
        let client = SurrealDbClient::connect("mem://", None, "autoreply", "documents").await?;
        Ok(Self::new(Arc::new(client)))
    }
}

// Records.

/// A document row as stored in SurrealDB.
#[derive(Debug, Deserialize)]
struct DocumentRecord {
    seq: i64,
    question: String,
    answer: String,
    created_at: String,
}

impl TryFrom<DocumentRecord> for Document {
    type Error = CoreError;

    fn try_from(record: DocumentRecord) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&record.created_at).map_err(CoreError::storage)?.with_timezone(&Utc);

        Ok(Document {
            id: record.seq,
            question: record.question,
            answer: record.answer,
            created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CountRecord {
    count: u64,
}

// Queries.

const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS document SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS seq ON document TYPE int;
DEFINE FIELD IF NOT EXISTS question ON document TYPE string;
DEFINE FIELD IF NOT EXISTS answer ON document TYPE string;
DEFINE FIELD IF NOT EXISTS created_at ON document TYPE string;
DEFINE INDEX IF NOT EXISTS document_seq ON document FIELDS seq UNIQUE;
DEFINE TABLE IF NOT EXISTS counter SCHEMALESS;
"#;

/// Bumps the id sequence and appends the document in one transaction.
const ADD_DOCUMENT: &str = r#"
BEGIN TRANSACTION;
LET $counter = (UPSERT ONLY counter:document SET last += 1);
CREATE ONLY document CONTENT { seq: $counter.last, question: $question, answer: $answer, created_at: $created_at };
COMMIT TRANSACTION;
"#;

const COUNT_DOCUMENTS: &str = "SELECT count() AS count FROM document GROUP ALL";

const ALL_DOCUMENTS: &str = "SELECT seq, question, answer, created_at FROM document ORDER BY seq ASC";

const FIND_DOCUMENT: &str = "SELECT VALUE seq FROM document WHERE question = $question AND answer = $answer LIMIT 1";

// Specific implementations.

/// SurrealDB document store.
pub struct SurrealDbClient {
    db: Surreal<Any>,
    /// Held for the duration of an insert (and its duplicate check) so writers never interleave.
    write_lock: Mutex<()>,
}

impl SurrealDbClient {
    /// Create a new SurrealDB client from the configuration.
    #[instrument(name = "SurrealDbClient::new", skip_all)]
    pub async fn new(config: &Config) -> Res<Self> {
        let credentials = match (&config.db_username, &config.db_password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        };

        Self::connect(&config.db_endpoint, credentials, &config.db_namespace, &config.db_database).await
    }

    /// Connect to `endpoint`, sign in if credentials are given, and ensure the schema exists.
    #[instrument(name = "SurrealDbClient::connect", skip(credentials))]
    pub async fn connect(endpoint: &str, credentials: Option<(&str, &str)>, namespace: &str, database: &str) -> Res<Self> {
        if let Some(parent) = endpoint.strip_prefix("surrealkv://").and_then(|path| std::path::Path::new(path).parent()) {
            std::fs::create_dir_all(parent).map_err(CoreError::storage)?;
        }

        let db = connect(endpoint).await.map_err(CoreError::storage)?;

        if let Some((username, password)) = credentials {
            db.signin(Root { username, password }).await.map_err(CoreError::storage)?;
        }

        db.use_ns(namespace).use_db(database).await.map_err(CoreError::storage)?;

        // Define schemas.

        db.query(SCHEMA).await.map_err(CoreError::storage)?.check().map_err(CoreError::storage)?;

        info!("Database initialized successfully.");

        Ok(Self { db, write_lock: Mutex::new(()) })
    }

    /// Runs the insert; callers must hold `write_lock`.
    async fn insert_document(&self, question: &str, answer: &str) -> Res<Document> {
        let mut response = self
            .db
            .query(ADD_DOCUMENT)
            .bind(("question", question.to_owned()))
            .bind(("answer", answer.to_owned()))
            .bind(("created_at", Utc::now().to_rfc3339()))
            .await
            .map_err(CoreError::storage)?
            .check()
            .map_err(CoreError::storage)?;

        // The created document is the last statement result.
        let last = response.num_statements().saturating_sub(1);
        let record: Option<DocumentRecord> = response.take(last).map_err(CoreError::storage)?;
        let record = record.ok_or_else(|| CoreError::storage("document was not created"))?;
        let document = Document::try_from(record)?;

        debug!("Stored document {}.", document.id);

        Ok(document)
    }

    async fn find_document(&self, question: &str, answer: &str) -> Res<bool> {
        let mut response = self
            .db
            .query(FIND_DOCUMENT)
            .bind(("question", question.to_owned()))
            .bind(("answer", answer.to_owned()))
            .await
            .map_err(CoreError::storage)?;

        let found: Vec<i64> = response.take(0).map_err(CoreError::storage)?;

        Ok(!found.is_empty())
    }
}

#[async_trait]
impl GenericDbClient for SurrealDbClient {
    #[instrument(skip(self))]
    async fn add_document(&self, question: &str, answer: &str) -> Res<Document> {
        validate_pair(question, answer)?;

        let _guard = self.write_lock.lock().await;

        self.insert_document(question, answer).await
    }

    #[instrument(skip(self))]
    async fn add_document_if_new(&self, question: &str, answer: &str) -> Res<Option<Document>> {
        validate_pair(question, answer)?;

        let _guard = self.write_lock.lock().await;

        if self.find_document(question, answer).await? {
            return Ok(None);
        }

        Ok(Some(self.insert_document(question, answer).await?))
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Res<u64> {
        let mut response = self.db.query(COUNT_DOCUMENTS).await.map_err(CoreError::storage)?;
        let record: Option<CountRecord> = response.take(0).map_err(CoreError::storage)?;

        Ok(record.map(|r| r.count).unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn all_documents(&self) -> Res<Vec<Document>> {
        let mut response = self.db.query(ALL_DOCUMENTS).await.map_err(CoreError::storage)?;
        let records: Vec<DocumentRecord> = response.take(0).map_err(CoreError::storage)?;

        let documents = records.into_iter().map(Document::try_from).collect::<Result<Vec<_>, _>>()?;

        Ok(documents)
    }

    #[instrument(skip(self))]
    async fn has_document(&self, question: &str, answer: &str) -> Res<bool> {
        self.find_document(question, answer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_increase_in_insertion_order() {
        let db = DbClient::surreal_memory().await.unwrap();

        let first = db.add_document("I like yummy cake", "yummy cake").await.unwrap();
        let second = db.add_document("I like scary cake", "scary cake").await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.question, "I like yummy cake");
        assert_eq!(second.answer, "scary cake");
    }

    #[tokio::test]
    async fn empty_store_counts_zero() {
        let db = DbClient::surreal_memory().await.unwrap();

        assert_eq!(db.count().await.unwrap(), 0);
        assert!(db.all_documents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_input_writes_nothing() {
        let db = DbClient::surreal_memory().await.unwrap();

        let err = db.add_document("  ", "answer").await.unwrap_err();

        assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::InvalidInput(_))));
        assert_eq!(db.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn has_document_matches_exact_pairs_only() {
        let db = DbClient::surreal_memory().await.unwrap();

        db.add_document("how are you", "fine").await.unwrap();

        assert!(db.has_document("how are you", "fine").await.unwrap());
        assert!(!db.has_document("how are you", "great").await.unwrap());
        assert!(!db.has_document("how are you?", "fine").await.unwrap());
    }

    #[tokio::test]
    async fn created_at_is_recent() {
        let db = DbClient::surreal_memory().await.unwrap();
        let before = Utc::now();

        let document = db.add_document("q", "a").await.unwrap();
        let stored = db.all_documents().await.unwrap();

        assert!(document.created_at >= before - chrono::Duration::seconds(1));
        assert_eq!(stored, vec![document]);
    }

    #[tokio::test]
    async fn add_document_if_new_skips_stored_pairs() {
        let db = DbClient::surreal_memory().await.unwrap();

        let first = db.add_document_if_new("how are you", "fine").await.unwrap();
        let again = db.add_document_if_new("how are you", "fine").await.unwrap();
        let other = db.add_document_if_new("how are you", "great").await.unwrap();

        assert_eq!(first.map(|d| d.id), Some(1));
        assert!(again.is_none());
        assert_eq!(other.map(|d| d.id), Some(2));
        assert_eq!(db.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn concurrent_identical_pairs_are_stored_once() {
        let db = DbClient::surreal_memory().await.unwrap();

        let results = futures::future::join_all((0..10).map(|_| db.add_document_if_new("how are you", "fine"))).await;

        assert_eq!(results.into_iter().filter_map(|r| r.unwrap()).count(), 1);
        assert_eq!(db.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn disk_store_survives_reconnect() {
        let dir = std::env::temp_dir().join(format!("autoreply-reopen-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        let endpoint = format!("surrealkv://{}", dir.display());

        let db = SurrealDbClient::connect(&endpoint, None, "autoreply", "documents").await.unwrap();
        db.add_document("I like yummy cake", "yummy cake").await.unwrap();
        db.add_document("I like scary cake", "scary cake").await.unwrap();
        let before = db.all_documents().await.unwrap();
        drop(db);

        // The datastore closes in the background once the last handle is gone.
        let mut reopened = None;
        for _ in 0..50 {
            match SurrealDbClient::connect(&endpoint, None, "autoreply", "documents").await {
                Ok(db) => {
                    reopened = Some(db);
                    break;
                }
                Err(_) => tokio::time::sleep(std::time::Duration::from_millis(100)).await,
            }
        }
        let db = reopened.expect("store should reopen");

        assert_eq!(db.all_documents().await.unwrap(), before);
        assert_eq!(before.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 2]);

        let third = db.add_document("I like cake", "cake").await.unwrap();
        assert_eq!(third.id, 3);
        assert_eq!(db.count().await.unwrap(), 3);

        drop(db);
        std::fs::remove_dir_all(&dir).ok();
    }
}

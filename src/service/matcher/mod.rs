//! Best-answer lookup over the stored documents.
//!
//! Every stored question is scored against the query and the answer of the highest
//! scoring one wins. The matcher never applies a threshold: deciding whether a score
//! is good enough to reply with is left to the caller.

pub mod sequence;

use tracing::{debug, instrument};

use crate::{
    base::types::{BestAnswer, Res},
    service::db::{DbClient, Document},
};

use sequence::SequenceMatcher;

/// Match engine for the application.
///
/// Unlike the other services, this is a concrete type: it holds no state of its own
/// beyond a handle to the store, and is trivially cloneable.
#[derive(Clone)]
pub struct Matcher {
    db: DbClient,
    autojunk: bool,
}

impl Matcher {
    pub fn new(db: DbClient) -> Self {
        Self { db, autojunk: true }
    }

    /// Disable the popular-character heuristic for long stored questions.
    pub fn without_autojunk(mut self) -> Self {
        self.autojunk = false;
        self
    }

    /// Returns the answer whose question best matches `query`, along with its score.
    ///
    /// Yields [`BestAnswer::Empty`] only when nothing is stored; otherwise some answer
    /// is always returned, however low its score.
    #[instrument(skip(self))]
    pub async fn best_answer(&self, query: &str) -> Res<BestAnswer> {
        let documents = self.db.all_documents().await?;

        let result = match best_match(query, &documents, self.autojunk) {
            Some((document, score)) => {
                debug!("Best match is document {} with score {:.3}.", document.id, score);

                BestAnswer::Found {
                    answer: document.answer.clone(),
                    score,
                }
            }
            None => BestAnswer::Empty,
        };

        Ok(result)
    }
}

/// Scores `query` against every document and returns the best one.
///
/// Ties keep the earliest document in `documents`.
pub fn best_match<'d>(query: &str, documents: &'d [Document], autojunk: bool) -> Option<(&'d Document, f64)> {
    let query: Vec<char> = query.chars().collect();
    let mut best: Option<(&Document, f64)> = None;

    for document in documents {
        let question: Vec<char> = document.question.chars().collect();
        let score = SequenceMatcher::with_autojunk(&query, &question, autojunk).ratio();

        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((document, score));
        }
    }

    best
}

//! Service integrations for storage, matching, and chat.
//!
//! This module contains the services used by autoreply:
//! - Database services (e.g., SurrealDB) holding the learned documents
//! - The matcher that picks the best stored answer for a question
//! - Chat services (e.g., the local console)
//!
//! Storage and chat define both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod db;
pub mod matcher;

pub use crate::base::{
    config::Config,
    types::{BestAnswer, ChatMessage, CoreError, Err, Res, Void},
};
pub use crate::service::{chat::ChatClient, db::DbClient, matcher::Matcher};
pub use anyhow::anyhow;
pub use tracing::{debug, error, info, instrument, warn};

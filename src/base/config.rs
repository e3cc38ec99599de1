//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use super::types::{Res, Void};

/// Default database endpoint (an on-disk store next to the config file).
fn default_db_endpoint() -> String {
    "surrealkv://.hidden/autoreply.db".to_string()
}

/// Default database namespace.
fn default_db_namespace() -> String {
    "autoreply".to_string()
}

/// Default database name.
fn default_db_database() -> String {
    "documents".to_string()
}

/// Default confidence threshold for answering.
fn default_threshold() -> f64 {
    0.6
}

fn default_true() -> bool {
    true
}

/// Configuration for the autoreply application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Database endpoint (`DB_ENDPOINT`).
    /// `surrealkv://<path>` for a local file, `ws://<host>` for a server, or `mem://` for a throwaway store.
    #[serde(default = "default_db_endpoint")]
    pub db_endpoint: String,
    /// Database namespace (`DB_NAMESPACE`).
    #[serde(default = "default_db_namespace")]
    pub db_namespace: String,
    /// Database name (`DB_DATABASE`).
    #[serde(default = "default_db_database")]
    pub db_database: String,
    /// Database username (`DB_USERNAME`).
    #[serde(default)]
    pub db_username: Option<String>,
    /// Database password (`DB_PASSWORD`).
    #[serde(default)]
    pub db_password: Option<String>,
    /// Minimum score a match must exceed before the bot replies (`THRESHOLD`).
    /// Must be in `(0, 1]`.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Learn from replies (`LEARNING`).
    #[serde(default = "default_true")]
    pub learning: bool,
    /// Answer plain text messages (`ANSWERING`).
    #[serde(default = "default_true")]
    pub answering: bool,
    /// Skip learning a pair that is already stored verbatim (`SKIP_DUPLICATES`).
    #[serde(default = "default_true")]
    pub skip_duplicates: bool,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            db_endpoint: default_db_endpoint(),
            db_namespace: default_db_namespace(),
            db_database: default_db_database(),
            db_username: None,
            db_password: None,
            threshold: default_threshold(),
            learning: true,
            answering: true,
            skip_duplicates: true,
        }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("AUTOREPLY"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Check the value ranges that serde cannot express.
    pub fn validate(&self) -> Void {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(anyhow::anyhow!("Threshold must be greater than 0 and at most 1."));
        }

        if self.db_endpoint.trim().is_empty() {
            return Err(anyhow::anyhow!("Database endpoint must not be empty."));
        }

        if self.db_username.is_some() != self.db_password.is_some() {
            return Err(anyhow::anyhow!("Database username and password must be set together."));
        }

        Ok(())
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

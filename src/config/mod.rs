use crate::error::{Error, Result};
use crate::recall::{ExactMatchPolicy, RecallOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub corpus: CorpusConfig,
    pub recall: RecallConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub dishes_dir: PathBuf,
    /// Seconds between rebuilds; 0 disables background refresh
    pub refresh_interval_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallConfig {
    pub exact_policy: ExactMatchPolicy,
    pub max_results: usize,
}

impl RecallConfig {
    pub fn options(&self) -> RecallOptions {
        RecallOptions {
            exact_policy: self.exact_policy,
        }
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PORT value".to_string()))?;

        let dishes_dir = std::env::var("DISHES_DIR")
            .unwrap_or_else(|_| "./dishes".to_string())
            .into();

        let refresh_interval_seconds = std::env::var("CORPUS_REFRESH_INTERVAL")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid CORPUS_REFRESH_INTERVAL value".to_string()))?;

        let exact_policy = std::env::var("RECALL_EXACT_POLICY")
            .unwrap_or_else(|_| "accumulate".to_string())
            .parse()?;

        let max_results = std::env::var("RECALL_MAX_RESULTS")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid RECALL_MAX_RESULTS value".to_string()))?;

        Ok(Settings {
            server: ServerConfig { host, port },
            corpus: CorpusConfig {
                dishes_dir,
                refresh_interval_seconds,
            },
            recall: RecallConfig {
                exact_policy,
                max_results,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.recall.max_results == 0 {
            return Err(Error::Config(
                "Recall max results must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

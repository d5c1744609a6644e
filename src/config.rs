use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Execution mode: selects which content API base URL the run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Development => "development",
            RunMode::Production => "production",
        }
    }
}

/// Local store layout for one run: snapshots, generated pages, media.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreLayout {
    /// One `<key>.json` snapshot per schema entry, cleared every run.
    pub data_dir: PathBuf,
    /// Generated page tree the static-site generator consumes.
    pub content_dir: PathBuf,
    /// Local media store, one file per `hash+ext`, never cleared.
    pub images_dir: PathBuf,
}

/// Fully resolved configuration, constructed once at startup and passed
/// into each component. No component reads the environment on its own.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub mode: RunMode,
    pub base_url: String,
    pub api_token: String,
    pub layout: StoreLayout,
}

impl SyncConfig {
    pub fn trace_loaded(&self) {
        info!(
            mode = self.mode.as_str(),
            base_url = %self.base_url,
            data_dir = %self.layout.data_dir.display(),
            content_dir = %self.layout.content_dir.display(),
            images_dir = %self.layout.images_dir.display(),
            "Loaded SyncConfig"
        );
        // Token stays out of the logs.
        debug!(token_len = self.api_token.len(), "API token present");
    }
}

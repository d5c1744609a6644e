use crate::config::{RunMode, StoreLayout, SyncConfig};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{error, info};

/// Base URL used outside production, matching a locally running CMS.
pub const DEV_BASE_URL: &str = "http://localhost:1337";

/// Resolves the full run configuration from CLI directories and the
/// environment. The bearer credential is a hard precondition: without it
/// nothing downstream is meaningful, so this returns an error before any
/// I/O happens and main exits non-zero.
pub fn load_config(
    data_dir: PathBuf,
    content_dir: PathBuf,
    static_dir: PathBuf,
) -> Result<SyncConfig> {
    let api_token = match std::env::var("CMS_API_TOKEN") {
        Ok(token) if !token.is_empty() => token,
        _ => {
            error!("CMS_API_TOKEN environment variable is not set. Cannot authenticate with the content API.");
            return Err(anyhow::anyhow!(
                "CMS_API_TOKEN environment variable is not set"
            ));
        }
    };

    let mode = match std::env::var("SYNC_ENV").as_deref() {
        Ok("production") => RunMode::Production,
        _ => RunMode::Development,
    };

    let base_url = match mode {
        RunMode::Production => match std::env::var("CMS_BASE_URL") {
            Ok(url) => url,
            Err(e) => {
                error!(error = ?e, "CMS_BASE_URL must be set in production mode");
                return Err(anyhow::anyhow!(
                    "CMS_BASE_URL environment variable not set: {e}"
                ));
            }
        },
        RunMode::Development => DEV_BASE_URL.to_string(),
    };

    let images_dir = static_dir.join("images");
    info!(
        mode = mode.as_str(),
        base_url = %base_url,
        "Resolved run configuration"
    );

    Ok(SyncConfig {
        mode,
        base_url,
        api_token,
        layout: StoreLayout {
            data_dir,
            content_dir,
            images_dir,
        },
    })
}

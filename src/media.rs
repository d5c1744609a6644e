//! Media resolver: turns remote media references into local asset paths.
//!
//! Resolution never fails past this boundary. A download that errors (bad
//! status, transport failure, unwritable disk) degrades the reference to
//! the original remote URL; callers always receive a usable value.

use futures::future::join_all;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

use crate::contract::ContentApi;

/// Public URL prefix the generated pages use for localized media.
pub const PUBLIC_MEDIA_PREFIX: &str = "/images";

/// A media reference as the content API embeds it in records.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaAsset {
    pub hash: String,
    pub ext: String,
    pub url: String,
    #[serde(default)]
    pub formats: Option<MediaFormats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaFormats {
    #[serde(default)]
    pub large: Option<MediaRendition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaRendition {
    pub url: String,
}

impl MediaAsset {
    /// Local identity: `hash+ext`, shared by every reference to the same
    /// remote asset.
    pub fn local_name(&self) -> String {
        format!("{}{}", self.hash, self.ext)
    }

    /// Best available representation: the "large" rendition when the API
    /// produced one, otherwise the primary URL.
    pub fn preferred_url(&self) -> &str {
        self.formats
            .as_ref()
            .and_then(|f| f.large.as_ref())
            .map(|r| r.url.as_str())
            .unwrap_or(&self.url)
    }
}

/// Joins a possibly relative media URL onto the API base URL.
pub fn absolute_media_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{}{}", base_url, url)
    }
}

pub struct MediaResolver<'a, A: ContentApi + ?Sized> {
    api: &'a A,
    base_url: String,
    images_dir: PathBuf,
}

impl<'a, A: ContentApi + ?Sized> MediaResolver<'a, A> {
    pub fn new(api: &'a A, base_url: &str, images_dir: &Path) -> Self {
        MediaResolver {
            api,
            base_url: base_url.to_string(),
            images_dir: images_dir.to_path_buf(),
        }
    }

    /// Resolves one media reference to a frontmatter value: the local
    /// path on success, the remote URL on any failure, `null` for an
    /// absent or unrecognizable reference.
    pub async fn resolve_one(&self, reference: &Value) -> Value {
        if reference.is_null() {
            return Value::Null;
        }

        let asset: MediaAsset = match serde_json::from_value(reference.clone()) {
            Ok(asset) => asset,
            Err(e) => {
                warn!(error = %e, "Unrecognizable media reference, emitting null");
                return Value::Null;
            }
        };

        let name = asset.local_name();
        let remote_url = absolute_media_url(&self.base_url, asset.preferred_url());
        let local_path = self.images_dir.join(&name);

        // Same hash+ext means same asset: a file already present needs
        // no second download.
        if local_path.exists() {
            return Value::String(format!("{}/{}", PUBLIC_MEDIA_PREFIX, name));
        }

        if let Err(e) = fs::create_dir_all(&self.images_dir).await {
            error!(error = ?e, path = %self.images_dir.display(), "Failed to create media store");
            return Value::String(remote_url);
        }

        info!(name = %name, url = %remote_url, "Downloading media asset");

        // The body is fully buffered before the write, so a failed
        // download leaves no partial file behind.
        match self.api.fetch_media(&remote_url).await {
            Ok(bytes) => match fs::write(&local_path, &bytes).await {
                Ok(()) => Value::String(format!("{}/{}", PUBLIC_MEDIA_PREFIX, name)),
                Err(e) => {
                    error!(error = ?e, name = %name, "Failed to write media asset, falling back to remote URL");
                    Value::String(remote_url)
                }
            },
            Err(e) => {
                error!(error = %e, name = %name, "Failed to download media asset, falling back to remote URL");
                Value::String(remote_url)
            }
        }
    }

    /// Resolves a list of media references concurrently. The result has
    /// the same length and order as the input regardless of completion
    /// order; a non-list input yields an empty list.
    pub async fn resolve_many(&self, references: &Value) -> Value {
        let items = match references.as_array() {
            Some(items) => items,
            None => return Value::Array(vec![]),
        };

        let resolutions = items.iter().map(|item| self.resolve_one(item));
        Value::Array(join_all(resolutions).await)
    }
}

//! Page generator: turns local snapshots into frontmatter pages.
//!
//! Each schema entry renders independently. A missing or unreadable
//! snapshot skips that entry; a content item without a slug skips that
//! item. Neither aborts the run or affects sibling entries.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

use crate::config::SyncConfig;
use crate::contract::ContentApi;
use crate::media::MediaResolver;
use crate::schema::{ContentSchemaEntry, TransformKind};

/// Fixed name of a collection's index page.
pub const INDEX_PAGE_NAME: &str = "_index.md";

/// Per-entry render outcome, aggregated into the run report.
#[derive(Debug, Default, Clone)]
pub struct PageOutcome {
    pub pages_written: usize,
    pub items_skipped: usize,
    pub snapshot_missing: bool,
}

pub struct PageGenerator<'a, A: ContentApi + ?Sized> {
    media: MediaResolver<'a, A>,
    data_dir: PathBuf,
    content_dir: PathBuf,
}

/// JSON literal form: strings come out quoted and escaped, numbers and
/// booleans as their literal text, lists and objects as JSON.
fn json_literal(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

impl<'a, A: ContentApi + ?Sized> PageGenerator<'a, A> {
    pub fn new(api: &'a A, config: &SyncConfig) -> Self {
        PageGenerator {
            media: MediaResolver::new(api, &config.base_url, &config.layout.images_dir),
            data_dir: config.layout.data_dir.clone(),
            content_dir: config.layout.content_dir.clone(),
        }
    }

    async fn apply_transform(&self, kind: TransformKind, value: &Value) -> Value {
        match kind {
            TransformKind::Copy => value.clone(),
            TransformKind::Image => self.media.resolve_one(value).await,
            TransformKind::ImageList => self.media.resolve_many(value).await,
        }
    }

    /// Renders the delimited frontmatter block for one record.
    ///
    /// Fixed lines first (title, date, draft, optional type, generated
    /// marker), then one line per declared field transform whose key the
    /// record actually carries, in declaration order. A missing key is
    /// skipped, not emitted as empty.
    pub async fn render_frontmatter(&self, item: &Value, entry: &ContentSchemaEntry) -> String {
        let mut front_matter = String::from("---\n");

        let title = item
            .get("title")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(&entry.display_title);
        front_matter.push_str(&format!(
            "title: {}\n",
            json_literal(&Value::String(title.to_string()))
        ));

        let date = item
            .get("publishedAt")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        front_matter.push_str(&format!(
            "date: {}\n",
            json_literal(&Value::String(date))
        ));

        front_matter.push_str("draft: false\n");

        if let Some(generator_type) = &entry.generator_type {
            front_matter.push_str(&format!(
                "type: {}\n",
                json_literal(&Value::String(generator_type.clone()))
            ));
        }

        front_matter.push_str("generated: true\n");

        for transform in &entry.field_transforms {
            let Some(raw) = item.get(&transform.field_key) else {
                continue;
            };
            let resolved = self.apply_transform(transform.kind, raw).await;
            front_matter.push_str(&format!(
                "{}: {}\n",
                transform.field_key,
                json_literal(&resolved)
            ));
        }

        front_matter.push_str("---\n");
        front_matter
    }

    /// Reads one entry's snapshot, logging and returning `None` when the
    /// file is absent or not valid JSON.
    async fn read_snapshot(&self, entry: &ContentSchemaEntry) -> Option<Value> {
        let data_path = crate::snapshot::snapshot_path(&self.data_dir, &entry.key);
        if !data_path.exists() {
            error!(key = %entry.key, path = %data_path.display(), "Data file not found, skipping entry");
            return None;
        }

        let raw = match fs::read_to_string(&data_path).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(key = %entry.key, error = ?e, "Failed to read snapshot, skipping entry");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(doc) => Some(doc),
            Err(e) => {
                error!(key = %entry.key, error = %e, "Snapshot is not valid JSON, skipping entry");
                None
            }
        }
    }

    async fn write_page(&self, path: &Path, content: &str) -> std::io::Result<()> {
        fs::write(path, content.as_bytes()).await?;
        info!(path = %path.display(), "Content page generated");
        Ok(())
    }

    /// Renders a collection entry: one index page from the snapshot-level
    /// record, plus one detail page per item carrying a slug.
    pub async fn render_collection(
        &self,
        entry: &ContentSchemaEntry,
    ) -> std::io::Result<PageOutcome> {
        info!(key = %entry.key, "Generating collection content");
        let mut outcome = PageOutcome::default();

        let Some(doc) = self.read_snapshot(entry).await else {
            outcome.snapshot_missing = true;
            return Ok(outcome);
        };

        let target_dir = self.content_dir.join(&entry.key);
        fs::create_dir_all(&target_dir).await?;

        let front_matter = self.render_frontmatter(&doc, entry).await;
        self.write_page(
            &target_dir.join(INDEX_PAGE_NAME),
            &format!("{}\n", front_matter),
        )
        .await?;
        outcome.pages_written += 1;

        let items = doc
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        for item in &items {
            // An empty or non-string slug is as unusable as a missing one.
            let Some(slug) = item
                .get("slug")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
            else {
                warn!(
                    key = %entry.key,
                    id = ?item.get("id"),
                    "Skipping item without slug"
                );
                outcome.items_skipped += 1;
                continue;
            };

            let front_matter = self.render_frontmatter(item, entry).await;
            let body = item.get("content").and_then(Value::as_str).unwrap_or("");
            let full_content = format!("{}\n\n{}\n", front_matter, body);

            self.write_page(&target_dir.join(format!("{}.md", slug)), &full_content)
                .await?;
            outcome.pages_written += 1;
        }

        Ok(outcome)
    }

    /// Renders a singleton entry: exactly one page whose body is the
    /// record's `content` field (empty when absent).
    pub async fn render_singleton(
        &self,
        entry: &ContentSchemaEntry,
    ) -> std::io::Result<PageOutcome> {
        info!(key = %entry.key, "Generating singleton content");
        let mut outcome = PageOutcome::default();

        let Some(doc) = self.read_snapshot(entry).await else {
            outcome.snapshot_missing = true;
            return Ok(outcome);
        };

        let item = match doc.get("data") {
            Some(item) if !item.is_null() => item.clone(),
            _ => {
                error!(key = %entry.key, "Snapshot has no data record, skipping entry");
                outcome.snapshot_missing = true;
                return Ok(outcome);
            }
        };

        fs::create_dir_all(&self.content_dir).await?;

        let page_name = entry
            .output_file_name
            .clone()
            .unwrap_or_else(|| format!("{}.md", entry.key));

        let front_matter = self.render_frontmatter(&item, entry).await;
        let body = item.get("content").and_then(Value::as_str).unwrap_or("");
        let full_content = format!("{}\n\n{}\n", front_matter, body);

        self.write_page(&self.content_dir.join(page_name), &full_content)
            .await?;
        outcome.pages_written += 1;

        Ok(outcome)
    }
}

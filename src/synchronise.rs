//! High-level pipeline: fetch every snapshot, then generate every page.
//!
//! The two phases are strictly sequential: phase one (clear the snapshot
//! store, refetch all entries) fully completes before phase two starts,
//! so generation never observes a half-refreshed store. Entries are
//! independent units: a failed fetch or an unusable snapshot costs that
//! entry its pages and nothing else. The only fatal condition is the
//! missing credential, enforced before this module runs.
//!
//! Main entrypoint: [`synchronise`]. Supporting types: [`SyncReport`],
//! [`EntryReport`].

use tracing::{error, info};

use crate::config::SyncConfig;
use crate::contract::ContentApi;
use crate::generate::{PageGenerator, PageOutcome};
use crate::schema::{self, EntryKind};
use crate::snapshot;

/// Aggregated outcome of one full run, one record per schema entry.
#[derive(Debug)]
pub struct SyncReport {
    pub entries: Vec<EntryReport>,
}

#[derive(Debug)]
pub struct EntryReport {
    pub key: String,
    pub kind: EntryKind,
    pub snapshot_written: bool,
    pub pages_written: usize,
    pub items_skipped: usize,
}

/// Runs the full two-phase pipeline against the given API client.
///
/// Returns `Err` only when the snapshot store itself cannot be prepared;
/// every per-entry failure is logged and absorbed, and the report records
/// what each entry produced.
pub async fn synchronise<A>(config: &SyncConfig, api: &A) -> Result<SyncReport, String>
where
    A: ContentApi + ?Sized,
{
    let entries = schema::all_entries();
    info!(
        mode = config.mode.as_str(),
        entries = entries.len(),
        "Starting content sync"
    );

    // Phase 1: clear the snapshot store, then refetch every entry.
    if let Err(e) = snapshot::clear_store(&config.layout.data_dir).await {
        error!(error = ?e, "Failed to prepare snapshot store");
        return Err(format!("Failed to prepare snapshot store: {e}"));
    }

    let mut reports: Vec<EntryReport> = Vec::with_capacity(entries.len());
    for entry in &entries {
        let snapshot_written =
            match snapshot::fetch_and_snapshot(api, entry, &config.layout.data_dir).await {
                Ok(_) => true,
                Err(e) => {
                    error!(key = %entry.key, error = %e, "Snapshot fetch failed, entry will produce no pages");
                    false
                }
            };
        reports.push(EntryReport {
            key: entry.key.clone(),
            kind: entry.kind,
            snapshot_written,
            pages_written: 0,
            items_skipped: 0,
        });
    }
    info!("Snapshot phase completed");

    // Phase 2: regenerate every page from the now-stable store.
    let generator = PageGenerator::new(api, config);
    for (entry, report) in entries.iter().zip(reports.iter_mut()) {
        let rendered = match entry.kind {
            EntryKind::Singleton => generator.render_singleton(entry).await,
            EntryKind::Collection => generator.render_collection(entry).await,
        };
        let outcome = match rendered {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(key = %entry.key, error = ?e, "Page generation failed for entry");
                PageOutcome::default()
            }
        };
        report.pages_written = outcome.pages_written;
        report.items_skipped = outcome.items_skipped;
    }
    info!("Content generation completed");

    Ok(SyncReport { entries: reports })
}

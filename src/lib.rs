pub mod config;
pub mod contract;
pub mod generate;
pub mod load_config;
pub mod media;
pub mod remote;
pub mod schema;
pub mod snapshot;
pub mod synchronise;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use load_config::load_config;
use remote::HttpContentApi;
use synchronise::synchronise;

#[derive(Parser)]
#[clap(
    name = "cms-sync",
    version,
    about = "Mirror headless-CMS content into a Hugo-style site tree (snapshots, pages, media)"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Refetch all content snapshots and regenerate every page
    Sync {
        /// Directory holding the per-entry JSON snapshots
        #[clap(long, default_value = "data")]
        data_dir: PathBuf,
        /// Directory receiving the generated page tree
        #[clap(long, default_value = "content")]
        content_dir: PathBuf,
        /// Static assets root; downloaded media lands in its images/ subdirectory
        #[clap(long, default_value = "static")]
        static_dir: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Sync {
            data_dir,
            content_dir,
            static_dir,
        } => {
            let config = load_config(data_dir, content_dir, static_dir)?;
            config.trace_loaded();
            let api = HttpContentApi::new(&config);
            println!("Content sync starting...");
            match synchronise(&config, &api).await {
                Ok(report) => {
                    println!("Content sync complete.\nReport:");
                    println!("{:#?}", report);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Content sync failed: {}", e);
                    Err(anyhow::Error::msg(e))
                }
            }
        }
    }
}

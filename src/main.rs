mod catalog;
mod config;
mod error;
mod friends;
mod lifecycle;
mod logging;
mod models;
mod pipeline;
mod store;
mod utils;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use pipeline::Refresher;
use store::FileStore;
use utils::{format_duration, parse_window};

#[derive(Parser)]
#[command(name = "fastcron", version)]
#[command(about = "Daily session maintenance for Fast Together", long_about = None)]
struct Cli {
    /// Defaults to `refresh` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rotate the daily scheduled fasts and expire community fasts
    Refresh,
    /// Manage fake friend relationships on a test account
    Friends {
        #[command(subcommand)]
        action: FriendsAction,
    },
}

#[derive(Subcommand)]
enum FriendsAction {
    /// Remove old fake friends and add fresh friend requests
    Seed {
        /// User receiving the requests (falls back to the config file)
        #[arg(short, long)]
        recipient: Option<String>,
    },
    /// Remove the fake friends only
    Clean {
        #[arg(short, long)]
        recipient: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base_dir = config::get_base_dir()?;
    let config = config::load_config(&base_dir)?;
    let _log_guard = logging::init(&base_dir, &config.log_level)?;

    tracing::info!("Initializing app");
    let store = FileStore::from_path(config.database_path(&base_dir));
    tracing::info!(path = %store.path().display(), "Opened document store");

    match cli.command.unwrap_or(Commands::Refresh) {
        Commands::Refresh => {
            let join_window = parse_window(&config.join_window)?;
            tracing::info!(
                join_window = %format_duration(join_window.num_seconds()),
                "Refreshing scheduled fasts"
            );

            let report = Refresher::new(&store, join_window).run(Utc::now());
            if report.is_clean() {
                tracing::info!("All stages completed");
            } else {
                let failed = report.failures().count();
                tracing::warn!(failed, "Refresh finished with failed stages");
            }
        }
        Commands::Friends { action } => {
            let (recipient, seed) = match action {
                FriendsAction::Seed { recipient } => (recipient, true),
                FriendsAction::Clean { recipient } => (recipient, false),
            };
            let recipient = recipient
                .or_else(|| config.friend_recipient_id.clone())
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "No recipient given. Pass --recipient or set friend_recipient_id."
                    )
                })?;

            if seed {
                friends::run(&store, &recipient);
            } else {
                match friends::clean_up_fake_friends(&store, &recipient) {
                    Ok(count) => tracing::info!(count, "Cleaned up fake friends"),
                    Err(e) => tracing::error!(error = %e, "Error cleaning up fake friends"),
                }
            }
        }
    }

    tracing::info!("Done");
    Ok(())
}

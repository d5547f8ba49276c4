//! Command-line surface.

mod audit;
mod cache;
mod history;
mod key;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use cro_auditor::config::Config;
use cro_auditor::storage::{JsonFileStore, KeyValueStore};
use cro_auditor::Session;

/// Conversion-rate-optimization audits from the terminal.
#[derive(Parser, Debug)]
#[command(name = "cro-auditor", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Config file (defaults to ~/.cro-auditor/config.json)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Audit a website and print the dashboard
    Audit(AuditArgs),

    /// Inspect or clear a user's audit history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Manage the stored OpenAI API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Maintain the global audit cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Args, Debug)]
pub(crate) struct AuditArgs {
    /// Website to audit (http or https)
    #[arg(long)]
    pub url: String,

    /// Website type: ecommerce or lead-generation
    #[arg(long = "type", value_name = "TYPE")]
    pub website_type: String,

    /// Target market, e.g. "US" or "DACH, Nordics"
    #[arg(long)]
    pub market: String,

    /// Audit depth: basic or advanced
    #[arg(long)]
    pub mode: Option<String>,

    /// Signed-in user id; results are also kept in that user's history
    #[arg(long)]
    pub user: Option<String>,

    /// Also generate a homepage mockup and write it to this file
    #[arg(long, value_name = "FILE")]
    pub mockup: Option<PathBuf>,

    /// Only show recommendations with this impact (high, medium, low)
    #[arg(long)]
    pub impact: Option<String>,

    /// Only show recommendations with this effort (high, medium, low)
    #[arg(long)]
    pub effort: Option<String>,

    /// Only show recommendations for this section
    #[arg(long)]
    pub section: Option<String>,

    /// Print the audit as JSON instead of the dashboard
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum HistoryAction {
    /// List a user's recent audits, newest first
    List {
        #[arg(long)]
        user: String,
    },
    /// Delete a user's audit history
    Clear {
        #[arg(long)]
        user: String,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum KeyAction {
    /// Store an API key
    Set {
        /// The key (sk-...)
        value: String,
        #[arg(long)]
        user: Option<String>,
    },
    /// Show the stored key, masked
    Show {
        #[arg(long)]
        user: Option<String>,
    },
    /// Remove the stored key
    Clear {
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum CacheAction {
    /// Remove expired entries from the global cache
    Prune,
}

pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Audit(args) => audit::cmd_audit(config, args).await,
        Commands::History { action } => history::cmd_history(config, action),
        Commands::Key { action } => key::cmd_key(config, action),
        Commands::Cache { action } => cache::cmd_cache(config, action),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let mut config = Config::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.apply_env_overrides();
            Ok(config)
        }
        None => Config::load().with_context(|| "Failed to load config"),
    }
}

/// Open the configured key-value store.
pub(crate) fn open_store(config: &Config) -> Arc<dyn KeyValueStore> {
    Arc::new(JsonFileStore::open(
        config.storage.resolved_path(),
        config.storage.quota_bytes,
    ))
}

pub(crate) fn session_for(config: &Config, user: Option<String>) -> Arc<Session> {
    Arc::new(Session::new(open_store(config), user))
}

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use insure_cli::{app, config::Settings, logging};
use insure_core::calculations::PremiumInput;
use insure_core::{AddOn, DocumentKind, NoClaimBonus};
use rust_decimal::Decimal;
use tracing::debug;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Motor insurance policy application client.
///
/// Walks through a policy application interactively, prices policies, and
/// sends documents to the backend for scoring or extraction.
#[derive(Debug, Parser)]
#[command(name = "insure", version)]
struct Cli {
    /// Configuration file. Defaults to `insure/config.toml` under the user
    /// config directory when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the config file and environment.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fill in and submit a new policy application.
    Apply,

    /// Print the premium breakdown for a policy.
    Quote {
        /// Insured declared value in rupees; commas are accepted.
        #[arg(long, value_parser = app::parse_idv)]
        idv: Decimal,

        /// No-claim bonus percentage.
        #[arg(long, default_value = "0", value_parser = app::parse_ncb)]
        ncb: NoClaimBonus,

        /// Add-on cover by name, e.g. "Zero Depreciation". Repeatable.
        #[arg(long = "addon", value_parser = app::parse_addon)]
        addons: Vec<AddOn>,
    },

    /// Upload a document for forgery scoring.
    Score {
        file: PathBuf,
    },

    /// Upload a policy or claim document for field extraction.
    Extract {
        /// `policy` or `claim`.
        #[arg(long, value_parser = app::parse_kind)]
        kind: DocumentKind,

        file: PathBuf,
    },

    /// Send reviewed extraction fields, a JSON object as printed by
    /// `extract`, back to the backend.
    Update {
        /// `policy` or `claim`.
        #[arg(long, value_parser = app::parse_kind)]
        kind: DocumentKind,

        file: PathBuf,
    },
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("cannot load configuration")?;
    if let Some(url) = cli.api_url {
        settings.api.base_url = url;
    }
    logging::init(&settings.logging)?;
    debug!(?settings, "configuration loaded");

    match cli.command {
        Command::Apply => app::run_apply(&settings).await,
        Command::Quote { idv, ncb, addons } => app::run_quote(&PremiumInput::new(idv, ncb, addons)),
        Command::Score { file } => app::run_score(&settings, &file).await,
        Command::Extract { kind, file } => app::run_extract(&settings, kind, &file).await,
        Command::Update { kind, file } => app::run_update(&settings, kind, &file).await,
    }
}

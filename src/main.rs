mod config;
mod domain;
mod repl;
mod util;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::domain::{PriceBook, QuoteSession};

/// Interactive pricing workbench for MP3/LV2 hardware system quotes.
#[derive(Debug, Parser)]
#[command(name = "quote-workbench", version, about)]
struct Cli {
    /// TOML file overriding factory price-book defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run commands from a file instead of an interactive prompt.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Raise log verbosity to debug.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut book = PriceBook::default();
    if let Some(path) = &cli.config {
        let overrides = config::load_overrides(path)
            .with_context(|| format!("loading price-book overrides from {}", path.display()))?;
        overrides.apply(&mut book);
        info!(path = %path.display(), "applied price-book overrides");
    }

    let mut session = QuoteSession::new(book);

    match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening script {}", path.display()))?;
            repl::run(&mut session, BufReader::new(file), &mut io::stdout(), false)?;
        }
        None => {
            let stdin = io::stdin();
            repl::run(&mut session, stdin.lock(), &mut io::stdout(), true)?;
        }
    }

    Ok(())
}

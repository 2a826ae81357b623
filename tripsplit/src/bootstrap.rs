use crate::{
    cli::{Cli, GlobalArgs},
    commands,
};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tripsplit_domain::{MatchOrder, SettlementPlanner};

const DEFAULT_LOG_FILTER: &str = "info";

/// Settings resolved from `.env`, the environment and command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub match_order: MatchOrder,
    pub currency_symbol: Option<String>,
}

impl AppConfig {
    /// Parses the process arguments; flags win over environment variables.
    /// Expects `.env` to be loaded already.
    pub fn from_env() -> (Self, Cli) {
        let cli = Cli::parse();
        (Self::from(&cli.global), cli)
    }

    pub fn planner(&self) -> SettlementPlanner {
        SettlementPlanner::new(self.match_order)
    }
}

impl From<&GlobalArgs> for AppConfig {
    fn from(args: &GlobalArgs) -> Self {
        Self {
            data_dir: args.data_dir.clone(),
            match_order: args.match_order,
            currency_symbol: args.currency_symbol.clone().filter(|symbol| !symbol.is_empty()),
        }
    }
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Logs go to stderr so command output on stdout stays clean.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() {
    // `.env` may set RUST_LOG, so it has to be loaded before the subscriber.
    let _ = dotenvy::dotenv();
    init_logging();

    let (config, cli) = AppConfig::from_env();
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        match_order = %config.match_order,
        "configuration loaded"
    );

    match commands::execute(&config, cli.command) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
}

//! Command-line interface definitions.
//!
//! All options can be given as flags; the API key can also come from the
//! environment.

use crate::feed::CategoryFilter;
use crate::output::OutputFormat;
use clap::Parser;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # One sync, JSON on stdout
/// GEMINI_API_KEY=... india_realty_wire
///
/// # Only policy stories, as text
/// india_realty_wire --category policy -f text
///
/// # Read search terms from stdin; an empty line re-syncs
/// india_realty_wire -i
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// API key for the generative search service (falls back to $API_KEY)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Search term for the live sync
    #[arg(short, long)]
    pub query: Option<String>,

    /// Category to display (All, Residential, Commercial, Policy, Economy, Infrastructure)
    #[arg(long, default_value = "All")]
    pub category: CategoryFilter,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Sync once with `--query`, then read search terms from stdin, one sync per line
    #[arg(short, long)]
    pub interactive: bool,
}

impl Cli {
    /// Resolve the credential: flag or `GEMINI_API_KEY`, then `API_KEY`,
    /// else empty.
    pub fn resolved_api_key(&self) -> String {
        self.api_key
            .clone()
            .or_else(|| std::env::var("API_KEY").ok())
            .unwrap_or_default()
    }
}

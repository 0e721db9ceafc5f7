//! # India Realty Wire
//!
//! Live Indian real-estate, economy and infrastructure headlines, pulled on
//! demand from a search-grounded generative model.
//!
//! ## Usage
//!
//! ```sh
//! GEMINI_API_KEY=... india_realty_wire --category policy -f text
//! ```
//!
//! ## Architecture
//!
//! 1. **Instruction**: a fixed retrieval template asks for N labelled stories
//! 2. **Call**: one `generateContent` request with search grounding enabled
//! 3. **Scrape**: the answer text is split into segments and parsed into
//!    article records; citations come from the grounding metadata
//! 4. **Present**: the newest batch replaces the feed and is printed
//!
//! A failed sync never aborts the program: it yields an empty batch.

use clap::Parser;
use futures::stream::{FuturesUnordered, StreamExt};
use std::error::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod feed;
mod gemini;
mod image;
mod live;
mod models;
mod output;
mod parser;
mod prompt;
mod sources;
mod utils;

use cli::Cli;
use feed::{CategoryFilter, LiveFeed, SyncTicket};
use gemini::{GeminiClient, GenerateContent};
use live::LiveNewsClient;
use models::LiveNewsBatch;
use output::{OutputFormat, render};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // --- Tracing init (stderr; stdout carries the feed) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(config = ?args.config, category = %args.category, format = ?args.format, "Parsed CLI arguments");

    let config = config::load_config(args.config.as_deref()).await?;

    let api_key = args.resolved_api_key();
    if api_key.is_empty() {
        warn!("No API key configured (GEMINI_API_KEY / API_KEY); live syncs will come back empty");
    }
    let gemini = GeminiClient::new(config.endpoint.clone(), api_key)?;
    let client = LiveNewsClient::new(gemini, &config)?;
    info!(model = %config.model, "Live news client ready");

    let mut feed = LiveFeed::new();
    if args.interactive {
        let stdin = BufReader::new(tokio::io::stdin());
        run_interactive(&client, &mut feed, stdin, args.query.clone(), &args.category, args.format).await?;
    } else {
        let ticket = feed.begin_sync();
        let batch = client.fetch_live_news(args.query.as_deref()).await;
        if batch.is_empty() {
            warn!("No live updates this sync");
        }
        feed.apply(ticket, batch);
        println!("{}", render(&feed, &args.category, args.format)?);
    }

    Ok(())
}

/// Sync once with `initial_query`, then once per input line; an empty line
/// re-syncs without a query.
///
/// Syncs may overlap. Each takes a ticket and only the newest result is
/// rendered.
///
/// # Arguments
///
/// * `client` - Live news client shared by every sync
/// * `feed` - View state the batches are applied to
/// * `input` - Line source, stdin in the binary
/// * `initial_query` - The `-q` value, used for the first sync
/// * `category` - Category filter applied when rendering
/// * `format` - Output format
///
/// # Errors
///
/// Returns an error if reading `input` fails or a batch cannot be rendered.
async fn run_interactive<G, R>(
    client: &LiveNewsClient<G>,
    feed: &mut LiveFeed,
    input: R,
    initial_query: Option<String>,
    category: &CategoryFilter,
    format: OutputFormat,
) -> Result<(), Box<dyn Error + Send + Sync>>
where
    G: GenerateContent,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut in_flight = FuturesUnordered::new();
    let mut input_open = true;

    let ticket = feed.begin_sync();
    info!(ticket = ticket.sequence(), query = initial_query.as_deref().unwrap_or(""), "Initial sync");
    in_flight.push(sync_once(client, ticket, initial_query));

    while input_open || !in_flight.is_empty() {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line? {
                    Some(line) => {
                        let ticket = feed.begin_sync();
                        info!(ticket = ticket.sequence(), query = %line.trim(), "Sync requested");
                        in_flight.push(sync_once(client, ticket, Some(line)));
                    }
                    None => input_open = false,
                }
            }
            Some((ticket, batch)) = in_flight.next(), if !in_flight.is_empty() => {
                if feed.apply(ticket, batch) {
                    info!(ticket = ticket.sequence(), articles = feed.articles().len(), "Feed updated");
                    println!("{}", render(feed, category, format)?);
                } else {
                    debug!(ticket = ticket.sequence(), loading = feed.is_loading(), "Superseded sync ignored");
                }
            }
        }
    }

    Ok(())
}

/// Run one fetch and hand the batch back with the ticket it belongs to.
async fn sync_once<G: GenerateContent>(
    client: &LiveNewsClient<G>,
    ticket: SyncTicket,
    query: Option<String>,
) -> (SyncTicket, LiveNewsBatch) {
    let query = query.as_deref().map(str::trim).filter(|q| !q.is_empty());
    (ticket, client.fetch_live_news(query).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::gemini::{BoxError, GenerateContentRequest, GenerateContentResponse};
    use std::sync::{Arc, Mutex};

    /// Fake generator answering one story whose title echoes the request
    /// count, recording every instruction it sees.
    #[derive(Clone, Default)]
    struct Recording {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl Recording {
        fn instructions(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl GenerateContent for Recording {
        async fn generate(
            &self,
            request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, BoxError> {
            let n = {
                let mut seen = self.seen.lock().unwrap();
                seen.push(request.instruction());
                seen.len()
            };
            let body = serde_json::json!({
                "candidates": [{
                    "content": {"parts": [{"text": format!("TITLE: Sync {n}\nEXCERPT: Body.\n---")}]},
                    "groundingMetadata": {"groundingChunks": [{"web": {"title": "t", "uri": "https://example.in"}}]}
                }]
            });
            Ok(serde_json::from_value(body)?)
        }
    }

    fn query_aware_client() -> (LiveNewsClient<Recording>, Recording) {
        let recording = Recording::default();
        let config = Config { interpolate_query: true, ..Config::default() };
        (LiveNewsClient::new(recording.clone(), &config).unwrap(), recording)
    }

    #[tokio::test]
    async fn test_interactive_syncs_once_before_reading_input() {
        let (client, recording) = query_aware_client();
        let mut feed = LiveFeed::new();
        run_interactive(
            &client,
            &mut feed,
            &b""[..],
            Some("Pune metro".to_string()),
            &CategoryFilter::All,
            OutputFormat::Json,
        )
        .await
        .unwrap();

        let seen = recording.instructions();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("Pune metro"));
        assert!(!feed.is_loading());
        assert_eq!(feed.articles().len(), 1);
        assert_eq!(feed.sources().len(), 1);
    }

    #[tokio::test]
    async fn test_interactive_without_query_still_syncs() {
        let (client, recording) = query_aware_client();
        let mut feed = LiveFeed::new();
        run_interactive(&client, &mut feed, &b""[..], None, &CategoryFilter::All, OutputFormat::Text)
            .await
            .unwrap();
        assert_eq!(recording.instructions().len(), 1);
        assert_eq!(feed.articles().len(), 1);
    }

    #[tokio::test]
    async fn test_interactive_input_lines_follow_initial_sync() {
        let (client, recording) = query_aware_client();
        let mut feed = LiveFeed::new();
        run_interactive(
            &client,
            &mut feed,
            &b"Hyderabad\n"[..],
            Some("Pune metro".to_string()),
            &CategoryFilter::All,
            OutputFormat::Json,
        )
        .await
        .unwrap();

        let seen = recording.instructions();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().any(|i| i.contains("Pune metro")));
        assert!(seen.iter().any(|i| i.contains("Hyderabad")));
        assert!(!feed.is_loading());
        assert_eq!(feed.articles().len(), 1);
    }
}

//! Live news orchestrator.
//!
//! [`LiveNewsClient::fetch_live_news`] issues one grounded request, scrapes
//! the answer into article records, collects the citations and caps the
//! result. It never fails: transport errors, bad credentials, quota errors
//! and decode errors are logged and turned into an empty batch, so callers
//! cannot tell "no news right now" from "service down".
//!
//! There is no retry and no timeout of its own. Overlapping calls are not
//! cancelled; callers that issue them should gate results through
//! [`crate::feed::LiveFeed`].

use crate::config::Config;
use crate::gemini::{BoxError, GenerateContent, GenerateContentRequest};
use crate::models::LiveNewsBatch;
use crate::parser::{LabelMap, ResponseParser};
use crate::prompt::build_instruction;
use crate::sources::extract_sources;
use crate::utils::truncate_for_log;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

pub struct LiveNewsClient<G> {
    generator: G,
    parser: ResponseParser,
    labels: LabelMap,
    model: String,
    story_count: usize,
    max_articles: usize,
    interpolate_query: bool,
    default_query: String,
}

impl<G> LiveNewsClient<G>
where
    G: GenerateContent,
{
    /// Fails only on invalid configuration (e.g. an empty label list).
    pub fn new(generator: G, config: &Config) -> Result<Self, BoxError> {
        Ok(Self {
            generator,
            parser: ResponseParser::from_config(config)?,
            labels: config.labels.clone(),
            model: config.model.clone(),
            story_count: config.story_count,
            max_articles: config.max_articles,
            interpolate_query: config.interpolate_query,
            default_query: config.default_query.clone(),
        })
    }

    /// Fetch the current batch of live articles and their citations.
    ///
    /// `query` is accepted for every call but only reaches the model when
    /// `interpolate_query` is enabled.
    #[instrument(level = "info", skip_all, fields(query = query.unwrap_or("")))]
    pub async fn fetch_live_news(&self, query: Option<&str>) -> LiveNewsBatch {
        let t0 = Instant::now();
        match self.try_fetch(query).await {
            Ok(batch) => {
                info!(
                    articles = batch.articles.len(),
                    sources = batch.sources.len(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Live news sync complete"
                );
                batch
            }
            Err(e) => {
                error!(
                    error = %e,
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Live news sync failed; returning empty batch"
                );
                LiveNewsBatch::empty()
            }
        }
    }

    async fn try_fetch(&self, query: Option<&str>) -> Result<LiveNewsBatch, BoxError> {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(&self.default_query);

        let focus = if self.interpolate_query {
            Some(query)
        } else {
            debug!(%query, "Query not interpolated into instruction (interpolate_query = false)");
            None
        };
        let instruction = build_instruction(&self.labels, self.story_count, focus);
        let request = GenerateContentRequest::grounded(&self.model, instruction);

        let response = self.generator.generate(&request).await?;
        let text = response.text();
        let sources = extract_sources(response.grounding_chunks());

        let mut articles = self.parser.parse(&text);
        let parsed = articles.len();
        articles.truncate(self.max_articles);

        if articles.is_empty() {
            warn!(
                response_preview = %truncate_for_log(&text, 300),
                "Model response held no usable segments"
            );
        } else {
            let off_vocabulary = articles.iter().filter(|a| !a.category.is_preferred()).count();
            debug!(parsed, kept = articles.len(), off_vocabulary, "Scraped live articles");
        }

        Ok(LiveNewsBatch { articles, sources })
    }
}

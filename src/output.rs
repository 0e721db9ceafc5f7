//! Rendering the live feed for stdout.
//!
//! - `json`: `{ "articles": [...], "sources": [...] }`, articles filtered by category
//! - `text`: a short human-readable listing

use crate::feed::{CategoryFilter, LiveFeed};
use crate::models::{ArticleRecord, SourceRecord};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Serialize)]
struct View<'a> {
    articles: Vec<&'a ArticleRecord>,
    sources: &'a [SourceRecord],
}

pub fn render(
    feed: &LiveFeed,
    filter: &CategoryFilter,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&View {
            articles: feed.visible(filter).collect(),
            sources: feed.sources(),
        }),
        OutputFormat::Text => Ok(render_text(feed, filter)),
    }
}

fn render_text(feed: &LiveFeed, filter: &CategoryFilter) -> String {
    let mut out = String::new();
    let articles: Vec<&ArticleRecord> = feed.visible(filter).collect();

    if articles.is_empty() {
        writeln!(out, "No live updates ({filter}).").unwrap();
    }
    for a in &articles {
        writeln!(out, "[{}] {}", a.category, a.title).unwrap();
        writeln!(out, "    {}", a.excerpt).unwrap();
        writeln!(out, "    {} · {} · {}", a.author, a.date, a.read_time).unwrap();
        writeln!(out, "    {}", a.image_url).unwrap();
    }

    if !feed.sources().is_empty() {
        writeln!(out, "\nGrounded verification sources:").unwrap();
        for s in feed.sources() {
            writeln!(out, "  - {} <{}>", s.title, s.uri).unwrap();
        }
    }
    out
}

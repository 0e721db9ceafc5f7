//! Data models for live articles and their citations.
//!
//! - [`ArticleRecord`]: one story scraped out of the model's text answer
//! - [`SourceRecord`]: one web citation backing the batch as a whole
//! - [`LiveNewsBatch`]: what a single sync hands to the presentation layer
//! - [`Category`]: the preferred category vocabulary plus a free-text escape hatch
//!
//! Field names serialize in camelCase to match the card layout consumed by
//! the front-end.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Article category.
///
/// The instruction asks the model to choose one of five values, but nothing
/// enforces it, so anything unrecognized is kept verbatim in [`Category::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Residential,
    Commercial,
    Policy,
    Economy,
    Infrastructure,
    Other(String),
}

impl Category {
    /// The preferred vocabulary, in display order.
    pub const PREFERRED: [Category; 5] = [
        Category::Residential,
        Category::Commercial,
        Category::Policy,
        Category::Economy,
        Category::Infrastructure,
    ];

    /// Map a raw label onto the vocabulary, case-insensitively.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        Self::PREFERRED
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| Category::Other(trimmed.to_string()))
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Residential => "Residential",
            Category::Commercial => "Commercial",
            Category::Policy => "Policy",
            Category::Economy => "Economy",
            Category::Infrastructure => "Infrastructure",
            Category::Other(s) => s,
        }
    }

    pub fn is_preferred(&self) -> bool {
        !matches!(self, Category::Other(_))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from_label(&s)
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.label().to_string()
    }
}

/// A live story extracted from one segment of the model's answer.
///
/// Only `title`, `excerpt` and `category` come from the model; everything
/// else is synthesized client-side when the record is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    /// Random client-side id such as `live-k3f9a`.
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub category: Category,
    /// Keyword-based illustrative image, not a picture of the actual story.
    pub image_url: String,
    /// Day of the sync in `en-IN` short form; the upstream dateline is ignored.
    pub date: String,
    /// Aggregator attribution, not a real byline.
    pub author: String,
    pub read_time: String,
}

/// A web citation returned in the grounding metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub title: String,
    pub uri: String,
}

/// Result of one live sync. Replaced wholesale on the next sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveNewsBatch {
    pub articles: Vec<ArticleRecord>,
    pub sources: Vec<SourceRecord>,
}

impl LiveNewsBatch {
    /// The shape every failure converges to.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty() && self.sources.is_empty()
    }
}

//! Scraping article records out of the model's free-text answer.
//!
//! Search grounding cannot be combined with typed/structured output, so the
//! model is asked to answer in a labelled plain-text layout instead:
//!
//! ```text
//! TITLE: <headline>
//! EXCERPT: <one or two sentences>
//! CATEGORY: <Residential|Commercial|Policy|Economy|Infrastructure>
//! IMAGE_PROMPT: <two or three photo keywords>
//! ---
//! ```
//!
//! # Grammar
//!
//! - A *segment* is the text between separators. A separator is a run of
//!   three or more hyphens that ends a line, either alone on the line or
//!   glued to the end of the last field (`IMAGE_PROMPT: pune metro---`).
//!   Hyphen runs inside a line (`2023---24`) are not separators.
//! - Within a segment, a field is the first `LABEL:` occurrence for that
//!   field (labels match case-insensitively) and its value is the rest of
//!   that line. Multi-line values are not supported.
//! - A segment becomes a record only when both title and excerpt are present
//!   and non-empty after trimming. Other segments are dropped silently.
//!
//! Which label names map to which field is configuration ([`LabelMap`]), so
//! the `IMAGE_PROMPT` and `IMAGE_KEY` variants of the layout share one parser.

use crate::config::Config;
use crate::image::ImageResolver;
use crate::models::{ArticleRecord, Category};
use crate::utils::{live_id, today_en_in};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use tracing::debug;

static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)-{3,}[ \t]*\r?$").unwrap());

/// Label names accepted for each field. The first name of each list is the
/// one used when the instruction is written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LabelMap {
    pub title: Vec<String>,
    pub excerpt: Vec<String>,
    pub category: Vec<String>,
    pub image: Vec<String>,
}

impl Default for LabelMap {
    fn default() -> Self {
        Self {
            title: vec!["TITLE".to_string()],
            excerpt: vec!["EXCERPT".to_string()],
            category: vec!["CATEGORY".to_string()],
            image: vec!["IMAGE_PROMPT".to_string(), "IMAGE_KEY".to_string()],
        }
    }
}

impl LabelMap {
    /// Label written into the instruction for the headline line.
    ///
    /// # Returns
    ///
    /// The first configured title label, or `"TITLE"` when the list is empty.
    pub fn title_label(&self) -> &str {
        primary(&self.title, "TITLE")
    }

    /// Label written into the instruction for the summary line.
    pub fn excerpt_label(&self) -> &str {
        primary(&self.excerpt, "EXCERPT")
    }

    /// Label written into the instruction for the category line.
    pub fn category_label(&self) -> &str {
        primary(&self.category, "CATEGORY")
    }

    /// Label written into the instruction for the photo-keyword line.
    pub fn image_label(&self) -> &str {
        primary(&self.image, "IMAGE_PROMPT")
    }
}

fn primary<'a>(names: &'a [String], fallback: &'a str) -> &'a str {
    names.first().map(String::as_str).unwrap_or(fallback)
}

/// Values stamped onto every record that the model does not supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDefaults {
    pub fallback_category: String,
    pub author: String,
    pub read_time: String,
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            fallback_category: "Market Update".to_string(),
            author: "IRT Analytics".to_string(),
            read_time: "3 min".to_string(),
        }
    }
}

/// Compiled field matchers plus record defaults.
#[derive(Debug, Clone)]
pub struct ResponseParser {
    title: Regex,
    excerpt: Regex,
    category: Regex,
    image: Regex,
    defaults: RecordDefaults,
    images: ImageResolver,
}

impl ResponseParser {
    /// Compile the field matchers for a label map.
    ///
    /// # Arguments
    ///
    /// * `labels` - Accepted label names per field
    /// * `defaults` - Category fallback, author and read-time stamped on each record
    /// * `images` - Resolver used to turn the image hint into a URL
    ///
    /// # Errors
    ///
    /// Returns an error if any field has no usable label name.
    pub fn new(
        labels: &LabelMap,
        defaults: RecordDefaults,
        images: ImageResolver,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(Self {
            title: field_regex("title", &labels.title)?,
            excerpt: field_regex("excerpt", &labels.excerpt)?,
            category: field_regex("category", &labels.category)?,
            image: field_regex("image", &labels.image)?,
            defaults,
            images,
        })
    }

    /// Build a parser from the label, fallback and image settings of `config`.
    pub fn from_config(config: &Config) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Self::new(
            &config.labels,
            RecordDefaults {
                fallback_category: config.fallback_category.clone(),
                author: config.author.clone(),
                read_time: config.read_time.clone(),
            },
            ImageResolver::new(config.image.clone()),
        )
    }

    /// Parse every valid segment of `raw`, in order.
    ///
    /// # Arguments
    ///
    /// * `raw` - The model's answer text
    ///
    /// # Returns
    ///
    /// One record per segment that has both a title and an excerpt. Never
    /// fails, and no cap is applied here.
    pub fn parse(&self, raw: &str) -> Vec<ArticleRecord> {
        let date = today_en_in();
        let mut segments = 0usize;
        let records: Vec<ArticleRecord> = split_segments(raw)
            .inspect(|_| segments += 1)
            .filter_map(|segment| self.parse_segment(segment, &date))
            .collect();
        debug!(segments, records = records.len(), "Parsed model response");
        records
    }

    fn parse_segment(&self, segment: &str, date: &str) -> Option<ArticleRecord> {
        let title = capture(&self.title, segment)?;
        let excerpt = capture(&self.excerpt, segment)?;
        let category = capture(&self.category, segment)
            .map(Category::from_label)
            .unwrap_or_else(|| Category::from_label(&self.defaults.fallback_category));
        let image_url = self.images.resolve(capture(&self.image, segment));

        Some(ArticleRecord {
            id: live_id(),
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            category,
            image_url,
            date: date.to_string(),
            author: self.defaults.author.clone(),
            read_time: self.defaults.read_time.clone(),
        })
    }
}

/// Split a raw answer into segments on separator lines. Blank segments are
/// skipped, so an empty answer yields none.
pub fn split_segments(raw: &str) -> impl Iterator<Item = &str> {
    SEPARATOR
        .split(raw)
        .filter(|segment| !segment.trim().is_empty())
}

/// `LABEL:` at a word boundary, value captured up to the end of that line.
fn field_regex(field: &str, names: &[String]) -> Result<Regex, Box<dyn Error + Send + Sync>> {
    let alternatives = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(regex::escape)
        .join("|");
    if alternatives.is_empty() {
        return Err(format!("no label names configured for the {field} field").into());
    }
    Ok(Regex::new(&format!(r"(?i)\b(?:{alternatives})[ \t]*:[ \t]*([^\r\n]*)"))?)
}

/// Value of the first match, trimmed; `None` when absent or blank.
fn capture<'a>(re: &Regex, segment: &'a str) -> Option<&'a str> {
    re.captures(segment)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|v| !v.is_empty())
}

//! Caller-side live feed state.
//!
//! Holds what the presentation layer shows: the current live articles, their
//! citations and a loading flag. Every sync takes a [`SyncTicket`]; only the
//! newest ticket may replace the state, so a slow response to an earlier
//! re-sync cannot overwrite a newer one. State is always replaced wholesale.

use crate::models::{ArticleRecord, Category, LiveNewsBatch, SourceRecord};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Sequence number of one sync request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SyncTicket(u64);

impl SyncTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Category selection for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted.label().eq_ignore_ascii_case(category.label()),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(Category::from_label(s)))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(c) => write!(f, "{c}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct LiveFeed {
    issued: u64,
    loading: bool,
    articles: Vec<ArticleRecord>,
    sources: Vec<SourceRecord>,
}

impl LiveFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a sync. Any ticket issued earlier becomes stale.
    pub fn begin_sync(&mut self) -> SyncTicket {
        self.issued += 1;
        self.loading = true;
        SyncTicket(self.issued)
    }

    /// Install `batch` if `ticket` is the newest one issued. Returns whether
    /// the batch was applied; stale batches are dropped.
    pub fn apply(&mut self, ticket: SyncTicket, batch: LiveNewsBatch) -> bool {
        if ticket.0 != self.issued {
            debug!(
                ticket = ticket.0,
                newest = self.issued,
                "Discarding stale live news batch"
            );
            return false;
        }
        self.articles = batch.articles;
        self.sources = batch.sources;
        self.loading = false;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn articles(&self) -> &[ArticleRecord] {
        &self.articles
    }

    pub fn sources(&self) -> &[SourceRecord] {
        &self.sources
    }

    /// Articles passing the category filter, in batch order.
    pub fn visible<'a>(&'a self, filter: &'a CategoryFilter) -> impl Iterator<Item = &'a ArticleRecord> {
        self.articles.iter().filter(move |a| filter.matches(&a.category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, category: Category) -> ArticleRecord {
        ArticleRecord {
            id: format!("live-{title}"),
            title: title.to_string(),
            excerpt: "E".to_string(),
            category,
            image_url: "u".to_string(),
            date: "1 Jan 2025".to_string(),
            author: "IRT Analytics".to_string(),
            read_time: "3 min".to_string(),
        }
    }

    fn batch(titles: &[&str]) -> LiveNewsBatch {
        LiveNewsBatch {
            articles: titles.iter().map(|t| article(t, Category::Policy)).collect(),
            sources: vec![SourceRecord { title: "s".to_string(), uri: "u".to_string() }],
        }
    }

    #[test]
    fn test_newest_ticket_applies() {
        let mut feed = LiveFeed::new();
        let t = feed.begin_sync();
        assert!(feed.is_loading());
        assert!(feed.apply(t, batch(&["a"])));
        assert!(!feed.is_loading());
        assert_eq!(feed.articles().len(), 1);
        assert_eq!(feed.sources().len(), 1);
    }

    #[test]
    fn test_stale_ticket_is_discarded_in_either_order() {
        let mut feed = LiveFeed::new();
        let old = feed.begin_sync();
        let new = feed.begin_sync();
        assert!(old < new);

        // older response lands first: ignored, still loading
        assert!(!feed.apply(old, batch(&["old"])));
        assert!(feed.is_loading());
        assert!(feed.articles().is_empty());

        assert!(feed.apply(new, batch(&["new"])));
        assert_eq!(feed.articles()[0].title, "new");

        // older response lands last: still ignored
        assert!(!feed.apply(old, batch(&["old"])));
        assert_eq!(feed.articles()[0].title, "new");
    }

    #[test]
    fn test_apply_replaces_wholesale() {
        let mut feed = LiveFeed::new();
        let t = feed.begin_sync();
        feed.apply(t, batch(&["a", "b", "c"]));
        let t = feed.begin_sync();
        feed.apply(t, LiveNewsBatch::empty());
        assert!(feed.articles().is_empty());
        assert!(feed.sources().is_empty());
    }

    #[test]
    fn test_category_filter_parsing() {
        assert_eq!("All".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "policy".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Policy)
        );
        assert_eq!(
            "Market Update".parse::<CategoryFilter>().unwrap().to_string(),
            "Market Update"
        );
    }

    #[test]
    fn test_visible_filters_by_category() {
        let mut feed = LiveFeed::new();
        let t = feed.begin_sync();
        feed.apply(
            t,
            LiveNewsBatch {
                articles: vec![
                    article("a", Category::Residential),
                    article("b", Category::Policy),
                    article("c", Category::Other("market update".to_string())),
                ],
                sources: vec![],
            },
        );

        let all = CategoryFilter::All;
        assert_eq!(feed.visible(&all).count(), 3);

        let policy = CategoryFilter::Only(Category::Policy);
        let titles: Vec<&str> = feed.visible(&policy).map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["b"]);

        let other: CategoryFilter = "Market Update".parse().unwrap();
        assert_eq!(feed.visible(&other).count(), 1);
    }
}

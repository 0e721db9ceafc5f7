//! Illustrative image references built from the model's keyword hint.
//!
//! The model is asked for two or three photo keywords per story. They are
//! folded into a keyword-search image URL together with a few constant
//! domain keywords, so every card gets *some* architectural picture even
//! though it is not a photo of the actual story.

use itertools::Itertools;
use serde::Deserialize;

/// Image URL template settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Keyword-search endpoint, including the size path segments.
    pub base_url: String,
    /// Keywords prepended to every lookup.
    pub domain_keywords: Vec<String>,
    /// Hint used when a segment carries no image label.
    pub default_hint: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://loremflickr.com/800/600".to_string(),
            domain_keywords: vec![
                "architecture".to_string(),
                "india".to_string(),
                "building".to_string(),
            ],
            default_hint: "indian architecture".to_string(),
        }
    }
}

/// Turns a free-text keyword hint into an image URL.
#[derive(Debug, Clone, Default)]
pub struct ImageResolver {
    config: ImageConfig,
}

impl ImageResolver {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    /// Build the image URL for `hint`, falling back to the default hint when
    /// it is absent or blank.
    ///
    /// Whitespace runs (and stray commas) become single commas; each keyword
    /// is percent-encoded on its own so the comma delimiters survive.
    ///
    /// ```ignore
    /// let r = ImageResolver::default();
    /// assert_eq!(
    ///     r.resolve(Some("Mumbai Skyline  Towers")),
    ///     "https://loremflickr.com/800/600/architecture,india,building,Mumbai,Skyline,Towers"
    /// );
    /// ```
    pub fn resolve(&self, hint: Option<&str>) -> String {
        let hint = hint
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(&self.config.default_hint);

        let keywords = self
            .config
            .domain_keywords
            .iter()
            .map(String::as_str)
            .chain(hint.split(|c: char| c.is_whitespace() || c == ','))
            .filter(|k| !k.is_empty())
            .map(|k| urlencoding::encode(k))
            .join(",");

        format!("{}/{}", self.config.base_url.trim_end_matches('/'), keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_runs_become_commas() {
        let url = ImageResolver::default().resolve(Some("Mumbai Skyline  Towers"));
        assert!(url.contains("Mumbai,Skyline,Towers"));
        assert!(url.contains("architecture"));
        assert!(url.contains("building"));
        assert!(url.contains("india"));
        assert_eq!(
            url,
            "https://loremflickr.com/800/600/architecture,india,building,Mumbai,Skyline,Towers"
        );
    }

    #[test]
    fn test_missing_hint_uses_default() {
        let url = ImageResolver::default().resolve(None);
        assert!(url.ends_with("architecture,india,building,indian,architecture"));
    }

    #[test]
    fn test_blank_hint_uses_default() {
        let url = ImageResolver::default().resolve(Some("   \t "));
        assert!(url.ends_with(",indian,architecture"));
    }

    #[test]
    fn test_hint_is_trimmed_and_tabs_collapse() {
        let url = ImageResolver::default().resolve(Some("  delhi\tmetro \n construction  "));
        assert!(url.ends_with(",delhi,metro,construction"));
    }

    #[test]
    fn test_comma_separated_hint_does_not_double_commas() {
        let url = ImageResolver::default().resolve(Some("pune, office park"));
        assert!(url.ends_with(",pune,office,park"));
        assert!(!url.contains(",,"));
    }

    #[test]
    fn test_keywords_are_percent_encoded() {
        let url = ImageResolver::default().resolve(Some("'mumbai high-rise'"));
        assert!(url.ends_with(",%27mumbai,high-rise%27"));
    }

    #[test]
    fn test_custom_config() {
        let resolver = ImageResolver::new(ImageConfig {
            base_url: "https://img.example/400/300/".to_string(),
            domain_keywords: vec!["property".to_string()],
            default_hint: "real estate india".to_string(),
        });
        assert_eq!(
            resolver.resolve(None),
            "https://img.example/400/300/property,real,estate,india"
        );
    }
}

//! YAML configuration.
//!
//! Every field has a default, so the file is optional and may set any subset
//! of keys:
//!
//! ```yaml
//! model: gemini-3-flash-preview
//! story_count: 5
//! max_articles: 6
//! interpolate_query: false
//! labels:
//!   image: [IMAGE_KEY, IMAGE_PROMPT]
//! image:
//!   default_hint: real estate india
//! ```

use crate::image::ImageConfig;
use crate::parser::LabelMap;
use serde::Deserialize;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Runtime settings for the live news client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model identifier placed in the request path.
    pub model: String,
    /// Base URL of the Generative Language API.
    pub endpoint: String,
    /// How many stories the instruction asks for.
    pub story_count: usize,
    /// Hard cap on articles returned per sync.
    pub max_articles: usize,
    /// Append the caller's search term to the instruction. Off by default:
    /// the fixed template ignores the query.
    pub interpolate_query: bool,
    /// Query assumed when the caller supplies none.
    pub default_query: String,
    pub labels: LabelMap,
    pub fallback_category: String,
    pub author: String,
    pub read_time: String,
    pub image: ImageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gemini-3-flash-preview".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            story_count: 6,
            max_articles: 6,
            interpolate_query: false,
            default_query: "current real estate market trends India Oct 2024".to_string(),
            labels: LabelMap::default(),
            fallback_category: "Market Update".to_string(),
            author: "IRT Analytics".to_string(),
            read_time: "3 min".to_string(),
            image: ImageConfig::default(),
        }
    }
}

impl Config {
    /// Parse a YAML document. Blank input yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Load the config file at `path`, or the defaults when no path is given.
///
/// # Arguments
///
/// * `path` - Optional path to a `config.yaml` file
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML for
/// [`Config`].
#[instrument(level = "info", skip_all, fields(path = path.unwrap_or("<defaults>")))]
pub async fn load_config(path: Option<&str>) -> Result<Config, Box<dyn Error + Send + Sync>> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let yaml = fs::read_to_string(path).await?;
    let config = Config::from_yaml(&yaml)?;
    info!(model = %config.model, story_count = config.story_count, max_articles = config.max_articles, "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.story_count, 6);
        assert_eq!(c.max_articles, 6);
        assert!(!c.interpolate_query);
        assert_eq!(c.labels.image, vec!["IMAGE_PROMPT", "IMAGE_KEY"]);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml("\n  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_yaml_overrides_only_given_keys() {
        let c = Config::from_yaml(
            "story_count: 5\nlabels:\n  image: [IMAGE_KEY]\nimage:\n  default_hint: real estate india\n",
        )
        .unwrap();
        assert_eq!(c.story_count, 5);
        assert_eq!(c.max_articles, 6);
        assert_eq!(c.labels.image, vec!["IMAGE_KEY"]);
        assert_eq!(c.labels.title, vec!["TITLE"]);
        assert_eq!(c.image.default_hint, "real estate india");
        assert_eq!(c.image.base_url, "https://loremflickr.com/800/600");
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(Config::from_yaml("story_count: [not a number").is_err());
    }

    #[tokio::test]
    async fn test_load_config_without_path() {
        assert_eq!(load_config(None).await.unwrap(), Config::default());
    }

    #[tokio::test]
    async fn test_load_config_missing_file() {
        assert!(load_config(Some("/definitely/not/here.yaml")).await.is_err());
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("india_realty_wire_cfg_{}.yaml", std::process::id()));
        tokio::fs::write(&path, "model: gemini-2.5-flash\ninterpolate_query: true\n")
            .await
            .unwrap();
        let c = load_config(path.to_str()).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;
        assert_eq!(c.model, "gemini-2.5-flash");
        assert!(c.interpolate_query);
    }
}

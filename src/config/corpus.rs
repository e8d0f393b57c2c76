//! Corpus configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{CorpusError, Result};
use crate::helpers::validate_date_format;

/// Main corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    // Site
    pub title: String,
    pub author: String,

    // Directory
    pub source_dir: String,
    pub posts_dir: String,
    pub drafts_dir: String,

    // Loading
    pub render_drafts: bool,
    pub strict: bool,
    pub require_category: bool,

    // Writing
    pub new_post_name: String,

    // Date / Time format
    pub date_format: String,

    #[serde(default)]
    pub highlight: HighlightConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            title: "Hexo".to_string(),
            author: "John Doe".to_string(),

            source_dir: "source".to_string(),
            posts_dir: "_posts".to_string(),
            drafts_dir: "_drafts".to_string(),

            render_drafts: false,
            strict: false,
            require_category: false,

            new_post_name: ":title.md".to_string(),

            date_format: "YYYY-MM-DD".to_string(),

            highlight: HighlightConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl CorpusConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text. An empty file yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: CorpusConfig = serde_yaml::from_str(content)?;
        validate_date_format(&config.date_format).map_err(CorpusError::DateFormat)?;
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

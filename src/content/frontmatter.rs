//! Front-matter parsing

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::error::{CorpusError, Result};
use crate::helpers::parse_date_string;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> std::result::Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub updated: Option<String>,
    /// Single classification, the form this corpus writes
    #[serde(deserialize_with = "string_or_vec", default)]
    pub category: Vec<String>,
    /// Hexo's list form, accepted as a fallback
    #[serde(deserialize_with = "string_or_vec", default)]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    #[serde(default = "default_published")]
    pub published: bool,
    pub lang: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

fn default_published() -> bool {
    true
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            updated: None,
            category: Vec::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            published: true,
            lang: None,
            extra: HashMap::new(),
        }
    }
}

impl FrontMatter {
    /// Parse front-matter from content string, falling back to "no front-matter"
    /// when the block is malformed.
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        match Self::parse_strict(content) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Failed to parse front-matter, treating as content: {}", e);
                (FrontMatter::default(), content.trim_start())
            }
        }
    }

    /// Parse front-matter from content string, failing on a malformed block
    pub fn parse_strict(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start();

        // Check for YAML front-matter (---)
        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        // Check for JSON front-matter (;;; or {"key":)
        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        // No front-matter found
        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str)> {
        let rest = &content[3..];
        let rest = rest.trim_start_matches(['\n', '\r']);

        let Some(end_pos) = rest.find("\n---") else {
            // No closing ---, treat as no front-matter
            return Ok((FrontMatter::default(), content));
        };

        let yaml_content = &rest[..end_pos];
        let remaining = &rest[end_pos + 4..];
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        // A `---` pair around prose is a pair of thematic breaks, not metadata
        if !yaml_content.lines().any(looks_like_yaml_key) {
            return Ok((FrontMatter::default(), content));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)
            .map_err(|e| CorpusError::FrontMatter(format!("YAML: {}", e)))?;
        Ok((fm, remaining))
    }

    fn parse_json(content: &str) -> Result<(Self, &str)> {
        // JSON front-matter ends with ;;;
        if let Some(rest) = content.strip_prefix(";;;") {
            if let Some(end_pos) = rest.find(";;;") {
                let json_content = &rest[..end_pos];
                let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
                let fm = from_json(json_content)?;
                return Ok((fm, remaining));
            }
        }

        if content.starts_with('{') {
            let mut depth = 0;
            let mut end_pos = 0;
            for (i, c) in content.char_indices() {
                match c {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            end_pos = i + 1;
                            break;
                        }
                    }
                    _ => {}
                }
            }

            if end_pos > 0 {
                let json_content = &content[..end_pos];
                let remaining = content[end_pos..].trim_start_matches(['\n', '\r']);
                let fm = from_json(json_content)?;
                return Ok((fm, remaining));
            }
        }

        Err(CorpusError::FrontMatter(
            "unterminated JSON front-matter".to_string(),
        ))
    }

    /// Parse the date string
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_string)
    }

    /// Parse the updated date string
    pub fn parse_updated(&self) -> Option<NaiveDateTime> {
        self.updated.as_deref().and_then(parse_date_string)
    }

    /// All classification values, `category` entries first
    pub fn all_categories(&self) -> impl Iterator<Item = &String> {
        self.category.iter().chain(self.categories.iter())
    }

    /// The document's single category
    pub fn primary_category(&self) -> Option<String> {
        self.all_categories()
            .map(|c| c.trim())
            .find(|c| !c.is_empty())
            .map(str::to_string)
    }
}

fn from_json(json_content: &str) -> Result<FrontMatter> {
    serde_json::from_str(json_content)
        .map_err(|e| CorpusError::FrontMatter(format!("JSON: {}", e)))
}

/// Whether a line reads as a `key: value` YAML entry
fn looks_like_yaml_key(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }
    let Some(colon_pos) = trimmed.find(':') else {
        return false;
    };
    let key = &trimmed[..colon_pos];
    let is_valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp");
    if !is_valid_key {
        return false;
    }
    let after_colon = &trimmed[colon_pos + 1..];
    after_colon.is_empty() || after_colon.starts_with(' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: DryIoc basics
date: 2019-05-12 10:30:00
category: .NET
tags:
  - dependency-injection
  - aspnetcore
---

Registering services.
"#;

        let (fm, remaining) = FrontMatter::parse_strict(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("DryIoc basics"));
        assert_eq!(fm.tags, vec!["dependency-injection", "aspnetcore"]);
        assert_eq!(fm.primary_category().as_deref(), Some(".NET"));
        assert!(remaining.starts_with("Registering services."));
    }

    #[test]
    fn test_hexo_categories_fallback() {
        let content = "---\ntitle: Polly\ndate: 2020-01-01\ncategories:\n  - Resilience\n---\nBody\n";
        let (fm, _) = FrontMatter::parse_strict(content).unwrap();
        assert_eq!(fm.primary_category().as_deref(), Some("Resilience"));
        assert_eq!(fm.all_categories().count(), 1);
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "Refit", "tags": ["http", "client"]}

This is content.
"#;

        let (fm, remaining) = FrontMatter::parse_strict(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Refit"));
        assert_eq!(fm.tags, vec!["http", "client"]);
        assert!(remaining.contains("This is content."));
    }

    #[test]
    fn test_parse_semicolon_json_frontmatter() {
        let content = ";;;{\"title\": \"Serilog\"};;;\nLogging.\n";
        let (fm, remaining) = FrontMatter::parse_strict(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Serilog"));
        assert_eq!(remaining, "Logging.\n");
    }

    #[test]
    fn test_semicolon_block_without_object_is_error() {
        let content = ";;;\n\"title\": \"Serilog\"\n;;;\nLogging.\n";
        assert!(FrontMatter::parse_strict(content).is_err());
    }

    #[test]
    fn test_parse_date() {
        let fm = FrontMatter {
            date: Some("2024-01-15 10:30:00".to_string()),
            ..Default::default()
        };

        let dt = fm.parse_date().unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-15");
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = r#"---
title: Single Tag Post
date: 2024-01-15
tags: Notes
categories: Blog
---

Content here.
"#;

        let (fm, _) = FrontMatter::parse_strict(content).unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
        assert_eq!(fm.categories, vec!["Blog"]);
    }

    #[test]
    fn test_malformed_yaml_strict_and_lenient() {
        let content = "---\ntitle: [unclosed\ndate: 2024-01-15\n---\nBody\n";
        assert!(matches!(
            FrontMatter::parse_strict(content),
            Err(CorpusError::FrontMatter(_))
        ));

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, None);
        assert!(remaining.starts_with("---"));
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = r#"
---

Some text with a list:
- Item 1
- Item 2

---
More content here.
"#;

        let (fm, remaining) = FrontMatter::parse_strict(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(remaining.contains("Some text"));
    }

    #[test]
    fn test_content_with_url_not_yaml() {
        let content = r#"
---

Check out https://example.com/path and http://test.com

---
More content.
"#;

        let (fm, remaining) = FrontMatter::parse_strict(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(remaining.contains("https://example.com"));
    }

    #[test]
    fn test_unknown_keys_kept() {
        let content = "---\ntitle: T\ndate: 2024-01-15\ntoc: true\n---\n";
        let (fm, _) = FrontMatter::parse_strict(content).unwrap();
        assert_eq!(fm.extra.get("toc"), Some(&serde_yaml::Value::Bool(true)));
        assert!(fm.published);
    }
}

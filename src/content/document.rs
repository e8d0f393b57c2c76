//! Document model

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

lazy_static! {
    /// Excerpt separator, matched the way Hexo matches it
    static ref MORE_MARKER: Regex = Regex::new(r"<!--\s*more\s*-->").unwrap();
}

/// Identifier of a document: its path under the posts directory, without
/// extension and with `/` separators
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the id of a file relative to the directory it was loaded from
    pub fn from_path(root: &Path, path: &Path) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let without_ext = relative.with_extension("");
        let parts: Vec<_> = without_ext
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Self(parts.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A single authored post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Identifier, unique within a corpus
    pub id: DocumentId,

    /// Display title
    pub title: String,

    /// Publication date
    pub date: NaiveDateTime,

    /// Last updated date
    pub updated: Option<NaiveDateTime>,

    /// Single classification
    pub category: Option<String>,

    /// Keyword labels, in authored order
    pub tags: Vec<String>,

    /// Raw markdown after the front-matter
    pub body: String,

    /// Byte offset of the first excerpt marker in `body`
    pub excerpt_marker: Option<usize>,

    /// Whether the document is published
    pub published: bool,

    /// Document language
    pub lang: Option<String>,

    /// Full source file path
    pub source: PathBuf,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Document {
    /// Create a document with the required fields; the excerpt marker is
    /// located in `body`
    pub fn new(id: DocumentId, title: String, date: NaiveDateTime, body: String) -> Self {
        let excerpt_marker = find_excerpt_marker(&body);
        Self {
            id,
            title,
            date,
            updated: None,
            category: None,
            tags: Vec::new(),
            body,
            excerpt_marker,
            published: true,
            lang: None,
            source: PathBuf::new(),
            extra: HashMap::new(),
        }
    }

    /// Metadata view of this document
    pub fn meta(&self) -> DocumentMeta<'_> {
        DocumentMeta {
            id: &self.id,
            title: &self.title,
            date: self.date,
            category: self.category.as_deref(),
            tags: &self.tags,
        }
    }

    /// Teaser text before the excerpt marker
    pub fn excerpt(&self) -> Option<&str> {
        self.excerpt_marker.map(|pos| self.body[..pos].trim())
    }

    /// Text after the excerpt marker, or the whole body without one
    pub fn more(&self) -> &str {
        match self.excerpt_marker {
            Some(pos) => {
                let after = &self.body[pos..];
                let skip = MORE_MARKER.find(after).map(|m| m.end()).unwrap_or(0);
                after[skip..].trim()
            }
            None => &self.body,
        }
    }
}

/// Metadata of a document, without its body
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DocumentMeta<'a> {
    pub id: &'a DocumentId,
    pub title: &'a str,
    pub date: NaiveDateTime,
    pub category: Option<&'a str>,
    pub tags: &'a [String],
}

/// Byte offset of the first excerpt marker
pub fn find_excerpt_marker(body: &str) -> Option<usize> {
    excerpt_markers(body).first().copied()
}

/// Number of excerpt markers in a body
pub fn count_excerpt_markers(body: &str) -> usize {
    excerpt_markers(body).len()
}

/// Offsets of the markers that markdown sees as HTML. A marker shown inside
/// fenced or indented code, or in a code span, is text and does not count.
fn excerpt_markers(body: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    for (event, range) in Parser::new(body).into_offset_iter() {
        match event {
            // A block's range covers all of its lines, so a marker split
            // over several lines is still found
            Event::Start(Tag::HtmlBlock) | Event::InlineHtml(_) => {
                let start = range.start;
                positions.extend(
                    MORE_MARKER
                        .find_iter(&body[range])
                        .map(|m| start + m.start()),
                );
            }
            _ => {}
        }
    }
    positions
}

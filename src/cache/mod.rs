//! Content index for change detection
//!
//! The index records a content hash and the metadata of every document the
//! last time it was indexed. Comparing a fresh load against it tells which
//! documents were added, edited or removed since then.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::content::{Document, DocumentStore};
use crate::error::Result;

/// Cache directory, relative to the corpus base directory
pub const CACHE_DIR: &str = ".corpus-cache";

/// Index file name inside the cache directory
const INDEX_FILE: &str = "index.json";

/// Indexed state of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// SHA-256 of the raw body, hex encoded
    pub content_hash: String,
    pub title: String,
    pub date: NaiveDateTime,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

impl IndexEntry {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            content_hash: hash_content(&doc.body),
            title: doc.title.clone(),
            date: doc.date,
            category: doc.category.clone(),
            tags: doc.tags.clone(),
        }
    }

    /// Whether the document differs from this entry
    fn differs_from(&self, other: &IndexEntry) -> bool {
        self.content_hash != other.content_hash
            || self.title != other.title
            || self.date != other.date
            || self.category != other.category
            || self.tags != other.tags
    }
}

/// Index database, keyed by document id
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IndexDb {
    /// Version of the index format
    pub version: u32,
    /// Hash of the corpus config, empty without a config file
    pub config_hash: String,
    pub documents: BTreeMap<String, IndexEntry>,
}

impl IndexDb {
    /// Current index format version
    const VERSION: u32 = 2;

    /// Create a new index with version set
    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            ..Default::default()
        }
    }

    /// Load index from disk, or create a new empty one
    pub fn load(base_dir: &Path) -> Self {
        let index_path = base_dir.join(CACHE_DIR).join(INDEX_FILE);
        if let Ok(content) = fs::read_to_string(&index_path) {
            match serde_json::from_str::<IndexDb>(&content) {
                Ok(index) if index.version == Self::VERSION => return index,
                Ok(_) => tracing::info!("Index version mismatch, rebuilding index"),
                Err(e) => tracing::warn!("Discarding unreadable index {:?}: {}", index_path, e),
            }
        }
        Self::new()
    }

    /// Save index to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let cache_dir = base_dir.join(CACHE_DIR);
        fs::create_dir_all(&cache_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(cache_dir.join(INDEX_FILE), content)?;
        Ok(())
    }

    /// Whether nothing has been indexed yet
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Replace the indexed state with the given store
    pub fn update(&mut self, store: &DocumentStore, config_hash: &str) {
        self.version = Self::VERSION;
        self.config_hash = config_hash.to_string();
        self.documents = store
            .documents()
            .iter()
            .map(|doc| (doc.id.to_string(), IndexEntry::from_document(doc)))
            .collect();
    }
}

/// Differences between the index and the current corpus
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub removed: Vec<String>,
    pub config_changed: bool,
}

impl ChangeSet {
    /// Check if any changes were detected
    pub fn has_changes(&self) -> bool {
        self.config_changed
            || !self.added.is_empty()
            || !self.modified.is_empty()
            || !self.removed.is_empty()
    }

    /// Get summary of changes for logging
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.added.is_empty() {
            parts.push(format!("{} added", self.added.len()));
        }
        if !self.modified.is_empty() {
            parts.push(format!("{} modified", self.modified.len()));
        }
        if !self.removed.is_empty() {
            parts.push(format!("{} removed", self.removed.len()));
        }
        if self.config_changed {
            parts.push("config changed".to_string());
        }

        if parts.is_empty() {
            "no changes".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Compare the current store against the index
pub fn detect_changes(index: &IndexDb, store: &DocumentStore, config_hash: &str) -> ChangeSet {
    let mut changeset = ChangeSet {
        config_changed: !index.is_empty() && index.config_hash != config_hash,
        ..Default::default()
    };

    for doc in store.documents() {
        let id = doc.id.to_string();
        let current = IndexEntry::from_document(doc);
        match index.documents.get(&id) {
            None => changeset.added.push(id),
            Some(cached) if cached.differs_from(&current) => {
                tracing::debug!("Document modified since last index: {}", id);
                changeset.modified.push(id)
            }
            Some(_) => {}
        }
    }

    for id in index.documents.keys() {
        if store.get(&id.as_str().into()).is_none() {
            changeset.removed.push(id.clone());
        }
    }

    changeset.added.sort();
    changeset.modified.sort();
    changeset
}

/// Hash file content. SHA-256 keeps saved indexes comparable across
/// toolchain upgrades.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Calculate a hash for a file on disk, empty when it does not exist
pub fn hash_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Ok(String::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(hash_content(&content))
}

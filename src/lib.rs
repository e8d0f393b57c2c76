//! hexo-corpus: read, check and index a corpus of Hexo-style Markdown posts
//!
//! Every post is an independent Markdown file with YAML front-matter. The
//! crate loads them into a [`content::DocumentStore`], which lists document
//! metadata and hands out raw bodies by id.

pub mod cache;
pub mod check;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;

use std::path::{Path, PathBuf};

pub use content::{Document, DocumentAccessor, DocumentId, DocumentMeta, DocumentStore};
pub use error::CorpusError;

/// A corpus rooted at a base directory
#[derive(Debug, Clone)]
pub struct Corpus {
    /// Corpus configuration
    pub config: config::CorpusConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Published posts directory
    pub posts_dir: PathBuf,
    /// Drafts directory
    pub drafts_dir: PathBuf,
}

impl Corpus {
    /// Open a corpus from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> error::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::CorpusConfig::load(&config_path)?
        } else {
            config::CorpusConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a corpus with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::CorpusConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let posts_dir = source_dir.join(&config.posts_dir);
        let drafts_dir = source_dir.join(&config.drafts_dir);

        Self {
            config,
            base_dir,
            source_dir,
            posts_dir,
            drafts_dir,
        }
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join("_config.yml")
    }

    /// Load every document into a store
    pub fn load(&self) -> error::Result<DocumentStore> {
        content::loader::ContentLoader::new(self).load_store()
    }

    /// Run the hygiene checks
    pub fn check(&self) -> check::Report {
        check::Checker::new(self).run()
    }
}

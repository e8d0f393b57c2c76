//! Content loader - loads documents from the posts directory

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{Document, DocumentId, DocumentStore, FrontMatter};
use crate::error::{CorpusError, Result};
use crate::Corpus;

/// Loads documents from the corpus source directories
pub struct ContentLoader<'a> {
    corpus: &'a Corpus,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(corpus: &'a Corpus) -> Self {
        Self { corpus }
    }

    /// Directories documents are loaded from, posts first
    pub fn roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.corpus.posts_dir.clone()];
        if self.corpus.config.render_drafts {
            roots.push(self.corpus.drafts_dir.clone());
        }
        roots
    }

    /// Every markdown file under the loader roots, paired with its root
    pub fn candidate_files(&self) -> Vec<(PathBuf, PathBuf)> {
        let mut files = Vec::new();
        for root in self.roots() {
            if !root.exists() {
                continue;
            }
            for entry in WalkDir::new(&root)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if path.is_file() && is_markdown_file(path) {
                    files.push((root.clone(), path.to_path_buf()));
                }
            }
        }
        files
    }

    /// Load all documents into a store
    pub fn load_store(&self) -> Result<DocumentStore> {
        DocumentStore::new(self.load_documents()?)
    }

    /// Load all documents, newest first
    ///
    /// Broken files, and files whose id was already taken by an earlier
    /// one, are skipped with a warning unless the corpus is strict.
    pub fn load_documents(&self) -> Result<Vec<Document>> {
        let strict = self.corpus.config.strict;
        let mut documents = Vec::new();
        let mut seen: HashMap<DocumentId, PathBuf> = HashMap::new();

        for (root, path) in self.candidate_files() {
            match load_document(&root, &path, strict) {
                Ok(doc) if !doc.published && !self.corpus.config.render_drafts => {
                    tracing::debug!("Skipping unpublished document {}", doc.id);
                }
                Ok(doc) => {
                    if let Some(first) = seen.get(&doc.id) {
                        if strict {
                            return Err(CorpusError::DuplicateId {
                                id: doc.id.to_string(),
                                first: first.clone(),
                                second: path,
                            });
                        }
                        tracing::warn!(
                            "Skipping {:?}: id `{}` already used by {:?}",
                            path,
                            doc.id,
                            first
                        );
                        continue;
                    }
                    seen.insert(doc.id.clone(), path);
                    documents.push(doc);
                }
                Err(e) if strict => return Err(e),
                Err(e) => {
                    tracing::warn!("Failed to load document {:?}: {}", path, e);
                }
            }
        }

        documents.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        tracing::debug!("Loaded {} documents", documents.len());

        Ok(documents)
    }
}

/// Load a single document from a file
pub fn load_document(root: &Path, path: &Path, strict: bool) -> Result<Document> {
    let content = fs::read_to_string(path)?;
    parse_document(root, path, &content, strict)
}

/// Build a document from file content
pub fn parse_document(root: &Path, path: &Path, content: &str, strict: bool) -> Result<Document> {
    let (fm, body) = if strict {
        FrontMatter::parse_strict(content)?
    } else {
        FrontMatter::parse(content)
    };

    let title = fm
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| CorpusError::MissingField {
            field: "title",
            path: path.to_path_buf(),
        })?
        .to_string();

    let date = match fm.date.as_deref() {
        None => {
            return Err(CorpusError::MissingField {
                field: "date",
                path: path.to_path_buf(),
            })
        }
        Some(raw) => fm.parse_date().ok_or_else(|| {
            CorpusError::FrontMatter(format!("invalid date `{}` in {:?}", raw, path))
        })?,
    };

    let mut doc = Document::new(
        DocumentId::from_path(root, path),
        title,
        date,
        body.to_string(),
    );
    doc.updated = fm.parse_updated();
    doc.category = fm.primary_category();
    doc.tags = fm.tags;
    doc.published = fm.published;
    doc.lang = fm.lang;
    doc.source = path.to_path_buf();
    doc.extra = fm.extra;

    Ok(doc)
}

/// Check if a file is a markdown file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn corpus_with(files: &[(&str, &str)], config: &str) -> (TempDir, Corpus) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), config).unwrap();
        for (rel, content) in files {
            write(dir.path(), rel, content);
        }
        let corpus = Corpus::new(dir.path()).unwrap();
        (dir, corpus)
    }

    const POLLY: &str = "---\ntitle: Polly retries\ndate: 2020-03-01 09:00:00\ncategory: Resilience\ntags:\n  - polly\n  - http\n---\nRetry policies.\n<!-- more -->\nDetails.\n";
    const REFIT: &str = "---\ntitle: Refit\ndate: 2021-07-15\n---\nTyped clients.\n";
    const SAME_DAY: &str = "---\ntitle: HttpClient factory\ndate: 2021-07-15\n---\nNamed clients.\n";

    #[test]
    fn test_load_sorted_newest_first() {
        let (_dir, corpus) = corpus_with(
            &[
                ("source/_posts/polly.md", POLLY),
                ("source/_posts/http/refit.markdown", REFIT),
                ("source/_posts/notes.txt", "not markdown"),
                // Walked after the posts, but its id sorts first
                ("source/_drafts/aspnet.md", SAME_DAY),
            ],
            "render_drafts: true\n",
        );
        let docs = ContentLoader::new(&corpus).load_documents().unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["aspnet", "http/refit", "polly"]);

        let polly = &docs[2];
        assert_eq!(polly.category.as_deref(), Some("Resilience"));
        assert_eq!(polly.tags, vec!["polly", "http"]);
        assert_eq!(polly.excerpt(), Some("Retry policies."));
        assert!(polly.body.starts_with("Retry policies."));
    }

    #[test]
    fn test_missing_fields_skipped_when_lenient() {
        let (_dir, corpus) = corpus_with(
            &[
                ("source/_posts/ok.md", REFIT),
                ("source/_posts/untitled.md", "---\ndate: 2020-01-01\n---\nx\n"),
                ("source/_posts/undated.md", "---\ntitle: Undated\n---\nx\n"),
            ],
            "",
        );
        let docs = ContentLoader::new(&corpus).load_documents().unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_strict_mode_fails_on_first_broken_file() {
        let (_dir, corpus) = corpus_with(
            &[("source/_posts/undated.md", "---\ntitle: Undated\n---\nx\n")],
            "strict: true\n",
        );
        let err = ContentLoader::new(&corpus).load_documents().unwrap_err();
        assert!(matches!(err, CorpusError::MissingField { field: "date", .. }));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let root = Path::new("/posts");
        let err = parse_document(
            root,
            Path::new("/posts/a.md"),
            "---\ntitle: A\ndate: 2020-02-31\n---\n",
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CorpusError::FrontMatter(_)));
    }

    #[test]
    fn test_unpublished_and_drafts() {
        let unpublished = "---\ntitle: Hidden\ndate: 2022-01-01\npublished: false\n---\n";
        let files = [
            ("source/_posts/hidden.md", unpublished),
            ("source/_drafts/wip.md", REFIT),
        ];

        let (_dir, corpus) = corpus_with(&files, "");
        assert!(ContentLoader::new(&corpus).load_documents().unwrap().is_empty());

        let (_dir, corpus) = corpus_with(&files, "render_drafts: true\n");
        let docs = ContentLoader::new(&corpus).load_documents().unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_draft_with_taken_id() {
        let files = [
            ("source/_posts/polly.md", POLLY),
            ("source/_drafts/polly.md", REFIT),
        ];

        let (_dir, corpus) = corpus_with(&files, "render_drafts: true\n");
        let store = corpus.load().unwrap();
        assert_eq!(store.len(), 1);
        let polly = store.get(&"polly".into()).unwrap();
        assert_eq!(polly.title, "Polly retries");

        let (_dir, corpus) = corpus_with(&files, "render_drafts: true\nstrict: true\n");
        let err = corpus.load().unwrap_err();
        assert!(matches!(err, CorpusError::DuplicateId { ref id, .. } if id == "polly"));
    }

    #[test]
    fn test_missing_posts_dir_is_empty() {
        let (_dir, corpus) = corpus_with(&[], "");
        assert!(ContentLoader::new(&corpus).candidate_files().is_empty());
        assert!(ContentLoader::new(&corpus).load_store().unwrap().is_empty());
    }
}

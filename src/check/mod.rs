//! Corpus hygiene checks
//!
//! The checker reads every candidate file directly rather than going through
//! the loader, so one broken document is reported instead of skipped.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::loader::ContentLoader;
use crate::content::{count_excerpt_markers, DocumentId, FrontMatter};
use crate::Corpus;

/// How serious an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// What is wrong with a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum IssueKind {
    Unreadable(String),
    UnstableRead,
    InvalidFrontMatter(String),
    MissingTitle,
    EmptyTitle,
    MissingDate,
    InvalidDate(String),
    MultipleExcerptMarkers(usize),
    DuplicateTag(String),
    DuplicateId(PathBuf),
    MissingCategory,
    MultipleCategories(usize),
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::MissingCategory | IssueKind::MultipleCategories(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Unreadable(e) => write!(f, "unreadable: {}", e),
            IssueKind::UnstableRead => write!(f, "file changed between two reads"),
            IssueKind::InvalidFrontMatter(e) => write!(f, "invalid front-matter: {}", e),
            IssueKind::MissingTitle => write!(f, "missing title"),
            IssueKind::EmptyTitle => write!(f, "empty title"),
            IssueKind::MissingDate => write!(f, "missing date"),
            IssueKind::InvalidDate(raw) => write!(f, "invalid date `{}`", raw),
            IssueKind::MultipleExcerptMarkers(n) => write!(f, "{} excerpt markers, expected one", n),
            IssueKind::DuplicateTag(tag) => write!(f, "duplicate tag `{}`", tag),
            IssueKind::DuplicateId(other) => write!(f, "same id as {:?}", other),
            IssueKind::MissingCategory => write!(f, "no category"),
            IssueKind::MultipleCategories(n) => {
                write!(f, "{} categories, only the first is used", n)
            }
        }
    }
}

/// A problem found in one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub id: DocumentId,
    pub path: PathBuf,
    pub kind: IssueKind,
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// Result of checking a corpus
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub files_checked: usize,
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == severity)
            .count()
    }

    /// Issues reported for one document
    pub fn issues_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a IssueKind> + 'a {
        self.issues
            .iter()
            .filter(move |i| i.id.as_str() == id)
            .map(|i| &i.kind)
    }
}

/// Runs hygiene checks over every candidate file of a corpus
pub struct Checker<'a> {
    corpus: &'a Corpus,
}

impl<'a> Checker<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        Self { corpus }
    }

    pub fn run(&self) -> Report {
        let mut report = Report::default();
        let mut seen: HashMap<DocumentId, PathBuf> = HashMap::new();

        for (root, path) in ContentLoader::new(self.corpus).candidate_files() {
            report.files_checked += 1;
            let id = DocumentId::from_path(&root, &path);

            if let Some(first) = seen.get(&id) {
                report.issues.push(Issue {
                    id: id.clone(),
                    path: path.clone(),
                    kind: IssueKind::DuplicateId(first.clone()),
                });
            } else {
                seen.insert(id.clone(), path.clone());
            }

            for kind in self.check_file(&path) {
                report.issues.push(Issue {
                    id: id.clone(),
                    path: path.clone(),
                    kind,
                });
            }
        }

        tracing::debug!(
            "Checked {} files, {} issues",
            report.files_checked,
            report.issues.len()
        );
        report
    }

    /// Read a file twice and check its content
    fn check_file(&self, path: &Path) -> Vec<IssueKind> {
        let first = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => return vec![IssueKind::Unreadable(e.to_string())],
        };
        let mut issues = Vec::new();
        match fs::read(path) {
            Ok(second) => issues.extend(compare_reads(&first, &second)),
            Err(e) => issues.push(IssueKind::Unreadable(e.to_string())),
        }

        match String::from_utf8(first) {
            Ok(content) => issues.extend(self.check_content(&content)),
            Err(e) => issues.push(IssueKind::Unreadable(e.to_string())),
        }
        issues
    }

    /// Check the text of one document
    pub fn check_content(&self, content: &str) -> Vec<IssueKind> {
        let (fm, body) = match FrontMatter::parse_strict(content) {
            Ok(parsed) => parsed,
            Err(e) => return vec![IssueKind::InvalidFrontMatter(e.to_string())],
        };

        let mut issues = Vec::new();

        match fm.title.as_deref() {
            None => issues.push(IssueKind::MissingTitle),
            Some(title) if title.trim().is_empty() => issues.push(IssueKind::EmptyTitle),
            Some(_) => {}
        }

        match fm.date.as_deref() {
            None => issues.push(IssueKind::MissingDate),
            Some(raw) if fm.parse_date().is_none() => {
                issues.push(IssueKind::InvalidDate(raw.to_string()))
            }
            Some(_) => {}
        }

        let markers = count_excerpt_markers(body);
        if markers > 1 {
            issues.push(IssueKind::MultipleExcerptMarkers(markers));
        }

        let mut tags = HashSet::new();
        let mut reported = HashSet::new();
        for tag in &fm.tags {
            if !tags.insert(tag.as_str()) && reported.insert(tag.as_str()) {
                issues.push(IssueKind::DuplicateTag(tag.clone()));
            }
        }

        let categories = fm.all_categories().count();
        if categories > 1 {
            issues.push(IssueKind::MultipleCategories(categories));
        } else if categories == 0 && self.corpus.config.require_category {
            issues.push(IssueKind::MissingCategory);
        }

        issues
    }
}

/// Two reads of one file must return the same bytes
pub fn compare_reads(first: &[u8], second: &[u8]) -> Option<IssueKind> {
    (first != second).then_some(IssueKind::UnstableRead)
}

//! In-memory document store and the accessor over it

use std::collections::HashMap;

use super::{Document, DocumentId, DocumentMeta};
use crate::error::{CorpusError, Result};

/// Read access to a set of documents
pub trait DocumentAccessor {
    /// Metadata of every document. Each call starts a fresh pass over the
    /// same set, in the same order.
    fn list_documents(&self) -> Box<dyn Iterator<Item = DocumentMeta<'_>> + '_>;

    /// Raw body text of a document
    fn get_body(&self, id: &DocumentId) -> Result<&str>;
}

/// Immutable set of loaded documents, indexed by id
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    index: HashMap<DocumentId, usize>,
}

impl DocumentStore {
    /// Build a store, rejecting duplicate ids
    pub fn new(documents: Vec<Document>) -> Result<Self> {
        let mut index = HashMap::with_capacity(documents.len());
        for (i, doc) in documents.iter().enumerate() {
            if let Some(&first) = index.get(&doc.id) {
                let first: &Document = &documents[first];
                return Err(CorpusError::DuplicateId {
                    id: doc.id.to_string(),
                    first: first.source.clone(),
                    second: doc.source.clone(),
                });
            }
            index.insert(doc.id.clone(), i);
        }
        Ok(Self { documents, index })
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.index.get(id).map(|&i| &self.documents[i])
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Tag names with document counts, most used first
    pub fn tags(&self) -> Vec<(String, usize)> {
        count_labels(self.documents.iter().flat_map(|d| d.tags.iter()))
    }

    /// Category names with document counts, most used first
    pub fn categories(&self) -> Vec<(String, usize)> {
        count_labels(self.documents.iter().filter_map(|d| d.category.as_ref()))
    }
}

impl DocumentAccessor for DocumentStore {
    fn list_documents(&self) -> Box<dyn Iterator<Item = DocumentMeta<'_>> + '_> {
        Box::new(self.documents.iter().map(Document::meta))
    }

    fn get_body(&self, id: &DocumentId) -> Result<&str> {
        self.get(id)
            .map(|doc| doc.body.as_str())
            .ok_or_else(|| CorpusError::NotFound(id.to_string()))
    }
}

fn count_labels<'a>(labels: impl Iterator<Item = &'a String>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_insert(0) += 1;
    }
    let mut counts: Vec<_> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

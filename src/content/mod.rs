//! Content module - documents, front-matter and the document store

mod document;
mod frontmatter;
pub mod loader;
mod markdown;
mod store;

pub use document::{count_excerpt_markers, find_excerpt_marker, Document, DocumentId, DocumentMeta};
pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use store::{DocumentAccessor, DocumentStore};

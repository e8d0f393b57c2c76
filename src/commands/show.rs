//! Show one document

use anyhow::Result;

use crate::content::{DocumentAccessor, DocumentId, DocumentStore, MarkdownRenderer};
use crate::Corpus;

/// What part of a document to print
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShowOptions {
    /// Render the Markdown to HTML
    pub html: bool,
    /// Only the teaser before the excerpt marker
    pub excerpt: bool,
}

/// Print a document body
pub fn run(corpus: &Corpus, id: &str, options: ShowOptions) -> Result<()> {
    let store = corpus.load()?;
    let output = render(corpus, &store, &DocumentId::from(id), options)?;
    println!("{}", output);
    Ok(())
}

/// Render a document body per the options
pub fn render(
    corpus: &Corpus,
    store: &DocumentStore,
    id: &DocumentId,
    options: ShowOptions,
) -> Result<String> {
    let body = store.get_body(id)?;

    let text = if options.excerpt {
        match store.get(id).and_then(|doc| doc.excerpt()) {
            Some(excerpt) => excerpt,
            None => {
                tracing::warn!("{} has no excerpt marker, showing the full body", id);
                body
            }
        }
    } else {
        body
    };

    if options.html {
        let renderer = MarkdownRenderer::from_config(&corpus.config.highlight);
        Ok(renderer.render(text))
    } else {
        Ok(text.to_string())
    }
}

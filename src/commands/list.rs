//! List corpus content

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

use crate::content::{DocumentAccessor, DocumentStore, MarkdownRenderer};
use crate::helpers::format_date;
use crate::Corpus;

/// List corpus content by type
pub fn run(corpus: &Corpus, content_type: &str, json: bool) -> Result<()> {
    let store = corpus.load()?;
    print!("{}", render(corpus, &store, content_type, json)?);
    Ok(())
}

#[derive(Serialize)]
struct Count<'a> {
    name: &'a str,
    count: usize,
}

/// Render a listing of the store
pub fn render(corpus: &Corpus, store: &DocumentStore, content_type: &str, json: bool) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" | "doc" | "docs" => {
            if json {
                let metas: Vec<_> = store.list_documents().collect();
                out.push_str(&serde_json::to_string_pretty(&metas)?);
                out.push('\n');
            } else {
                writeln!(out, "Documents ({}):", store.len())?;
                for meta in store.list_documents() {
                    let category = meta
                        .category
                        .map(|c| format!(" ({})", c))
                        .unwrap_or_default();
                    writeln!(
                        out,
                        "  {} - {}{} [{}]",
                        format_date(&meta.date, &corpus.config.date_format)?,
                        meta.title,
                        category,
                        meta.id
                    )?;
                }
            }
        }
        "tag" | "tags" => write_counts(&mut out, "Tags", &store.tags(), json)?,
        "category" | "categories" => {
            write_counts(&mut out, "Categories", &store.categories(), json)?
        }
        "language" | "languages" => {
            let mut languages: Vec<(String, usize)> = Vec::new();
            for doc in store.documents() {
                for lang in MarkdownRenderer::code_languages(&doc.body) {
                    match languages.iter_mut().find(|(l, _)| *l == lang) {
                        Some((_, count)) => *count += 1,
                        None => languages.push((lang, 1)),
                    }
                }
            }
            languages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            write_counts(&mut out, "Code languages", &languages, json)?;
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category, language",
                content_type
            );
        }
    }

    Ok(out)
}

fn write_counts(out: &mut String, heading: &str, counts: &[(String, usize)], json: bool) -> Result<()> {
    if json {
        let counts: Vec<_> = counts
            .iter()
            .map(|(name, count)| Count { name, count: *count })
            .collect();
        out.push_str(&serde_json::to_string_pretty(&counts)?);
        out.push('\n');
        return Ok(());
    }

    writeln!(out, "{} ({}):", heading, counts.len())?;
    for (name, count) in counts {
        writeln!(out, "  {} ({})", name, count)?;
    }
    Ok(())
}

//! Create a new document

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::Corpus;

/// Scaffold used when the corpus has no `scaffolds/post.md`
pub const DEFAULT_SCAFFOLD: &str = r#"---
title: {{ title }}
date: {{ date }}
category: {{ category }}
tags: {{ tags }}
---

<!-- more -->
"#;

/// Options for a new document
#[derive(Debug, Default, Clone)]
pub struct NewDocument<'a> {
    pub title: &'a str,
    pub category: Option<&'a str>,
    pub tags: &'a [String],
    /// File name without extension, instead of `new_post_name`
    pub path: Option<&'a str>,
}

/// Create a new document in the posts directory, returning its path
pub fn create_document(corpus: &Corpus, new: &NewDocument) -> Result<PathBuf> {
    let now = chrono::Local::now().naive_local();

    if new.title.trim().is_empty() {
        anyhow::bail!("Title must not be empty");
    }

    let filename = match new.path {
        Some(p) => format!("{}.md", p.trim_end_matches(".md")),
        None => {
            let slug = slug::slugify(new.title);
            if slug.is_empty() {
                anyhow::bail!("Cannot derive a file name from title {:?}, pass --path", new.title);
            }
            corpus
                .config
                .new_post_name
                .replace(":title", &slug)
                .replace(":year", &now.format("%Y").to_string())
                .replace(":month", &now.format("%m").to_string())
                .replace(":day", &now.format("%d").to_string())
                .replace(":i_month", &now.format("%-m").to_string())
                .replace(":i_day", &now.format("%-d").to_string())
        }
    };

    let file_path = corpus.posts_dir.join(&filename);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let scaffold_path = corpus.base_dir.join("scaffolds").join("post.md");
    let scaffold = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)
            .with_context(|| format!("Failed to read scaffold {:?}", scaffold_path))?
    } else {
        DEFAULT_SCAFFOLD.to_string()
    };

    // JSON strings and arrays are valid YAML flow scalars, so values with
    // colons or quotes stay intact
    let title = serde_json::to_string(new.title.trim())?;
    let category = match new.category {
        Some(c) => serde_json::to_string(c)?,
        None => String::new(),
    };
    let tags = if new.tags.is_empty() {
        String::new()
    } else {
        serde_json::to_string(new.tags)?
    };

    let content = scaffold
        .replace("{{ title }}", &title)
        .replace("{{ date }}", &now.format("%Y-%m-%d %H:%M:%S").to_string())
        .replace("{{ category }}", &category)
        .replace("{{ tags }}", &tags);

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_document_loads_back() {
        let dir = TempDir::new().unwrap();
        let corpus = Corpus::new(dir.path()).unwrap();
        let tags = vec!["polly".to_string(), "http: client".to_string()];

        let path = create_document(
            &corpus,
            &NewDocument {
                title: "Polly: retry policies",
                category: Some("Resilience"),
                tags: &tags,
                path: None,
            },
        )
        .unwrap();
        assert_eq!(path, corpus.posts_dir.join("polly-retry-policies.md"));

        let store = corpus.load().unwrap();
        let doc = store.get(&"polly-retry-policies".into()).unwrap();
        assert_eq!(doc.title, "Polly: retry policies");
        assert_eq!(doc.category.as_deref(), Some("Resilience"));
        assert_eq!(doc.tags, tags);
        assert!(doc.excerpt_marker.is_some());
    }

    #[test]
    fn test_new_document_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let corpus = Corpus::new(dir.path()).unwrap();
        let new = NewDocument {
            title: "Swagger",
            path: Some("notes/swagger"),
            ..Default::default()
        };
        let path = create_document(&corpus, &new).unwrap();
        assert!(path.ends_with("notes/swagger.md"));
        assert!(create_document(&corpus, &new).is_err());
    }

    #[test]
    fn test_scaffold_from_corpus() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("scaffolds")).unwrap();
        fs::write(
            dir.path().join("scaffolds/post.md"),
            "---\ntitle: {{ title }}\ndate: {{ date }}\nlayout: note\n---\n",
        )
        .unwrap();
        let corpus = Corpus::new(dir.path()).unwrap();
        let path = create_document(
            &corpus,
            &NewDocument {
                title: "Mixins",
                ..Default::default()
            },
        )
        .unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("title: \"Mixins\""));
        assert!(content.contains("layout: note"));
    }
}

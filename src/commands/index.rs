//! Index the corpus and report what changed since the last run

use anyhow::Result;

use crate::cache::{self, ChangeSet, IndexDb};
use crate::Corpus;

/// Compare the corpus to the saved index, then save the new index
pub fn run(corpus: &Corpus) -> Result<ChangeSet> {
    let start = std::time::Instant::now();

    let store = corpus.load()?;
    let config_hash = cache::hash_file(&corpus.config_path())?;

    let index = IndexDb::load(&corpus.base_dir);
    let first_run = index.is_empty();
    let changeset = cache::detect_changes(&index, &store, &config_hash);

    if first_run {
        tracing::info!("Indexing {} documents", store.len());
    } else {
        tracing::info!("Changes detected: {}", changeset.summary());
        for id in &changeset.modified {
            tracing::warn!("Document edited after it was indexed: {}", id);
        }
    }

    let mut new_index = IndexDb::new();
    new_index.update(&store, &config_hash);
    new_index.save(&corpus.base_dir)?;

    tracing::info!("Indexed in {:.2}s", start.elapsed().as_secs_f64());

    Ok(changeset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_index_twice() {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("source/_posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("a.md"), "---\ntitle: A\ndate: 2020-01-01\n---\none\n").unwrap();
        let corpus = Corpus::new(dir.path()).unwrap();

        let first = run(&corpus).unwrap();
        assert_eq!(first.added, vec!["a"]);

        fs::write(posts.join("a.md"), "---\ntitle: A\ndate: 2020-01-01\n---\nedited\n").unwrap();
        fs::write(posts.join("b.md"), "---\ntitle: B\ndate: 2020-01-02\n---\ntwo\n").unwrap();

        let second = run(&corpus).unwrap();
        assert_eq!(second.added, vec!["b"]);
        assert_eq!(second.modified, vec!["a"]);
        assert!(second.removed.is_empty());

        assert!(!run(&corpus).unwrap().has_changes());
    }
}

//! Clean the index cache

use anyhow::Result;
use std::fs;

use crate::cache::CACHE_DIR;
use crate::Corpus;

/// Delete the index cache directory
pub fn run(corpus: &Corpus) -> Result<()> {
    let cache_dir = corpus.base_dir.join(CACHE_DIR);
    if cache_dir.exists() {
        fs::remove_dir_all(&cache_dir)?;
        tracing::info!("Deleted: {:?}", cache_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::IndexDb;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_index() {
        let dir = TempDir::new().unwrap();
        let corpus = Corpus::new(dir.path()).unwrap();
        IndexDb::new().save(dir.path()).unwrap();
        assert!(dir.path().join(CACHE_DIR).exists());

        run(&corpus).unwrap();
        assert!(!dir.path().join(CACHE_DIR).exists());
        run(&corpus).unwrap();
    }
}

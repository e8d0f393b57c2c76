//! Initialize a new corpus

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::new::DEFAULT_SCAFFOLD;

const CONFIG: &str = r#"# Corpus configuration

# Site
title: Dev Notes
author: John Doe

# Directory
source_dir: source
posts_dir: _posts
drafts_dir: _drafts

# Loading
render_drafts: false
strict: false
require_category: false

# Writing
new_post_name: :title.md

# Date / Time format
date_format: YYYY-MM-DD

highlight:
  theme: base16-ocean.dark
  line_number: true
"#;

/// Initialize a new corpus in the given directory
pub fn init_corpus(target_dir: &Path) -> Result<()> {
    if target_dir.join("_config.yml").exists() {
        anyhow::bail!("A corpus already exists in {:?}", target_dir);
    }

    fs::create_dir_all(target_dir.join("source/_posts"))?;
    fs::create_dir_all(target_dir.join("source/_drafts"))?;
    fs::create_dir_all(target_dir.join("scaffolds"))?;

    fs::write(target_dir.join("_config.yml"), CONFIG)
        .with_context(|| format!("Failed to write config in {:?}", target_dir))?;
    fs::write(target_dir.join("scaffolds/post.md"), DEFAULT_SCAFFOLD)?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
category: Meta
tags:
  - welcome
---

This is the first post of the corpus.

<!-- more -->

Check the corpus with:

```bash
$ hexo-corpus check
```
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(target_dir.join("source/_posts/hello-world.md"), sample_post)?;
    tracing::debug!("Initialized corpus layout in {:?}", target_dir);

    Ok(())
}

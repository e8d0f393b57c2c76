//! Check corpus hygiene

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::fmt::Write;
use std::fs;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::check::{Report, Severity};
use crate::Corpus;

/// Check the corpus once, failing when errors are found
pub fn run(corpus: &Corpus) -> Result<()> {
    let report = corpus.check();
    print!("{}", render(&report));

    if report.has_errors() {
        anyhow::bail!("{} errors found", report.count(Severity::Error));
    }
    Ok(())
}

/// Format a report for the terminal
pub fn render(report: &Report) -> String {
    let mut out = String::new();
    for issue in &report.issues {
        let label = match issue.severity() {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let _ = writeln!(out, "{}: {} [{}] {}", label, issue.id, issue.path.display(), issue.kind);
    }
    let _ = writeln!(
        out,
        "Checked {} files: {} errors, {} warnings",
        report.files_checked,
        report.count(Severity::Error),
        report.count(Severity::Warning)
    );
    out
}

/// Watch the source directory and `_config.yml`, re-checking on changes
pub async fn watch(corpus: &Corpus) -> Result<()> {
    let mut corpus = corpus.clone();
    let config_path = corpus.config_path();
    let (tx, rx) = channel();

    // Editors emit several events per save; one check per burst
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    debouncer
        .watcher()
        .watch(&corpus.source_dir, RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", corpus.source_dir);

    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", corpus.source_dir);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed = relevant_paths(events.iter().map(|e| e.path.as_path()));
                if changed.is_empty() {
                    continue;
                }
                for path in &changed {
                    tracing::debug!("File changed: {}", path.display());
                }

                if touches_config(&changed, &config_path) {
                    match Corpus::new(&corpus.base_dir) {
                        Ok(reloaded) => {
                            tracing::info!("Config changed, reloading...");
                            if reloaded.source_dir != corpus.source_dir {
                                let _ = debouncer.watcher().unwatch(&corpus.source_dir);
                                debouncer
                                    .watcher()
                                    .watch(&reloaded.source_dir, RecursiveMode::Recursive)?;
                            }
                            corpus = reloaded;
                        }
                        Err(e) => {
                            tracing::error!("Keeping previous config, reload failed: {}", e);
                        }
                    }
                }

                tracing::info!("Source changed, checking...");
                print!("{}", render(&corpus.check()));
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Drop editor and VCS noise from a batch of changed paths
fn relevant_paths<'a>(paths: impl Iterator<Item = &'a Path>) -> Vec<&'a Path> {
    paths
        .filter(|path| {
            let path_str = path.to_string_lossy();
            !path_str.contains(".git")
                && !path_str.contains(".DS_Store")
                && !path_str.ends_with('~')
                && !path_str.ends_with(".swp")
        })
        .collect()
}

/// Whether a batch of changes includes the config file
fn touches_config(paths: &[&Path], config_path: &Path) -> bool {
    paths.iter().any(|path| {
        *path == config_path
            || matches!(
                (fs::canonicalize(path), fs::canonicalize(config_path)),
                (Ok(a), Ok(b)) if a == b
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Issue, IssueKind};
    use std::path::PathBuf;

    #[test]
    fn test_render_report() {
        let report = Report {
            files_checked: 3,
            issues: vec![
                Issue {
                    id: "serilog".into(),
                    path: PathBuf::from("source/_posts/serilog.md"),
                    kind: IssueKind::MissingDate,
                },
                Issue {
                    id: "polly".into(),
                    path: PathBuf::from("source/_posts/polly.md"),
                    kind: IssueKind::MissingCategory,
                },
            ],
        };
        assert_eq!(
            render(&report),
            "error: serilog [source/_posts/serilog.md] missing date\n\
             warning: polly [source/_posts/polly.md] no category\n\
             Checked 3 files: 1 errors, 1 warnings\n"
        );
    }

    #[test]
    fn test_relevant_paths_skip_editor_noise() {
        let paths = [
            Path::new("source/_posts/polly.md"),
            Path::new("source/_posts/polly.md~"),
            Path::new("source/_posts/.polly.md.swp"),
            Path::new("source/.git/index"),
            Path::new("source/_posts/.DS_Store"),
        ];
        assert_eq!(
            relevant_paths(paths.iter().copied()),
            vec![Path::new("source/_posts/polly.md")]
        );
    }

    #[test]
    fn test_touches_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = dir.path().join("_config.yml");
        fs::write(&config, "title: Blog\n").unwrap();
        let post = dir.path().join("source/_posts/polly.md");

        assert!(!touches_config(&[post.as_path()], &config));
        assert!(touches_config(&[post.as_path(), config.as_path()], &config));

        // Same file reached through a different spelling
        let dotted = dir.path().join(".").join("_config.yml");
        assert!(touches_config(&[dotted.as_path()], &config));
    }
}

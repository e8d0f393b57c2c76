//! CLI entry point for hexo-corpus

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hexo_corpus::commands;
use hexo_corpus::Corpus;

#[derive(Parser)]
#[command(name = "hexo-corpus")]
#[command(version)]
#[command(about = "Read, check and index a corpus of Hexo-style Markdown posts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new corpus
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new document
    New {
        /// Title of the new document
        title: String,

        /// Category of the new document
        #[arg(long)]
        category: Option<String>,

        /// Tag for the new document (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// File name under the posts directory, without extension
        #[arg(short, long)]
        path: Option<String>,
    },

    /// List corpus content
    #[command(alias = "ls")]
    List {
        /// Type of content to list (post, tag, category, language)
        #[arg(default_value = "post")]
        r#type: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the body of a document
    Show {
        /// Document id (path under the posts directory, without extension)
        id: String,

        /// Render the body to HTML
        #[arg(long)]
        html: bool,

        /// Only print the teaser before the excerpt marker
        #[arg(long)]
        excerpt: bool,
    },

    /// Check documents for missing or malformed metadata
    Check {
        /// Keep watching the source directory and re-check on changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Index the corpus and report changes since the last index
    Index,

    /// Delete the index cache
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "hexo_corpus=debug,info"
    } else {
        "hexo_corpus=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing corpus in {:?}", target_dir);
            commands::init::init_corpus(&target_dir)?;
            println!("Initialized empty corpus in {:?}", target_dir);
        }

        Commands::New {
            title,
            category,
            tags,
            path,
        } => {
            let corpus = Corpus::new(&base_dir)?;
            let new = commands::new::NewDocument {
                title: &title,
                category: category.as_deref(),
                tags: &tags,
                path: path.as_deref(),
            };
            let file = commands::new::create_document(&corpus, &new)?;
            println!("Created: {:?}", file);
        }

        Commands::List { r#type, json } => {
            let corpus = Corpus::new(&base_dir)?;
            commands::list::run(&corpus, &r#type, json)?;
        }

        Commands::Show { id, html, excerpt } => {
            let corpus = Corpus::new(&base_dir)?;
            commands::show::run(&corpus, &id, commands::show::ShowOptions { html, excerpt })?;
        }

        Commands::Check { watch } => {
            let corpus = Corpus::new(&base_dir)?;
            if watch {
                print!("{}", commands::check::render(&corpus.check()));
                commands::check::watch(&corpus).await?;
            } else {
                commands::check::run(&corpus)?;
            }
        }

        Commands::Index => {
            let corpus = Corpus::new(&base_dir)?;
            let changes = commands::index::run(&corpus)?;
            println!("Indexed: {}", changes.summary());
        }

        Commands::Clean => {
            let corpus = Corpus::new(&base_dir)?;
            tracing::info!("Cleaning index cache...");
            commands::clean::run(&corpus)?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("hexo-corpus version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

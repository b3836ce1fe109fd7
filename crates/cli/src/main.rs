//! Operator CLI for the docshelf path cache.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docshelf_core::config::AppConfig;
use docshelf_core::{Document, DocumentId, DocumentPath};
use docshelf_metadata::MetadataStore;
use docshelf_storage::{CachedStorage, FsProbe, PathCacheIntrospection, ReconcileStats};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docshelfctl")]
#[command(about = "Inspect and repair the docshelf document path cache")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "DOCSHELF_CONFIG",
        default_value = "config/docshelf.toml"
    )]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct OutputArgs {
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Populate the cache from the home database and report what happened
    Reconcile {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List documents whose files cannot be found
    Missing {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Resolve a document id to its file path
    Resolve {
        /// Document id
        doc_id: String,
    },
    /// Show every cached document path
    Cached {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Serialize)]
struct CacheEntry {
    doc_id: DocumentId,
    path: DocumentPath,
}

#[derive(Serialize)]
struct ReconcileReport {
    stats: ReconcileStats,
    entries: Vec<CacheEntry>,
}

fn load_config(path: &str) -> Result<AppConfig> {
    let mut figment = Figment::new();
    if Path::new(path).exists() {
        tracing::debug!(config_path = %path, "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::debug!("No config file found at {}", path);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("DOCSHELF_").split("__"))
        .extract()
        .context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn open_storage(config: &AppConfig) -> Result<(Arc<dyn MetadataStore>, CachedStorage)> {
    let metadata = docshelf_metadata::from_config(&config.metadata)
        .await
        .context("failed to open home database")?;
    let storage = docshelf_storage::from_config(config, &*metadata, &FsProbe::new())
        .await
        .context("failed to initialize document storage")?;
    Ok((metadata, storage))
}

fn cache_entries(view: &dyn PathCacheIntrospection) -> Vec<CacheEntry> {
    view.snapshot_entries()
        .into_iter()
        .map(|(doc_id, path)| CacheEntry { doc_id, path })
        .collect()
}

fn print_entries(entries: &[CacheEntry]) {
    if entries.is_empty() {
        println!("No cached document paths.");
        return;
    }
    for entry in entries {
        println!("{}\t{}", entry.doc_id, entry.path);
    }
}

fn print_missing(docs: &[Document]) {
    if docs.is_empty() {
        println!("All documents have files.");
        return;
    }
    for doc in docs {
        match &doc.external_path {
            Some(recorded) => println!("{}\t{}\t(recorded: {})", doc.id, doc.name, recorded),
            None => println!("{}\t{}", doc.id, doc.name),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Reconcile { output } => {
            // Run the pass explicitly so the report reflects this invocation,
            // whatever reconcile_on_startup says.
            let startup = AppConfig {
                cache: docshelf_core::config::CacheConfig {
                    reconcile_on_startup: false,
                    ..config.cache.clone()
                },
                ..config.clone()
            };
            let (metadata, storage) = open_storage(&startup).await?;
            let stats = storage
                .cache
                .reconcile(&*metadata, &FsProbe::new())
                .await
                .context("reconciliation failed")?;
            let entries = cache_entries(&*storage.cache);

            if output.json {
                let report = ReconcileReport { stats, entries };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Scanned {} documents: {} registered ({} displaced), {} missing, {} errors",
                    stats.documents_scanned,
                    stats.registered,
                    stats.displaced,
                    stats.skipped_missing,
                    stats.errors
                );
                print_entries(&entries);
            }
        }
        Commands::Missing { output } => {
            let (metadata, storage) = open_storage(&config).await?;
            let missing = storage
                .cache
                .find_uncached_documents(&*metadata, &FsProbe::new())
                .await
                .context("failed to scan documents")?;

            if output.json {
                println!("{}", serde_json::to_string_pretty(&missing)?);
            } else {
                print_missing(&missing);
            }
        }
        Commands::Resolve { doc_id } => {
            let id = DocumentId::new(doc_id).context("invalid document id")?;
            let (_metadata, storage) = open_storage(&config).await?;
            let path = storage.manager.get_path(&id);
            let cached = storage
                .manager
                .path_cache_introspection()
                .and_then(|view| view.lookup_by_id(&id))
                .is_some();
            let source = if cached { "cached" } else { "default" };
            println!("{path}\t({source})");
        }
        Commands::Cached { output } => {
            let (_metadata, storage) = open_storage(&config).await?;
            let view = storage
                .manager
                .path_cache_introspection()
                .context("storage manager has no path cache")?;
            let entries = cache_entries(view);

            if output.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_entries(&entries);
            }
        }
    }

    Ok(())
}

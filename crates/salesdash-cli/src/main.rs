mod args;
mod summary;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use salesdash_core::{
    write_csv, AppConfig, Column, Dataset, DatasetTag, Environment, SalesRecord,
};
use salesdash_loader::{DatasetCache, NoticeLevel, ResilientLoader, SalesApiClient};
use tracing_subscriber::EnvFilter;

use crate::args::{parse_column_arg, FilterArgs, SourceArgs};

#[derive(Debug, Parser)]
#[command(name = "salesdash")]
#[command(about = "Sales dashboard data loader and reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the sales data and report where it came from
    Load {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print revenue and sales breakdowns
    Summary {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterArgs,
        /// Number of sellers in the top-sellers tables
        #[arg(long, default_value = "5", value_parser = clap::value_parser!(u8).range(2..=10))]
        top_sellers: u8,
    },
    /// Write the filtered records as CSV
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterArgs,
        /// Output file; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Columns to include, by header (repeatable); all when omitted
        #[arg(long = "column", value_parser = parse_column_arg)]
        columns: Vec<Column>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = salesdash_core::load_app_config()?;
    init_tracing(&config)?;

    let loader = ResilientLoader::new(SalesApiClient::from_config(&config)?);
    let cache = DatasetCache::new();

    match cli.command {
        Commands::Load { source } => {
            let dataset = load(&loader, &cache, &source, &config.fallback_path).await?;
            println!("{} records ({})", dataset.len(), dataset.tag());
        }
        Commands::Summary {
            source,
            filters,
            top_sellers,
        } => {
            let dataset = load(&loader, &cache, &source, &config.fallback_path).await?;
            let filter = filters.to_filter();
            let records = filter.apply(dataset.records());
            tracing::debug!(kept = records.len(), total = dataset.len(), "applied filters");
            print!("{}", summary::render_summary(&records, usize::from(top_sellers)));
        }
        Commands::Export {
            source,
            filters,
            output,
            columns,
        } => {
            let dataset = load(&loader, &cache, &source, &config.fallback_path).await?;
            let filter = filters.to_filter();
            export(&filter.apply(dataset.records()), &columns, output.as_deref())?;
        }
    }

    Ok(())
}

/// How log lines are rendered for a deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LogFormat {
    ansi: bool,
    target: bool,
}

impl LogFormat {
    fn for_env(env: &Environment) -> Self {
        match env {
            Environment::Development => Self {
                ansi: true,
                target: true,
            },
            Environment::Test | Environment::Production => Self {
                ansi: false,
                target: false,
            },
        }
    }
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    let format = LogFormat::for_env(&config.env);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(format.ansi)
        .with_target(format.target)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, "logging initialised");
    Ok(())
}

/// Load through the cache, print every notice, and fail when nothing could
/// be loaded so the user can re-run the command.
async fn load(
    loader: &ResilientLoader,
    cache: &DatasetCache,
    source: &SourceArgs,
    default_fallback: &Path,
) -> anyhow::Result<Arc<Dataset>> {
    let query = source.query();
    let fallback = source
        .fallback
        .clone()
        .unwrap_or_else(|| default_fallback.to_path_buf());

    let loaded = cache
        .get_or_load(query, || loader.load_with_fallback(&query, &fallback))
        .await;

    for notice in &loaded.notices {
        match notice.level {
            NoticeLevel::Info => eprintln!("{}", notice.message),
            NoticeLevel::Warning | NoticeLevel::Error => {
                eprintln!("{}: {}", notice.level, notice.message);
            }
        }
    }

    if loaded.dataset.tag() == DatasetTag::Unavailable {
        anyhow::bail!(
            "no sales data for {}; run the command again to retry",
            query.region
        );
    }
    Ok(loaded.dataset)
}

fn export(
    records: &[&SalesRecord],
    columns: &[Column],
    output: Option<&Path>,
) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            write_csv(records.iter().copied(), columns, file)?;
            eprintln!("wrote {} records to {}", records.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_csv(records.iter().copied(), columns, &mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}

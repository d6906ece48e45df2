//! Sift command line.
//!
//! Compiles a JSON criteria document against a relational schema or a
//! directory mapping and prints the compiled query as JSON.
//!
//! Usage:
//!   sift relational --schema schema.toml --entity Company --criteria criteria.json
//!   sift directory --mapping groups.toml --criteria criteria.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sift_criteria::{
    Accumulator, CompilerConfig, CriteriaDocument, DirectoryCriteria, DirectoryMapping,
    FetchStrategy, RelationalCriteria, Schema,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile to an entity query with named parameters.
    Relational {
        /// Schema TOML describing entity relations.
        #[arg(long)]
        schema: PathBuf,

        /// Entity to query.
        #[arg(long)]
        entity: String,

        /// Criteria document (JSON). Omit to compile the bare query.
        #[arg(long)]
        criteria: Option<PathBuf>,

        /// Override SIFT_FETCH_STRATEGY.
        #[arg(long)]
        fetch_strategy: Option<FetchStrategy>,
    },
    /// Compile to a directory search filter.
    Directory {
        /// Directory mapping TOML.
        #[arg(long)]
        mapping: PathBuf,

        /// Criteria document (JSON).
        #[arg(long)]
        criteria: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let output = match args.command {
        Command::Relational {
            schema,
            entity,
            criteria,
            fetch_strategy,
        } => {
            let mut config = CompilerConfig::from_env().context("failed to load configuration")?;
            if let Some(strategy) = fetch_strategy {
                config = config.with_fetch_strategy(strategy);
            }
            let schema = Schema::load(&schema)?;
            info!(entities = schema.len(), strategy = %config.fetch_strategy, "schema loaded");

            let mut accumulator = RelationalCriteria::with_config(&entity, &schema, &config)?;
            if let Some(path) = criteria {
                CriteriaDocument::load(&path)?.apply_relational(&mut accumulator)?;
            }
            serde_json::to_string_pretty(&accumulator.compile()?)?
        }
        Command::Directory { mapping, criteria } => {
            let mapping = DirectoryMapping::load(&mapping)?;
            let mut accumulator = DirectoryCriteria::new(&mapping)?;
            if let Some(path) = criteria {
                CriteriaDocument::load(&path)?.apply_directory(&mut accumulator)?;
            }
            serde_json::to_string_pretty(&accumulator.compile()?)?
        }
    };

    println!("{output}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

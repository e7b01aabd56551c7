//! Family Inspector Binary
//!
//! Loads a saved family (or the sample family when the file does not exist
//! yet), runs one derivation and prints the report as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin family-inspect -- family.json
//! cargo run --bin family-inspect -- family.json --select 3 --target 6 --query "children of father"
//! FAMILYTREE_UPCOMING_LIMIT=5 cargo run --bin family-inspect -- family.json --descendants --timeline desc
//! ```
//!
//! # Environment Variables
//!
//! - `FAMILYTREE_DATA`: data file when no path argument is given
//!   (default: `family.json`)
//! - `FAMILYTREE_*`: engine settings, see `familytree_core::config`
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use familytree_core::db::JsonFileStore;
use familytree_core::services::{SortOrder, ViewFilter, ViewSelection};
use familytree_core::{EngineConfig, FamilyTreeService, PersonId};

#[derive(Debug, Default)]
struct Args {
    path: Option<PathBuf>,
    selection: ViewSelection,
    query: Option<String>,
    timeline: Option<SortOrder>,
}

fn parse_id(flag: &str, value: Option<String>) -> anyhow::Result<PersonId> {
    let value = value.with_context(|| format!("{} needs a person id", flag))?;
    let id = value
        .parse::<i64>()
        .with_context(|| format!("{} expects a numeric id, got {:?}", flag, value))?;
    Ok(PersonId(id))
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut args = Args::default();
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--select" => args.selection.selected = Some(parse_id("--select", raw.next())?),
            "--target" => args.selection.target = Some(parse_id("--target", raw.next())?),
            "--descendants" => args.selection.filter = ViewFilter::Descendants,
            "--query" => args.query = Some(raw.next().context("--query needs text")?),
            "--timeline" => {
                args.timeline = Some(match raw.next().as_deref() {
                    Some("asc") | None => SortOrder::Asc,
                    Some("desc") => SortOrder::Desc,
                    Some(other) => bail!("--timeline expects asc or desc, got {:?}", other),
                })
            }
            flag if flag.starts_with("--") => bail!("Unknown flag {}", flag),
            _ if args.path.is_none() => args.path = Some(PathBuf::from(arg)),
            _ => bail!("Unexpected argument {:?}", arg),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(env::args().skip(1))?;
    let path = args
        .path
        .or_else(|| env::var("FAMILYTREE_DATA").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("family.json"));

    tracing::info!("Data file: {}", path.display());

    let config = EngineConfig::from_env();
    let service = FamilyTreeService::open(Arc::new(JsonFileStore::new(path)), config).await?;

    let today = chrono::Local::now().date_naive();
    let mut request = service.request(today).with_selection(args.selection);
    if let Some(query) = args.query {
        request = request.with_query(query);
    }
    if let Some(order) = args.timeline {
        request = request.with_timeline(order);
    }

    let report = service.derive(&request);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

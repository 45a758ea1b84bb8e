//! Command line argument parsing for the postlist CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::{PostListError, Result};
use crate::postlist::{DocCount, DocId, Weight};

/// postlist - evaluate AND postlists over ad-hoc posting lists
#[derive(Parser, Debug, Clone)]
#[command(name = "postlist")]
#[command(about = "Evaluate AND postlists over ad-hoc posting lists")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PostListArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug, 4=trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PostListArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Intersect two posting lists and rank the matches
    Intersect(IntersectArgs),

    /// Show term frequency statistics for the intersection of two lists
    Stats(StatsArgs),
}

/// Two posting lists given on the command line.
#[derive(Args, Debug, Clone)]
pub struct PostingListsArgs {
    /// Left posting list: comma-separated doc ids, each optionally `id:weight`
    pub left: String,

    /// Right posting list: comma-separated doc ids, each optionally `id:weight`
    pub right: String,

    /// Number of documents in the collection (defaults to the largest doc id)
    #[arg(short = 'n', long)]
    pub collection_size: Option<DocCount>,
}

/// Arguments for the intersect command
#[derive(Args, Debug, Clone)]
pub struct IntersectArgs {
    #[command(flatten)]
    pub lists: PostingListsArgs,

    /// Maximum number of hits
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Minimum weight of a hit
    #[arg(long, default_value = "0.0")]
    pub min_weight: Weight,

    /// Ignore weights and list matches in docid order
    #[arg(long)]
    pub boolean: bool,

    /// Match configuration as JSON (overrides the flags above)
    #[arg(long, env = "POSTLIST_MATCH_CONFIG", conflicts_with = "config_file")]
    pub config: Option<String>,

    /// File holding the match configuration as JSON (overrides the flags above)
    #[arg(short, long)]
    pub config_file: Option<PathBuf>,
}

/// Arguments for the stats command
#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub lists: PostingListsArgs,

    /// Comma-separated ids of documents known to be relevant
    #[arg(long, default_value = "")]
    pub relevant: String,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Parse `1,4:2.5,9` into `(doc id, weight)` pairs. Ids without a weight get
/// weight 1.
pub fn parse_posting_list(list: &str) -> Result<Vec<(DocId, Weight)>> {
    let mut entries = Vec::new();
    for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (id, weight) = match item.split_once(':') {
            Some((id, weight)) => (id, Some(weight)),
            None => (item, None),
        };
        let doc_id = id
            .trim()
            .parse::<DocId>()
            .map_err(|e| PostListError::invalid_argument(format!("bad doc id {id:?}: {e}")))?;
        let weight = match weight {
            Some(w) => w.trim().parse::<Weight>().map_err(|e| {
                PostListError::invalid_argument(format!("bad weight {w:?}: {e}"))
            })?,
            None => 1.0,
        };
        entries.push((doc_id, weight));
    }
    Ok(entries)
}

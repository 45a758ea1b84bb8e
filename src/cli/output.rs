//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, PostListArgs};
use crate::error::Result;
use crate::matcher::Hit;
use crate::postlist::{DocCount, TermFreqs, Weight};

/// Result of the intersect command.
#[derive(Debug, Serialize, Deserialize)]
pub struct IntersectionReport {
    pub description: String,
    pub max_weight: Weight,
    pub hits: Vec<Hit>,
    pub examined: u64,
    pub recalculations: u64,
}

/// Result of the stats command.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsReport {
    pub description: String,
    pub collection_size: DocCount,
    pub term_freq_lower_bound: DocCount,
    pub term_freq_estimate: DocCount,
    pub term_freq_upper_bound: DocCount,
    pub estimate_using_stats: TermFreqs,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(result: &T, args: &PostListArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            result.print_human(args);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &PostListArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Human-readable rendering of a report.
pub trait HumanOutput {
    fn print_human(&self, args: &PostListArgs);
}

impl HumanOutput for IntersectionReport {
    fn print_human(&self, args: &PostListArgs) {
        if args.verbosity() > 0 {
            println!("Query: {}", self.description);
            println!("Max weight: {:.3}", self.max_weight);
            println!();
        }
        println!("Hits:");
        println!("═════");
        for (i, hit) in self.hits.iter().enumerate() {
            println!("{:>4}. doc {} (weight: {:.3})", i + 1, hit.doc_id, hit.weight);
        }
        println!();
        println!("Examined: {}", self.examined);
        if args.verbosity() > 1 {
            println!("Max weight recalculations: {}", self.recalculations);
        }
    }
}

impl HumanOutput for StatsReport {
    fn print_human(&self, _args: &PostListArgs) {
        println!("Query: {}", self.description);
        println!("Collection size: {}", self.collection_size);
        println!(
            "Term frequency: {} <= {} <= {}",
            self.term_freq_lower_bound, self.term_freq_estimate, self.term_freq_upper_bound
        );
        println!(
            "Using stats: {} (relevance set: {})",
            self.estimate_using_stats.term_freq, self.estimate_using_stats.rel_term_freq
        );
    }
}

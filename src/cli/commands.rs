//! Command implementations for the postlist CLI.

use std::collections::HashSet;

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{PostListError, Result};
use crate::matcher::{MatchConfig, Matcher};
use crate::postlist::{
    AndPostList, BoxedPostList, DocCount, DocId, PostList, PruneObserver, VecPostList, Weight,
    WeightStats,
};

/// Execute a CLI command.
pub fn execute_command(args: PostListArgs) -> Result<()> {
    match &args.command {
        Command::Intersect(intersect_args) => intersect(intersect_args, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &args),
    }
}

/// Parsed command line posting lists, ready to become postlists.
struct ParsedLists {
    left: Vec<(DocId, Weight)>,
    right: Vec<(DocId, Weight)>,
    collection_size: DocCount,
}

impl ParsedLists {
    fn parse(args: &PostingListsArgs) -> Result<Self> {
        let left = parse_posting_list(&args.left)?;
        let right = parse_posting_list(&args.right)?;
        let largest = left
            .iter()
            .chain(right.iter())
            .map(|&(did, _)| did)
            .max()
            .unwrap_or(0);
        let collection_size = args.collection_size.unwrap_or(largest);
        if collection_size < largest {
            return Err(PostListError::invalid_argument(format!(
                "collection size {collection_size} is smaller than doc id {largest}"
            )));
        }
        Ok(ParsedLists {
            left,
            right,
            collection_size,
        })
    }

    fn leaf(term: &str, entries: &[(DocId, Weight)], relevant: &HashSet<DocId>) -> Result<VecPostList> {
        let rel_term_freq = entries
            .iter()
            .filter(|(did, _)| relevant.contains(did))
            .count() as DocCount;
        Ok(VecPostList::from_weighted(term, entries)?.with_rel_term_freq(rel_term_freq))
    }

    fn build(
        &self,
        observer: Option<std::sync::Arc<dyn PruneObserver>>,
        relevant: &HashSet<DocId>,
    ) -> Result<AndPostList> {
        let left: BoxedPostList = Box::new(Self::leaf("left", &self.left, relevant)?);
        let right: BoxedPostList = Box::new(Self::leaf("right", &self.right, relevant)?);
        Ok(AndPostList::new(
            left,
            right,
            observer,
            self.collection_size,
            false,
        ))
    }
}

/// Intersect two lists and print the ranked matches.
fn intersect(args: &IntersectArgs, cli_args: &PostListArgs) -> Result<()> {
    let lists = ParsedLists::parse(&args.lists)?;
    let config = match (&args.config, &args.config_file) {
        (Some(json), _) => MatchConfig::from_json(json)?,
        (None, Some(path)) => MatchConfig::from_file(path)?,
        (None, None) => MatchConfig::new(args.limit)
            .with_min_weight(args.min_weight)
            .with_boolean(args.boolean),
    };

    let matcher = Matcher::new(config);
    let mut root: BoxedPostList = Box::new(lists.build(Some(matcher.observer()), &HashSet::new())?);
    let description = root.describe();
    info!("running {description} over {} documents", lists.collection_size);

    let results = matcher.run(&mut root)?;
    let report = IntersectionReport {
        description,
        max_weight: root.max_weight(),
        hits: results.hits,
        examined: results.examined,
        recalculations: results.recalculations,
    };
    output_result(&report, cli_args)
}

/// Print the term frequency statistics of the intersection.
fn show_stats(args: &StatsArgs, cli_args: &PostListArgs) -> Result<()> {
    let lists = ParsedLists::parse(&args.lists)?;
    if lists.collection_size == 0 {
        return Err(PostListError::invalid_argument(
            "statistics need a non-empty collection",
        ));
    }
    let relevant: HashSet<DocId> = parse_posting_list(&args.relevant)?
        .into_iter()
        .map(|(did, _)| did)
        .collect();
    let and = lists.build(None, &relevant)?;
    let stats = WeightStats::new(lists.collection_size, relevant.len() as DocCount);

    let report = StatsReport {
        description: and.describe(),
        collection_size: lists.collection_size,
        term_freq_lower_bound: and.term_freq_lower_bound(),
        term_freq_estimate: and.term_freq_estimate(),
        term_freq_upper_bound: and.term_freq_upper_bound(),
        estimate_using_stats: and.term_freq_estimate_using_stats(&stats),
    };
    output_result(&report, cli_args)
}

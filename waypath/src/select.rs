use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cache::SubpathCache;
use crate::coster::{cost_sequence, LowestCostPath};
use crate::error::Result;
use crate::graph::WaypointGraph;
use crate::grid::CostSurface;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteOutcome {
    NoPathFound,
    PathFound(LowestCostPath),
}

impl RouteOutcome {
    pub fn path(&self) -> Option<&LowestCostPath> {
        match self {
            RouteOutcome::NoPathFound => None,
            RouteOutcome::PathFound(path) => Some(path),
        }
    }
}

/// Costs every candidate sequence in parallel with a fresh cache and returns the cheapest.
pub fn select_path(
    sequences: &[Vec<usize>],
    graph: &WaypointGraph,
    surface: &CostSurface,
) -> Result<RouteOutcome> {
    let cache = SubpathCache::new();
    let outcome = select_path_with_cache(sequences, graph, surface, &cache)?;

    let stats = cache.stats();
    info!(
        "costed {} sequences, {} sub-paths solved, {} reused",
        sequences.len(),
        stats.misses,
        stats.hits
    );

    Ok(outcome)
}

/// Like [`select_path`], but with a caller provided cache.
///
/// All sequences are costed before any comparison is made. Ties go to the sequence that comes
/// first in `sequences`, and any failure aborts the whole selection.
pub fn select_path_with_cache(
    sequences: &[Vec<usize>],
    graph: &WaypointGraph,
    surface: &CostSurface,
    cache: &SubpathCache,
) -> Result<RouteOutcome> {
    let costed = sequences
        .par_iter()
        .map(|sequence| cost_sequence(sequence, graph, surface, cache))
        .collect::<Result<Vec<_>>>()?;

    let mut best: Option<LowestCostPath> = None;
    for candidate in costed {
        match &best {
            Some(current) if candidate.cost >= current.cost => {}
            _ => {
                debug!(
                    "new best sequence {:?} with cost {}",
                    candidate.nodes, candidate.cost
                );
                best = Some(candidate);
            }
        }
    }

    Ok(match best {
        Some(path) => RouteOutcome::PathFound(path),
        None => RouteOutcome::NoPathFound,
    })
}

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cache::SubpathCache;
use crate::error::{PathError, Result};
use crate::graph::WaypointGraph;
use crate::grid::{CostSurface, Point};
use crate::solver::solve_subpath;

/// A fully costed node sequence: the nodes visited, every grid cell walked through and the
/// total cost of the walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowestCostPath {
    pub nodes: Vec<usize>,
    pub route: Vec<Point>,
    pub cost: f64,
}

/// Costs one candidate sequence. The legs between consecutive nodes are solved in parallel,
/// going through `cache` so legs shared with other sequences are only solved once.
pub fn cost_sequence(
    sequence: &[usize],
    graph: &WaypointGraph,
    surface: &CostSurface,
    cache: &SubpathCache,
) -> Result<LowestCostPath> {
    let first = sequence.first().ok_or(PathError::EmptySequence)?;
    let start = graph.node(*first)?.pos;

    let legs = sequence
        .par_windows(2)
        .map(|pair| {
            let from = graph.node(pair[0])?.pos;
            let to = graph.node(pair[1])?.pos;
            cache.get_or_compute((from, to), || solve_subpath(surface, from, to))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut route = vec![start];
    let mut cost = 0.0;
    for leg in &legs {
        cost += leg.cost;
        // the first cell of a leg is the last cell of the previous one
        route.extend_from_slice(&leg.route[1..]);
    }

    debug!("sequence {:?} costs {}", sequence, cost);

    Ok(LowestCostPath {
        nodes: sequence.to_vec(),
        route,
        cost,
    })
}

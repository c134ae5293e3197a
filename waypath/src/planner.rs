use log::{info, log_enabled, trace, Level};
use serde::{Deserialize, Serialize};

use crate::enumerate::{enumerate_sequences, SequenceBounds};
use crate::error::{PathError, Result};
use crate::graph::WaypointGraph;
use crate::grid::{CostSurface, Point};
use crate::select::{select_path, RouteOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)] // missing fields fall back to the defaults below
pub struct PlannerConfig {
    /// Fewest nodes (source and destination included) a candidate sequence may have
    pub min_nodes: usize,
    /// Most nodes a candidate sequence may have
    pub max_nodes: usize,
    /// How many nearest neighbors each node is linked to
    pub neighbors: usize,
    /// Worker threads for costing, `None` uses the global rayon pool
    pub threads: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_nodes: 3,
            max_nodes: 5,
            neighbors: 3,
            threads: None,
        }
    }
}

impl PlannerConfig {
    /// A sequence holds at least its source, so `min_nodes` must be at least 1
    pub fn validate(&self) -> Result<()> {
        if self.min_nodes == 0 {
            return Err(PathError::InvalidBounds {
                min: self.min_nodes,
                max: self.max_nodes,
            });
        }
        self.bounds().map(|_| ())
    }

    pub fn bounds(&self) -> Result<SequenceBounds> {
        SequenceBounds::new(self.min_nodes, self.max_nodes)
    }
}

/// Owns the inputs of a routing problem and answers source/destination queries on them.
#[derive(Debug)]
pub struct Planner {
    surface: CostSurface,
    graph: WaypointGraph,
    config: PlannerConfig,
}

impl Planner {
    /// Links the given waypoints to their nearest neighbors and places them on the surface
    pub fn new(surface: CostSurface, positions: Vec<Point>, config: PlannerConfig) -> Result<Self> {
        let graph = WaypointGraph::nearest_neighbors(positions, config.neighbors)?;
        Self::with_graph(surface, graph, config)
    }

    pub fn with_graph(
        surface: CostSurface,
        graph: WaypointGraph,
        config: PlannerConfig,
    ) -> Result<Self> {
        config.validate()?;
        graph.overlay(&surface)?;

        Ok(Self {
            surface,
            graph,
            config,
        })
    }

    pub fn surface(&self) -> &CostSurface {
        &self.surface
    }

    pub fn graph(&self) -> &WaypointGraph {
        &self.graph
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Every node sequence from `source` to `dest` that fits the configured length window
    pub fn candidates(&self, source: usize, dest: usize) -> Result<Vec<Vec<usize>>> {
        enumerate_sequences(&self.graph, source, dest, self.config.bounds()?)
    }

    pub fn route(&self, source: usize, dest: usize) -> Result<RouteOutcome> {
        if log_enabled!(Level::Trace) {
            trace!("nodes:\n{}", self.graph.display_nodes());
            trace!("adjacency:\n{}", self.graph);

            // same depth limit as the candidate search
            let all = enumerate_sequences(
                &self.graph,
                source,
                dest,
                SequenceBounds::at_most(self.config.max_nodes),
            )?;
            trace!(
                "{} simple paths of at most {} nodes: {:?}",
                all.len(),
                self.config.max_nodes,
                all
            );
        }

        let sequences = self.candidates(source, dest)?;
        info!(
            "{} candidate sequences from node {} to node {}",
            sequences.len(),
            source,
            dest
        );

        let outcome = match self.config.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(|| select_path(&sequences, &self.graph, &self.surface))?,
            None => select_path(&sequences, &self.graph, &self.surface)?,
        };

        match &outcome {
            RouteOutcome::PathFound(path) => {
                info!("best sequence {:?} costs {}", path.nodes, path.cost)
            }
            RouteOutcome::NoPathFound => info!("no path found"),
        }

        Ok(outcome)
    }
}

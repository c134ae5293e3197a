use log::{debug, warn};

use crate::error::{PathError, Result};
use crate::graph::WaypointGraph;

/// Inclusive limits on the number of nodes in a candidate sequence
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SequenceBounds {
    min_nodes: usize,
    max_nodes: usize,
}

impl SequenceBounds {
    pub fn new(min_nodes: usize, max_nodes: usize) -> Result<Self> {
        if min_nodes > max_nodes {
            return Err(PathError::InvalidBounds {
                min: min_nodes,
                max: max_nodes,
            });
        }
        Ok(Self {
            min_nodes,
            max_nodes,
        })
    }

    /// Bounds with no lower limit, admitting every simple path of at most `max_nodes` nodes
    pub fn at_most(max_nodes: usize) -> Self {
        Self {
            min_nodes: 0,
            max_nodes,
        }
    }

    pub fn min_nodes(&self) -> usize {
        self.min_nodes
    }

    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    pub fn contains(&self, len: usize) -> bool {
        (self.min_nodes..=self.max_nodes).contains(&len)
    }
}

/// Lists every simple path from `source` to `dest` whose node count lies within `bounds`.
///
/// Paths are produced depth first, visiting neighbors in ascending index order.
pub fn enumerate_sequences(
    graph: &WaypointGraph,
    source: usize,
    dest: usize,
    bounds: SequenceBounds,
) -> Result<Vec<Vec<usize>>> {
    graph.node(source)?;
    graph.node(dest)?;

    if graph.edge_count() == 0 {
        warn!("graph has no edges, only a trivial sequence can be found");
    }

    let mut search = Backtracker {
        graph,
        dest,
        bounds,
        path: Vec::with_capacity(bounds.max_nodes),
        on_path: vec![false; graph.len()],
        found: Vec::new(),
    };
    search.visit(source);

    debug!(
        "found {} sequences from {} to {} with {}..={} nodes",
        search.found.len(),
        source,
        dest,
        bounds.min_nodes,
        bounds.max_nodes
    );

    Ok(search.found)
}

struct Backtracker<'a> {
    graph: &'a WaypointGraph,
    dest: usize,
    bounds: SequenceBounds,
    path: Vec<usize>,
    on_path: Vec<bool>,
    found: Vec<Vec<usize>>,
}

impl Backtracker<'_> {
    fn visit(&mut self, current: usize) {
        self.path.push(current);
        self.on_path[current] = true;

        if current == self.dest {
            if self.bounds.contains(self.path.len()) {
                self.found.push(self.path.clone());
            }
        } else if self.path.len() < self.bounds.max_nodes {
            // a path already at max_nodes can only grow past the limit from here
            let graph = self.graph;
            for neighbor in graph.neighbors(current) {
                if !self.on_path[neighbor] {
                    self.visit(neighbor);
                }
            }
        }

        self.on_path[current] = false;
        self.path.pop();
    }
}

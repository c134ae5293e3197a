use std::collections::BTreeSet;
use std::fmt::Display;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PathError, Result};
use crate::grid::{CostSurface, Point};

/// A waypoint on the cost surface. `idx` always equals the node's position in the graph's node
/// list, so sequences can refer to nodes by index alone.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub idx: usize,
    pub pos: Point,
}

/// Waypoints plus an undirected, loop-free adjacency relation. Immutable once built.
#[derive(Debug, Clone)]
pub struct WaypointGraph {
    nodes: Vec<Node>,
    // ordered sets so neighbor iteration (and therefore enumeration order) is deterministic
    adjacency: Vec<BTreeSet<usize>>,
}

impl WaypointGraph {
    /// Connects every node to its `k` closest nodes by Manhattan distance. Edges are added in
    /// both directions, so a node can end up with more than `k` neighbors. Equal distances are
    /// resolved in favour of the lower index.
    pub fn nearest_neighbors(positions: Vec<Point>, k: usize) -> Result<Self> {
        let mut graph = Self::without_edges(positions)?;

        for node in &graph.nodes {
            let mut candidates: Vec<(usize, usize)> = graph
                .nodes
                .iter()
                .filter(|other| other.idx != node.idx)
                .map(|other| (node.pos.manhattan(&other.pos), other.idx))
                .collect();
            candidates.sort_unstable();

            for &(_, neighbor) in candidates.iter().take(k) {
                graph.adjacency[node.idx].insert(neighbor);
                graph.adjacency[neighbor].insert(node.idx);
            }
        }

        debug!(
            "built {}-nearest-neighbor graph with {} nodes and {} edges",
            k,
            graph.len(),
            graph.edge_count()
        );

        Ok(graph)
    }

    /// Builds a graph from an explicit list of undirected edges
    pub fn with_edges(positions: Vec<Point>, edges: &[(usize, usize)]) -> Result<Self> {
        let mut graph = Self::without_edges(positions)?;

        for &(a, b) in edges {
            if a == b || a >= graph.len() || b >= graph.len() {
                return Err(PathError::InvalidEdge(a, b));
            }
            graph.adjacency[a].insert(b);
            graph.adjacency[b].insert(a);
        }

        Ok(graph)
    }

    fn without_edges(positions: Vec<Point>) -> Result<Self> {
        if positions.len() < 2 {
            return Err(PathError::TooFewNodes(positions.len()));
        }

        let nodes: Vec<Node> = positions
            .into_iter()
            .enumerate()
            .map(|(idx, pos)| Node { idx, pos })
            .collect();
        let adjacency = vec![BTreeSet::new(); nodes.len()];

        Ok(Self { nodes, adjacency })
    }

    /// Checks that every node lies on the given surface
    pub fn overlay(&self, surface: &CostSurface) -> Result<()> {
        match self.nodes.iter().find(|n| !surface.is_valid(n.pos)) {
            Some(node) => Err(PathError::NodeOutOfBounds {
                idx: node.idx,
                pos: node.pos,
                rows: surface.rows(),
                columns: surface.columns(),
            }),
            None => Ok(()),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: usize) -> Result<&Node> {
        self.nodes.get(idx).ok_or(PathError::InvalidNode {
            idx,
            len: self.nodes.len(),
        })
    }

    /// Neighbors of `idx` in ascending index order
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency
            .get(idx)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(a).is_some_and(|set| set.contains(&b))
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Renders the node list, one `idx row col` line per node
    pub fn display_nodes(&self) -> impl Display + '_ {
        NodeList(self)
    }
}

struct NodeList<'a>(&'a WaypointGraph);

impl Display for NodeList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for node in &self.0.nodes {
            writeln!(f, "{} {} {}", node.idx, node.pos.row, node.pos.col)?;
        }
        Ok(())
    }
}

/// Renders the adjacency list, one `idx neighbor...` line per node
impl Display for WaypointGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, neighbors) in self.adjacency.iter().enumerate() {
            write!(f, "{}", idx)?;
            for neighbor in neighbors {
                write!(f, " {}", neighbor)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

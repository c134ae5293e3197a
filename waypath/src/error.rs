use crate::grid::Point;

/// Everything that can stop a routing run. A run that simply finds no candidate sequence is
/// not an error, see [`crate::select::RouteOutcome::NoPathFound`].
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("cost surface must have at least one row and one column")]
    EmptySurface,

    #[error("cost surface row {row} has {found} columns, expected {expected}")]
    RaggedSurface {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid cost {cost} at ({row}, {col}), costs must be finite and non-negative")]
    InvalidCost { row: usize, col: usize, cost: f64 },

    #[error("the graph must contain at least 2 nodes, got {0}")]
    TooFewNodes(usize),

    #[error("node {idx} at {pos} is outside the {rows}x{columns} cost surface")]
    NodeOutOfBounds {
        idx: usize,
        pos: Point,
        rows: usize,
        columns: usize,
    },

    #[error("invalid node index {idx}, the graph has {len} nodes")]
    InvalidNode { idx: usize, len: usize },

    #[error("invalid edge {0} - {1}")]
    InvalidEdge(usize, usize),

    #[error("invalid sequence bounds: min_nodes={min} max_nodes={max}")]
    InvalidBounds { min: usize, max: usize },

    #[error("cannot cost an empty node sequence")]
    EmptySequence,

    #[error("position {0} is outside the cost surface")]
    OutOfBounds(Point),

    #[error("no route from {start} to {end} inside the search window")]
    Unreachable { start: Point, end: Point },

    #[error("sub-path cache lock poisoned")]
    CachePoisoned,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, PathError>;

//! Minimum-cost routing between waypoints placed on a weighted grid.
//!
//! Waypoints are linked to their nearest neighbors, every bounded-length node sequence between
//! a source and a destination is costed on the grid in parallel, and the cheapest one wins.
//! Grid legs shared between sequences are solved once through a [`SubpathCache`].

pub mod cache;
pub mod coster;
pub mod enumerate;
pub mod error;
pub mod find;
pub mod graph;
pub mod grid;
pub mod planner;
pub mod report;
pub mod select;
pub mod solver;
pub mod util;

pub use cache::{CacheStats, SubpathCache, SubpathKey};
pub use coster::{cost_sequence, LowestCostPath};
pub use enumerate::{enumerate_sequences, SequenceBounds};
pub use error::{PathError, Result};
pub use find::{MapStorage, MapTrait, NodeReference, PathFinder, PathFinderState, PathResult};
pub use graph::{Node, WaypointGraph};
pub use grid::{CostSurface, Point, SubGrid, Window};
pub use planner::{Planner, PlannerConfig};
pub use select::{select_path, select_path_with_cache, RouteOutcome};
pub use solver::{solve_subpath, SubpathResult};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{PathError, Result};
use crate::find::{MapTrait, PathFinder, PathFinderState, PathResult};
use crate::grid::{CostSurface, Point, Window};

/// The cheapest route between two cells and what it costs to walk it. The start cell is the
/// first entry of `route` and is not part of `cost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubpathResult {
    pub cost: f64,
    pub route: Vec<Point>,
}

/// Finds the cheapest 8-connected route from `start` to `end`, searching only the rectangle
/// spanned by the two cells plus a one cell margin.
pub fn solve_subpath(surface: &CostSurface, start: Point, end: Point) -> Result<SubpathResult> {
    for point in [start, end] {
        if !surface.is_valid(point) {
            return Err(PathError::OutOfBounds(point));
        }
    }

    let grid = surface.view(Window::around(surface, start, end));
    let mut finder = PathFinder::new(start, end, grid.create_storage(), ());
    while !finder.step(&grid).is_done() {}

    trace!(
        "sub-path {} -> {} settled {} cells in {:?}",
        start,
        end,
        finder.expanded(),
        grid.window()
    );

    match finder.state() {
        PathFinderState::PathFound(PathResult {
            path, total_cost, ..
        }) => Ok(SubpathResult {
            cost: *total_cost,
            route: path.clone(),
        }),
        _ => Err(PathError::Unreachable { start, end }),
    }
}

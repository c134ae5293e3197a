use std::fmt::Display;

use crate::coster::LowestCostPath;
use crate::select::RouteOutcome;

/// Plain text report of the winning path
impl Display for LowestCostPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Lowest cost path found:")?;

        write!(f, "\t{} nodes:", self.nodes.len())?;
        for node in &self.nodes {
            write!(f, " {}", node)?;
        }
        writeln!(f)?;

        writeln!(f, "\t{} grid points {{row, col}}:", self.route.len())?;
        write!(f, "\t\t")?;
        for (i, point) in self.route.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{{{}, {}}}", point.row, point.col)?;
        }
        writeln!(f)?;

        writeln!(f, "\tTotal cost: {}", self.cost)
    }
}

impl Display for RouteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteOutcome::PathFound(path) => write!(f, "{}", path),
            RouteOutcome::NoPathFound => writeln!(f, "No path found."),
        }
    }
}

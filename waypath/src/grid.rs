use crate::error::{PathError, Result};
use crate::find::{MapStorage, MapTrait, NodeReference};
use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(&self, other: &Point) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True if `other` is one of the 8 cells surrounding this one
    pub fn touches(&self, other: &Point) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }
}

impl NodeReference for Point {}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A rectangular matrix of non-negative cell entry costs. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct CostSurface {
    rows: usize,
    columns: usize,
    cells: Vec<Vec<f64>>,
}

impl CostSurface {
    pub fn new(cells: Vec<Vec<f64>>) -> Result<Self> {
        let rows = cells.len();
        let columns = cells.first().map_or(0, Vec::len);
        if rows == 0 || columns == 0 {
            return Err(PathError::EmptySurface);
        }

        for (row, line) in cells.iter().enumerate() {
            if line.len() != columns {
                return Err(PathError::RaggedSurface {
                    row,
                    expected: columns,
                    found: line.len(),
                });
            }
            if let Some((col, &cost)) = line
                .iter()
                .enumerate()
                .find(|(_, c)| !c.is_finite() || **c < 0.0)
            {
                return Err(PathError::InvalidCost { row, col, cost });
            }
        }

        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    pub fn uniform(rows: usize, columns: usize, cost: f64) -> Result<Self> {
        Self::new(vec![vec![cost; columns]; rows])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_valid(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    /// The cost of entering `point`, or `None` if it lies outside the surface
    pub fn get(&self, point: Point) -> Option<f64> {
        self.cells.get(point.row)?.get(point.col).copied()
    }

    /// Returns a copy scaled by the given factor, i.e. to make it twice as large, pass 2.
    /// Every cell is repeated `factor` times in both directions.
    pub fn scaled(&self, factor: usize) -> Self {
        let mut cells = vec![vec![0.0; self.columns * factor]; self.rows * factor];

        for row in 0..self.rows {
            for col in 0..self.columns {
                for r in 0..factor {
                    for c in 0..factor {
                        cells[row * factor + r][col * factor + c] = self.cells[row][col];
                    }
                }
            }
        }

        Self {
            rows: self.rows * factor,
            columns: self.columns * factor,
            cells,
        }
    }

    /// A view of the surface that only allows movement inside `window`
    pub fn view(&self, window: Window) -> SubGrid<'_> {
        SubGrid {
            surface: self,
            window,
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for CostSurface {
    type Error = PathError;

    fn try_from(cells: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(cells)
    }
}

impl From<CostSurface> for Vec<Vec<f64>> {
    fn from(surface: CostSurface) -> Self {
        surface.cells
    }
}

impl Display for CostSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// An inclusive rectangle of cells
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Window {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl Window {
    /// The rectangle enclosing `a` and `b`, padded by one cell and clamped to the surface
    pub fn around(surface: &CostSurface, a: Point, b: Point) -> Self {
        Self {
            top: a.row.min(b.row).saturating_sub(1),
            left: a.col.min(b.col).saturating_sub(1),
            bottom: (a.row.max(b.row) + 1).min(surface.rows - 1),
            right: (a.col.max(b.col) + 1).min(surface.columns - 1),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.top..=self.bottom).contains(&point.row)
            && (self.left..=self.right).contains(&point.col)
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    fn index_of(&self, point: Point) -> usize {
        (point.row - self.top) * self.width() + (point.col - self.left)
    }
}

/// A MapStorage covering a single window, stored row-major in one vec
#[derive(Debug)]
pub struct WindowStorage<T> {
    window: Window,
    cells: Vec<T>,
}

impl<T: Copy + 'static> MapStorage<T> for WindowStorage<T> {
    type Reference = Point;

    fn get(&self, node: Self::Reference) -> T {
        self.cells[self.window.index_of(node)]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.cells[self.window.index_of(node)]
    }
}

// row/col offsets of the 8 surrounding cells
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A MapTrait implementation over a window of a [`CostSurface`] with 8-directional movement.
/// Moving onto a cell costs that cell's value, diagonal moves included.
#[derive(Debug, Clone, Copy)]
pub struct SubGrid<'a> {
    surface: &'a CostSurface,
    window: Window,
}

impl<'a> SubGrid<'a> {
    pub fn window(&self) -> Window {
        self.window
    }
}

impl<'a> MapTrait for SubGrid<'a> {
    type Reference = Point;
    type Storage<T: Default + Copy + Clone + 'static> = WindowStorage<T>;
    type Cost = f64;

    fn is_valid(&self, node: Self::Reference) -> bool {
        self.window.contains(node) && self.surface.is_valid(node)
    }

    fn neighbors_of(
        &self,
        node: Self::Reference,
    ) -> impl Iterator<Item = (Self::Reference, Self::Cost)> {
        let mut points = Vec::with_capacity(DIRECTIONS.len());

        for (dr, dc) in DIRECTIONS {
            let (Some(row), Some(col)) = (
                node.row.checked_add_signed(dr),
                node.col.checked_add_signed(dc),
            ) else {
                continue;
            };
            let point = Point { row, col };
            if self.is_valid(point) {
                points.push((point, self.surface.cells[row][col]));
            }
        }

        points.into_iter()
    }

    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T> {
        WindowStorage {
            window: self.window,
            cells: vec![Default::default(); self.window.height() * self.window.width()],
        }
    }
}

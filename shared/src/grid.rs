//! Grid geometry for the dots-and-boxes board.
//!
//! The board is a flat array of `N * N` cells for an odd dimension `N`.
//! A cell's role follows from the parity of its row and column:
//!
//! - both even: a vertex (dot), never clickable
//! - exactly one odd: an edge (horizontal if the row is even)
//! - both odd: a box interior, bounded by the four edges at `index ± N`
//!   and `index ± 1`
//!
//! An `N = 2k + 1` grid holds `k * k` boxes. All functions here are pure;
//! ownership of edges lives in the server's board state.

use thiserror::Error;

/// Errors produced by grid construction and cell queries.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("grid length {0} is invalid: must be odd and at least 5")]
    InvalidLength(usize),
    #[error("cell index {index} is outside a {length}x{length} grid")]
    OutOfRange { index: usize, length: usize },
    #[error("cell index {0} is not an edge")]
    NotAnEdge(usize),
    #[error("cell index {0} is not a box interior")]
    NotABoxInterior(usize),
}

/// Role of a single cell in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Vertex,
    HorizontalEdge,
    VerticalEdge,
    BoxInterior,
}

impl Cell {
    /// True for the two edge variants, the only cells a player may mark.
    pub fn is_edge(self) -> bool {
        matches!(self, Cell::HorizontalEdge | Cell::VerticalEdge)
    }
}

/// Dimensions of a dots-and-boxes grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    length: usize,
}

impl Grid {
    /// Creates a grid of the given side length. The length must be odd and
    /// at least 5 (a 3x3 grid has a single box and no real game).
    pub fn new(length: usize) -> Result<Self, GridError> {
        if length < 5 || length % 2 == 0 {
            return Err(GridError::InvalidLength(length));
        }
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Total number of cells, `N * N`.
    pub fn cell_count(&self) -> usize {
        self.length * self.length
    }

    /// Boxes per side, `k = (N - 1) / 2`.
    pub fn boxes_per_side(&self) -> usize {
        (self.length - 1) / 2
    }

    /// Total number of boxes, `k * k`.
    pub fn total_boxes(&self) -> usize {
        let k = self.boxes_per_side();
        k * k
    }

    /// Total number of edge cells, `2k(k + 1)`. A finished game has marked
    /// exactly this many edges.
    pub fn edge_count(&self) -> usize {
        let k = self.boxes_per_side();
        2 * k * (k + 1)
    }

    /// Classifies a cell index by row/column parity.
    pub fn classify(&self, index: usize) -> Result<Cell, GridError> {
        if index >= self.cell_count() {
            return Err(GridError::OutOfRange {
                index,
                length: self.length,
            });
        }
        let row_even = (index / self.length) % 2 == 0;
        let col_even = (index % self.length) % 2 == 0;
        Ok(match (row_even, col_even) {
            (true, true) => Cell::Vertex,
            (true, false) => Cell::HorizontalEdge,
            (false, true) => Cell::VerticalEdge,
            (false, false) => Cell::BoxInterior,
        })
    }

    /// The four edges bounding a box interior. Interiors sit at odd row and
    /// column, so all four neighbors are inside the grid.
    pub fn bounding_edges(&self, box_index: usize) -> Result<[usize; 4], GridError> {
        match self.classify(box_index)? {
            Cell::BoxInterior => Ok([
                box_index - self.length,
                box_index + self.length,
                box_index - 1,
                box_index + 1,
            ]),
            _ => Err(GridError::NotABoxInterior(box_index)),
        }
    }

    /// The box interiors bordering an edge: one if the edge lies on the
    /// outer border of the grid, two otherwise. This is the query that
    /// drives box-completion checks.
    pub fn adjacent_boxes(&self, edge_index: usize) -> Result<Vec<usize>, GridError> {
        let n = self.length;
        let mut boxes = Vec::with_capacity(2);
        match self.classify(edge_index)? {
            Cell::HorizontalEdge => {
                let row = edge_index / n;
                if row != 0 {
                    boxes.push(edge_index - n);
                }
                if row != n - 1 {
                    boxes.push(edge_index + n);
                }
            }
            Cell::VerticalEdge => {
                let col = edge_index % n;
                if col != 0 {
                    boxes.push(edge_index - 1);
                }
                if col != n - 1 {
                    boxes.push(edge_index + 1);
                }
            }
            _ => return Err(GridError::NotAnEdge(edge_index)),
        }
        Ok(boxes)
    }
}

//! Mutable board state: edge ownership and running scores.
//!
//! The board owns the write-once edge marks and the per-color point totals.
//! Legality of a move (whose turn it is) is decided one layer up in the
//! engine; the checks here are defensive invariants.

use shared::{Color, GameOutcome, Grid, GridError};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("edge {0} is already marked")]
    AlreadyMarked(usize),
}

/// Edge ownership plus running scores for one game.
#[derive(Debug, Clone)]
pub struct BoardState {
    grid: Grid,
    cells: Vec<Option<Color>>,
    blue_points: u32,
    red_points: u32,
}

impl BoardState {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            cells: vec![None; grid.cell_count()],
            blue_points: 0,
            red_points: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(|cell| cell.is_some())
    }

    /// Marks an edge with `color` and returns the boxes newly completed by
    /// that mark. A box counts as complete when all four bounding edges are
    /// marked, regardless of who owns them; attribution of the point goes
    /// to the mover. A single edge can complete at most two boxes.
    pub fn apply(&mut self, edge_index: usize, color: Color) -> Result<Vec<usize>, BoardError> {
        if !self.grid.classify(edge_index)?.is_edge() {
            return Err(GridError::NotAnEdge(edge_index).into());
        }
        if self.cells[edge_index].is_some() {
            return Err(BoardError::AlreadyMarked(edge_index));
        }
        self.cells[edge_index] = Some(color);

        let mut completed = Vec::with_capacity(2);
        for box_index in self.grid.adjacent_boxes(edge_index)? {
            let edges = self.grid.bounding_edges(box_index)?;
            if edges.iter().all(|&edge| self.cells[edge].is_some()) {
                completed.push(box_index);
            }
        }
        Ok(completed)
    }

    /// Adds completed boxes to a player's score. Called by the engine in
    /// one step per move, even when a single edge completes two boxes.
    pub fn award(&mut self, color: Color, boxes: u32) {
        match color {
            Color::Blue => self.blue_points += boxes,
            Color::Red => self.red_points += boxes,
        }
    }

    pub fn score_of(&self, color: Color) -> u32 {
        match color {
            Color::Blue => self.blue_points,
            Color::Red => self.red_points,
        }
    }

    pub fn total_boxes(&self) -> u32 {
        self.grid.total_boxes() as u32
    }

    /// True once every box has been claimed.
    pub fn is_full(&self) -> bool {
        self.blue_points + self.red_points == self.total_boxes()
    }

    /// Final result by strict score comparison. Only meaningful once the
    /// board is full.
    pub fn outcome(&self) -> GameOutcome {
        if self.blue_points == self.red_points {
            GameOutcome::Tie
        } else if self.blue_points > self.red_points {
            GameOutcome::Winner(Color::Blue)
        } else {
            GameOutcome::Winner(Color::Red)
        }
    }
}

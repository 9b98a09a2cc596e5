//! Turn and scoring engine: the single authoritative move path.
//!
//! `GameState::attempt_move` is the only operation that mutates a game.
//! The session wraps one `GameState` in a mutex, so exactly one move per
//! session is processed at a time and `current_turn` and the board are
//! always observed consistently.

use crate::board::{BoardError, BoardState};
use shared::{Color, GameOutcome, Grid, GridError};
use thiserror::Error;

/// Rejection reasons for a proposed move. The first two are protocol
/// violations (a well-behaved client can never produce them) and cost the
/// offender its connection; the last two are reported and play continues.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("cell index {0} is outside the grid")]
    OutOfRange(usize),
    #[error("cell index {0} is not an edge")]
    NotAnEdge(usize),
    #[error("move out of turn or edge already marked")]
    IllegalMove,
    #[error("the game has already ended")]
    GameOver,
}

impl MoveError {
    /// True for rejections that should drop the offending connection.
    pub fn is_protocol_violation(self) -> bool {
        matches!(self, MoveError::OutOfRange(_) | MoveError::NotAnEdge(_))
    }
}

/// Everything a session needs to notify both peers about one accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub edge: usize,
    /// Boxes completed by this move, at most two.
    pub completed: Vec<usize>,
    /// True when the mover completed at least one box and keeps the turn.
    pub extra_turn: bool,
    /// Set on the move that claims the last box.
    pub result: Option<GameOutcome>,
}

/// Phase of one game session. `AwaitingPeers` is materialized in the
/// listener; a `GameState` exists only once both players are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Finished,
}

/// Authoritative state of one game: board, turn pointer, and phase.
#[derive(Debug, Clone)]
pub struct GameState {
    board: BoardState,
    current_turn: Color,
    phase: Phase,
}

impl GameState {
    /// Starts a game on the given grid. Blue moves first.
    pub fn new(grid: Grid) -> Self {
        Self {
            board: BoardState::new(grid),
            current_turn: Color::Blue,
            phase: Phase::InProgress,
        }
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Marks the session finished without a result, for quits and peer
    /// disconnects. Returns false if the game had already ended.
    pub fn abandon(&mut self) -> bool {
        if self.phase == Phase::Finished {
            return false;
        }
        self.phase = Phase::Finished;
        true
    }

    /// Applies one proposed move. On rejection no state changes at all.
    ///
    /// Completing at least one box grants the mover an immediate extra
    /// turn; otherwise the turn passes. Points for a double completion are
    /// awarded in one step, so the extra-turn decision is made exactly once
    /// per move. The move that claims the last box finishes the game.
    pub fn attempt_move(
        &mut self,
        acting_color: Color,
        edge_index: usize,
    ) -> Result<MoveOutcome, MoveError> {
        if self.phase == Phase::Finished {
            return Err(MoveError::GameOver);
        }
        match self.board.grid().classify(edge_index) {
            Err(GridError::OutOfRange { index, .. }) => return Err(MoveError::OutOfRange(index)),
            Err(_) => return Err(MoveError::NotAnEdge(edge_index)),
            Ok(cell) if !cell.is_edge() => return Err(MoveError::NotAnEdge(edge_index)),
            Ok(_) => {}
        }
        if acting_color != self.current_turn || self.board.is_marked(edge_index) {
            return Err(MoveError::IllegalMove);
        }

        let completed = match self.board.apply(edge_index, acting_color) {
            Ok(completed) => completed,
            // Unreachable after the checks above; kept as a defensive
            // invariant rather than the primary legality gate.
            Err(BoardError::AlreadyMarked(_)) => return Err(MoveError::IllegalMove),
            Err(BoardError::Grid(GridError::OutOfRange { index, .. })) => {
                return Err(MoveError::OutOfRange(index))
            }
            Err(BoardError::Grid(_)) => return Err(MoveError::NotAnEdge(edge_index)),
        };

        let extra_turn = !completed.is_empty();
        if extra_turn {
            self.board.award(acting_color, completed.len() as u32);
        } else {
            self.current_turn = acting_color.opponent();
        }

        let result = if self.board.is_full() {
            self.phase = Phase::Finished;
            Some(self.board.outcome())
        } else {
            None
        };

        Ok(MoveOutcome {
            edge: edge_index,
            completed,
            extra_turn,
            result,
        })
    }
}

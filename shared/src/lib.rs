//! Types shared between the dots-and-boxes server and its clients: player
//! colors, grid geometry, and the newline-delimited wire protocol.

use std::fmt;

pub mod grid;
pub mod protocol;

pub use grid::{Cell, Grid, GridError};
pub use protocol::{ClientCommand, GameOutcome, ProtocolError, ServerEvent};

/// Default grid dimension. Both peers must agree on this value out-of-band;
/// it is never negotiated on the wire.
pub const DEFAULT_GRID_LENGTH: usize = 7;

/// Player color, assigned at pairing time and immutable for the session.
/// Blue is the first peer to connect and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Blue,
    Red,
}

impl Color {
    /// The other player.
    pub fn opponent(self) -> Self {
        match self {
            Color::Blue => Color::Red,
            Color::Red => Color::Blue,
        }
    }

    /// Wire spelling of the color.
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Blue => "BLUE",
            Color::Red => "RED",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

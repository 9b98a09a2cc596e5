//! Wire protocol between server and clients.
//!
//! Messages are newline-delimited ASCII with space-separated fields, one
//! message per line:
//!
//! ```text
//! MOVE <edgeIndex>              client requests to mark an edge
//! QUIT                          client leaves voluntarily
//!
//! WELCOME <BLUE|RED>            color assignment, sent once at connect
//! MESSAGE <text>                informational text for display
//! VALID_MOVE <Y|N> <edgeIndex>  own move accepted; Y = extra turn
//! OPPONENT_MOVED <Y|N> <edgeIndex>
//! SQUARE <BLUE|RED> <boxIndex>  a box was completed
//! <BLUE|RED|TIE>                terminal game result
//! ```

use crate::Color;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failure to parse an inbound line. Any of these is a protocol violation;
/// the server drops the offending connection rather than recover.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty message line")]
    Empty,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("malformed message: {0}")]
    Malformed(String),
}

/// A command received from a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    Move(usize),
    Quit,
}

impl FromStr for ClientCommand {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_whitespace();
        match fields.next() {
            None => Err(ProtocolError::Empty),
            Some("MOVE") => {
                let index = fields
                    .next()
                    .and_then(|field| field.parse().ok())
                    .ok_or_else(|| ProtocolError::Malformed(line.to_string()))?;
                Ok(ClientCommand::Move(index))
            }
            Some("QUIT") => Ok(ClientCommand::Quit),
            Some(other) => Err(ProtocolError::UnknownCommand(other.to_string())),
        }
    }
}

/// Final result of a game: strictly higher score wins, equality is a tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Color),
    Tie,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Winner(color) => f.write_str(color.as_str()),
            GameOutcome::Tie => f.write_str("TIE"),
        }
    }
}

/// A notification sent to a client. `Display` produces the wire line
/// without the trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    Welcome(Color),
    Message(String),
    ValidMove { extra_turn: bool, edge: usize },
    OpponentMoved { extra_turn: bool, edge: usize },
    SquareCompleted { color: Color, box_index: usize },
    GameEnded(GameOutcome),
}

fn turn_flag(extra_turn: bool) -> char {
    if extra_turn {
        'Y'
    } else {
        'N'
    }
}

impl fmt::Display for ServerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerEvent::Welcome(color) => write!(f, "WELCOME {}", color),
            ServerEvent::Message(text) => write!(f, "MESSAGE {}", text),
            ServerEvent::ValidMove { extra_turn, edge } => {
                write!(f, "VALID_MOVE {} {}", turn_flag(*extra_turn), edge)
            }
            ServerEvent::OpponentMoved { extra_turn, edge } => {
                write!(f, "OPPONENT_MOVED {} {}", turn_flag(*extra_turn), edge)
            }
            ServerEvent::SquareCompleted { color, box_index } => {
                write!(f, "SQUARE {} {}", color, box_index)
            }
            ServerEvent::GameEnded(outcome) => write!(f, "{}", outcome),
        }
    }
}

//! One game session: the shared state behind two player connections.
//!
//! The session owns the authoritative `GameState` behind a mutex and the
//! outbound event channel of each peer. All notification pushes happen
//! while the lock is held; pushes never block, so the lock is never held
//! across socket I/O, and each recipient sees its events in the order the
//! engine generated them.

use crate::engine::{GameState, MoveError};
use log::{debug, info};
use shared::{Color, Grid, ServerEvent};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};

/// Shared state of one running game between two paired connections.
pub struct GameSession {
    state: Mutex<GameState>,
    blue: mpsc::UnboundedSender<ServerEvent>,
    red: mpsc::UnboundedSender<ServerEvent>,
    closed: watch::Sender<bool>,
}

impl GameSession {
    /// Creates the session for two freshly paired peers. The returned watch
    /// receiver turns true when the session is abandoned and both
    /// connections must tear down.
    pub fn new(
        grid: Grid,
        blue: mpsc::UnboundedSender<ServerEvent>,
        red: mpsc::UnboundedSender<ServerEvent>,
    ) -> (Arc<Self>, watch::Receiver<bool>) {
        let (closed, close_signal) = watch::channel(false);
        let session = Arc::new(Self {
            state: Mutex::new(GameState::new(grid)),
            blue,
            red,
            closed,
        });
        (session, close_signal)
    }

    fn sender(&self, color: Color) -> &mpsc::UnboundedSender<ServerEvent> {
        match color {
            Color::Blue => &self.blue,
            Color::Red => &self.red,
        }
    }

    /// Queues an event for one peer. A closed channel means that peer's
    /// writer is already gone; its read loop handles the cleanup.
    fn send(&self, color: Color, event: ServerEvent) {
        if self.sender(color).send(event).is_err() {
            debug!("{} event channel closed, dropping notification", color);
        }
    }

    fn send_both(&self, event: ServerEvent) {
        self.send(Color::Blue, event.clone());
        self.send(Color::Red, event);
    }

    /// Processes one move request from a connection.
    ///
    /// Accepted moves fan out as: `SQUARE` per completed box to both peers,
    /// then `VALID_MOVE` to the actor and `OPPONENT_MOVED` to the opponent,
    /// then the terminal result line to both if the board filled up.
    /// `IllegalMove` and `GameOver` are answered with a `MESSAGE` to the
    /// actor only. Protocol violations are returned to the caller, which
    /// drops the connection.
    pub async fn handle_move(&self, acting_color: Color, edge: usize) -> Result<(), MoveError> {
        let mut state = self.state.lock().await;
        let outcome = match state.attempt_move(acting_color, edge) {
            Ok(outcome) => outcome,
            Err(err) if err.is_protocol_violation() => return Err(err),
            Err(err) => {
                debug!("{} move {} rejected: {}", acting_color, edge, err);
                let text = match err {
                    MoveError::GameOver => "Game over",
                    _ => "Invalid move",
                };
                self.send(acting_color, ServerEvent::Message(text.to_string()));
                return Ok(());
            }
        };

        for &box_index in &outcome.completed {
            self.send_both(ServerEvent::SquareCompleted {
                color: acting_color,
                box_index,
            });
        }
        self.send(
            acting_color,
            ServerEvent::ValidMove {
                extra_turn: outcome.extra_turn,
                edge: outcome.edge,
            },
        );
        self.send(
            acting_color.opponent(),
            ServerEvent::OpponentMoved {
                extra_turn: outcome.extra_turn,
                edge: outcome.edge,
            },
        );

        if let Some(result) = outcome.result {
            info!(
                "Game ended {}: blue {} red {}",
                result,
                state.board().score_of(Color::Blue),
                state.board().score_of(Color::Red)
            );
            self.send_both(ServerEvent::GameEnded(result));
        }
        Ok(())
    }

    /// Voluntary quit. Same abandonment semantics as a dropped socket: the
    /// survivor is told the opponent left and both connections close. No
    /// forfeiture scoring.
    pub async fn handle_quit(&self, leaving_color: Color) {
        self.abandon(leaving_color).await;
    }

    /// Socket EOF, read error, or protocol violation on one side.
    pub async fn handle_disconnect(&self, leaving_color: Color) {
        self.abandon(leaving_color).await;
    }

    async fn abandon(&self, leaving_color: Color) {
        let was_in_progress = self.state.lock().await.abandon();
        if was_in_progress {
            info!("{} left an unfinished game, abandoning session", leaving_color);
            self.send(
                leaving_color.opponent(),
                ServerEvent::Message("Opponent disconnected".to_string()),
            );
            // Wake the survivor's read loop so the session can tear down.
            let _ = self.closed.send(true);
        }
    }
}

//! Player connection lifecycle: inbound line decoding and serialized
//! outbound writes.
//!
//! Each connection runs two tasks: the read loop below, and a dedicated
//! writer task draining the connection's event channel. Both the player's
//! own worker and the opponent's worker queue notifications onto that
//! channel, so exactly one task ever writes to a socket and lines never
//! interleave.

use crate::session::GameSession;
use log::{debug, info, warn};
use shared::{ClientCommand, Color, ServerEvent};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};

/// One network peer: color, buffered reader, and the handle used to queue
/// outbound events for the writer task.
pub struct PlayerConnection {
    color: Color,
    reader: BufReader<OwnedReadHalf>,
    events: mpsc::UnboundedSender<ServerEvent>,
}

impl PlayerConnection {
    /// Takes ownership of an accepted socket, starts the writer task, and
    /// queues the welcome message.
    pub fn new(socket: TcpStream, color: Color) -> Self {
        let (read_half, write_half) = socket.into_split();
        let (events, outbound) = mpsc::unbounded_channel();
        tokio::spawn(write_outbound(write_half, outbound, color));

        let connection = Self {
            color,
            reader: BufReader::new(read_half),
            events,
        };
        connection.send(ServerEvent::Welcome(color));
        connection
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Queues one event for the writer task.
    pub fn send(&self, event: ServerEvent) {
        let _ = self.events.send(event);
    }

    /// A handle the session uses to notify this peer from either worker.
    pub fn sender(&self) -> mpsc::UnboundedSender<ServerEvent> {
        self.events.clone()
    }

    /// Read loop: decodes one command per line and forwards it to the
    /// session, until quit, disconnect, protocol violation, or session
    /// teardown via the close signal.
    pub async fn run(self, session: Arc<GameSession>, mut closed: watch::Receiver<bool>) {
        let color = self.color;
        let mut lines = self.reader.lines();

        loop {
            tokio::select! {
                changed = closed.changed() => {
                    if changed.is_err() || *closed.borrow() {
                        debug!("{} connection closing with its session", color);
                        break;
                    }
                }
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if !handle_line(color, &session, &line).await {
                                break;
                            }
                        }
                        Ok(None) => {
                            info!("{} peer closed the connection", color);
                            session.handle_disconnect(color).await;
                            break;
                        }
                        Err(e) => {
                            warn!("{} read error: {}", color, e);
                            session.handle_disconnect(color).await;
                            break;
                        }
                    }
                }
            }
        }
    }
}

/// Handles one inbound line. Returns false when the read loop must stop.
async fn handle_line(color: Color, session: &GameSession, line: &str) -> bool {
    match line.parse::<ClientCommand>() {
        Ok(ClientCommand::Move(edge)) => match session.handle_move(color, edge).await {
            Ok(()) => true,
            Err(e) => {
                warn!("{} dropped for protocol violation: {}", color, e);
                session.handle_disconnect(color).await;
                false
            }
        },
        Ok(ClientCommand::Quit) => {
            info!("{} quit the game", color);
            session.handle_quit(color).await;
            false
        }
        Err(e) => {
            warn!("{} sent malformed line {:?}: {}", color, line, e);
            session.handle_disconnect(color).await;
            false
        }
    }
}

/// Writer task: the single writer for one socket. Ends when every event
/// sender is dropped or the peer stops accepting writes.
async fn write_outbound(
    mut socket: OwnedWriteHalf,
    mut outbound: mpsc::UnboundedReceiver<ServerEvent>,
    color: Color,
) {
    while let Some(event) = outbound.recv().await {
        let line = format!("{}\n", event);
        if let Err(e) = socket.write_all(line.as_bytes()).await {
            debug!("{} write failed: {}", color, e);
            break;
        }
    }
}

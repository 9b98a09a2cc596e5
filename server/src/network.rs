//! TCP listener pairing peers two at a time into independent sessions.

use crate::connection::PlayerConnection;
use crate::session::GameSession;
use log::{error, info};
use shared::{Color, Grid, ServerEvent};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Accepts connections on one well-known port and starts a game session
/// for every two peers. The first peer of a pair is Blue and moves first.
pub struct Server {
    listener: TcpListener,
    grid: Grid,
}

impl Server {
    pub async fn bind(addr: &str, grid: Grid) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(
            "Server listening on {} (grid length {})",
            listener.local_addr()?,
            grid.length()
        );
        Ok(Self { listener, grid })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. Sessions are fully independent; any number can run
    /// concurrently, and a failed accept never stops the listener.
    pub async fn run(&self) -> std::io::Result<()> {
        let mut session_count: u64 = 0;
        loop {
            let blue = self.accept_player(Color::Blue).await;
            blue.send(ServerEvent::Message(
                "Waiting for opponent to connect...".to_string(),
            ));

            let red = self.accept_player(Color::Red).await;

            session_count += 1;
            info!("Session {} paired, game starting", session_count);

            let (session, closed) = GameSession::new(self.grid, blue.sender(), red.sender());
            blue.send(ServerEvent::Message("All players connected".to_string()));
            red.send(ServerEvent::Message("All players connected".to_string()));
            blue.send(ServerEvent::Message("Your move".to_string()));

            tokio::spawn(blue.run(Arc::clone(&session), closed.clone()));
            tokio::spawn(red.run(session, closed));
        }
    }

    async fn accept_player(&self, color: Color) -> PlayerConnection {
        loop {
            match self.listener.accept().await {
                Ok((socket, addr)) => {
                    info!("{} player connected from {}", color, addr);
                    return PlayerConnection::new(socket, color);
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        }
    }
}

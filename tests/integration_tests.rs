//! Integration tests driving the dots-and-boxes server over real TCP
//! sockets: pairing, the full wire protocol, rejection handling, and
//! session teardown.

use server::network::Server;
use shared::Grid;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Spawns a server on an ephemeral port with a 5x5 grid (4 boxes).
async fn start_server() -> SocketAddr {
    let grid = Grid::new(5).unwrap();
    let server = Server::bind("127.0.0.1:0", grid)
        .await
        .expect("failed to bind test server");
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    addr
}

/// Minimal line-oriented client for the tests.
struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = timeout(RECV_TIMEOUT, TcpStream::connect(addr))
            .await
            .expect("connect timed out")
            .expect("connect failed");
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .expect("send failed");
    }

    async fn recv(&mut self) -> String {
        timeout(RECV_TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for a server line")
            .expect("read error")
            .expect("server closed the connection early")
    }

    async fn expect(&mut self, expected: &str) {
        let line = self.recv().await;
        assert_eq!(line, expected);
    }

    /// Drains any in-flight lines and asserts the server closes the socket.
    async fn expect_closed(mut self) {
        loop {
            let line = timeout(RECV_TIMEOUT, self.lines.next_line())
                .await
                .expect("timed out waiting for the connection to close")
                .expect("read error");
            if line.is_none() {
                return;
            }
        }
    }
}

/// Connects two clients and consumes the complete pairing preamble.
async fn paired_clients(addr: SocketAddr) -> (TestClient, TestClient) {
    let mut blue = TestClient::connect(addr).await;
    blue.expect("WELCOME BLUE").await;
    blue.expect("MESSAGE Waiting for opponent to connect...").await;

    let mut red = TestClient::connect(addr).await;
    red.expect("WELCOME RED").await;

    blue.expect("MESSAGE All players connected").await;
    red.expect("MESSAGE All players connected").await;
    blue.expect("MESSAGE Your move").await;
    (blue, red)
}

/// Plays one accepted move and asserts the exact fan-out both peers see.
async fn play_move(
    actor: &mut TestClient,
    other: &mut TestClient,
    color: &str,
    edge: usize,
    completed: &[usize],
    extra_turn: bool,
) {
    actor.send(&format!("MOVE {}", edge)).await;
    for box_index in completed {
        let square = format!("SQUARE {} {}", color, box_index);
        actor.expect(&square).await;
        other.expect(&square).await;
    }
    let flag = if extra_turn { "Y" } else { "N" };
    actor.expect(&format!("VALID_MOVE {} {}", flag, edge)).await;
    other
        .expect(&format!("OPPONENT_MOVED {} {}", flag, edge))
        .await;
}

mod pairing_tests {
    use super::*;

    #[tokio::test]
    async fn welcome_and_pairing_messages() {
        let addr = start_server().await;
        let _clients = paired_clients(addr).await;
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let addr = start_server().await;
        let (mut blue1, mut red1) = paired_clients(addr).await;
        let (mut blue2, mut red2) = paired_clients(addr).await;

        // A move in one session must not leak into the other.
        play_move(&mut blue1, &mut red1, "BLUE", 1, &[], false).await;
        play_move(&mut blue2, &mut red2, "BLUE", 3, &[], false).await;
        play_move(&mut red2, &mut blue2, "RED", 9, &[], false).await;
        play_move(&mut red1, &mut blue1, "RED", 5, &[], false).await;
    }
}

mod game_flow_tests {
    use super::*;

    /// A full 12-move game on the 4-box board ending 2-2. Covers turn
    /// alternation, the turn-extension rule, per-box SQUARE notifications,
    /// and the terminal TIE broadcast.
    #[tokio::test]
    async fn full_game_ends_in_tie() {
        let addr = start_server().await;
        let (mut blue, mut red) = paired_clients(addr).await;

        play_move(&mut blue, &mut red, "BLUE", 1, &[], false).await;
        play_move(&mut red, &mut blue, "RED", 5, &[], false).await;
        play_move(&mut blue, &mut red, "BLUE", 7, &[], false).await;
        play_move(&mut red, &mut blue, "RED", 3, &[], false).await;
        play_move(&mut blue, &mut red, "BLUE", 9, &[], false).await;
        // Red completes box 6 and keeps the turn.
        play_move(&mut red, &mut blue, "RED", 11, &[6], true).await;
        play_move(&mut red, &mut blue, "RED", 13, &[8], true).await;
        play_move(&mut red, &mut blue, "RED", 15, &[], false).await;
        play_move(&mut blue, &mut red, "BLUE", 17, &[], false).await;
        play_move(&mut red, &mut blue, "RED", 19, &[], false).await;
        // Blue claims the last two boxes.
        play_move(&mut blue, &mut red, "BLUE", 21, &[16], true).await;
        play_move(&mut blue, &mut red, "BLUE", 23, &[18], true).await;

        blue.expect("TIE").await;
        red.expect("TIE").await;

        // Terminal state: further moves are answered, not applied.
        blue.send("MOVE 1").await;
        blue.expect("MESSAGE Game over").await;
    }

    #[tokio::test]
    async fn one_edge_completes_two_boxes() {
        let addr = start_server().await;
        let (mut blue, mut red) = paired_clients(addr).await;

        play_move(&mut blue, &mut red, "BLUE", 1, &[], false).await;
        play_move(&mut red, &mut blue, "RED", 5, &[], false).await;
        play_move(&mut blue, &mut red, "BLUE", 11, &[], false).await;
        play_move(&mut red, &mut blue, "RED", 3, &[], false).await;
        play_move(&mut blue, &mut red, "BLUE", 9, &[], false).await;
        play_move(&mut red, &mut blue, "RED", 13, &[], false).await;
        // Edge 7 is shared by boxes 6 and 8: both complete on one move.
        play_move(&mut blue, &mut red, "BLUE", 7, &[6, 8], true).await;
    }

    #[tokio::test]
    async fn wrong_turn_is_rejected_without_state_damage() {
        let addr = start_server().await;
        let (mut blue, mut red) = paired_clients(addr).await;

        // Red tries to move first.
        red.send("MOVE 1").await;
        red.expect("MESSAGE Invalid move").await;

        // The edge is still free and it is still Blue's turn.
        play_move(&mut blue, &mut red, "BLUE", 1, &[], false).await;

        // Re-submitting a marked edge is rejected for the mover too.
        red.send("MOVE 1").await;
        red.expect("MESSAGE Invalid move").await;
        play_move(&mut red, &mut blue, "RED", 5, &[], false).await;
    }
}

mod teardown_tests {
    use super::*;

    #[tokio::test]
    async fn vertex_index_drops_the_connection() {
        let addr = start_server().await;
        let (mut blue, mut red) = paired_clients(addr).await;

        // Index 0 is a vertex: never clickable, a protocol violation.
        blue.send("MOVE 0").await;
        blue.expect_closed().await;

        red.expect("MESSAGE Opponent disconnected").await;
        red.expect_closed().await;
    }

    #[tokio::test]
    async fn out_of_range_index_drops_the_connection() {
        let addr = start_server().await;
        let (mut blue, mut red) = paired_clients(addr).await;

        blue.send("MOVE 9999").await;
        blue.expect_closed().await;

        red.expect("MESSAGE Opponent disconnected").await;
        red.expect_closed().await;
    }

    #[tokio::test]
    async fn malformed_line_drops_the_connection() {
        let addr = start_server().await;
        let (mut blue, mut red) = paired_clients(addr).await;

        blue.send("HELLO world").await;
        blue.expect_closed().await;

        red.expect("MESSAGE Opponent disconnected").await;
        red.expect_closed().await;
    }

    #[tokio::test]
    async fn quit_notifies_the_opponent_and_closes_both() {
        let addr = start_server().await;
        let (mut blue, mut red) = paired_clients(addr).await;

        play_move(&mut blue, &mut red, "BLUE", 1, &[], false).await;

        red.send("QUIT").await;
        blue.expect("MESSAGE Opponent disconnected").await;
        blue.expect_closed().await;
        red.expect_closed().await;
    }

    #[tokio::test]
    async fn dropped_socket_abandons_the_session() {
        let addr = start_server().await;
        let (blue, mut red) = paired_clients(addr).await;

        drop(blue);
        red.expect("MESSAGE Opponent disconnected").await;
        red.expect_closed().await;
    }
}

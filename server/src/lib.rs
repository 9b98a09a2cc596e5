//! # Dots-and-Boxes Game Server Library
//!
//! Authoritative server for a two-player, turn-based dots-and-boxes game
//! played over TCP. Players mark edges on a grid; completing a box scores a
//! point and grants an immediate extra turn; the game ends when every box
//! is claimed and the higher score wins (equality is a tie).
//!
//! ## Architecture
//!
//! The listener pairs incoming connections two at a time into sessions.
//! Each session runs one read-loop task per player; every move request
//! funnels through the session's single mutex-guarded engine call, so
//! exactly one move per session is processed at a time and the turn
//! pointer and board are always observed consistently. Outbound
//! notifications are queued on a per-connection channel drained by one
//! writer task, so no two tasks ever interleave writes on a socket.
//! Sessions are fully independent: nothing is shared across them, and no
//! failure in one is fatal to the server process.
//!
//! ## Module Organization
//!
//! - [`board`] — edge ownership, scores, and box-completion queries
//! - [`engine`] — move legality, turn extension, and win determination
//! - [`session`] — the per-game critical section and notification fan-out
//! - [`connection`] — per-peer line decoding and the single-writer path
//! - [`network`] — the accept loop pairing peers into sessions
//!
//! Grid geometry and the wire protocol live in the `shared` crate, which
//! clients depend on as well.

pub mod board;
pub mod connection;
pub mod engine;
pub mod network;
pub mod session;

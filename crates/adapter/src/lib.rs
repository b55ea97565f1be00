//! Adapter module - remote presentation over a TCP socket with JSON lines
//!
//! The game core is headless. Any presentation layer (a board renderer, a
//! test harness, a bot) connects here, receives observations of the board
//! and sends player commands back.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Observation Streaming**: Server sends the game state whenever it changes
//! 4. **Commanding**: Any handshaken client sends commands; each gets an `ack` or `error`
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and requested capabilities
//! - **command**: One player action (`select`, `undo`, `hint`, `shuffle`,
//!   `confirm`, `cancel`, `restart`, `retry`, `nextLevel`, `pause`,
//!   `difficulty`, `language`, `theme`, `live`, `advice`)
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello
//! - **observation**: Full game state (tiles, dock, score, coins, timers)
//! - **ack**: Command processed; `applied` is false for silent no-ops
//! - **error**: Error response with code and message
//! - **commentary**: Line from the live commentary session
//! - **advice**: Reply to an `advice` command
//!
//! # Environment Variables
//!
//! - `MAHJONG_ADAPTER_HOST`: Bind address (default: "127.0.0.1")
//! - `MAHJONG_ADAPTER_PORT`: Port number (default: 7878)
//! - `MAHJONG_ADAPTER_MAX_PENDING`: Inbound command queue depth (default: 16)
//! - `MAHJONG_ADAPTER_DISABLED`: Set to "1" or "true" to disable adapter entirely
//!
//! Game settings are read by [`config::GameConfig`].
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"board-ui","version":"1.0.0"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1234567890,"protocol_version":"1.0.0","client_id":1,"game_id":"vita-mahjong"}
//! Server -> Client: {"type":"observation","seq":1,"ts":1234567891,"status":"playing","tiles":[...],...}
//! Client -> Server: {"type":"command","seq":2,"ts":1234567892,"action":"select","tile":"tile-17"}
//! Server -> Client: {"type":"ack","seq":2,"ts":1234567892,"status":"ok","applied":true}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"client":{"name":"test","version":"1.0.0"},"protocol_version":"1.0.0"}
//! ```

pub mod advice;
pub mod commentary;
pub mod config;
pub mod protocol;
pub mod runtime;
pub mod server;
pub mod session;

pub use vita_mahjong_core as core;
pub use vita_mahjong_types as types;

// Re-export protocol types for convenience
pub use advice::{advice_source, MissingCredentialAdvice, ProverbAdvice};
pub use commentary::LiveCommentary;
pub use config::GameConfig;
pub use protocol::*;
pub use runtime::{Adapter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{build_observation, run_server, ServerConfig, ServerState};
pub use session::Session;

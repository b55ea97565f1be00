//! TCP server for the remote presentation adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, warn};

use crate::config::is_truthy;
use crate::core::GameState;
use crate::protocol::*;
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
use crate::types::{Difficulty, GameAction, Language, PaidAction, Theme, TileId};

pub const ENV_HOST: &str = "MAHJONG_ADAPTER_HOST";
pub const ENV_PORT: &str = "MAHJONG_ADAPTER_PORT";
pub const ENV_MAX_PENDING: &str = "MAHJONG_ADAPTER_MAX_PENDING";
pub const ENV_DISABLED: &str = "MAHJONG_ADAPTER_DISABLED";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: 16,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: lookup(ENV_HOST)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.host),
            port: lookup(ENV_PORT)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.port),
            protocol_version: defaults.protocol_version,
            max_pending_commands: lookup(ENV_MAX_PENDING)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_pending_commands),
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid adapter address {}:{}", self.host, self.port))
    }
}

/// Shared server state
pub struct ServerState {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            clients: RwLock::new(Vec::new()),
        }
    }

    /// Check if the adapter is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var(ENV_DISABLED)
            .map(|v| is_truthy(&v))
            .unwrap_or(false)
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: usize,
    pub addr: SocketAddr,
    pub stream_observations: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<String>,
}

async fn is_handshaken(state: &ServerState, client_id: usize) -> bool {
    let clients = state.clients.read().await;
    clients
        .iter()
        .find(|c| c.id == client_id)
        .map(|c| c.handshaken)
        .unwrap_or(false)
}

/// Enforce strictly increasing `seq` per client
async fn check_and_update_seq(state: &ServerState, client_id: usize, seq: u64) -> bool {
    let mut clients = state.clients.write().await;
    let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
        return true;
    };

    match client.last_seq {
        Some(prev) if seq <= prev => false,
        _ => {
            client.last_seq = Some(seq);
            true
        }
    }
}

fn to_line<T: serde::Serialize>(msg: &T) -> Option<String> {
    serde_json::to_string(msg).ok()
}

fn send_error(tx: &mpsc::UnboundedSender<String>, seq: u64, code: ErrorCode, message: &str) {
    if let Some(line) = to_line(&create_error(seq, code, message)) {
        let _ = tx.send(line);
    }
}

/// Start the TCP server
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let bound = listener.local_addr()?;
    info!(%bound, "adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config));
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let clients = state.clients.read().await;
                match msg {
                    OutboundMessage::ToClient { client_id, line } => {
                        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                            let _ = c.tx.send(line);
                        }
                    }
                    OutboundMessage::Broadcast { line } => {
                        for c in clients.iter().filter(|c| c.handshaken && c.stream_observations) {
                            let _ = c.tx.send(line.clone());
                        }
                    }
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        info!(client_id, %addr, "client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, addr, client_id, state, command_tx).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            addr,
            stream_observations: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
    }

    // Spawn task to write lines to the client
    let write_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.write_all(b"\n").await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        debug!(client_id, line = trimmed, "inbound");

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if is_handshaken(&state, client_id).await
                    && !check_and_update_seq(&state, client_id, hello.seq).await
                {
                    send_error(&tx, hello.seq, ErrorCode::OutOfOrder, "seq must be strictly increasing");
                    continue;
                }

                let major = state.config.protocol_version.split('.').next().unwrap_or("1");
                if hello.protocol_version.split('.').next() != Some(major) {
                    send_error(
                        &tx,
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    break;
                }

                {
                    let mut clients = state.clients.write().await;
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(hello.seq);
                        client.stream_observations = hello.requested.stream_observations;
                    }
                }
                info!(client_id, name = %hello.client.name, "handshake complete");

                let welcome = create_welcome(hello.seq, &state.config.protocol_version, client_id as u64);
                if let Some(line) = to_line(&welcome) {
                    let _ = tx.send(line);
                }

                if hello.requested.stream_observations {
                    let _ = command_tx.try_send(InboundCommand {
                        client_id,
                        seq: hello.seq,
                        payload: InboundPayload::SnapshotRequest,
                    });
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !is_handshaken(&state, client_id).await {
                    send_error(&tx, cmd.seq, ErrorCode::HandshakeRequired, "Send hello before command");
                    continue;
                }
                if !check_and_update_seq(&state, client_id, cmd.seq).await {
                    send_error(&tx, cmd.seq, ErrorCode::OutOfOrder, "seq must be strictly increasing");
                    continue;
                }

                let mapped = match map_command(&cmd) {
                    Ok(c) => c,
                    Err((code, message)) => {
                        send_error(&tx, cmd.seq, code, &message);
                        continue;
                    }
                };

                // Ack is sent by the game loop after the command is applied.
                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: cmd.seq,
                        payload: InboundPayload::Command(mapped),
                    })
                    .is_err()
                {
                    send_error(&tx, cmd.seq, ErrorCode::Backpressure, "Command queue is full");
                }
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                send_error(&tx, unknown.seq, ErrorCode::InvalidCommand, "Unknown message type");
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                send_error(&tx, seq, ErrorCode::InvalidCommand, &format!("JSON parse error: {e}"));
            }
        }
    }

    {
        let mut clients = state.clients.write().await;
        clients.retain(|c| c.id != client_id);
    }

    drop(tx);
    let _ = write_task.await;

    Ok(())
}

fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

fn require<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str, (ErrorCode, String)> {
    field
        .as_deref()
        .ok_or_else(|| (ErrorCode::InvalidCommand, format!("Missing {name}")))
}

/// Map a protocol command into a game-loop command.
fn map_command(cmd: &CommandMessage) -> Result<ClientCommand, (ErrorCode, String)> {
    let invalid = |what: &str, value: &str| (ErrorCode::InvalidCommand, format!("Invalid {what}: {value}"));

    let action = match cmd.action {
        ActionName::Select => {
            let raw = require(&cmd.tile, "tile")?;
            let id = TileId::from_str(raw).ok_or_else(|| invalid("tile", raw))?;
            GameAction::Select(id)
        }
        ActionName::Undo => GameAction::Request(PaidAction::Undo),
        ActionName::Hint => GameAction::Request(PaidAction::Hint),
        ActionName::Shuffle => GameAction::Request(PaidAction::Shuffle),
        ActionName::Confirm => GameAction::Confirm,
        ActionName::Cancel => GameAction::Cancel,
        ActionName::Restart => GameAction::Restart,
        ActionName::Retry => GameAction::RetryLevel,
        ActionName::NextLevel => GameAction::NextLevel,
        ActionName::Pause => GameAction::Pause,
        ActionName::Difficulty => {
            let raw = require(&cmd.difficulty, "difficulty")?;
            GameAction::SetDifficulty(Difficulty::from_str(raw).ok_or_else(|| invalid("difficulty", raw))?)
        }
        ActionName::Language => {
            let raw = require(&cmd.language, "language")?;
            GameAction::SetLanguage(Language::from_str(raw).ok_or_else(|| invalid("language", raw))?)
        }
        ActionName::Theme => {
            let raw = require(&cmd.theme, "theme")?;
            GameAction::SetTheme(Theme::from_str(raw).ok_or_else(|| invalid("theme", raw))?)
        }
        ActionName::Live => {
            let live = cmd
                .live
                .ok_or_else(|| (ErrorCode::InvalidCommand, "Missing live".to_string()))?;
            return Ok(ClientCommand::SetLive(live));
        }
        ActionName::Advice => return Ok(ClientCommand::Advice),
    };

    Ok(ClientCommand::Action(action))
}

/// Build observation message from game state
pub fn build_observation(game: &GameState, seq: u64) -> ObservationMessage {
    let snap = game.snapshot();

    let tiles = snap
        .tiles
        .iter()
        .map(|t| TileObservation {
            id: t.id.to_string(),
            category: t.category().as_str(),
            value: t.value(),
            x: t.x,
            y: t.y,
            z: t.z,
            location: t.location.as_str(),
            hinted: t.hinted,
            flying: t.flying,
            playable: t.playable,
        })
        .collect();

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        playable: snap.playable(),
        status: snap.status.as_str(),
        won: snap.won(),
        lost: snap.lost(),
        paused: snap.paused,
        episode_id: snap.episode_id,
        seed: snap.seed,
        level: snap.level,
        difficulty: snap.difficulty.as_str(),
        theme: snap.theme.as_str(),
        language: snap.language.as_str(),
        score: snap.score,
        coins: snap.coins,
        combo: snap.combo,
        combo_popup: snap.combo_popup,
        elapsed_seconds: snap.elapsed_seconds,
        pending_action: snap.pending_action.map(|a| a.as_str()),
        dock_count: snap.dock_count(),
        dock: snap.dock.iter().map(TileId::to_string).collect(),
        in_flight: snap.in_flight,
        history_depth: snap.history_depth,
        live: snap.commentary_live,
        tiles,
    }
}

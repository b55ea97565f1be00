//! Protocol module - JSON message types for the remote presentation adapter
//!
//! Line-delimited JSON. Every message carries `type`, `seq` (sequence number)
//! and `ts` (timestamp in ms).

use serde::{Deserialize, Serialize};

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HelloType {
    #[serde(rename = "hello")]
    #[default]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "command")]
    #[default]
    Command,
}

/// Client hello message (first message on a connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    #[serde(default)]
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    #[serde(default = "default_true")]
    pub stream_observations: bool,
}

impl Default for RequestedCapabilities {
    fn default() -> Self {
        Self {
            stream_observations: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Command message
#[derive(Debug, Clone, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub action: ActionName,
    #[serde(default)]
    pub tile: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub live: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    Select,
    Undo,
    Hint,
    Shuffle,
    Confirm,
    Cancel,
    Restart,
    Retry,
    NextLevel,
    Pause,
    Difficulty,
    Language,
    Theme,
    Live,
    Advice,
}

impl ActionName {
    pub const ALL: [ActionName; 15] = [
        ActionName::Select,
        ActionName::Undo,
        ActionName::Hint,
        ActionName::Shuffle,
        ActionName::Confirm,
        ActionName::Cancel,
        ActionName::Restart,
        ActionName::Retry,
        ActionName::NextLevel,
        ActionName::Pause,
        ActionName::Difficulty,
        ActionName::Language,
        ActionName::Theme,
        ActionName::Live,
        ActionName::Advice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::Select => "select",
            ActionName::Undo => "undo",
            ActionName::Hint => "hint",
            ActionName::Shuffle => "shuffle",
            ActionName::Confirm => "confirm",
            ActionName::Cancel => "cancel",
            ActionName::Restart => "restart",
            ActionName::Retry => "retry",
            ActionName::NextLevel => "nextLevel",
            ActionName::Pause => "pause",
            ActionName::Difficulty => "difficulty",
            ActionName::Language => "language",
            ActionName::Theme => "theme",
            ActionName::Live => "live",
            ActionName::Advice => "advice",
        }
    }
}

impl<'de> Deserialize<'de> for ActionName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ActionName::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(&s))
            .ok_or_else(|| serde::de::Error::custom(format!("unknown action: {s}")))
    }
}

impl Serialize for ActionName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    #[serde(rename = "handshake_required")]
    HandshakeRequired,
    #[serde(rename = "protocol_mismatch")]
    ProtocolMismatch,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "out_of_order")]
    OutOfOrder,
    #[serde(rename = "backpressure")]
    Backpressure,
    #[serde(rename = "insufficient_coins")]
    InsufficientCoins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommentaryType {
    #[serde(rename = "commentary")]
    Commentary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AdviceType {
    #[serde(rename = "advice")]
    Advice,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub game_id: &'static str,
}

/// Acknowledgment, sent once the game loop has processed the command
#[derive(Debug, Clone, Serialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
    /// False when the command was a silent no-op
    pub applied: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Fire-and-forget commentary line from the live session
#[derive(Debug, Clone, Serialize)]
pub struct CommentaryMessage {
    #[serde(rename = "type")]
    pub msg_type: CommentaryType,
    pub seq: u64,
    pub ts: u64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdviceMessage {
    #[serde(rename = "type")]
    pub msg_type: AdviceType,
    pub seq: u64,
    pub ts: u64,
    pub text: String,
}

/// Game state observation (sent to every streaming client)
#[derive(Debug, Clone, Serialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    /// Accepting tile selections
    pub playable: bool,
    pub status: &'static str,
    pub won: bool,
    pub lost: bool,
    pub paused: bool,
    pub episode_id: u32,
    pub seed: u64,
    pub level: u32,
    pub difficulty: &'static str,
    pub theme: &'static str,
    pub language: &'static str,
    pub score: u32,
    pub coins: u32,
    pub combo: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combo_popup: Option<u32>,
    pub elapsed_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_action: Option<&'static str>,
    pub dock: Vec<String>,
    pub dock_count: usize,
    pub in_flight: usize,
    pub history_depth: usize,
    pub live: bool,
    pub tiles: Vec<TileObservation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TileObservation {
    pub id: String,
    pub category: &'static str,
    pub value: &'static str,
    pub x: i16,
    pub y: i16,
    pub z: u8,
    pub location: &'static str,
    pub hinted: bool,
    pub flying: bool,
    pub playable: bool,
}

// ============== Parsing ==============

/// Parse one inbound line
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct Envelope {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let envelope = serde_json::from_str::<Envelope>(json)?;
            match envelope.msg_type.as_deref() {
                Some("hello") | Some("command") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: envelope.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

// ============== Utility Functions ==============

pub const PROTOCOL_VERSION: &str = "1.0.0";
pub const GAME_ID: &str = "vita-mahjong";

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
        requested: RequestedCapabilities::default(),
    }
}

pub fn create_welcome(seq: u64, protocol_version: &str, client_id: u64) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        client_id,
        game_id: GAME_ID,
    }
}

pub fn create_ack(seq: u64, applied: bool) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
        applied,
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

pub fn create_commentary(seq: u64, text: &str) -> CommentaryMessage {
    CommentaryMessage {
        msg_type: CommentaryType::Commentary,
        seq,
        ts: current_timestamp_ms(),
        text: text.to_string(),
    }
}

pub fn create_advice(seq: u64, text: &str) -> AdviceMessage {
    AdviceMessage {
        msg_type: AdviceType::Advice,
        seq,
        ts: current_timestamp_ms(),
        text: text.to_string(),
    }
}

/// Get current timestamp in milliseconds
pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

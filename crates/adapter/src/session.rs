//! Host-side session: owns the game and turns adapter traffic into state changes.
//!
//! The game loop calls [`Session::handle`] for each inbound command and
//! [`Session::step`] once per frame, then hands every returned
//! [`OutboundMessage`] to the adapter.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::commentary::LiveCommentary;
use crate::core::{advice_or_default, forward_commentary, ActionError, AdviceSource, GameState};
use crate::protocol::{create_ack, create_advice, create_commentary, create_error, ErrorCode};
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
use crate::server::build_observation;

pub struct Session {
    game: GameState,
    commentary: LiveCommentary,
    commentary_rx: Option<mpsc::UnboundedReceiver<String>>,
    advice: Box<dyn AdviceSource + Send>,
    /// Sequence number for server-initiated messages
    seq: u64,
    dirty: bool,
}

impl Session {
    pub fn new(game: GameState, advice: Box<dyn AdviceSource + Send>) -> Self {
        let mut session = Self {
            game,
            commentary: LiveCommentary::new(),
            commentary_rx: None,
            advice,
            seq: 0,
            dirty: true,
        };
        if session.game.commentary_live() {
            session.set_live(true);
        }
        session
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn set_live(&mut self, live: bool) -> bool {
        if live {
            self.commentary_rx = Some(self.commentary.connect());
        } else {
            self.commentary.disconnect();
            self.commentary_rx = None;
        }
        self.game.set_commentary_live(live)
    }

    /// Apply one inbound command; returns the replies to deliver.
    pub fn handle(&mut self, cmd: InboundCommand) -> Vec<OutboundMessage> {
        let client_id = cmd.client_id;
        let reply = |line: Option<String>| {
            line.map(|line| OutboundMessage::ToClient { client_id, line })
        };

        let line = match cmd.payload {
            InboundPayload::SnapshotRequest => {
                let seq = self.next_seq();
                serde_json::to_string(&build_observation(&self.game, seq)).ok()
            }
            InboundPayload::Command(ClientCommand::Action(action)) => {
                match self.game.apply_action(action) {
                    Ok(applied) => {
                        debug!(client_id, action = action.as_str(), applied, "command applied");
                        self.dirty |= applied;
                        serde_json::to_string(&create_ack(cmd.seq, applied)).ok()
                    }
                    Err(err @ ActionError::InsufficientCoins { .. }) => {
                        warn!(client_id, error = %err, "command rejected");
                        let msg = create_error(cmd.seq, ErrorCode::InsufficientCoins, &err.to_string());
                        serde_json::to_string(&msg).ok()
                    }
                }
            }
            InboundPayload::Command(ClientCommand::SetLive(live)) => {
                let applied = self.set_live(live);
                self.dirty |= applied;
                serde_json::to_string(&create_ack(cmd.seq, applied)).ok()
            }
            InboundPayload::Command(ClientCommand::Advice) => {
                let text = advice_or_default(self.advice.as_mut(), self.game.language());
                serde_json::to_string(&create_advice(cmd.seq, &text)).ok()
            }
        };

        reply(line).into_iter().collect()
    }

    /// Advance the game by one frame and collect broadcasts.
    pub fn step(&mut self, elapsed_ms: u32) -> Vec<OutboundMessage> {
        let mut out = Vec::new();

        self.dirty |= self.game.tick(elapsed_ms);

        let events = self.game.take_events();
        if !events.is_empty() {
            self.dirty = true;
            forward_commentary(&mut self.commentary, &events);
        }

        let mut lines = Vec::new();
        if let Some(rx) = self.commentary_rx.as_mut() {
            while let Ok(text) = rx.try_recv() {
                lines.push(text);
            }
        }
        for text in lines {
            let seq = self.next_seq();
            if let Ok(line) = serde_json::to_string(&create_commentary(seq, &text)) {
                out.push(OutboundMessage::Broadcast { line });
            }
        }

        if self.dirty {
            self.dirty = false;
            let seq = self.next_seq();
            if let Ok(line) = serde_json::to_string(&build_observation(&self.game, seq)) {
                out.push(OutboundMessage::Broadcast { line });
            }
        }

        out
    }
}

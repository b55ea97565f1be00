//! Collaborator ports
//!
//! The core never owns the advice or live-commentary services. It calls them
//! through these traits, and their failures never reach game state.

use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{GameEvent, Language};

/// Fire-and-forget sink for short event lines (live voice commentary)
pub trait CommentarySink {
    /// Whether the player has the live session switched on
    fn is_live(&self) -> bool;

    /// Push one line; must not block on a reply
    fn send_event(&mut self, text: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdviceError {
    #[error("advice credential is not configured")]
    MissingCredential,
    #[error("advice service unavailable: {0}")]
    Unavailable(String),
    #[error("advice service returned an empty response")]
    EmptyResponse,
}

/// Request/response source of short advice text
pub trait AdviceSource {
    fn advice(&mut self, language: Language) -> Result<String, AdviceError>;
}

/// Shown when the advice source fails
pub fn fallback_advice(language: Language) -> &'static str {
    match language {
        Language::Uz => "Sabr qiling va juftlarni diqqat bilan qidiring.",
        Language::Ru => "Не торопитесь и внимательно ищите пары.",
        Language::En => "Take your time and look carefully for pairs.",
    }
}

/// Ask for advice, falling back to a fixed line on any failure
pub fn advice_or_default<A: AdviceSource + ?Sized>(source: &mut A, language: Language) -> String {
    match source.advice(language) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!(error = %AdviceError::EmptyResponse, "using fallback advice");
            fallback_advice(language).to_string()
        }
        Err(err) => {
            warn!(error = %err, "using fallback advice");
            fallback_advice(language).to_string()
        }
    }
}

/// Push commentary for every notable event; returns how many lines were sent
pub fn forward_commentary<S: CommentarySink + ?Sized>(sink: &mut S, events: &[GameEvent]) -> usize {
    if !sink.is_live() {
        return 0;
    }

    let mut sent = 0;
    for text in events.iter().filter_map(GameEvent::commentary) {
        debug!(%text, "commentary");
        sink.send_event(&text);
        sent += 1;
    }
    sent
}

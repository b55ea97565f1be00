//! Scoring module - match points and the combo window
//!
//! A match within `COMBO_WINDOW_MS` of the previous one extends the combo,
//! otherwise the combo restarts at 1. Each match is worth
//! `MATCH_BASE_SCORE * combo`.

use crate::types::{COMBO_WINDOW_MS, MATCH_BASE_SCORE};

/// Points for one match at the given combo multiplier
pub fn match_score(combo: u32) -> u32 {
    MATCH_BASE_SCORE.saturating_mul(combo.max(1))
}

/// Running combo state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboTracker {
    combo: u32,
    last_match_ms: Option<u64>,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Register a match at `now_ms`; returns the combo it scored at
    pub fn register_match(&mut self, now_ms: u64) -> u32 {
        let within_window = self
            .last_match_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < COMBO_WINDOW_MS);

        self.combo = if within_window { self.combo + 1 } else { 1 };
        self.last_match_ms = Some(now_ms);
        self.combo
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

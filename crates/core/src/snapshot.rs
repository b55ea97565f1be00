use crate::types::{
    Difficulty, GameStatus, Language, PaidAction, TileCategory, TileFace, TileId, TileLocation,
    Theme,
};

/// Presentation view of one visible tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileView {
    pub id: TileId,
    pub face: TileFace,
    pub x: i16,
    pub y: i16,
    pub z: u8,
    pub location: TileLocation,
    pub hinted: bool,
    pub flying: bool,
    pub playable: bool,
}

impl TileView {
    pub fn category(&self) -> TileCategory {
        self.face.category()
    }

    pub fn value(&self) -> &'static str {
        self.face.value_code()
    }
}

/// Everything a presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    /// Visible tiles, bottom layer first
    pub tiles: Vec<TileView>,
    /// Dock contents in arrival order
    pub dock: Vec<TileId>,
    pub score: u32,
    pub coins: u32,
    pub combo: u32,
    pub combo_popup: Option<u32>,
    pub elapsed_seconds: u64,
    pub level: u32,
    pub difficulty: Difficulty,
    pub theme: Theme,
    pub language: Language,
    pub status: GameStatus,
    pub paused: bool,
    pub pending_action: Option<PaidAction>,
    pub in_flight: usize,
    pub history_depth: usize,
    pub commentary_live: bool,
    pub episode_id: u32,
    pub seed: u64,
}

impl GameSnapshot {
    pub fn won(&self) -> bool {
        self.status == GameStatus::Won
    }

    pub fn lost(&self) -> bool {
        self.status == GameStatus::Lost
    }

    pub fn dock_count(&self) -> usize {
        self.dock.len()
    }

    /// Accepting tile selections
    pub fn playable(&self) -> bool {
        !self.status.is_over() && !self.paused && self.pending_action.is_none()
    }
}

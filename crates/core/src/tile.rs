//! Tile module - the persistent per-tile record
//!
//! Transient annotations (hinted, in flight) are not stored here; the game
//! state tracks them with explicit expiry timers.

use crate::types::{Position, TileCategory, TileFace, TileId, TileLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub face: TileFace,
    pub pos: Position,
    /// False once matched away
    pub visible: bool,
    pub location: TileLocation,
}

impl Tile {
    /// A visible tile on the board
    pub fn new(id: TileId, face: TileFace, pos: Position) -> Self {
        Self {
            id,
            face,
            pos,
            visible: true,
            location: TileLocation::Board,
        }
    }

    pub fn category(&self) -> TileCategory {
        self.face.category()
    }

    pub fn is_on_board(&self) -> bool {
        self.visible && self.location == TileLocation::Board
    }

    pub fn is_in_dock(&self) -> bool {
        self.visible && self.location == TileLocation::Dock
    }

    /// Match-equivalence between two distinct tiles; a tile never matches itself
    pub fn matches(&self, other: &Tile) -> bool {
        self.id != other.id && self.face.matches(&other.face)
    }
}

//! Board module - the live tile collection for one level
//!
//! Holds every tile created at level start (matched tiles stay in the collection
//! with `visible = false`) plus the dock order. Tiles are kept sorted by
//! (z, y, x) so scans visit lower layers first.
//!
//! Invariants maintained by every mutation:
//! - each visible tile is either on the board or in the dock
//! - `dock` lists exactly the visible dock tiles, in arrival order
//! - no two tiles share a position

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use crate::access;
use crate::layout::{generate_layout_with, LayoutParams};
use crate::pairing::{deal, draw_pairs};
use crate::rng::GameRng;
use crate::tile::Tile;
use crate::types::{Difficulty, TileId, TileLocation, DOCK_CAPACITY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    tiles: Vec<Tile>,
    dock: ArrayVec<TileId, DOCK_CAPACITY>,
    /// Next id handed out by generation and shuffles
    next_id: u32,
}

/// What generation asked for versus what it delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    pub requested: usize,
    pub generated: usize,
}

impl GenerationReport {
    pub fn is_short(&self) -> bool {
        self.generated < self.requested
    }
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            dock: ArrayVec::new(),
            next_id: 0,
        }
    }

    /// Build a board from explicit tiles (tests, tools).
    ///
    /// Visible dock tiles beyond the dock capacity are moved back to the board.
    pub fn from_tiles(mut tiles: Vec<Tile>) -> Self {
        tiles.sort_by_key(|t| t.pos.sort_key());

        let mut dock = ArrayVec::new();
        for tile in tiles.iter_mut().filter(|t| t.is_in_dock()) {
            if dock.try_push(tile.id).is_err() {
                tile.location = TileLocation::Board;
            }
        }

        let next_id = tiles.iter().map(|t| t.id.0 + 1).max().unwrap_or(0);
        Self {
            tiles,
            dock,
            next_id,
        }
    }

    /// Generate the board for a level.
    ///
    /// Pairs are drawn first, the layout second; if the layout comes back short,
    /// whole pairs are dropped so the tile multiset still decomposes into pairs.
    pub fn generate(
        level: u32,
        difficulty: Difficulty,
        rng: &mut GameRng,
    ) -> (Self, GenerationReport) {
        Self::generate_with(level, difficulty, LayoutParams::for_difficulty(difficulty), rng)
    }

    /// Same as [`Board::generate`] with explicit layout parameters
    pub fn generate_with(
        level: u32,
        difficulty: Difficulty,
        params: LayoutParams,
        rng: &mut GameRng,
    ) -> (Self, GenerationReport) {
        let requested = difficulty.tile_count(level);

        let mut pairs = draw_pairs(requested / 2, rng);
        let positions = generate_layout_with(requested, params, rng);
        pairs.truncate(positions.len() / 2);

        let faces = deal(&pairs, rng);
        let tiles: Vec<Tile> = faces
            .into_iter()
            .zip(positions)
            .enumerate()
            .map(|(i, (face, pos))| Tile::new(TileId(i as u32), face, pos))
            .collect();

        let report = GenerationReport {
            requested,
            generated: tiles.len(),
        };
        if report.is_short() {
            warn!(
                level,
                difficulty = difficulty.as_str(),
                requested,
                generated = report.generated,
                "generated board is smaller than requested"
            );
        }

        (Self::from_tiles(tiles), report)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|t| t.id == id)
    }

    /// Visible tiles still on the board
    pub fn board_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_on_board())
    }

    /// Visible dock tiles in arrival order
    pub fn dock_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.dock.iter().filter_map(|id| self.get(*id))
    }

    pub fn dock_ids(&self) -> &[TileId] {
        &self.dock
    }

    pub fn dock_count(&self) -> usize {
        self.dock.len()
    }

    pub fn board_count(&self) -> usize {
        self.board_tiles().count()
    }

    pub fn visible_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.visible).count()
    }

    /// Board and dock are both empty
    pub fn is_cleared(&self) -> bool {
        self.visible_count() == 0
    }

    pub fn is_playable(&self, id: TileId) -> bool {
        self.get(id)
            .map(|t| access::is_playable(t, &self.tiles))
            .unwrap_or(false)
    }

    /// Move a board tile into the next dock slot
    pub fn move_to_dock(&mut self, id: TileId) -> bool {
        if self.dock.is_full() {
            return false;
        }
        let Some(tile) = self.get_mut(id) else {
            return false;
        };
        if !tile.is_on_board() {
            return false;
        }

        tile.location = TileLocation::Dock;
        self.dock.push(id);
        true
    }

    /// First dock tile (in arrival order) that matches `id`
    pub fn find_dock_match(&self, id: TileId) -> Option<TileId> {
        let tile = self.get(id)?;
        self.dock_tiles()
            .find(|other| tile.matches(other))
            .map(|other| other.id)
    }

    /// Any matching pair among the dock tiles
    pub fn dock_has_match(&self) -> bool {
        let docked: Vec<&Tile> = self.dock_tiles().collect();
        docked
            .iter()
            .enumerate()
            .any(|(i, a)| docked[i + 1..].iter().any(|b| a.matches(b)))
    }

    /// Match two tiles away: both become invisible and leave the dock
    pub fn remove_pair(&mut self, first: TileId, second: TileId) {
        for id in [first, second] {
            if let Some(tile) = self.get_mut(id) {
                tile.visible = false;
            }
        }
        self.dock.retain(|id| *id != first && *id != second);
    }

    /// Reassign faces among visible board tiles, keeping their positions.
    ///
    /// Each reshuffled tile gets a fresh id. Dock tiles and `excluded` tiles are untouched.
    /// Returns the number of tiles reshuffled.
    pub fn shuffle_faces(&mut self, rng: &mut GameRng, excluded: &[TileId]) -> usize {
        let eligible = |t: &Tile| t.is_on_board() && !excluded.contains(&t.id);

        let mut faces: Vec<_> = self
            .tiles
            .iter()
            .filter(|t| eligible(t))
            .map(|t| t.face)
            .collect();
        rng.shuffle(&mut faces);

        let mut next_id = self.next_id;
        let mut faces = faces.into_iter();
        for tile in self.tiles.iter_mut().filter(|t| eligible(t)) {
            if let Some(face) = faces.next() {
                tile.face = face;
                tile.id = TileId(next_id);
                next_id += 1;
            }
        }

        let shuffled = (next_id - self.next_id) as usize;
        self.next_id = next_id;
        debug!(shuffled, "shuffled board faces");
        shuffled
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

//! Accessibility module - which board tiles may currently be taken
//!
//! A tile is playable when it is visible, sits on the board, is not covered by a
//! tile one layer up whose footprint overlaps it, and is not pinned on both the
//! left and the right by same-layer neighbours.
//!
//! Every query scans the live tile slice; nothing is cached.

use crate::tile::Tile;
use crate::types::TileId;

/// Footprints overlap when both axes are closer than one full tile (2 units)
#[inline]
fn overlaps(a: &Tile, b: &Tile) -> bool {
    (a.pos.x - b.pos.x).abs() < 2 && (a.pos.y - b.pos.y).abs() < 2
}

/// Visible board tile one layer up with an overlapping footprint
pub fn is_covered(tile: &Tile, tiles: &[Tile]) -> bool {
    tiles
        .iter()
        .filter(|other| other.is_on_board())
        .any(|other| other.pos.z == tile.pos.z + 1 && overlaps(tile, other))
}

/// Blocked on the left (x - 2) and on the right (x + 2) at the same layer
pub fn is_pinned(tile: &Tile, tiles: &[Tile]) -> bool {
    let blocked = |dx: i16| {
        tiles.iter().filter(|other| other.is_on_board()).any(|other| {
            other.pos.z == tile.pos.z
                && other.pos.x == tile.pos.x + dx
                && (other.pos.y - tile.pos.y).abs() < 2
        })
    };

    blocked(-2) && blocked(2)
}

/// Core predicate: can the player take this tile right now?
pub fn is_playable(tile: &Tile, tiles: &[Tile]) -> bool {
    tile.is_on_board() && !is_covered(tile, tiles) && !is_pinned(tile, tiles)
}

/// All playable tiles, in slice order, skipping `excluded` ids
pub fn playable_tiles<'a>(tiles: &'a [Tile], excluded: &[TileId]) -> Vec<&'a Tile> {
    tiles
        .iter()
        .filter(|t| !excluded.contains(&t.id))
        .filter(|t| is_playable(t, tiles))
        .collect()
}

/// First matching pair among playable tiles, scanning pairwise in slice order
pub fn find_playable_pair(tiles: &[Tile], excluded: &[TileId]) -> Option<(TileId, TileId)> {
    let playable = playable_tiles(tiles, excluded);

    for (i, first) in playable.iter().enumerate() {
        if let Some(second) = playable[i + 1..].iter().find(|t| first.matches(t)) {
            return Some((first.id, second.id));
        }
    }

    None
}

//! Greedy auto-player used by the headless demo and the soak tests.

use vita_mahjong_core::access::playable_tiles;
use vita_mahjong_core::{find_playable_pair, GameState, Tile};
use vita_mahjong_types::{TileId, DOCK_CAPACITY};

/// Pick the next tile to select, or `None` when nothing can be selected.
///
/// Preference order: a tile completing a docked or in-flight tile, the first
/// half of a free pair (only with two slots open), then any free tile.
pub fn next_pick(game: &GameState) -> Option<TileId> {
    let board = game.board();
    let flying: Vec<TileId> = game.flights().iter().map(|f| f.tile).collect();

    let open_slots = DOCK_CAPACITY.saturating_sub(board.dock_count() + flying.len());
    if open_slots == 0 {
        return None;
    }

    let free = playable_tiles(board.tiles(), &flying);
    let waiting: Vec<&Tile> = board
        .dock_tiles()
        .chain(flying.iter().filter_map(|id| board.get(*id)))
        .collect();

    if let Some(tile) = free
        .iter()
        .find(|t| waiting.iter().any(|w| w.matches(t)))
    {
        return Some(tile.id);
    }

    if open_slots >= 2 {
        if let Some((first, _)) = find_playable_pair(board.tiles(), &flying) {
            return Some(first);
        }
    }

    free.first().map(|t| t.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vita_mahjong_types::{Difficulty, GameAction, FLIGHT_MS};

    #[test]
    fn test_pick_is_selectable() {
        let mut game = GameState::new(3, Difficulty::Easy);
        let pick = next_pick(&game).unwrap();
        assert!(game.is_playable(pick));
        assert_eq!(game.apply_action(GameAction::Select(pick)), Ok(true));
    }

    #[test]
    fn test_completes_docked_tile() {
        let mut game = GameState::new(3, Difficulty::Easy);
        let first = next_pick(&game).unwrap();
        game.select(first);
        game.tick(FLIGHT_MS);

        if let Some(pick) = next_pick(&game) {
            let docked = game.board().get(first).unwrap();
            let picked = game.board().get(pick).unwrap();
            let has_partner = playable_tiles(game.board().tiles(), &[])
                .iter()
                .any(|t| t.matches(docked));
            if has_partner {
                assert!(picked.matches(docked));
            }
        }
    }
}

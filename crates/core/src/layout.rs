//! Layout module - procedural placement of tiles on the half-tile grid
//!
//! Two strategies:
//!
//! - **Simple grid**: small Easy boards are laid out flat in one or two rows.
//! - **Pile**: a base layer is seeded on a near-square footprint with random gaps,
//!   then remaining tiles are stacked on top of random tiles (with probability
//!   `stacking_density`, up to `max_stack_layers`) or placed next to them on the table.
//!
//! Stacking is bounded by a retry ceiling, so the pile may come back shorter than
//! requested. Callers treat that as a best-effort result.

use std::collections::HashSet;

use tracing::warn;

use crate::rng::GameRng;
use crate::types::{
    Difficulty, Position, LAYOUT_RETRY_LIMIT, MAX_BASE_WIDTH, SIMPLE_GRID_MAX_TILES,
};

/// Planar neighbour offsets used when expanding the pile sideways
const NEIGHBOR_OFFSETS: [(i16, i16); 4] = [(2, 0), (-2, 0), (0, 2), (0, -2)];

/// Grid origin of the pile's base layer
const BASE_ORIGIN: (i16, i16) = (4, 2);

/// Probability that a base-layer cell is left empty once the base quota is met
const BASE_GAP_CHANCE: f64 = 0.2;

/// Generation parameters derived from a difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub max_stack_layers: u8,
    pub stacking_density: f64,
    /// Boards up to this size use the flat grid (0 disables it)
    pub simple_grid_max: usize,
    pub retry_limit: u32,
}

impl LayoutParams {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            max_stack_layers: difficulty.max_stack_layers(),
            stacking_density: difficulty.stacking_density(),
            simple_grid_max: match difficulty {
                Difficulty::Easy => SIMPLE_GRID_MAX_TILES,
                _ => 0,
            },
            retry_limit: LAYOUT_RETRY_LIMIT,
        }
    }
}

impl From<Difficulty> for LayoutParams {
    fn from(value: Difficulty) -> Self {
        Self::for_difficulty(value)
    }
}

/// Generate up to `count` distinct positions for the given difficulty
pub fn generate_layout(count: usize, difficulty: Difficulty, rng: &mut GameRng) -> Vec<Position> {
    generate_layout_with(count, LayoutParams::for_difficulty(difficulty), rng)
}

/// Generate up to `count` distinct positions with explicit parameters
pub fn generate_layout_with(
    count: usize,
    params: LayoutParams,
    rng: &mut GameRng,
) -> Vec<Position> {
    if count == 0 {
        return Vec::new();
    }

    let positions = if count <= params.simple_grid_max {
        simple_grid(count)
    } else {
        pile(count, params, rng)
    };

    if positions.len() < count {
        warn!(
            requested = count,
            placed = positions.len(),
            "layout retry budget exhausted"
        );
    }

    positions
}

/// One row up to 6 tiles, two rows beyond that, roughly centred
fn simple_grid(count: usize) -> Vec<Position> {
    let rows = if count <= 6 { 1 } else { 2 };
    let per_row = count.div_ceil(rows);
    let x_offset = 10 - per_row as i16;
    let y_offset = 4 - rows as i16;

    (0..count)
        .map(|i| {
            let row = (i / per_row) as i16;
            let col = (i % per_row) as i16;
            Position::new(col * 2 + x_offset, row * 2 + y_offset, 0)
        })
        .collect()
}

fn pile(count: usize, params: LayoutParams, rng: &mut GameRng) -> Vec<Position> {
    let mut positions: Vec<Position> = Vec::with_capacity(count);
    let mut occupied: HashSet<Position> = HashSet::with_capacity(count);

    let base_width = ((count as f64 * 1.5).sqrt().ceil() as usize).clamp(1, MAX_BASE_WIDTH);
    let base_height = count.div_ceil(base_width);
    let base_quota = count as f64 * (1.0 - params.stacking_density);

    let mut remaining = count;
    'base: for y in 0..base_height {
        for x in 0..base_width {
            if remaining == 0 {
                break 'base;
            }
            if remaining as f64 > base_quota || rng.next_f64() > BASE_GAP_CHANCE {
                let pos = Position::new(
                    x as i16 * 2 + BASE_ORIGIN.0,
                    y as i16 * 2 + BASE_ORIGIN.1,
                    0,
                );
                occupied.insert(pos);
                positions.push(pos);
                remaining -= 1;
            }
        }
    }

    let mut attempts = 0u32;
    while remaining > 0 && attempts < params.retry_limit {
        attempts += 1;

        let Some(&base) = rng.choose(&positions) else {
            break;
        };

        let can_stack =
            base.z < params.max_stack_layers && rng.chance(params.stacking_density);
        let above = Position::new(base.x, base.y, base.z + 1);

        let candidate = if can_stack && !occupied.contains(&above) {
            above
        } else {
            let (dx, dy) = NEIGHBOR_OFFSETS[rng.next_range(NEIGHBOR_OFFSETS.len())];
            Position::new(base.x + dx, base.y + dy, 0)
        };

        if occupied.insert(candidate) {
            positions.push(candidate);
            remaining -= 1;
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unique(positions: &[Position]) {
        let set: HashSet<_> = positions.iter().collect();
        assert_eq!(set.len(), positions.len(), "duplicate position in layout");
    }

    #[test]
    fn test_easy_level_one_is_two_flat_rows() {
        let mut rng = GameRng::new(1);
        let positions = generate_layout(12, Difficulty::Easy, &mut rng);

        assert_eq!(positions.len(), 12);
        assert!(positions.iter().all(|p| p.z == 0));

        let rows: HashSet<i16> = positions.iter().map(|p| p.y).collect();
        assert_eq!(rows.len(), 2);
        assert_unique(&positions);
    }

    #[test]
    fn test_simple_grid_geometry() {
        let positions = simple_grid(12);
        // 6 per row, offset 10 - 6 = 4; two rows, offset 4 - 2 = 2.
        assert_eq!(positions[0], Position::new(4, 2, 0));
        assert_eq!(positions[5], Position::new(14, 2, 0));
        assert_eq!(positions[6], Position::new(4, 4, 0));
    }

    #[test]
    fn test_simple_grid_single_row() {
        let positions = simple_grid(6);
        assert!(positions.iter().all(|p| p.y == 3));
        assert_eq!(positions.len(), 6);
    }

    #[test]
    fn test_pile_respects_count_and_uniqueness() {
        for difficulty in Difficulty::ALL {
            let mut rng = GameRng::new(42);
            let count = difficulty.tile_count(3);
            let positions = generate_layout(count, difficulty, &mut rng);

            assert!(positions.len() <= count);
            assert_unique(&positions);
        }
    }

    #[test]
    fn test_stack_height_bounded_by_difficulty() {
        for difficulty in Difficulty::ALL {
            for seed in 0..10 {
                let mut rng = GameRng::new(seed);
                let positions = generate_layout(difficulty.tile_count(5), difficulty, &mut rng);
                let max_z = positions.iter().map(|p| p.z).max().unwrap_or(0);
                assert!(max_z <= difficulty.max_stack_layers());
            }
        }
    }

    #[test]
    fn test_stacked_tiles_rest_on_tiles() {
        let mut rng = GameRng::new(9);
        let positions = generate_layout(96, Difficulty::Nightmare, &mut rng);
        let set: HashSet<_> = positions.iter().copied().collect();

        for p in positions.iter().filter(|p| p.z > 0) {
            assert!(set.contains(&Position::new(p.x, p.y, p.z - 1)));
        }
    }

    #[test]
    fn test_dense_difficulty_produces_stacks() {
        let stacked = (0..20u64).any(|seed| {
            let mut rng = GameRng::new(seed);
            generate_layout(144, Difficulty::Nightmare, &mut rng)
                .iter()
                .any(|p| p.z > 0)
        });
        assert!(stacked);
    }

    #[test]
    fn test_retry_exhaustion_truncates() {
        let params = LayoutParams {
            max_stack_layers: 0,
            stacking_density: 0.0,
            simple_grid_max: 0,
            retry_limit: 0,
        };
        let mut rng = GameRng::new(3);
        let positions = generate_layout_with(100, params, &mut rng);

        assert!(positions.len() < 100);
        assert!(!positions.is_empty());
        assert_unique(&positions);
    }

    #[test]
    fn test_zero_count() {
        let mut rng = GameRng::new(1);
        assert!(generate_layout(0, Difficulty::Hard, &mut rng).is_empty());
    }
}

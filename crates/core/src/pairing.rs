//! Pairing module - draws a tile multiset that always splits into matching pairs
//!
//! The reference deck is shuffled, then scanned greedily: each unused tile is
//! paired with the earliest later unused tile it matches. Because every face
//! class in the deck has an even size, the scan only runs short when more pairs
//! are requested than the deck holds (72).

use tracing::warn;

use crate::deck::reference_deck;
use crate::rng::GameRng;
use crate::types::TileFace;

/// Draw up to `pair_count` matching pairs from a freshly shuffled deck.
///
/// Pairs are returned in the order they were found.
pub fn draw_pairs(pair_count: usize, rng: &mut GameRng) -> Vec<(TileFace, TileFace)> {
    let mut deck = reference_deck();
    rng.shuffle(&mut deck);

    let mut used = vec![false; deck.len()];
    let mut pairs = Vec::with_capacity(pair_count.min(deck.len() / 2));

    for i in 0..deck.len() {
        if pairs.len() >= pair_count {
            break;
        }
        if used[i] {
            continue;
        }

        let first = deck[i];
        let partner = (i + 1..deck.len()).find(|&j| !used[j] && first.matches(&deck[j]));

        if let Some(j) = partner {
            used[i] = true;
            used[j] = true;
            pairs.push((first, deck[j]));
        }
    }

    if pairs.len() < pair_count {
        warn!(
            requested = pair_count,
            drawn = pairs.len(),
            "reference deck exhausted before reaching requested pair count"
        );
    }

    pairs
}

/// Flatten pairs and shuffle so array adjacency carries no pairing information
pub fn deal(pairs: &[(TileFace, TileFace)], rng: &mut GameRng) -> Vec<TileFace> {
    let mut faces: Vec<TileFace> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
    rng.shuffle(&mut faces);
    faces
}

/// Sample `count` tiles (rounded down to even) that decompose into matching pairs
pub fn sample_pairs(count: usize, rng: &mut GameRng) -> Vec<TileFace> {
    let pairs = draw_pairs(count / 2, rng);
    deal(&pairs, rng)
}

/// Check that a multiset of faces splits completely into matching pairs.
///
/// Regular faces must appear an even number of times; flowers and seasons
/// only need an even count per category.
pub fn decomposes_into_pairs(faces: &[TileFace]) -> bool {
    use std::collections::HashMap;

    let mut counts: HashMap<TileFace, usize> = HashMap::new();
    let mut bonus: HashMap<crate::types::TileCategory, usize> = HashMap::new();

    for face in faces {
        let category = face.category();
        if category.is_bonus() {
            *bonus.entry(category).or_default() += 1;
        } else {
            *counts.entry(*face).or_default() += 1;
        }
    }

    counts.values().all(|n| n % 2 == 0) && bonus.values().all(|n| n % 2 == 0)
}

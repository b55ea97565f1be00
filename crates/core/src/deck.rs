//! Deck module - the fixed 144-tile reference deck
//!
//! Order is deterministic: suited ranks 1-9 (four copies each, dots/bamboo/characters
//! interleaved), then winds, dragons, flowers and seasons.

use crate::types::{Dragon, TileFace, Wind, DECK_SIZE};

/// Build the reference deck
pub fn reference_deck() -> Vec<TileFace> {
    let mut deck = Vec::with_capacity(DECK_SIZE);

    for rank in 1..=9u8 {
        for _ in 0..4 {
            deck.push(TileFace::Dots(rank));
            deck.push(TileFace::Bamboo(rank));
            deck.push(TileFace::Characters(rank));
        }
    }
    for wind in Wind::ALL {
        deck.extend(std::iter::repeat(TileFace::Wind(wind)).take(4));
    }
    for dragon in Dragon::ALL {
        deck.extend(std::iter::repeat(TileFace::Dragon(dragon)).take(4));
    }
    deck.extend((1..=4).map(TileFace::Flower));
    deck.extend((1..=4).map(TileFace::Season));

    deck
}

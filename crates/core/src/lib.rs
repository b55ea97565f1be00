//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the board generation engine and the dock/match state
//! machine layered on top of it. It has **no dependencies** on rendering,
//! networking or I/O:
//!
//! - **Deterministic**: the same seed produces the same deck, layout and shuffles
//! - **Solvable by construction**: every generated board splits into matching pairs
//! - **Portable**: runs headless, behind the TCP adapter, or inside tests
//!
//! # Module Structure
//!
//! - [`deck`]: the fixed 144-tile reference deck
//! - [`pairing`]: greedy pair sampler over a shuffled deck
//! - [`layout`]: procedural placement on the half-tile grid
//! - [`access`]: the covered / pinned playability rule
//! - [`board`]: live tile collection plus dock order
//! - [`game_state`]: selection, flights, matching, combos, paid actions, levels
//! - [`history`]: bounded undo ring
//! - [`scoring`]: match points and the combo window
//! - [`economy`]: coin wallet
//! - [`ports`]: advice and live-commentary collaborator traits
//! - [`rng`]: seeded ChaCha RNG
//! - [`snapshot`]: presentation view of the state
//!
//! # Example
//!
//! ```
//! use vita_mahjong_core::GameState;
//! use vita_mahjong_types::{Difficulty, GameAction, PaidAction, FLIGHT_MS};
//!
//! let mut game = GameState::new(12345, Difficulty::Easy);
//! assert_eq!(game.board().tiles().len(), 12);
//!
//! // Pick any free tile and let it fly into the dock.
//! let tile = game.snapshot().tiles.iter().find(|t| t.playable).unwrap().id;
//! assert_eq!(game.apply_action(GameAction::Select(tile)), Ok(true));
//! game.tick(FLIGHT_MS);
//! assert_eq!(game.board().dock_count(), 1);
//!
//! // Paid actions go through a confirmation gate.
//! game.apply_action(GameAction::Request(PaidAction::Undo)).unwrap();
//! game.apply_action(GameAction::Confirm).unwrap();
//! assert_eq!(game.board().dock_count(), 0);
//! ```
//!
//! # Timing
//!
//! Hosts call [`GameState::tick`](game_state::GameState::tick) every frame
//! (`TICK_MS`, 16ms). Flights land after 300ms, hints clear after 3s and the
//! combo popup after 1s.

pub mod access;
pub mod board;
pub mod deck;
pub mod economy;
pub mod error;
pub mod game_state;
pub mod history;
pub mod layout;
pub mod pairing;
pub mod ports;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod tile;

pub use vita_mahjong_types as types;

// Re-export commonly used types for convenience
pub use access::{find_playable_pair, is_playable};
pub use board::{Board, GenerationReport};
pub use deck::reference_deck;
pub use economy::Wallet;
pub use error::ActionError;
pub use game_state::{Flight, GameState};
pub use history::UndoHistory;
pub use layout::{generate_layout, LayoutParams};
pub use pairing::{decomposes_into_pairs, sample_pairs};
pub use ports::{advice_or_default, forward_commentary, AdviceError, AdviceSource, CommentarySink};
pub use rng::GameRng;
pub use scoring::{match_score, ComboTracker};
pub use snapshot::{GameSnapshot, TileView};
pub use tile::Tile;

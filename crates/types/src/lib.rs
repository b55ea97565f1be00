//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, remote presentation, tests).
//!
//! # Grid Units
//!
//! Tile positions live on a half-tile grid:
//!
//! - **x / y**: 2 grid units = 1 full tile width / height
//! - **z**: stacking layer, 0 is the table
//!
//! Two tiles whose `|dx| < 2` and `|dy| < 2` overlap in footprint.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `FLIGHT_MS` | 300 | Board-to-dock flight duration |
//! | `COMBO_WINDOW_MS` | 3000 | Max gap between matches to extend a combo |
//! | `HINT_DURATION_MS` | 3000 | How long a hinted pair stays highlighted |
//! | `COMBO_POPUP_MS` | 1000 | How long a combo popup stays visible |
//!
//! # Economy
//!
//! | Constant | Value |
//! |----------|-------|
//! | `STARTING_COINS` | 10000 |
//! | `MATCH_COIN_REWARD` | 50 |
//! | `LEVEL_COIN_REWARD` | 1000 |
//! | Undo / Hint / Shuffle cost | 2000 / 2000 / 3000 |
//!
//! # Examples
//!
//! ```
//! use vita_mahjong_types::{Difficulty, PaidAction, TileFace, Wind, DOCK_CAPACITY};
//!
//! let difficulty = Difficulty::from_str("hard").unwrap();
//! assert_eq!(difficulty.max_stack_layers(), 4);
//! assert_eq!(difficulty.tile_count(1), 24);
//!
//! assert!(TileFace::Flower(1).matches(&TileFace::Flower(3)));
//! assert!(!TileFace::Wind(Wind::East).matches(&TileFace::Wind(Wind::West)));
//!
//! assert_eq!(PaidAction::Shuffle.cost(), 3000);
//! assert_eq!(DOCK_CAPACITY, 4);
//! ```

use std::fmt;

/// Number of tiles in the reference deck
pub const DECK_SIZE: usize = 144;

/// Number of slots in the holding dock
pub const DOCK_CAPACITY: usize = 4;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Duration of a tile's flight from the board to the dock
pub const FLIGHT_MS: u32 = 300;

/// Two matches closer than this extend the running combo
pub const COMBO_WINDOW_MS: u64 = 3000;

/// Hinted tiles are highlighted for this long
pub const HINT_DURATION_MS: u32 = 3000;

/// Combo popup lifetime
pub const COMBO_POPUP_MS: u32 = 1000;

/// Number of pre-move snapshots kept for undo
pub const UNDO_HISTORY_CAPACITY: usize = 5;

/// Hard ceiling on stacking attempts in the procedural layout
pub const LAYOUT_RETRY_LIMIT: u32 = 2000;

/// Widest base layer the procedural layout will seed (in tiles)
pub const MAX_BASE_WIDTH: usize = 10;

/// Easy boards up to this many tiles use the flat two-row grid
pub const SIMPLE_GRID_MAX_TILES: usize = 12;

/// Points for one match before the combo multiplier
pub const MATCH_BASE_SCORE: u32 = 100;

/// Coins awarded for each match
pub const MATCH_COIN_REWARD: u32 = 50;

/// Coins awarded when advancing to the next level
pub const LEVEL_COIN_REWARD: u32 = 1000;

/// Coin balance at the start of a session
pub const STARTING_COINS: u32 = 10_000;

/// Score deducted when an undo restores a snapshot
pub const UNDO_SCORE_PENALTY: u32 = 50;

/// Score deducted when a hint finds a pair
pub const HINT_SCORE_PENALTY: u32 = 200;

/// Score deducted by a shuffle (only when the score can cover it)
pub const SHUFFLE_SCORE_PENALTY: u32 = 100;


/// Tile categories of the reference deck
///
/// - **Dots / Bamboo / Characters**: suited, ranks 1-9
/// - **Wind**: East, South, West, North
/// - **Dragon**: Red, Green, White
/// - **Flower / Season**: bonus tiles, any two of the same category match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileCategory {
    Dots,
    Bamboo,
    Characters,
    Wind,
    Dragon,
    Flower,
    Season,
}

impl TileCategory {
    pub const ALL: [TileCategory; 7] = [
        TileCategory::Dots,
        TileCategory::Bamboo,
        TileCategory::Characters,
        TileCategory::Wind,
        TileCategory::Dragon,
        TileCategory::Flower,
        TileCategory::Season,
    ];

    /// Parse category from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use vita_mahjong_types::TileCategory;
    ///
    /// assert_eq!(TileCategory::from_str("dots"), Some(TileCategory::Dots));
    /// assert_eq!(TileCategory::from_str("CHAR"), Some(TileCategory::Characters));
    /// assert_eq!(TileCategory::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dots" => Some(TileCategory::Dots),
            "bamboo" => Some(TileCategory::Bamboo),
            "characters" | "char" => Some(TileCategory::Characters),
            "wind" => Some(TileCategory::Wind),
            "dragon" => Some(TileCategory::Dragon),
            "flower" => Some(TileCategory::Flower),
            "season" => Some(TileCategory::Season),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TileCategory::Dots => "dots",
            TileCategory::Bamboo => "bamboo",
            TileCategory::Characters => "characters",
            TileCategory::Wind => "wind",
            TileCategory::Dragon => "dragon",
            TileCategory::Flower => "flower",
            TileCategory::Season => "season",
        }
    }

    /// Flowers and seasons match anything of their own category
    pub fn is_bonus(&self) -> bool {
        matches!(self, TileCategory::Flower | TileCategory::Season)
    }

    pub fn is_suited(&self) -> bool {
        matches!(
            self,
            TileCategory::Dots | TileCategory::Bamboo | TileCategory::Characters
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Wind {
    East,
    South,
    West,
    North,
}

impl Wind {
    pub const ALL: [Wind; 4] = [Wind::East, Wind::South, Wind::West, Wind::North];

    pub fn code(&self) -> &'static str {
        match self {
            Wind::East => "E",
            Wind::South => "S",
            Wind::West => "W",
            Wind::North => "N",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dragon {
    Red,
    Green,
    White,
}

impl Dragon {
    pub const ALL: [Dragon; 3] = [Dragon::Red, Dragon::Green, Dragon::White];

    pub fn code(&self) -> &'static str {
        match self {
            Dragon::Red => "R",
            Dragon::Green => "G",
            Dragon::White => "Wh",
        }
    }
}

const RANK_CODES: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// The printed face of a tile: category plus value
///
/// Suited ranks are 1-9; flower and season numbers are 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileFace {
    Dots(u8),
    Bamboo(u8),
    Characters(u8),
    Wind(Wind),
    Dragon(Dragon),
    Flower(u8),
    Season(u8),
}

impl TileFace {
    pub fn category(&self) -> TileCategory {
        match self {
            TileFace::Dots(_) => TileCategory::Dots,
            TileFace::Bamboo(_) => TileCategory::Bamboo,
            TileFace::Characters(_) => TileCategory::Characters,
            TileFace::Wind(_) => TileCategory::Wind,
            TileFace::Dragon(_) => TileCategory::Dragon,
            TileFace::Flower(_) => TileCategory::Flower,
            TileFace::Season(_) => TileCategory::Season,
        }
    }

    /// Numeric value for suited and bonus tiles
    pub fn rank(&self) -> Option<u8> {
        match *self {
            TileFace::Dots(r)
            | TileFace::Bamboo(r)
            | TileFace::Characters(r)
            | TileFace::Flower(r)
            | TileFace::Season(r) => Some(r),
            TileFace::Wind(_) | TileFace::Dragon(_) => None,
        }
    }

    /// Short value code ("1".."9", "E", "R", "Wh", ...)
    pub fn value_code(&self) -> &'static str {
        match self {
            TileFace::Wind(w) => w.code(),
            TileFace::Dragon(d) => d.code(),
            _ => self
                .rank()
                .and_then(|r| RANK_CODES.get(r as usize).copied())
                .unwrap_or("?"),
        }
    }

    /// Match-equivalence rule on faces alone.
    ///
    /// Same category, and either a bonus category or an identical value.
    pub fn matches(&self, other: &TileFace) -> bool {
        let category = self.category();
        if category != other.category() {
            return false;
        }
        category.is_bonus() || self == other
    }
}

impl fmt::Display for TileFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category().as_str(), self.value_code())
    }
}

/// Unique tile identity within a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl TileId {
    /// Parse "tile-N" or a bare "N"
    pub fn from_str(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("tile-").unwrap_or(s);
        digits.parse::<u32>().ok().map(TileId)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile-{}", self.0)
    }
}

/// Grid position in half-tile units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i16,
    pub y: i16,
    pub z: u8,
}

impl Position {
    pub const fn new(x: i16, y: i16, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Render order: bottom layer first, then rows, then columns
    pub fn sort_key(&self) -> (u8, i16, i16) {
        (self.z, self.y, self.x)
    }
}

/// Where a visible tile currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileLocation {
    Board,
    Dock,
}

impl TileLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileLocation::Board => "board",
            TileLocation::Dock => "dock",
        }
    }
}

/// Difficulty presets
///
/// | Difficulty | Base tiles | Per level | Max layers | Density |
/// |------------|-----------|-----------|------------|---------|
/// | Easy | 12 | +2 | 1 | 0.1 |
/// | Medium | 16 | +4 | 2 | 0.3 |
/// | Hard | 24 | +8 | 4 | 0.5 |
/// | Nightmare | 36 | +12 | 6 | 0.7 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Nightmare,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "nightmare" => Some(Difficulty::Nightmare),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Nightmare => "nightmare",
        }
    }

    /// Highest layer a tile may be stacked onto
    pub fn max_stack_layers(&self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 4,
            Difficulty::Nightmare => 6,
        }
    }

    /// Probability of stacking on top instead of expanding sideways
    pub fn stacking_density(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.1,
            Difficulty::Medium => 0.3,
            Difficulty::Hard => 0.5,
            Difficulty::Nightmare => 0.7,
        }
    }

    pub fn base_tile_count(&self) -> usize {
        match self {
            Difficulty::Easy => 12,
            Difficulty::Medium => 16,
            Difficulty::Hard => 24,
            Difficulty::Nightmare => 36,
        }
    }

    pub fn tiles_per_level(&self) -> usize {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 8,
            Difficulty::Nightmare => 12,
        }
    }

    /// Requested tile count for a level, rounded up to even
    pub fn tile_count(&self, level: u32) -> usize {
        let steps = level.max(1) as usize - 1;
        let count = self.base_tile_count() + steps * self.tiles_per_level();
        count + count % 2
    }
}

/// Visual theme (pure configuration)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Classic,
    Wood,
    Ocean,
    Night,
}

impl Theme {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Theme::Classic),
            "wood" => Some(Theme::Wood),
            "ocean" => Some(Theme::Ocean),
            "night" => Some(Theme::Night),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Wood => "wood",
            Theme::Ocean => "ocean",
            Theme::Night => "night",
        }
    }
}

/// UI / collaborator language (pure configuration)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    Uz,
    #[default]
    Ru,
    En,
}

impl Language {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uz" => Some(Language::Uz),
            "ru" => Some(Language::Ru),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Uz => "uz",
            Language::Ru => "ru",
            Language::En => "en",
        }
    }
}

/// Actions that cost coins and pass through the confirmation gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaidAction {
    Undo,
    Hint,
    Shuffle,
}

impl PaidAction {
    pub fn cost(&self) -> u32 {
        match self {
            PaidAction::Undo => 2000,
            PaidAction::Hint => 2000,
            PaidAction::Shuffle => 3000,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "undo" => Some(PaidAction::Undo),
            "hint" => Some(PaidAction::Hint),
            "shuffle" => Some(PaidAction::Shuffle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaidAction::Undo => "undo",
            PaidAction::Hint => "hint",
            PaidAction::Shuffle => "shuffle",
        }
    }
}

/// Player inputs that can be applied to the game state
///
/// These are used by the host loop and the remote protocol alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Send a board tile towards the dock
    Select(TileId),
    /// Open the confirmation gate for a costed action
    Request(PaidAction),
    /// Pay for and execute the pending action
    Confirm,
    /// Close the confirmation gate without paying
    Cancel,
    /// Toggle the game clock pause (modal open/closed)
    Pause,
    /// Start over from level 1
    Restart,
    /// Regenerate the current level
    RetryLevel,
    /// Advance after a win
    NextLevel,
    SetDifficulty(Difficulty),
    SetLanguage(Language),
    SetTheme(Theme),
}

impl GameAction {
    /// Parse a parameterless action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use vita_mahjong_types::{GameAction, PaidAction};
    ///
    /// assert_eq!(GameAction::from_str("confirm"), Some(GameAction::Confirm));
    /// assert_eq!(GameAction::from_str("hint"), Some(GameAction::Request(PaidAction::Hint)));
    /// assert_eq!(GameAction::from_str("nextLevel"), Some(GameAction::NextLevel));
    /// assert_eq!(GameAction::from_str("select"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        if let Some(paid) = PaidAction::from_str(s) {
            return Some(GameAction::Request(paid));
        }
        match s.to_lowercase().as_str() {
            "confirm" => Some(GameAction::Confirm),
            "cancel" => Some(GameAction::Cancel),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            "retry" | "retrylevel" => Some(GameAction::RetryLevel),
            "nextlevel" => Some(GameAction::NextLevel),
            _ => None,
        }
    }

    /// Convert to camelCase string for the remote protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Select(_) => "select",
            GameAction::Request(paid) => paid.as_str(),
            GameAction::Confirm => "confirm",
            GameAction::Cancel => "cancel",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
            GameAction::RetryLevel => "retry",
            GameAction::NextLevel => "nextLevel",
            GameAction::SetDifficulty(_) => "difficulty",
            GameAction::SetLanguage(_) => "language",
            GameAction::SetTheme(_) => "theme",
        }
    }
}

/// Global game status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }

    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

/// Core-side event emitted on state transitions.
///
/// Drained by the host and mapped to protocol messages and commentary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    LevelStarted {
        level: u32,
        difficulty: Difficulty,
        tiles: usize,
    },
    /// Layout or pairing delivered fewer tiles than requested
    GenerationShortfall {
        requested: usize,
        generated: usize,
    },
    Selected {
        tile: TileId,
    },
    Landed {
        tile: TileId,
    },
    Matched {
        first: TileId,
        second: TileId,
        combo: u32,
        points: u32,
    },
    Won {
        level: u32,
        score: u32,
    },
    Lost {
        level: u32,
    },
    HintShown {
        first: TileId,
        second: TileId,
    },
    NoHintAvailable,
    Shuffled {
        tiles: usize,
    },
    Undone,
}

impl GameEvent {
    /// Short line for the live commentary collaborator, if this event warrants one
    pub fn commentary(&self) -> Option<String> {
        match self {
            GameEvent::Matched { combo, .. } if *combo > 1 => {
                Some(format!("Player got a Combo x{}! Praise them!", combo))
            }
            GameEvent::Won { .. } => {
                Some("Player won the level! Congratulate them enthusiastically!".to_string())
            }
            GameEvent::Lost { .. } => {
                Some("Player lost the game. Offer kind consolation.".to_string())
            }
            _ => None,
        }
    }
}

//! Game state module - the dock/match state machine
//!
//! Ties together the board, undo history, combo tracker and wallet. All
//! mutations go through this type, one at a time:
//!
//! - [`GameState::select`] sends a playable tile into flight
//! - [`GameState::tick`] advances timers and lands flights ([`GameState::arrive`])
//! - [`GameState::request`] / [`GameState::confirm`] / [`GameState::cancel`] drive
//!   the coin gate in front of undo, hint and shuffle
//!
//! Invalid inputs are ignored and reported as `false`; only an unaffordable
//! request is an error.

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::access::find_playable_pair;
use crate::board::Board;
use crate::economy::Wallet;
use crate::error::ActionError;
use crate::history::UndoHistory;
use crate::rng::GameRng;
use crate::scoring::{match_score, ComboTracker};
use crate::snapshot::{GameSnapshot, TileView};
use crate::types::*;

/// A tile on its way from the board to the dock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flight {
    pub tile: TileId,
    pub remaining_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hint {
    first: TileId,
    second: TileId,
    remaining_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ComboPopup {
    combo: u32,
    remaining_ms: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    history: UndoHistory,
    rng: GameRng,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
    level: u32,
    difficulty: Difficulty,
    language: Language,
    theme: Theme,
    commentary_live: bool,
    score: u32,
    wallet: Wallet,
    combo: ComboTracker,
    combo_popup: Option<ComboPopup>,
    flights: ArrayVec<Flight, DOCK_CAPACITY>,
    hint: Option<Hint>,
    pending: Option<PaidAction>,
    paused: bool,
    status: GameStatus,
    /// Always advancing; drives the combo window
    now_ms: u64,
    /// Level clock, frozen while paused, gated or over
    elapsed_ms: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game at level 1 with the given RNG seed
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        Self::with_rng(GameRng::new(seed), difficulty)
    }

    pub fn with_rng(rng: GameRng, difficulty: Difficulty) -> Self {
        let mut state = Self::blank(rng, difficulty);
        state.start_level(1);
        state
    }

    /// Start from a prepared board instead of a generated one
    pub fn with_board(board: Board) -> Self {
        let mut state = Self::blank(GameRng::default(), Difficulty::default());
        state.board = board;
        state
    }

    fn blank(rng: GameRng, difficulty: Difficulty) -> Self {
        Self {
            board: Board::new(),
            history: UndoHistory::new(),
            rng,
            episode_id: 0,
            level: 1,
            difficulty,
            language: Language::default(),
            theme: Theme::default(),
            commentary_live: false,
            score: 0,
            wallet: Wallet::default(),
            combo: ComboTracker::new(),
            combo_popup: None,
            flights: ArrayVec::new(),
            hint: None,
            pending: None,
            paused: false,
            status: GameStatus::Playing,
            now_ms: 0,
            elapsed_ms: 0,
            events: Vec::new(),
        }
    }

    fn start_level(&mut self, level: u32) {
        let level = level.max(1);
        let (board, report) = Board::generate(level, self.difficulty, &mut self.rng);

        self.board = board;
        self.level = level;
        self.history.clear();
        self.combo.reset();
        self.combo_popup = None;
        self.flights.clear();
        self.hint = None;
        self.pending = None;
        self.paused = false;
        self.status = GameStatus::Playing;
        self.elapsed_ms = 0;

        if report.is_short() {
            self.events.push(GameEvent::GenerationShortfall {
                requested: report.requested,
                generated: report.generated,
            });
        }
        self.events.push(GameEvent::LevelStarted {
            level,
            difficulty: self.difficulty,
            tiles: report.generated,
        });
        info!(
            level,
            difficulty = self.difficulty.as_str(),
            tiles = report.generated,
            "level started"
        );
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn commentary_live(&self) -> bool {
        self.commentary_live
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn coins(&self) -> u32 {
        self.wallet.balance()
    }

    pub fn combo(&self) -> u32 {
        self.combo.combo()
    }

    /// Combo value currently on the popup, if any
    pub fn combo_popup(&self) -> Option<u32> {
        self.combo_popup.map(|p| p.combo)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_won(&self) -> bool {
        self.status == GameStatus::Won
    }

    pub fn is_lost(&self) -> bool {
        self.status == GameStatus::Lost
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn pending_action(&self) -> Option<PaidAction> {
        self.pending
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_ms / 1000
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn is_flying(&self, id: TileId) -> bool {
        self.flights.iter().any(|f| f.tile == id)
    }

    pub fn hinted_pair(&self) -> Option<(TileId, TileId)> {
        self.hint.map(|h| (h.first, h.second))
    }

    pub fn is_hinted(&self, id: TileId) -> bool {
        self.hint.is_some_and(|h| h.first == id || h.second == id)
    }

    /// Playable on the board and not already in flight
    pub fn is_playable(&self, id: TileId) -> bool {
        !self.is_flying(id) && self.board.is_playable(id)
    }

    fn flying_ids(&self) -> ArrayVec<TileId, DOCK_CAPACITY> {
        self.flights.iter().map(|f| f.tile).collect()
    }

    /// Drain recorded events (consumed by the host)
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Send a board tile towards the dock
    pub fn select(&mut self, id: TileId) -> bool {
        if self.status.is_over() || self.pending.is_some() || self.paused {
            debug!(tile = %id, "select ignored: input blocked");
            return false;
        }
        if !self.is_playable(id) {
            debug!(tile = %id, "select ignored: tile not playable");
            return false;
        }
        if self.board.dock_count() + self.flights.len() >= DOCK_CAPACITY {
            debug!(tile = %id, "select ignored: dock full");
            return false;
        }

        self.history.push(self.board.clone());
        self.flights.push(Flight {
            tile: id,
            remaining_ms: FLIGHT_MS,
        });
        if self.is_hinted(id) {
            self.hint = None;
        }
        self.events.push(GameEvent::Selected { tile: id });
        true
    }

    /// Land a tile that is in flight: dock it, resolve a match, check for the end
    pub fn arrive(&mut self, id: TileId) -> bool {
        let Some(index) = self.flights.iter().position(|f| f.tile == id) else {
            return false;
        };
        self.flights.remove(index);

        if !self.board.move_to_dock(id) {
            return false;
        }
        self.events.push(GameEvent::Landed { tile: id });

        if let Some(partner) = self.board.find_dock_match(id) {
            self.board.remove_pair(partner, id);

            let combo = self.combo.register_match(self.now_ms);
            let points = match_score(combo);
            self.score = self.score.saturating_add(points);
            self.wallet.earn(MATCH_COIN_REWARD);

            if combo > 1 {
                self.combo_popup = Some(ComboPopup {
                    combo,
                    remaining_ms: COMBO_POPUP_MS,
                });
            }
            if self.is_hinted(id) || self.is_hinted(partner) {
                self.hint = None;
            }

            self.events.push(GameEvent::Matched {
                first: partner,
                second: id,
                combo,
                points,
            });
        }

        self.check_terminal();
        true
    }

    fn check_terminal(&mut self) {
        if self.board.is_cleared() {
            self.status = GameStatus::Won;
            self.events.push(GameEvent::Won {
                level: self.level,
                score: self.score,
            });
            info!(level = self.level, score = self.score, "level won");
        } else if self.board.dock_count() >= DOCK_CAPACITY && !self.board.dock_has_match() {
            self.status = GameStatus::Lost;
            self.events.push(GameEvent::Lost { level: self.level });
            info!(level = self.level, score = self.score, "game lost");
        }
    }

    /// Advance every timer by `elapsed_ms`. Returns true if anything visible changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        self.now_ms += u64::from(elapsed_ms);
        let mut changed = false;

        // Land expired flights in the order their timers ran out.
        let mut landed: ArrayVec<(u32, TileId), DOCK_CAPACITY> = ArrayVec::new();
        for flight in self.flights.iter_mut() {
            if flight.remaining_ms <= elapsed_ms {
                landed.push((flight.remaining_ms, flight.tile));
            } else {
                flight.remaining_ms -= elapsed_ms;
            }
        }
        landed.sort_by_key(|(remaining, _)| *remaining);
        for (_, tile) in landed {
            changed |= self.arrive(tile);
        }

        if let Some(hint) = self.hint.as_mut() {
            hint.remaining_ms = hint.remaining_ms.saturating_sub(elapsed_ms);
            if hint.remaining_ms == 0 {
                self.hint = None;
                changed = true;
            }
        }

        if let Some(popup) = self.combo_popup.as_mut() {
            popup.remaining_ms = popup.remaining_ms.saturating_sub(elapsed_ms);
            if popup.remaining_ms == 0 {
                self.combo_popup = None;
                changed = true;
            }
        }

        if !self.status.is_over() && !self.paused && self.pending.is_none() {
            let before = self.elapsed_seconds();
            self.elapsed_ms += u64::from(elapsed_ms);
            changed |= self.elapsed_seconds() != before;
        }

        changed
    }

    /// Open the confirmation gate for a paid action.
    ///
    /// `Ok(false)` when the request is ignored (gate already open, nothing to act on).
    pub fn request(&mut self, action: PaidAction) -> Result<bool, ActionError> {
        if self.pending.is_some() {
            debug!(action = action.as_str(), "request ignored: gate already open");
            return Ok(false);
        }
        let applicable = match self.status {
            GameStatus::Playing => true,
            GameStatus::Lost => action == PaidAction::Undo,
            GameStatus::Won => false,
        };
        if !applicable {
            debug!(action = action.as_str(), status = self.status.as_str(), "request ignored");
            return Ok(false);
        }
        let available = match action {
            PaidAction::Undo => !self.history.is_empty(),
            PaidAction::Hint => self.hint.is_none(),
            PaidAction::Shuffle => true,
        };
        if !available {
            debug!(action = action.as_str(), "request ignored: nothing to act on");
            return Ok(false);
        }

        self.wallet.check(action)?;
        self.pending = Some(action);
        Ok(true)
    }

    /// Pay for and run the pending action. The charge stands even if a hint
    /// finds no pair or a shuffle has nothing to move.
    pub fn confirm(&mut self) -> Result<bool, ActionError> {
        let Some(action) = self.pending.take() else {
            return Ok(false);
        };

        let balance = self.wallet.try_spend(action)?;
        debug!(action = action.as_str(), balance, "paid action confirmed");

        match action {
            PaidAction::Undo => self.undo(),
            PaidAction::Hint => self.hint(),
            PaidAction::Shuffle => self.shuffle(),
        };
        Ok(true)
    }

    /// Close the gate without paying
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Restore the most recent pre-selection snapshot
    pub fn undo(&mut self) -> bool {
        if self.is_won() {
            return false;
        }
        let Some(previous) = self.history.pop() else {
            return false;
        };

        self.board = previous;
        self.flights.clear();
        self.hint = None;
        self.combo.reset();
        self.combo_popup = None;
        self.status = GameStatus::Playing;
        self.score = self.score.saturating_sub(UNDO_SCORE_PENALTY);
        self.events.push(GameEvent::Undone);
        true
    }

    /// Highlight the first playable matching pair
    pub fn hint(&mut self) -> bool {
        let excluded = self.flying_ids();
        match find_playable_pair(self.board.tiles(), &excluded) {
            Some((first, second)) => {
                self.hint = Some(Hint {
                    first,
                    second,
                    remaining_ms: HINT_DURATION_MS,
                });
                self.score = self.score.saturating_sub(HINT_SCORE_PENALTY);
                self.events.push(GameEvent::HintShown { first, second });
                true
            }
            None => {
                self.events.push(GameEvent::NoHintAvailable);
                false
            }
        }
    }

    /// Reassign faces among the board tiles that are not in flight
    pub fn shuffle(&mut self) -> bool {
        if self.status.is_over() {
            return false;
        }
        let excluded = self.flying_ids();
        let tiles = self.board.shuffle_faces(&mut self.rng, &excluded);
        if tiles == 0 {
            return false;
        }

        self.hint = None;
        if self.score >= SHUFFLE_SCORE_PENALTY {
            self.score -= SHUFFLE_SCORE_PENALTY;
        }
        self.events.push(GameEvent::Shuffled { tiles });
        true
    }

    /// Start over from level 1 with a zero score
    pub fn restart(&mut self) -> bool {
        self.episode_id = self.episode_id.wrapping_add(1);
        self.score = 0;
        self.start_level(1);
        true
    }

    /// Regenerate the current level, keeping coins. Level 1 starts from a zero score.
    pub fn retry_level(&mut self) -> bool {
        if self.level == 1 {
            self.score = 0;
        }
        self.start_level(self.level);
        true
    }

    /// Advance after a win
    pub fn next_level(&mut self) -> bool {
        if !self.is_won() {
            return false;
        }
        self.wallet.earn(LEVEL_COIN_REWARD);
        self.start_level(self.level + 1);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        true
    }

    /// Takes effect at the next level start
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        let changed = self.difficulty != difficulty;
        self.difficulty = difficulty;
        changed
    }

    pub fn set_language(&mut self, language: Language) -> bool {
        let changed = self.language != language;
        self.language = language;
        changed
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        let changed = self.theme != theme;
        self.theme = theme;
        changed
    }

    pub fn set_commentary_live(&mut self, live: bool) -> bool {
        let changed = self.commentary_live != live;
        self.commentary_live = live;
        changed
    }

    /// Apply a player action. Returns whether it had an effect.
    pub fn apply_action(&mut self, action: GameAction) -> Result<bool, ActionError> {
        let applied = match action {
            GameAction::Select(id) => self.select(id),
            GameAction::Request(paid) => return self.request(paid),
            GameAction::Confirm => return self.confirm(),
            GameAction::Cancel => self.cancel(),
            GameAction::Pause => self.toggle_pause(),
            GameAction::Restart => self.restart(),
            GameAction::RetryLevel => self.retry_level(),
            GameAction::NextLevel => self.next_level(),
            GameAction::SetDifficulty(d) => self.set_difficulty(d),
            GameAction::SetLanguage(l) => self.set_language(l),
            GameAction::SetTheme(t) => self.set_theme(t),
        };
        Ok(applied)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let tiles = self
            .board
            .tiles()
            .iter()
            .filter(|t| t.visible)
            .map(|t| TileView {
                id: t.id,
                face: t.face,
                x: t.pos.x,
                y: t.pos.y,
                z: t.pos.z,
                location: t.location,
                hinted: self.is_hinted(t.id),
                flying: self.is_flying(t.id),
                playable: self.is_playable(t.id),
            })
            .collect();

        GameSnapshot {
            tiles,
            dock: self.board.dock_ids().to_vec(),
            score: self.score,
            coins: self.wallet.balance(),
            combo: self.combo.combo(),
            combo_popup: self.combo_popup(),
            elapsed_seconds: self.elapsed_seconds(),
            level: self.level,
            difficulty: self.difficulty,
            theme: self.theme,
            language: self.language,
            status: self.status,
            paused: self.paused,
            pending_action: self.pending,
            in_flight: self.flights.len(),
            history_depth: self.history.len(),
            commentary_live: self.commentary_live,
            episode_id: self.episode_id,
            seed: self.rng.seed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tile;

    /// Flat row of tiles spaced far apart (every tile playable)
    fn spread(faces: &[TileFace]) -> GameState {
        let tiles = faces
            .iter()
            .enumerate()
            .map(|(i, f)| Tile::new(TileId(i as u32), *f, Position::new(i as i16 * 10, 0, 0)))
            .collect();
        GameState::with_board(Board::from_tiles(tiles))
    }

    fn land_all(state: &mut GameState) {
        state.tick(FLIGHT_MS);
    }

    #[test]
    fn test_new_game_starts_level_one() {
        let mut state = GameState::new(12345, Difficulty::Easy);
        assert_eq!(state.level(), 1);
        assert_eq!(state.board().tiles().len(), 12);
        assert_eq!(state.coins(), STARTING_COINS);
        assert_eq!(state.status(), GameStatus::Playing);

        let events = state.take_events();
        assert!(matches!(events[0], GameEvent::LevelStarted { level: 1, tiles: 12, .. }));
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_select_then_land() {
        let mut state = spread(&[TileFace::Dots(1), TileFace::Dots(2)]);
        assert!(state.select(TileId(0)));
        assert!(state.is_flying(TileId(0)));
        assert!(!state.is_playable(TileId(0)));
        assert!(!state.select(TileId(0)));
        assert_eq!(state.board().dock_count(), 0);

        state.tick(FLIGHT_MS - 1);
        assert!(state.is_flying(TileId(0)));

        state.tick(1);
        assert!(!state.is_flying(TileId(0)));
        assert_eq!(state.board().dock_ids(), &[TileId(0)]);
    }

    #[test]
    fn test_match_scores_and_pays() {
        let mut state = spread(&[TileFace::Dots(1), TileFace::Dots(1), TileFace::Dots(2), TileFace::Dots(2)]);
        state.select(TileId(0));
        state.select(TileId(1));
        land_all(&mut state);

        assert_eq!(state.board().visible_count(), 2);
        assert_eq!(state.board().dock_count(), 0);
        assert_eq!(state.combo(), 1);
        assert_eq!(state.score(), 100);
        assert_eq!(state.coins(), STARTING_COINS + MATCH_COIN_REWARD);
    }

    #[test]
    fn test_combo_within_window() {
        let mut state = spread(&[
            TileFace::Dots(1),
            TileFace::Dots(1),
            TileFace::Dots(2),
            TileFace::Dots(2),
            TileFace::Dots(3),
        ]);
        state.select(TileId(0));
        state.select(TileId(1));
        land_all(&mut state);

        state.tick(1_000);
        state.select(TileId(2));
        state.select(TileId(3));
        land_all(&mut state);

        assert_eq!(state.combo(), 2);
        assert_eq!(state.score(), 100 + 200);
        assert_eq!(state.combo_popup(), Some(2));

        state.tick(COMBO_POPUP_MS);
        assert_eq!(state.combo_popup(), None);
    }

    #[test]
    fn test_combo_resets_after_window() {
        let mut state = spread(&[
            TileFace::Dots(1),
            TileFace::Dots(1),
            TileFace::Dots(2),
            TileFace::Dots(2),
            TileFace::Dots(3),
        ]);
        state.select(TileId(0));
        state.select(TileId(1));
        land_all(&mut state);

        state.tick(COMBO_WINDOW_MS as u32);
        state.select(TileId(2));
        state.select(TileId(3));
        land_all(&mut state);

        assert_eq!(state.combo(), 1);
        assert_eq!(state.score(), 200);
    }

    #[test]
    fn test_win_when_everything_cleared() {
        let mut state = spread(&[TileFace::Flower(1), TileFace::Flower(2)]);
        state.select(TileId(0));
        state.select(TileId(1));
        land_all(&mut state);

        assert!(state.is_won());
        assert!(state.take_events().iter().any(|e| matches!(e, GameEvent::Won { .. })));
        assert!(!state.select(TileId(0)));
    }

    #[test]
    fn test_lose_on_full_dock_without_match() {
        let mut state = spread(&[
            TileFace::Dots(1),
            TileFace::Dots(2),
            TileFace::Dots(3),
            TileFace::Dots(4),
            TileFace::Dots(1),
            TileFace::Dots(2),
            TileFace::Dots(3),
            TileFace::Dots(4),
        ]);
        for i in 0..3 {
            state.select(TileId(i));
        }
        land_all(&mut state);
        assert_eq!(state.status(), GameStatus::Playing);

        state.select(TileId(3));
        land_all(&mut state);
        assert!(state.is_lost());
        assert!(!state.is_won());
    }

    #[test]
    fn test_dock_capacity_counts_flights() {
        let mut state = spread(&[TileFace::Dots(1); 6]);
        for i in 0..4 {
            assert!(state.select(TileId(i)));
        }
        assert!(!state.select(TileId(4)));
        assert_eq!(state.flights().len(), 4);
    }

    #[test]
    fn test_flying_tile_still_obstructs() {
        let tiles = vec![
            Tile::new(TileId(0), TileFace::Dots(1), Position::new(0, 0, 0)),
            Tile::new(TileId(1), TileFace::Dots(2), Position::new(0, 0, 1)),
        ];
        let mut state = GameState::with_board(Board::from_tiles(tiles));
        assert!(!state.is_playable(TileId(0)));

        state.select(TileId(1));
        assert!(!state.is_playable(TileId(0)));
        land_all(&mut state);
        assert!(state.is_playable(TileId(0)));
    }

    #[test]
    fn test_undo_restores_pre_selection_board() {
        let mut state = spread(&[TileFace::Dots(1), TileFace::Dots(1), TileFace::Dots(2), TileFace::Dots(2)]);
        let before = state.board().clone();

        state.select(TileId(0));
        land_all(&mut state);
        assert_eq!(state.history_len(), 1);

        assert!(state.undo());
        assert_eq!(state.board(), &before);
        assert_eq!(state.history_len(), 0);
        assert!(!state.undo());
    }

    #[test]
    fn test_undo_clears_flights_and_lost() {
        let mut state = spread(&[
            TileFace::Dots(1),
            TileFace::Dots(2),
            TileFace::Dots(3),
            TileFace::Dots(4),
            TileFace::Dots(1),
            TileFace::Dots(2),
            TileFace::Dots(3),
            TileFace::Dots(4),
        ]);
        for i in 0..3 {
            state.select(TileId(i));
        }
        land_all(&mut state);
        state.select(TileId(3));
        land_all(&mut state);
        assert!(state.is_lost());

        assert!(state.undo());
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.board().dock_count(), 3);
        assert!(state.flights().is_empty());
    }

    #[test]
    fn test_undo_noop_after_win() {
        let mut state = spread(&[TileFace::Season(1), TileFace::Season(4)]);
        state.select(TileId(0));
        state.select(TileId(1));
        land_all(&mut state);
        assert!(state.is_won());
        assert!(!state.undo());
    }

    #[test]
    fn test_hint_marks_pair_then_expires() {
        let mut state = spread(&[TileFace::Dots(5), TileFace::Dots(6), TileFace::Dots(5)]);
        state.score = 500;

        assert!(state.hint());
        assert_eq!(state.hinted_pair(), Some((TileId(0), TileId(2))));
        assert_eq!(state.score(), 300);

        state.tick(HINT_DURATION_MS - 16);
        assert!(state.is_hinted(TileId(0)));
        state.tick(16);
        assert_eq!(state.hinted_pair(), None);
    }

    #[test]
    fn test_hint_none_available() {
        let mut state = spread(&[TileFace::Dots(5), TileFace::Dots(6)]);
        state.score = 500;
        assert!(!state.hint());
        assert_eq!(state.score(), 500);
        assert_eq!(state.take_events(), vec![GameEvent::NoHintAvailable]);
    }

    #[test]
    fn test_hint_skips_flying_tiles() {
        let mut state = spread(&[TileFace::Dots(5), TileFace::Dots(5), TileFace::Dots(5), TileFace::Dots(5)]);
        state.select(TileId(0));
        assert!(state.hint());
        assert_eq!(state.hinted_pair(), Some((TileId(1), TileId(2))));
    }

    #[test]
    fn test_shuffle_keeps_flights_and_dock() {
        let mut state = GameState::new(5, Difficulty::Medium);
        let playable: Vec<TileId> = state
            .board()
            .board_tiles()
            .filter(|t| state.is_playable(t.id))
            .map(|t| t.id)
            .take(2)
            .collect();
        state.select(playable[0]);
        land_all(&mut state);
        state.select(playable[1]);

        let visible = state.board().visible_count();
        assert!(state.shuffle());
        assert_eq!(state.board().visible_count(), visible);
        assert!(state.is_flying(playable[1]));
        assert!(state.board().get(playable[1]).is_some());
        assert!(state.board().dock_ids().iter().all(|id| state.board().get(*id).is_some()));
    }

    #[test]
    fn test_shuffle_penalty_only_when_affordable() {
        let mut state = spread(&[TileFace::Dots(5), TileFace::Dots(6)]);
        state.score = 99;
        assert!(state.shuffle());
        assert_eq!(state.score(), 99);

        state.score = 150;
        assert!(state.shuffle());
        assert_eq!(state.score(), 50);
    }

    #[test]
    fn test_gate_request_confirm_cancel() {
        let mut state = spread(&[TileFace::Dots(5), TileFace::Dots(5)]);

        assert_eq!(state.request(PaidAction::Hint), Ok(true));
        assert_eq!(state.pending_action(), Some(PaidAction::Hint));
        // Second request and selection are ignored while the gate is open.
        assert_eq!(state.request(PaidAction::Shuffle), Ok(false));
        assert!(!state.select(TileId(0)));

        assert_eq!(state.confirm(), Ok(true));
        assert_eq!(state.coins(), STARTING_COINS - 2000);
        assert!(state.hinted_pair().is_some());
        assert_eq!(state.pending_action(), None);

        assert_eq!(state.request(PaidAction::Shuffle), Ok(true));
        assert!(state.cancel());
        assert_eq!(state.coins(), STARTING_COINS - 2000);
        assert_eq!(state.confirm(), Ok(false));
    }

    #[test]
    fn test_insufficient_coins() {
        let mut state = spread(&[TileFace::Dots(5), TileFace::Dots(5)]);
        state.wallet = Wallet::new(2500);

        let err = state.request(PaidAction::Shuffle).unwrap_err();
        assert_eq!(
            err,
            ActionError::InsufficientCoins {
                action: PaidAction::Shuffle,
                cost: 3000,
                balance: 2500,
            }
        );
        assert_eq!(state.pending_action(), None);
        assert_eq!(state.coins(), 2500);
    }

    #[test]
    fn test_request_ignored_when_nothing_to_act_on() {
        let mut state = spread(&[TileFace::Dots(5), TileFace::Dots(5)]);

        // Empty history: undo never opens the gate.
        assert_eq!(state.request(PaidAction::Undo), Ok(false));
        assert_eq!(state.pending_action(), None);
        assert_eq!(state.confirm(), Ok(false));
        assert_eq!(state.coins(), STARTING_COINS);

        // A hint already showing blocks another one.
        assert!(state.hint());
        assert_eq!(state.request(PaidAction::Hint), Ok(false));
        assert_eq!(state.confirm(), Ok(false));
        assert_eq!(state.coins(), STARTING_COINS);

        // Once it expires the request goes through again.
        state.tick(HINT_DURATION_MS);
        assert_eq!(state.request(PaidAction::Hint), Ok(true));
    }

    #[test]
    fn test_selecting_hinted_tile_clears_hint() {
        let mut state = spread(&[TileFace::Dots(5), TileFace::Dots(6), TileFace::Dots(5)]);
        assert!(state.hint());
        assert_eq!(state.hinted_pair(), Some((TileId(0), TileId(2))));

        assert!(state.select(TileId(0)));
        assert_eq!(state.hinted_pair(), None);
        assert!(state.snapshot().tiles.iter().all(|t| !t.hinted));

        land_all(&mut state);
        let docked = state.snapshot().tiles.into_iter().find(|t| t.id == TileId(0)).unwrap();
        assert_eq!(docked.location, TileLocation::Dock);
        assert!(!docked.hinted);
    }

    #[test]
    fn test_selecting_other_tile_keeps_hint() {
        let mut state = spread(&[TileFace::Dots(5), TileFace::Dots(6), TileFace::Dots(5)]);
        assert!(state.hint());
        assert!(state.select(TileId(1)));
        assert_eq!(state.hinted_pair(), Some((TileId(0), TileId(2))));
    }

    #[test]
    fn test_clock_pauses() {
        let mut state = spread(&[TileFace::Dots(5), TileFace::Dots(5)]);
        state.tick(1_000);
        assert_eq!(state.elapsed_seconds(), 1);

        state.toggle_pause();
        state.tick(5_000);
        assert_eq!(state.elapsed_seconds(), 1);
        state.toggle_pause();

        state.request(PaidAction::Hint).unwrap();
        state.tick(5_000);
        assert_eq!(state.elapsed_seconds(), 1);
        state.cancel();

        state.tick(1_000);
        assert_eq!(state.elapsed_seconds(), 2);
        assert_eq!(state.now_ms(), 12_000);
    }

    #[test]
    fn test_next_level_only_after_win() {
        let mut state = GameState::new(3, Difficulty::Easy);
        assert!(!state.next_level());

        state.status = GameStatus::Won;
        let coins = state.coins();
        assert!(state.next_level());
        assert_eq!(state.level(), 2);
        assert_eq!(state.board().tiles().len(), 14);
        assert_eq!(state.coins(), coins + LEVEL_COIN_REWARD);
        assert_eq!(state.status(), GameStatus::Playing);
    }

    #[test]
    fn test_restart_and_retry() {
        let mut state = GameState::new(3, Difficulty::Easy);
        state.score = 700;
        state.level = 3;

        assert!(state.retry_level());
        assert_eq!(state.level(), 3);
        assert_eq!(state.score(), 700);
        assert_eq!(state.board().tiles().len(), 16);

        assert!(state.restart());
        assert_eq!(state.level(), 1);
        assert_eq!(state.score(), 0);
        assert_eq!(state.episode_id(), 1);
    }

    #[test]
    fn test_retry_level_one_resets_score() {
        let mut state = GameState::new(3, Difficulty::Easy);
        state.score = 400;
        let coins = state.coins();

        assert!(state.retry_level());
        assert_eq!(state.level(), 1);
        assert_eq!(state.score(), 0);
        assert_eq!(state.coins(), coins);
        assert_eq!(state.episode_id(), 0);
    }

    #[test]
    fn test_difficulty_applies_next_level() {
        let mut state = GameState::new(3, Difficulty::Easy);
        assert!(state.set_difficulty(Difficulty::Hard));
        assert_eq!(state.board().tiles().len(), 12);
        state.retry_level();
        assert_eq!(state.board().tiles().len(), 24);
    }

    #[test]
    fn test_apply_action_dispatch() {
        let mut state = spread(&[TileFace::Dots(5), TileFace::Dots(5)]);
        assert_eq!(state.apply_action(GameAction::Select(TileId(0))), Ok(true));
        assert_eq!(state.apply_action(GameAction::Request(PaidAction::Undo)), Ok(true));
        assert_eq!(state.apply_action(GameAction::Cancel), Ok(true));
        assert_eq!(state.apply_action(GameAction::SetTheme(Theme::Night)), Ok(true));
        assert_eq!(state.theme(), Theme::Night);
        assert_eq!(state.apply_action(GameAction::NextLevel), Ok(false));
    }

    #[test]
    fn test_snapshot_views() {
        let mut state = spread(&[TileFace::Dots(5), TileFace::Dots(6), TileFace::Dots(5)]);
        state.select(TileId(1));
        state.hint();

        let snap = state.snapshot();
        assert_eq!(snap.tiles.len(), 3);
        assert_eq!(snap.in_flight, 1);
        assert_eq!(snap.history_depth, 1);

        let flying = snap.tiles.iter().find(|t| t.id == TileId(1)).unwrap();
        assert!(flying.flying);
        assert!(!flying.playable);

        let hinted: Vec<_> = snap.tiles.iter().filter(|t| t.hinted).map(|t| t.id).collect();
        assert_eq!(hinted, vec![TileId(0), TileId(2)]);
    }
}

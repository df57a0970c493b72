//! Player-facing session: selection state machine, move budget, scoring,
//! and the event feed a host renders from.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH, MIN_RUN, MOVES_BUDGET, PALETTE_SIZE};
use crate::matches::find_matches;
use crate::moves;
use crate::resolve::{self, ResolveOutcome};
use crate::tile::{Special, TileKind};

/// Session parameters. Defaults mirror the classic game: a 7x7 board of
/// six kinds and twenty moves.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    pub palette_size: usize,
    pub moves_budget: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            palette_size: PALETTE_SIZE,
            moves_budget: MOVES_BUDGET,
        }
    }
}

impl SessionConfig {
    /// The ordinary kinds in play, as a prefix of [`TileKind::ALL`].
    /// Clamped to at least 3 kinds; with fewer, the no-initial-run
    /// generator can paint itself into a corner with no legal kind left
    /// for a cell.
    pub fn palette(&self) -> &'static [TileKind] {
        let len = self.palette_size.clamp(3, TileKind::ALL.len());
        &TileKind::ALL[..len]
    }

    /// Board dimensions as (height, width), each floored at [`MIN_RUN`]
    /// cells. Below the floor a board can fall short of hosting any run
    /// at all, and the playable-opening loops in [`Session::new`] and
    /// [`Session::reset`] would regenerate forever.
    pub fn dims(&self) -> (usize, usize) {
        (self.height.max(MIN_RUN), self.width.max(MIN_RUN))
    }
}

/// What a player action changed, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// New total score. Emitted only when the action actually scored.
    ScoreChanged(u32),
    /// Moves remaining after a consumed move.
    MovesChanged(u32),
    /// The move budget hit zero; carries the final score.
    GameOver(u32),
}

/// Lifetime counters for one session, accumulated across resolutions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStats {
    pub effective_swaps: u32,
    pub rejected_swaps: u32,
    pub manual_triggers: u32,
    pub total_passes: u32,
    pub longest_cascade: u32,
    pub ordinary_cleared: u32,
    pub specials_cleared: u32,
    pub bombs_spawned: u32,
    pub rainbows_spawned: u32,
    pub wasted_rainbows: u32,
    pub reshuffles: u32,
    pub boards_regenerated: u32,
}

impl SessionStats {
    fn absorb(&mut self, outcome: &ResolveOutcome) {
        self.total_passes += outcome.passes;
        self.longest_cascade = self.longest_cascade.max(outcome.passes);
        self.ordinary_cleared += outcome.ordinary_cleared;
        self.specials_cleared += outcome.specials_cleared;
        self.bombs_spawned += outcome.bombs_spawned;
        self.rainbows_spawned += outcome.rainbows_spawned;
        self.wasted_rainbows += outcome.wasted_rainbows;
        self.reshuffles += outcome.reshuffles;
        self.boards_regenerated += outcome.boards_regenerated;
    }
}

/// One game in progress. Drive it with [`Session::select_cell`] and read
/// the board back through [`Session::board_snapshot`] (or the `board`
/// field directly) after each event batch.
#[derive(Debug, Clone)]
pub struct Session {
    pub board: Board,
    pub config: SessionConfig,
    pub score: u32,
    pub moves_remaining: u32,
    /// First cell of a pending swap, if the player has tapped one.
    pub selection: Option<(usize, usize)>,
    /// Reentrancy latch; taps arriving while a resolution is in flight
    /// are dropped.
    pub busy: bool,
    pub game_over: bool,
    pub stats: SessionStats,
}

impl Session {
    /// Start a session on a fresh board that is guaranteed playable.
    /// Generation never leaves a pre-made match, so nothing scores at
    /// move zero.
    pub fn new<R: Rng>(config: SessionConfig, rng: &mut R) -> Self {
        let palette = config.palette();
        let (height, width) = config.dims();
        let mut board = Board::generate(height, width, palette, rng);
        while !moves::has_possible_move(&board) {
            board.regenerate(palette, rng);
        }
        Session {
            board,
            config,
            score: 0,
            moves_remaining: config.moves_budget,
            selection: None,
            busy: false,
            game_over: false,
            stats: SessionStats::default(),
        }
    }

    /// Restart in place: fresh playable board, zeroed score, full move
    /// budget. The tile id sequence keeps counting.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        let palette = self.config.palette();
        self.board.regenerate(palette, rng);
        while !moves::has_possible_move(&self.board) {
            self.board.regenerate(palette, rng);
        }
        self.score = 0;
        self.moves_remaining = self.config.moves_budget;
        self.selection = None;
        self.busy = false;
        self.game_over = false;
        self.stats = SessionStats::default();
    }

    /// Handle one tap. Returns the events it produced, in order. Taps
    /// that cannot apply (mid-resolution, after game over, out of
    /// bounds) return nothing and change nothing.
    ///
    /// Tap grammar: first tap selects; tapping the selection again
    /// triggers it if special, deselects if ordinary; tapping an
    /// adjacent cell attempts the swap; tapping anywhere else moves the
    /// selection.
    pub fn select_cell<R: Rng>(
        &mut self,
        row: usize,
        col: usize,
        rng: &mut R,
    ) -> Vec<SessionEvent> {
        if self.busy || self.game_over || !self.board.in_bounds(row, col) {
            return Vec::new();
        }
        match self.selection {
            None => {
                self.selection = Some((row, col));
                Vec::new()
            }
            Some(sel) if sel == (row, col) => {
                let is_special = self
                    .board
                    .tile(row, col)
                    .is_some_and(|t| t.is_special());
                if is_special {
                    self.trigger_special(row, col, rng)
                } else {
                    self.selection = None;
                    Vec::new()
                }
            }
            Some(sel) if adjacent(sel, (row, col)) => self.attempt_swap(sel, (row, col), rng),
            Some(_) => {
                self.selection = Some((row, col));
                Vec::new()
            }
        }
    }

    /// Swap two adjacent cells and judge the result. Effective swaps
    /// (a match formed, or a special moved) consume a move and resolve;
    /// ineffective swaps are reverted free of charge.
    fn attempt_swap<R: Rng>(
        &mut self,
        a: (usize, usize),
        b: (usize, usize),
        rng: &mut R,
    ) -> Vec<SessionEvent> {
        self.selection = None;
        self.board.swap(a, b);

        let groups = find_matches(&self.board);
        let a_special = self.board.tile(a.0, a.1).is_some_and(|t| t.is_special());
        let b_special = self.board.tile(b.0, b.1).is_some_and(|t| t.is_special());

        if groups.is_empty() && !a_special && !b_special {
            self.board.swap(a, b);
            self.stats.rejected_swaps += 1;
            return Vec::new();
        }

        self.busy = true;
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
        self.stats.effective_swaps += 1;

        // A swapped special detonates at its new position.
        let mut manual = Vec::new();
        if a_special {
            manual.push(a);
        }
        if b_special {
            manual.push(b);
        }

        let outcome = resolve::settle(
            &mut self.board,
            groups,
            manual,
            Some((a, b)),
            self.config.palette(),
            rng,
        );
        self.finish_resolution(outcome)
    }

    /// Double-tapped special: consume a move and detonate it in place.
    fn trigger_special<R: Rng>(
        &mut self,
        row: usize,
        col: usize,
        rng: &mut R,
    ) -> Vec<SessionEvent> {
        self.selection = None;
        self.busy = true;
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
        self.stats.manual_triggers += 1;

        let outcome = resolve::settle(
            &mut self.board,
            Vec::new(),
            vec![(row, col)],
            None,
            self.config.palette(),
            rng,
        );
        self.finish_resolution(outcome)
    }

    /// Book the outcome and emit events. Game over is only evaluated
    /// here, after the cascade has fully settled.
    fn finish_resolution(&mut self, outcome: ResolveOutcome) -> Vec<SessionEvent> {
        self.score += outcome.score_delta;
        self.stats.absorb(&outcome);

        let mut events = Vec::new();
        if outcome.score_delta > 0 {
            events.push(SessionEvent::ScoreChanged(self.score));
        }
        events.push(SessionEvent::MovesChanged(self.moves_remaining));
        if self.moves_remaining == 0 {
            self.game_over = true;
            events.push(SessionEvent::GameOver(self.score));
        }
        self.busy = false;
        events
    }

    /// Cell-by-cell view for hosts that render the board.
    pub fn board_snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            width: self.board.width,
            height: self.board.height,
            cells: self
                .board
                .grid
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| {
                            cell.map(|t| TileView {
                                kind: t.kind,
                                special: t.special,
                            })
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

fn adjacent(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

/// Serializable snapshot of the visible board state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major. `None` marks an empty cell, which a settled board
    /// never has.
    pub cells: Vec<Vec<Option<TileView>>>,
}

/// What a host needs to draw one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub kind: TileKind,
    pub special: Option<Special>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session_with_board(board: Board, palette_size: usize) -> Session {
        let config = SessionConfig {
            width: board.width,
            height: board.height,
            palette_size,
            ..Default::default()
        };
        Session {
            board,
            config,
            score: 0,
            moves_remaining: config.moves_budget,
            selection: None,
            busy: false,
            game_over: false,
            stats: SessionStats::default(),
        }
    }

    fn board_ids(board: &Board) -> Vec<Option<u64>> {
        board
            .grid
            .iter()
            .flatten()
            .map(|cell| cell.map(|t| t.id))
            .collect()
    }

    #[test]
    fn test_new_session_starts_clean_and_playable() {
        let mut rng = StdRng::seed_from_u64(42);
        let session = Session::new(SessionConfig::default(), &mut rng);

        assert_eq!(session.score, 0);
        assert_eq!(session.moves_remaining, 20);
        assert!(!session.game_over);
        assert!(session.selection.is_none());
        assert!(find_matches(&session.board).is_empty());
        assert!(moves::has_possible_move(&session.board));
        for r in 0..7 {
            for c in 0..7 {
                assert!(session.board.tile(r, c).is_some());
            }
        }
    }

    #[test]
    fn test_degenerate_dimensions_are_clamped() {
        // A 2x2 request has no room for a run of three, so without the
        // floor no regeneration would ever produce a playable board.
        let mut rng = StdRng::seed_from_u64(42);
        let config = SessionConfig {
            width: 2,
            height: 2,
            palette_size: 3,
            ..Default::default()
        };

        let session = Session::new(config, &mut rng);

        assert_eq!(session.board.height, 3);
        assert_eq!(session.board.width, 3);
        assert!(moves::has_possible_move(&session.board));
        assert!(find_matches(&session.board).is_empty());
    }

    #[test]
    fn test_dims_floor_applies_per_axis() {
        let config = SessionConfig {
            width: 10,
            height: 1,
            ..Default::default()
        };
        assert_eq!(config.dims(), (3, 10));
        assert_eq!(SessionConfig::default().dims(), (7, 7));
    }

    #[test]
    fn test_first_tap_selects() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut session = Session::new(SessionConfig::default(), &mut rng);

        let events = session.select_cell(2, 3, &mut rng);

        assert!(events.is_empty());
        assert_eq!(session.selection, Some((2, 3)));
    }

    #[test]
    fn test_second_tap_on_same_ordinary_cell_deselects() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut session = Session::new(SessionConfig::default(), &mut rng);

        session.select_cell(2, 3, &mut rng);
        let events = session.select_cell(2, 3, &mut rng);

        assert!(events.is_empty());
        assert_eq!(session.selection, None);
        assert_eq!(session.moves_remaining, 20);
    }

    #[test]
    fn test_nonadjacent_tap_moves_the_selection() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut session = Session::new(SessionConfig::default(), &mut rng);

        session.select_cell(0, 0, &mut rng);
        let events = session.select_cell(4, 4, &mut rng);

        assert!(events.is_empty());
        assert_eq!(session.selection, Some((4, 4)));
    }

    #[test]
    fn test_out_of_bounds_tap_is_ignored() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut session = Session::new(SessionConfig::default(), &mut rng);

        session.select_cell(1, 1, &mut rng);
        let events = session.select_cell(99, 0, &mut rng);

        assert!(events.is_empty());
        assert_eq!(session.selection, Some((1, 1)));
    }

    #[test]
    fn test_busy_session_drops_taps() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut session = Session::new(SessionConfig::default(), &mut rng);
        session.busy = true;

        let events = session.select_cell(2, 2, &mut rng);

        assert!(events.is_empty());
        assert_eq!(session.selection, None);
    }

    #[test]
    fn test_ineffective_swap_is_a_free_rollback() {
        // Rotated-row latin square: no swap anywhere can line up three.
        let board = Board::from_rows(&["AGOL", "GOLA", "OLAG", "LAGO"]);
        let mut session = session_with_board(board, 3);
        let ids_before = board_ids(&session.board);
        let mut rng = StdRng::seed_from_u64(42);

        session.select_cell(0, 0, &mut rng);
        let events = session.select_cell(0, 1, &mut rng);

        assert!(events.is_empty());
        assert_eq!(session.moves_remaining, 20);
        assert_eq!(session.score, 0);
        assert_eq!(session.selection, None);
        assert_eq!(session.stats.rejected_swaps, 1);
        assert_eq!(board_ids(&session.board), ids_before);
    }

    #[test]
    fn test_effective_swap_scores_and_consumes_a_move() {
        // Swapping (2,0) and (2,1) lines up lemons down column 0. The
        // palette is disjoint from the board's kinds, so at least the
        // original 30 points are guaranteed; refill cascades only add.
        let board = Board::from_rows(&["LMC", "LCM", "MLC"]);
        let mut session = session_with_board(board, 3);
        let mut rng = StdRng::seed_from_u64(42);

        session.select_cell(2, 0, &mut rng);
        let events = session.select_cell(2, 1, &mut rng);

        assert_eq!(session.moves_remaining, 19);
        assert!(session.score >= 30);
        assert_eq!(session.stats.effective_swaps, 1);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], SessionEvent::ScoreChanged(session.score));
        assert_eq!(events[1], SessionEvent::MovesChanged(19));
    }

    #[test]
    fn test_double_tap_detonates_a_special() {
        let board = Board::from_rows(&["BGOL", "GOLA", "OLAG", "LAGO"]);
        let mut session = session_with_board(board, 3);
        let bomb_id = session.board.tile(0, 0).unwrap().id;
        let mut rng = StdRng::seed_from_u64(42);

        session.select_cell(0, 0, &mut rng);
        let events = session.select_cell(0, 0, &mut rng);

        // Corner blast: the bomb plus its three neighbors.
        assert!(session.score >= 80);
        assert_eq!(session.moves_remaining, 19);
        assert_eq!(session.stats.manual_triggers, 1);
        assert_eq!(events[0], SessionEvent::ScoreChanged(session.score));
        assert_eq!(events[1], SessionEvent::MovesChanged(19));
        let bomb_still_there = session
            .board
            .grid
            .iter()
            .flatten()
            .flatten()
            .any(|t| t.id == bomb_id);
        assert!(!bomb_still_there);
    }

    #[test]
    fn test_selecting_a_special_without_double_tap_does_nothing() {
        let board = Board::from_rows(&["BGOL", "GOLA", "OLAG", "LAGO"]);
        let mut session = session_with_board(board, 3);
        let mut rng = StdRng::seed_from_u64(42);

        session.select_cell(0, 0, &mut rng);
        let events = session.select_cell(2, 2, &mut rng);

        assert!(events.is_empty());
        assert_eq!(session.selection, Some((2, 2)));
        assert_eq!(session.score, 0);
        assert_eq!(session.moves_remaining, 20);
    }

    #[test]
    fn test_swapping_a_special_is_effective_and_detonates_it() {
        let board = Board::from_rows(&["BGOL", "GOLA", "OLAG", "LAGO"]);
        let mut session = session_with_board(board, 3);
        let bomb_id = session.board.tile(0, 0).unwrap().id;
        let mut rng = StdRng::seed_from_u64(42);

        session.select_cell(0, 0, &mut rng);
        let events = session.select_cell(0, 1, &mut rng);

        // No match forms, but moving a special still counts: it
        // detonates at its new cell (0,1), an edge blast of six tiles.
        assert!(session.score >= 100);
        assert_eq!(session.moves_remaining, 19);
        assert_eq!(session.stats.effective_swaps, 1);
        assert_eq!(events[0], SessionEvent::ScoreChanged(session.score));
        let bomb_still_there = session
            .board
            .grid
            .iter()
            .flatten()
            .flatten()
            .any(|t| t.id == bomb_id);
        assert!(!bomb_still_there);
    }

    #[test]
    fn test_last_move_emits_game_over_and_freezes_the_session() {
        let board = Board::from_rows(&["LMC", "LCM", "MLC"]);
        let mut session = session_with_board(board, 3);
        session.moves_remaining = 1;
        let mut rng = StdRng::seed_from_u64(42);

        session.select_cell(2, 0, &mut rng);
        let events = session.select_cell(2, 1, &mut rng);

        assert!(session.game_over);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], SessionEvent::ScoreChanged(session.score));
        assert_eq!(events[1], SessionEvent::MovesChanged(0));
        assert_eq!(events[2], SessionEvent::GameOver(session.score));

        // Frozen: no tap changes anything afterwards.
        let ids = board_ids(&session.board);
        let score = session.score;
        for r in 0..3 {
            for c in 0..3 {
                assert!(session.select_cell(r, c, &mut rng).is_empty());
            }
        }
        assert_eq!(board_ids(&session.board), ids);
        assert_eq!(session.score, score);
        assert_eq!(session.selection, None);
    }

    #[test]
    fn test_reset_starts_a_fresh_game() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut session = Session::new(SessionConfig::default(), &mut rng);

        // Play one effective move so there is state to wipe.
        if let Some((a, b)) = moves::find_matching_swap(&session.board) {
            session.select_cell(a.0, a.1, &mut rng);
            session.select_cell(b.0, b.1, &mut rng);
        }
        assert!(session.score > 0);
        let ids_in_use = session.board.next_tile_id;

        session.reset(&mut rng);

        assert_eq!(session.score, 0);
        assert_eq!(session.moves_remaining, 20);
        assert!(!session.game_over);
        assert_eq!(session.selection, None);
        assert_eq!(session.stats.effective_swaps, 0);
        assert!(session.board.next_tile_id >= ids_in_use);
        assert!(find_matches(&session.board).is_empty());
        assert!(moves::has_possible_move(&session.board));
    }

    #[test]
    fn test_board_snapshot_mirrors_the_grid() {
        let board = Board::from_rows(&["BGO", "GOA", "OAG"]);
        let session = session_with_board(board, 3);

        let snapshot = session.board_snapshot();

        assert_eq!(snapshot.width, 3);
        assert_eq!(snapshot.height, 3);
        assert_eq!(
            snapshot.cells[0][0],
            Some(TileView {
                kind: TileKind::Apple,
                special: Some(Special::Bomb),
            })
        );
        assert_eq!(
            snapshot.cells[1][2],
            Some(TileView {
                kind: TileKind::Apple,
                special: None,
            })
        );
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let board = Board::from_rows(&["BGO", "GOA", "OAG"]);
        let session = session_with_board(board, 3);
        let snapshot = session.board_snapshot();

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: BoardSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(back.width, snapshot.width);
        assert_eq!(back.height, snapshot.height);
        assert_eq!(back.cells, snapshot.cells);
    }
}

//! The resolution engine: removal, explosions, scoring, special spawns,
//! cascade settling, and the post-cascade playability guarantee.

use std::collections::HashSet;

use rand::Rng;

use crate::board::{random_kind, Board};
use crate::constants::{
    BOMB_RUN, ORDINARY_TILE_SCORE, RAINBOW_RUN, RESHUFFLE_RETRY_CAP, SPECIAL_TILE_SCORE,
};
use crate::matches::{find_matches, MatchGroup};
use crate::moves;
use crate::tile::{Special, TileKind};

/// A swap of two adjacent cells, in (row, col) pairs.
pub type SwapPair = ((usize, usize), (usize, usize));

/// Everything a single settle produced, for scoring and telemetry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub score_delta: u32,
    pub passes: u32,
    pub ordinary_cleared: u32,
    pub specials_cleared: u32,
    pub bombs_spawned: u32,
    pub rainbows_spawned: u32,
    pub wasted_rainbows: u32,
    pub reshuffles: u32,
    pub boards_regenerated: u32,
}

/// Resolve the given matches and manual triggers, cascade until the board
/// is quiescent, then guarantee at least one playable move remains.
///
/// `last_swap` biases where a 4- or 5-run's special spawns on the first
/// pass only; cascade passes place spawns at the middle of their run.
pub fn settle<R: Rng>(
    board: &mut Board,
    groups: Vec<MatchGroup>,
    manual_triggers: Vec<(usize, usize)>,
    last_swap: Option<SwapPair>,
    palette: &[TileKind],
    rng: &mut R,
) -> ResolveOutcome {
    let mut outcome = ResolveOutcome::default();
    run_cascade(
        board,
        groups,
        manual_triggers,
        last_swap,
        palette,
        rng,
        &mut outcome,
    );
    ensure_playable(board, palette, rng, &mut outcome);
    outcome
}

/// Clear, settle, refill, rescan. Manual triggers and the swap context
/// apply to the first pass only.
fn run_cascade<R: Rng>(
    board: &mut Board,
    mut groups: Vec<MatchGroup>,
    manual_triggers: Vec<(usize, usize)>,
    last_swap: Option<SwapPair>,
    palette: &[TileKind],
    rng: &mut R,
    outcome: &mut ResolveOutcome,
) {
    let mut manual = manual_triggers;
    let mut swap_ctx = last_swap;
    while !groups.is_empty() || !manual.is_empty() {
        execute_removal(board, &groups, &manual, swap_ctx, palette, rng, outcome);
        outcome.passes += 1;
        board.apply_gravity();
        board.fill_empties(palette, rng);
        manual = Vec::new();
        swap_ctx = None;
        groups = find_matches(board);
    }
}

/// One removal pass: seed the removal set from the match groups and manual
/// triggers, expand explosions, score every doomed tile, clear them, then
/// place spawned specials into the craters. The holes are left for the
/// caller to settle with gravity and refill, so spawned specials hold
/// their cell and everything above them falls past.
fn execute_removal<R: Rng>(
    board: &mut Board,
    groups: &[MatchGroup],
    manual_triggers: &[(usize, usize)],
    last_swap: Option<SwapPair>,
    palette: &[TileKind],
    rng: &mut R,
    outcome: &mut ResolveOutcome,
) {
    let mut removal: HashSet<(usize, usize)> = HashSet::new();
    let mut spawns: Vec<((usize, usize), TileKind, Special)> = Vec::new();

    for group in groups {
        removal.extend(group.cells.iter().copied());
        let special = if group.cells.len() == BOMB_RUN {
            Special::Bomb
        } else if group.cells.len() >= RAINBOW_RUN {
            Special::Rainbow
        } else {
            continue;
        };
        let target = spawn_target(group, last_swap);
        // Crossing runs can claim the same cell. The last claim wins, and
        // only the tile that actually lands is counted.
        if let Some(claim) = spawns.iter_mut().find(|(pos, _, _)| *pos == target) {
            *claim = (target, group.kind, special);
        } else {
            spawns.push((target, group.kind, special));
        }
    }
    for &(r, c) in manual_triggers {
        if board.in_bounds(r, c) {
            removal.insert((r, c));
        }
    }

    expand_explosions(board, &mut removal, palette, rng, outcome);

    // Score before clearing, while the doomed tiles are still readable.
    for &(r, c) in &removal {
        if let Some(tile) = board.tile(r, c) {
            if tile.is_special() {
                outcome.score_delta += SPECIAL_TILE_SCORE;
                outcome.specials_cleared += 1;
            } else {
                outcome.score_delta += ORDINARY_TILE_SCORE;
                outcome.ordinary_cleared += 1;
            }
        }
    }
    for &(r, c) in &removal {
        board.grid[r][c] = None;
    }

    for (pos, kind, special) in spawns {
        match special {
            Special::Bomb => outcome.bombs_spawned += 1,
            Special::Rainbow => outcome.rainbows_spawned += 1,
        }
        let tile = board.new_tile(kind, Some(special));
        board.grid[pos.0][pos.1] = Some(tile);
    }
}

/// Where a 4- or 5-run's special lands: the player's swap endpoint when it
/// sits inside the group, otherwise the middle cell of the run.
fn spawn_target(group: &MatchGroup, last_swap: Option<SwapPair>) -> (usize, usize) {
    if let Some((a, b)) = last_swap {
        if group.cells.contains(&a) {
            return a;
        }
        if group.cells.contains(&b) {
            return b;
        }
    }
    group.cells[group.cells.len() / 2]
}

/// Grow the removal set through every special it touches. A bomb adds its
/// 3x3 neighborhood clipped to the board; a rainbow picks a palette kind
/// uniformly at random and adds every ordinary tile of that kind, whether
/// or not any exist. Newly added coordinates are pushed for their own
/// specialness check, so blasts chain.
fn expand_explosions<R: Rng>(
    board: &Board,
    removal: &mut HashSet<(usize, usize)>,
    palette: &[TileKind],
    rng: &mut R,
    outcome: &mut ResolveOutcome,
) {
    let mut stack: Vec<(usize, usize)> = removal.iter().copied().collect();
    let mut visited: HashSet<(usize, usize)> = HashSet::new();

    while let Some((r, c)) = stack.pop() {
        if !visited.insert((r, c)) {
            continue;
        }
        let special = match board.tile(r, c) {
            Some(tile) => tile.special,
            None => continue,
        };
        match special {
            Some(Special::Bomb) => {
                for (nr, nc) in neighborhood(board, r, c) {
                    if removal.insert((nr, nc)) {
                        stack.push((nr, nc));
                    }
                }
            }
            Some(Special::Rainbow) => {
                let target = random_kind(palette, rng);
                let mut any_cleared = false;
                for tr in 0..board.height {
                    for tc in 0..board.width {
                        if board.ordinary_kind(tr, tc) == Some(target) {
                            any_cleared = true;
                            if removal.insert((tr, tc)) {
                                stack.push((tr, tc));
                            }
                        }
                    }
                }
                if !any_cleared {
                    outcome.wasted_rainbows += 1;
                }
            }
            None => {}
        }
    }
}

/// All cells in the 3x3 box around (row, col), clipped to the board.
fn neighborhood(board: &Board, row: usize, col: usize) -> Vec<(usize, usize)> {
    let mut cells = Vec::with_capacity(9);
    for d_row in -1i32..=1 {
        for d_col in -1i32..=1 {
            let nr = row as i32 + d_row;
            let nc = col as i32 + d_col;
            if nr >= 0 && nr < board.height as i32 && nc >= 0 && nc < board.width as i32 {
                cells.push((nr as usize, nc as usize));
            }
        }
    }
    cells
}

/// Shuffle the existing tiles until some move is playable. Any matches a
/// shuffle happens to line up resolve as a fresh cascade before the next
/// playability check. Past the retry cap the board is regenerated
/// outright and the loop gives up rather than spin forever.
fn ensure_playable<R: Rng>(
    board: &mut Board,
    palette: &[TileKind],
    rng: &mut R,
    outcome: &mut ResolveOutcome,
) {
    let mut attempts = 0u32;
    while !moves::has_possible_move(board) {
        if attempts >= RESHUFFLE_RETRY_CAP {
            board.regenerate(palette, rng);
            outcome.boards_regenerated += 1;
            break;
        }
        moves::shuffle_tiles(board, rng);
        outcome.reshuffles += 1;
        attempts += 1;

        let groups = find_matches(board);
        if !groups.is_empty() {
            run_cascade(board, groups, Vec::new(), None, palette, rng, outcome);
        }
    }
}

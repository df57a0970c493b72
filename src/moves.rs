//! Playability checks and the deadlock-recovery shuffle.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::Board;
use crate::matches::find_matches;

/// Coordinates of the first special tile on the board, scanning row-major.
pub fn find_special(board: &Board) -> Option<(usize, usize)> {
    for r in 0..board.height {
        for c in 0..board.width {
            if board.tile(r, c).is_some_and(|t| t.special.is_some()) {
                return Some((r, c));
            }
        }
    }
    None
}

/// First adjacent swap that would produce at least one match, probing each
/// pair on a scratch copy and swapping back. Right and down neighbors
/// cover every adjacent pair exactly once.
pub fn find_matching_swap(board: &Board) -> Option<((usize, usize), (usize, usize))> {
    let mut probe = board.clone();
    for r in 0..probe.height {
        for c in 0..probe.width {
            for other in [(r, c + 1), (r + 1, c)] {
                if !probe.in_bounds(other.0, other.1) {
                    continue;
                }
                probe.swap((r, c), other);
                let found = !find_matches(&probe).is_empty();
                probe.swap((r, c), other);
                if found {
                    return Some(((r, c), other));
                }
            }
        }
    }
    None
}

/// A board is playable if it carries any special tile (always triggerable
/// by hand) or some adjacent swap yields a match.
pub fn has_possible_move(board: &Board) -> bool {
    find_special(board).is_some() || find_matching_swap(board).is_some()
}

/// Permute the tiles already on the board across the same occupied cells.
/// Conserves the tile multiset exactly: nothing is created or destroyed.
pub fn shuffle_tiles<R: Rng>(board: &mut Board, rng: &mut R) {
    let mut coords = Vec::new();
    let mut tiles = Vec::new();
    for r in 0..board.height {
        for c in 0..board.width {
            if let Some(tile) = board.grid[r][c].take() {
                coords.push((r, c));
                tiles.push(tile);
            }
        }
    }
    tiles.shuffle(rng);
    for ((r, c), tile) in coords.into_iter().zip(tiles) {
        board.grid[r][c] = Some(tile);
    }
}

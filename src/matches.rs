//! Run detection: maximal horizontal/vertical runs of 3+ same-kind tiles.

use crate::board::Board;
use crate::constants::MIN_RUN;
use crate::tile::TileKind;

/// One maximal run of 3 or more same-kind ordinary tiles on a single row
/// or column. A tile may appear in a row group and a column group at the
/// same time (T and L shapes); that duplication is deliberate and feeds
/// the resolution engine's per-group spawn rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    pub kind: TileKind,
    /// Coordinates in scan order (left to right, or top to bottom).
    pub cells: Vec<(usize, usize)>,
}

/// Scan the whole board and return every maximal run, rows first, then
/// columns. Specials and empty cells terminate runs and never join them.
pub fn find_matches(board: &Board) -> Vec<MatchGroup> {
    let mut groups = Vec::new();
    for r in 0..board.height {
        scan_line(board, (0..board.width).map(|c| (r, c)), &mut groups);
    }
    for c in 0..board.width {
        scan_line(board, (0..board.height).map(|r| (r, c)), &mut groups);
    }
    groups
}

fn scan_line(
    board: &Board,
    line: impl Iterator<Item = (usize, usize)>,
    groups: &mut Vec<MatchGroup>,
) {
    let mut run_kind: Option<TileKind> = None;
    let mut run: Vec<(usize, usize)> = Vec::new();

    for (r, c) in line {
        let kind = board.ordinary_kind(r, c);
        if kind.is_some() && kind == run_kind {
            run.push((r, c));
        } else {
            flush_run(groups, run_kind, &mut run);
            run_kind = kind;
            if kind.is_some() {
                run.push((r, c));
            }
        }
    }
    flush_run(groups, run_kind, &mut run);
}

fn flush_run(
    groups: &mut Vec<MatchGroup>,
    kind: Option<TileKind>,
    run: &mut Vec<(usize, usize)>,
) {
    if run.len() >= MIN_RUN {
        if let Some(kind) = kind {
            groups.push(MatchGroup {
                kind,
                cells: std::mem::take(run),
            });
            return;
        }
    }
    run.clear();
}

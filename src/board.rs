//! Board storage and the column mechanics: generation, gravity, refill.

use rand::Rng;

use crate::tile::{Special, Tile, TileKind};

/// Draw a uniformly random kind from the palette. No weighting: every
/// symbol has equal probability. The palette must be non-empty; callers
/// size it from a `TileKind::ALL` prefix.
pub fn random_kind<R: Rng>(palette: &[TileKind], rng: &mut R) -> TileKind {
    palette[rng.gen_range(0..palette.len())]
}

/// The tile grid. Indexed as `grid[row][col]`, row 0 at the top; gravity
/// compacts tiles toward the bottom (highest row index).
///
/// Cells are `None` only transiently, between a clear and the
/// gravity/refill that follows it. Every settled board is full.
#[derive(Debug, Clone)]
pub struct Board {
    pub grid: Vec<Vec<Option<Tile>>>,
    pub height: usize,
    pub width: usize,
    /// Next tile id to hand out. Ids are session-unique and never reused.
    pub next_tile_id: u64,
}

impl Board {
    /// Create a board with every cell empty. Mostly useful as a base for
    /// hand-built layouts; gameplay boards come from [`Board::generate`].
    pub fn empty(height: usize, width: usize) -> Self {
        Board {
            grid: vec![vec![None; width]; height],
            height,
            width,
            next_tile_id: 0,
        }
    }

    /// Generate a full board with no initial 3-run: each cell redraws its
    /// kind while it would complete a run of 3 with the two cells above or
    /// the two cells to the left.
    ///
    /// Panics on palettes of fewer than 3 kinds: the row and the column
    /// can each veto a kind at once, and the redraw would never settle.
    pub fn generate<R: Rng>(
        height: usize,
        width: usize,
        palette: &[TileKind],
        rng: &mut R,
    ) -> Self {
        let mut board = Board::empty(height, width);
        board.fill_without_runs(palette, rng);
        board
    }

    /// Refill the whole board in place under the same no-initial-run
    /// constraint. Tile ids keep counting from where they were. Carries
    /// the same 3-kind palette floor as [`Board::generate`].
    pub fn regenerate<R: Rng>(&mut self, palette: &[TileKind], rng: &mut R) {
        for row in self.grid.iter_mut() {
            for cell in row.iter_mut() {
                *cell = None;
            }
        }
        self.fill_without_runs(palette, rng);
    }

    fn fill_without_runs<R: Rng>(&mut self, palette: &[TileKind], rng: &mut R) {
        assert!(
            palette.len() >= 3,
            "board generation needs at least 3 kinds, got {}",
            palette.len()
        );
        for r in 0..self.height {
            for c in 0..self.width {
                let kind = loop {
                    let candidate = random_kind(palette, rng);
                    if !self.completes_run(r, c, candidate) {
                        break candidate;
                    }
                };
                let tile = self.new_tile(kind, None);
                self.grid[r][c] = Some(tile);
            }
        }
    }

    /// Would placing `kind` at (r, c) finish a 3-run with the two already
    /// filled cells to the left or above?
    fn completes_run(&self, r: usize, c: usize, kind: TileKind) -> bool {
        if c >= 2
            && self.kind_at(r, c - 1) == Some(kind)
            && self.kind_at(r, c - 2) == Some(kind)
        {
            return true;
        }
        if r >= 2
            && self.kind_at(r - 1, c) == Some(kind)
            && self.kind_at(r - 2, c) == Some(kind)
        {
            return true;
        }
        false
    }

    /// Allocate a fresh tile. The caller decides where (and whether) to
    /// place it.
    pub fn new_tile(&mut self, kind: TileKind, special: Option<Special>) -> Tile {
        let id = self.next_tile_id;
        self.next_tile_id += 1;
        Tile { id, kind, special }
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    /// Tile at (row, col); `None` if the cell is empty or out of bounds.
    pub fn tile(&self, row: usize, col: usize) -> Option<&Tile> {
        self.grid
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|cell| cell.as_ref())
    }

    /// Kind at (row, col) regardless of specialness.
    fn kind_at(&self, row: usize, col: usize) -> Option<TileKind> {
        self.tile(row, col).map(|t| t.kind)
    }

    /// Kind at (row, col) only if the tile is ordinary. Specials and
    /// empty cells report `None`, which is what run detection and rainbow
    /// color-clears want.
    pub fn ordinary_kind(&self, row: usize, col: usize) -> Option<TileKind> {
        self.tile(row, col)
            .filter(|t| t.special.is_none())
            .map(|t| t.kind)
    }

    /// Exchange the contents of two cells. Out-of-bounds pairs are ignored.
    pub fn swap(&mut self, a: (usize, usize), b: (usize, usize)) {
        if !self.in_bounds(a.0, a.1) || !self.in_bounds(b.0, b.1) || a == b {
            return;
        }
        let tmp = self.grid[a.0][a.1].take();
        self.grid[a.0][a.1] = self.grid[b.0][b.1].take();
        self.grid[b.0][b.1] = tmp;
    }

    /// Compact every column toward the bottom, preserving the relative
    /// order of surviving tiles. Vacated cells end up at the top. Columns
    /// are independent.
    pub fn apply_gravity(&mut self) {
        for c in 0..self.width {
            let survivors: Vec<Tile> = (0..self.height)
                .filter_map(|r| self.grid[r][c].take())
                .collect();
            for (i, tile) in survivors.into_iter().rev().enumerate() {
                self.grid[self.height - 1 - i][c] = Some(tile);
            }
        }
    }

    /// Fill the holes gravity left at the top of each column with fresh
    /// ordinary tiles. Walks each column from the top and stops at the
    /// first occupied cell. Returns the filled coordinates so a host can
    /// animate the drops.
    pub fn fill_empties<R: Rng>(
        &mut self,
        palette: &[TileKind],
        rng: &mut R,
    ) -> Vec<(usize, usize)> {
        let mut filled = Vec::new();
        for c in 0..self.width {
            for r in 0..self.height {
                if self.grid[r][c].is_some() {
                    break;
                }
                let kind = random_kind(palette, rng);
                let tile = self.new_tile(kind, None);
                self.grid[r][c] = Some(tile);
                filled.push((r, c));
            }
        }
        filled
    }

    /// Build a board from a string layout, one row per string, one char
    /// per cell. Intended for tests and tooling.
    ///
    /// Characters:
    ///   'A' 'G' 'O' 'L' 'M' 'C' 'K' = ordinary kinds (palette order)
    ///   'B' = bomb, 'R' = rainbow (kind recorded as Apple; inert)
    ///   '.' = empty cell
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut board = Board::empty(height, width);

        for (r, row_str) in rows.iter().enumerate() {
            for (c, ch) in row_str.chars().enumerate() {
                let cell = match ch {
                    'A' => Some((TileKind::Apple, None)),
                    'G' => Some((TileKind::Grape, None)),
                    'O' => Some((TileKind::Orange, None)),
                    'L' => Some((TileKind::Lemon, None)),
                    'M' => Some((TileKind::Melon, None)),
                    'C' => Some((TileKind::Cherry, None)),
                    'K' => Some((TileKind::Kiwi, None)),
                    'B' => Some((TileKind::Apple, Some(Special::Bomb))),
                    'R' => Some((TileKind::Apple, Some(Special::Rainbow))),
                    _ => None,
                };
                if let Some((kind, special)) = cell {
                    let tile = board.new_tile(kind, special);
                    board.grid[r][c] = Some(tile);
                }
            }
        }
        board
    }
}

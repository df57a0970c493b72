//! Tile model: ordinary kinds, special markers, and the tile itself.

use serde::{Deserialize, Serialize};

/// Ordinary tile symbol. Only `kind` equality drives adjacency matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Apple,
    Grape,
    Orange,
    Lemon,
    Melon,
    Cherry,
    Kiwi,
}

impl TileKind {
    /// Every kind, in palette order. Boards draw from a prefix of this array.
    pub const ALL: [TileKind; 7] = [
        TileKind::Apple,
        TileKind::Grape,
        TileKind::Orange,
        TileKind::Lemon,
        TileKind::Melon,
        TileKind::Cherry,
        TileKind::Kiwi,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TileKind::Apple => "Apple",
            TileKind::Grape => "Grape",
            TileKind::Orange => "Orange",
            TileKind::Lemon => "Lemon",
            TileKind::Melon => "Melon",
            TileKind::Cherry => "Cherry",
            TileKind::Kiwi => "Kiwi",
        }
    }
}

/// Special tile marker. Specials never match by adjacency; they detonate
/// when caught in a removal set or triggered by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Special {
    /// Clears the 3x3 neighborhood around itself.
    Bomb,
    /// Clears every ordinary tile of one randomly chosen kind.
    Rainbow,
}

/// A single tile. Its position is the grid slot that holds it; tiles carry
/// no coordinate of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Session-unique sequence number, for host-side diffing and tests.
    pub id: u64,
    /// Symbol used for adjacency matching (and rainbow color-clears).
    /// For specials this records the kind of the run that spawned them;
    /// it is inert because specials are excluded from matching.
    pub kind: TileKind,
    pub special: Option<Special>,
}

impl Tile {
    pub fn is_special(&self) -> bool {
        self.special.is_some()
    }
}

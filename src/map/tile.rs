//! Tile records making up the grid.

use bitflags::bitflags;
use strum_macros::{AsRefStr, IntoStaticStr};

use crate::constants::points;

/// The static kind of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum TileKind {
    Wall,
    Pellet,
    Power,
    Gate,
    Tunnel,
    Empty,
}

impl TileKind {
    /// Solid tiles block every actor.
    pub const fn is_solid(self) -> bool {
        matches!(self, TileKind::Wall)
    }

    /// The collectible this tile is seeded with, if any.
    pub const fn collectible(self) -> Option<Collectible> {
        match self {
            TileKind::Pellet => Some(Collectible::Pellet),
            TileKind::Power => Some(Collectible::Power),
            _ => None,
        }
    }
}

bitflags! {
    /// Zone markers layered over a tile's kind.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TileFlags: u8 {
        /// Pursuers move at the tunnel multiplier here.
        const SLOWDOWN = 1 << 0;
        /// Scatter and chase pursuers may not pick "up" here.
        const NO_UP_TURN = 1 << 1;
    }
}

/// A single immutable grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub kind: TileKind,
    pub flags: TileFlags,
}

impl Tile {
    /// Returned for anything queried above or below the grid.
    pub const OUT_OF_BOUNDS: Tile = Tile::new(TileKind::Wall);

    pub const fn new(kind: TileKind) -> Self {
        Self {
            kind,
            flags: TileFlags::empty(),
        }
    }

    pub fn is_slowdown(&self) -> bool {
        self.flags.contains(TileFlags::SLOWDOWN)
    }

    pub fn is_no_up_turn(&self) -> bool {
        self.flags.contains(TileFlags::NO_UP_TURN)
    }
}

/// Something the player can pick up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Collectible {
    Pellet,
    Power,
}

impl Collectible {
    pub const fn score(self) -> u32 {
        match self {
            Collectible::Pellet => points::PELLET,
            Collectible::Power => points::POWER,
        }
    }
}

//! Static level definitions, as handed to the grid at level load.

use glam::{IVec2, Vec2};

use crate::constants::{self, HOUSE_BOUNCE_HALF_SPAN, RAW_BOARD, TILE_SIZE};
use crate::systems::components::Ghost;

/// Anything that occupies the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    Player,
    Ghost(Ghost),
}

impl Actor {
    pub const ALL: [Actor; 5] = [
        Actor::Player,
        Actor::Ghost(Ghost::Blinky),
        Actor::Ghost(Ghost::Pinky),
        Actor::Ghost(Ghost::Inky),
        Actor::Ghost(Ghost::Clyde),
    ];

    pub const fn index(self) -> usize {
        match self {
            Actor::Player => 0,
            Actor::Ghost(ghost) => 1 + ghost.index(),
        }
    }
}

impl From<Ghost> for Actor {
    fn from(ghost: Ghost) -> Self {
        Actor::Ghost(ghost)
    }
}

/// An axis-aligned block of tiles, `min` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub min: IVec2,
    pub size: IVec2,
}

impl TileRect {
    pub const fn new(min: IVec2, size: IVec2) -> Self {
        Self { min, size }
    }

    pub fn contains(&self, tile: IVec2) -> bool {
        let max = self.min + self.size;
        tile.x >= self.min.x && tile.x < max.x && tile.y >= self.min.y && tile.y < max.y
    }
}

/// Where the pursuer house sits and the points its scripted motion runs between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseLayout {
    /// Interior tiles.
    pub bounds: TileRect,
    /// Tile just above the gate. Pursuers leave through it and eyes aim for it.
    pub entrance: IVec2,
    /// Tile at the middle of the interior.
    pub center: IVec2,
}

impl HouseLayout {
    /// The pixel eyes must reach before descending into the house.
    pub fn entrance_pixel(&self) -> Vec2 {
        tile_center(self.entrance)
    }

    /// Column pursuers glide to before rising through the gate. This sits on the left edge
    /// of the entrance tile, between the two gate tiles.
    pub fn exit_x(&self) -> f32 {
        (self.entrance.x * TILE_SIZE) as f32
    }

    /// Height at which a leaving pursuer counts as outside.
    pub fn exit_y(&self) -> f32 {
        tile_center(self.entrance).y
    }

    /// Where returning eyes stop before turning around to leave again.
    pub fn center_pixel(&self) -> Vec2 {
        tile_center(self.center)
    }

    /// Top and bottom of the idle bounce.
    pub fn bounce_bounds(&self) -> (f32, f32) {
        let middle = self.center_pixel().y;
        (middle - HOUSE_BOUNCE_HALF_SPAN, middle + HOUSE_BOUNCE_HALF_SPAN)
    }
}

/// Pixel at the center of a tile.
pub fn tile_center(tile: IVec2) -> Vec2 {
    Vec2::new(
        (tile.x * TILE_SIZE + TILE_SIZE / 2) as f32,
        (tile.y * TILE_SIZE + TILE_SIZE / 2) as f32,
    )
}

/// Actors spawn on the left edge of their start tile, centered vertically.
pub fn start_pixel(tile: IVec2) -> Vec2 {
    Vec2::new((tile.x * TILE_SIZE) as f32, (tile.y * TILE_SIZE + TILE_SIZE / 2) as f32)
}

/// Everything needed to build a grid for one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDefinition {
    pub width: usize,
    pub height: usize,
    /// One string per row, using the board legend.
    pub rows: Vec<String>,
    pub no_up_turn: Vec<IVec2>,
    pub tunnel_row: i32,
    pub house: HouseLayout,
    pub starts: Vec<(Actor, IVec2)>,
}

impl LevelDefinition {
    /// The arcade board.
    pub fn classic() -> Self {
        let mut starts = vec![(Actor::Player, constants::PLAYER_START)];
        starts.extend(Ghost::ALL.iter().map(|&ghost| (Actor::Ghost(ghost), constants::GHOST_STARTS[ghost.index()])));

        Self {
            width: constants::BOARD_TILE_SIZE.x as usize,
            height: constants::BOARD_TILE_SIZE.y as usize,
            rows: RAW_BOARD.iter().map(|row| row.to_string()).collect(),
            no_up_turn: constants::NO_UP_TURN_TILES.to_vec(),
            tunnel_row: constants::TUNNEL_ROW,
            house: HouseLayout {
                bounds: TileRect::new(IVec2::new(11, 16), IVec2::new(6, 3)),
                entrance: constants::HOUSE_ENTRANCE,
                center: constants::HOUSE_CENTER,
            },
            starts,
        }
    }

    pub fn start(&self, actor: Actor) -> Option<IVec2> {
        self.starts.iter().find(|(a, _)| *a == actor).map(|(_, tile)| *tile)
    }
}

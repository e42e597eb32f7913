//! The tile grid: static tile records plus the mutable collectible layer.

use bevy_ecs::resource::Resource;
use glam::{IVec2, Vec2};
use smallvec::SmallVec;
use tracing::trace;

use crate::constants::TILE_SIZE;
use crate::error::ParseError;
use crate::map::direction::Direction;
use crate::map::level::{self, Actor, HouseLayout, LevelDefinition};
use crate::map::parser::MapTileParser;
use crate::map::tile::{Collectible, Tile, TileKind};

/// Floor division of a pixel position into tile coordinates, without wrapping.
pub fn pixel_to_tile(pixel: Vec2) -> IVec2 {
    (pixel / TILE_SIZE as f32).floor().as_ivec2()
}

/// The world model for a single level.
#[derive(Resource, Debug, Clone)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    collectibles: Vec<bool>,
    pellets_remaining: u32,
    power_remaining: u32,
    authored_pellets: u32,
    authored_power: u32,
    tunnel_row: i32,
    house: HouseLayout,
    starts: [IVec2; 5],
}

impl TileGrid {
    /// Builds the grid for a level, seeding every collectible.
    pub fn new(level: &LevelDefinition) -> Result<Self, ParseError> {
        let parsed = MapTileParser::parse_board(level)?;
        let collectibles: Vec<bool> = parsed.tiles.iter().map(|tile| tile.kind.collectible().is_some()).collect();
        let count = |kind: TileKind| parsed.tiles.iter().filter(|tile| tile.kind == kind).count() as u32;
        let (authored_pellets, authored_power) = (count(TileKind::Pellet), count(TileKind::Power));

        Ok(Self {
            width: parsed.width as i32,
            height: parsed.height as i32,
            tiles: parsed.tiles,
            collectibles,
            pellets_remaining: authored_pellets,
            power_remaining: authored_power,
            authored_pellets,
            authored_power,
            tunnel_row: parsed.tunnel_row,
            house: parsed.house,
            starts: parsed.starts,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tunnel_row(&self) -> i32 {
        self.tunnel_row
    }

    pub fn house(&self) -> &HouseLayout {
        &self.house
    }

    /// Wraps a column index into range, for the teleport lanes.
    pub fn wrap_x(&self, x: i32) -> i32 {
        x.rem_euclid(self.width)
    }

    pub fn wrap_tile(&self, tile: IVec2) -> IVec2 {
        IVec2::new(self.wrap_x(tile.x), tile.y)
    }

    /// Tile containing a pixel, with the column wrapped into range.
    pub fn pixel_to_tile(&self, pixel: Vec2) -> IVec2 {
        self.wrap_tile(pixel_to_tile(pixel))
    }

    fn index(&self, tile: IVec2) -> Option<usize> {
        if tile.y < 0 || tile.y >= self.height {
            return None;
        }
        Some((tile.y * self.width + self.wrap_x(tile.x)) as usize)
    }

    /// The tile record at a position. Rows outside the grid read as wall, columns wrap.
    pub fn tile_at(&self, tile: IVec2) -> Tile {
        self.index(tile).map_or(Tile::OUT_OF_BOUNDS, |index| self.tiles[index])
    }

    pub fn kind_at(&self, tile: IVec2) -> TileKind {
        self.tile_at(tile).kind
    }

    pub fn is_wall(&self, tile: IVec2) -> bool {
        self.kind_at(tile).is_solid()
    }

    pub fn is_gate(&self, tile: IVec2) -> bool {
        self.kind_at(tile) == TileKind::Gate
    }

    pub fn is_slowdown(&self, tile: IVec2) -> bool {
        self.tile_at(tile).is_slowdown()
    }

    pub fn is_no_up_turn(&self, tile: IVec2) -> bool {
        self.tile_at(tile).is_no_up_turn()
    }

    pub fn is_in_house(&self, tile: IVec2) -> bool {
        self.house.bounds.contains(tile)
    }

    /// Whether an actor may step onto a tile. Walls block everyone; the gate blocks pursuers
    /// unless they are returning eyes.
    pub fn can_enter(&self, tile: IVec2, is_pursuer: bool, is_eyes_or_eaten: bool) -> bool {
        match self.kind_at(tile) {
            TileKind::Wall => false,
            TileKind::Gate => !is_pursuer || is_eyes_or_eaten,
            _ => true,
        }
    }

    /// Whether a collectible is still present. Anything off the grid has none.
    pub fn has_collectible(&self, tile: IVec2) -> bool {
        if tile.x < 0 || tile.x >= self.width || tile.y < 0 || tile.y >= self.height {
            return false;
        }
        self.collectibles[(tile.y * self.width + tile.x) as usize]
    }

    /// Removes the collectible at a tile, if any. Calling this again on the same tile is a no-op.
    pub fn collect(&mut self, tile: IVec2) -> Option<Collectible> {
        if !self.has_collectible(tile) {
            return None;
        }

        let index = (tile.y * self.width + tile.x) as usize;
        self.collectibles[index] = false;
        let collected = self.tiles[index].kind.collectible()?;
        match collected {
            Collectible::Pellet => self.pellets_remaining -= 1,
            Collectible::Power => self.power_remaining -= 1,
        }

        trace!(tile = %tile, kind = collected.as_ref(), remaining = self.remaining_count(), "Collected");
        Some(collected)
    }

    pub fn remaining_count(&self) -> u32 {
        self.pellets_remaining + self.power_remaining
    }

    pub fn pellets_remaining(&self) -> u32 {
        self.pellets_remaining
    }

    pub fn power_remaining(&self) -> u32 {
        self.power_remaining
    }

    /// Pellets plus power pellets as authored in the level.
    pub fn authored_count(&self) -> u32 {
        self.authored_pellets + self.authored_power
    }

    /// Restores every authored collectible. Tile records are untouched.
    pub fn reset_collectibles(&mut self) {
        for (present, tile) in self.collectibles.iter_mut().zip(self.tiles.iter()) {
            *present = tile.kind.collectible().is_some();
        }
        self.pellets_remaining = self.authored_pellets;
        self.power_remaining = self.authored_power;
    }

    pub fn start_tile(&self, actor: Actor) -> IVec2 {
        self.starts[actor.index()]
    }

    pub fn start_pixel(&self, actor: Actor) -> Vec2 {
        level::start_pixel(self.start_tile(actor))
    }

    /// Legal single-step moves from a tile, in priority order (up, left, down, right).
    ///
    /// The reverse of `current` is never offered, and "up" is withheld on no-up-turn tiles when
    /// `respect_no_up_turn` is set.
    pub fn valid_directions(
        &self,
        tile: IVec2,
        current: Option<Direction>,
        is_pursuer: bool,
        is_eyes_or_eaten: bool,
        respect_no_up_turn: bool,
    ) -> SmallVec<[Direction; 4]> {
        let reverse = current.map(Direction::opposite);
        let no_up = respect_no_up_turn && self.is_no_up_turn(tile);

        Direction::DIRECTIONS
            .into_iter()
            .filter(|&direction| Some(direction) != reverse)
            .filter(|&direction| !(no_up && direction == Direction::Up))
            .filter(|&direction| self.can_enter(tile + direction.as_ivec2(), is_pursuer, is_eyes_or_eaten))
            .collect()
    }
}

//! Map parsing functionality for converting level definitions into tile records.

use glam::IVec2;
use tracing::debug;

use crate::error::ParseError;
use crate::map::level::{Actor, HouseLayout, LevelDefinition};
use crate::map::tile::{Tile, TileFlags, TileKind};
use crate::constants::TUNNEL_SLOWDOWN_SPAN;

/// The validated, flattened form of a level definition.
#[derive(Debug, Clone)]
pub struct ParsedBoard {
    pub width: usize,
    pub height: usize,
    /// Row-major tile records.
    pub tiles: Vec<Tile>,
    /// Start tiles indexed by [`Actor::index`].
    pub starts: [IVec2; 5],
    pub tunnel_row: i32,
    pub house: HouseLayout,
}

/// Parser for converting row-encoded boards into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Parses a single character of the board legend.
    pub fn parse_character(c: char) -> Option<TileKind> {
        match c {
            '#' => Some(TileKind::Wall),
            '.' => Some(TileKind::Pellet),
            'o' => Some(TileKind::Power),
            '=' => Some(TileKind::Gate),
            'T' => Some(TileKind::Tunnel),
            ' ' => Some(TileKind::Empty),
            _ => None,
        }
    }

    /// Parses and validates a level definition.
    ///
    /// # Errors
    ///
    /// Fails on missing or short rows, unknown characters, a gate that isn't exactly two tiles,
    /// a missing actor start, or zone data pointing outside the board.
    pub fn parse_board(level: &LevelDefinition) -> Result<ParsedBoard, ParseError> {
        let (width, height) = (level.width, level.height);
        if level.rows.len() < height {
            return Err(ParseError::MissingRows {
                expected: height,
                found: level.rows.len(),
            });
        }

        let in_bounds = |tile: IVec2| tile.x >= 0 && tile.y >= 0 && (tile.x as usize) < width && (tile.y as usize) < height;
        let out_of_bounds = |what: &'static str, position: IVec2| ParseError::OutOfBounds {
            what,
            position,
            width,
            height,
        };

        let mut tiles = Vec::with_capacity(width * height);
        let mut gate_tiles = 0;

        for (y, row) in level.rows.iter().take(height).enumerate() {
            let found = row.chars().count();
            if found < width {
                return Err(ParseError::RowTooShort {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, character) in row.chars().take(width).enumerate() {
                let kind = Self::parse_character(character).ok_or(ParseError::UnknownCharacter { character, x, y })?;
                let mut tile = Tile::new(kind);
                match kind {
                    TileKind::Gate => gate_tiles += 1,
                    TileKind::Tunnel => tile.flags |= TileFlags::SLOWDOWN,
                    _ => {}
                }
                tiles.push(tile);
            }
        }

        if gate_tiles != 0 && gate_tiles != 2 {
            return Err(ParseError::InvalidGateCount(gate_tiles));
        }

        for &tile in &level.no_up_turn {
            if !in_bounds(tile) {
                return Err(out_of_bounds("No-up-turn tile", tile));
            }
            tiles[tile.y as usize * width + tile.x as usize].flags |= TileFlags::NO_UP_TURN;
        }

        if level.tunnel_row < 0 || level.tunnel_row as usize >= height {
            return Err(out_of_bounds("Tunnel row", IVec2::new(0, level.tunnel_row)));
        }
        let row_start = level.tunnel_row as usize * width;
        let span = (TUNNEL_SLOWDOWN_SPAN as usize).min(width);
        for x in 0..span {
            tiles[row_start + x].flags |= TileFlags::SLOWDOWN;
            tiles[row_start + width - 1 - x].flags |= TileFlags::SLOWDOWN;
        }

        for (what, tile) in [("House entrance", level.house.entrance), ("House center", level.house.center)] {
            if !in_bounds(tile) {
                return Err(out_of_bounds(what, tile));
            }
        }

        let mut starts = [IVec2::ZERO; 5];
        for actor in Actor::ALL {
            let tile = level.start(actor).ok_or(ParseError::MissingStart(actor))?;
            if !in_bounds(tile) {
                return Err(out_of_bounds("Start tile", tile));
            }
            starts[actor.index()] = tile;
        }

        debug!(width, height, gate_tiles, "Parsed level board");

        Ok(ParsedBoard {
            width,
            height,
            tiles,
            starts,
            tunnel_row: level.tunnel_row,
            house: level.house,
        })
    }
}

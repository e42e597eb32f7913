//! This module contains the tile grid and everything needed to build it from level data.

pub mod direction;
pub mod grid;
pub mod level;
pub mod parser;
pub mod tile;

//! Deterministic Pac-Man simulation library crate.

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod logging;
pub mod map;
pub mod round;
pub mod systems;

//! The Entity-Component-System (ECS) module.
//!
//! This module contains the components, resources and systems that make up one simulation tick.

pub mod collision;
pub mod components;
pub mod ghost;
pub mod movement;
pub mod timers;

pub use self::collision::*;
pub use self::components::*;
pub use self::ghost::*;
pub use self::movement::*;
pub use self::timers::*;

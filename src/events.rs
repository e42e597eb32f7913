use bevy_ecs::prelude::*;
use glam::{IVec2, Vec2};

use crate::map::tile::Collectible;
use crate::systems::components::{ChaseMode, Ghost};

/// Outcomes of a tick, handed to whoever owns the round.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    /// The player picked something up.
    CollectibleEaten { kind: Collectible, tile: IVec2 },
    /// A frightened pursuer was caught and sent home as eyes.
    GhostCaptured { ghost: Ghost, score: u32, position: Vec2 },
    /// A scatter or chase pursuer touched the player.
    PlayerCaught { ghost: Ghost, position: Vec2 },
    /// The last collectible of the level was eaten.
    LevelComplete,
    WaveChanged(ChaseMode),
    FrightenedStarted { seconds: f32 },
    FrightenedEnded,
}

impl GameEvent {
    /// Points this event is worth.
    pub fn score(&self) -> u32 {
        match self {
            GameEvent::CollectibleEaten { kind, .. } => kind.score(),
            GameEvent::GhostCaptured { score, .. } => *score,
            _ => 0,
        }
    }
}

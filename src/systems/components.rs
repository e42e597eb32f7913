use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::{IVec2, Vec2};
use rand::{rngs::SmallRng, SeedableRng};
use strum_macros::AsRefStr;

use crate::constants::{self, GLOBAL_DOT_LIMITS, SCATTER_TARGETS};
use crate::map::direction::Direction;

/// The four pursuers. Declaration order is the fixed update order.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Ghost {
    /// Direct: chases the player's tile.
    Blinky,
    /// Ambush: aims four tiles ahead of the player.
    Pinky,
    /// Pincer: doubles the vector from Blinky through a point ahead of the player.
    Inky,
    /// Shy: chases from afar, retreats to its corner up close.
    Clyde,
}

impl Ghost {
    pub const ALL: [Ghost; 4] = [Ghost::Blinky, Ghost::Pinky, Ghost::Inky, Ghost::Clyde];

    pub const fn index(self) -> usize {
        match self {
            Ghost::Blinky => 0,
            Ghost::Pinky => 1,
            Ghost::Inky => 2,
            Ghost::Clyde => 3,
        }
    }

    pub const fn scatter_target(self) -> IVec2 {
        SCATTER_TARGETS[self.index()]
    }

    /// Dots this pursuer needs on its own counter before leaving the house.
    pub const fn individual_dot_limit(self, level: u32) -> u32 {
        match (level, self) {
            (1, Ghost::Inky) => 30,
            (1, Ghost::Clyde) => 60,
            (2, Ghost::Clyde) => 50,
            _ => 0,
        }
    }

    /// Threshold on the shared counter used after a life has been lost.
    pub const fn global_dot_limit(self) -> u32 {
        GLOBAL_DOT_LIMITS[self.index()]
    }

    /// The mode a pursuer starts a life in.
    pub const fn initial_mode(self) -> GhostMode {
        match self {
            Ghost::Blinky => GhostMode::Scatter,
            _ => GhostMode::InHouse,
        }
    }
}

/// Behavioral mode of a pursuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum GhostMode {
    InHouse,
    LeavingHouse,
    EnteringHouse,
    Scatter,
    Chase,
    Frightened,
    /// Momentary freeze after capture; never moves.
    Eaten,
    /// Returning to the house after a capture, unobstructed by the gate.
    Eyes,
}

impl GhostMode {
    /// Scripted house motion; never targets, never collides.
    pub const fn is_house(self) -> bool {
        matches!(self, GhostMode::InHouse | GhostMode::LeavingHouse | GhostMode::EnteringHouse)
    }

    /// Following the scatter/chase wave.
    pub const fn is_wave(self) -> bool {
        matches!(self, GhostMode::Scatter | GhostMode::Chase)
    }

    /// Eyes and eaten pursuers may pass the gate.
    pub const fn is_returning(self) -> bool {
        matches!(self, GhostMode::Eyes | GhostMode::Eaten)
    }

    /// Whether touching the player in this mode costs the player a life.
    pub const fn is_deadly(self) -> bool {
        self.is_wave()
    }
}

/// The wave mode a pursuer goes back to after being frightened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ChaseMode {
    #[default]
    Scatter,
    Chase,
}

impl From<ChaseMode> for GhostMode {
    fn from(mode: ChaseMode) -> Self {
        match mode {
            ChaseMode::Scatter => GhostMode::Scatter,
            ChaseMode::Chase => GhostMode::Chase,
        }
    }
}

/// Pixel position plus the tile it falls in.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub pixel: Vec2,
    pub tile: IVec2,
}

impl Position {
    pub fn new(pixel: Vec2, tile: IVec2) -> Self {
        Self { pixel, tile }
    }
}

/// Speed in pixels per second and the unit vector actually travelled last tick.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub speed: f32,
    pub heading: IVec2,
}

/// A tag component for the entity controlled by the player.
#[derive(Default, Component, Debug, Clone, Copy)]
pub struct PlayerControlled;

/// Steering and lifecycle state of the player.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerState {
    /// Buffered intent, consumed at the next legal turn.
    pub queued: Option<Direction>,
    pub current: Option<Direction>,
    /// Frames of motion still suppressed after a pickup.
    pub pause_frames: u32,
    pub dying: bool,
}

/// Mutable decision state of a pursuer.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostState {
    pub mode: GhostMode,
    pub previous_chase_mode: ChaseMode,
    /// Last computed target, kept for display.
    pub target: IVec2,
    pub dot_counter: u32,
    pub reverse_requested: bool,
}

impl GhostState {
    pub fn new(ghost: Ghost) -> Self {
        Self {
            mode: ghost.initial_mode(),
            previous_chase_mode: ChaseMode::Scatter,
            target: ghost.scatter_target(),
            dot_counter: 0,
            reverse_requested: false,
        }
    }
}

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub state: PlayerState,
    pub position: Position,
    pub velocity: Velocity,
}

#[derive(Bundle)]
pub struct GhostBundle {
    pub ghost: Ghost,
    pub state: GhostState,
    pub position: Position,
    pub velocity: Velocity,
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct DeltaTime {
    /// Floating-point delta time in seconds
    pub seconds: f32,
}

impl Default for DeltaTime {
    fn default() -> Self {
        Self {
            seconds: constants::LOOP_TIME.as_secs_f32(),
        }
    }
}

/// The current level number (1-based).
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level(pub u32);

/// Frames of player freeze applied after each pickup.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupPause {
    pub pellet: u32,
    pub power: u32,
}

impl Default for PickupPause {
    fn default() -> Self {
        Self {
            pellet: constants::PELLET_PAUSE_FRAMES,
            power: constants::POWER_PAUSE_FRAMES,
        }
    }
}

/// Seeded source of randomness for frightened pursuers.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

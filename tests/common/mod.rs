#![allow(dead_code)]

use glam::{IVec2, Vec2};
use pacman_sim::{
    config::SimConfig,
    constants::LOOP_TIME,
    events::GameEvent,
    game::Simulation,
    map::{
        grid::TileGrid,
        level::{tile_center, Actor, HouseLayout, LevelDefinition, TileRect},
    },
    systems::{Ghost, GhostContext, GhostMemory, GhostMode, GhostState, HouseRelease, Position, Velocity},
};
use rand::{rngs::SmallRng, SeedableRng};

/// One fixed simulation step, in seconds.
pub fn dt() -> f32 {
    LOOP_TIME.as_secs_f32()
}

pub fn classic_grid() -> TileGrid {
    TileGrid::new(&LevelDefinition::classic()).unwrap()
}

pub fn classic_simulation() -> Simulation {
    Simulation::new(&LevelDefinition::classic(), &SimConfig::default()).unwrap()
}

/// A ring corridor around a sealed box. The player starts in the top-left corner and the
/// pursuers start inside the box, so they can never reach the player.
///
/// ```text
/// #########
/// #.......#
/// #.#####.#
/// #.#   #.#
/// #.#   #.#
/// #.#####.#
/// #.......#
/// #########
/// ```
pub fn ring_level() -> LevelDefinition {
    let rows = [
        "#########",
        "#.......#",
        "#.#####.#",
        "#.#   #.#",
        "#.#   #.#",
        "#.#####.#",
        "#.......#",
        "#########",
    ];
    let mut starts = vec![(Actor::Player, IVec2::new(1, 1))];
    starts.extend(Ghost::ALL.map(|ghost| (Actor::Ghost(ghost), IVec2::new(4, 3))));

    LevelDefinition {
        width: 9,
        height: 8,
        rows: rows.iter().map(|row| row.to_string()).collect(),
        no_up_turn: Vec::new(),
        tunnel_row: 3,
        house: HouseLayout {
            bounds: TileRect::new(IVec2::new(3, 3), IVec2::new(3, 2)),
            entrance: IVec2::new(4, 3),
            center: IVec2::new(4, 4),
        },
        starts,
    }
}

pub fn ring_simulation() -> Simulation {
    Simulation::new(&ring_level(), &SimConfig::default()).unwrap()
}

/// Runs `ticks` steps and returns every event they produced.
pub fn run_ticks(simulation: &mut Simulation, ticks: usize) -> Vec<GameEvent> {
    (0..ticks).flat_map(|_| simulation.advance(dt()).events).collect()
}

/// A deterministic RNG for direction choice.
pub fn rng() -> SmallRng {
    SmallRng::seed_from_u64(7)
}

/// A pursuer standing at the center of `tile`.
pub fn ghost_at(tile: IVec2) -> (Position, Velocity) {
    (Position::new(tile_center(tile), tile), Velocity::default())
}

pub fn ghost_in_mode(ghost: Ghost, mode: GhostMode) -> GhostState {
    let mut state = GhostState::new(ghost);
    state.mode = mode;
    state
}

/// Context with the player at `player_tile`, facing nowhere, Blinky outside the house.
pub fn context(grid: &TileGrid, player_tile: IVec2) -> GhostContext<'_> {
    GhostContext {
        grid,
        level: 1,
        wave_mode: pacman_sim::systems::ChaseMode::Scatter,
        player_tile,
        player_facing: None,
        blinky_tile: Some(IVec2::new(14, 11)),
        dt: dt(),
    }
}

pub fn release() -> HouseRelease {
    HouseRelease::new(1, pacman_sim::constants::HOUSE_STALL_SECONDS)
}

pub fn memory() -> GhostMemory {
    GhostMemory::default()
}

/// Puts a pursuer in a mode directly, bypassing the engine.
pub fn force_mode(simulation: &mut Simulation, ghost: Ghost, mode: GhostMode) {
    let entity = simulation.ghost_entity(ghost);
    if let Some(mut state) = simulation.world.get_mut::<GhostState>(entity) {
        state.mode = mode;
    }
}

pub fn pixel_of(simulation: &Simulation, actor: Actor) -> Vec2 {
    match actor {
        Actor::Player => simulation.player_position().unwrap().pixel,
        Actor::Ghost(ghost) => simulation.ghost_position(ghost).unwrap().pixel,
    }
}

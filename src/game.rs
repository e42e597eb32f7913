//! This module hosts the simulation world and its fixed per-tick schedule.

use bevy_ecs::entity::Entity;
use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::world::World;
use glam::{IVec2, Vec2};
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::error::GameResult;
use crate::events::GameEvent;
use crate::map::direction::Direction;
use crate::map::grid::TileGrid;
use crate::map::level::{Actor, LevelDefinition};
use crate::systems::{
    self, player_speed, CaptureStreak, DeltaTime, FrightenedTimer, Ghost, GhostBundle, GhostMemory, GhostMode, GhostState,
    HouseRelease, Level, PickupPause, PlayerBundle, PlayerControlled, PlayerState, Position, SimRng, Velocity, WaveSchedule,
};

/// The fixed order of one tick.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum TickSet {
    /// Player movement from buffered intent
    Player,
    /// Wave, frightened and house-release timers
    Timers,
    /// Pursuer decisions and movement, in identity order
    Pursuers,
    /// Collectible pickup, then pursuer proximity
    Collision,
}

/// What happened during one call to [`Simulation::advance`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
}

impl TickReport {
    /// Points earned this tick.
    pub fn score_delta(&self) -> u32 {
        self.events.iter().map(GameEvent::score).sum()
    }

    pub fn level_complete(&self) -> bool {
        self.events.contains(&GameEvent::LevelComplete)
    }

    /// The pursuer that caught the player, if any.
    pub fn player_caught(&self) -> Option<Ghost> {
        self.events.iter().find_map(|event| match event {
            GameEvent::PlayerCaught { ghost, .. } => Some(*ghost),
            _ => None,
        })
    }

    /// Pursuers captured this tick, with the points each was worth.
    pub fn captures(&self) -> impl Iterator<Item = (Ghost, u32)> + '_ {
        self.events.iter().filter_map(|event| match event {
            GameEvent::GhostCaptured { ghost, score, .. } => Some((*ghost, *score)),
            _ => None,
        })
    }
}

/// The simulation core: one player, four pursuers and the grid they share.
///
/// Owned by the round controller, which feeds it intents and consumes the [`TickReport`] of every
/// [`advance`](Simulation::advance).
pub struct Simulation {
    pub world: World,
    pub schedule: Schedule,
    player: Entity,
    ghosts: [Entity; 4],
    stall_timeout: f32,
}

impl Simulation {
    /// Builds the grid for `level` and spawns every actor at its start tile.
    ///
    /// # Errors
    ///
    /// Returns `GameError::MapParse` when the level data is malformed.
    pub fn new(level: &LevelDefinition, config: &SimConfig) -> GameResult<Self> {
        let grid = TileGrid::new(level)?;
        let number = config.start_level.max(1);
        info!(level = number, collectibles = grid.authored_count(), "Simulation created");

        let mut world = World::default();
        EventRegistry::register_event::<GameEvent>(&mut world);

        let player_start = (grid.start_tile(Actor::Player), grid.start_pixel(Actor::Player));
        let ghost_starts = Ghost::ALL.map(|ghost| (grid.start_tile(ghost.into()), grid.start_pixel(ghost.into())));

        world.insert_resource(grid);
        world.insert_resource(Level(number));
        world.insert_resource(DeltaTime::default());
        world.insert_resource(PickupPause {
            pellet: config.pellet_pause_frames,
            power: config.power_pause_frames,
        });
        world.insert_resource(SimRng::seeded(config.seed));
        world.insert_resource(WaveSchedule::new(number));
        world.insert_resource(FrightenedTimer::default());
        world.insert_resource(HouseRelease::new(number, config.house_stall_timeout));
        world.insert_resource(GhostMemory::default());
        world.insert_resource(CaptureStreak::default());

        let player = world
            .spawn(PlayerBundle {
                player: PlayerControlled,
                state: PlayerState::default(),
                position: Position::new(player_start.1, player_start.0),
                velocity: Velocity {
                    speed: player_speed(number, false),
                    heading: IVec2::ZERO,
                },
            })
            .id();

        let ghosts = Ghost::ALL.map(|ghost| {
            let (tile, pixel) = ghost_starts[ghost.index()];
            world
                .spawn(GhostBundle {
                    ghost,
                    state: GhostState::new(ghost),
                    position: Position::new(pixel, tile),
                    velocity: Velocity::default(),
                })
                .id()
        });

        let mut schedule = Schedule::default();
        Self::configure_schedule(&mut schedule);

        Ok(Self {
            world,
            schedule,
            player,
            ghosts,
            stall_timeout: config.house_stall_timeout,
        })
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule
            .add_systems((
                systems::player_movement_system.in_set(TickSet::Player),
                systems::ghost_timers_system.in_set(TickSet::Timers),
                systems::ghost_movement_system.in_set(TickSet::Pursuers),
                (systems::collectible_system, systems::proximity_system)
                    .chain()
                    .in_set(TickSet::Collision),
            ))
            .configure_sets((TickSet::Player, TickSet::Timers, TickSet::Pursuers, TickSet::Collision).chain());
    }

    /// Runs one fixed step of `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> TickReport {
        self.world.insert_resource(DeltaTime { seconds: dt });
        self.schedule.run(&mut self.world);

        let events = self.world.resource_mut::<Events<GameEvent>>().drain().collect();
        TickReport { events }
    }

    /// Buffers a direction for the player, taken at the next legal turn.
    pub fn handle_player_intent(&mut self, direction: Direction) {
        if let Some(mut state) = self.world.get_mut::<PlayerState>(self.player) {
            state.queued = Some(direction);
        }
    }

    /// Puts every actor back on its start tile after a lost life.
    ///
    /// Collectibles stay as they are, and the house switches to the shared dot counter.
    pub fn reset_for_new_life(&mut self) {
        let level = self.level();
        self.world.resource_mut::<HouseRelease>().on_player_death();
        self.reset_round_state(level);
        info!(level, remaining = self.remaining_collectibles(), "Reset for new life");
    }

    /// Loads the next level on the same board, restoring every collectible.
    pub fn reset_for_new_level(&mut self, level: u32) {
        let level = level.max(1);
        self.world.insert_resource(Level(level));
        self.world.resource_mut::<TileGrid>().reset_collectibles();
        self.world.insert_resource(HouseRelease::new(level, self.stall_timeout));
        self.reset_round_state(level);
        info!(level, "Reset for new level");
    }

    fn reset_round_state(&mut self, level: u32) {
        self.world.insert_resource(WaveSchedule::new(level));
        self.world.resource_mut::<FrightenedTimer>().clear();
        self.world.resource_mut::<GhostMemory>().clear();
        self.world.resource_mut::<CaptureStreak>().reset();

        let grid = self.world.resource::<TileGrid>();
        let starts = Actor::ALL.map(|actor| (grid.start_tile(actor), grid.start_pixel(actor)));

        let (tile, pixel) = starts[Actor::Player.index()];
        if let Ok(mut entity) = self.world.get_entity_mut(self.player) {
            entity.insert((
                PlayerState::default(),
                Position::new(pixel, tile),
                Velocity {
                    speed: player_speed(level, false),
                    heading: IVec2::ZERO,
                },
            ));
        }

        for ghost in Ghost::ALL {
            let (tile, pixel) = starts[Actor::from(ghost).index()];
            if let Ok(mut entity) = self.world.get_entity_mut(self.ghosts[ghost.index()]) {
                entity.insert((GhostState::new(ghost), Position::new(pixel, tile), Velocity::default()));
            }
        }
        debug!(level, "Actors returned to start");
    }

    pub fn grid(&self) -> &TileGrid {
        self.world.resource::<TileGrid>()
    }

    pub fn level(&self) -> u32 {
        self.world.resource::<Level>().0
    }

    pub fn remaining_collectibles(&self) -> u32 {
        self.grid().remaining_count()
    }

    pub fn current_mode(&self, ghost: Ghost) -> Option<GhostMode> {
        self.ghost_state(ghost).map(|state| state.mode)
    }

    /// The direction an actor is committed to. Pursuers always have one.
    pub fn current_direction(&self, actor: Actor) -> Option<Direction> {
        match actor {
            Actor::Player => self.player_state().and_then(|state| state.current),
            Actor::Ghost(ghost) => Some(self.world.resource::<GhostMemory>().direction(ghost)),
        }
    }

    pub fn frightened_time_remaining(&self) -> f32 {
        self.world.resource::<FrightenedTimer>().remaining()
    }

    pub fn player_entity(&self) -> Entity {
        self.player
    }

    pub fn ghost_entity(&self, ghost: Ghost) -> Entity {
        self.ghosts[ghost.index()]
    }

    pub fn player_state(&self) -> Option<&PlayerState> {
        self.world.get::<PlayerState>(self.player)
    }

    pub fn player_position(&self) -> Option<&Position> {
        self.world.get::<Position>(self.player)
    }

    pub fn player_velocity(&self) -> Option<&Velocity> {
        self.world.get::<Velocity>(self.player)
    }

    pub fn ghost_state(&self, ghost: Ghost) -> Option<&GhostState> {
        self.world.get::<GhostState>(self.ghost_entity(ghost))
    }

    pub fn ghost_position(&self, ghost: Ghost) -> Option<&Position> {
        self.world.get::<Position>(self.ghost_entity(ghost))
    }

    /// Teleports an actor to a pixel position and recomputes its tile.
    pub fn place_actor(&mut self, actor: Actor, pixel: Vec2) {
        let tile = self.grid().pixel_to_tile(pixel);
        let entity = match actor {
            Actor::Player => self.player,
            Actor::Ghost(ghost) => self.ghost_entity(ghost),
        };
        if let Some(mut position) = self.world.get_mut::<Position>(entity) {
            *position = Position::new(pixel, tile);
        }
    }
}

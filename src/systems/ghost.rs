//! The pursuer decision engine.
//!
//! Each tick a pursuer picks its speed, then either runs one of the scripted house motions or,
//! in an active mode, decides a direction once per tile and moves along it. Direction choice is
//! greedy: the legal neighbor closest to the target wins, ties broken by up, left, down, right.

use bevy_ecs::{
    query::{With, Without},
    resource::Resource,
    system::{Query, Res, ResMut},
};
use glam::{IVec2, Vec2};
use micromap::Map;
use rand::{seq::IndexedRandom, Rng};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::constants::{self, EYES_ARRIVAL_TOLERANCE, EYES_SPEED_MULTIPLIER, HOUSE_BOUNCE_SPEED_FACTOR, PURSUER_TUNNEL_BUFFER, TILE_SIZE};
use crate::map::direction::{heading_vector, Direction};
use crate::map::grid::TileGrid;
use crate::map::level::tile_center;
use crate::systems::components::{
    ChaseMode, DeltaTime, Ghost, GhostMode, GhostState, Level, PlayerControlled, PlayerState, Position, SimRng, Velocity,
};
use crate::systems::timers::{FrightenedTimer, HouseRelease, WaveSchedule};

/// Pursuer-private steering memory.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Steering {
    direction: Direction,
    /// Tile a direction was last chosen for.
    decision_tile: Option<IVec2>,
    /// +1 while bouncing down, -1 while bouncing up.
    bounce: f32,
}

impl Default for Steering {
    fn default() -> Self {
        Self {
            direction: Direction::Left,
            decision_tile: None,
            bounce: 1.0,
        }
    }
}

/// Steering memory for every pursuer, owned by the engine and cleared on every reset.
#[derive(Resource, Debug, Default)]
pub struct GhostMemory {
    entries: Map<Ghost, Steering, 4>,
}

impl GhostMemory {
    fn get(&self, ghost: Ghost) -> Steering {
        self.entries.get(&ghost).copied().unwrap_or_default()
    }

    fn store(&mut self, ghost: Ghost, steering: Steering) {
        self.entries.insert(ghost, steering);
    }

    /// The committed travel direction, left when nothing has been committed yet.
    pub fn direction(&self, ghost: Ghost) -> Direction {
        self.get(ghost).direction
    }

    /// Forces a fresh decision on the next tick.
    pub fn forget_decision(&mut self, ghost: Ghost) {
        let mut steering = self.get(ghost);
        steering.decision_tile = None;
        self.store(ghost, steering);
    }

    pub fn clear(&mut self) {
        self.entries = Map::new();
    }
}

/// What a pursuer needs to know about the rest of the world this tick.
#[derive(Debug, Clone, Copy)]
pub struct GhostContext<'a> {
    pub grid: &'a TileGrid,
    pub level: u32,
    pub wave_mode: ChaseMode,
    pub player_tile: IVec2,
    pub player_facing: Option<Direction>,
    /// Blinky's tile as of this tick, `None` when the board has no Blinky. Blinky always updates first.
    pub blinky_tile: Option<IVec2>,
    pub dt: f32,
}

/// Speed for a pursuer in its current mode and tile.
pub fn ghost_speed(mode: GhostMode, grid: &TileGrid, tile: IVec2, level: u32) -> f32 {
    let speeds = constants::level_speeds(level);
    let multiplier = match mode {
        GhostMode::Eyes | GhostMode::EnteringHouse => EYES_SPEED_MULTIPLIER,
        GhostMode::Eaten => 0.0,
        GhostMode::Frightened => speeds.frightened_ghost,
        _ if grid.is_slowdown(tile) => speeds.tunnel,
        _ => speeds.ghost,
    };
    constants::BASE_SPEED * multiplier
}

/// The chase-mode target of each personality.
///
/// Pinky and Inky carry the arcade's overflow offset when the player faces up.
pub fn chase_target(ghost: Ghost, own_tile: IVec2, player_tile: IVec2, player_facing: Option<Direction>, blinky_tile: IVec2) -> IVec2 {
    let ahead = |tiles: i32| {
        let mut point = player_tile + heading_vector(player_facing) * tiles;
        if player_facing == Some(Direction::Up) {
            point.x -= tiles;
        }
        point
    };

    match ghost {
        Ghost::Blinky => player_tile,
        Ghost::Pinky => ahead(4),
        Ghost::Inky => {
            let anchor = ahead(2);
            anchor + (anchor - blinky_tile)
        }
        Ghost::Clyde => {
            let distance_squared = own_tile.distance_squared(player_tile);
            if distance_squared > 8 * 8 {
                player_tile
            } else {
                ghost.scatter_target()
            }
        }
    }
}

/// Target tile for a pursuer in an active mode.
pub fn compute_target(ghost: Ghost, mode: GhostMode, own_tile: IVec2, ctx: &GhostContext) -> IVec2 {
    match mode {
        GhostMode::Eyes => ctx.grid.house().entrance,
        GhostMode::Frightened => own_tile,
        GhostMode::Scatter => ghost.scatter_target(),
        _ => {
            // Inky pivots on the house entrance when there is no Blinky to pivot on.
            let blinky_tile = ctx.blinky_tile.unwrap_or(ctx.grid.house().entrance);
            chase_target(ghost, own_tile, ctx.player_tile, ctx.player_facing, blinky_tile)
        }
    }
}

/// Picks the next travel direction at a decision tile.
///
/// Frightened pursuers wander randomly. Everyone else takes the legal neighbor closest to
/// `target`, keeping the first one seen on exact ties.
pub fn choose_direction<R: Rng + ?Sized>(
    grid: &TileGrid,
    tile: IVec2,
    target: IVec2,
    current: Direction,
    mode: GhostMode,
    rng: &mut R,
) -> Direction {
    let frightened = mode == GhostMode::Frightened;
    let eyes = mode == GhostMode::Eyes;
    let valid = grid.valid_directions(tile, Some(current), true, mode.is_returning(), !frightened && !eyes);

    match valid.as_slice() {
        [] => current,
        [only] => *only,
        options if frightened => options.choose(rng).copied().unwrap_or(current),
        options => {
            // Squared distances order the same as euclidean ones.
            let mut best = options[0];
            let mut best_distance = i32::MAX;
            for &direction in options {
                let distance = (tile + direction.as_ivec2()).distance_squared(target);
                if distance < best_distance {
                    best_distance = distance;
                    best = direction;
                }
            }
            best
        }
    }
}

/// Straight-line pursuer motion with lane centering, tunnel wrap and a tile-exact wall stop.
fn move_in_direction(grid: &TileGrid, position: &mut Position, velocity: &mut Velocity, direction: Direction, dt: f32, passes_gate: bool) {
    let mut next = position.pixel + direction.as_vec2() * velocity.speed * dt;

    let far_edge = (grid.width() * TILE_SIZE) as f32 - PURSUER_TUNNEL_BUFFER;
    if next.x < -PURSUER_TUNNEL_BUFFER {
        next.x = far_edge;
    } else if next.x > far_edge {
        next.x = -PURSUER_TUNNEL_BUFFER;
    }

    let center = tile_center(position.tile);
    if direction.is_horizontal() {
        next.y = center.y;
    } else {
        next.x = center.x;
    }

    let next_tile = grid.pixel_to_tile(next);
    if grid.is_wall(next_tile) || (!passes_gate && grid.is_gate(next_tile)) {
        position.pixel = center;
        velocity.heading = IVec2::ZERO;
        return;
    }

    position.pixel = next;
    position.tile = next_tile;
    velocity.heading = direction.as_ivec2();
}

fn reached_center(pixel: Vec2, center: Vec2, heading: IVec2) -> bool {
    let past = |value: f32, middle: f32, sign: i32| match sign.signum() {
        1 => value >= middle,
        -1 => value <= middle,
        _ => true,
    };
    past(pixel.x, center.x, heading.x) && past(pixel.y, center.y, heading.y)
}

/// Waiting inside the house: bounce in place until the release policy lets this pursuer go.
fn step_in_house(ghost: Ghost, state: &mut GhostState, position: &mut Position, velocity: &mut Velocity, memory: &mut GhostMemory, release: &HouseRelease, ctx: &GhostContext) {
    let house = ctx.grid.house();
    if state.dot_counter >= release.dot_limit(ghost) {
        // Pinky holds until Blinky, if there is one, has cleared the entrance row.
        let blocked = ghost == Ghost::Pinky && ctx.blinky_tile.is_some_and(|tile| tile.y >= house.entrance.y);
        if !blocked {
            debug!(ghost = ?ghost, dots = state.dot_counter, "Pursuer leaving house");
            state.mode = GhostMode::LeavingHouse;
            return;
        }
    }

    let (top, bottom) = house.bounce_bounds();
    let mut steering = memory.get(ghost);
    position.pixel.x = ctx.grid.start_pixel(ghost.into()).x;
    position.pixel.y += steering.bounce * velocity.speed * HOUSE_BOUNCE_SPEED_FACTOR * ctx.dt;
    if position.pixel.y >= bottom {
        position.pixel.y = bottom;
        steering.bounce = -1.0;
    } else if position.pixel.y <= top {
        position.pixel.y = top;
        steering.bounce = 1.0;
    }
    velocity.heading = IVec2::new(0, steering.bounce as i32);
    memory.store(ghost, steering);
}

/// Glide to the exit column, then rise through the gate. On arrival the pursuer joins the wave.
fn step_leaving_house(ghost: Ghost, state: &mut GhostState, position: &mut Position, velocity: &mut Velocity, memory: &mut GhostMemory, ctx: &GhostContext) {
    let house = ctx.grid.house();
    let (exit_x, exit_y) = (house.exit_x(), house.exit_y());
    let step = velocity.speed * ctx.dt;

    let dx = exit_x - position.pixel.x;
    if dx.abs() > 1.0 {
        position.pixel.x += dx.signum() * step;
        velocity.heading = IVec2::new(dx.signum() as i32, 0);
        return;
    }
    position.pixel.x = exit_x;

    if position.pixel.y > exit_y {
        position.pixel.y -= step;
        velocity.heading = IVec2::NEG_Y;
        return;
    }

    position.pixel = Vec2::new(exit_x, exit_y);
    position.tile = ctx.grid.pixel_to_tile(position.pixel);
    state.mode = ctx.wave_mode.into();
    state.previous_chase_mode = ctx.wave_mode;

    let mut steering = memory.get(ghost);
    steering.direction = Direction::Left;
    steering.decision_tile = None;
    memory.store(ghost, steering);
    debug!(ghost = ?ghost, mode = ?state.mode, "Pursuer left house");
}

/// Eyes sink to the middle of the house, then turn around and leave again.
fn step_entering_house(ghost: Ghost, state: &mut GhostState, position: &mut Position, velocity: &mut Velocity, ctx: &GhostContext) {
    let center = ctx.grid.house().center_pixel();
    position.pixel.x = center.x;

    if position.pixel.y < center.y {
        position.pixel.y = (position.pixel.y + velocity.speed * ctx.dt).min(center.y);
        velocity.heading = IVec2::Y;
        return;
    }

    debug!(ghost = ?ghost, "Pursuer regenerated");
    state.mode = GhostMode::LeavingHouse;
}

/// Advances one pursuer by one tick.
#[allow(clippy::too_many_arguments)]
pub fn step_ghost<R: Rng + ?Sized>(
    ghost: Ghost,
    state: &mut GhostState,
    position: &mut Position,
    velocity: &mut Velocity,
    memory: &mut GhostMemory,
    release: &HouseRelease,
    rng: &mut R,
    ctx: &GhostContext,
) {
    velocity.speed = ghost_speed(state.mode, ctx.grid, position.tile, ctx.level);

    match state.mode {
        GhostMode::InHouse => return step_in_house(ghost, state, position, velocity, memory, release, ctx),
        GhostMode::LeavingHouse => return step_leaving_house(ghost, state, position, velocity, memory, ctx),
        GhostMode::EnteringHouse => return step_entering_house(ghost, state, position, velocity, ctx),
        GhostMode::Eaten => return,
        GhostMode::Scatter | GhostMode::Chase | GhostMode::Frightened | GhostMode::Eyes => {}
    }

    let mut steering = memory.get(ghost);
    if state.reverse_requested {
        state.reverse_requested = false;
        steering.direction = steering.direction.opposite();
        steering.decision_tile = None;
    }

    let needs_decision = steering.decision_tile != Some(position.tile);
    if needs_decision && reached_center(position.pixel, tile_center(position.tile), steering.direction.as_ivec2()) {
        let target = compute_target(ghost, state.mode, position.tile, ctx);
        state.target = target;
        steering.direction = choose_direction(ctx.grid, position.tile, target, steering.direction, state.mode, rng);
        steering.decision_tile = Some(position.tile);
        trace!(ghost = ?ghost, tile = %position.tile, target = %target, direction = steering.direction.as_ref(), "Pursuer decided");
    }
    memory.store(ghost, steering);

    let is_eyes = state.mode == GhostMode::Eyes;
    move_in_direction(ctx.grid, position, velocity, steering.direction, ctx.dt, is_eyes);

    if is_eyes {
        let entrance = ctx.grid.house().entrance_pixel();
        let offset = (position.pixel - entrance).abs();
        if offset.x < EYES_ARRIVAL_TOLERANCE && offset.y < EYES_ARRIVAL_TOLERANCE {
            position.pixel = entrance;
            state.mode = GhostMode::EnteringHouse;
            debug!(ghost = ?ghost, "Eyes reached house");
        }
    }
}

/// Applies a wave flip. Only scatter and chase pursuers follow it; a change of mode queues a reversal.
pub fn apply_wave_mode(state: &mut GhostState, mode: ChaseMode) {
    if !state.mode.is_wave() {
        return;
    }
    let next = GhostMode::from(mode);
    if state.mode != next {
        state.reverse_requested = true;
    }
    state.mode = next;
    state.previous_chase_mode = mode;
}

/// Frightens a scatter, chase or already frightened pursuer. Returns whether it took effect.
pub fn frighten(state: &mut GhostState) -> bool {
    match state.mode {
        GhostMode::Scatter => state.previous_chase_mode = ChaseMode::Scatter,
        GhostMode::Chase => state.previous_chase_mode = ChaseMode::Chase,
        GhostMode::Frightened => {}
        _ => return false,
    }
    state.mode = GhostMode::Frightened;
    state.reverse_requested = true;
    true
}

/// Restores the wave mode remembered before the pursuer was frightened.
pub fn end_fright(state: &mut GhostState) {
    if state.mode == GhostMode::Frightened {
        state.mode = state.previous_chase_mode.into();
    }
}

/// Queues a reversal for any pursuer roaming the maze.
pub fn request_reverse(state: &mut GhostState) {
    if state.mode.is_wave() || state.mode == GhostMode::Frightened {
        state.reverse_requested = true;
    }
}

/// Sends a captured pursuer home and makes it re-decide immediately.
pub fn transition_to_eyes(ghost: Ghost, state: &mut GhostState, memory: &mut GhostMemory) {
    state.mode = GhostMode::Eyes;
    memory.forget_decision(ghost);
}

/// Opens the frightened window for a power pellet and returns its length.
///
/// Levels with no frightened time only turn the pursuers around.
pub fn on_power_eaten<'a>(level: u32, timer: &mut FrightenedTimer, ghosts: impl IntoIterator<Item = (Ghost, &'a mut GhostState)>) -> f32 {
    let seconds = constants::frightened_seconds(level);
    if seconds > 0.0 {
        timer.start(seconds);
        for (_, state) in ghosts {
            frighten(state);
        }
    } else {
        for (_, state) in ghosts {
            request_reverse(state);
        }
    }
    seconds
}

/// Moves every pursuer, in identity order.
#[allow(clippy::too_many_arguments)]
pub fn ghost_movement_system(
    grid: Res<TileGrid>,
    delta_time: Res<DeltaTime>,
    level: Res<Level>,
    wave: Res<WaveSchedule>,
    release: Res<HouseRelease>,
    mut memory: ResMut<GhostMemory>,
    mut rng: ResMut<SimRng>,
    players: Query<(&Position, &PlayerState), With<PlayerControlled>>,
    mut ghosts: Query<(&Ghost, &mut GhostState, &mut Position, &mut Velocity), Without<PlayerControlled>>,
) {
    let (player_tile, player_facing) = match players.single() {
        Ok((position, state)) => (position.tile, state.current),
        Err(e) => {
            warn!(error = %e, "No player to pursue");
            return;
        }
    };

    let mut ordered: SmallVec<[_; 4]> = ghosts.iter_mut().collect();
    ordered.sort_by_key(|(ghost, ..)| **ghost);

    let mut blinky_tile = None;
    for (ghost, mut state, mut position, mut velocity) in ordered {
        let ctx = GhostContext {
            grid: &grid,
            level: level.0,
            wave_mode: wave.current_mode(),
            player_tile,
            player_facing,
            blinky_tile,
            dt: delta_time.seconds,
        };
        step_ghost(*ghost, &mut state, &mut position, &mut velocity, &mut memory, &release, &mut rng.0, &ctx);

        if *ghost == Ghost::Blinky {
            blinky_tile = Some(position.tile);
        }
    }
}

use bevy_ecs::{
    query::With,
    system::{Query, Res},
};
use glam::{IVec2, Vec2};

use crate::constants::{self, PLAYER_TUNNEL_BUFFER, TILE_SIZE, TURN_SNAP_TOLERANCE, TURN_TOLERANCE};
use crate::map::direction::Direction;
use crate::map::grid::{pixel_to_tile, TileGrid};
use crate::map::level::tile_center;
use crate::systems::components::{DeltaTime, Level, PlayerControlled, PlayerState, Position, Velocity};
use crate::systems::timers::FrightenedTimer;

/// Player speed for a level, in pixels per second.
pub fn player_speed(level: u32, frightened: bool) -> f32 {
    let speeds = constants::level_speeds(level);
    let multiplier = if frightened { speeds.frightened_player } else { speeds.player };
    constants::BASE_SPEED * multiplier
}

/// Whether the player could step from `tile` in `direction`.
fn can_turn(grid: &TileGrid, tile: IVec2, direction: Direction) -> bool {
    grid.can_enter(grid.wrap_tile(tile + direction.as_ivec2()), false, false)
}

/// Commits the buffered direction when it is legal to do so.
fn resolve_turn(grid: &TileGrid, state: &mut PlayerState, position: &mut Position) {
    let center = tile_center(position.tile);
    let offset = (position.pixel - center).abs();
    let distance_to_center = offset.x + offset.y;

    match state.queued {
        Some(queued) if Some(queued) != state.current => {
            if state.current.is_some_and(|current| current.is_opposite_of(queued)) {
                state.current = Some(queued);
                state.queued = None;
            } else if can_turn(grid, position.tile, queued) && distance_to_center <= TURN_TOLERANCE {
                state.current = Some(queued);
                state.queued = None;
                if distance_to_center <= TURN_SNAP_TOLERANCE {
                    position.pixel = center;
                }
            }
        }
        Some(_) => state.queued = None,
        None => {}
    }

    if state.current.is_none() {
        if let Some(queued) = state.queued {
            if can_turn(grid, position.tile, queued) {
                state.current = Some(queued);
                state.queued = None;
            }
        }
    }
}

/// Advances the player by one tick.
///
/// Pickup pauses and dying both suppress motion. Otherwise the buffered turn is resolved, then the
/// player moves along its lane and stops at the center of its tile when a wall lies ahead.
pub fn step_player(grid: &TileGrid, state: &mut PlayerState, position: &mut Position, velocity: &mut Velocity, dt: f32) {
    if state.pause_frames > 0 {
        state.pause_frames -= 1;
        return;
    }
    if state.dying {
        return;
    }

    resolve_turn(grid, state, position);

    let Some(direction) = state.current else {
        velocity.heading = IVec2::ZERO;
        return;
    };

    let heading = direction.as_vec2();
    let mut next = position.pixel + heading * velocity.speed * dt;

    // Lane centering uses the tile under the pixel, not the stored tile.
    let lane_center = tile_center(pixel_to_tile(position.pixel));
    if direction.is_horizontal() {
        next.y = lane_center.y;
    } else {
        next.x = lane_center.x;
    }

    let far_edge = (grid.width() * TILE_SIZE) as f32 + PLAYER_TUNNEL_BUFFER - TILE_SIZE as f32;
    if next.x < -PLAYER_TUNNEL_BUFFER {
        next.x = far_edge;
    } else if next.x > far_edge {
        next.x = -PLAYER_TUNNEL_BUFFER;
    }

    let ahead = pixel_to_tile(position.pixel + heading * TILE_SIZE as f32);
    if grid.is_wall(ahead) {
        next = clamp_at_center(next, lane_center, heading);
    }

    velocity.heading = if next != position.pixel {
        direction.as_ivec2()
    } else {
        IVec2::ZERO
    };
    position.pixel = next;
    position.tile = grid.pixel_to_tile(next);
}

/// Pulls `next` back to `stop` along the travel axis if the move would carry it past.
fn clamp_at_center(mut next: Vec2, stop: Vec2, heading: Vec2) -> Vec2 {
    if (heading.x > 0.0 && next.x > stop.x) || (heading.x < 0.0 && next.x < stop.x) {
        next.x = stop.x;
    } else if (heading.y > 0.0 && next.y > stop.y) || (heading.y < 0.0 && next.y < stop.y) {
        next.y = stop.y;
    }
    next
}

/// Moves the player entity through the grid.
pub fn player_movement_system(
    grid: Res<TileGrid>,
    delta_time: Res<DeltaTime>,
    level: Res<Level>,
    frightened: Res<FrightenedTimer>,
    mut players: Query<(&mut PlayerState, &mut Position, &mut Velocity), With<PlayerControlled>>,
) {
    for (mut state, mut position, mut velocity) in players.iter_mut() {
        velocity.speed = player_speed(level.0, frightened.is_active());
        step_player(&grid, &mut state, &mut position, &mut velocity, delta_time.seconds);
    }
}

use bevy_ecs::{
    event::EventWriter,
    query::{With, Without},
    resource::Resource,
    system::{Query, Res, ResMut},
};
use glam::{IVec2, Vec2};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::constants::{points, CONTACT_DISTANCE};
use crate::events::GameEvent;
use crate::map::grid::TileGrid;
use crate::map::tile::Collectible;
use crate::systems::components::{Ghost, GhostMode, GhostState, Level, PickupPause, PlayerControlled, PlayerState, Position};
use crate::systems::ghost::{self, GhostMemory};
use crate::systems::timers::{FrightenedTimer, HouseRelease};

/// Number of pursuers captured during the current frightened window.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureStreak(pub u32);

impl CaptureStreak {
    /// Score for the next capture: 200, 400, 800, then 1600 for every further one.
    pub fn award(&mut self) -> u32 {
        let score = points::CAPTURES[(self.0 as usize).min(points::CAPTURES.len() - 1)];
        self.0 += 1;
        score
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

/// Whether touching a pursuer in `mode` costs the player a life.
pub fn is_deadly_contact(mode: GhostMode) -> bool {
    mode.is_deadly()
}

/// Whether two actors overlap, using a per-axis box check.
pub fn in_contact(a: Vec2, b: Vec2) -> bool {
    let offset = (a - b).abs();
    offset.x < CONTACT_DISTANCE && offset.y < CONTACT_DISTANCE
}

/// The outcome of the player touching a pursuer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub ghost: Ghost,
    /// A frightened pursuer was caught; otherwise the player was.
    pub captured: bool,
    pub score: u32,
    pub position: Vec2,
}

/// Picks up whatever lies on `tile` and applies the pickup pause.
///
/// A power pellet also restarts the capture streak. Returns what the grid handed over.
pub fn check_collectible(
    grid: &mut TileGrid,
    player: &mut PlayerState,
    tile: IVec2,
    pause: &PickupPause,
    streak: &mut CaptureStreak,
) -> Option<Collectible> {
    let kind = grid.collect(tile)?;
    match kind {
        Collectible::Pellet => player.pause_frames = pause.pellet,
        Collectible::Power => {
            player.pause_frames = pause.power;
            streak.reset();
        }
    }
    Some(kind)
}

/// Resolves the first meaningful contact between the player and a pursuer.
///
/// `ghosts` must be in identity order. House pursuers and returning eyes pass through the
/// player. A frightened pursuer is sent home and scored; any other pursuer catches the player.
pub fn check_pursuer_proximity<'a>(
    player: &mut PlayerState,
    player_pixel: Vec2,
    ghosts: impl IntoIterator<Item = (Ghost, &'a mut GhostState, Vec2)>,
    memory: &mut GhostMemory,
    streak: &mut CaptureStreak,
) -> Option<Contact> {
    if player.dying {
        return None;
    }

    for (ghost, state, pixel) in ghosts {
        if state.mode.is_house() || state.mode.is_returning() || !in_contact(player_pixel, pixel) {
            continue;
        }

        if state.mode == GhostMode::Frightened {
            ghost::transition_to_eyes(ghost, state, memory);
            let score = streak.award();
            info!(ghost = ?ghost, score, "Pursuer captured");
            return Some(Contact {
                ghost,
                captured: true,
                score,
                position: pixel,
            });
        }

        if is_deadly_contact(state.mode) {
            player.dying = true;
            info!(ghost = ?ghost, mode = ?state.mode, "Player caught");
            return Some(Contact {
                ghost,
                captured: false,
                score: 0,
                position: player_pixel,
            });
        }
    }
    None
}

/// Picks up whatever lies on the player's tile and feeds the pursuer timers.
#[allow(clippy::too_many_arguments)]
pub fn collectible_system(
    mut grid: ResMut<TileGrid>,
    level: Res<Level>,
    pause: Res<PickupPause>,
    mut release: ResMut<HouseRelease>,
    mut frightened: ResMut<FrightenedTimer>,
    mut streak: ResMut<CaptureStreak>,
    mut players: Query<(&mut PlayerState, &Position), With<PlayerControlled>>,
    mut ghosts: Query<(&Ghost, &mut GhostState), Without<PlayerControlled>>,
    mut events: EventWriter<GameEvent>,
) {
    let Ok((mut player, position)) = players.single_mut() else {
        warn!("No player to collect with");
        return;
    };

    let tile = position.tile;
    let Some(kind) = check_collectible(&mut grid, &mut player, tile, &pause, &mut streak) else {
        return;
    };

    let mut ordered: SmallVec<[_; 4]> = ghosts.iter_mut().map(|(ghost, state)| (*ghost, state)).collect();
    ordered.sort_by_key(|(ghost, _)| *ghost);
    let ordered = ordered.iter_mut().map(|(ghost, state)| (*ghost, &mut **state));

    match kind {
        Collectible::Pellet => {
            release.on_pellet_eaten(ordered);
        }
        Collectible::Power => {
            let seconds = ghost::on_power_eaten(level.0, &mut frightened, ordered);
            debug!(seconds, "Power pellet eaten");
            if seconds > 0.0 {
                events.write(GameEvent::FrightenedStarted { seconds });
            }
        }
    }
    events.write(GameEvent::CollectibleEaten { kind, tile });

    if grid.remaining_count() == 0 {
        info!(level = level.0, "Level cleared");
        events.write(GameEvent::LevelComplete);
    }
}

/// Checks the player against every pursuer once the pickup for this tick is resolved.
pub fn proximity_system(
    grid: Res<TileGrid>,
    mut streak: ResMut<CaptureStreak>,
    mut memory: ResMut<GhostMemory>,
    mut players: Query<(&mut PlayerState, &Position), With<PlayerControlled>>,
    mut ghosts: Query<(&Ghost, &mut GhostState, &Position), Without<PlayerControlled>>,
    mut events: EventWriter<GameEvent>,
) {
    if grid.remaining_count() == 0 {
        return;
    }
    let Ok((mut player, player_position)) = players.single_mut() else {
        return;
    };

    let mut ordered: SmallVec<[_; 4]> = ghosts.iter_mut().map(|(ghost, state, position)| (*ghost, state, position.pixel)).collect();
    ordered.sort_by_key(|(ghost, ..)| *ghost);
    let ordered = ordered.iter_mut().map(|(ghost, state, pixel)| (*ghost, &mut **state, *pixel));

    let contact = check_pursuer_proximity(&mut player, player_position.pixel, ordered, &mut memory, &mut streak);
    match contact {
        Some(Contact {
            ghost,
            captured: true,
            score,
            position,
        }) => {
            events.write(GameEvent::GhostCaptured { ghost, score, position });
        }
        Some(Contact { ghost, position, .. }) => {
            events.write(GameEvent::PlayerCaught { ghost, position });
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_scores_escalate_and_cap() {
        let mut streak = CaptureStreak::default();
        let scores: Vec<u32> = (0..6).map(|_| streak.award()).collect();
        assert_eq!(scores, vec![200, 400, 800, 1600, 1600, 1600]);
        streak.reset();
        assert_eq!(streak.award(), 200);
    }

    #[test]
    fn test_contact_is_per_axis() {
        assert!(in_contact(Vec2::new(100.0, 100.0), Vec2::new(106.0, 106.0)));
        assert!(!in_contact(Vec2::new(100.0, 100.0), Vec2::new(106.4, 100.0)));
        assert!(!in_contact(Vec2::new(100.0, 100.0), Vec2::new(100.0, 93.0)));
    }

    #[test]
    fn test_proximity_ignores_house_and_eyes() {
        let player_pixel = Vec2::new(50.0, 50.0);
        let mut player = PlayerState::default();
        let mut memory = GhostMemory::default();
        let mut streak = CaptureStreak::default();
        let mut states = [Ghost::Blinky, Ghost::Pinky, Ghost::Inky, Ghost::Clyde].map(GhostState::new);
        states[0].mode = GhostMode::Eyes;
        states[1].mode = GhostMode::InHouse;
        states[2].mode = GhostMode::Frightened;
        states[3].mode = GhostMode::Chase;

        let ghosts = Ghost::ALL.into_iter().zip(states.iter_mut()).map(|(ghost, state)| (ghost, state, player_pixel));
        let contact = check_pursuer_proximity(&mut player, player_pixel, ghosts, &mut memory, &mut streak);

        assert_eq!(
            contact,
            Some(Contact {
                ghost: Ghost::Inky,
                captured: true,
                score: 200,
                position: player_pixel,
            })
        );
        assert_eq!(states[2].mode, GhostMode::Eyes);
        assert_eq!(states[3].mode, GhostMode::Chase);
        assert!(!player.dying);
    }
}

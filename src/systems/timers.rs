//! Round-scoped pursuer timers: the scatter/chase wave, the frightened window, and the
//! house-release counters.

use bevy_ecs::{
    event::EventWriter,
    query::Without,
    resource::Resource,
    system::{Query, Res, ResMut},
};
use smallvec::SmallVec;
use tracing::debug;

use crate::constants::{self, WavePhase};
use crate::events::GameEvent;
use crate::systems::components::{ChaseMode, DeltaTime, Ghost, GhostMode, GhostState, PlayerControlled};
use crate::systems::ghost;

/// Global scatter/chase wave timer.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct WaveSchedule {
    table: &'static [WavePhase; 8],
    index: usize,
    elapsed: f32,
}

impl WaveSchedule {
    pub fn new(level: u32) -> Self {
        Self {
            table: constants::wave_table(level),
            index: 0,
            elapsed: 0.0,
        }
    }

    pub fn current_mode(&self) -> ChaseMode {
        if self.table[self.index].chase {
            ChaseMode::Chase
        } else {
            ChaseMode::Scatter
        }
    }

    pub fn phase_index(&self) -> usize {
        self.index
    }

    /// Seconds left in the current phase, or `None` for the final unbounded chase.
    pub fn phase_remaining(&self) -> Option<f32> {
        self.table[self.index].seconds.map(|seconds| (seconds - self.elapsed).max(0.0))
    }

    /// Advances the wave by `dt` and returns the new mode when a phase expires.
    ///
    /// The wave holds still while `paused` (a frightened window is running).
    pub fn tick(&mut self, dt: f32, paused: bool) -> Option<ChaseMode> {
        if paused {
            return None;
        }

        self.elapsed += dt;
        let duration = self.table[self.index].seconds?;
        if self.elapsed < duration || self.index + 1 >= self.table.len() {
            return None;
        }

        self.elapsed = 0.0;
        self.index += 1;
        Some(self.current_mode())
    }
}

/// Countdown for the frightened window opened by a power pellet.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct FrightenedTimer {
    remaining: f32,
}

impl FrightenedTimer {
    pub fn start(&mut self, seconds: f32) {
        self.remaining = seconds;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    /// Counts down. Returns `true` on the tick the window closes.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            return true;
        }
        false
    }
}

/// Decides when waiting pursuers may leave the house.
///
/// Each pellet feeds either the first waiting pursuer's own counter or, once a life has been
/// lost, a shared counter with its own thresholds. A stall timer forces the next pursuer out when
/// the player stops eating.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HouseRelease {
    level: u32,
    stall_elapsed: f32,
    stall_timeout: f32,
    global_counter: u32,
    use_global: bool,
}

impl HouseRelease {
    pub fn new(level: u32, stall_timeout: f32) -> Self {
        Self {
            level,
            stall_elapsed: 0.0,
            stall_timeout,
            global_counter: 0,
            use_global: false,
        }
    }

    /// Dots a pursuer's own counter must reach before it leaves.
    pub fn dot_limit(&self, ghost: Ghost) -> u32 {
        ghost.individual_dot_limit(self.level)
    }

    pub fn uses_global_counter(&self) -> bool {
        self.use_global
    }

    pub fn global_counter(&self) -> u32 {
        self.global_counter
    }

    /// Feeds a pellet to the release policy. Returns the pursuer released by the shared counter.
    ///
    /// `ghosts` must be in identity order.
    pub fn on_pellet_eaten<'a>(&mut self, ghosts: impl IntoIterator<Item = (Ghost, &'a mut GhostState)>) -> Option<Ghost> {
        self.stall_elapsed = 0.0;
        self.global_counter += 1;

        let mut waiting = ghosts.into_iter().filter(|(_, state)| state.mode == GhostMode::InHouse);
        if self.use_global {
            let (ghost, state) = waiting.find(|(ghost, _)| self.global_counter >= ghost.global_dot_limit())?;
            state.dot_counter = self.dot_limit(ghost);
            self.global_counter = 0;
            debug!(ghost = ?ghost, "Shared dot counter released pursuer");
            Some(ghost)
        } else {
            if let Some((_, state)) = waiting.next() {
                state.dot_counter += 1;
            }
            None
        }
    }

    /// Advances the stall timer, forcing the first waiting pursuer out when it expires.
    pub fn tick<'a>(&mut self, dt: f32, ghosts: impl IntoIterator<Item = (Ghost, &'a mut GhostState)>) -> Option<Ghost> {
        self.stall_elapsed += dt;
        if self.stall_elapsed <= self.stall_timeout {
            return None;
        }

        self.stall_elapsed = 0.0;
        let (ghost, state) = ghosts.into_iter().find(|(_, state)| state.mode == GhostMode::InHouse)?;
        state.dot_counter = self.dot_limit(ghost);
        debug!(ghost = ?ghost, "Stall timer forced pursuer out");
        Some(ghost)
    }

    /// Switches to the shared counter for the rest of the level.
    pub fn on_player_death(&mut self) {
        self.use_global = true;
        self.global_counter = 0;
        self.stall_elapsed = 0.0;
    }
}

/// Advances the wave, frightened and release timers, in that order.
pub fn ghost_timers_system(
    delta_time: Res<DeltaTime>,
    mut wave: ResMut<WaveSchedule>,
    mut frightened: ResMut<FrightenedTimer>,
    mut release: ResMut<HouseRelease>,
    mut ghosts: Query<(&Ghost, &mut GhostState), Without<PlayerControlled>>,
    mut events: EventWriter<GameEvent>,
) {
    let dt = delta_time.seconds;
    let mut ordered: SmallVec<[_; 4]> = ghosts.iter_mut().map(|(ghost, state)| (*ghost, state)).collect();
    ordered.sort_by_key(|(ghost, _)| *ghost);

    if let Some(mode) = wave.tick(dt, frightened.is_active()) {
        debug!(mode = mode.as_ref(), phase = wave.phase_index(), "Wave flipped");
        for (_, state) in ordered.iter_mut() {
            ghost::apply_wave_mode(state, mode);
        }
        events.write(GameEvent::WaveChanged(mode));
    }

    if frightened.tick(dt) {
        debug!("Frightened window closed");
        for (_, state) in ordered.iter_mut() {
            ghost::end_fright(state);
        }
        events.write(GameEvent::FrightenedEnded);
    }

    release.tick(dt, ordered.iter_mut().map(|(ghost, state)| (*ghost, &mut **state)));
}

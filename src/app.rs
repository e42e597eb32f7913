use std::time::{Duration, Instant};

use glam::IVec2;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::config::SimConfig;
use crate::constants::{LOOP_TIME, TURN_TOLERANCE};
use crate::error::GameResult;
use crate::map::level::{tile_center, LevelDefinition};
use crate::round::{GameStage, Round};

/// Stands in for a human at the controls: picks a random legal direction at every junction.
#[derive(Debug)]
pub struct Autopilot {
    rng: SmallRng,
    last_decision: Option<IVec2>,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            last_decision: None,
        }
    }

    /// Queues a direction when the player is stopped, or once per tile when it nears a junction.
    pub fn steer(&mut self, round: &mut Round) {
        let simulation = round.simulation();
        let (Some(state), Some(position)) = (simulation.player_state(), simulation.player_position()) else {
            return;
        };

        let tile = position.tile;
        let offset = (position.pixel - tile_center(tile)).abs();
        let near_center = offset.x + offset.y <= TURN_TOLERANCE;
        let stopped = state.current.is_none() || simulation.player_velocity().is_some_and(|velocity| velocity.heading == IVec2::ZERO);

        if !stopped && (!near_center || self.last_decision == Some(tile)) {
            return;
        }

        let current = if stopped { None } else { state.current };
        let options = simulation.grid().valid_directions(tile, current, false, false, false);
        if !stopped && options.len() < 2 {
            self.last_decision = Some(tile);
            return;
        }

        let Some(&direction) = options.choose(&mut self.rng) else {
            return;
        };
        self.last_decision = Some(tile);
        trace!(tile = %tile, direction = direction.as_ref(), "Autopilot steering");
        round.queue_intent(direction);
    }
}

/// Headless runner: drives a [`Round`] with the autopilot on a fixed timestep.
pub struct App {
    pub round: Round,
    autopilot: Autopilot,
    realtime: bool,
    ticks_left: u64,
    ticks_run: u64,
}

impl App {
    /// Builds the classic board and a round for it.
    ///
    /// # Errors
    ///
    /// Propagates level loading errors from `Round::new()`.
    pub fn new(config: &SimConfig) -> GameResult<Self> {
        info!(seed = config.seed, level = config.start_level, seconds = config.seconds, "Initializing headless simulation");
        let round = Round::new(&LevelDefinition::classic(), config)?;
        let ticks_left = (config.seconds / LOOP_TIME.as_secs_f32()).ceil() as u64;

        Ok(Self {
            round,
            // Offset so the player and the pursuers never share a random stream
            autopilot: Autopilot::new(config.seed.wrapping_add(1)),
            realtime: config.realtime,
            ticks_left,
            ticks_run: 0,
        })
    }

    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    /// Executes a single fixed step, sleeping out the rest of the frame in real-time mode.
    ///
    /// # Returns
    ///
    /// `true` if the run should continue, `false` once time is up or the game is over.
    pub fn run(&mut self) -> bool {
        if self.ticks_left == 0 || self.round.stage() == GameStage::GameOver {
            return false;
        }

        let start = Instant::now();
        if self.round.stage().is_playing() {
            self.autopilot.steer(&mut self.round);
        }
        if self.round.update(LOOP_TIME.as_secs_f32()) {
            debug!(stage = ?self.round.stage(), tick = self.ticks_run, "Stage changed");
        }
        self.ticks_left -= 1;
        self.ticks_run += 1;

        if self.realtime {
            let time = LOOP_TIME.saturating_sub(start.elapsed());
            if time != Duration::ZERO {
                spin_sleep::sleep(time);
            }
        }

        true
    }
}

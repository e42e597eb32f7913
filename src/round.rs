//! The round controller: stage timers, score and lives around a [`Simulation`].

use tracing::{debug, info};

use crate::config::SimConfig;
use crate::constants::{self, stage};
use crate::error::GameResult;
use crate::map::direction::Direction;
use crate::map::level::LevelDefinition;
use crate::game::Simulation;
use crate::systems::Ghost;

/// The coarse stage of a round. Only `Playing` advances the simulation.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum GameStage {
    /// Short freeze before play starts or resumes.
    Ready { remaining: f32 },
    Playing,
    /// Freeze after a capture, showing the score awarded for `ghost`.
    GhostEatenPause { remaining: f32, ghost: Ghost },
    /// The player was caught; a life is taken when the timer runs out.
    Dying { remaining: f32 },
    /// The board is clear; the next level loads when the timer runs out.
    LevelComplete { remaining: f32 },
    GameOver,
}

impl GameStage {
    pub fn is_playing(&self) -> bool {
        matches!(self, GameStage::Playing)
    }
}

/// Counts a stage timer down. Returns `true` once it has run out.
fn countdown(remaining: &mut f32, dt: f32) -> bool {
    *remaining -= dt;
    *remaining <= 0.0
}

pub struct Round {
    simulation: Simulation,
    stage: GameStage,
    score: u32,
    lives: u32,
    extra_life_awarded: bool,
    intent: Option<Direction>,
}

impl Round {
    pub fn new(level: &LevelDefinition, config: &SimConfig) -> GameResult<Self> {
        Ok(Self {
            simulation: Simulation::new(level, config)?,
            stage: GameStage::Ready { remaining: stage::READY },
            score: 0,
            lives: config.lives,
            extra_life_awarded: false,
            intent: None,
        })
    }

    pub fn stage(&self) -> GameStage {
        self.stage
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.simulation.level()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// Buffers a direction; it reaches the simulation on the next playing tick.
    pub fn queue_intent(&mut self, direction: Direction) {
        self.intent = Some(direction);
    }

    /// Advances the round by one fixed step. Returns `true` if the stage changed.
    pub fn update(&mut self, dt: f32) -> bool {
        let next = match &mut self.stage {
            GameStage::Ready { remaining } => countdown(remaining, dt).then_some(GameStage::Playing),
            GameStage::Playing => self.play(dt),
            GameStage::GhostEatenPause { remaining, .. } => countdown(remaining, dt).then_some(GameStage::Playing),
            GameStage::Dying { remaining } => countdown(remaining, dt).then(|| self.lose_life()),
            GameStage::LevelComplete { remaining } => countdown(remaining, dt).then(|| self.next_level()),
            GameStage::GameOver => None,
        };

        match next {
            Some(stage) => {
                debug!(from = ?self.stage, to = ?stage, "Stage transition");
                self.stage = stage;
                true
            }
            None => false,
        }
    }

    fn play(&mut self, dt: f32) -> Option<GameStage> {
        if let Some(direction) = self.intent.take() {
            self.simulation.handle_player_intent(direction);
        }

        let report = self.simulation.advance(dt);
        self.add_score(report.score_delta());

        if report.level_complete() {
            info!(level = self.level(), score = self.score, "Level complete");
            return Some(GameStage::LevelComplete {
                remaining: stage::LEVEL_COMPLETE,
            });
        }
        if let Some(ghost) = report.player_caught() {
            info!(ghost = ?ghost, lives = self.lives, "Player caught");
            return Some(GameStage::Dying { remaining: stage::DYING });
        }
        report.captures().last().map(|(ghost, _)| GameStage::GhostEatenPause {
            remaining: stage::GHOST_EATEN_PAUSE,
            ghost,
        })
    }

    fn add_score(&mut self, points: u32) {
        self.score += points;
        if !self.extra_life_awarded && self.score >= constants::EXTRA_LIFE_SCORE {
            self.extra_life_awarded = true;
            self.lives += 1;
            info!(score = self.score, lives = self.lives, "Extra life awarded");
        }
    }

    fn lose_life(&mut self) -> GameStage {
        self.lives = self.lives.saturating_sub(1);
        self.intent = None;
        if self.lives == 0 {
            info!(score = self.score, level = self.level(), "Game over");
            return GameStage::GameOver;
        }
        self.simulation.reset_for_new_life();
        GameStage::Ready { remaining: stage::READY }
    }

    fn next_level(&mut self) -> GameStage {
        self.intent = None;
        self.simulation.reset_for_new_level(self.level() + 1);
        GameStage::Ready { remaining: stage::READY }
    }
}

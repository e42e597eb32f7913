use anyhow::Context;
use clap::Parser;
use pacman_sim::{app::App, config::SimConfig, constants::LOOP_TIME, logging};
use thousands::Separable;
use tracing::info;

/// Runs a seeded headless game and logs how it went.
pub fn main() -> anyhow::Result<()> {
    logging::setup_logging();

    let config = SimConfig::parse();
    let mut app = App::new(&config).context("Could not create simulation")?;

    info!(loop_time = ?LOOP_TIME, realtime = config.realtime, "Starting simulation loop");
    while app.run() {}

    let round = &app.round;
    info!(
        score = %round.score().separate_with_commas(),
        level = round.level(),
        lives = round.lives(),
        stage = ?round.stage(),
        ticks = %app.ticks_run().separate_with_commas(),
        "Simulation finished"
    );

    Ok(())
}

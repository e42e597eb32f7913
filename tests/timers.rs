use bevy_ecs::{event::Events, system::RunSystemOnce, world::World};
use pacman_sim::{
    events::GameEvent,
    systems::{
        ghost_timers_system, ChaseMode, DeltaTime, FrightenedTimer, Ghost, GhostMode, GhostState, HouseRelease, WaveSchedule,
    },
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

fn waiting_states() -> [GhostState; 4] {
    [
        common::ghost_in_mode(Ghost::Blinky, GhostMode::Scatter),
        common::ghost_in_mode(Ghost::Pinky, GhostMode::InHouse),
        common::ghost_in_mode(Ghost::Inky, GhostMode::InHouse),
        common::ghost_in_mode(Ghost::Clyde, GhostMode::InHouse),
    ]
}

#[test]
fn test_wave_starts_in_scatter_and_flips() {
    let mut wave = WaveSchedule::new(1);
    assert_that(&wave.current_mode()).is_equal_to(ChaseMode::Scatter);
    assert_that(&wave.phase_remaining()).is_equal_to(Some(7.0));

    assert_that(&wave.tick(3.5, false)).is_none();
    assert_that(&wave.tick(3.5, false)).is_equal_to(Some(ChaseMode::Chase));
    assert_that(&wave.phase_index()).is_equal_to(1);
    assert_that(&wave.phase_remaining()).is_equal_to(Some(20.0));
}

#[test]
fn test_wave_holds_while_paused() {
    let mut wave = WaveSchedule::new(1);
    for _ in 0..10 {
        assert_that(&wave.tick(5.0, true)).is_none();
    }
    assert_that(&wave.phase_index()).is_equal_to(0);
    assert_that(&wave.phase_remaining()).is_equal_to(Some(7.0));
}

#[test]
fn test_wave_ends_in_unbounded_chase() {
    let mut wave = WaveSchedule::new(5);
    let mut flips = Vec::new();
    for _ in 0..20 {
        if let Some(mode) = wave.tick(2000.0, false) {
            flips.push(mode);
        }
    }

    assert_that(&wave.phase_index()).is_equal_to(7);
    assert_that(&wave.current_mode()).is_equal_to(ChaseMode::Chase);
    assert_that(&wave.phase_remaining()).is_none();
    assert_eq!(flips.len(), 7);
}

#[test]
fn test_frightened_timer_counts_down() {
    let mut timer = FrightenedTimer::default();
    assert_that(&timer.is_active()).is_false();
    assert_that(&timer.tick(1.0)).is_false();

    timer.start(1.0);
    assert_that(&timer.tick(0.5)).is_false();
    assert_that(&timer.is_active()).is_true();
    assert_that(&timer.tick(0.5)).is_true();
    assert_that(&timer.is_active()).is_false();
    assert_that(&timer.remaining()).is_equal_to(0.0);
}

#[test]
fn test_pellets_feed_first_waiting_pursuer() {
    let mut release = HouseRelease::new(1, 4.0);
    let mut states = waiting_states();

    for _ in 0..3 {
        release.on_pellet_eaten(Ghost::ALL.into_iter().zip(states.iter_mut()));
    }
    assert_that(&states[1].dot_counter).is_equal_to(3);
    assert_that(&states[2].dot_counter).is_equal_to(0);

    states[1].mode = GhostMode::LeavingHouse;
    release.on_pellet_eaten(Ghost::ALL.into_iter().zip(states.iter_mut()));
    assert_that(&states[2].dot_counter).is_equal_to(1);
    assert_that(&states[3].dot_counter).is_equal_to(0);
}

#[test]
fn test_shared_counter_after_a_death() {
    let mut release = HouseRelease::new(1, 4.0);
    release.on_player_death();
    assert_that(&release.uses_global_counter()).is_true();

    let mut states = waiting_states();
    let mut released = Vec::new();
    for _ in 0..7 {
        released.push(release.on_pellet_eaten(Ghost::ALL.into_iter().zip(states.iter_mut())));
    }

    assert_eq!(released, vec![None, None, None, None, None, None, Some(Ghost::Pinky)]);
    assert_that(&release.global_counter()).is_equal_to(0);
    // Individual counters are left alone.
    assert_that(&states[2].dot_counter).is_equal_to(0);
}

#[test]
fn test_stall_timer_forces_next_pursuer_out() {
    let mut release = HouseRelease::new(1, 4.0);
    let mut states = waiting_states();
    states[1].mode = GhostMode::Chase;

    assert_that(&release.tick(4.0, Ghost::ALL.into_iter().zip(states.iter_mut()))).is_none();
    assert_that(&release.tick(0.1, Ghost::ALL.into_iter().zip(states.iter_mut()))).is_equal_to(Some(Ghost::Inky));
    assert_that(&states[2].dot_counter).is_equal_to(30);

    // A pellet restarts the stall timer.
    release.tick(3.0, Ghost::ALL.into_iter().zip(states.iter_mut()));
    release.on_pellet_eaten(Ghost::ALL.into_iter().zip(states.iter_mut()));
    assert_that(&release.tick(3.0, Ghost::ALL.into_iter().zip(states.iter_mut()))).is_none();
}

fn timer_world(dt: f32) -> World {
    let mut world = World::default();
    world.init_resource::<Events<GameEvent>>();
    world.insert_resource(DeltaTime { seconds: dt });
    world.insert_resource(WaveSchedule::new(1));
    world.insert_resource(FrightenedTimer::default());
    world.insert_resource(HouseRelease::new(1, 4.0));
    world
}

fn drain(world: &mut World) -> Vec<GameEvent> {
    world.resource_mut::<Events<GameEvent>>().drain().collect()
}

#[test]
fn test_timer_system_flips_wave() {
    let mut world = timer_world(7.0);
    let blinky = world.spawn((Ghost::Blinky, common::ghost_in_mode(Ghost::Blinky, GhostMode::Scatter))).id();
    let pinky = world.spawn((Ghost::Pinky, GhostState::new(Ghost::Pinky))).id();

    world.run_system_once(ghost_timers_system).expect("System should run successfully");

    let blinky = world.get::<GhostState>(blinky).unwrap();
    assert_that(&blinky.mode).is_equal_to(GhostMode::Chase);
    assert_that(&blinky.reverse_requested).is_true();
    assert_that(&world.get::<GhostState>(pinky).unwrap().mode).is_equal_to(GhostMode::InHouse);
    assert_eq!(drain(&mut world), vec![GameEvent::WaveChanged(ChaseMode::Chase)]);
}

#[test]
fn test_timer_system_ends_fright() {
    let mut world = timer_world(1.0);
    world.resource_mut::<FrightenedTimer>().start(0.5);
    let mut state = common::ghost_in_mode(Ghost::Blinky, GhostMode::Frightened);
    state.previous_chase_mode = ChaseMode::Chase;
    let blinky = world.spawn((Ghost::Blinky, state)).id();

    world.run_system_once(ghost_timers_system).expect("System should run successfully");

    assert_that(&world.get::<GhostState>(blinky).unwrap().mode).is_equal_to(GhostMode::Chase);
    assert_eq!(drain(&mut world), vec![GameEvent::FrightenedEnded]);
    // The wave was paused while the window ran.
    assert_that(&world.resource::<WaveSchedule>().phase_remaining()).is_equal_to(Some(7.0));
}

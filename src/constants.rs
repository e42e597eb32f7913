//! This module contains all the constants used by the simulation.

use std::time::Duration;

use glam::{IVec2, UVec2};

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of each tile, in pixels.
pub const TILE_SIZE: i32 = 8;
/// The size of the classic board, in tiles.
pub const BOARD_TILE_SIZE: UVec2 = UVec2::new(28, 36);

/// Full-speed movement, in pixels per second. Every speed is a multiplier of this.
pub const BASE_SPEED: f32 = 75.75;
/// Multiplier applied to eyes returning to (and entering) the house.
pub const EYES_SPEED_MULTIPLIER: f32 = 1.5;
/// Fraction of the current speed used while bouncing inside the house.
pub const HOUSE_BOUNCE_SPEED_FACTOR: f32 = 0.4;
/// Vertical half-span of the in-house bounce around the house center, in pixels.
pub const HOUSE_BOUNCE_HALF_SPAN: f32 = 3.0;
/// How close (per axis) eyes must get to the house entrance before entering.
pub const EYES_ARRIVAL_TOLERANCE: f32 = 4.0;

/// Manhattan distance from the tile center inside which a buffered turn may commit.
pub const TURN_TOLERANCE: f32 = 4.0;
/// Manhattan distance from the tile center inside which a committed turn snaps to center.
pub const TURN_SNAP_TOLERANCE: f32 = 2.0;
/// How far the player walks off either edge before reappearing on the other side.
pub const PLAYER_TUNNEL_BUFFER: f32 = (TILE_SIZE * 2) as f32;
/// Horizontal overshoot past either edge that triggers a pursuer wrap.
pub const PURSUER_TUNNEL_BUFFER: f32 = (TILE_SIZE / 2) as f32;
/// Per-axis proximity (80% of a tile) that counts as contact between the player and a pursuer.
pub const CONTACT_DISTANCE: f32 = TILE_SIZE as f32 * 0.8;

/// Speed multipliers for a single level tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSpeeds {
    pub player: f32,
    pub ghost: f32,
    pub frightened_player: f32,
    pub frightened_ghost: f32,
    pub tunnel: f32,
}

/// Per-level speed tiers; levels past the end reuse the last entry.
pub const LEVEL_SPEEDS: [LevelSpeeds; 5] = [
    LevelSpeeds {
        player: 0.8,
        ghost: 0.75,
        frightened_player: 0.9,
        frightened_ghost: 0.5,
        tunnel: 0.4,
    },
    LevelSpeeds {
        player: 0.9,
        ghost: 0.85,
        frightened_player: 0.95,
        frightened_ghost: 0.55,
        tunnel: 0.45,
    },
    LevelSpeeds {
        player: 0.9,
        ghost: 0.85,
        frightened_player: 0.95,
        frightened_ghost: 0.55,
        tunnel: 0.45,
    },
    LevelSpeeds {
        player: 0.9,
        ghost: 0.85,
        frightened_player: 0.95,
        frightened_ghost: 0.55,
        tunnel: 0.45,
    },
    LevelSpeeds {
        player: 1.0,
        ghost: 0.95,
        frightened_player: 1.0,
        frightened_ghost: 0.6,
        tunnel: 0.5,
    },
];

/// Returns the speed table for a level (1-based).
pub fn level_speeds(level: u32) -> &'static LevelSpeeds {
    let index = (level.max(1) as usize - 1).min(LEVEL_SPEEDS.len() - 1);
    &LEVEL_SPEEDS[index]
}

/// One entry of a scatter/chase wave table. `seconds` of `None` never expires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavePhase {
    pub chase: bool,
    pub seconds: Option<f32>,
}

const fn scatter(seconds: f32) -> WavePhase {
    WavePhase {
        chase: false,
        seconds: Some(seconds),
    }
}

const fn chase(seconds: f32) -> WavePhase {
    WavePhase {
        chase: true,
        seconds: Some(seconds),
    }
}

const CHASE_FOREVER: WavePhase = WavePhase {
    chase: true,
    seconds: None,
};

/// Wave tables for level 1, levels 2-4, and level 5 onwards.
pub const WAVE_TABLES: [[WavePhase; 8]; 3] = [
    [
        scatter(7.0),
        chase(20.0),
        scatter(7.0),
        chase(20.0),
        scatter(5.0),
        chase(20.0),
        scatter(5.0),
        CHASE_FOREVER,
    ],
    [
        scatter(7.0),
        chase(20.0),
        scatter(7.0),
        chase(20.0),
        scatter(5.0),
        chase(1037.0),
        scatter(0.001),
        CHASE_FOREVER,
    ],
    [
        scatter(5.0),
        chase(20.0),
        scatter(5.0),
        chase(20.0),
        scatter(5.0),
        chase(1037.0),
        scatter(0.001),
        CHASE_FOREVER,
    ],
];

/// Returns the wave table used on a level (1-based).
pub fn wave_table(level: u32) -> &'static [WavePhase; 8] {
    match level {
        0 | 1 => &WAVE_TABLES[0],
        2..=4 => &WAVE_TABLES[1],
        _ => &WAVE_TABLES[2],
    }
}

/// Frightened durations per level, in seconds. Zero means "reverse only".
pub const FRIGHTENED_SECONDS: [f32; 20] = [
    6.0, 5.0, 4.0, 3.0, 2.0, 5.0, 2.0, 2.0, 1.0, 5.0, 2.0, 1.0, 1.0, 3.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0,
];

pub fn frightened_seconds(level: u32) -> f32 {
    let index = (level.max(1) as usize - 1).min(FRIGHTENED_SECONDS.len() - 1);
    FRIGHTENED_SECONDS[index]
}

/// Shared dot-counter thresholds used after a life is lost, in pursuer identity order.
pub const GLOBAL_DOT_LIMITS: [u32; 4] = [0, 7, 17, 32];

/// Seconds without a pellet before the next pursuer is forced out of the house.
pub const HOUSE_STALL_SECONDS: f32 = 4.0;

/// Score values.
pub mod points {
    pub const PELLET: u32 = 10;
    pub const POWER: u32 = 50;
    /// Escalating capture awards within a single frightened window.
    pub const CAPTURES: [u32; 4] = [200, 400, 800, 1600];
}

pub const LIVES_START: u32 = 4;
pub const EXTRA_LIFE_SCORE: u32 = 10_000;

/// Post-pickup movement freeze for the player, in frames.
pub const PELLET_PAUSE_FRAMES: u32 = 0;
pub const POWER_PAUSE_FRAMES: u32 = 0;

/// Round controller stage durations, in seconds.
pub mod stage {
    pub const READY: f32 = 2.0;
    pub const GHOST_EATEN_PAUSE: f32 = 1.0;
    pub const DYING: f32 = 1.5;
    pub const LEVEL_COMPLETE: f32 = 2.0;
}

/// Scatter corners, in pursuer identity order.
pub const SCATTER_TARGETS: [IVec2; 4] = [IVec2::new(25, 0), IVec2::new(2, 0), IVec2::new(27, 35), IVec2::new(0, 35)];

/// Tile above the gate where pursuers leave the house and eyes aim for.
pub const HOUSE_ENTRANCE: IVec2 = IVec2::new(14, 14);
/// Tile at the middle of the house interior.
pub const HOUSE_CENTER: IVec2 = IVec2::new(14, 17);

pub const PLAYER_START: IVec2 = IVec2::new(14, 26);
/// Pursuer start tiles, in identity order.
pub const GHOST_STARTS: [IVec2; 4] = [IVec2::new(14, 14), IVec2::new(14, 17), IVec2::new(12, 17), IVec2::new(16, 17)];

/// The row holding the wraparound tunnel.
pub const TUNNEL_ROW: i32 = 17;
/// How many tiles at each end of the tunnel row slow actors down.
pub const TUNNEL_SLOWDOWN_SPAN: i32 = 6;

/// Tiles where pursuers in scatter or chase may not choose to turn up.
pub const NO_UP_TURN_TILES: [IVec2; 4] = [IVec2::new(12, 14), IVec2::new(15, 14), IVec2::new(12, 26), IVec2::new(15, 26)];

/// The raw layout of the classic board.
///
/// `#` wall, `.` pellet, `o` power pellet, `=` gate, `T` tunnel, ` ` empty.
pub const RAW_BOARD: [&str; BOARD_TILE_SIZE.y as usize] = [
    "                            ",
    "                            ",
    "                            ",
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###==### ##.#     ",
    "######.## #      # ##.######",
    "TTTTTT.   #      #   .TTTTTT",
    "######.## #      # ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
    "                            ",
    "                            ",
];

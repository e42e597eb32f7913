use glam::{IVec2, Vec2};
use pacman_sim::{
    map::{
        direction::Direction,
        level::{Actor, LevelDefinition},
        tile::{Collectible, TileKind},
    },
    systems::Ghost,
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

#[test]
fn test_classic_grid_dimensions_and_counts() {
    let grid = common::classic_grid();

    assert_that(&grid.width()).is_equal_to(28);
    assert_that(&grid.height()).is_equal_to(36);
    assert_that(&grid.tunnel_row()).is_equal_to(17);
    assert_that(&grid.pellets_remaining()).is_equal_to(240);
    assert_that(&grid.power_remaining()).is_equal_to(4);
    assert_that(&grid.remaining_count()).is_equal_to(244);
    assert_that(&grid.authored_count()).is_equal_to(244);
}

#[test]
fn test_vertical_out_of_bounds_is_wall() {
    let grid = common::classic_grid();

    assert_that(&grid.kind_at(IVec2::new(5, -1))).is_equal_to(TileKind::Wall);
    assert_that(&grid.kind_at(IVec2::new(5, 36))).is_equal_to(TileKind::Wall);
    assert_that(&grid.is_wall(IVec2::new(14, 500))).is_true();
}

#[test]
fn test_horizontal_out_of_bounds_wraps() {
    let grid = common::classic_grid();

    assert_eq!(grid.tile_at(IVec2::new(-1, 17)), grid.tile_at(IVec2::new(27, 17)));
    assert_eq!(grid.tile_at(IVec2::new(28, 17)), grid.tile_at(IVec2::new(0, 17)));
    assert_eq!(grid.kind_at(IVec2::new(-1, 17)), TileKind::Tunnel);
    assert_eq!(grid.pixel_to_tile(Vec2::new(-4.0, 140.0)), IVec2::new(27, 17));
}

#[test]
fn test_gate_only_admits_returning_pursuers() {
    let grid = common::classic_grid();
    let gate = IVec2::new(13, 15);

    assert_that(&grid.is_gate(gate)).is_true();
    assert_that(&grid.can_enter(gate, true, false)).is_false();
    assert_that(&grid.can_enter(gate, true, true)).is_true();
    assert_that(&grid.can_enter(gate, false, false)).is_true();
    assert_that(&grid.can_enter(IVec2::new(0, 3), false, false)).is_false();
}

#[test]
fn test_zone_flags() {
    let grid = common::classic_grid();

    for x in (0..6).chain(22..28) {
        assert!(grid.is_slowdown(IVec2::new(x, 17)), "tile ({x}, 17) should slow pursuers");
    }
    assert_that(&grid.is_slowdown(IVec2::new(6, 17))).is_false();

    for tile in [IVec2::new(12, 14), IVec2::new(15, 14), IVec2::new(12, 26), IVec2::new(15, 26)] {
        assert!(grid.is_no_up_turn(tile), "{tile} should forbid turning up");
    }
    assert_that(&grid.is_no_up_turn(IVec2::new(13, 14))).is_false();
}

#[test]
fn test_house_membership() {
    let grid = common::classic_grid();

    assert_that(&grid.is_in_house(IVec2::new(11, 16))).is_true();
    assert_that(&grid.is_in_house(IVec2::new(16, 18))).is_true();
    assert_that(&grid.is_in_house(IVec2::new(14, 14))).is_false();
}

#[test]
fn test_collect_is_idempotent() {
    let mut grid = common::classic_grid();
    let pellet = IVec2::new(1, 4);

    assert_that(&grid.has_collectible(pellet)).is_true();
    assert_that(&grid.collect(pellet)).is_equal_to(Some(Collectible::Pellet));
    assert_that(&grid.collect(pellet)).is_equal_to(None);
    assert_that(&grid.remaining_count()).is_equal_to(243);
    assert_that(&grid.has_collectible(pellet)).is_false();
}

#[test]
fn test_collect_power_and_empty_tiles() {
    let mut grid = common::classic_grid();

    assert_that(&grid.collect(IVec2::new(1, 6))).is_equal_to(Some(Collectible::Power));
    assert_that(&grid.power_remaining()).is_equal_to(3);
    assert_that(&grid.collect(IVec2::new(14, 26))).is_equal_to(None);
    assert_that(&grid.collect(IVec2::new(0, 0))).is_equal_to(None);
    assert_that(&grid.collect(IVec2::new(3, 99))).is_equal_to(None);
    assert_that(&grid.remaining_count()).is_equal_to(grid.pellets_remaining() + grid.power_remaining());
}

#[test]
fn test_reset_restores_authored_collectibles() {
    let mut grid = common::classic_grid();
    for x in 1..13 {
        grid.collect(IVec2::new(x, 4));
    }
    grid.collect(IVec2::new(26, 6));
    assert_that(&grid.remaining_count()).is_less_than(244);

    grid.reset_collectibles();
    assert_that(&grid.remaining_count()).is_equal_to(244);
    assert_that(&grid.has_collectible(IVec2::new(26, 6))).is_true();
}

#[test]
fn test_valid_directions_never_solid_or_reverse() {
    let grid = common::classic_grid();
    let currents = [None, Some(Direction::Up), Some(Direction::Left), Some(Direction::Down), Some(Direction::Right)];

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let tile = IVec2::new(x, y);
            for current in currents {
                for (is_pursuer, eyes) in [(false, false), (true, false), (true, true)] {
                    for direction in grid.valid_directions(tile, current, is_pursuer, eyes, true) {
                        let next = tile + direction.as_ivec2();
                        assert!(!grid.is_wall(next), "{tile} offered a move into the wall at {next}");
                        assert!(current.map(Direction::opposite) != Some(direction), "{tile} offered a reversal");
                    }
                }
            }
        }
    }
}

#[test]
fn test_valid_directions_order_and_no_up() {
    let grid = common::classic_grid();

    // Junction on the wide corridor: up, down and right are open when heading right.
    assert_eq!(
        grid.valid_directions(IVec2::new(6, 8), Some(Direction::Right), true, false, true).to_vec(),
        vec![Direction::Up, Direction::Down, Direction::Right]
    );
    assert_eq!(
        grid.valid_directions(IVec2::new(12, 14), Some(Direction::Left), true, false, true).to_vec(),
        vec![Direction::Left]
    );
    assert_eq!(
        grid.valid_directions(IVec2::new(12, 14), Some(Direction::Left), true, false, false).to_vec(),
        vec![Direction::Up, Direction::Left]
    );
}

#[test]
fn test_start_tiles_and_pixels() {
    let grid = common::classic_grid();

    assert_that(&grid.start_tile(Actor::Player)).is_equal_to(IVec2::new(14, 26));
    assert_that(&grid.start_pixel(Actor::Player)).is_equal_to(Vec2::new(112.0, 212.0));
    assert_that(&grid.start_pixel(Ghost::Blinky.into())).is_equal_to(Vec2::new(112.0, 116.0));
    assert_that(&grid.start_pixel(Ghost::Inky.into())).is_equal_to(Vec2::new(96.0, 140.0));
    assert_that(&grid.start_pixel(Ghost::Clyde.into())).is_equal_to(Vec2::new(128.0, 140.0));
    assert_that(&grid.house().entrance_pixel()).is_equal_to(Vec2::new(116.0, 116.0));
}

#[test]
fn test_custom_level_builds() {
    let level = common::ring_level();
    let grid = pacman_sim::map::grid::TileGrid::new(&level).unwrap();

    assert_that(&grid.remaining_count()).is_equal_to(22);
    assert_ne!(level, LevelDefinition::classic());
}

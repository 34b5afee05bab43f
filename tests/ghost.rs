use std::time::Duration;

use glam::IVec2;
use pacman_core::constants::{speed, LOOP_TIME, RAW_LAYOUTS};
use pacman_core::entity::factory::GhostFactory;
use pacman_core::entity::ghost::{Ghost, GhostMode, GhostTick, GhostType};
use pacman_core::entity::strategy::Strategy;
use pacman_core::entity::Entity;
use pacman_core::map::board::Board;
use pacman_core::map::direction::Direction;
use pacman_core::map::layout::MazeLayout;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use speculoos::prelude::*;
use strum::IntoEnumIterator;

mod common;

fn ghost_at(position: IVec2) -> Ghost {
    Ghost::new(GhostType::Blinky, position, IVec2::new(3, -1), speed::GHOST_BASE)
}

fn tick(pacman_powered: bool, alternation: GhostMode) -> GhostTick {
    GhostTick {
        targets: common::context(IVec2::new(6, 6), None),
        pacman_powered,
        alternation,
        dt: LOOP_TIME,
    }
}

#[test]
fn test_personalities() {
    assert_that(&GhostType::Blinky.chase_strategy()).is_equal_to(Strategy::DirectChase);
    assert_that(&GhostType::Pinky.chase_strategy()).is_equal_to(Strategy::Ambush);
    assert_that(&GhostType::Inky.chase_strategy()).is_equal_to(Strategy::Pincer);
    assert_that(&GhostType::Clyde.chase_strategy()).is_equal_to(Strategy::Shy);
}

#[test]
fn test_speed_follows_mode() {
    let mut ghost = ghost_at(IVec2::new(1, 1));
    let normal = ghost.mover().speed();

    ghost.set_mode(GhostMode::Frightened);
    assert_that(&ghost.mover().speed()).is_equal_to(normal * 0.5);

    ghost.set_mode(GhostMode::Eaten);
    assert_that(&ghost.mover().speed()).is_greater_than(normal);

    ghost.set_mode(GhostMode::InHouse);
    assert_that(&ghost.mover().speed()).is_equal_to(0.0);

    ghost.set_mode(GhostMode::Chase);
    assert_that(&ghost.mover().speed()).is_equal_to(normal);
}

#[test]
fn test_frighten_reverses_immediately() {
    let mut ghost = ghost_at(IVec2::new(1, 1));
    ghost.mover_mut().set_direction(Some(Direction::Left));

    assert_that(&ghost.frighten()).is_true();
    assert_that(&ghost.mode()).is_equal_to(GhostMode::Frightened);
    assert_that(&ghost.direction()).is_equal_to(Some(Direction::Right));
    assert_that(&ghost.is_vulnerable()).is_true();
    assert_that(&ghost.is_dangerous()).is_false();
}

#[test]
fn test_frighten_ignores_eaten_and_frightened_ghosts() {
    let mut ghost = ghost_at(IVec2::new(1, 1));
    ghost.on_eaten();
    assert_that(&ghost.frighten()).is_false();
    assert_that(&ghost.mode()).is_equal_to(GhostMode::Eaten);

    let mut frightened = ghost_at(IVec2::new(1, 1));
    frightened.frighten();
    frightened.mover_mut().set_direction(Some(Direction::Up));
    assert_that(&frightened.frighten()).is_false();
    assert_that(&frightened.direction()).is_equal_to(Some(Direction::Up));
}

#[test]
fn test_alternation_skips_frightened_and_eaten() {
    let mut ghost = ghost_at(IVec2::new(1, 1));
    ghost.mover_mut().set_direction(Some(Direction::Down));
    assert_that(&ghost.sync_alternation(GhostMode::Chase)).is_true();
    assert_that(&ghost.direction()).is_equal_to(Some(Direction::Up));
    assert_that(&ghost.sync_alternation(GhostMode::Chase)).is_false();

    ghost.frighten();
    assert_that(&ghost.sync_alternation(GhostMode::Scatter)).is_false();
    assert_that(&ghost.mode()).is_equal_to(GhostMode::Frightened);

    ghost.on_eaten();
    assert_that(&ghost.sync_alternation(GhostMode::Scatter)).is_false();
    assert_that(&ghost.mode()).is_equal_to(GhostMode::Eaten);
}

#[test]
fn test_frightened_reverts_to_alternation_mode() {
    let board = common::board(&common::OPEN_ARENA);
    let mut rng = SmallRng::seed_from_u64(1);
    let mut ghost = ghost_at(IVec2::new(4, 4));
    ghost.frighten();

    ghost.update(&board, &tick(true, GhostMode::Chase), &mut rng);
    assert_that(&ghost.mode()).is_equal_to(GhostMode::Frightened);

    ghost.update(&board, &tick(false, GhostMode::Chase), &mut rng);
    assert_that(&ghost.mode()).is_equal_to(GhostMode::Chase);
}

#[test]
fn test_eaten_ghost_returns_home_then_scatters() {
    let board = common::board(&["#######", "#     #", "#     #", "#     #", "#     #", "#######"]);
    let mut rng = SmallRng::seed_from_u64(1);
    let mut ghost = ghost_at(IVec2::new(1, 1));
    ghost.mover_mut().place(IVec2::new(4, 3));
    ghost.on_eaten();

    let mut visited = vec![ghost.position()];
    for _ in 0..10 {
        if ghost.mode() != GhostMode::Eaten {
            break;
        }
        ghost.update(&board, &tick(false, GhostMode::Chase), &mut rng);
        visited.push(ghost.position());
    }

    // Scatter starts on the update that lands on the home cell
    assert_that(&ghost.position()).is_equal_to(IVec2::new(1, 1));
    assert_that(&ghost.mode()).is_equal_to(GhostMode::Scatter);
    assert_that(&visited[1]).is_equal_to(IVec2::new(3, 3));
    assert_that(&visited.len()).is_equal_to(5);
}

#[test]
fn test_eaten_ghost_reaches_home_from_every_cell_of_built_in_mazes() {
    let mut rng = SmallRng::seed_from_u64(1);

    for (index, raw) in RAW_LAYOUTS.iter().enumerate() {
        let board = Board::new(&MazeLayout::from_codes(raw.as_slice()).unwrap());
        let open: Vec<IVec2> = board.positions().filter(|&p| !board.is_wall(p)).collect();

        for template in GhostFactory::create_all(&board, speed::GHOST_BASE) {
            for &start in &open {
                let mut ghost = template.clone();
                ghost.mover_mut().place(start);
                ghost.on_eaten();

                for _ in 0..2_000 {
                    if ghost.mode() != GhostMode::Eaten {
                        break;
                    }
                    ghost.update(&board, &tick(false, GhostMode::Scatter), &mut rng);
                }

                assert!(
                    ghost.mode() != GhostMode::Eaten,
                    "layout {index}: {} from {start} stuck at {}",
                    ghost.ghost_type(),
                    ghost.position()
                );
                assert_that(&ghost.position()).is_equal_to(ghost.home());
            }
        }
    }
}

#[test]
fn test_in_house_ghost_stays_put() {
    let board = common::board(&common::OPEN_ARENA);
    let mut rng = SmallRng::seed_from_u64(1);
    let mut ghost = ghost_at(IVec2::new(2, 2));
    ghost.set_mode(GhostMode::InHouse);

    for _ in 0..10 {
        ghost.update(&board, &tick(false, GhostMode::Scatter), &mut rng);
    }
    assert_that(&ghost.position()).is_equal_to(IVec2::new(2, 2));
    assert_that(&ghost.mode_elapsed()).is_equal_to(LOOP_TIME * 10);
}

#[test]
fn test_scatter_heads_for_home_corner() {
    let board = common::board(&common::OPEN_ARENA);
    let mut rng = SmallRng::seed_from_u64(1);
    let mut ghost = Ghost::new(GhostType::Pinky, IVec2::new(4, 4), IVec2::new(0, 0), 1.0);

    for _ in 0..8 {
        ghost.update(&board, &tick(false, GhostMode::Scatter), &mut rng);
    }
    assert_that(&(ghost.position().x + ghost.position().y)).is_less_than_or_equal_to(1);
}

#[test]
fn test_reset_returns_to_spawn_in_scatter() {
    let mut ghost = ghost_at(IVec2::new(1, 1));
    ghost.mover_mut().place(IVec2::new(3, 3));
    ghost.on_eaten();

    ghost.reset();
    assert_that(&ghost.position()).is_equal_to(IVec2::new(1, 1));
    assert_that(&ghost.mode()).is_equal_to(GhostMode::Scatter);
    assert_that(&ghost.mode_elapsed()).is_equal_to(Duration::ZERO);
    assert_that(&ghost.direction()).is_none();
}

#[test]
fn test_factory_positions() {
    let board = common::board(&["#######", "#     #", "#     #", "#     #", "#     #", "#     #", "#######"]);
    let ghosts = GhostFactory::create_all(&board, 1.0);

    let types: Vec<GhostType> = ghosts.iter().map(Ghost::ghost_type).collect();
    assert_that(&types).is_equal_to(GhostType::iter().collect::<Vec<_>>());

    assert_that(&ghosts[0].position()).is_equal_to(IVec2::new(3, 1));
    assert_that(&ghosts[1].position()).is_equal_to(IVec2::new(2, 3));
    assert_that(&ghosts[2].position()).is_equal_to(IVec2::new(3, 3));
    assert_that(&ghosts[3].position()).is_equal_to(IVec2::new(4, 3));

    assert_that(&ghosts[0].home_corner()).is_equal_to(IVec2::new(5, 0));
    assert_that(&ghosts[1].home_corner()).is_equal_to(IVec2::new(0, 0));
    assert_that(&ghosts[2].home_corner()).is_equal_to(IVec2::new(5, 6));
    assert_that(&ghosts[3].home_corner()).is_equal_to(IVec2::new(0, 6));
}

#[test]
fn test_factory_avoids_walls() {
    let board = common::board(&["#####", "# . #", "#   #", "#   #", "#####"]);
    let blinky = GhostFactory::spawn_position(GhostType::Blinky, &board);
    assert_that(&board.is_wall(blinky)).is_false();
    assert_that(&blinky).is_equal_to(IVec2::new(2, 1));
    assert_that(&GhostFactory::pacman_spawn(&board)).is_equal_to(IVec2::new(2, 2));
}

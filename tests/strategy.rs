use glam::IVec2;
use pacman_core::constants::RAW_LAYOUTS;
use pacman_core::entity::strategy::{candidate_moves, select_toward, Strategy, TargetContext};
use pacman_core::entity::Mover;
use pacman_core::map::board::Board;
use pacman_core::map::direction::Direction;
use pacman_core::map::layout::MazeLayout;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use speculoos::prelude::*;

mod common;

const CORNER: IVec2 = IVec2::new(0, 0);

fn mover_at(position: IVec2, direction: Option<Direction>) -> Mover {
    let mut mover = Mover::new(position, 1.0);
    mover.set_direction(direction);
    mover
}

#[test]
fn test_direct_chase_targets_pacman() {
    let ctx = common::context(IVec2::new(5, 5), Some(Direction::Left));
    assert_that(&Strategy::DirectChase.target(IVec2::ZERO, CORNER, &ctx)).is_equal_to(Some(IVec2::new(5, 5)));
}

#[test]
fn test_ambush_looks_four_tiles_ahead() {
    let ctx = common::context(IVec2::new(5, 5), Some(Direction::Right));
    assert_that(&Strategy::Ambush.target(IVec2::ZERO, CORNER, &ctx)).is_equal_to(Some(IVec2::new(9, 5)));

    let still = common::context(IVec2::new(5, 5), None);
    assert_that(&Strategy::Ambush.target(IVec2::ZERO, CORNER, &still)).is_equal_to(Some(IVec2::new(5, 5)));
}

#[test]
fn test_arcade_quirk_shifts_up_facing_lookahead() {
    let mut ctx = common::context(IVec2::new(5, 5), Some(Direction::Up));
    assert_that(&Strategy::Ambush.target(IVec2::ZERO, CORNER, &ctx)).is_equal_to(Some(IVec2::new(5, 1)));

    ctx.arcade_quirk = true;
    assert_that(&Strategy::Ambush.target(IVec2::ZERO, CORNER, &ctx)).is_equal_to(Some(IVec2::new(1, 1)));

    // Other headings are unaffected
    ctx.pacman_direction = Some(Direction::Down);
    assert_that(&Strategy::Ambush.target(IVec2::ZERO, CORNER, &ctx)).is_equal_to(Some(IVec2::new(5, 9)));
}

#[test]
fn test_pincer_doubles_vector_from_aggressor() {
    let ctx = TargetContext {
        aggressor_position: Some(IVec2::new(3, 4)),
        ..common::context(IVec2::new(5, 5), Some(Direction::Right))
    };
    // Pivot is (7, 5); reflecting (3, 4) through it gives (11, 6)
    assert_that(&Strategy::Pincer.target(IVec2::ZERO, CORNER, &ctx)).is_equal_to(Some(IVec2::new(11, 6)));
}

#[test]
fn test_shy_flees_when_close() {
    let ctx = common::context(IVec2::new(10, 10), None);
    let corner = IVec2::new(0, 20);

    let far = IVec2::new(10, 1);
    assert_that(&Strategy::Shy.target(far, corner, &ctx)).is_equal_to(Some(IVec2::new(10, 10)));

    // Exactly eight tiles away is not beyond the threshold
    let edge = IVec2::new(10, 2);
    assert_that(&Strategy::Shy.target(edge, corner, &ctx)).is_equal_to(Some(corner));

    let near = IVec2::new(9, 9);
    assert_that(&Strategy::Shy.target(near, corner, &ctx)).is_equal_to(Some(corner));
}

#[test]
fn test_scatter_and_frightened_targets() {
    let ctx = common::context(IVec2::new(3, 3), None);
    assert_that(&Strategy::Scatter.target(IVec2::ONE, IVec2::new(13, 0), &ctx)).is_equal_to(Some(IVec2::new(13, 0)));
    assert_that(&Strategy::Frightened.target(IVec2::ONE, IVec2::new(13, 0), &ctx)).is_none();
}

#[test]
fn test_ties_resolve_in_fixed_order() {
    let board = common::board(&common::OPEN_ARENA);
    let mover = mover_at(IVec2::new(2, 2), None);

    // Every neighbour is equally far from the ghost's own cell
    assert_that(&select_toward(&mover, &board, IVec2::new(2, 2))).is_equal_to(Some(Direction::Up));

    // Left and Down are equally close to (0, 4); Down comes first
    assert_that(&select_toward(&mover, &board, IVec2::new(0, 4))).is_equal_to(Some(Direction::Down));
}

#[test]
fn test_reversal_only_at_dead_ends() {
    let corridor = common::board(&["#####", "#   #", "#####"]);

    let heading_right = mover_at(IVec2::new(2, 1), Some(Direction::Right));
    assert_that(&candidate_moves(&heading_right, &corridor).to_vec()).is_equal_to(vec![Direction::Right]);

    let dead_end = mover_at(IVec2::new(3, 1), Some(Direction::Right));
    assert_that(&candidate_moves(&dead_end, &corridor).to_vec()).is_equal_to(vec![Direction::Left]);
}

#[test]
fn test_ghost_moves_never_leave_the_grid() {
    let board = common::board(&common::OPEN_ARENA);
    let mover = mover_at(IVec2::new(0, 0), Some(Direction::Left));
    let moves = candidate_moves(&mover, &board).to_vec();
    assert_that(&moves).is_equal_to(vec![Direction::Down]);
}

#[test]
fn test_no_strategy_reverses_when_another_move_exists() {
    let mut rng = SmallRng::seed_from_u64(42);
    let strategies = [
        Strategy::DirectChase,
        Strategy::Ambush,
        Strategy::Pincer,
        Strategy::Shy,
        Strategy::Scatter,
        Strategy::Frightened,
    ];

    for raw in RAW_LAYOUTS.iter() {
        let board = Board::new(&MazeLayout::from_codes(raw.as_slice()).unwrap());
        let open: Vec<IVec2> = board.positions().filter(|&p| !board.is_wall(p)).collect();

        for &position in &open {
            for heading in Direction::DIRECTIONS {
                let mover = mover_at(position, Some(heading));
                let forward_exists = Direction::DIRECTIONS
                    .into_iter()
                    .filter(|&dir| dir != heading.opposite())
                    .any(|dir| !board.is_wall(position + dir.as_ivec2()));
                if !forward_exists {
                    continue;
                }

                let ctx = TargetContext {
                    aggressor_position: Some(IVec2::new(7, 3)),
                    ..common::context(IVec2::new(7, 7), Some(Direction::Left))
                };
                for strategy in strategies {
                    let chosen = strategy.next_move(&mover, IVec2::new(13, 0), &board, &ctx, &mut rng);
                    assert_that(&chosen).is_some().is_not_equal_to(heading.opposite());
                }
            }
        }
    }
}

use std::collections::HashSet;
use std::time::Duration;

use grid_snake::config::{EngineConfig, FoodPlacement, GridSize};
use grid_snake::game::{GameEngine, GameStatus, TickOutcome};
use grid_snake::input::Direction;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

fn assert_running_invariants(engine: &GameEngine) {
    if engine.status() != GameStatus::Running {
        return;
    }

    let mut seen = HashSet::new();
    for segment in engine.snake().segments() {
        assert!(seen.insert(*segment), "segment {segment:?} appears twice");
        assert!(segment.is_within_bounds(engine.grid()));
    }
    assert!(!engine.snake().occupies(engine.food()));
    assert!(engine.food().is_within_bounds(engine.grid()));
}

/// Plays random games on a small board and checks every tick.
fn random_walks(config: EngineConfig, games: u64) {
    for seed in 0..games {
        let mut engine = GameEngine::new_with_seed(config, seed).expect("config is valid");
        let mut steering = StdRng::seed_from_u64(seed + 1_000);

        for _ in 0..400 {
            if steering.gen_bool(0.3) {
                engine.set_direction(DIRECTIONS[steering.gen_range(0..DIRECTIONS.len())]);
            }

            let before_len = engine.snake().len();
            let before_score = engine.score();
            let before_interval = engine.tick_interval();
            let was_moving = engine.heading().is_some();

            let outcome = engine.tick();

            assert!(engine.tick_interval() <= before_interval);
            match outcome {
                TickOutcome::Moved { ate_food: true, .. } => {
                    assert_eq!(engine.score(), before_score + 10);
                    assert_eq!(engine.snake().len(), before_len + 1);
                }
                TickOutcome::Moved { ate_food: false, .. } => {
                    assert_eq!(engine.score(), before_score);
                    assert_eq!(engine.snake().len(), before_len);
                }
                TickOutcome::Idle => {
                    assert!(!was_moving);
                    assert_eq!(engine.snake().len(), before_len);
                }
                TickOutcome::GameOver { final_score, .. } => {
                    assert_eq!(final_score, engine.score());
                    assert_eq!(engine.status(), GameStatus::Over);
                    break;
                }
            }

            assert_running_invariants(&engine);
        }
    }
}

#[test]
fn random_play_keeps_invariants_with_sampling() {
    random_walks(
        EngineConfig {
            grid: GridSize::square(6),
            ..EngineConfig::default()
        },
        60,
    );
}

#[test]
fn random_play_keeps_invariants_with_scanning_and_wrapping() {
    random_walks(
        EngineConfig {
            grid: GridSize {
                width: 5,
                height: 4,
            },
            wrap_walls: true,
            placement: FoodPlacement::Scan,
            ..EngineConfig::default()
        },
        60,
    );
}

#[test]
fn interval_reaches_floor_and_stays_there() {
    // On a one-row ring every free cell lies ahead of the head, so each food is reached.
    let config = EngineConfig {
        grid: GridSize {
            width: 40,
            height: 1,
        },
        wrap_walls: true,
        placement: FoodPlacement::Scan,
        ..EngineConfig::default()
    };
    let mut engine = GameEngine::new_with_seed(config, 5).expect("config is valid");
    engine.set_direction(Direction::Right);

    let mut changes = Vec::new();
    for _ in 0..2_000 {
        match engine.tick() {
            TickOutcome::Moved {
                ate_food: true,
                speed_change,
            } => {
                changes.push(speed_change);
                if changes.len() == 30 {
                    break;
                }
            }
            TickOutcome::Moved { ate_food: false, .. } => {}
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(engine.tick_interval() >= Duration::from_millis(50));
    }

    assert_eq!(changes.len(), 30);
    for (index, change) in changes.iter().take(25).enumerate() {
        let expected = 100 - 2 * (index as u64 + 1);
        assert_eq!(*change, Some(Duration::from_millis(expected)));
    }
    assert!(changes[25..].iter().all(Option::is_none));
    assert_eq!(engine.tick_interval(), Duration::from_millis(50));
    assert_eq!(engine.score(), 300);
}

#[test]
fn repeated_reset_restores_the_starting_state() {
    let mut engine =
        GameEngine::new_with_seed(EngineConfig::default(), 3).expect("default config is valid");

    for round in 0..5 {
        engine.set_direction(DIRECTIONS[round % DIRECTIONS.len()]);
        for _ in 0..(round * 7) {
            engine.tick();
        }

        engine.reset();

        assert_eq!(engine.score(), 0);
        assert_eq!(engine.tick_interval(), Duration::from_millis(100));
        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.heading(), None);
        assert_eq!(engine.snake().len(), 1);
        assert_eq!(engine.snake().head(), engine.grid().start_cell());
        assert_eq!(engine.food(), engine.grid().food_anchor());
    }
}

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::config::{ConfigError, EngineConfig, GridSize};
use crate::food::place_food;
use crate::input::{Direction, direction_change_is_valid};
use crate::snake::{Cell, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    Over,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OverReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, so no food can be placed.
    BoardFilled,
}

/// What one call to [`GameEngine::tick`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// Nothing moved: the game is over or no heading has been set yet.
    Idle,
    /// The snake advanced one cell.
    Moved {
        ate_food: bool,
        /// New tick interval the driver must re-arm to.
        speed_change: Option<Duration>,
    },
    /// The run ended on this tick.
    GameOver { reason: OverReason, final_score: u32 },
}

/// Explicit starting state, for tests and reproducible setups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Segments, head first.
    pub snake: Vec<Cell>,
    pub food: Cell,
    pub heading: Option<Direction>,
    pub score: u32,
    /// Defaults to the configured initial interval.
    pub tick_interval: Option<Duration>,
}

/// Rejected [`Scenario`]s.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("snake must have at least one segment")]
    EmptySnake,
    #[error("snake segment ({}, {}) is outside the grid", .0.x, .0.y)]
    SegmentOutOfBounds(Cell),
    #[error("snake segment ({}, {}) appears twice", .0.x, .0.y)]
    DuplicateSegment(Cell),
    #[error("food ({}, {}) is outside the grid", .0.x, .0.y)]
    FoodOutOfBounds(Cell),
    #[error("food ({}, {}) lies on the snake", .0.x, .0.y)]
    FoodOnSnake(Cell),
    #[error("tick interval {0:?} is outside the configured speed range")]
    IntervalOutOfRange(Duration),
}

/// Complete mutable game state for one session.
///
/// State leaves the engine only through shared borrows and tick outcomes.
#[derive(Debug, Clone)]
pub struct GameEngine<R = StdRng> {
    config: EngineConfig,
    snake: Snake,
    food: Cell,
    heading: Option<Direction>,
    score: u32,
    tick_interval: Duration,
    tick_count: u64,
    status: GameStatus,
    over_reason: Option<OverReason>,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Creates an engine seeded from system entropy.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic engine for tests and reproducible simulations.
    pub fn new_with_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    /// Creates an engine drawing food positions from `rng`.
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let start = config.grid.start_cell();
        let mut engine = Self {
            config,
            snake: Snake::new(start),
            food: start,
            heading: None,
            score: 0,
            tick_interval: config.speed.initial(),
            tick_count: 0,
            status: GameStatus::Running,
            over_reason: None,
            rng,
        };
        engine.reset();
        Ok(engine)
    }

    /// Creates an engine at an explicit, validated state.
    pub fn from_scenario(
        config: EngineConfig,
        rng: R,
        scenario: Scenario,
    ) -> Result<Self, StateError> {
        config.validate()?;
        let grid = config.grid;

        let mut seen = HashSet::with_capacity(scenario.snake.len());
        for &segment in &scenario.snake {
            if !segment.is_within_bounds(grid) {
                return Err(StateError::SegmentOutOfBounds(segment));
            }
            if !seen.insert(segment) {
                return Err(StateError::DuplicateSegment(segment));
            }
        }
        let snake = Snake::from_segments(scenario.snake).ok_or(StateError::EmptySnake)?;

        if !scenario.food.is_within_bounds(grid) {
            return Err(StateError::FoodOutOfBounds(scenario.food));
        }
        if snake.occupies(scenario.food) {
            return Err(StateError::FoodOnSnake(scenario.food));
        }

        let tick_interval = scenario.tick_interval.unwrap_or_else(|| config.speed.initial());
        if tick_interval < config.speed.floor() || tick_interval > config.speed.initial() {
            return Err(StateError::IntervalOutOfRange(tick_interval));
        }

        Ok(Self {
            config,
            snake,
            food: scenario.food,
            heading: scenario.heading,
            score: scenario.score,
            tick_interval,
            tick_count: 0,
            status: GameStatus::Running,
            over_reason: None,
            rng,
        })
    }

    /// Restores the fresh-game state. The random source carries over.
    pub fn reset(&mut self) {
        let grid = self.config.grid;
        let start = grid.start_cell();

        self.snake = Snake::new(start);
        self.heading = None;
        self.score = 0;
        self.tick_interval = self.config.speed.initial();
        self.tick_count = 0;
        self.status = GameStatus::Running;
        self.over_reason = None;

        let anchor = grid.food_anchor();
        self.food = if !self.config.randomize_initial_food
            && anchor != start
            && anchor.is_within_bounds(grid)
        {
            anchor
        } else {
            // A validated grid has at least two cells, so one is free.
            place_food(&mut self.rng, grid, &self.snake, self.config.placement).unwrap_or(anchor)
        };

        info!(
            "game reset on {}x{} grid, snake at ({}, {}), food at ({}, {})",
            grid.width, grid.height, start.x, start.y, self.food.x, self.food.y
        );
    }

    /// Requests a new heading for the next tick.
    ///
    /// Reversals and calls after game over are ignored. Repeated calls
    /// between ticks overwrite each other.
    pub fn set_direction(&mut self, requested: Direction) {
        if self.status == GameStatus::Over {
            return;
        }

        if direction_change_is_valid(self.heading, requested) {
            self.heading = Some(requested);
        } else {
            trace!("ignoring reversal to {requested:?}");
        }
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status == GameStatus::Over {
            return TickOutcome::Idle;
        }
        let Some(heading) = self.heading else {
            return TickOutcome::Idle;
        };

        self.tick_count += 1;
        let grid = self.config.grid;
        let mut head = self.snake.head().step(heading);
        if self.config.wrap_walls {
            head = head.wrapped(grid);
        }
        self.snake.push_head(head);
        trace!("tick {}: head to ({}, {})", self.tick_count, head.x, head.y);

        let ate_food = head == self.food;
        let mut speed_change = None;
        if ate_food {
            self.score = self.score.saturating_add(self.config.points_per_food);
            speed_change = self.speed_up();
            debug!(
                "food eaten at ({}, {}), score {}, length {}",
                head.x,
                head.y,
                self.score,
                self.snake.len()
            );

            match place_food(&mut self.rng, grid, &self.snake, self.config.placement) {
                Some(cell) => self.food = cell,
                None => return self.finish(OverReason::BoardFilled),
            }
        } else {
            self.snake.drop_tail();
        }

        if !head.is_within_bounds(grid) {
            return self.finish(OverReason::WallCollision);
        }

        if self.snake.head_overlaps_body() {
            return self.finish(OverReason::SelfCollision);
        }

        TickOutcome::Moved {
            ate_food,
            speed_change,
        }
    }

    fn speed_up(&mut self) -> Option<Duration> {
        let next = self.config.speed.next_interval(self.tick_interval)?;
        debug!("tick interval {:?} -> {next:?}", self.tick_interval);
        self.tick_interval = next;
        Some(next)
    }

    fn finish(&mut self, reason: OverReason) -> TickOutcome {
        self.status = GameStatus::Over;
        self.over_reason = Some(reason);
        info!(
            "game over after {} ticks: {reason:?}, final score {}",
            self.tick_count, self.score
        );

        TickOutcome::GameOver {
            reason,
            final_score: self.score,
        }
    }
}

impl<R> GameEngine<R> {
    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Cell {
        self.food
    }

    #[must_use]
    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Interval the driver should currently tick at.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Over
    }

    #[must_use]
    pub fn over_reason(&self) -> Option<OverReason> {
        self.over_reason
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.config.grid
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

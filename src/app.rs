use std::time::{Duration, Instant};

use log::{debug, warn};
use rand::Rng;
use rand::rngs::StdRng;

use crate::clock::TickClock;
use crate::game::{GameEngine, TickOutcome};
use crate::input::GameInput;
use crate::score::HighScore;

/// Drives one engine: routes input, ticks on schedule and records high scores.
#[derive(Debug)]
pub struct App<R = StdRng> {
    engine: GameEngine<R>,
    clock: TickClock,
    high_score: HighScore,
    /// Best score before the current run started, for the game-over screen.
    previous_best: u32,
    new_record: bool,
    paused: bool,
    quit: bool,
}

impl<R: Rng> App<R> {
    #[must_use]
    pub fn new(engine: GameEngine<R>, high_score: HighScore, now: Instant) -> Self {
        let clock = TickClock::new(engine.tick_interval(), now);
        let previous_best = high_score.best();

        Self {
            engine,
            clock,
            high_score,
            previous_best,
            new_record: false,
            paused: false,
            quit: false,
        }
    }

    /// Applies one external input event.
    pub fn handle_input(&mut self, input: GameInput, now: Instant) {
        match input {
            GameInput::Direction(direction) => {
                if !self.paused {
                    self.engine.set_direction(direction);
                }
            }
            GameInput::Pause => self.toggle_pause(now),
            GameInput::Restart => self.restart(now),
            GameInput::Confirm if self.engine.is_over() => self.restart(now),
            GameInput::Confirm if self.paused => self.toggle_pause(now),
            GameInput::Confirm => {}
            GameInput::Quit => self.quit = true,
        }
    }

    /// Ticks the engine when the clock says so.
    pub fn update(&mut self, now: Instant) -> Option<TickOutcome> {
        if self.paused || self.quit || !self.clock.is_due(now) {
            return None;
        }

        let outcome = self.engine.tick();
        self.clock.mark(now);

        match outcome {
            TickOutcome::Moved {
                speed_change: Some(interval),
                ..
            } => self.clock.rearm(interval, now),
            TickOutcome::GameOver { final_score, .. } => self.record(final_score),
            TickOutcome::Moved { .. } | TickOutcome::Idle => {}
        }

        Some(outcome)
    }

    /// How long the caller may wait for input before the next tick is due.
    #[must_use]
    pub fn time_until_tick(&self, now: Instant) -> Duration {
        self.clock.time_until_due(now)
    }

    fn toggle_pause(&mut self, now: Instant) {
        if self.engine.is_over() || self.engine.heading().is_none() {
            return;
        }

        self.paused = !self.paused;
        if !self.paused {
            self.clock.mark(now);
        }
        debug!("paused: {}", self.paused);
    }

    fn restart(&mut self, now: Instant) {
        self.engine.reset();
        self.clock.rearm(self.engine.tick_interval(), now);
        self.previous_best = self.high_score.best();
        self.new_record = false;
        self.paused = false;
    }

    fn record(&mut self, final_score: u32) {
        self.new_record = match self.high_score.submit(final_score) {
            Ok(new_record) => new_record,
            Err(error) => {
                warn!("failed to save high score: {error}");
                final_score > self.previous_best
            }
        };
    }
}

impl<R> App<R> {
    #[must_use]
    pub fn engine(&self) -> &GameEngine<R> {
        &self.engine
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    #[must_use]
    pub fn previous_best(&self) -> u32 {
        self.previous_best
    }

    #[must_use]
    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True before the first direction key of a run.
    #[must_use]
    pub fn is_start_screen(&self) -> bool {
        self.engine.heading().is_none() && self.engine.tick_count() == 0
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.clock.interval()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::EngineConfig;
    use crate::game::{GameEngine, GameStatus, Scenario, TickOutcome};
    use crate::input::{Direction, GameInput};
    use crate::score::{HighScore, ScoreStore};
    use crate::snake::Cell;

    use super::App;

    const STEP: Duration = Duration::from_millis(100);

    fn app_with(scenario: Scenario, dir: &tempfile::TempDir) -> App {
        let engine = GameEngine::from_scenario(
            EngineConfig::default(),
            StdRng::seed_from_u64(4),
            scenario,
        )
        .expect("scenario should be valid");
        let store = ScoreStore::new(dir.path().join("scores.json"));
        App::new(engine, HighScore::empty(store), Instant::now())
    }

    fn heading_right_towards_food(food: (i32, i32)) -> Scenario {
        Scenario {
            snake: vec![Cell::new(1, 1)],
            food: food.into(),
            heading: Some(Direction::Right),
            score: 0,
            tick_interval: None,
        }
    }

    #[test]
    fn no_tick_before_interval_elapses() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let start = Instant::now();
        let mut app = app_with(heading_right_towards_food((9, 9)), &dir);
        app.clock = crate::clock::TickClock::new(STEP, start);

        assert_eq!(app.update(start + Duration::from_millis(50)), None);
        assert!(app.update(start + STEP).is_some());
        assert_eq!(app.engine().snake().head(), Cell::new(2, 1));
    }

    #[test]
    fn speed_change_rearms_the_clock() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let start = Instant::now();
        let mut app = app_with(heading_right_towards_food((2, 1)), &dir);
        app.clock = crate::clock::TickClock::new(STEP, start);

        let outcome = app.update(start + STEP);

        assert_eq!(
            outcome,
            Some(TickOutcome::Moved {
                ate_food: true,
                speed_change: Some(Duration::from_millis(98)),
            })
        );
        assert_eq!(app.tick_interval(), Duration::from_millis(98));
    }

    #[test]
    fn game_over_persists_new_high_score() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let start = Instant::now();
        let mut app = app_with(
            Scenario {
                snake: vec![Cell::new(0, 0)],
                food: Cell::new(5, 5),
                heading: Some(Direction::Up),
                score: 30,
                tick_interval: None,
            },
            &dir,
        );
        app.clock = crate::clock::TickClock::new(STEP, start);

        assert!(matches!(
            app.update(start + STEP),
            Some(TickOutcome::GameOver { final_score: 30, .. })
        ));
        assert!(app.is_new_record());
        assert_eq!(app.high_score(), 30);

        let stored = ScoreStore::new(dir.path().join("scores.json"))
            .load()
            .expect("stored score should load");
        assert_eq!(stored, 30);
    }

    #[test]
    fn pause_holds_the_snake_still() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let start = Instant::now();
        let mut app = app_with(heading_right_towards_food((9, 9)), &dir);
        app.clock = crate::clock::TickClock::new(STEP, start);

        app.handle_input(GameInput::Pause, start);
        assert!(app.is_paused());
        assert_eq!(app.update(start + STEP * 3), None);

        app.handle_input(GameInput::Direction(Direction::Down), start + STEP * 3);
        assert_eq!(app.engine().heading(), Some(Direction::Right));

        app.handle_input(GameInput::Confirm, start + STEP * 3);
        assert!(!app.is_paused());
        assert!(app.update(start + STEP * 4).is_some());
        assert_eq!(app.engine().snake().head(), Cell::new(2, 1));
    }

    #[test]
    fn confirm_after_game_over_starts_a_fresh_run() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let start = Instant::now();
        let mut app = app_with(
            Scenario {
                snake: vec![Cell::new(0, 0)],
                food: Cell::new(5, 5),
                heading: Some(Direction::Left),
                score: 0,
                tick_interval: None,
            },
            &dir,
        );
        app.clock = crate::clock::TickClock::new(STEP, start);
        let _ = app.update(start + STEP);
        assert_eq!(app.engine().status(), GameStatus::Over);

        app.handle_input(GameInput::Confirm, start + STEP);

        assert_eq!(app.engine().status(), GameStatus::Running);
        assert!(app.is_start_screen());
        assert_eq!(app.engine().snake().head(), Cell::new(10, 10));
        assert_eq!(app.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn quit_stops_updates() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let start = Instant::now();
        let mut app = app_with(heading_right_towards_food((9, 9)), &dir);

        app.handle_input(GameInput::Quit, start);

        assert!(app.should_quit());
        assert_eq!(app.update(start + STEP * 10), None);
    }
}

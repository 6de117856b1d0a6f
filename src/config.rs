use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snake::Cell;

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default side length of the square playing field.
pub const DEFAULT_GRID_DIMENSION: u16 = 20;

/// Score granted per food eaten.
pub const POINTS_PER_FOOD: u32 = 10;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Interval reduction applied each time food is eaten, in milliseconds.
pub const TICK_INTERVAL_DECREMENT_MS: u64 = 2;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// A square grid with `dimension` cells per side.
    #[must_use]
    pub fn square(dimension: u16) -> Self {
        Self {
            width: dimension,
            height: dimension,
        }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Cell where a fresh snake starts.
    #[must_use]
    pub fn start_cell(self) -> Cell {
        Cell::new(i32::from(self.width / 2), i32::from(self.height / 2))
    }

    /// Cell where the first food is placed on a fresh board.
    #[must_use]
    pub fn food_anchor(self) -> Cell {
        Cell::new(
            i32::from(self.width) * 3 / 4,
            i32::from(self.height) * 3 / 4,
        )
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::square(DEFAULT_GRID_DIMENSION)
    }
}

/// Tick interval progression.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub initial_ms: u64,
    pub decrement_ms: u64,
    pub floor_ms: u64,
}

impl SpeedConfig {
    #[must_use]
    pub fn initial(self) -> Duration {
        Duration::from_millis(self.initial_ms)
    }

    #[must_use]
    pub fn floor(self) -> Duration {
        Duration::from_millis(self.floor_ms)
    }

    /// Interval after one food is eaten at `current`, or `None` when it stays put.
    ///
    /// Only shrinks while strictly above the floor and never goes below it.
    #[must_use]
    pub fn next_interval(self, current: Duration) -> Option<Duration> {
        let floor = self.floor();
        if current <= floor {
            return None;
        }

        let next = current
            .saturating_sub(Duration::from_millis(self.decrement_ms))
            .max(floor);
        (next != current).then_some(next)
    }
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            initial_ms: DEFAULT_TICK_INTERVAL_MS,
            decrement_ms: TICK_INTERVAL_DECREMENT_MS,
            floor_ms: MIN_TICK_INTERVAL_MS,
        }
    }
}

/// How a new food cell is chosen.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoodPlacement {
    /// Draw random cells until one is free.
    #[default]
    Sample,
    /// Enumerate free cells and pick one.
    Scan,
}

/// Everything fixed at engine construction time.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid: GridSize,
    pub speed: SpeedConfig,
    pub points_per_food: u32,
    /// Heads leaving one edge re-enter at the opposite edge instead of dying.
    pub wrap_walls: bool,
    pub placement: FoodPlacement,
    /// Place the first food randomly instead of at the grid's food anchor.
    pub randomize_initial_food: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            speed: SpeedConfig::default(),
            points_per_food: POINTS_PER_FOOD,
            wrap_walls: false,
            placement: FoodPlacement::default(),
            randomize_initial_food: false,
        }
    }
}

impl EngineConfig {
    /// Checks the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridSize { width, height } = self.grid;
        if width == 0 || height == 0 || self.grid.total_cells() < 2 {
            return Err(ConfigError::GridTooSmall { width, height });
        }

        if self.speed.floor_ms == 0 {
            return Err(ConfigError::ZeroFloor);
        }

        if self.speed.initial_ms < self.speed.floor_ms {
            return Err(ConfigError::InitialBelowFloor {
                initial_ms: self.speed.initial_ms,
                floor_ms: self.speed.floor_ms,
            });
        }

        Ok(())
    }

    /// Reads a JSON config file; missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the per-user config file when it exists, defaults otherwise.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// Returns the platform-correct config file path, if the platform has one.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("grid of {width}x{height} cells has no room for both snake and food")]
    GridTooSmall { width: u16, height: u16 },
    #[error("minimum tick interval must be positive")]
    ZeroFloor,
    #[error("initial tick interval {initial_ms}ms is below the minimum {floor_ms}ms")]
    InitialBelowFloor { initial_ms: u64, floor_ms: u64 },
}

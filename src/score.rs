use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR_NAME: &str = "grid-snake";
const SCORE_FILE_NAME: &str = "scores.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScoreFile {
    high_score: u32,
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to read high score from {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("high score file {} is malformed", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write high score to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// JSON file holding the best score seen so far.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored high score.
    ///
    /// Returns `Ok(0)` when the score file does not yet exist (first run).
    pub fn load(&self) -> Result<u32, ScoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(ScoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str::<ScoreFile>(&raw)
            .map(|file| file.high_score)
            .map_err(|source| ScoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Saves the high score, creating parent directories when needed.
    pub fn save(&self, score: u32) -> Result<(), ScoreError> {
        let write_error = |source: io::Error| ScoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let payload = ScoreFile { high_score: score };
        let json = serde_json::to_string_pretty(&payload)
            .map_err(|error| write_error(io::Error::new(io::ErrorKind::InvalidData, error)))?;

        fs::write(&self.path, json).map_err(write_error)
    }
}

impl Default for ScoreStore {
    fn default() -> Self {
        Self::new(scores_path())
    }
}

/// Best score in memory, mirrored to a [`ScoreStore`].
#[derive(Debug, Clone)]
pub struct HighScore {
    best: u32,
    store: ScoreStore,
}

impl HighScore {
    /// Reads the current best from `store`.
    pub fn load(store: ScoreStore) -> Result<Self, ScoreError> {
        let best = store.load()?;
        Ok(Self { best, store })
    }

    /// Starts from zero without reading the store, e.g. after a failed load.
    #[must_use]
    pub fn empty(store: ScoreStore) -> Self {
        Self { best: 0, store }
    }

    #[must_use]
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Records a finished run. Returns `true` when `score` set a new record.
    ///
    /// The in-memory best is updated even when persisting fails.
    pub fn submit(&mut self, score: u32) -> Result<bool, ScoreError> {
        if score <= self.best {
            return Ok(false);
        }

        self.best = score;
        info!("new high score {score}");
        self.store.save(score)?;
        Ok(true)
    }
}

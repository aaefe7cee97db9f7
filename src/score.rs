use std::cell::Cell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ScoreStoreError;

const APP_DIR_NAME: &str = "arcade-snake";
const SCORE_FILE_NAME: &str = "scores.json";

/// On-disk layout. Keys owned by other games ride along untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ScoreFile {
    #[serde(rename = "snake_high_score", default)]
    high_score: u32,
    #[serde(flatten)]
    other: Map<String, Value>,
}

/// Persistent slot holding the best score across sessions.
pub trait ScoreStore {
    /// Returns the stored score, or 0 when nothing was stored yet.
    fn load(&self) -> Result<u32, ScoreStoreError>;

    /// Persists `score` as the new stored value.
    fn save(&mut self, score: u32) -> Result<(), ScoreStoreError>;
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn default_scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// JSON key/value file; the high score lives under
/// [`HIGH_SCORE_KEY`](crate::config::HIGH_SCORE_KEY).
///
/// Other keys already in the file are preserved on save, whatever their
/// value type.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl Default for JsonScoreStore {
    fn default() -> Self {
        Self::new(default_scores_path())
    }
}

impl JsonScoreStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<ScoreFile, ScoreStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ScoreFile::default()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&raw)?)
    }
}

impl ScoreStore for JsonScoreStore {
    fn load(&self) -> Result<u32, ScoreStoreError> {
        Ok(self.read_file()?.high_score)
    }

    fn save(&mut self, score: u32) -> Result<(), ScoreStoreError> {
        let mut file = match self.read_file() {
            Ok(file) => file,
            Err(ScoreStoreError::Parse(error)) => {
                log::warn!(
                    "overwriting malformed score file {}: {error}",
                    self.path.display()
                );
                ScoreFile::default()
            }
            Err(error) => return Err(error),
        };
        file.high_score = score;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory slot; clones share the same value, standing in for storage
/// that outlives one engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    slot: Rc<Cell<Option<u32>>>,
    saves: Rc<Cell<u32>>,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `score`.
    #[must_use]
    pub fn with_score(score: u32) -> Self {
        let store = Self::default();
        store.slot.set(Some(score));
        store
    }

    /// Number of successful saves across all clones.
    #[must_use]
    pub fn save_count(&self) -> u32 {
        self.saves.get()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<u32, ScoreStoreError> {
        Ok(self.slot.get().unwrap_or(0))
    }

    fn save(&mut self, score: u32) -> Result<(), ScoreStoreError> {
        self.slot.set(Some(score));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

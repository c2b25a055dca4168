//! Score file persistence
//!
//! A missing file is created with the seeded table. A file that exists but
//! cannot be read counts as "no high score known" and yields an empty table;
//! it never fails the game.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::core::ScoreTable;

#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("failed to write scores to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> ScoreTable {
        match fs::read_to_string(&self.path) {
            Ok(text) => ScoreTable::parse(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let table = ScoreTable::seeded();
                match self.save(&table) {
                    Ok(()) => info!(path = %self.path.display(), "created score file"),
                    Err(err) => warn!(%err, "could not create score file"),
                }
                table
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "score file unreadable");
                ScoreTable::new()
            }
        }
    }

    pub fn save(&self, table: &ScoreTable) -> Result<(), ScoreStoreError> {
        fs::write(&self.path, table.to_file_string()).map_err(|source| ScoreStoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Load, insert `name:score`, save. Returns the rank, or `None` if the
    /// score did not make the table (nothing is written then).
    pub fn record(&self, name: &str, score: u32) -> Result<Option<usize>, ScoreStoreError> {
        let mut table = self.load();
        if !table.beats(score) {
            return Ok(None);
        }
        let rank = table.insert(name, score);
        self.save(&table)?;
        Ok(rank)
    }
}

//! Runtime configuration - which store to open, where, and the weight unit

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use tracing::info;

use crate::db::{JsonFileStore, MemoryStore, SqliteStore, StoreError, WorkoutStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// SQLite database file
    #[default]
    Sqlite,
    /// Single JSON document
    Json,
    /// Nothing is kept after exit
    Memory,
}

impl Backend {
    pub fn default_path(&self) -> Option<&'static str> {
        match self {
            Backend::Sqlite => Some("girya.db"),
            Backend::Json => Some("girya.json"),
            Backend::Memory => None,
        }
    }
}

/// Unit weights are entered and shown in; one per deployment, never converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }

    /// "24 kg", "—" when nothing is recorded
    pub fn format(&self, weight: Option<f64>) -> String {
        match weight {
            Some(w) => format!("{} {}", w, self.symbol()),
            None => "—".to_string(),
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub backend: Backend,
    /// Overrides the backend's default file
    pub path: Option<PathBuf>,
    pub unit: WeightUnit,
}

impl Config {
    pub fn store_path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(|| self.backend.default_path().map(PathBuf::from))
    }

    pub fn open_store(&self) -> Result<Box<dyn WorkoutStore + Send>, StoreError> {
        let path = self.store_path();
        info!(
            "Opening {:?} store{}",
            self.backend,
            path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default()
        );

        Ok(match (self.backend, path) {
            (Backend::Sqlite, Some(path)) => Box::new(SqliteStore::open(path)?),
            (Backend::Json, Some(path)) => Box::new(JsonFileStore::new(path)),
            _ => Box::new(MemoryStore::new()),
        })
    }

    /// Human-readable location of the store
    pub fn describe(&self) -> String {
        match self.store_path() {
            Some(path) if self.backend != Backend::Memory => {
                format!("{:?} ({})", self.backend, path.display())
            }
            _ => "memory".to_string(),
        }
    }
}

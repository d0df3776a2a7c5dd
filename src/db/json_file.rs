//! JSON document store: `{ "workouts": [...] }` in a single file

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{StoreError, WorkoutStore};
use crate::workout::{Workout, WorkoutHistory};

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or blank file reads as empty history
    fn read(&self) -> Result<WorkoutHistory, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(data) if data.trim().is_empty() => Ok(WorkoutHistory::default()),
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(WorkoutHistory::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Write to a sibling temp file, then rename over the document
    fn write(&self, history: &WorkoutHistory) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }

        let data = serde_json::to_string_pretty(history)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Wrote {} workouts to {}", history.workouts.len(), self.path.display());
        Ok(())
    }
}

impl WorkoutStore for JsonFileStore {
    fn history(&self) -> Result<WorkoutHistory, StoreError> {
        self.read()
    }

    fn append(&self, workout: &Workout) -> Result<(), StoreError> {
        let mut history = self.read()?;
        history.workouts.push(workout.clone());
        self.write(&history)
    }

    fn update(&self, workout: &Workout) -> Result<(), StoreError> {
        let mut history = self.read()?;
        match history.workouts.iter_mut().find(|w| w.id == workout.id) {
            Some(existing) => *existing = workout.clone(),
            None => history.workouts.push(workout.clone()),
        }
        self.write(&history)
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut history = self.read()?;
        let Some(index) = history.workouts.iter().position(|w| w.id == id) else {
            return Ok(false);
        };
        history.workouts.remove(index);
        self.write(&history)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::fixtures::workout;

    #[test]
    fn test_contract() {
        let dir = tempfile::tempdir().unwrap();
        super::super::contract::check(&JsonFileStore::new(dir.path().join("workouts.json")));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nothing.json"));
        assert!(store.history().unwrap().is_empty());
    }

    #[test]
    fn test_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/deeper/workouts.json"));
        store.append(&workout("a", vec![])).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_document_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("workouts.json"));
        store.append(&workout("a", vec![])).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["workouts"][0]["id"], "a");
        assert!(!dir.path().join("workouts.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workouts.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);

        assert!(matches!(store.history(), Err(StoreError::Corrupt(_))));
        assert!(matches!(store.append(&workout("a", vec![])), Err(StoreError::Corrupt(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }
}

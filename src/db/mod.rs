//! Database module - workout storage behind one trait, three backends

mod json_file;
mod memory;
mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::workout::{Workout, WorkoutHistory};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored workouts are unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Durable record of all workouts.
///
/// Records keep insertion order and are matched by id; every write replaces
/// whole records, last write wins.
pub trait WorkoutStore {
    /// All workouts, oldest first
    fn history(&self) -> Result<WorkoutHistory, StoreError>;

    /// Add a new workout after all existing ones
    fn append(&self, workout: &Workout) -> Result<(), StoreError>;

    /// Replace the workout with the same id, appending it if there is none
    fn update(&self, workout: &Workout) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Result<Option<Workout>, StoreError> {
        Ok(self.history()?.workouts.into_iter().find(|w| w.id == id))
    }

    /// Remove a workout, returning whether it existed
    fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// Behaviour every backend has to share
#[cfg(test)]
pub(crate) mod contract {
    use super::*;
    use crate::workout::fixtures::{exercise, workout};
    use pretty_assertions::assert_eq;

    pub fn check(store: &dyn WorkoutStore) {
        empty_store(store);
        append_keeps_order(store);
        update_replaces_in_place(store);
        update_appends_unknown(store);
        delete_existing_and_missing(store);
    }

    fn ids(store: &dyn WorkoutStore) -> Vec<String> {
        store.history().unwrap().workouts.into_iter().map(|w| w.id).collect()
    }

    fn empty_store(store: &dyn WorkoutStore) {
        assert!(store.history().unwrap().is_empty());
        assert_eq!(store.get("nope").unwrap(), None);
        assert!(!store.delete("nope").unwrap());
    }

    fn append_keeps_order(store: &dyn WorkoutStore) {
        for id in ["a", "b", "c"] {
            store.append(&workout(id, vec![exercise("kb_swing", None)])).unwrap();
        }
        assert_eq!(ids(store), vec!["a", "b", "c"]);
    }

    fn update_replaces_in_place(store: &dyn WorkoutStore) {
        let mut b = store.get("b").unwrap().unwrap();
        b.exercises[0].weight = Some(24.0);
        b.current_round = 3;
        b.completed = true;
        store.update(&b).unwrap();

        assert_eq!(ids(store), vec!["a", "b", "c"]);
        assert_eq!(store.get("b").unwrap(), Some(b));
    }

    fn update_appends_unknown(store: &dyn WorkoutStore) {
        store.update(&workout("d", vec![])).unwrap();
        assert_eq!(ids(store), vec!["a", "b", "c", "d"]);
    }

    fn delete_existing_and_missing(store: &dyn WorkoutStore) {
        assert!(store.delete("c").unwrap());
        assert!(!store.delete("c").unwrap());
        assert_eq!(ids(store), vec!["a", "b", "d"]);
    }
}

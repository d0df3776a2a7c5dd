//! In-memory store for client-only runs and tests

use std::sync::{PoisonError, RwLock};

use super::{StoreError, WorkoutStore};
use crate::workout::{Workout, WorkoutHistory};

#[derive(Default)]
pub struct MemoryStore {
    workouts: RwLock<Vec<Workout>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: WorkoutHistory) -> Self {
        Self {
            workouts: RwLock::new(history.workouts),
        }
    }
}

impl WorkoutStore for MemoryStore {
    fn history(&self) -> Result<WorkoutHistory, StoreError> {
        let workouts = self.workouts.read().unwrap_or_else(PoisonError::into_inner);
        Ok(WorkoutHistory::new(workouts.clone()))
    }

    fn append(&self, workout: &Workout) -> Result<(), StoreError> {
        let mut workouts = self.workouts.write().unwrap_or_else(PoisonError::into_inner);
        workouts.push(workout.clone());
        Ok(())
    }

    fn update(&self, workout: &Workout) -> Result<(), StoreError> {
        let mut workouts = self.workouts.write().unwrap_or_else(PoisonError::into_inner);
        match workouts.iter_mut().find(|w| w.id == workout.id) {
            Some(existing) => *existing = workout.clone(),
            None => workouts.push(workout.clone()),
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Workout>, StoreError> {
        let workouts = self.workouts.read().unwrap_or_else(PoisonError::into_inner);
        Ok(workouts.iter().find(|w| w.id == id).cloned())
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut workouts = self.workouts.write().unwrap_or_else(PoisonError::into_inner);
        match workouts.iter().position(|w| w.id == id) {
            Some(index) => {
                workouts.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

//! Lookups over past workouts: last used weight, previous session contents

use std::collections::HashSet;

use crate::workout::WorkoutHistory;

/// Read-only view over workout history
pub struct HistoryLookup<'a> {
    history: &'a WorkoutHistory,
}

impl<'a> HistoryLookup<'a> {
    pub fn new(history: &'a WorkoutHistory) -> Self {
        Self { history }
    }

    /// Most recent recorded weight for an exercise.
    ///
    /// Walks workouts newest first; a workout whose entry has no weight is
    /// skipped in favour of older ones.
    pub fn last_weight_for(&self, exercise_id: &str) -> Option<f64> {
        self.history.workouts.iter().rev().find_map(|workout| {
            workout
                .exercises
                .iter()
                .find(|e| e.exercise_id == exercise_id)
                .and_then(|e| e.weight)
        })
    }

    /// Exercise ids of the most recent workout (empty without history)
    pub fn previous_session_ids(&self) -> HashSet<&'a str> {
        self.history
            .latest()
            .map(|w| w.exercises.iter().map(|e| e.exercise_id.as_str()).collect())
            .unwrap_or_default()
    }
}

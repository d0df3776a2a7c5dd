//! Session runtime - walks a workout through its exercises, rests and rounds
//!
//! A session is a small state machine:
//! `Active` → `Resting` → `Active` → ... → `Completed`.
//! The store is written only when the workout completes or is finished
//! early, never on individual exercise steps.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::db::{StoreError, WorkoutStore};
use crate::workout::{Workout, WorkoutExercise};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestKind {
    BetweenExercises,
    BetweenRounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    Resting { remaining: u32, kind: RestKind },
    Completed,
}

/// One workout being performed
#[derive(Debug, Clone)]
pub struct Session {
    workout: Workout,
    exercise_index: usize,
    round: u32,
    phase: Phase,
    /// Working weight per exercise, parallel to `workout.exercises`
    weights: Vec<Option<f64>>,
}

impl Session {
    /// Open a workout, resuming at its stored round
    pub fn start(workout: Workout) -> Self {
        let weights = workout
            .exercises
            .iter()
            .map(|e| e.weight.or(e.suggested_weight))
            .collect();
        let round = workout.current_round.clamp(1, workout.rounds.max(1));
        let phase = if workout.completed {
            Phase::Completed
        } else {
            Phase::Active
        };

        Self {
            workout,
            exercise_index: 0,
            round,
            phase,
            weights,
        }
    }

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    /// Exercise being performed, or coming up next while resting
    pub fn current(&self) -> Option<&WorkoutExercise> {
        self.workout.exercises.get(self.exercise_index)
    }

    /// Working weight of the current exercise
    pub fn weight(&self) -> Option<f64> {
        self.weights.get(self.exercise_index).copied().flatten()
    }

    pub fn set_weight(&mut self, weight: Option<f64>) {
        if let Some(slot) = self.weights.get_mut(self.exercise_index) {
            *slot = weight;
        }
    }

    pub fn is_resting(&self) -> bool {
        matches!(self.phase, Phase::Resting { .. })
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Fraction of all exercise slots done, 0.0 to 1.0
    pub fn progress(&self) -> f64 {
        let len = self.workout.exercises.len();
        if self.is_completed() || len == 0 {
            return 1.0;
        }
        let done = (self.round as usize - 1) * len + self.exercise_index;
        done as f64 / (self.workout.rounds as usize * len) as f64
    }

    /// The workout with the session's round and weights merged in
    pub fn snapshot(&self) -> Workout {
        let mut workout = self.workout.clone();
        workout.current_round = self.round;
        for (exercise, weight) in workout.exercises.iter_mut().zip(&self.weights) {
            exercise.weight = *weight;
        }
        workout
    }

    /// Mark the current exercise done and move on.
    ///
    /// Returns the new phase. Persists the workout once the last exercise of
    /// the last round is done. Does nothing unless the session is active.
    pub fn complete_exercise(&mut self, store: &dyn WorkoutStore) -> Result<Phase, StoreError> {
        if self.phase != Phase::Active {
            return Ok(self.phase);
        }

        if self.round >= self.workout.rounds
            && let Some(exercise) = self.workout.exercises.get_mut(self.exercise_index)
        {
            exercise.completed = true;
        }

        let len = self.workout.exercises.len();
        if self.exercise_index + 1 < len {
            self.exercise_index += 1;
            self.rest(self.workout.rest_between_exercises, RestKind::BetweenExercises);
        } else if self.round < self.workout.rounds && len > 0 {
            self.exercise_index = 0;
            self.round += 1;
            self.rest(self.workout.rest_between_rounds, RestKind::BetweenRounds);
        } else {
            self.finish(store)?;
        }

        Ok(self.phase)
    }

    /// Stop now, keeping whatever weights were entered
    pub fn finish_early(&mut self, store: &dyn WorkoutStore) -> Result<(), StoreError> {
        if self.is_completed() {
            return Ok(());
        }
        info!(
            "Finishing workout {} early in round {}/{}",
            self.workout.id, self.round, self.workout.rounds
        );
        self.finish(store)
    }

    /// One second of rest elapsed; returns true when the rest is over
    pub fn tick(&mut self) -> bool {
        match self.phase {
            Phase::Resting { remaining, kind } if remaining > 1 => {
                self.phase = Phase::Resting {
                    remaining: remaining - 1,
                    kind,
                };
                false
            }
            Phase::Resting { .. } => {
                self.phase = Phase::Active;
                true
            }
            _ => false,
        }
    }

    /// End the rest right away; safe to call at any time
    pub fn skip_rest(&mut self) {
        if self.is_resting() {
            debug!("Rest skipped");
            self.phase = Phase::Active;
        }
    }

    fn rest(&mut self, seconds: u32, kind: RestKind) {
        self.phase = if seconds == 0 {
            Phase::Active
        } else {
            Phase::Resting {
                remaining: seconds,
                kind,
            }
        };
    }

    /// Turns Completed only after the store holds the record
    fn finish(&mut self, store: &dyn WorkoutStore) -> Result<(), StoreError> {
        let mut snapshot = self.snapshot();
        snapshot.completed = true;
        store.update(&snapshot)?;

        self.workout.completed = true;
        self.phase = Phase::Completed;
        info!("Workout {} completed", self.workout.id);
        Ok(())
    }
}

/// Countdown that runs a callback when the rest is over.
///
/// Ticks once per second on the tokio runtime. Cancelling is idempotent and
/// dropping the timer cancels it.
#[derive(Default)]
pub struct RestTimer {
    handle: Option<JoinHandle<()>>,
}

impl RestTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down, replacing any countdown already running
    pub fn start<F, Fut>(&mut self, seconds: u32, on_done: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.tick().await; // completes immediately
            for _ in 0..seconds {
                interval.tick().await;
            }
            on_done().await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for RestTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// "2:30"
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Parse a typed weight. Blank or "-" clears it, `None` means the text is
/// not a usable weight.
pub fn parse_weight(text: &str) -> Option<Option<f64>> {
    let text = text.trim();
    if text.is_empty() || text == "-" {
        return Some(None);
    }
    match text.replace(',', ".").parse::<f64>() {
        Ok(w) if w.is_finite() && w >= 0.0 => Some(Some(w)),
        _ => None,
    }
}

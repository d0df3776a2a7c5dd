//! Workout generator - picks a varied full-body circuit for a goal
//!
//! Selection runs in three passes over the catalog:
//! 1. one compound movement
//! 2. muscle coverage rules, in order, up to their minimum counts
//! 3. any remaining exercises until the goal's exercise count is reached
//!
//! Every pick prefers exercises that were not in the previous workout and
//! falls back to the whole pool when nothing fresh is left. Running out of
//! candidates never fails; the workout just ends up shorter.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::history::HistoryLookup;
use super::random::Randomness;
use crate::exercises::{
    Exercise, MuscleGroup, compound_pool, get_all_exercises, remaining_pool, targeting_pool,
};
use crate::goals::Goal;
use crate::workout::{Workout, WorkoutExercise, WorkoutHistory};

/// Minimum number of selected exercises that must work a set of muscles
#[derive(Debug, Clone, Copy)]
pub struct CoverageRule {
    pub muscles: &'static [MuscleGroup],
    pub min_count: usize,
}

/// Full-body coverage, checked in this order
pub const COVERAGE_RULES: &[CoverageRule] = &[
    CoverageRule {
        muscles: &[MuscleGroup::Quadriceps, MuscleGroup::Glutes, MuscleGroup::Hamstrings],
        min_count: 2,
    },
    CoverageRule {
        muscles: &[MuscleGroup::Back, MuscleGroup::Traps, MuscleGroup::LowerBack],
        min_count: 1,
    },
    CoverageRule {
        muscles: &[MuscleGroup::Shoulders],
        min_count: 1,
    },
    CoverageRule {
        muscles: &[MuscleGroup::Abs],
        min_count: 1,
    },
];

/// Builds new workouts from a catalog and the workout history
pub struct WorkoutGenerator<'a> {
    catalog: &'a [Exercise],
}

impl Default for WorkoutGenerator<'static> {
    fn default() -> Self {
        Self::new(get_all_exercises())
    }
}

impl<'a> WorkoutGenerator<'a> {
    pub fn new(catalog: &'a [Exercise]) -> Self {
        Self { catalog }
    }

    /// Generate a fresh, not yet started workout for `goal`
    pub fn generate<R: Randomness>(
        &self,
        goal: Goal,
        history: &WorkoutHistory,
        rng: &mut R,
    ) -> Workout {
        let config = goal.config();
        let lookup = HistoryLookup::new(history);
        let previous = lookup.previous_session_ids();

        let mut selected = self.select(config.exercise_count, &previous, rng);
        rng.shuffle(&mut selected);

        let reps = rng.between(config.reps_min, config.reps_max);

        let exercises: Vec<WorkoutExercise> = selected
            .iter()
            .map(|exercise| WorkoutExercise {
                exercise_id: exercise.id.to_string(),
                name: exercise.name.to_string(),
                reps,
                weight: None,
                suggested_weight: lookup.last_weight_for(exercise.id),
                completed: false,
            })
            .collect();

        if exercises.len() < config.exercise_count {
            debug!(
                "Catalog exhausted: {} of {} exercises for {}",
                exercises.len(),
                config.exercise_count,
                goal
            );
        }

        let workout = Workout {
            id: Uuid::new_v4().to_string(),
            goal,
            goal_label: config.label.to_string(),
            date: Utc::now(),
            exercises,
            rounds: config.rounds,
            current_round: 1,
            rest_between_exercises: config.rest_between_exercises,
            rest_between_rounds: config.rest_between_rounds,
            completed: false,
        };

        info!(
            "Generated {} workout {}: {} exercises x {} reps, {} rounds",
            goal,
            workout.id,
            workout.exercises.len(),
            reps,
            workout.rounds
        );
        workout
    }

    /// Pick up to `count` distinct exercises, in selection order
    fn select<R: Randomness>(
        &self,
        count: usize,
        previous: &HashSet<&str>,
        rng: &mut R,
    ) -> Vec<&'a Exercise> {
        let mut selected: Vec<&'a Exercise> = Vec::with_capacity(count);

        // Pass 1: compound seed
        let pool = compound_pool(self.catalog, &ids(&selected));
        if let Some(exercise) = pick(&pool, previous, rng) {
            selected.push(exercise);
        }

        // Pass 2: coverage
        for rule in COVERAGE_RULES {
            let mut filled = selected.iter().filter(|e| e.targets_any(rule.muscles)).count();

            while filled < rule.min_count && selected.len() < count {
                let pool = targeting_pool(self.catalog, rule.muscles, &ids(&selected));
                let Some(exercise) = pick(&pool, previous, rng) else {
                    debug!(
                        "No candidates left for {:?}: {} of {}",
                        rule.muscles, filled, rule.min_count
                    );
                    break;
                };
                selected.push(exercise);
                filled += 1;
            }
        }

        // Pass 3: fill
        while selected.len() < count {
            let pool = remaining_pool(self.catalog, &ids(&selected));
            match pick(&pool, previous, rng) {
                Some(exercise) => selected.push(exercise),
                None => break,
            }
        }

        selected
    }
}

/// Uniform pick, preferring exercises missing from the previous workout
fn pick<'e, R: Randomness>(
    pool: &[&'e Exercise],
    previous: &HashSet<&str>,
    rng: &mut R,
) -> Option<&'e Exercise> {
    if pool.is_empty() {
        return None;
    }

    let fresh: Vec<&'e Exercise> = pool
        .iter()
        .copied()
        .filter(|e| !previous.contains(e.id))
        .collect();
    let candidates = if fresh.is_empty() { pool } else { &fresh[..] };

    Some(candidates[rng.index(candidates.len())])
}

fn ids(selected: &[&Exercise]) -> Vec<&'static str> {
    selected.iter().map(|e| e.id).collect()
}

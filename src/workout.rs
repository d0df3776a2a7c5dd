//! Workout records - what gets generated, walked through and stored

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::goals::Goal;

/// One exercise slot of a circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    pub exercise_id: String,
    pub name: String, // snapshot of the catalog name
    pub reps: u32,
    pub weight: Option<f64>,
    pub suggested_weight: Option<f64>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub goal: Goal,
    pub goal_label: String, // snapshot of the goal label
    pub date: DateTime<Utc>,
    pub exercises: Vec<WorkoutExercise>,
    pub rounds: u32,
    pub current_round: u32,
    pub rest_between_exercises: u32,
    pub rest_between_rounds: u32,
    pub completed: bool,
}

impl Workout {
    /// Reps shared by every exercise of the circuit
    pub fn reps(&self) -> Option<u32> {
        self.exercises.first().map(|e| e.reps)
    }

    /// Exercises with a recorded weight
    pub fn weighted_exercises(&self) -> impl Iterator<Item = (&str, f64)> {
        self.exercises
            .iter()
            .filter_map(|e| e.weight.map(|w| (e.name.as_str(), w)))
    }

    /// "Swing → Goblet Squat → ..."
    pub fn circuit_line(&self) -> String {
        self.exercises
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    }

    pub fn status_label(&self) -> &'static str {
        if self.completed { "Completed" } else { "Incomplete" }
    }
}

/// All stored workouts, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutHistory {
    pub workouts: Vec<Workout>,
}

impl WorkoutHistory {
    pub fn new(workouts: Vec<Workout>) -> Self {
        Self { workouts }
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn latest(&self) -> Option<&Workout> {
        self.workouts.last()
    }

    /// Most recent unfinished workout
    pub fn latest_unfinished(&self) -> Option<&Workout> {
        self.workouts.iter().rev().find(|w| !w.completed)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn exercise(id: &str, weight: Option<f64>) -> WorkoutExercise {
        WorkoutExercise {
            exercise_id: id.to_string(),
            name: id.replace('_', " "),
            reps: 10,
            weight,
            suggested_weight: None,
            completed: false,
        }
    }

    pub fn workout(id: &str, exercises: Vec<WorkoutExercise>) -> Workout {
        let config = Goal::Strength.config();
        Workout {
            id: id.to_string(),
            goal: Goal::Strength,
            goal_label: config.label.to_string(),
            date: Utc::now(),
            exercises,
            rounds: config.rounds,
            current_round: 1,
            rest_between_exercises: config.rest_between_exercises,
            rest_between_rounds: config.rest_between_rounds,
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{exercise, workout};
    use super::*;

    #[test]
    fn test_json_layout_is_camel_case() {
        let w = workout("w1", vec![exercise("kb_swing", Some(24.0))]);
        let json = serde_json::to_value(WorkoutHistory::new(vec![w])).unwrap();

        let record = &json["workouts"][0];
        assert_eq!(record["goal"], "strength");
        assert_eq!(record["goalLabel"], "Strength");
        assert_eq!(record["currentRound"], 1);
        assert_eq!(record["restBetweenRounds"], 150);
        assert_eq!(record["exercises"][0]["exerciseId"], "kb_swing");
        assert_eq!(record["exercises"][0]["weight"], 24.0);
        assert!(record["exercises"][0]["suggestedWeight"].is_null());
    }

    #[test]
    fn test_reads_original_document() {
        let json = r#"{"workouts":[{"id":"a","goal":"fat_loss","goalLabel":"Fat Loss",
            "date":"2025-03-01T10:00:00.000Z","exercises":[{"exerciseId":"halo","name":"Halo",
            "reps":12,"weight":null,"suggestedWeight":8,"completed":false}],"rounds":4,
            "currentRound":2,"restBetweenExercises":20,"restBetweenRounds":90,"completed":false}]}"#;
        let history: WorkoutHistory = serde_json::from_str(json).unwrap();

        let w = &history.workouts[0];
        assert_eq!(w.goal, Goal::FatLoss);
        assert_eq!(w.current_round, 2);
        assert_eq!(w.exercises[0].suggested_weight, Some(8.0));
    }

    #[test]
    fn test_summary_helpers() {
        let w = workout(
            "w1",
            vec![exercise("kb_swing", Some(24.0)), exercise("halo", None)],
        );
        assert_eq!(w.reps(), Some(10));
        assert_eq!(w.circuit_line(), "kb swing → halo");
        assert_eq!(w.weighted_exercises().collect::<Vec<_>>(), vec![("kb swing", 24.0)]);
        assert_eq!(w.status_label(), "Incomplete");
    }

    #[test]
    fn test_latest_unfinished() {
        let mut done = workout("old", vec![]);
        done.completed = true;
        let open = workout("open", vec![]);
        let mut newest = workout("new", vec![]);
        newest.completed = true;

        let history = WorkoutHistory::new(vec![open, done, newest]);
        assert_eq!(history.latest().map(|w| w.id.as_str()), Some("new"));
        assert_eq!(history.latest_unfinished().map(|w| w.id.as_str()), Some("open"));
    }
}

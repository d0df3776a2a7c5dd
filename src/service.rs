//! Workout service - the operations front ends call

use tracing::{info, warn};

use crate::db::{StoreError, WorkoutStore};
use crate::goals::{Goal, InvalidGoal};
use crate::planner::{Randomness, RngSource, WorkoutGenerator};
use crate::workout::{Workout, WorkoutHistory};

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidGoal(#[from] InvalidGoal),
    #[error("workout {0} not found")]
    NotFound(String),
    #[error("workout id mismatch: requested {path}, body has {body}")]
    IdMismatch { path: String, body: String },
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

pub struct WorkoutService {
    store: Box<dyn WorkoutStore + Send>,
    generator: WorkoutGenerator<'static>,
}

impl WorkoutService {
    pub fn new(store: Box<dyn WorkoutStore + Send>) -> Self {
        Self {
            store,
            generator: WorkoutGenerator::default(),
        }
    }

    pub fn store(&self) -> &dyn WorkoutStore {
        &*self.store
    }

    /// History snapshot; unreadable storage counts as no history yet
    pub fn history(&self) -> WorkoutHistory {
        self.store.history().unwrap_or_else(|err| {
            warn!("Workout history unreadable, treating as empty: {}", err);
            WorkoutHistory::default()
        })
    }

    /// Generate a workout for `goal` and store it
    pub fn create_workout(&self, goal: &str) -> Result<Workout> {
        self.create_workout_with(goal, &mut RngSource::thread())
    }

    pub fn create_workout_with<R: Randomness>(&self, goal: &str, rng: &mut R) -> Result<Workout> {
        let goal: Goal = goal.parse()?;
        let history = self.history();
        let workout = self.generator.generate(goal, &history, rng);
        self.store.append(&workout)?;
        Ok(workout)
    }

    /// All workouts, most recent first
    pub fn list_workouts(&self) -> Vec<Workout> {
        let mut workouts = self.history().workouts;
        workouts.reverse();
        workouts
    }

    pub fn get_workout(&self, id: &str) -> Result<Workout> {
        let found = self.store.get(id).unwrap_or_else(|err| {
            warn!("Workout {} unreadable: {}", id, err);
            None
        });
        found.ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Replace the stored workout `id` with `workout`
    pub fn update_workout(&self, id: &str, workout: Workout) -> Result<Workout> {
        if workout.id != id {
            return Err(ServiceError::IdMismatch {
                path: id.to_string(),
                body: workout.id,
            });
        }
        self.store.update(&workout)?;
        info!("Saved workout {} (round {}, completed: {})", workout.id, workout.current_round, workout.completed);
        Ok(workout)
    }

    /// Returns whether a workout was removed
    pub fn delete_workout(&self, id: &str) -> Result<bool> {
        let existed = self.store.delete(id)?;
        if existed {
            info!("Deleted workout {}", id);
        }
        Ok(existed)
    }

    /// Most recent workout that has not been finished
    pub fn latest_unfinished(&self) -> Option<Workout> {
        self.history().latest_unfinished().cloned()
    }
}

/// Random pick of a goal, for "surprise me" entry points
pub fn random_goal<R: Randomness>(rng: &mut R) -> Goal {
    let goals = Goal::all();
    goals[rng.index(goals.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{JsonFileStore, MemoryStore};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn service() -> WorkoutService {
        WorkoutService::new(Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_create_stores_workout() {
        let service = service();
        let workout = service.create_workout("strength").unwrap();

        assert_eq!(service.get_workout(&workout.id).unwrap(), workout);
        assert_eq!(service.list_workouts().len(), 1);
    }

    #[test]
    fn test_invalid_goal_creates_nothing() {
        let service = service();
        let err = service.create_workout("yoga").unwrap_err();

        assert!(matches!(err, ServiceError::InvalidGoal(InvalidGoal(ref g)) if g == "yoga"));
        assert!(service.list_workouts().is_empty());
    }

    #[test]
    fn test_list_most_recent_first() {
        let service = service();
        let first = service.create_workout("strength").unwrap();
        let second = service.create_workout("endurance").unwrap();

        let ids: Vec<_> = service.list_workouts().into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_update_round_trip() {
        let service = service();
        let mut workout = service.create_workout("fat_loss").unwrap();
        workout.exercises[0].weight = Some(16.0);
        workout.current_round = 2;

        let saved = service.update_workout(&workout.id.clone(), workout.clone()).unwrap();
        assert_eq!(saved, workout);
        assert_eq!(service.get_workout(&workout.id).unwrap(), workout);
    }

    #[test]
    fn test_update_id_mismatch_writes_nothing() {
        let service = service();
        let original = service.create_workout("strength").unwrap();
        let mut changed = original.clone();
        changed.completed = true;

        let err = service.update_workout("other", changed).unwrap_err();
        assert!(matches!(err, ServiceError::IdMismatch { ref path, .. } if path == "other"));
        assert_eq!(service.get_workout(&original.id).unwrap(), original);
    }

    #[test]
    fn test_get_missing() {
        assert!(matches!(service().get_workout("nope"), Err(ServiceError::NotFound(id)) if id == "nope"));
    }

    #[test]
    fn test_delete_missing_leaves_store_unchanged() {
        let service = service();
        let workout = service.create_workout("strength").unwrap();

        assert!(!service.delete_workout("nope").unwrap());
        assert_eq!(service.list_workouts(), vec![workout.clone()]);
        assert!(service.delete_workout(&workout.id).unwrap());
        assert!(service.list_workouts().is_empty());
    }

    #[test]
    fn test_suggests_last_weight() {
        let service = service();
        let mut rng = RngSource(StdRng::seed_from_u64(11));
        let mut first = service.create_workout_with("strength", &mut rng).unwrap();
        for exercise in &mut first.exercises {
            exercise.weight = Some(24.0);
        }
        first.completed = true;
        service.update_workout(&first.id.clone(), first.clone()).unwrap();

        // generate until one of the weighted exercises comes back
        let repeated = (0..50)
            .map(|_| service.create_workout_with("endurance", &mut rng).unwrap())
            .flat_map(|w| w.exercises)
            .find(|e| first.exercises.iter().any(|f| f.exercise_id == e.exercise_id))
            .expect("an exercise repeats within 50 workouts");
        assert_eq!(repeated.suggested_weight, Some(24.0));
    }

    #[test]
    fn test_corrupt_history_degrades_reads_but_fails_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workouts.json");
        std::fs::write(&path, "garbage").unwrap();
        let service = WorkoutService::new(Box::new(JsonFileStore::new(&path)));

        assert!(service.list_workouts().is_empty());
        assert!(matches!(service.get_workout("x"), Err(ServiceError::NotFound(_))));
        assert!(matches!(
            service.create_workout("strength"),
            Err(ServiceError::StorageUnavailable(StoreError::Corrupt(_)))
        ));
    }

    #[test]
    fn test_latest_unfinished() {
        let service = service();
        let open = service.create_workout("strength").unwrap();
        let mut done = service.create_workout("endurance").unwrap();
        done.completed = true;
        service.update_workout(&done.id.clone(), done).unwrap();

        assert_eq!(service.latest_unfinished().map(|w| w.id), Some(open.id));
    }

    #[test]
    fn test_random_goal_reaches_every_goal() {
        let mut rng = RngSource(StdRng::seed_from_u64(5));
        let picked: Vec<_> = (0..200).map(|_| random_goal(&mut rng)).collect();
        for goal in Goal::all() {
            assert!(picked.contains(goal), "{goal} never picked");
        }
    }

    #[test]
    fn test_random_goal_uses_given_source() {
        struct Last;
        impl Randomness for Last {
            fn index(&mut self, len: usize) -> usize {
                len - 1
            }
            fn between(&mut self, min: u32, _max: u32) -> u32 {
                min
            }
            fn shuffle<T>(&mut self, _items: &mut [T]) {}
        }

        assert_eq!(random_goal(&mut Last), Goal::Endurance);
    }
}

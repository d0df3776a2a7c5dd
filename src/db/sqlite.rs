//! SQLite store - one row per workout, JSON body

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use super::{StoreError, WorkoutStore};
use crate::workout::{Workout, WorkoutHistory};

/// Database wrapper
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS workouts (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                goal TEXT NOT NULL,
                date TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                body TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl WorkoutStore for SqliteStore {
    fn history(&self) -> Result<WorkoutHistory, StoreError> {
        let mut stmt = self.conn.prepare("SELECT body FROM workouts ORDER BY seq")?;
        let bodies = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let workouts = bodies
            .iter()
            .map(|body| serde_json::from_str(body))
            .collect::<Result<Vec<Workout>, _>>()?;
        Ok(WorkoutHistory::new(workouts))
    }

    fn append(&self, workout: &Workout) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO workouts (id, goal, date, completed, body) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                workout.id,
                workout.goal.key(),
                workout.date.to_rfc3339(),
                workout.completed,
                serde_json::to_string(workout)?,
            ],
        )?;
        Ok(())
    }

    fn update(&self, workout: &Workout) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE workouts SET goal = ?2, date = ?3, completed = ?4, body = ?5 WHERE id = ?1",
            params![
                workout.id,
                workout.goal.key(),
                workout.date.to_rfc3339(),
                workout.completed,
                serde_json::to_string(workout)?,
            ],
        )?;
        if changed == 0 {
            self.append(workout)?;
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Workout>, StoreError> {
        let body: Option<String> = self
            .conn
            .query_row("SELECT body FROM workouts WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?;
        Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM workouts WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

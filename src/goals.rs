//! Training goals and their circuit parameters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Strength,
    Endurance,
    FatLoss,
    MuscleBuilding,
}

/// Circuit parameters for one goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalConfig {
    pub label: &'static str,
    pub description: &'static str,
    pub reps_min: u32,
    pub reps_max: u32,
    pub rounds: u32,
    pub rest_between_exercises: u32, // seconds
    pub rest_between_rounds: u32,    // seconds
    pub exercise_count: usize,
}

const STRENGTH: GoalConfig = GoalConfig {
    label: "Strength",
    description: "Heavy weights, low reps. Build raw strength.",
    reps_min: 5,
    reps_max: 8,
    rounds: 4,
    rest_between_exercises: 20,
    rest_between_rounds: 150,
    exercise_count: 6,
};

const MUSCLE_BUILDING: GoalConfig = GoalConfig {
    label: "Muscle Building",
    description: "Moderate weights, controlled reps. Hypertrophy focus.",
    reps_min: 8,
    reps_max: 12,
    rounds: 4,
    rest_between_exercises: 20,
    rest_between_rounds: 120,
    exercise_count: 7,
};

const FAT_LOSS: GoalConfig = GoalConfig {
    label: "Fat Loss",
    description: "Moderate weights, minimal rest. Max calorie burn.",
    reps_min: 12,
    reps_max: 15,
    rounds: 4,
    rest_between_exercises: 20,
    rest_between_rounds: 90,
    exercise_count: 7,
};

const ENDURANCE: GoalConfig = GoalConfig {
    label: "Endurance",
    description: "Light weights, high reps. Build stamina.",
    reps_min: 15,
    reps_max: 20,
    rounds: 3,
    rest_between_exercises: 20,
    rest_between_rounds: 120,
    exercise_count: 8,
};

impl Goal {
    /// Goals in the order they are offered to the user
    pub fn all() -> &'static [Goal] {
        &[
            Goal::Strength,
            Goal::MuscleBuilding,
            Goal::FatLoss,
            Goal::Endurance,
        ]
    }

    pub fn config(&self) -> &'static GoalConfig {
        match self {
            Goal::Strength => &STRENGTH,
            Goal::MuscleBuilding => &MUSCLE_BUILDING,
            Goal::FatLoss => &FAT_LOSS,
            Goal::Endurance => &ENDURANCE,
        }
    }

    /// Wire name, as accepted by `FromStr`
    pub fn key(&self) -> &'static str {
        match self {
            Goal::Strength => "strength",
            Goal::Endurance => "endurance",
            Goal::FatLoss => "fat_loss",
            Goal::MuscleBuilding => "muscle_building",
        }
    }

    pub fn label(&self) -> &'static str {
        self.config().label
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Goal text outside the supported set
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid goal '{0}' (expected one of: strength, endurance, fat_loss, muscle_building)")]
pub struct InvalidGoal(pub String);

impl FromStr for Goal {
    type Err = InvalidGoal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Goal::all()
            .iter()
            .copied()
            .find(|goal| goal.key() == s)
            .ok_or_else(|| InvalidGoal(s.to_string()))
    }
}

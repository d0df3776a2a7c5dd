//! Exercise catalog - kettlebell movements tagged by muscle group

use serde::{Deserialize, Serialize};

/// Muscle groups used by the coverage rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Quadriceps,
    Glutes,
    Hamstrings,
    Back,
    Traps,
    LowerBack,
    Shoulders,
    Abs,
}

impl MuscleGroup {
    pub fn label(&self) -> &'static str {
        match self {
            MuscleGroup::Quadriceps => "quadriceps",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::Back => "back",
            MuscleGroup::Traps => "traps",
            MuscleGroup::LowerBack => "lower back",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Abs => "abs",
        }
    }

    /// All muscle groups for iteration
    pub fn all() -> &'static [MuscleGroup] {
        &[
            MuscleGroup::Quadriceps,
            MuscleGroup::Glutes,
            MuscleGroup::Hamstrings,
            MuscleGroup::Back,
            MuscleGroup::Traps,
            MuscleGroup::LowerBack,
            MuscleGroup::Shoulders,
            MuscleGroup::Abs,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: &'static str,
    pub name: &'static str,
    pub muscle_groups: &'static [MuscleGroup],
    pub is_compound: bool, // multi-joint, whole-body movement
    pub description: Option<&'static str>,
}

impl Exercise {
    /// True if the exercise works any of the given muscle groups
    pub fn targets_any(&self, groups: &[MuscleGroup]) -> bool {
        self.muscle_groups.iter().any(|mg| groups.contains(mg))
    }
}

use MuscleGroup::*;

/// Built-in kettlebell catalog
pub const CATALOG: &[Exercise] = &[
    // Compound
    Exercise {
        id: "kb_swing",
        name: "Kettlebell Swing",
        muscle_groups: &[Glutes, Hamstrings, LowerBack],
        is_compound: true,
        description: Some("Hinge, snap the hips, let the bell float to chest height"),
    },
    Exercise {
        id: "goblet_squat",
        name: "Goblet Squat",
        muscle_groups: &[Quadriceps, Glutes],
        is_compound: true,
        description: Some("Bell at the chest, elbows inside the knees at the bottom"),
    },
    Exercise {
        id: "clean_and_press",
        name: "Clean and Press",
        muscle_groups: &[Shoulders, Back, Glutes, Hamstrings],
        is_compound: true,
        description: Some("Clean to the rack, pause, press overhead"),
    },
    Exercise {
        id: "snatch",
        name: "Kettlebell Snatch",
        muscle_groups: &[Shoulders, Glutes, Hamstrings, Back],
        is_compound: true,
        description: Some("One pull from the swing to lockout, punch through at the top"),
    },
    Exercise {
        id: "thruster",
        name: "Kettlebell Thruster",
        muscle_groups: &[Quadriceps, Glutes, Shoulders],
        is_compound: true,
        description: Some("Front squat straight into a press"),
    },
    Exercise {
        id: "turkish_getup",
        name: "Turkish Get-up",
        muscle_groups: &[Shoulders, Abs, Glutes],
        is_compound: true,
        description: Some("Eyes on the bell, arm locked the whole way up and down"),
    },
    Exercise {
        id: "deadlift",
        name: "Kettlebell Deadlift",
        muscle_groups: &[Hamstrings, Glutes, LowerBack],
        is_compound: true,
        description: None,
    },
    Exercise {
        id: "front_squat",
        name: "Kettlebell Front Squat",
        muscle_groups: &[Quadriceps, Glutes, Abs],
        is_compound: true,
        description: None,
    },
    // Legs
    Exercise {
        id: "reverse_lunge",
        name: "Reverse Lunge",
        muscle_groups: &[Quadriceps, Glutes],
        is_compound: false,
        description: None,
    },
    Exercise {
        id: "single_leg_deadlift",
        name: "Single-leg Deadlift",
        muscle_groups: &[Hamstrings, Glutes],
        is_compound: false,
        description: Some("Square hips, back leg long, reach the bell toward the floor"),
    },
    Exercise {
        id: "cossack_squat",
        name: "Cossack Squat",
        muscle_groups: &[Quadriceps, Glutes, Hamstrings],
        is_compound: false,
        description: None,
    },
    Exercise {
        id: "good_morning",
        name: "Kettlebell Good Morning",
        muscle_groups: &[Hamstrings, LowerBack],
        is_compound: false,
        description: None,
    },
    // Back
    Exercise {
        id: "bent_over_row",
        name: "Bent-over Row",
        muscle_groups: &[Back],
        is_compound: false,
        description: None,
    },
    Exercise {
        id: "gorilla_row",
        name: "Gorilla Row",
        muscle_groups: &[Back, Abs],
        is_compound: false,
        description: Some("Two bells on the floor, row one while bracing on the other"),
    },
    Exercise {
        id: "high_pull",
        name: "High Pull",
        muscle_groups: &[Back, Traps, Shoulders],
        is_compound: false,
        description: None,
    },
    Exercise {
        id: "shrug",
        name: "Kettlebell Shrug",
        muscle_groups: &[Traps],
        is_compound: false,
        description: None,
    },
    // Shoulders
    Exercise {
        id: "overhead_press",
        name: "Overhead Press",
        muscle_groups: &[Shoulders],
        is_compound: false,
        description: None,
    },
    Exercise {
        id: "halo",
        name: "Kettlebell Halo",
        muscle_groups: &[Shoulders, Abs],
        is_compound: false,
        description: Some("Circle the bell close around the head, ribs down"),
    },
    Exercise {
        id: "upright_row",
        name: "Upright Row",
        muscle_groups: &[Traps, Shoulders],
        is_compound: false,
        description: None,
    },
    // Core
    Exercise {
        id: "russian_twist",
        name: "Russian Twist",
        muscle_groups: &[Abs],
        is_compound: false,
        description: None,
    },
    Exercise {
        id: "windmill",
        name: "Kettlebell Windmill",
        muscle_groups: &[Abs, Shoulders, Hamstrings],
        is_compound: false,
        description: Some("Bell locked overhead, push the hip out and slide down the front leg"),
    },
    Exercise {
        id: "sit_up",
        name: "Kettlebell Sit-up",
        muscle_groups: &[Abs],
        is_compound: false,
        description: None,
    },
];

pub fn get_all_exercises() -> &'static [Exercise] {
    CATALOG
}

pub fn find_exercise(id: &str) -> Option<&'static Exercise> {
    CATALOG.iter().find(|e| e.id == id)
}

/// Compound exercises of a catalog not yet in `taken`
pub fn compound_pool<'a>(catalog: &'a [Exercise], taken: &[&str]) -> Vec<&'a Exercise> {
    catalog
        .iter()
        .filter(|e| e.is_compound && !taken.contains(&e.id))
        .collect()
}

/// Exercises of a catalog not yet in `taken` that work any of `groups`
pub fn targeting_pool<'a>(
    catalog: &'a [Exercise],
    groups: &[MuscleGroup],
    taken: &[&str],
) -> Vec<&'a Exercise> {
    catalog
        .iter()
        .filter(|e| !taken.contains(&e.id) && e.targets_any(groups))
        .collect()
}

/// Exercises of a catalog not yet in `taken`
pub fn remaining_pool<'a>(catalog: &'a [Exercise], taken: &[&str]) -> Vec<&'a Exercise> {
    catalog.iter().filter(|e| !taken.contains(&e.id)).collect()
}

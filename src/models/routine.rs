// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout routine models: quick routines and custom routines with exercises.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Stored routine record (`routines` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Routine {
    /// Store-assigned document ID
    pub id: String,
    pub name: String,
    /// Scheduled local time, if any
    #[serde(default, with = "crate::time_utils::optional_local_time")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub time: Option<NaiveDateTime>,
    #[serde(rename = "userEmail")]
    pub owner: String,
}

/// Fields written when a routine is created.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct NewRoutine {
    #[validate(custom(function = "crate::models::not_blank"))]
    pub name: String,
    #[serde(with = "crate::time_utils::optional_local_time")]
    pub time: Option<NaiveDateTime>,
}

/// One exercise inside a custom routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Exercise {
    #[serde(default)]
    #[validate(custom(function = "crate::models::not_blank"))]
    pub name: String,
    #[serde(default, deserialize_with = "crate::models::lenient_number::deserialize")]
    #[validate(range(min = 1))]
    pub sets: u32,
    #[serde(default, deserialize_with = "crate::models::lenient_number::deserialize")]
    #[validate(range(min = 1))]
    pub reps: u32,
    /// Targeted muscle group (stored as `area`)
    #[serde(default, rename = "area", alias = "muscleArea")]
    #[validate(custom(function = "crate::models::not_blank"))]
    pub muscle_area: String,
    #[serde(default, rename = "imageUrl")]
    #[validate(custom(function = "crate::models::not_blank"))]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Editable part of a custom routine, submitted on create and on replace.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CustomRoutineDraft {
    #[serde(default)]
    #[validate(custom(function = "crate::models::not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "crate::models::not_blank"))]
    pub description: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    #[validate(nested)]
    pub exercises: Vec<Exercise>,
}

/// Stored custom routine record (`customRoutines` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CustomRoutine {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(rename = "userEmail")]
    pub owner: String,
    /// Time of the last full save
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Full document body written for a custom routine.
#[derive(Debug, Serialize)]
pub(crate) struct CustomRoutineFields<'a> {
    #[serde(flatten)]
    pub draft: &'a CustomRoutineDraft,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise() -> Exercise {
        Exercise {
            name: "Sentadilla".to_string(),
            sets: 4,
            reps: 10,
            muscle_area: "Piernas".to_string(),
            image_url: "https://example.com/squat.png".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_exercise_reads_area_and_muscle_area() {
        let stored: Exercise = serde_json::from_value(serde_json::json!({
            "name": "Plancha", "sets": 3, "reps": 1, "area": "Core", "imageUrl": "x"
        }))
        .unwrap();
        assert_eq!(stored.muscle_area, "Core");

        let aliased: Exercise = serde_json::from_value(serde_json::json!({
            "name": "Plancha", "sets": 3, "reps": 1, "muscleArea": "Core", "imageUrl": "x"
        }))
        .unwrap();
        assert_eq!(aliased.muscle_area, "Core");

        let written = serde_json::to_value(&stored).unwrap();
        assert_eq!(written["area"], "Core");
        assert!(written.get("notes").is_none());
    }

    #[test]
    fn test_exercise_reads_sets_and_reps_stored_as_strings() {
        let stored: Exercise = serde_json::from_value(serde_json::json!({
            "name": "Sentadilla", "sets": "4", "reps": " 10 ", "area": "Piernas", "imageUrl": "x"
        }))
        .unwrap();
        assert_eq!(stored.sets, 4);
        assert_eq!(stored.reps, 10);

        // Written back as numbers
        let written = serde_json::to_value(&stored).unwrap();
        assert_eq!(written["sets"], 4);
        assert_eq!(written["reps"], 10);
    }

    #[test]
    fn test_draft_requires_exercises() {
        let draft = CustomRoutineDraft {
            name: "Pierna".to_string(),
            description: "Día de pierna".to_string(),
            exercises: vec![],
        };
        assert!(draft.validate().is_err());

        let draft = CustomRoutineDraft {
            exercises: vec![exercise()],
            ..draft
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_draft_rejects_invalid_nested_exercise() {
        let draft = CustomRoutineDraft {
            name: "Pierna".to_string(),
            description: "Día de pierna".to_string(),
            exercises: vec![Exercise {
                sets: 0,
                ..exercise()
            }],
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_routine_time_round_trips_through_wire_format() {
        let routine: Routine = serde_json::from_value(serde_json::json!({
            "id": "r1", "name": "Cardio", "time": "2024-01-05T07:30", "userEmail": "ana@example.com"
        }))
        .unwrap();
        assert!(routine.time.is_some());
        assert_eq!(serde_json::to_value(&routine).unwrap()["time"], "2024-01-05T07:30");

        let untimed: Routine = serde_json::from_value(serde_json::json!({
            "id": "r2", "name": "Yoga", "time": "", "userEmail": "ana@example.com"
        }))
        .unwrap();
        assert_eq!(untimed.time, None);
    }
}

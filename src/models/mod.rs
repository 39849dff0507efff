// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod progress;
pub mod push;
pub mod routine;
pub mod stats;
pub mod user;

pub use progress::{CompletedRoutineRecord, NewCompletedRoutine, NewWeightSample, WeightSample};
pub use push::PushToken;
pub use routine::{CustomRoutine, CustomRoutineDraft, Exercise, NewRoutine, Routine};
pub use stats::{ChartSeries, DailyCounts, Dated, ProgressCharts};
pub use user::{Credentials, Identity, Profile};

use validator::ValidationError;

/// Rejects strings that are empty after trimming.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Serde adapter for numeric fields that older documents stored as form
/// strings (`"30"`, `"170.5"`). A blank string reads as the default value.
pub(crate) mod lenient_number {
    use serde::{de, Deserialize, Deserializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText<T> {
        Number(T),
        Text(String),
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr + Default,
    {
        match NumberOrText::<T>::deserialize(deserializer)? {
            NumberOrText::Number(value) => Ok(value),
            NumberOrText::Text(text) if text.trim().is_empty() => Ok(T::default()),
            NumberOrText::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| de::Error::custom(format!("expected a number, got {text:?}"))),
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress tracking models: body weight samples and completed routines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::models::stats::Dated;

/// Stored body weight sample (`weights` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeightSample {
    pub id: String,
    /// Weight in kilograms
    pub value: f64,
    pub date: NaiveDate,
    #[serde(rename = "userEmail")]
    pub owner: String,
}

/// Fields written when a weight sample is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct NewWeightSample {
    #[validate(range(exclusive_min = 0.0))]
    pub value: f64,
    pub date: NaiveDate,
}

/// Stored record of a finished workout (`completedRoutines` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CompletedRoutineRecord {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "userEmail")]
    pub owner: String,
}

/// Fields written when a completed routine is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct NewCompletedRoutine {
    #[validate(custom(function = "crate::models::not_blank"))]
    pub name: String,
    pub date: NaiveDate,
}

impl Dated for WeightSample {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for CompletedRoutineRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

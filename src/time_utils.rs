// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::error::AppError;

/// Wire format for calendar dates (`<input type="date">`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Wire format for local date-times (`<input type="datetime-local">`).
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Check that a strftime format string renders a bare calendar date.
///
/// `DelayedFormat` panics in `to_string()` on an unknown specifier and on
/// time or zone specifiers a `NaiveDate` cannot supply (`%H`, `%z`, ...), so
/// label formats are test-rendered once at config load.
pub fn is_valid_label_format(format: &str) -> bool {
    let mut rendered = String::new();
    !format.is_empty() && write!(rendered, "{}", NaiveDate::MIN.format(format)).is_ok()
}

/// Render a calendar day as a chart label.
pub fn format_day_label(date: NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

/// Parse a required `YYYY-MM-DD` input field.
pub fn parse_input_date(field: &str, raw: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("{field} must be a YYYY-MM-DD date")))
}

/// Parse an optional local date-time input field; blank means "not set".
pub fn parse_input_local_time(field: &str, raw: &str) -> Result<Option<NaiveDateTime>, AppError> {
    parse_local_time(raw)
        .map_err(|_| AppError::Validation(format!("{field} must be a YYYY-MM-DDTHH:MM time")))
}

fn parse_local_time(raw: &str) -> Result<Option<NaiveDateTime>, chrono::ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(raw, LOCAL_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map(Some)
}

/// Serde adapter for optional local times stored as `""` or `YYYY-MM-DDTHH:MM`.
pub mod optional_local_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format(super::LOCAL_TIME_FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        super::parse_local_time(&raw).map_err(serde::de::Error::custom)
    }
}

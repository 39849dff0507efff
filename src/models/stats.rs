//! Chart aggregates derived from progress snapshots.
//!
//! Everything here is pure: snapshots go in, display-ready series come out.
//! Dates are already validated on input, so every sample has a real calendar day.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{CompletedRoutineRecord, WeightSample};
use crate::time_utils::format_day_label;

/// Anything with a calendar date that can be plotted over time.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// Parallel label/value arrays for a line chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Event count per day label, in first-seen order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyCounts {
    pub labels: Vec<String>,
    pub counts: Vec<u32>,
}

impl DailyCounts {
    /// Count recorded for a label, if the label was seen.
    pub fn get(&self, label: &str) -> Option<u32> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|idx| self.counts[idx])
    }

    /// Sum of all counts (equals the number of input events).
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Both progress charts, as served to the progress screen.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressCharts {
    /// Body weight (kg) over time
    pub weight: ChartSeries,
    /// Completed routines per day
    pub completed_by_day: DailyCounts,
}

impl ProgressCharts {
    /// Build both charts from raw (unsorted) snapshots.
    pub fn build(
        weights: Vec<WeightSample>,
        completed: Vec<CompletedRoutineRecord>,
        label_format: &str,
    ) -> Self {
        let weights = sort_chronologically(weights);
        let completed = sort_chronologically(completed);
        Self {
            weight: chart_series(&weights, |w| w.value, label_format),
            completed_by_day: daily_counts(&completed, label_format),
        }
    }
}

/// Sort samples by ascending date. Samples on the same day keep their input order.
pub fn sort_chronologically<T: Dated>(mut samples: Vec<T>) -> Vec<T> {
    // `sort_by_key` is stable
    samples.sort_by_key(Dated::date);
    samples
}

/// Count events per formatted day label.
pub fn daily_counts<T: Dated>(events: &[T], label_format: &str) -> DailyCounts {
    let mut counts = DailyCounts::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for event in events {
        let label = format_day_label(event.date(), label_format);
        match index.get(&label) {
            Some(&idx) => counts.counts[idx] += 1,
            None => {
                index.insert(label.clone(), counts.labels.len());
                counts.labels.push(label);
                counts.counts.push(1);
            }
        }
    }

    counts
}

/// Project samples (already in display order) into label/value arrays.
pub fn chart_series<T, F>(samples: &[T], value: F, label_format: &str) -> ChartSeries
where
    T: Dated,
    F: Fn(&T) -> f64,
{
    ChartSeries {
        labels: samples
            .iter()
            .map(|s| format_day_label(s.date(), label_format))
            .collect(),
        values: samples.iter().map(value).collect(),
    }
}

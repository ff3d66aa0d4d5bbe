//! Stateless aggregations over a filtered view.
//!
//! Each function reads the view, never mutates it, and returns an owned
//! summary. An empty or all-missing input produces an empty summary (or 0),
//! never an error.

use crate::types::{CategoryCount, CategoryValue, DailyValue, HistogramBin, TripRecord};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// Categorical columns usable as a grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    BookingStatus,
    VehicleType,
    CustomerId,
    PaymentMethod,
    PickupLocation,
    DropLocation,
}

impl Category {
    pub fn value(self, r: &TripRecord) -> Option<&str> {
        match self {
            Category::BookingStatus => r.booking_status.as_deref(),
            Category::VehicleType => r.vehicle_type.as_deref(),
            Category::CustomerId => r.customer_id.as_deref(),
            Category::PaymentMethod => r.payment_method.as_deref(),
            Category::PickupLocation => r.pickup_location.as_deref(),
            Category::DropLocation => r.drop_location.as_deref(),
        }
    }
}

/// Numeric columns usable as an aggregated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    AvgVtat,
    AvgCtat,
    BookingValue,
    RideDistance,
    DriverRating,
    CustomerRating,
}

impl Measure {
    pub fn value(self, r: &TripRecord) -> Option<f64> {
        match self {
            Measure::AvgVtat => r.avg_vtat,
            Measure::AvgCtat => r.avg_ctat,
            Measure::BookingValue => r.booking_value,
            Measure::RideDistance => r.ride_distance,
            Measure::DriverRating => r.driver_rating,
            Measure::CustomerRating => r.customer_rating,
        }
    }
}

/// Rows per key, most frequent first; equal counts are ordered by key.
pub fn count_by(view: &[TripRecord], key: Category) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in view {
        if let Some(k) = key.value(r) {
            *counts.entry(k).or_default() += 1;
        }
    }
    let mut rows: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(k, count)| CategoryCount {
            key: k.to_string(),
            count,
        })
        .collect();
    // stable, so ties keep the key order from the BTreeMap
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Mean of `measure` per key, ignoring missing values entirely. A key with
/// no valid values is left out.
pub fn mean_by(view: &[TripRecord], key: Category, measure: Measure) -> Vec<CategoryValue> {
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in view {
        if let (Some(k), Some(v)) = (key.value(r), measure.value(r)) {
            let e = acc.entry(k).or_insert((0.0, 0));
            e.0 += v;
            e.1 += 1;
        }
    }
    acc.into_iter()
        .map(|(k, (total, n))| CategoryValue {
            key: k.to_string(),
            value: total / n as f64,
        })
        .collect()
}

/// Sum of `measure` per key with missing values counted as 0. A key whose
/// rows are all missing is left out instead of showing up as a silent 0.
pub fn sum_by(view: &[TripRecord], key: Category, measure: Measure) -> Vec<CategoryValue> {
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in view {
        if let Some(k) = key.value(r) {
            let e = acc.entry(k).or_insert((0.0, 0));
            if let Some(v) = measure.value(r) {
                e.0 += v;
                e.1 += 1;
            }
        }
    }
    acc.into_iter()
        .filter(|(_, (_, valid))| *valid > 0)
        .map(|(k, (total, _))| CategoryValue {
            key: k.to_string(),
            value: total,
        })
        .collect()
}

/// Rating values in row order without missing entries or the `<= 0`
/// "not rated" sentinel.
pub fn rating_distribution(view: &[TripRecord], measure: Measure) -> Vec<f64> {
    view.iter()
        .filter_map(|r| measure.value(r))
        .filter(|v| *v > 0.0)
        .collect()
}

/// Sum of `measure` per calendar date of the trip timestamp, oldest first.
/// Every date with trips appears, missing values counted as 0, so days with
/// only cancelled rides show up as 0 instead of a gap. A view without a
/// single valid value has no series at all.
pub fn daily_series(view: &[TripRecord], measure: Measure) -> Vec<DailyValue> {
    let mut acc: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut valid = 0usize;
    for r in view {
        let e = acc.entry(r.timestamp.date()).or_insert(0.0);
        if let Some(v) = measure.value(r) {
            *e += v;
            valid += 1;
        }
    }
    if valid == 0 {
        return Vec::new();
    }
    acc.into_iter()
        .map(|(date, value)| DailyValue { date, value })
        .collect()
}

pub fn distinct_count(view: &[TripRecord], key: Category) -> usize {
    view.iter()
        .filter_map(|r| key.value(r))
        .collect::<HashSet<_>>()
        .len()
}

/// Sum over the whole view, missing values counted as 0.
pub fn total(view: &[TripRecord], measure: Measure) -> f64 {
    view.iter().filter_map(|r| measure.value(r)).sum()
}

/// Each group's percentage of the summed values. All shares are 0 when the
/// total is 0.
pub fn share_of_total(summary: &[CategoryValue]) -> Vec<CategoryValue> {
    let sum: f64 = summary.iter().map(|row| row.value).sum();
    summary
        .iter()
        .map(|row| CategoryValue {
            key: row.key.clone(),
            value: if sum.abs() < f64::EPSILON {
                0.0
            } else {
                row.value / sum * 100.0
            },
        })
        .collect()
}

/// First and last calendar date in the view.
pub fn date_range(view: &[TripRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let first = view.iter().map(|r| r.timestamp.date()).min()?;
    let last = view.iter().map(|r| r.timestamp.date()).max()?;
    Some((first, last))
}

/// Equal-width bins spanning `[min, max]`. A constant input collapses to a
/// single bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.abs() < f64::EPSILON {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = range / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = ((v - min) / width).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time values, tick generation and formatting.
//!
//! Time is modelled as `f64` seconds: epoch seconds (UTC) for calendar dates, and plain seconds
//! for durations such as race times. Calendar math goes through `chrono`.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chrono::{Datelike, NaiveDate};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::scale::nice_step;

/// Seconds in one day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Seconds in a non-leap year.
pub const SECONDS_PER_YEAR: f64 = 365.0 * SECONDS_PER_DAY;

/// `NaiveDate::from_ymd(1970, 1, 1).num_days_from_ce()`.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Epoch seconds at midnight UTC on `date`.
pub fn date_to_seconds(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE) * SECONDS_PER_DAY
}

/// The calendar date containing epoch second `secs`.
pub fn seconds_to_date(secs: f64) -> Option<NaiveDate> {
    let days = (secs / SECONDS_PER_DAY).floor();
    if !days.is_finite() || days.abs() > f64::from(i32::MAX / 2) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, reason = "range checked above")]
    let days = days as i32;
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// Epoch seconds at January 1st of `year`.
pub fn year_start_seconds(year: i32) -> Option<f64> {
    NaiveDate::from_ymd_opt(year, 1, 1).map(date_to_seconds)
}

/// Tick values at the start of calendar years, every 1, 2, 5, 10, ... years.
///
/// `count` is a hint for the number of ticks; only ticks inside `[min, max]` are returned.
pub fn year_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let (Some(lo_date), Some(hi_date)) = (seconds_to_date(lo), seconds_to_date(hi)) else {
        return Vec::new();
    };
    let mut first = lo_date.year();
    if year_start_seconds(first).is_none_or(|s| s < lo) {
        first += 1;
    }
    let last = hi_date.year();
    if count == 0 || first > last {
        return Vec::new();
    }

    let raw = f64::from(last - first) / count as f64;
    #[allow(clippy::cast_possible_truncation, reason = "nice steps are small integers")]
    let step = (nice_step(raw).round().max(1.0)) as i32;
    let mut year = first.div_euclid(step) * step;
    if year < first {
        year += step;
    }

    let mut out = Vec::new();
    while year <= last {
        if let Some(s) = year_start_seconds(year) {
            if s >= lo && s <= hi {
                out.push(s);
            }
        }
        year += step;
    }
    out
}

/// Tick values for durations in seconds (seconds, minutes and hours).
pub fn clock_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }

    let step = clock_step((max - min) / count as f64);
    let start = (min / step).ceil();
    let stop = (max / step).floor();
    let n_f = stop - start;
    if !n_f.is_finite() || n_f < 0.0 {
        return Vec::new();
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "guarded by finite/non-negative checks and capped at 10k"
    )]
    let n = n_f.min(10_000.0) as u64;
    (0..=n).map(|i| (start + i as f64) * step).collect()
}

fn clock_step(step: f64) -> f64 {
    const STEPS: &[f64] = &[
        1.0,
        5.0,
        15.0,
        30.0,
        60.0,
        5.0 * 60.0,
        15.0 * 60.0,
        30.0 * 60.0,
        60.0 * 60.0,
        3.0 * 60.0 * 60.0,
        6.0 * 60.0 * 60.0,
        12.0 * 60.0 * 60.0,
    ];
    STEPS
        .iter()
        .copied()
        .find(|&s| s >= step)
        .unwrap_or_else(|| (step / 3600.0).ceil().max(1.0) * 3600.0)
}

/// Formats epoch seconds as a four-digit year (`%Y`).
pub fn format_year(secs: f64) -> String {
    match seconds_to_date(secs) {
        Some(d) => alloc::format!("{:04}", d.year()),
        None => String::new(),
    }
}

/// Formats a duration in seconds as `%M:%S` (minutes wrap at the hour).
pub fn format_minutes_seconds(secs: f64) -> String {
    #[allow(clippy::cast_possible_truncation, reason = "clamped to the i64 range")]
    let total = secs.round().clamp(0.0, i64::MAX as f64) as i64;
    alloc::format!("{:02}:{:02}", (total / 60) % 60, total % 60)
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Full English month name for a zero-based month index.
pub fn month_name(index: usize) -> Option<&'static str> {
    MONTHS.get(index).copied()
}

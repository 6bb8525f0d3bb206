// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monthly global land temperature variance.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use chrono::{Month, NaiveDate};
use serde::Deserialize;
use statviz_core::{Attributes, Datum};

use crate::error::ExtractError;
use crate::extract::{Extracted, FieldExtractor, InvalidRecord, extract_all};
use crate::raw::{lenient, lenient_records};

/// The temperature payload.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureRaw {
    /// Baseline temperature in °C that variances are relative to.
    #[serde(default, deserialize_with = "lenient")]
    pub base_temperature: Option<f64>,
    /// Per-month variances.
    #[serde(default, deserialize_with = "lenient_records")]
    pub monthly_variance: Vec<MonthlyVarianceRaw>,
}

/// One month of the temperature payload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MonthlyVarianceRaw {
    /// Year.
    #[serde(default, deserialize_with = "lenient")]
    pub year: Option<i32>,
    /// Month, 1-based.
    #[serde(default, deserialize_with = "lenient")]
    pub month: Option<u32>,
    /// Variance from the baseline in °C.
    #[serde(default, deserialize_with = "lenient")]
    pub variance: Option<f64>,
}

/// A validated month.
#[derive(Clone, Debug, PartialEq)]
pub struct TemperatureRecord {
    /// Year.
    pub year: i32,
    /// Month index, 0 for January.
    pub month: u32,
    /// Variance from the baseline in °C.
    pub variance: f64,
    /// Absolute temperature (baseline plus variance) in °C.
    pub temperature: f64,
}

impl TemperatureRecord {
    /// Full English month name.
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month + 1)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map_or("", |m| m.name())
    }
}

impl Datum for TemperatureRecord {
    fn tooltip(&self) -> String {
        format!(
            "{} {}:  {:.1}°C\nVariance: {:.1}°C",
            self.month_name(),
            self.year,
            self.temperature,
            self.variance
        )
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.push(("data-year", self.year.to_string()));
        attrs.push(("data-month", self.month.to_string()));
        attrs.push(("data-temp", self.temperature.to_string()));
        attrs.push(("data-variance", self.variance.to_string()));
        attrs
    }
}

/// Validates months against a baseline.
#[derive(Clone, Copy, Debug)]
pub struct TemperatureExtractor {
    /// Baseline temperature in °C.
    pub base_temperature: f64,
}

impl FieldExtractor for TemperatureExtractor {
    type Raw = MonthlyVarianceRaw;
    type Record = TemperatureRecord;
    const DATASET: &'static str = "temperature";

    fn extract(&self, raw: &MonthlyVarianceRaw) -> Result<TemperatureRecord, InvalidRecord> {
        let year = raw.year.ok_or_else(|| InvalidRecord::missing("year"))?;
        // The year's column ends at the start of the next one, so both must be dates.
        let in_range = year
            .checked_add(1)
            .and_then(|next| NaiveDate::from_ymd_opt(next, 1, 1))
            .and(NaiveDate::from_ymd_opt(year, 1, 1))
            .is_some();
        if !in_range {
            return Err(InvalidRecord::invalid("year", format!("{year} is out of range")));
        }
        let month = raw.month.ok_or_else(|| InvalidRecord::missing("month"))?;
        if !(1..=12).contains(&month) {
            return Err(InvalidRecord::invalid("month", format!("{month} is not 1-12")));
        }
        let variance = raw
            .variance
            .filter(|v| v.is_finite())
            .ok_or_else(|| InvalidRecord::missing("variance"))?;
        Ok(TemperatureRecord {
            year,
            month: month - 1,
            variance,
            temperature: self.base_temperature + variance,
        })
    }
}

/// The extracted temperature dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct TemperatureSeries {
    /// Baseline temperature in °C.
    pub base_temperature: f64,
    /// Valid months in input order.
    pub records: Vec<TemperatureRecord>,
    /// Number of dropped months.
    pub dropped: usize,
}

impl TemperatureSeries {
    /// Validates a whole payload. A missing baseline is fatal.
    pub fn extract(raw: &TemperatureRaw) -> Result<Self, ExtractError> {
        let base_temperature = raw
            .base_temperature
            .filter(|v| v.is_finite())
            .ok_or(ExtractError::MissingField("baseTemperature"))?;
        let Extracted { records, dropped } = extract_all(
            &TemperatureExtractor { base_temperature },
            &raw.monthly_variance,
        );
        Ok(Self {
            base_temperature,
            records,
            dropped,
        })
    }

    /// First and last year, if there are any records.
    pub fn year_extent(&self) -> Option<(i32, i32)> {
        let first = self.records.first()?.year;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.year), hi.max(r.year))
        }))
    }

    /// Number of distinct years.
    pub fn year_count(&self) -> usize {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years.len()
    }
}

// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quarterly GDP series.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use statviz_core::{Attributes, Datum};

use crate::error::ExtractError;
use crate::extract::{Extracted, FieldExtractor, InvalidRecord, extract_all};

/// The GDP payload: `{ "data": [["1947-01-01", 243.1], ...] }`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GdpRaw {
    /// `[date, value]` pairs; each entry is validated individually.
    #[serde(default)]
    pub data: Option<Vec<Value>>,
    /// Dataset description, when the payload carries one.
    #[serde(default)]
    pub description: Option<String>,
}

impl GdpRaw {
    /// Validates every pair. A payload without `data` is unusable.
    pub fn extract(&self) -> Result<Extracted<GdpRecord>, ExtractError> {
        let data = self.data.as_ref().ok_or(ExtractError::MissingField("data"))?;
        Ok(extract_all(&GdpExtractor, data))
    }
}

/// One quarter of GDP.
#[derive(Clone, Debug, PartialEq)]
pub struct GdpRecord {
    /// First day of the quarter.
    pub date: NaiveDate,
    /// The date as it appeared in the dataset.
    pub raw_date: String,
    /// GDP in billions of dollars.
    pub gdp: f64,
    /// `"Q{n} {year}"`.
    pub quarter: String,
    /// `"$<amount>B"`.
    pub amount: String,
}

/// Quarter label for a date: months 1-3 are Q1, 4-6 Q2 and so on.
pub fn quarter_label(date: NaiveDate) -> String {
    format!("Q{} {}", date.month0() / 3 + 1, date.year())
}

/// Formats an amount in billions, e.g. `$19985.3B`.
pub fn billions(amount: f64) -> String {
    format!("${amount}B")
}

/// Validates `[date, value]` pairs.
#[derive(Clone, Copy, Debug, Default)]
pub struct GdpExtractor;

impl FieldExtractor for GdpExtractor {
    type Raw = Value;
    type Record = GdpRecord;
    const DATASET: &'static str = "gdp";

    fn extract(&self, raw: &Value) -> Result<GdpRecord, InvalidRecord> {
        let pair = raw
            .as_array()
            .filter(|a| a.len() >= 2)
            .ok_or_else(|| InvalidRecord::invalid("data", "expected a [date, value] pair"))?;
        let raw_date = pair[0]
            .as_str()
            .ok_or_else(|| InvalidRecord::missing("date"))?;
        let date: NaiveDate = raw_date
            .parse()
            .map_err(|_| InvalidRecord::invalid("date", format!("`{raw_date}` is not YYYY-MM-DD")))?;
        let gdp = pair[1]
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| InvalidRecord::missing("value"))?;
        Ok(GdpRecord {
            date,
            raw_date: raw_date.to_string(),
            gdp,
            quarter: quarter_label(date),
            amount: billions(gdp),
        })
    }
}

impl Datum for GdpRecord {
    fn tooltip(&self) -> String {
        format!("{}:  {}", self.quarter, self.amount)
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.push(("data-date", self.raw_date.clone()));
        attrs.push(("data-gdp", self.gdp.to_string()));
        attrs
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn quarter_labels() {
        let d = |s: &str| s.parse::<NaiveDate>().unwrap();
        assert_eq!(quarter_label(d("1995-07-01")), "Q3 1995");
        assert_eq!(quarter_label(d("1947-01-01")), "Q1 1947");
        assert_eq!(quarter_label(d("2015-12-31")), "Q4 2015");
    }

    #[test]
    fn billions_format() {
        assert_eq!(billions(19985.3), "$19985.3B");
        assert_eq!(billions(243.1), "$243.1B");
    }

    #[test]
    fn invalid_pairs_are_dropped() {
        let raws = vec![
            json!(["1995-07-01", 7543.8]),
            json!(["1995-13-01", 1.0]),
            json!(["1996-01-01"]),
            json!(["1996-04-01", null]),
            json!({"date": "1996-07-01"}),
        ];
        let out = extract_all(&GdpExtractor, &raws);
        assert_eq!(out.dropped, 4);
        assert_eq!(out.records.len(), 1);
        let r = &out.records[0];
        assert_eq!(r.quarter, "Q3 1995");
        assert_eq!(r.tooltip(), "Q3 1995:  $7543.8B");
        assert_eq!(r.attributes()[0], ("data-date", "1995-07-01".into()));
    }

    #[test]
    fn payload_without_data_is_unusable() {
        let raw: GdpRaw = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert!(matches!(raw.extract(), Err(ExtractError::MissingField("data"))));
        let raw: GdpRaw = serde_json::from_str(r#"{"data": [["1947-01-01", 243.1]]}"#).unwrap();
        assert_eq!(raw.extract().unwrap().records[0].amount, "$243.1B");
    }

    proptest! {
        #[test]
        fn quarter_label_matches_month(year in 1900_i32..2100, month in 1_u32..=12, day in 1_u32..=28) {
            let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
            let expected = format!("Q{} {}", (month - 1) / 3 + 1, year);
            prop_assert_eq!(quarter_label(date), expected);
        }
    }
}

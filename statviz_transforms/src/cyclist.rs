// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tour de France climb times.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};

use chrono::NaiveDate;
use serde::Deserialize;
use statviz_core::{Attributes, Datum};

use crate::extract::{FieldExtractor, InvalidRecord};
use crate::raw::{NumberOrString, lenient};

/// One entry of the cyclist payload.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CyclistRaw {
    /// Climb time, `"MM:SS"`.
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<String>,
    /// Finishing place.
    #[serde(default, deserialize_with = "lenient")]
    pub place: Option<u32>,
    /// Climb time in seconds.
    #[serde(default, deserialize_with = "lenient")]
    pub seconds: Option<f64>,
    /// Rider name.
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Race year (number or numeric string).
    #[serde(default, deserialize_with = "lenient")]
    pub year: Option<NumberOrString>,
    /// Rider nationality code.
    #[serde(default, deserialize_with = "lenient")]
    pub nationality: Option<String>,
    /// Doping allegation, empty when there is none.
    #[serde(default, deserialize_with = "lenient")]
    pub doping: Option<String>,
    /// Source link for the allegation.
    #[serde(rename = "URL", default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

/// Whether a rider has a doping allegation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DopingStatus {
    /// A non-empty allegation exists.
    Doping,
    /// No allegation.
    Clean,
}

impl DopingStatus {
    /// Classifies a doping note.
    pub fn from_note(note: &str) -> Self {
        if note.is_empty() {
            Self::Clean
        } else {
            Self::Doping
        }
    }
}

/// A validated cyclist record.
#[derive(Clone, Debug, PartialEq)]
pub struct CyclistRecord {
    /// Rider name.
    pub name: String,
    /// Nationality code, empty when unknown.
    pub nationality: String,
    /// Race year.
    pub year: i32,
    /// January 1st of the race year.
    pub date: NaiveDate,
    /// Climb time as given, `"MM:SS"`.
    pub time: String,
    /// Climb time in seconds.
    pub seconds: f64,
    /// Finishing place, if given.
    pub place: Option<u32>,
    /// Doping classification.
    pub doping: DopingStatus,
    /// Doping note, empty when clean.
    pub note: String,
    /// Source link, empty when absent.
    pub url: String,
}

/// Parses `"MM:SS"` into seconds.
pub fn parse_minutes_seconds(s: &str) -> Option<f64> {
    let (m, sec) = s.trim().split_once(':')?;
    let m: u32 = m.parse().ok()?;
    let sec: u32 = sec.parse().ok()?;
    if sec >= 60 {
        return None;
    }
    Some(f64::from(m.checked_mul(60)?.checked_add(sec)?))
}

/// Validates cyclist entries.
#[derive(Clone, Copy, Debug, Default)]
pub struct CyclistExtractor;

impl FieldExtractor for CyclistExtractor {
    type Raw = CyclistRaw;
    type Record = CyclistRecord;
    const DATASET: &'static str = "cyclists";

    fn extract(&self, raw: &CyclistRaw) -> Result<CyclistRecord, InvalidRecord> {
        let name = raw.name.clone().ok_or_else(|| InvalidRecord::missing("Name"))?;
        let year_value = raw
            .year
            .as_ref()
            .and_then(NumberOrString::as_f64)
            .ok_or_else(|| InvalidRecord::missing("Year"))?;
        #[allow(clippy::cast_possible_truncation, reason = "range checked below")]
        let year = year_value as i32;
        if f64::from(year) != year_value {
            return Err(InvalidRecord::invalid("Year", "not a whole year"));
        }
        let date = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| InvalidRecord::invalid("Year", "out of range"))?;
        let time = raw.time.as_deref().ok_or_else(|| InvalidRecord::missing("Time"))?;
        let seconds = parse_minutes_seconds(time)
            .ok_or_else(|| InvalidRecord::invalid("Time", format!("`{time}` is not MM:SS")))?;
        let note = raw.doping.clone().unwrap_or_default();
        Ok(CyclistRecord {
            name,
            nationality: raw.nationality.clone().unwrap_or_default(),
            year,
            date,
            time: time.trim().to_string(),
            seconds,
            place: raw.place,
            doping: DopingStatus::from_note(&note),
            note,
            url: raw.url.clone().unwrap_or_default(),
        })
    }
}

impl Datum for CyclistRecord {
    fn tooltip(&self) -> String {
        let mut text = format!("{}, {} ({})", self.name, self.time, self.year);
        if !self.note.is_empty() {
            text.push('\n');
            text.push_str(&self.note);
        }
        text
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.push(("data-xvalue", self.year.to_string()));
        attrs.push(("data-yvalue", self.time.clone()));
        attrs
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec::Vec;

    use super::*;
    use crate::dataset::{Dataset, DatasetKind};
    use crate::extract::extract_all;

    fn parse(json: &str) -> Vec<CyclistRaw> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn minutes_seconds() {
        assert_eq!(parse_minutes_seconds("36:50"), Some(2210.0));
        assert_eq!(parse_minutes_seconds("39:01"), Some(2341.0));
        assert_eq!(parse_minutes_seconds("39:61"), None);
        assert_eq!(parse_minutes_seconds("3950"), None);
    }

    #[test]
    fn doping_classification() {
        assert_eq!(DopingStatus::from_note(""), DopingStatus::Clean);
        assert_eq!(DopingStatus::from_note("Alleged drug use"), DopingStatus::Doping);
    }

    #[test]
    fn extracts_and_drops() {
        let raws = parse(
            r#"[
                {"Time": "36:50", "Place": 1, "Seconds": 2210, "Name": "Marco Pantani",
                 "Year": 1995, "Nationality": "ITA", "Doping": "Alleged drug use", "URL": "u"},
                {"Time": "37:15", "Name": "Miguel Indurain", "Year": "1992", "Doping": ""},
                {"Time": "bad", "Name": "Nobody", "Year": 2000},
                {"Time": "38:00", "Year": 2001}
            ]"#,
        );
        let out = extract_all(&CyclistExtractor, &raws);
        assert_eq!(out.dropped, 2);
        let [pantani, indurain] = &out.records[..] else {
            panic!("expected two records");
        };
        assert_eq!(pantani.doping, DopingStatus::Doping);
        assert_eq!(pantani.tooltip(), "Marco Pantani, 36:50 (1995)\nAlleged drug use");
        assert_eq!(indurain.year, 1992);
        assert_eq!(indurain.doping, DopingStatus::Clean);
        assert_eq!(indurain.tooltip(), "Miguel Indurain, 37:15 (1992)");
        assert_eq!(indurain.date, NaiveDate::from_ymd_opt(1992, 1, 1).unwrap());
    }

    #[test]
    fn mistyped_optional_fields_keep_the_rider() {
        let Dataset::Cyclists(raws) = Dataset::from_json(
            DatasetKind::Cyclists,
            br#"[
                {"Time": "36:50", "Place": 1, "Name": "Marco Pantani", "Year": 1995},
                {"Time": "36:55", "Place": "2", "Seconds": "fast", "Name": "Lance Armstrong",
                 "Year": 2004, "Nationality": 7, "Doping": false, "URL": null},
                {"Time": 2210, "Name": "Nobody", "Year": 2000},
                42
            ]"#,
        )
        .unwrap() else {
            panic!("expected cyclists");
        };
        assert_eq!(raws.len(), 4);
        assert_eq!(raws[1].place, None);
        let out = extract_all(&CyclistExtractor, &raws);
        assert_eq!(out.dropped, 2);
        let names: Vec<&str> = out.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Marco Pantani", "Lance Armstrong"]);
        assert_eq!(out.records[1].nationality, "");
        assert_eq!(out.records[1].doping, DopingStatus::Clean);
    }
}

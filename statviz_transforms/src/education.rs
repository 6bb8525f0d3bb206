// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! County education rates and their join onto county geometry.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use serde::Deserialize;
use statviz_core::{Attributes, Datum};

use crate::error::ExtractError;
use crate::extract::{FieldExtractor, InvalidRecord};
use crate::raw::{NumberOrString, lenient};
use crate::topology::Feature;

/// A county FIPS code.
///
/// Datasets spell these as numbers (`1001`) or zero-padded strings (`"01001"`); both parse to
/// the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fips(pub u32);

impl Fips {
    /// Parses a numeric or string id.
    pub fn parse(raw: &NumberOrString) -> Option<Self> {
        match raw {
            NumberOrString::Number(v) => {
                if !(0.0..=f64::from(u32::MAX)).contains(v) {
                    return None;
                }
                #[allow(clippy::cast_possible_truncation, reason = "range checked above")]
                let code = *v as u32;
                (f64::from(code) == *v).then_some(Self(code))
            }
            NumberOrString::Text(s) => {
                let s = s.trim();
                if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                s.parse().ok().map(Self)
            }
        }
    }
}

impl fmt::Display for Fips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05}", self.0)
    }
}

/// One entry of the education payload.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationRaw {
    /// County id.
    #[serde(default, deserialize_with = "lenient")]
    pub fips: Option<NumberOrString>,
    /// State postal code.
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>,
    /// County name.
    #[serde(rename = "area_name", default, deserialize_with = "lenient")]
    pub area_name: Option<String>,
    /// Share of adults with a bachelor's degree or higher, in percent.
    #[serde(default, deserialize_with = "lenient")]
    pub bachelors_or_higher: Option<NumberOrString>,
}

/// A validated education record.
#[derive(Clone, Debug, PartialEq)]
pub struct EducationRecord {
    /// County id.
    pub fips: Fips,
    /// State postal code, empty when absent.
    pub state: String,
    /// County name, empty when absent.
    pub area_name: String,
    /// Percentage with a bachelor's degree or higher.
    pub bachelors: f64,
}

/// Validates education entries.
#[derive(Clone, Copy, Debug, Default)]
pub struct EducationExtractor;

impl FieldExtractor for EducationExtractor {
    type Raw = EducationRaw;
    type Record = EducationRecord;
    const DATASET: &'static str = "education";

    fn extract(&self, raw: &EducationRaw) -> Result<EducationRecord, InvalidRecord> {
        let id = raw.fips.as_ref().ok_or_else(|| InvalidRecord::missing("fips"))?;
        let fips = Fips::parse(id).ok_or_else(|| InvalidRecord::invalid("fips", "not a county code"))?;
        let bachelors = raw
            .bachelors_or_higher
            .as_ref()
            .and_then(NumberOrString::as_f64)
            .ok_or_else(|| InvalidRecord::missing("bachelorsOrHigher"))?;
        Ok(EducationRecord {
            fips,
            state: raw.state.clone().unwrap_or_default(),
            area_name: raw.area_name.clone().unwrap_or_default(),
            bachelors,
        })
    }
}

/// What to do with a county that has no education record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingDataPolicy {
    /// Log a warning and keep the county with empty fields and no value.
    #[default]
    Tolerate,
    /// Fail the join.
    Fail,
}

/// The education values shown for one county.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CountyDatum {
    /// County id, if the feature had a usable one.
    pub fips: Option<Fips>,
    /// County name, empty when unknown.
    pub area_name: String,
    /// State postal code, empty when unknown.
    pub state: String,
    /// Percentage with a bachelor's degree or higher, if known.
    pub bachelors: Option<f64>,
}

impl CountyDatum {
    fn from_record(r: &EducationRecord) -> Self {
        Self {
            fips: Some(r.fips),
            area_name: r.area_name.clone(),
            state: r.state.clone(),
            bachelors: Some(r.bachelors),
        }
    }

    /// Full state name, if the postal code is known.
    pub fn state_name(&self) -> Option<&'static str> {
        state_name(&self.state)
    }
}

impl Datum for CountyDatum {
    fn tooltip(&self) -> String {
        let value = self
            .bachelors
            .map_or_else(|| String::from("no data"), |v| format!("{v}%"));
        let state = self.state_name().unwrap_or(&self.state);
        format!("{}, {}:  {value}", self.area_name, state)
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        if let Some(fips) = self.fips {
            attrs.push(("data-fips", fips.0.to_string()));
        }
        if let Some(v) = self.bachelors {
            attrs.push(("data-education", v.to_string()));
        }
        attrs
    }
}

/// A county feature with its education values.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinedFeature {
    /// The county geometry.
    pub feature: Feature,
    /// The matched values.
    pub datum: CountyDatum,
}

enum Slot {
    One(usize),
    Many,
}

/// Attaches an education record to every county feature by FIPS code.
///
/// A feature matching more than one record is always an error. A feature matching none (or
/// lacking an id) follows `policy`.
pub fn join_education(
    features: Vec<Feature>,
    records: &[EducationRecord],
    policy: MissingDataPolicy,
) -> Result<Vec<JoinedFeature>, ExtractError> {
    let mut index: HashMap<Fips, Slot> = HashMap::with_capacity(records.len());
    for (i, r) in records.iter().enumerate() {
        index
            .entry(r.fips)
            .and_modify(|slot| *slot = Slot::Many)
            .or_insert(Slot::One(i));
    }
    let mut missing = 0_usize;
    let mut out = Vec::with_capacity(features.len());
    for feature in features {
        let fips = feature.id.as_ref().and_then(Fips::parse);
        let datum = match fips.map(|f| (f, index.get(&f))) {
            Some((_, Some(Slot::One(i)))) => CountyDatum::from_record(&records[*i]),
            Some((f, Some(Slot::Many))) => return Err(ExtractError::DuplicateKey(f)),
            Some((f, None)) => {
                if policy == MissingDataPolicy::Fail {
                    return Err(ExtractError::MissingKey(f));
                }
                log::warn!("education: no record for county {f}");
                missing += 1;
                CountyDatum {
                    fips: Some(f),
                    ..CountyDatum::default()
                }
            }
            None => {
                if policy == MissingDataPolicy::Fail {
                    return Err(ExtractError::MissingId);
                }
                log::warn!("education: county feature without an id");
                missing += 1;
                CountyDatum::default()
            }
        };
        out.push(JoinedFeature { feature, datum });
    }
    log::debug!("education: joined {} counties, {missing} without data", out.len());
    Ok(out)
}

const STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "Washington, DC"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
    ("PR", "Puerto Rico"),
];

/// Full name for a US state postal code.
pub fn state_name(postal: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(postal))
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::extract::extract_all;

    fn feature(id: Option<NumberOrString>) -> Feature {
        Feature {
            id,
            rings: Vec::new(),
        }
    }

    fn record(fips: u32, name: &str, bachelors: f64) -> EducationRecord {
        EducationRecord {
            fips: Fips(fips),
            state: "AL".into(),
            area_name: name.into(),
            bachelors,
        }
    }

    #[test]
    fn fips_parses_numbers_and_padded_strings() {
        let a = Fips::parse(&NumberOrString::Number(1001.0));
        let b = Fips::parse(&NumberOrString::Text("01001".into()));
        assert_eq!(a, Some(Fips(1001)));
        assert_eq!(a, b);
        assert_eq!(Fips(1001).to_string(), "01001");
        assert_eq!(Fips::parse(&NumberOrString::Number(1.5)), None);
        assert_eq!(Fips::parse(&NumberOrString::Text("-12".into())), None);
    }

    #[test]
    fn mistyped_names_default_to_empty() {
        let raws: Vec<EducationRaw> = crate::raw::records_from_slice(
            br#"[
                {"fips": 1001, "state": 1, "area_name": ["Autauga"], "bachelorsOrHigher": 21.9},
                {"fips": true, "state": "AL", "bachelorsOrHigher": 30.0}
            ]"#,
        )
        .unwrap();
        let out = extract_all(&EducationExtractor, &raws);
        assert_eq!(out.dropped, 1);
        assert_eq!(out.records[0].fips, Fips(1001));
        assert_eq!(out.records[0].state, "");
        assert_eq!(out.records[0].area_name, "");
    }

    #[test]
    fn extracts_string_values() {
        let raws: Vec<EducationRaw> = serde_json::from_str(
            r#"[
                {"fips": 1001, "state": "AL", "area_name": "Autauga County", "bachelorsOrHigher": 21.9},
                {"fips": "01003", "state": "AL", "area_name": "Baldwin County", "bachelorsOrHigher": "28.6"},
                {"state": "AL", "area_name": "Nowhere", "bachelorsOrHigher": 1},
                {"fips": 1005, "area_name": "Barbour County"}
            ]"#,
        )
        .unwrap();
        let out = extract_all(&EducationExtractor, &raws);
        assert_eq!(out.dropped, 2);
        assert_eq!(out.records[1].fips, Fips(1003));
        assert_eq!(out.records[1].bachelors, 28.6);
    }

    #[test]
    fn join_matches_by_code() {
        let features = vec![
            feature(Some(NumberOrString::Text("01001".into()))),
            feature(Some(NumberOrString::Number(1003.0))),
        ];
        let records = [record(1003, "Baldwin County", 28.6), record(1001, "Autauga County", 21.9)];
        let joined = join_education(features, &records, MissingDataPolicy::Fail).unwrap();
        assert_eq!(joined[0].datum.area_name, "Autauga County");
        assert_eq!(joined[0].datum.tooltip(), "Autauga County, Alabama:  21.9%");
        assert_eq!(joined[1].datum.bachelors, Some(28.6));
    }

    #[test]
    fn duplicate_records_fail() {
        let features = vec![feature(Some(NumberOrString::Number(1001.0)))];
        let records = [record(1001, "A", 1.0), record(1001, "B", 2.0)];
        assert!(matches!(
            join_education(features, &records, MissingDataPolicy::Tolerate),
            Err(ExtractError::DuplicateKey(Fips(1001)))
        ));
    }

    #[test]
    fn missing_records_follow_policy() {
        let make = || vec![feature(Some(NumberOrString::Number(9999.0))), feature(None)];
        let records = [record(1001, "A", 1.0)];
        let joined = join_education(make(), &records, MissingDataPolicy::Tolerate).unwrap();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].datum.area_name, "");
        assert_eq!(joined[0].datum.bachelors, None);
        assert_eq!(joined[0].datum.tooltip(), ", :  no data");
        assert!(matches!(
            join_education(make(), &records, MissingDataPolicy::Fail),
            Err(ExtractError::MissingKey(Fips(9999)))
        ));
    }

    #[test]
    fn state_names() {
        assert_eq!(state_name("AL"), Some("Alabama"));
        assert_eq!(state_name("dc"), Some("Washington, DC"));
        assert_eq!(state_name("ZZ"), None);
    }
}

// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw dataset payloads.

extern crate alloc;

use alloc::vec::Vec;

use crate::cyclist::CyclistRaw;
use crate::education::EducationRaw;
use crate::error::ExtractError;
use crate::gdp::GdpRaw;
use crate::hierarchy::HierarchyRaw;
use crate::raw::records_from_slice;
use crate::temperature::TemperatureRaw;
use crate::topology::Topology;

/// The shape a payload is expected to have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// `{ data: [[date, value]] }`.
    Gdp,
    /// `[{ Time, Place, Seconds, Name, Year, Nationality, Doping, URL }]`.
    Cyclists,
    /// `{ baseTemperature, monthlyVariance: [{ year, month, variance }] }`.
    Temperature,
    /// `[{ fips, state, area_name, bachelorsOrHigher }]`.
    Education,
    /// A TopoJSON topology.
    Topology,
    /// `{ name, children: [...] }`.
    Hierarchy,
}

/// A parsed, not yet validated, payload.
#[derive(Clone, Debug)]
pub enum Dataset {
    /// GDP series.
    Gdp(GdpRaw),
    /// Cyclist times.
    Cyclists(Vec<CyclistRaw>),
    /// Monthly temperature variance.
    Temperature(TemperatureRaw),
    /// County education rates.
    Education(Vec<EducationRaw>),
    /// County and state geometry.
    Topology(Topology),
    /// A sales hierarchy.
    Hierarchy(HierarchyRaw),
}

impl Dataset {
    /// Parses `bytes` as a payload of `kind`.
    ///
    /// Fails when the bytes are not JSON or the top-level shape does not match. Record lists
    /// are read element by element with mistyped fields left empty; the extractors validate
    /// each record later.
    pub fn from_json(kind: DatasetKind, bytes: &[u8]) -> Result<Self, ExtractError> {
        Ok(match kind {
            DatasetKind::Gdp => Self::Gdp(serde_json::from_slice(bytes)?),
            DatasetKind::Cyclists => Self::Cyclists(records_from_slice(bytes)?),
            DatasetKind::Temperature => Self::Temperature(serde_json::from_slice(bytes)?),
            DatasetKind::Education => Self::Education(records_from_slice(bytes)?),
            DatasetKind::Topology => Self::Topology(serde_json::from_slice(bytes)?),
            DatasetKind::Hierarchy => Self::Hierarchy(serde_json::from_slice(bytes)?),
        })
    }

    /// The payload's kind.
    pub fn kind(&self) -> DatasetKind {
        match self {
            Self::Gdp(_) => DatasetKind::Gdp,
            Self::Cyclists(_) => DatasetKind::Cyclists,
            Self::Temperature(_) => DatasetKind::Temperature,
            Self::Education(_) => DatasetKind::Education,
            Self::Topology(_) => DatasetKind::Topology,
            Self::Hierarchy(_) => DatasetKind::Hierarchy,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn parses_by_kind() {
        let ds = Dataset::from_json(DatasetKind::Cyclists, br#"[{"Name": "A"}]"#).unwrap();
        assert_eq!(ds.kind(), DatasetKind::Cyclists);
        let Dataset::Cyclists(rows) = ds else {
            panic!("wrong variant");
        };
        assert_eq!(rows[0].name.as_deref(), Some("A"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Dataset::from_json(DatasetKind::Gdp, b"{\"data\": ["),
            Err(ExtractError::Json(_))
        ));
        assert!(matches!(
            Dataset::from_json(DatasetKind::Education, b"{\"fips\": 1}"),
            Err(ExtractError::Json(_))
        ));
    }
}

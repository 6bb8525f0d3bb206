// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field extraction for statviz datasets.
//!
//! This crate turns raw JSON payloads into validated records:
//! - [`Dataset::from_json`] parses a payload of a known [`DatasetKind`],
//! - per-chart extractors validate records once, dropping (and logging) invalid ones,
//! - [`join_education`] attaches county education rates to TopoJSON features,
//! - [`Hierarchy`] and [`TreemapLayout`] sum and tile hierarchical sales data.
//!
//! Derived fields (quarter labels, parsed dates, formatted amounts) are computed here, once.

#![no_std]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

mod cyclist;
mod dataset;
mod education;
mod error;
mod extract;
mod gdp;
mod hierarchy;
mod raw;
mod temperature;
mod topology;
mod treemap;

pub use cyclist::{
    CyclistExtractor, CyclistRaw, CyclistRecord, DopingStatus, parse_minutes_seconds,
};
pub use dataset::{Dataset, DatasetKind};
pub use education::{
    CountyDatum, EducationExtractor, EducationRaw, EducationRecord, Fips, JoinedFeature,
    MissingDataPolicy, join_education, state_name,
};
pub use error::ExtractError;
pub use extract::{Extracted, FieldExtractor, InvalidRecord, extract_all};
pub use gdp::{GdpExtractor, GdpRaw, GdpRecord, billions, quarter_label};
pub use hierarchy::{Hierarchy, HierarchyRaw, LeafDatum, Node, NodeId};
pub use raw::NumberOrString;
pub use temperature::{
    MonthlyVarianceRaw, TemperatureExtractor, TemperatureRaw, TemperatureRecord,
    TemperatureSeries,
};
pub use topology::{Feature, Geometry, MeshFilter, TopoTransform, Topology, bounds_of};
pub use treemap::{PHI, Tile, TreemapLayout};

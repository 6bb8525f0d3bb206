// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-chart scale building and assembly.
//!
//! Every chart follows the same three steps: extract typed records from the raw dataset,
//! `build_scales` from the records, then `assemble` records and scales into a
//! [`ChartDescriptor`](crate::ChartDescriptor). `chart` runs all three.

pub mod bar;
pub mod choropleth;
pub mod heat_map;
pub mod scatter;
pub mod tree_map;

use std::sync::Arc;

use kurbo::Point;
use statviz_charts::TitleSpec;
use statviz_core::{Datum, MarkId};

use crate::descriptor::ids;

/// Vertical position of the title baseline.
const TITLE_Y: f64 = 30.0;

fn chart_title(text: &str, description: Option<String>, width: f64) -> TitleSpec {
    let title = TitleSpec::new(MarkId::from_raw(ids::TITLE), text, Point::new(width / 2.0, TITLE_Y));
    match description {
        Some(d) => title.with_description(d),
        None => title,
    }
}

fn shared<T: Datum + Clone + 'static>(record: &T) -> Arc<dyn Datum> {
    Arc::new(record.clone())
}

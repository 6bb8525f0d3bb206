// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint-order conventions for chart marks.
//!
//! Views sort by `(z_index, MarkId)`, so these coarse layers keep geometry, guides and titles
//! stacked the same way in every chart.

/// Chart background fill.
pub const BACKGROUND: i32 = -100;

/// Data geometry: bars, dots, cells, counties, tiles.
pub const GEOMETRY: i32 = 0;
/// Overlays drawn on top of the geometry (state borders).
pub const GEOMETRY_OVERLAY: i32 = 10;
/// Labels drawn inside geometry (tile names).
pub const GEOMETRY_LABELS: i32 = 20;

/// Axis domain line and tick marks.
pub const AXIS_RULES: i32 = 30;
/// Axis tick labels.
pub const AXIS_LABELS: i32 = 40;
/// Axis titles.
pub const AXIS_TITLES: i32 = 50;

/// Legend swatches.
pub const LEGEND_SWATCHES: i32 = 60;
/// Legend labels and legend titles.
pub const LEGEND_LABELS: i32 = 70;
/// Chart title and description.
pub const TITLES: i32 = 80;

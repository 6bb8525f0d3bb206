// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart building blocks for `statviz_core`.
//!
//! - **Scales** map data values into pixels ([`ScaleLinear`], [`ScaleTime`], [`ScaleBand`]) or
//!   colors ([`ScaleSequential`], [`ScaleOrdinal`]).
//! - **Guides** (axes, legends, titles) generate `statviz_core::Mark`s.
//! - **Time** helpers convert calendar dates to epoch seconds and format tick labels.
//!
//! Text shaping is out of scope; text marks carry unshaped strings.

#![no_std]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

mod axis;
mod color;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod layout;
mod legend;
mod scale;
mod schemes;
mod time;
mod title;
pub mod z_order;

pub use axis::{AxisOrient, AxisScale, AxisSpec, AxisTick, TickFormatter};
pub use color::{ScaleOrdinal, ScaleSequential};
pub use format::format_number;
pub use layout::{Insets, PlotFrame, Size};
pub use legend::{ColorRampLegendSpec, LegendItem, LegendSwatchesSpec};
pub use scale::{
    ScaleBand, ScaleDomain, ScaleError, ScaleKind, ScaleLinear, ScaleRange, ScaleSpec,
    ScaleTime, continuous_domain, extent, nice_step, nice_ticks,
};
pub use schemes::{ColorScheme, decode_scheme, parse_hex_color};
pub use time::{
    SECONDS_PER_DAY, SECONDS_PER_YEAR, clock_ticks, date_to_seconds, format_minutes_seconds,
    format_year, month_name, seconds_to_date, year_start_seconds, year_ticks,
};
pub use title::TitleSpec;

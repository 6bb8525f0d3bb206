// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend mark generation.
//!
//! Two legend shapes cover the charts here:
//! - [`LegendSwatchesSpec`]: categorical swatches with labels, laid out top-to-bottom and then
//!   left-to-right into columns.
//! - [`ColorRampLegendSpec`]: a row of swatches sampled from a sequential color scale, with a tick
//!   axis driven by its own linear scale.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::color::palette::css;
use peniko::{Brush, Color};
use statviz_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::axis::{AxisSpec, TickFormatter};
use crate::color::ScaleSequential;
use crate::scale::{ScaleError, ScaleLinear};
use crate::z_order;

/// A legend row: label plus swatch paint.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    /// The label shown next to the swatch.
    pub label: String,
    /// The swatch fill paint.
    pub fill: Brush,
}

impl LegendItem {
    /// A solid-color swatch.
    pub fn solid(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            fill: Brush::Solid(color),
        }
    }
}

/// Categorical swatches with labels.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendSwatchesSpec {
    /// Stable-id base; swatches use `id_base + i`, labels `id_base + 1000 + i`.
    pub id_base: u64,
    /// Top-left corner of the first swatch.
    pub origin: Point,
    /// Swatch square size.
    pub swatch_size: f64,
    /// Items per column.
    pub rows_per_column: usize,
    /// Distance between row origins.
    pub row_height: f64,
    /// Distance between column origins.
    pub column_width: f64,
    /// Gap between swatch and label.
    pub label_dx: f64,
    /// Label font size.
    pub font_size: f64,
    /// Swatch opacity.
    pub opacity: f32,
    /// Label paint.
    pub text_fill: Brush,
    /// Items in display order.
    pub items: Vec<LegendItem>,
}

impl LegendSwatchesSpec {
    /// Creates a single-column legend at `origin`.
    pub fn new(id_base: u64, origin: Point, items: Vec<LegendItem>) -> Self {
        Self {
            id_base,
            origin,
            swatch_size: 10.0,
            rows_per_column: items.len().max(1),
            row_height: 20.0,
            column_width: 150.0,
            label_dx: 5.0,
            font_size: 12.0,
            opacity: 1.0,
            text_fill: css::BLACK.into(),
            items,
        }
    }

    /// Sets the swatch size.
    pub fn with_swatch_size(mut self, swatch_size: f64) -> Self {
        self.swatch_size = swatch_size;
        self
    }

    /// Wraps items into columns of `rows` items, `column_width` apart.
    pub fn with_columns(mut self, rows: usize, column_width: f64) -> Self {
        self.rows_per_column = rows.max(1);
        self.column_width = column_width;
        self
    }

    /// Sets the distance between rows.
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    /// Sets the swatch opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Sets the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// The swatch rectangle of item `i`.
    pub fn swatch_rect(&self, i: usize) -> Rect {
        let rows = self.rows_per_column.max(1);
        let x = self.origin.x + (i / rows) as f64 * self.column_width;
        let y = self.origin.y + (i % rows) as f64 * self.row_height;
        Rect::new(x, y, x + self.swatch_size, y + self.swatch_size)
    }

    /// Generates swatch and label marks.
    pub fn marks(&self) -> Vec<Mark> {
        let mut out = Vec::with_capacity(self.items.len() * 2);
        for (i, item) in self.items.iter().enumerate() {
            let rect = self.swatch_rect(i);
            out.push(
                Mark::builder(MarkId::for_row(self.id_base, i))
                    .rect(rect)
                    .fill(item.fill.clone())
                    .opacity(self.opacity)
                    .z_index(z_order::LEGEND_SWATCHES)
                    .class("legend-item")
                    .build(),
            );
            out.push(
                Mark::builder(MarkId::for_row(self.id_base + 1000, i))
                    .text(
                        (rect.x1 + self.label_dx, 0.5 * (rect.y0 + rect.y1)),
                        item.label.clone(),
                    )
                    .font_size(self.font_size)
                    .text_anchor(TextAnchor::Start)
                    .text_baseline(TextBaseline::Middle)
                    .fill(self.text_fill.clone())
                    .z_index(z_order::LEGEND_LABELS)
                    .class("legend-label")
                    .build(),
            );
        }
        out
    }
}

/// A horizontal color-ramp legend for a sequential scale.
///
/// The domain is split into `steps` equal slots; each swatch shows the color at the slot center.
/// Tick positions come from a linear scale built for the legend alone, so moving or resizing the
/// legend never touches the plot's color scale.
#[derive(Clone)]
pub struct ColorRampLegendSpec {
    /// Stable-id base.
    pub id_base: u64,
    /// The color scale the legend samples.
    pub scale: ScaleSequential,
    /// Top-left corner of the first swatch.
    pub origin: Point,
    /// Swatch square size.
    pub swatch_size: f64,
    /// Number of swatches.
    pub steps: usize,
    /// Explicit tick values (domain units); defaults to generated ticks.
    pub tick_values: Option<Vec<f64>>,
    /// Optional tick label formatter.
    pub tick_formatter: Option<TickFormatter>,
    /// Optional legend title, drawn under the axis.
    pub title: Option<String>,
}

impl core::fmt::Debug for ColorRampLegendSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ColorRampLegendSpec")
            .field("id_base", &self.id_base)
            .field("scale", &self.scale)
            .field("origin", &self.origin)
            .field("swatch_size", &self.swatch_size)
            .field("steps", &self.steps)
            .field("tick_values", &self.tick_values)
            .field("tick_formatter", &self.tick_formatter.is_some())
            .field("title", &self.title)
            .finish()
    }
}

impl ColorRampLegendSpec {
    /// Creates a ramp legend with one swatch per domain unit.
    pub fn new(id_base: u64, scale: ScaleSequential, origin: Point) -> Self {
        let (d0, d1) = scale.domain();
        let steps = {
            let span = (d1 - d0).abs().clamp(1.0, 100.0);
            #[allow(clippy::cast_possible_truncation, reason = "clamped to 1..=100")]
            {
                span as usize
            }
        };
        Self {
            id_base,
            scale,
            origin,
            swatch_size: 30.0,
            steps,
            tick_values: None,
            tick_formatter: None,
            title: None,
        }
    }

    /// Sets the number of swatches.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps.max(1);
        self
    }

    /// Sets the swatch size.
    pub fn with_swatch_size(mut self, swatch_size: f64) -> Self {
        self.swatch_size = swatch_size;
        self
    }

    /// Uses explicit tick values.
    pub fn with_tick_values(mut self, values: Vec<f64>) -> Self {
        self.tick_values = Some(values);
        self
    }

    /// Sets the tick label formatter.
    pub fn with_tick_formatter(
        mut self,
        f: impl Fn(f64, f64) -> String + Send + Sync + 'static,
    ) -> Self {
        self.tick_formatter = Some(alloc::sync::Arc::new(f));
        self
    }

    /// Sets the legend title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The domain value at the center of each swatch.
    pub fn sample_values(&self) -> Vec<f64> {
        let (d0, d1) = self.scale.domain();
        let width = (d1 - d0) / self.steps as f64;
        (0..self.steps)
            .map(|i| d0 + (i as f64 + 0.5) * width)
            .collect()
    }

    /// The linear scale that positions legend ticks.
    pub fn axis_scale(&self) -> Result<ScaleLinear, ScaleError> {
        let x0 = self.origin.x;
        ScaleLinear::new(
            self.scale.domain(),
            (x0, x0 + self.steps as f64 * self.swatch_size),
        )
    }

    /// Generates swatch, axis and title marks.
    pub fn marks(&self) -> Result<Vec<Mark>, ScaleError> {
        let mut out = Vec::new();
        let size = self.swatch_size;
        for (i, v) in self.sample_values().into_iter().enumerate() {
            let x = self.origin.x + i as f64 * size;
            out.push(
                Mark::builder(MarkId::for_row(self.id_base, i))
                    .rect(Rect::new(x, self.origin.y, x + size, self.origin.y + size))
                    .fill(self.scale.map(v))
                    .z_index(z_order::LEGEND_SWATCHES)
                    .class("legend-swatch")
                    .build(),
            );
        }

        let mut axis = AxisSpec::bottom(self.id_base + 2000, self.axis_scale()?, self.origin.y + size)
            .with_tick_count(self.steps);
        if let Some(values) = &self.tick_values {
            axis = axis.with_tick_values(values.clone());
        }
        axis.tick_formatter = self.tick_formatter.clone();
        out.extend(axis.marks());

        if let Some(title) = &self.title {
            let mid = self.origin.x + 0.5 * self.steps as f64 * size;
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + 9500))
                    .text((mid, self.origin.y + size + 40.0), title.clone())
                    .font_size(16.0)
                    .text_anchor(TextAnchor::Middle)
                    .text_baseline(TextBaseline::Middle)
                    .fill(css::BLACK)
                    .z_index(z_order::LEGEND_LABELS)
                    .class("legend-title")
                    .build(),
            );
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use statviz_core::Shape;

    use super::*;
    use crate::schemes::ColorScheme;

    #[test]
    fn swatches_wrap_into_columns() {
        let items = (0..7)
            .map(|i| LegendItem::solid(alloc::format!("item {i}"), css::BLACK))
            .collect();
        let spec = LegendSwatchesSpec::new(1, Point::new(10.0, 10.0), items)
            .with_swatch_size(30.0)
            .with_columns(3, 130.0)
            .with_row_height(40.0);
        assert_eq!(spec.swatch_rect(0), Rect::new(10.0, 10.0, 40.0, 40.0));
        assert_eq!(spec.swatch_rect(2).y0, 90.0);
        assert_eq!(spec.swatch_rect(3), Rect::new(140.0, 10.0, 170.0, 40.0));
        assert_eq!(spec.marks().len(), 14);
    }

    #[test]
    fn swatch_opacity_is_applied() {
        let spec = LegendSwatchesSpec::new(
            1,
            Point::ZERO,
            vec![LegendItem::solid("Wii", css::RED)],
        )
        .with_opacity(0.3);
        let marks = spec.marks();
        assert_eq!(marks[0].opacity, 0.3);
        assert_eq!(marks[1].opacity, 1.0);
    }

    #[test]
    fn ramp_samples_slot_centers() {
        let scale = ScaleSequential::with_scheme((-7.0, 7.0), ColorScheme::YlOrRd).unwrap();
        let legend = ColorRampLegendSpec::new(1, scale, Point::new(300.0, 700.0));
        let values = legend.sample_values();
        assert_eq!(values.len(), 14);
        assert_eq!(values[0], -6.5);
        assert_eq!(values[13], 6.5);
    }

    #[test]
    fn ramp_axis_scale_is_independent_of_plot_range() {
        let plot = ScaleSequential::with_scheme((0.0, 10.0), ColorScheme::Blues).unwrap();
        let legend = ColorRampLegendSpec::new(1, plot.clone(), Point::new(600.0, 40.0))
            .with_steps(10)
            .with_tick_formatter(|v, _| alloc::format!("{}", v * 10.0));
        let axis = legend.axis_scale().unwrap();
        assert_eq!(axis.range(), (600.0, 900.0));
        assert_eq!(axis.map(5.0), 750.0);
        assert_eq!(plot.domain(), legend.scale.domain());

        let marks = legend.marks().unwrap();
        let labels: Vec<&str> = marks
            .iter()
            .filter(|m| m.class == Some("tick-label"))
            .filter_map(|m| match &m.shape {
                Shape::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels.first(), Some(&"0"));
        assert_eq!(labels.last(), Some(&"100"));
    }
}

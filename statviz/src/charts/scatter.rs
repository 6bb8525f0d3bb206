// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cyclist climb times against race year.

use kurbo::Point;
use peniko::Color;
use statviz_charts::{
    AxisSpec, Insets, LegendItem, LegendSwatchesSpec, PlotFrame, ScaleTime, Size, date_to_seconds,
    extent, format_minutes_seconds, format_year, year_start_seconds, z_order,
};
use statviz_core::Mark;
use statviz_transforms::{CyclistExtractor, CyclistRaw, CyclistRecord, DopingStatus, extract_all};

use super::{chart_title, shared};
use crate::descriptor::{
    ChartDescriptor, ChartKind, GeometryDescriptor, LegendDescriptor, PrimitiveKind, ids,
};
use crate::error::{Error, Result};

/// Scatter plot settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterConfig {
    /// Canvas size.
    pub size: Size,
    /// Padding on every side of the plot.
    pub padding: f64,
    /// Point radius.
    pub radius: f64,
    /// Color of riders without allegations.
    pub clean: Color,
    /// Color of riders with allegations.
    pub doping: Color,
    /// Chart title.
    pub title: String,
    /// Line under the title.
    pub description: String,
    /// Legend label for riders with allegations.
    pub doping_label: String,
    /// Legend label for riders without allegations.
    pub clean_label: String,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            size: Size::new(900.0, 600.0),
            padding: 50.0,
            radius: 5.0,
            clean: Color::from_rgb8(0x66, 0x66, 0x00),
            doping: Color::from_rgb8(0x00, 0x66, 0x66),
            title: "Tour de France Doping".into(),
            description: "Alp de Huez Times (mm:ss)".into(),
            doping_label: "suspected doping".into(),
            clean_label: "presumed clean".into(),
        }
    }
}

impl ScatterConfig {
    /// Sets the canvas size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Sets the point radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the two category colors.
    pub fn with_colors(mut self, doping: Color, clean: Color) -> Self {
        self.doping = doping;
        self.clean = clean;
        self
    }

    fn color(&self, status: DopingStatus) -> Color {
        match status {
            DopingStatus::Doping => self.doping,
            DopingStatus::Clean => self.clean,
        }
    }
}

/// Scales of a scatter plot.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterScales {
    /// Canvas and plot rectangle.
    pub frame: PlotFrame,
    /// Race year (epoch seconds of January 1st) to x.
    pub x: ScaleTime,
    /// Climb time in seconds to y; faster times sit higher.
    pub y: ScaleTime,
}

/// Builds the scatter plot scales.
///
/// The x domain is padded by one year on each side.
pub fn build_scales(records: &[CyclistRecord], config: &ScatterConfig) -> Result<ScatterScales> {
    let first = records.iter().map(|r| r.year).min().ok_or(Error::Empty("cycling"))?;
    let last = records.iter().map(|r| r.year).max().ok_or(Error::Empty("cycling"))?;
    let (fastest, slowest) =
        extent(records.iter().map(|r| r.seconds)).ok_or(Error::Empty("cycling"))?;
    let start = year_start_seconds(first - 1).ok_or(Error::Empty("cycling"))?;
    let end = year_start_seconds(last + 1).ok_or(Error::Empty("cycling"))?;

    let frame = PlotFrame::new(config.size, Insets::uniform(config.padding));
    let x = ScaleTime::new((start, end), frame.x_range())?;
    let y = ScaleTime::new((fastest, slowest), frame.y_range())?;
    Ok(ScatterScales { frame, x, y })
}

/// Assembles points, axes, legend and title.
pub fn assemble(
    records: &[CyclistRecord],
    scales: &ScatterScales,
    config: &ScatterConfig,
) -> ChartDescriptor {
    let ScatterScales { frame, x, y } = scales;
    let mut geometry = GeometryDescriptor::default();
    for (i, r) in records.iter().enumerate() {
        let secs = date_to_seconds(r.date);
        geometry.push(
            PrimitiveKind::Circle,
            Mark::builder(ids::row(ids::GEOMETRY, i))
                .circle(Point::new(x.map(secs), y.map(r.seconds)), config.radius)
                .fill(config.color(r.doping))
                .z_index(z_order::GEOMETRY)
                .class("dot")
                .datum(shared(r))
                .build(),
        );
    }

    let x_axis = AxisSpec::bottom(ids::X_AXIS, *x, frame.plot.y1)
        .with_tick_formatter(|v, _| format_year(v));
    let y_axis = AxisSpec::left(ids::Y_AXIS, *y, frame.plot.x0)
        .with_tick_formatter(|v, _| format_minutes_seconds(v));

    let legend = LegendSwatchesSpec::new(
        ids::LEGEND,
        Point::new(frame.plot.x1 - 150.0, frame.plot.y0 + 100.0),
        vec![
            LegendItem::solid(config.doping_label.clone(), config.doping),
            LegendItem::solid(config.clean_label.clone(), config.clean),
        ],
    )
    .with_swatch_size(18.0)
    .with_row_height(24.0);

    let view = frame.view;
    ChartDescriptor {
        kind: ChartKind::Scatter,
        size: Size::new(view.width(), view.height()),
        geometry,
        axes: vec![x_axis, y_axis],
        legend: Some(LegendDescriptor::Swatches(legend)),
        title: chart_title(&config.title, Some(config.description.clone()), view.width()),
        scales: vec![x.spec(), y.spec()],
    }
}

/// Extracts, scales and assembles a cyclist payload.
pub fn chart(raw: &[CyclistRaw], config: &ScatterConfig) -> Result<ChartDescriptor> {
    let extracted = extract_all(&CyclistExtractor, raw);
    let scales = build_scales(&extracted.records, config)?;
    log::debug!(
        "scatter: {} points ({} dropped)",
        extracted.records.len(),
        extracted.dropped
    );
    Ok(assemble(&extracted.records, &scales, config))
}

#[cfg(test)]
mod tests {
    use peniko::Brush;
    use statviz_core::Shape;

    use super::*;

    fn riders() -> Vec<CyclistRaw> {
        serde_json::from_str(
            r#"[
                {"Time": "36:50", "Place": 1, "Seconds": 2210, "Name": "Marco Pantani",
                 "Year": 1995, "Nationality": "ITA", "Doping": "Alleged drug use during 1995",
                 "URL": "https://en.wikipedia.org/wiki/Marco_Pantani#Alleged_drug_use"},
                {"Time": "39:23", "Place": 35, "Seconds": 2363, "Name": "Lance Armstrong",
                 "Year": 2001, "Nationality": "USA", "Doping": "", "URL": ""},
                {"Time": "soon", "Name": "Nobody", "Year": 2000}
            ]"#,
        )
        .unwrap()
    }

    fn center(mark: &Mark) -> Point {
        match &mark.shape {
            Shape::Circle(c) => c.center,
            other => panic!("expected a circle, got {other:?}"),
        }
    }

    #[test]
    fn year_domain_is_padded() {
        let records = extract_all(&CyclistExtractor, &riders()).records;
        let scales = build_scales(&records, &ScatterConfig::default()).unwrap();
        assert_eq!(
            scales.x.domain(),
            (year_start_seconds(1994).unwrap(), year_start_seconds(2002).unwrap())
        );
        assert_eq!(scales.y.domain(), (2210.0, 2363.0));
    }

    #[test]
    fn fastest_rider_sits_at_the_top() {
        let chart = chart(&riders(), &ScatterConfig::default()).unwrap();
        assert_eq!(chart.geometry.len(), 2);
        let fast = &chart.geometry.primitives[0].mark;
        let slow = &chart.geometry.primitives[1].mark;
        assert_eq!(center(fast).y, 50.0);
        assert_eq!(center(slow).y, 550.0);
        assert!(center(fast).x < center(slow).x);
    }

    #[test]
    fn colors_follow_allegations() {
        let config = ScatterConfig::default();
        let chart = chart(&riders(), &config).unwrap();
        let fills: Vec<_> = chart.geometry.primitives.iter().map(|p| p.mark.fill.clone()).collect();
        assert_eq!(fills[0], Brush::from(config.doping));
        assert_eq!(fills[1], Brush::from(config.clean));
        assert!(matches!(chart.legend, Some(LegendDescriptor::Swatches(_))));
        let tooltip = chart.geometry.primitives[0].datum().unwrap().tooltip();
        assert!(tooltip.starts_with("Marco Pantani"));
    }

    #[test]
    fn no_valid_riders_is_an_error() {
        let raw: Vec<CyclistRaw> = serde_json::from_str(r#"[{"Name": "x"}]"#).unwrap();
        assert!(matches!(
            chart(&raw, &ScatterConfig::default()),
            Err(Error::Empty("cycling"))
        ));
    }
}

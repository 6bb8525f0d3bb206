// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monthly temperature variance heat map.

use kurbo::{Point, Rect};
use statviz_charts::{
    AxisSpec, ColorRampLegendSpec, ColorScheme, Insets, PlotFrame, ScaleBand, ScaleSequential,
    ScaleTime, Size, format_number, format_year, month_name, year_start_seconds, z_order,
};
use statviz_core::Mark;
use statviz_transforms::{TemperatureRaw, TemperatureSeries};

use super::{chart_title, shared};
use crate::descriptor::{
    ChartDescriptor, ChartKind, GeometryDescriptor, LegendDescriptor, PrimitiveKind, ids,
};
use crate::error::{Error, Result};

const MONTHS: usize = 12;

/// Heat map settings.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatMapConfig {
    /// Size of the plot canvas, without the legend band.
    pub size: Size,
    /// Space around the plot.
    pub insets: Insets,
    /// Height of the legend band added below the canvas.
    pub legend_band: f64,
    /// Cell color scheme.
    pub scheme: ColorScheme,
    /// Variance range covered by the color ramp.
    pub variance_domain: (f64, f64),
    /// Legend swatch size.
    pub swatch_size: f64,
    /// Axis label size.
    pub font_size: f64,
    /// Years between x ticks.
    pub years_per_tick: usize,
    /// Chart title.
    pub title: String,
    /// Legend title.
    pub legend_title: String,
}

impl Default for HeatMapConfig {
    fn default() -> Self {
        Self {
            size: Size::new(1500.0, 800.0),
            insets: Insets::new(80.0, 80.0, 80.0, 120.0),
            legend_band: 120.0,
            scheme: ColorScheme::YlOrRd,
            variance_domain: (-7.0, 7.0),
            swatch_size: 30.0,
            font_size: 16.0,
            years_per_tick: 10,
            title: "Monthly Average Temperatures".into(),
            legend_title: "Variance (Celsius)".into(),
        }
    }
}

impl HeatMapConfig {
    /// Sets the color scheme.
    pub fn with_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the variance range of the color ramp.
    pub fn with_variance_domain(mut self, lo: f64, hi: f64) -> Self {
        self.variance_domain = (lo, hi);
        self
    }

    /// Sets the canvas size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }
}

/// Scales of a heat map.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatMapScales {
    /// Plot canvas and rectangle (the legend band lies below `frame.view`).
    pub frame: PlotFrame,
    /// Year start (epoch seconds) to x.
    pub x: ScaleTime,
    /// Month index to a row.
    pub y: ScaleBand,
    /// Variance to color.
    pub color: ScaleSequential,
    /// First and last year.
    pub years: (i32, i32),
}

/// Builds the heat map scales.
///
/// The x domain runs from the start of the first year to the end of the last one, so every year
/// owns a column of equal width.
pub fn build_scales(series: &TemperatureSeries, config: &HeatMapConfig) -> Result<HeatMapScales> {
    let (first, last) = series.year_extent().ok_or(Error::Empty("temperature"))?;
    let start = year_start_seconds(first).ok_or(Error::Empty("temperature"))?;
    let end = last
        .checked_add(1)
        .and_then(year_start_seconds)
        .ok_or(Error::Empty("temperature"))?;

    let frame = PlotFrame::new(config.size, config.insets);
    let x = ScaleTime::new((start, end), frame.x_range())?;
    let y = ScaleBand::new(frame.y_range(), MONTHS)?;
    let color = ScaleSequential::with_scheme(config.variance_domain, config.scheme)?;
    Ok(HeatMapScales {
        frame,
        x,
        y,
        color,
        years: (first, last),
    })
}

/// Assembles cells, axes, the color-ramp legend and the title.
pub fn assemble(
    series: &TemperatureSeries,
    scales: &HeatMapScales,
    config: &HeatMapConfig,
) -> ChartDescriptor {
    let HeatMapScales {
        frame,
        x,
        y,
        color,
        years,
    } = scales;
    let mut geometry = GeometryDescriptor::default();
    for (i, r) in series.records.iter().enumerate() {
        let next = r.year.checked_add(1).and_then(year_start_seconds);
        let (Some(start), Some(end)) = (year_start_seconds(r.year), next) else {
            continue;
        };
        let row = r.month as usize;
        let y0 = y.x(row);
        geometry.push(
            PrimitiveKind::Rect,
            Mark::builder(ids::row(ids::GEOMETRY, i))
                .rect(Rect::new(x.map(start), y0, x.map(end), y0 + y.band_width()))
                .fill(color.map(r.variance))
                .z_index(z_order::GEOMETRY)
                .class("cell")
                .datum(shared(r))
                .build(),
        );
    }

    let year_span = usize::try_from(i64::from(years.1) - i64::from(years.0) + 1).unwrap_or(1);
    let x_axis = AxisSpec::bottom(ids::X_AXIS, *x, frame.plot.y1)
        .with_tick_count((year_span / config.years_per_tick.max(1)).max(1))
        .with_tick_formatter(|v, _| format_year(v))
        .with_font_size(config.font_size);
    let y_axis = AxisSpec::left(ids::Y_AXIS, *y, frame.plot.x0)
        .with_tick_formatter(|v, _| {
            #[allow(clippy::cast_possible_truncation, reason = "band ticks are month indices")]
            let month = v as usize;
            month_name(month).unwrap_or_default().to_string()
        })
        .with_font_size(config.font_size);

    let view = frame.view;
    let mut legend = ColorRampLegendSpec::new(ids::LEGEND, color.clone(), Point::ZERO)
        .with_swatch_size(config.swatch_size)
        .with_tick_formatter(format_number)
        .with_title(config.legend_title.clone());
    let ramp_width = legend.steps as f64 * legend.swatch_size;
    legend.origin = Point::new((view.width() - ramp_width) / 2.0, view.y1 + 20.0);

    let description = format!("Monthly Global Land Temperature, {}-{}", years.0, years.1);
    ChartDescriptor {
        kind: ChartKind::HeatMap,
        size: Size::new(view.width(), view.height() + config.legend_band),
        geometry,
        axes: vec![x_axis, y_axis],
        legend: Some(LegendDescriptor::Ramp(legend)),
        title: chart_title(&config.title, Some(description), view.width()),
        scales: vec![x.spec(), y.spec(), color.spec()],
    }
}

/// Extracts, scales and assembles a temperature payload.
pub fn chart(raw: &TemperatureRaw, config: &HeatMapConfig) -> Result<ChartDescriptor> {
    let series = TemperatureSeries::extract(raw)?;
    let scales = build_scales(&series, config)?;
    log::debug!(
        "heat map: {} cells over {} years ({} dropped)",
        series.records.len(),
        series.year_count(),
        series.dropped
    );
    Ok(assemble(&series, &scales, config))
}

#[cfg(test)]
mod tests {
    use peniko::Brush;

    use super::*;

    fn temperatures() -> TemperatureRaw {
        serde_json::from_str(
            r#"{
                "baseTemperature": 8.66,
                "monthlyVariance": [
                    {"year": 1753, "month": 1, "variance": -1.366},
                    {"year": 1753, "month": 2, "variance": 0.0},
                    {"year": 1754, "month": 12, "variance": 7.0},
                    {"year": 1754, "month": 13, "variance": 1.0}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn years_get_equal_columns() {
        let series = TemperatureSeries::extract(&temperatures()).unwrap();
        let scales = build_scales(&series, &HeatMapConfig::default()).unwrap();
        assert_eq!(scales.years, (1753, 1754));
        let chart = assemble(&series, &scales, &HeatMapConfig::default());
        assert_eq!(chart.geometry.len(), 3);
        let first = chart.geometry.primitives[0].mark.bounds();
        let last = chart.geometry.primitives[2].mark.bounds();
        assert!((first.x0 - 120.0).abs() < 1e-9);
        assert!((last.x1 - 1420.0).abs() < 1e-9);
        assert!((first.width() - last.width()).abs() < 1.0);
    }

    #[test]
    fn months_stack_top_to_bottom() {
        let chart = chart(&temperatures(), &HeatMapConfig::default()).unwrap();
        let january = chart.geometry.primitives[0].mark.bounds();
        let december = chart.geometry.primitives[2].mark.bounds();
        assert!((january.y0 - 80.0).abs() < 1e-9);
        assert!((december.y1 - 720.0).abs() < 1e-9);
        let y_labels: Vec<String> = chart.axes[1].ticks().into_iter().map(|t| t.label).collect();
        assert_eq!(y_labels.first().map(String::as_str), Some("January"));
        assert_eq!(y_labels.last().map(String::as_str), Some("December"));
    }

    #[test]
    fn extreme_years_are_dropped_not_overflowed() {
        let raw: TemperatureRaw = serde_json::from_str(
            r#"{
                "baseTemperature": 8.66,
                "monthlyVariance": [
                    {"year": 1753, "month": 1, "variance": -1.366},
                    {"year": 2147483647, "month": 1, "variance": 0.5},
                    {"year": -2147483648, "month": 2, "variance": 0.5}
                ]
            }"#,
        )
        .unwrap();
        let chart = chart(&raw, &HeatMapConfig::default()).unwrap();
        assert_eq!(chart.geometry.len(), 1);
        assert_eq!(
            chart.title.description.as_deref(),
            Some("Monthly Global Land Temperature, 1753-1753")
        );
        let cell = chart.geometry.primitives[0].mark.bounds();
        assert!((cell.x0 - 120.0).abs() < 1e-9);
        assert!((cell.x1 - 1420.0).abs() < 1e-9);
    }

    #[test]
    fn unrepresentable_years_do_not_panic() {
        let record = |year| statviz_transforms::TemperatureRecord {
            year,
            month: 0,
            variance: 0.0,
            temperature: 8.66,
        };
        let config = HeatMapConfig::default();
        let mut series = TemperatureSeries {
            base_temperature: 8.66,
            records: vec![record(1753), record(i32::MAX)],
            dropped: 0,
        };
        assert!(build_scales(&series, &config).is_err());

        series.records.truncate(1);
        let scales = build_scales(&series, &config).unwrap();
        series.records.push(record(i32::MAX));
        let chart = assemble(&series, &scales, &config);
        assert_eq!(chart.geometry.len(), 1);
    }

    #[test]
    fn zero_variance_takes_the_ramp_midpoint() {
        let config = HeatMapConfig::default();
        let chart = chart(&temperatures(), &config).unwrap();
        let ramp = ScaleSequential::with_scheme(config.variance_domain, config.scheme).unwrap();
        assert_eq!(
            chart.geometry.primitives[1].mark.fill,
            Brush::from(ramp.interpolate(0.5))
        );
        assert_eq!(chart.size, Size::new(1500.0, 920.0));
        let Some(LegendDescriptor::Ramp(legend)) = &chart.legend else {
            panic!("heat map has a ramp legend");
        };
        assert_eq!(legend.steps, 14);
        assert_eq!(legend.origin, Point::new(540.0, 820.0));
        assert_eq!(
            chart.title.description.as_deref(),
            Some("Monthly Global Land Temperature, 1753-1754")
        );
    }
}

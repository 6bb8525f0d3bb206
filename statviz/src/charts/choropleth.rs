// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! County education choropleth.
//!
//! Two payloads feed this chart: county education records and a topology holding county
//! polygons and state borders. Counties are joined to records by FIPS code before any scale is
//! built.

use std::sync::Arc;

use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use statviz_charts::{
    ColorRampLegendSpec, ColorScheme, Insets, PlotFrame, ScaleSequential, Size, format_number,
    z_order,
};
use statviz_core::{Mark, MarkId};
use statviz_transforms::{
    EducationExtractor, EducationRaw, JoinedFeature, MeshFilter, MissingDataPolicy, Topology,
    bounds_of, extract_all, join_education,
};

use super::{chart_title, shared};
use crate::descriptor::{
    ChartDescriptor, ChartKind, GeometryDescriptor, LegendDescriptor, PrimitiveKind, ids,
};
use crate::error::{Error, Result};
use crate::projection::{Fit, Identity, Projection, lines_to_path, rings_to_path};

/// How topology coordinates reach the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MapProjection {
    /// Coordinates are already in canvas units; shift them by `offset`.
    Identity {
        /// Translation applied to every point.
        offset: Vec2,
    },
    /// Scale the county bounds into the plot rectangle.
    Fit {
        /// Whether larger y values should end up higher (latitude-style input).
        flip_y: bool,
    },
}

/// Choropleth settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoroplethConfig {
    /// Canvas size.
    pub size: Size,
    /// Padding around the map.
    pub padding: f64,
    /// Coordinate handling.
    pub projection: MapProjection,
    /// County color scheme.
    pub scheme: ColorScheme,
    /// Color domain, in percent divided by `value_divisor`.
    pub domain: (f64, f64),
    /// Divisor applied to percentages before coloring.
    pub value_divisor: f64,
    /// Fill for counties without a value.
    pub missing_fill: Color,
    /// County outline and state border color.
    pub stroke: Color,
    /// How counties without a record are treated.
    pub policy: MissingDataPolicy,
    /// Topology object holding county polygons.
    pub counties_object: String,
    /// Topology object holding state polygons.
    pub states_object: String,
    /// Top-left corner of the legend.
    pub legend_origin: Point,
    /// Legend swatch size.
    pub swatch_size: f64,
    /// Chart title.
    pub title: String,
    /// Line under the title.
    pub description: String,
    /// Legend title.
    pub legend_title: String,
}

impl Default for ChoroplethConfig {
    fn default() -> Self {
        Self {
            size: Size::new(1100.0, 900.0),
            padding: 50.0,
            projection: MapProjection::Identity {
                offset: Vec2::new(50.0, 50.0),
            },
            scheme: ColorScheme::Blues,
            domain: (0.0, 10.0),
            value_divisor: 10.0,
            missing_fill: Color::from_rgb8(0xcc, 0xcc, 0xcc),
            stroke: Color::WHITE,
            policy: MissingDataPolicy::default(),
            counties_object: "counties".into(),
            states_object: "states".into(),
            legend_origin: Point::new(660.0, 680.0),
            swatch_size: 30.0,
            title: "US Education Levels".into(),
            description: "College Education Percentage by County".into(),
            legend_title: "Earned Bachelor's (Percent)".into(),
        }
    }
}

impl ChoroplethConfig {
    /// Sets the projection.
    pub fn with_projection(mut self, projection: MapProjection) -> Self {
        self.projection = projection;
        self
    }

    /// Sets the missing-record policy.
    pub fn with_policy(mut self, policy: MissingDataPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the color scheme.
    pub fn with_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = scheme;
        self
    }
}

/// Joined counties and state borders.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoroplethData {
    /// Counties with their education values, in topology order.
    pub counties: Vec<JoinedFeature>,
    /// Borders between different states.
    pub borders: Vec<Vec<Point>>,
}

impl ChoroplethData {
    /// Validates the education records and joins them onto the county features.
    pub fn extract(
        education: &[EducationRaw],
        topology: &Topology,
        config: &ChoroplethConfig,
    ) -> Result<Self> {
        let records = extract_all(&EducationExtractor, education);
        let features = topology.features(&config.counties_object)?;
        let counties = join_education(features, &records.records, config.policy)?;
        let borders = topology.mesh(&config.states_object, MeshFilter::Interior)?;
        Ok(Self { counties, borders })
    }

    fn bounds(&self) -> Option<Rect> {
        bounds_of(self.counties.iter().flat_map(|c| c.feature.rings.iter().flatten()))
    }
}

/// Scales of a choropleth.
#[derive(Clone, Debug)]
pub struct ChoroplethScales {
    /// Canvas and map rectangle.
    pub frame: PlotFrame,
    /// Scaled value to color.
    pub color: ScaleSequential,
    /// Topology coordinates to canvas.
    pub projection: Arc<dyn Projection>,
}

/// Builds the color scale and the projection.
pub fn build_scales(data: &ChoroplethData, config: &ChoroplethConfig) -> Result<ChoroplethScales> {
    if data.counties.is_empty() {
        return Err(Error::Empty("education"));
    }
    let frame = PlotFrame::new(config.size, Insets::uniform(config.padding));
    let color = ScaleSequential::with_scheme(config.domain, config.scheme)?;
    let projection: Arc<dyn Projection> = match config.projection {
        MapProjection::Identity { offset } => Arc::new(Identity::new(offset)),
        MapProjection::Fit { flip_y } => {
            let bounds = data.bounds().ok_or(Error::Empty("education"))?;
            Arc::new(Fit::new(bounds, frame.plot, flip_y))
        }
    };
    Ok(ChoroplethScales {
        frame,
        color,
        projection,
    })
}

/// Assembles county paths, state borders, the legend and the title.
pub fn assemble(
    data: &ChoroplethData,
    scales: &ChoroplethScales,
    config: &ChoroplethConfig,
) -> ChartDescriptor {
    let projection = scales.projection.as_ref();
    let mut geometry = GeometryDescriptor::default();
    for (i, county) in data.counties.iter().enumerate() {
        let fill = county
            .datum
            .bachelors
            .map_or(config.missing_fill, |v| scales.color.map(v / config.value_divisor));
        geometry.push(
            PrimitiveKind::Path,
            Mark::builder(ids::row(ids::GEOMETRY, i))
                .path(rings_to_path(&county.feature.rings, projection))
                .fill(fill)
                .stroke(config.stroke, 0.5)
                .z_index(z_order::GEOMETRY)
                .class("county")
                .datum(shared(&county.datum))
                .build(),
        );
    }
    if !data.borders.is_empty() {
        geometry.push(
            PrimitiveKind::Path,
            Mark::builder(MarkId::from_raw(ids::OVERLAY))
                .path(lines_to_path(&data.borders, projection))
                .fill(Color::TRANSPARENT)
                .stroke(config.stroke, 1.0)
                .z_index(z_order::GEOMETRY_OVERLAY)
                .class("states")
                .build(),
        );
    }

    let divisor = config.value_divisor;
    let legend = ColorRampLegendSpec::new(ids::LEGEND, scales.color.clone(), config.legend_origin)
        .with_swatch_size(config.swatch_size)
        .with_tick_formatter(move |v, step| format_number(v * divisor, step * divisor))
        .with_title(config.legend_title.clone());

    let view = scales.frame.view;
    ChartDescriptor {
        kind: ChartKind::Choropleth,
        size: Size::new(view.width(), view.height()),
        geometry,
        axes: Vec::new(),
        legend: Some(LegendDescriptor::Ramp(legend)),
        title: chart_title(&config.title, Some(config.description.clone()), view.width()),
        scales: vec![scales.color.spec()],
    }
}

/// Joins, scales and assembles the two choropleth payloads.
pub fn chart(
    education: &[EducationRaw],
    topology: &Topology,
    config: &ChoroplethConfig,
) -> Result<ChartDescriptor> {
    let data = ChoroplethData::extract(education, topology, config)?;
    let scales = build_scales(&data, config)?;
    log::debug!(
        "choropleth: {} counties, {} border lines",
        data.counties.len(),
        data.borders.len()
    );
    Ok(assemble(&data, &scales, config))
}

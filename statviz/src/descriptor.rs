// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend-agnostic chart output.

use std::sync::Arc;

use statviz_charts::{
    AxisSpec, ColorRampLegendSpec, LegendSwatchesSpec, ScaleError, ScaleSpec, Size, TitleSpec,
};
use statviz_core::{Datum, Mark};

/// Stable mark-id bases. Guides reserve id ranges above their base, so bases are spaced apart.
///
/// Data-bound marks get one row band each, [`ROW_SPAN`](ids::ROW_SPAN) ids wide, above the guides.
pub(crate) mod ids {
    use statviz_core::MarkId;

    pub(crate) const TITLE: u64 = 1;
    pub(crate) const X_AXIS: u64 = 100_000;
    pub(crate) const Y_AXIS: u64 = 200_000;
    pub(crate) const LEGEND: u64 = 300_000;

    /// Width of a row band.
    pub(crate) const ROW_SPAN: u64 = 1 << 32;
    pub(crate) const GEOMETRY: u64 = ROW_SPAN;
    pub(crate) const LABELS: u64 = 2 * ROW_SPAN;
    pub(crate) const OVERLAY: u64 = 3 * ROW_SPAN;

    /// Id of `row` in the band starting at `base`.
    ///
    /// Rows must stay inside the band, otherwise ids would run into the next one.
    pub(crate) fn row(base: u64, row: usize) -> MarkId {
        debug_assert!(
            u64::try_from(row).is_ok_and(|r| r < ROW_SPAN),
            "row {row} overflows its mark-id band"
        );
        MarkId::for_row(base, row)
    }
}

/// Which hierarchical dataset a tree map shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeMapDataset {
    /// Kickstarter pledges by category.
    Kickstarter,
    /// Movie sales by genre.
    Movies,
    /// Video game sales by console.
    VideoGames,
}

impl TreeMapDataset {
    /// All tree-map datasets.
    pub const ALL: [Self; 3] = [Self::Kickstarter, Self::Movies, Self::VideoGames];

    /// Chart title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Kickstarter => "Kickstarter Pledges",
            Self::Movies => "Movie Sales",
            Self::VideoGames => "Top 100 Best Selling Video Game",
        }
    }

    /// Chart description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Kickstarter => "Top 100 Most Pledged Kickstarter Campaigns Grouped By Category",
            Self::Movies => "Top 100 Highest Grossing Movies Grouped By Genre",
            Self::VideoGames => "Video Game Sales (millions) by Console",
        }
    }
}

/// The chart types of the gallery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Quarterly GDP bars.
    Bar,
    /// Cyclist times scatter plot.
    Scatter,
    /// Monthly temperature heat map.
    HeatMap,
    /// County education choropleth.
    Choropleth,
    /// Sales tree map.
    TreeMap(TreeMapDataset),
}

impl ChartKind {
    /// Short dataset name used in loading messages.
    pub fn data_name(self) -> &'static str {
        match self {
            Self::Bar => "GDP",
            Self::Scatter => "cycling",
            Self::HeatMap => "temperature",
            Self::Choropleth => "education",
            Self::TreeMap(TreeMapDataset::Kickstarter) => "Kickstarter",
            Self::TreeMap(TreeMapDataset::Movies) => "movie",
            Self::TreeMap(TreeMapDataset::VideoGames) => "video game",
        }
    }
}

/// What a drawable primitive represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// A bar or heat-map cell.
    Rect,
    /// A scatter point.
    Circle,
    /// A map region or border.
    Path,
    /// A tree-map tile.
    Tile,
    /// A data label.
    Label,
}

/// One data-bound drawable.
#[derive(Clone, Debug)]
pub struct Primitive {
    /// What the primitive represents.
    pub kind: PrimitiveKind,
    /// Positioned, filled mark; its datum is the source record.
    pub mark: Mark,
}

impl Primitive {
    /// Wraps a mark.
    pub fn new(kind: PrimitiveKind, mark: Mark) -> Self {
        Self { kind, mark }
    }

    /// The record behind this primitive.
    pub fn datum(&self) -> Option<&Arc<dyn Datum>> {
        self.mark.datum.as_ref()
    }
}

/// Data-bound primitives of one chart.
#[derive(Clone, Debug, Default)]
pub struct GeometryDescriptor {
    /// Primitives in data order.
    pub primitives: Vec<Primitive>,
}

impl GeometryDescriptor {
    /// Appends a primitive.
    pub fn push(&mut self, kind: PrimitiveKind, mark: Mark) {
        self.primitives.push(Primitive::new(kind, mark));
    }

    /// Primitives of one kind.
    pub fn of_kind(&self, kind: PrimitiveKind) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(move |p| p.kind == kind)
    }

    /// Number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Whether there are no primitives.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// An axis: positional scale, ticks and formatter.
pub type AxisDescriptor = AxisSpec;

/// A chart legend.
#[derive(Clone, Debug)]
pub enum LegendDescriptor {
    /// Discrete swatches with labels.
    Swatches(LegendSwatchesSpec),
    /// Sampled color ramp with its own axis.
    Ramp(ColorRampLegendSpec),
}

impl LegendDescriptor {
    /// Legend marks.
    pub fn marks(&self) -> Result<Vec<Mark>, ScaleError> {
        match self {
            Self::Swatches(spec) => Ok(spec.marks()),
            Self::Ramp(spec) => spec.marks(),
        }
    }
}

/// Everything a view needs to draw one chart.
#[derive(Clone, Debug)]
pub struct ChartDescriptor {
    /// Chart type.
    pub kind: ChartKind,
    /// Canvas size.
    pub size: Size,
    /// Data-bound primitives.
    pub geometry: GeometryDescriptor,
    /// Axes.
    pub axes: Vec<AxisDescriptor>,
    /// Legend, if the chart has one.
    pub legend: Option<LegendDescriptor>,
    /// Title and description.
    pub title: TitleSpec,
    /// Summaries of the scales the chart was built from.
    pub scales: Vec<ScaleSpec>,
}

impl ChartDescriptor {
    /// All marks, sorted by z-index (stable, so data order is kept within a layer).
    pub fn marks(&self) -> Result<Vec<Mark>, ScaleError> {
        let mut out: Vec<Mark> = self
            .geometry
            .primitives
            .iter()
            .map(|p| p.mark.clone())
            .collect();
        for axis in &self.axes {
            out.extend(axis.marks());
        }
        if let Some(legend) = &self.legend {
            out.extend(legend.marks()?);
        }
        out.extend(self.title.marks());
        out.sort_by_key(|m| m.z_index);
        Ok(out)
    }
}

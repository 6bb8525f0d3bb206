// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Squarified tree maps of sales or pledge totals.

use std::sync::Arc;

use kurbo::{Point, Vec2};
use peniko::Color;
use statviz_charts::{
    ColorScheme, Insets, LegendItem, LegendSwatchesSpec, PlotFrame, ScaleOrdinal, Size, z_order,
};
use statviz_core::{Mark, TextAnchor, TextBaseline};
use statviz_transforms::{Hierarchy, HierarchyRaw, TreemapLayout};

use super::chart_title;
use crate::descriptor::{
    ChartDescriptor, ChartKind, GeometryDescriptor, LegendDescriptor, PrimitiveKind,
    TreeMapDataset, ids,
};
use crate::error::{Error, Result};

/// Label lines reserved per tile in the id space.
const MAX_LABEL_LINES: usize = 8;

/// Tree map settings.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeMapConfig {
    /// Canvas size.
    pub size: Size,
    /// Space around the tiles; the bottom inset holds the legend.
    pub insets: Insets,
    /// Gap between sibling tiles.
    pub padding_inner: f64,
    /// Order children by descending value before layout.
    pub sort_by_value: bool,
    /// Tile color scheme, keyed by category.
    pub scheme: ColorScheme,
    /// Tile and legend swatch opacity.
    pub opacity: f32,
    /// Tile outline color.
    pub stroke: Color,
    /// Offset of the first label line from the tile corner.
    pub label_offset: Vec2,
    /// Label font size; also the line spacing.
    pub label_font_size: f64,
    /// Top-left corner of the legend.
    pub legend_origin: Point,
    /// Legend items per column.
    pub legend_rows: usize,
    /// Distance between legend columns.
    pub legend_column_width: f64,
    /// Distance between legend rows.
    pub legend_row_height: f64,
    /// Legend swatch size.
    pub legend_swatch_size: f64,
}

impl Default for TreeMapConfig {
    fn default() -> Self {
        Self {
            size: Size::new(1200.0, 1100.0),
            insets: Insets::new(50.0, 50.0, 350.0, 50.0),
            padding_inner: 0.0,
            sort_by_value: false,
            scheme: ColorScheme::Category10,
            opacity: 0.3,
            stroke: Color::WHITE,
            label_offset: Vec2::new(4.0, 14.0),
            label_font_size: 10.0,
            legend_origin: Point::new(210.0, 780.0),
            legend_rows: 3,
            legend_column_width: 130.0,
            legend_row_height: 40.0,
            legend_swatch_size: 30.0,
        }
    }
}

impl TreeMapConfig {
    /// Sets the gap between sibling tiles.
    pub fn with_padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding;
        self
    }

    /// Orders children by descending value before layout.
    pub fn with_sort_by_value(mut self, sort: bool) -> Self {
        self.sort_by_value = sort;
        self
    }

    /// Sets the color scheme.
    pub fn with_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = scheme;
        self
    }
}

/// Builds the summed (and optionally sorted) tree for a payload.
pub fn prepare(raw: &HierarchyRaw, config: &TreeMapConfig) -> Hierarchy {
    let mut tree = Hierarchy::from_raw(raw);
    tree.sum();
    if config.sort_by_value {
        tree.sort_by_value();
    }
    tree
}

/// Scales of a tree map.
#[derive(Clone, Debug)]
pub struct TreeMapScales {
    /// Canvas and tile area.
    pub frame: PlotFrame,
    /// Category to color.
    pub color: ScaleOrdinal,
    /// Layout sized to the tile area.
    pub layout: TreemapLayout,
}

/// Builds the category color scale and the layout.
pub fn build_scales(tree: &Hierarchy, config: &TreeMapConfig) -> Result<TreeMapScales> {
    if tree.leaves().next().is_none() {
        return Err(Error::Empty("tree map"));
    }
    let frame = PlotFrame::new(config.size, config.insets);
    let color = ScaleOrdinal::new(tree.categories(), config.scheme.colors())?;
    let layout = TreemapLayout::new(frame.plot.width(), frame.plot.height())
        .with_padding_inner(config.padding_inner);
    Ok(TreeMapScales {
        frame,
        color,
        layout,
    })
}

/// Splits a leaf name into label lines.
fn label_lines(name: &str) -> impl Iterator<Item = &str> {
    name.split_whitespace().take(MAX_LABEL_LINES)
}

/// Assembles tiles, tile labels, the category legend and the title.
pub fn assemble(
    dataset: TreeMapDataset,
    tree: &Hierarchy,
    scales: &TreeMapScales,
    config: &TreeMapConfig,
) -> ChartDescriptor {
    let TreeMapScales {
        frame,
        color,
        layout,
    } = scales;
    let origin = Vec2::new(frame.plot.x0, frame.plot.y0);
    let fallback = Color::from_rgb8(0x99, 0x99, 0x99);
    let mut geometry = GeometryDescriptor::default();
    for (i, tile) in layout.layout(tree).into_iter().enumerate() {
        let rect = tile.rect + origin;
        let datum = tree.leaf_datum(tile.node);
        let fill = color.map(&datum.category).unwrap_or(fallback);
        let lines: Vec<String> = label_lines(&datum.name).map(str::to_string).collect();
        geometry.push(
            PrimitiveKind::Tile,
            Mark::builder(ids::row(ids::GEOMETRY, i))
                .rect(rect)
                .fill(fill)
                .opacity(config.opacity)
                .stroke(config.stroke, 1.0)
                .z_index(z_order::GEOMETRY)
                .class("tile")
                .datum(Arc::new(datum))
                .build(),
        );
        for (j, line) in lines.into_iter().enumerate() {
            let pos = rect.origin()
                + config.label_offset
                + Vec2::new(0.0, j as f64 * config.label_font_size);
            geometry.push(
                PrimitiveKind::Label,
                Mark::builder(ids::row(ids::LABELS, i * MAX_LABEL_LINES + j))
                    .text(pos, line)
                    .font_size(config.label_font_size)
                    .text_anchor(TextAnchor::Start)
                    .text_baseline(TextBaseline::Alphabetic)
                    .fill(Color::BLACK)
                    .z_index(z_order::GEOMETRY_LABELS)
                    .class("tile-label")
                    .build(),
            );
        }
    }

    let items = color
        .domain()
        .iter()
        .filter_map(|c| Some(LegendItem::solid(c.clone(), color.map(c)?)))
        .collect();
    let legend = LegendSwatchesSpec::new(ids::LEGEND, config.legend_origin, items)
        .with_swatch_size(config.legend_swatch_size)
        .with_columns(config.legend_rows, config.legend_column_width)
        .with_row_height(config.legend_row_height)
        .with_opacity(config.opacity)
        .with_font_size(14.0);

    let view = frame.view;
    ChartDescriptor {
        kind: ChartKind::TreeMap(dataset),
        size: Size::new(view.width(), view.height()),
        geometry,
        axes: Vec::new(),
        legend: Some(LegendDescriptor::Swatches(legend)),
        title: chart_title(
            dataset.title(),
            Some(dataset.description().to_string()),
            view.width(),
        ),
        scales: vec![color.spec()],
    }
}

/// Builds, scales and assembles a hierarchical payload.
pub fn chart(
    dataset: TreeMapDataset,
    raw: &HierarchyRaw,
    config: &TreeMapConfig,
) -> Result<ChartDescriptor> {
    let tree = prepare(raw, config);
    let scales = build_scales(&tree, config)?;
    log::debug!(
        "tree map {dataset:?}: {} nodes ({} dropped)",
        tree.len(),
        tree.dropped()
    );
    Ok(assemble(dataset, &tree, &scales, config))
}

#[cfg(test)]
mod tests {
    use statviz_core::Datum;
    use statviz_transforms::NodeId;

    use super::*;

    fn games() -> HierarchyRaw {
        serde_json::from_str(
            r#"{"name": "Video Game Sales Data Top 100", "children": [
                {"name": "Wii", "children": [
                    {"name": "Wii Sports", "category": "Wii", "value": "82.53"},
                    {"name": "Mario Kart Wii", "category": "Wii", "value": "35.52"}
                ]},
                {"name": "NES", "children": [
                    {"name": "Super Mario Bros.", "category": "NES", "value": "40.24"},
                    {"name": "Broken", "category": "NES", "value": "n/a"}
                ]},
                {"name": "GB", "children": [
                    {"name": "Pokemon Red/Pokemon Blue", "category": "GB", "value": 31.37}
                ]}
            ]}"#,
        )
        .unwrap()
    }

    fn tiles(chart: &ChartDescriptor) -> Vec<&crate::descriptor::Primitive> {
        chart.geometry.of_kind(PrimitiveKind::Tile).collect()
    }

    #[test]
    fn one_tile_per_valid_leaf() {
        let chart = chart(TreeMapDataset::VideoGames, &games(), &TreeMapConfig::default()).unwrap();
        let tiles = tiles(&chart);
        assert_eq!(tiles.len(), 4);
        let area: f64 = tiles.iter().map(|t| t.mark.bounds().area()).sum();
        assert!((area - 1100.0 * 700.0).abs() < 1e-6);
        for t in &tiles {
            let b = t.mark.bounds();
            assert!(b.x0 >= 50.0 - 1e-9 && b.x1 <= 1150.0 + 1e-9);
            assert!(b.y0 >= 50.0 - 1e-9 && b.y1 <= 750.0 + 1e-9);
        }
    }

    #[test]
    fn tiles_are_colored_by_category() {
        let chart = chart(TreeMapDataset::VideoGames, &games(), &TreeMapConfig::default()).unwrap();
        let tiles = tiles(&chart);
        assert_eq!(tiles[0].mark.fill, tiles[1].mark.fill);
        assert_ne!(tiles[0].mark.fill, tiles[2].mark.fill);
        assert_eq!(tiles[0].datum().unwrap().tooltip(), "Wii Sports (Wii):  82.53");
        let Some(LegendDescriptor::Swatches(legend)) = &chart.legend else {
            panic!("tree map has a swatch legend");
        };
        let labels: Vec<&str> = legend.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["Wii", "NES", "GB"]);
    }

    #[test]
    fn labels_wrap_per_word() {
        let chart = chart(TreeMapDataset::VideoGames, &games(), &TreeMapConfig::default()).unwrap();
        let labels = chart.geometry.of_kind(PrimitiveKind::Label).count();
        assert_eq!(labels, 2 + 3 + 3 + 3);
        assert_eq!(chart.title.text, "Top 100 Best Selling Video Game");
    }

    #[test]
    fn sorting_is_opt_in() {
        let raw: HierarchyRaw = serde_json::from_str(
            r#"{"name": "root", "children": [
                {"name": "small", "children": [{"name": "a", "value": 1}]},
                {"name": "large", "children": [{"name": "b", "value": 3}]}
            ]}"#,
        )
        .unwrap();
        let names = |tree: &Hierarchy| -> Vec<String> {
            tree.children(NodeId::ROOT)
                .iter()
                .map(|&id| tree.node(id).name.clone())
                .collect()
        };
        let kept = prepare(&raw, &TreeMapConfig::default());
        let sorted = prepare(&raw, &TreeMapConfig::default().with_sort_by_value(true));
        assert_eq!(names(&kept), ["small", "large"]);
        assert_eq!(names(&sorted), ["large", "small"]);
        assert_eq!(sorted.node(NodeId::ROOT).value, 4.0);
    }

    #[test]
    fn empty_tree_is_an_error() {
        let raw: HierarchyRaw = serde_json::from_str(r#"{"name": "root", "children": []}"#).unwrap();
        assert!(matches!(
            chart(TreeMapDataset::Movies, &raw, &TreeMapConfig::default()),
            Err(Error::Empty("tree map"))
        ));
    }
}

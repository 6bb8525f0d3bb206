// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load, extract, scale and assemble, with mount checks after every suspension point.

use statviz_transforms::Dataset;

use crate::charts::{bar, choropleth, heat_map, scatter, tree_map};
use crate::config::DatasetId;
use crate::descriptor::{ChartDescriptor, ChartKind, TreeMapDataset};
use crate::error::{Error, Result};
use crate::loader::DatasetLoader;
use crate::mount::MountGuard;

/// Settings for every chart of the gallery.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GalleryConfig {
    /// Bar chart settings.
    pub bar: bar::BarConfig,
    /// Scatter plot settings.
    pub scatter: scatter::ScatterConfig,
    /// Heat map settings.
    pub heat_map: heat_map::HeatMapConfig,
    /// Choropleth settings.
    pub choropleth: choropleth::ChoroplethConfig,
    /// Tree map settings, shared by the three tree-map datasets.
    pub tree_map: tree_map::TreeMapConfig,
}

/// What a pipeline run produced.
#[derive(Clone, Debug)]
pub enum Outcome<T = ChartDescriptor> {
    /// The chart is ready to render.
    Ready(T),
    /// The view unmounted while the data was in flight; nothing was built.
    Discarded,
}

impl<T> Outcome<T> {
    /// The ready value, if any.
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(v) => Some(v),
            Self::Discarded => None,
        }
    }
}

/// The dataset a single-payload chart loads.
fn dataset_for(kind: ChartKind) -> DatasetId {
    match kind {
        ChartKind::Bar => DatasetId::Gdp,
        ChartKind::Scatter => DatasetId::Cyclists,
        ChartKind::HeatMap => DatasetId::Temperature,
        ChartKind::Choropleth => DatasetId::Education,
        ChartKind::TreeMap(TreeMapDataset::Kickstarter) => DatasetId::Kickstarter,
        ChartKind::TreeMap(TreeMapDataset::Movies) => DatasetId::Movies,
        ChartKind::TreeMap(TreeMapDataset::VideoGames) => DatasetId::VideoGames,
    }
}

enum Fetched {
    One(Dataset),
    Map {
        education: Dataset,
        counties: Dataset,
    },
}

/// Turns a chart request into a [`ChartDescriptor`].
#[derive(Clone, Debug)]
pub struct Pipeline {
    loader: DatasetLoader,
    config: GalleryConfig,
}

impl Pipeline {
    /// A pipeline with default chart settings.
    pub fn new(loader: DatasetLoader) -> Self {
        Self {
            loader,
            config: GalleryConfig::default(),
        }
    }

    /// Replaces the chart settings.
    pub fn with_config(mut self, config: GalleryConfig) -> Self {
        self.config = config;
        self
    }

    /// The chart settings.
    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Loads the data for `kind` and builds its descriptor.
    ///
    /// The guard is checked once the data has arrived. If the view unmounted in the meantime the
    /// result (including a load failure) is dropped and [`Outcome::Discarded`] is returned.
    pub async fn run(&self, kind: ChartKind, guard: &MountGuard) -> Result<Outcome> {
        let fetched = self.fetch(kind).await;
        if !guard.is_mounted() {
            log::debug!("{kind:?}: view unmounted during load, discarding");
            return Ok(Outcome::Discarded);
        }
        self.build(kind, fetched?).map(Outcome::Ready)
    }

    /// Loads all three tree-map datasets in one join and builds their descriptors, in
    /// [`TreeMapDataset::ALL`] order.
    pub async fn prefetch_tree_maps(
        &self,
        guard: &MountGuard,
    ) -> Result<Outcome<Vec<ChartDescriptor>>> {
        let loaded = futures::try_join!(
            self.loader.load(DatasetId::Kickstarter),
            self.loader.load(DatasetId::Movies),
            self.loader.load(DatasetId::VideoGames),
        );
        if !guard.is_mounted() {
            log::debug!("tree maps: view unmounted during load, discarding");
            return Ok(Outcome::Discarded);
        }
        let (kickstarter, movies, games) = loaded?;
        TreeMapDataset::ALL
            .into_iter()
            .zip([kickstarter, movies, games])
            .map(|(d, ds)| self.build(ChartKind::TreeMap(d), Fetched::One(ds)))
            .collect::<Result<Vec<_>>>()
            .map(Outcome::Ready)
    }

    async fn fetch(&self, kind: ChartKind) -> Result<Fetched> {
        if kind == ChartKind::Choropleth {
            let (education, counties) = futures::try_join!(
                self.loader.load(DatasetId::Education),
                self.loader.load(DatasetId::Counties),
            )?;
            return Ok(Fetched::Map {
                education,
                counties,
            });
        }
        Ok(Fetched::One(self.loader.load(dataset_for(kind)).await?))
    }

    fn build(&self, kind: ChartKind, fetched: Fetched) -> Result<ChartDescriptor> {
        let config = &self.config;
        match (kind, fetched) {
            (ChartKind::Bar, Fetched::One(Dataset::Gdp(raw))) => bar::chart(&raw, &config.bar),
            (ChartKind::Scatter, Fetched::One(Dataset::Cyclists(raw))) => {
                scatter::chart(&raw, &config.scatter)
            }
            (ChartKind::HeatMap, Fetched::One(Dataset::Temperature(raw))) => {
                heat_map::chart(&raw, &config.heat_map)
            }
            (
                ChartKind::Choropleth,
                Fetched::Map {
                    education: Dataset::Education(education),
                    counties: Dataset::Topology(topology),
                },
            ) => choropleth::chart(&education, &topology, &config.choropleth),
            (ChartKind::TreeMap(d), Fetched::One(Dataset::Hierarchy(raw))) => {
                tree_map::chart(d, &raw, &config.tree_map)
            }
            (chart, Fetched::One(ds) | Fetched::Map { education: ds, .. }) => Err(Error::Shape {
                chart,
                found: ds.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use statviz_transforms::DatasetKind;

    use super::*;
    use crate::config::AssetConfig;
    use crate::descriptor::PrimitiveKind;
    use crate::error::LoadError;
    use crate::loader::MemorySource;

    const GDP: &str = r#"{"data": [["1947-01-01", 243.1], ["1947-04-01", 246.3]]}"#;
    const EDUCATION: &str = r#"[{"fips": 1001, "state": "AL", "area_name": "Autauga County",
                                  "bachelorsOrHigher": 21.9}]"#;
    const COUNTIES: &str = r#"{"type": "Topology", "objects": {
        "counties": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "id": 1001, "arcs": [[0]]}]},
        "states": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "id": "01", "arcs": [[0]]}]}},
        "arcs": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]}"#;
    const TREE: &str = r#"{"name": "root", "children": [
        {"name": "A", "children": [{"name": "a1", "value": 2}, {"name": "a2", "value": 1}]}]}"#;

    fn config() -> AssetConfig {
        AssetConfig::new("data")
    }

    fn pipeline(source: MemorySource) -> Pipeline {
        Pipeline::new(DatasetLoader::new(config(), source))
    }

    #[tokio::test]
    async fn builds_a_ready_chart() {
        let source = MemorySource::new().with_dataset(&config(), DatasetId::Gdp, GDP);
        let outcome = pipeline(source).run(ChartKind::Bar, &MountGuard::new()).await.unwrap();
        let chart = outcome.ready().unwrap();
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.geometry.of_kind(PrimitiveKind::Rect).count(), 2);
    }

    #[tokio::test]
    async fn choropleth_joins_both_payloads() {
        let source = MemorySource::new()
            .with_dataset(&config(), DatasetId::Education, EDUCATION)
            .with_dataset(&config(), DatasetId::Counties, COUNTIES);
        let chart = pipeline(source)
            .run(ChartKind::Choropleth, &MountGuard::new())
            .await
            .unwrap()
            .ready()
            .unwrap();
        assert_eq!(chart.geometry.of_kind(PrimitiveKind::Path).count(), 1);
    }

    #[tokio::test]
    async fn choropleth_fails_when_either_payload_fails() {
        let source = MemorySource::new().with_dataset(&config(), DatasetId::Education, EDUCATION);
        let err = pipeline(source)
            .run(ChartKind::Choropleth, &MountGuard::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Load(LoadError::Network { .. })));
    }

    #[tokio::test]
    async fn unmounted_view_discards_the_result() {
        let (source, gate) = MemorySource::gated();
        let source = source.with_dataset(&config(), DatasetId::Gdp, GDP);
        let pipeline = Arc::new(pipeline(source));
        let guard = MountGuard::new();
        let task = {
            let pipeline = Arc::clone(&pipeline);
            let guard = guard.clone();
            tokio::spawn(async move { pipeline.run(ChartKind::Bar, &guard).await })
        };
        tokio::task::yield_now().await;
        guard.unmount();
        gate.open();
        let outcome = task.await.unwrap().unwrap();
        assert!(matches!(outcome, Outcome::Discarded));
    }

    #[tokio::test]
    async fn unmounted_view_swallows_load_errors() {
        let guard = MountGuard::new();
        guard.unmount();
        let outcome = pipeline(MemorySource::new()).run(ChartKind::Scatter, &guard).await;
        assert!(matches!(outcome, Ok(Outcome::Discarded)));
    }

    #[tokio::test]
    async fn tree_maps_prefetch_together() {
        let source = MemorySource::new()
            .with_dataset(&config(), DatasetId::Kickstarter, TREE)
            .with_dataset(&config(), DatasetId::Movies, TREE)
            .with_dataset(&config(), DatasetId::VideoGames, TREE);
        let charts = pipeline(source)
            .prefetch_tree_maps(&MountGuard::new())
            .await
            .unwrap()
            .ready()
            .unwrap();
        let kinds: Vec<ChartKind> = charts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            TreeMapDataset::ALL.map(ChartKind::TreeMap).to_vec()
        );
    }

    #[test]
    fn mismatched_payload_is_a_shape_error() {
        let p = pipeline(MemorySource::new());
        let ds = Dataset::from_json(DatasetKind::Gdp, GDP.as_bytes()).unwrap();
        let err = p.build(ChartKind::Scatter, Fetched::One(ds)).unwrap_err();
        assert!(matches!(
            err,
            Error::Shape {
                chart: ChartKind::Scatter,
                found: DatasetKind::Gdp
            }
        ));
    }
}

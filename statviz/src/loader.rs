// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dataset fetching.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use statviz_transforms::Dataset;
use tokio::sync::watch;

use crate::config::{AssetConfig, DatasetId};
use crate::error::LoadError;

/// Where asset bytes come from.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetches the bytes at `path`.
    async fn fetch(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads assets from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSource;

#[async_trait]
impl AssetSource for FsSource {
    async fn fetch(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

/// Serves assets from memory.
///
/// A gated source holds every fetch until its [`Gate`] opens, which lets tests tear a chart down
/// while its load is still in flight.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, Vec<u8>>,
    gate: Option<watch::Receiver<bool>>,
}

/// Releases the fetches of a gated [`MemorySource`].
#[derive(Clone, Debug)]
pub struct Gate {
    tx: Arc<watch::Sender<bool>>,
}

impl Gate {
    /// Lets pending and future fetches complete.
    pub fn open(&self) {
        self.tx.send_replace(true);
    }
}

impl MemorySource {
    /// An empty, ungated source.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty source whose fetches wait for the returned gate.
    pub fn gated() -> (Self, Gate) {
        let (tx, rx) = watch::channel(false);
        (
            Self {
                files: HashMap::new(),
                gate: Some(rx),
            },
            Gate { tx: Arc::new(tx) },
        )
    }

    /// Adds a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), bytes.into());
        self
    }

    /// Adds a dataset at the path `config` resolves it to.
    pub fn with_dataset(self, config: &AssetConfig, id: DatasetId, bytes: impl Into<Vec<u8>>) -> Self {
        self.with_file(config.path(id), bytes)
    }
}

#[async_trait]
impl AssetSource for MemorySource {
    async fn fetch(&self, path: &Path) -> io::Result<Vec<u8>> {
        if let Some(gate) = &self.gate {
            let mut rx = gate.clone();
            rx.wait_for(|open| *open)
                .await
                .map(drop)
                .map_err(|_| io::Error::other("asset gate closed"))?;
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such asset"))
    }
}

/// Fetches datasets by id and parses them into their raw shape.
#[derive(Clone)]
pub struct DatasetLoader {
    config: AssetConfig,
    source: Arc<dyn AssetSource>,
}

impl fmt::Debug for DatasetLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DatasetLoader {
    /// A loader over `source`.
    pub fn new(config: AssetConfig, source: impl AssetSource + 'static) -> Self {
        Self {
            config,
            source: Arc::new(source),
        }
    }

    /// A loader reading from the filesystem.
    pub fn from_fs(config: AssetConfig) -> Self {
        Self::new(config, FsSource)
    }

    /// The asset configuration.
    pub fn config(&self) -> &AssetConfig {
        &self.config
    }

    /// Fetches and parses one dataset.
    pub async fn load(&self, id: DatasetId) -> Result<Dataset, LoadError> {
        let path = self.config.path(id);
        log::debug!("fetching {}", path.display());
        let bytes = self
            .source
            .fetch(&path)
            .await
            .map_err(|source| LoadError::Network {
                path: path.display().to_string(),
                source,
            })?;
        Dataset::from_json(id.kind(), &bytes).map_err(|source| LoadError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Fetches several datasets concurrently; the first failure wins.
    pub async fn load_all(&self, ids: &[DatasetId]) -> Result<Vec<Dataset>, LoadError> {
        futures::future::try_join_all(ids.iter().map(|id| self.load(*id))).await
    }
}

#[cfg(test)]
mod tests {
    use statviz_transforms::DatasetKind;

    use super::*;

    fn loader(source: MemorySource) -> DatasetLoader {
        DatasetLoader::new(AssetConfig::new("data"), source)
    }

    #[tokio::test]
    async fn loads_and_parses() {
        let config = AssetConfig::new("data");
        let source = MemorySource::new().with_dataset(
            &config,
            DatasetId::Gdp,
            r#"{"data": [["1947-01-01", 243.1]]}"#,
        );
        let ds = loader(source).load(DatasetId::Gdp).await.unwrap();
        assert_eq!(ds.kind(), DatasetKind::Gdp);
    }

    #[tokio::test]
    async fn missing_asset_is_a_network_error() {
        let err = loader(MemorySource::new()).load(DatasetId::Gdp).await.unwrap_err();
        assert!(matches!(err, LoadError::Network { ref path, .. } if path.ends_with("gdp.json")));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let config = AssetConfig::new("data");
        let source = MemorySource::new().with_dataset(&config, DatasetId::Cyclists, "[{");
        let err = loader(source).load(DatasetId::Cyclists).await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[tokio::test]
    async fn load_all_fails_if_any_fails() {
        let config = AssetConfig::new("data");
        let source = MemorySource::new().with_dataset(&config, DatasetId::Education, "[]");
        let result = loader(source)
            .load_all(&[DatasetId::Education, DatasetId::Counties])
            .await;
        assert!(matches!(result, Err(LoadError::Network { .. })));
    }

    #[tokio::test]
    async fn gated_fetch_waits_for_gate() {
        let config = AssetConfig::new("data");
        let (source, gate) = MemorySource::gated();
        let source = source.with_dataset(&config, DatasetId::Education, "[]");
        let loader = loader(source);
        let task = tokio::spawn(async move { loader.load(DatasetId::Education).await });
        tokio::task::yield_now().await;
        assert!(!task.is_finished());
        gate.open();
        assert!(task.await.unwrap().is_ok());
    }
}

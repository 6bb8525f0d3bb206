// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Asset locations.

use std::path::PathBuf;

use statviz_transforms::DatasetKind;

/// Environment variable overriding [`AssetConfig::base`].
pub const ASSET_BASE_ENV: &str = "STATVIZ_ASSET_BASE";

/// Default asset directory.
pub const DEFAULT_ASSET_BASE: &str = "assets/data";

/// A dataset the gallery knows how to fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatasetId {
    /// Quarterly US GDP.
    Gdp,
    /// Tour de France climb times.
    Cyclists,
    /// Monthly global land temperature.
    Temperature,
    /// County education rates.
    Education,
    /// County and state topology.
    Counties,
    /// Kickstarter pledges by category.
    Kickstarter,
    /// Movie sales by genre.
    Movies,
    /// Video game sales by console.
    VideoGames,
}

impl DatasetId {
    /// Every dataset, in gallery order.
    pub const ALL: [Self; 8] = [
        Self::Gdp,
        Self::Cyclists,
        Self::Temperature,
        Self::Education,
        Self::Counties,
        Self::Kickstarter,
        Self::Movies,
        Self::VideoGames,
    ];

    /// File name under the asset base.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Gdp => "gdp.json",
            Self::Cyclists => "cyclist-data.json",
            Self::Temperature => "global-temperature.json",
            Self::Education => "for_user_education.json",
            Self::Counties => "counties.json",
            Self::Kickstarter => "kickstarter-funding-data.json",
            Self::Movies => "movie-data.json",
            Self::VideoGames => "video-game-sales-data.json",
        }
    }

    /// Payload shape.
    pub fn kind(self) -> DatasetKind {
        match self {
            Self::Gdp => DatasetKind::Gdp,
            Self::Cyclists => DatasetKind::Cyclists,
            Self::Temperature => DatasetKind::Temperature,
            Self::Education => DatasetKind::Education,
            Self::Counties => DatasetKind::Topology,
            Self::Kickstarter | Self::Movies | Self::VideoGames => DatasetKind::Hierarchy,
        }
    }
}

/// Where datasets are fetched from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetConfig {
    /// Directory (or prefix) that dataset file names are resolved against.
    pub base: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_BASE)
    }
}

impl AssetConfig {
    /// Uses `base` as the asset prefix.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Reads [`ASSET_BASE_ENV`], falling back to [`DEFAULT_ASSET_BASE`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(ASSET_BASE_ENV).filter(|v| !v.trim().is_empty()) {
            Some(base) => Self::new(base),
            None => Self::default(),
        }
    }

    /// Full path of a dataset.
    pub fn path(&self, id: DatasetId) -> PathBuf {
        self.base.join(id.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_paths_against_base() {
        let config = AssetConfig::new("/srv/data");
        assert_eq!(
            config.path(DatasetId::Education),
            PathBuf::from("/srv/data/for_user_education.json")
        );
    }

    #[test]
    fn env_override_and_default() {
        let set = AssetConfig::from_lookup(|_| Some("public/data".into()));
        assert_eq!(set.base, PathBuf::from("public/data"));
        let blank = AssetConfig::from_lookup(|_| Some("  ".into()));
        assert_eq!(blank, AssetConfig::default());
        let unset = AssetConfig::from_lookup(|_| None);
        assert_eq!(unset.base, PathBuf::from(DEFAULT_ASSET_BASE));
    }

    #[test]
    fn hierarchies_share_a_kind() {
        assert_eq!(DatasetId::Movies.kind(), DatasetKind::Hierarchy);
        assert_eq!(DatasetId::Counties.kind(), DatasetKind::Topology);
        assert_eq!(DatasetId::ALL.len(), 8);
    }
}

// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dataset loading, chart assembly and view plumbing for the statviz gallery.
//!
//! A chart request flows through four stages:
//! - [`DatasetLoader`] fetches a JSON asset and parses it into its raw shape,
//! - `statviz_transforms` extractors validate records once,
//! - the per-chart `build_scales` / `assemble` functions in [`charts`] produce a
//!   [`ChartDescriptor`],
//! - a [`ChartView`] draws the descriptor.
//!
//! [`Pipeline`] runs the first three stages and checks a [`MountGuard`] once data arrives, so a
//! chart that was unmounted mid-load never draws. [`Selector`] keeps exactly one chart mounted.

pub mod charts;
mod config;
mod descriptor;
mod error;
mod loader;
mod mount;
mod pipeline;
mod projection;
mod selector;
mod view;

pub use config::{ASSET_BASE_ENV, AssetConfig, DEFAULT_ASSET_BASE, DatasetId};
pub use descriptor::{
    AxisDescriptor, ChartDescriptor, ChartKind, GeometryDescriptor, LegendDescriptor, Primitive,
    PrimitiveKind, TreeMapDataset,
};
pub use error::{Error, LoadError, Result};
pub use loader::{AssetSource, DatasetLoader, FsSource, Gate, MemorySource};
pub use mount::MountGuard;
pub use pipeline::{GalleryConfig, Outcome, Pipeline};
pub use projection::{Fit, Identity, Projection, lines_to_path, rings_to_path};
pub use selector::{GraphOption, Selector, UnknownOption, error_message, loading_message};
pub use view::{ChartView, SceneView, ViewState, ViewStatus};

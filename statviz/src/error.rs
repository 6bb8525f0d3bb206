// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use statviz_charts::ScaleError;
use statviz_transforms::{DatasetKind, ExtractError};

use crate::descriptor::ChartKind;

/// Failure to obtain a dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The asset could not be fetched.
    #[error("{path}: {source}")]
    Network {
        /// Resolved asset path.
        path: String,
        /// Underlying transport error.
        #[source]
        source: std::io::Error,
    },
    /// The asset was fetched but is not a valid payload.
    #[error("{path}: {source}")]
    Parse {
        /// Resolved asset path.
        path: String,
        /// Underlying decode error.
        #[source]
        source: ExtractError,
    },
}

/// Any failure while producing a chart.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Loading failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The dataset could not be turned into records (for example a duplicate join key).
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// A scale could not be built.
    #[error("invalid scale: {0}")]
    Scale(#[from] ScaleError),
    /// Validation left nothing to draw.
    #[error("no usable records in {0} data")]
    Empty(&'static str),
    /// A chart received a payload of the wrong shape.
    #[error("{chart:?} chart cannot be drawn from {found:?} data")]
    Shape {
        /// The chart being built.
        chart: ChartKind,
        /// The payload it received.
        found: DatasetKind,
    },
}

/// Result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

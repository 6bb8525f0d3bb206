// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extraction errors.

extern crate alloc;

use alloc::string::String;

use crate::education::Fips;

/// Failure that makes a whole dataset unusable.
///
/// Individual malformed records never produce this error; they are dropped and counted in
/// [`Extracted::dropped`](crate::Extracted::dropped).
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The payload is not valid JSON or does not have the dataset's shape.
    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),
    /// A field required by the dataset as a whole is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// More than one education record shares a county id.
    #[error("duplicate records for county {0}")]
    DuplicateKey(Fips),
    /// A county has no education record and the join policy does not tolerate it.
    #[error("no record for county {0}")]
    MissingKey(Fips),
    /// A feature carries no usable id and the join policy does not tolerate it.
    #[error("feature without a county id")]
    MissingId,
    /// The topology has no object with this name.
    #[error("topology has no object `{0}`")]
    MissingObject(String),
    /// A geometry references an arc the topology does not have.
    #[error("arc index {0} out of bounds")]
    InvalidArc(i64),
}

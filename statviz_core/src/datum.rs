// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Record metadata attached to marks.

extern crate alloc;

use alloc::string::String;
use core::fmt::Debug;

use smallvec::SmallVec;

/// Named attribute values exposed by a [`Datum`] (for example `data-year`).
pub type Attributes = SmallVec<[(&'static str, String); 4]>;

/// The source record behind a mark.
///
/// Marks keep their datum so that interaction code can describe the hovered item without going
/// back to the dataset.
pub trait Datum: Debug + Send + Sync {
    /// Tooltip text for this record.
    fn tooltip(&self) -> String;

    /// Extra attributes for views that expose them (`data-*` in SVG).
    fn attributes(&self) -> Attributes {
        Attributes::new()
    }
}

// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark model for `statviz`.
//!
//! Charts are assembled into flat lists of [`Mark`]s: positioned shapes with paint and an
//! optional [`Datum`] that carries the record the mark was derived from. A [`Scene`] holds the
//! current frame and produces [`MarkDiff`]s that a backend applies to its own node tree.
//!
//! Pointer handling is backend-agnostic as well: [`TooltipState`] hit-tests the scene and reports
//! the tooltip side effects to perform, and [`ZoomState`] turns clicks into zoom transforms.

#![no_std]

extern crate alloc;

mod datum;
mod interaction;
mod mark;
mod scene;

pub use datum::{Attributes, Datum};
pub use interaction::{
    PointerEvent, TOOLTIP_OFFSET, TooltipAction, TooltipState, ZOOM_FILL, ZoomAction, ZoomState,
    ZoomTransform,
};
pub use mark::{Mark, MarkBuilder, MarkId, Shape, StrokePaint, TextAnchor, TextBaseline, TextShape};
pub use scene::{MarkDiff, Scene};

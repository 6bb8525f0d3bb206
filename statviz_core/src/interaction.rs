// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer handling for tooltips and click-to-zoom.
//!
//! Backends forward raw pointer positions; [`TooltipState`] hit-tests the [`Scene`] and tells the
//! backend which tooltip side effect to perform, and [`ZoomState`] turns clicks into a
//! [`ZoomTransform`] for the geometry layer. The state is owned by the view, so behavior depends
//! only on the events fed in.

extern crate alloc;

use alloc::string::String;

use kurbo::{Affine, Point, Rect, Vec2};

use crate::datum::Attributes;
use crate::mark::MarkId;
use crate::scene::Scene;

/// Offset between the pointer and the tooltip's top-left corner.
pub const TOOLTIP_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Share of the viewport a zoomed mark fills along its tighter axis.
pub const ZOOM_FILL: f64 = 0.95;

/// A raw pointer event over the chart surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// The pointer moved to a position (scene coordinates).
    Moved(Point),
    /// The pointer left the chart surface.
    Left,
    /// The primary button was clicked at a position (screen coordinates).
    Click(Point),
}

/// A tooltip side effect requested by [`TooltipState::handle`].
#[derive(Clone, Debug, PartialEq)]
pub enum TooltipAction {
    /// The pointer entered a mark: show the tooltip.
    Show {
        /// The hovered mark.
        target: MarkId,
        /// Tooltip text.
        text: String,
        /// Datum attributes for the tooltip element.
        attributes: Attributes,
        /// Tooltip position.
        at: Point,
    },
    /// The pointer moved within the hovered mark.
    MoveTo {
        /// Tooltip position.
        at: Point,
    },
    /// The pointer left the hovered mark.
    Hide,
}

/// Hover state for one view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipState {
    hovered: Option<MarkId>,
    offset: Vec2,
}

impl Default for TooltipState {
    fn default() -> Self {
        Self {
            hovered: None,
            offset: TOOLTIP_OFFSET,
        }
    }
}

impl TooltipState {
    /// Creates an idle tooltip state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pointer-to-tooltip offset.
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// The currently hovered mark, if any.
    pub fn hovered(&self) -> Option<MarkId> {
        self.hovered
    }

    /// Forgets the hovered mark (used when the scene is rebuilt).
    pub fn reset(&mut self) {
        self.hovered = None;
    }

    /// Processes one pointer event.
    pub fn handle(&mut self, scene: &Scene, event: PointerEvent) -> Option<TooltipAction> {
        match event {
            PointerEvent::Moved(pos) => {
                let at = pos + self.offset;
                match scene.hit_test(pos) {
                    Some(mark) if self.hovered == Some(mark.id) => {
                        Some(TooltipAction::MoveTo { at })
                    }
                    Some(mark) => {
                        let datum = mark.datum.as_ref()?;
                        self.hovered = Some(mark.id);
                        Some(TooltipAction::Show {
                            target: mark.id,
                            text: datum.tooltip(),
                            attributes: datum.attributes(),
                            at,
                        })
                    }
                    None => self.hovered.take().map(|_| TooltipAction::Hide),
                }
            }
            PointerEvent::Left => self.hovered.take().map(|_| TooltipAction::Hide),
            PointerEvent::Click(_) => None,
        }
    }
}

/// A uniform zoom that centers one mark in the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    /// The zoomed mark.
    pub target: MarkId,
    /// Scale factor.
    pub scale: f64,
    /// Offset applied after scaling.
    pub translate: Vec2,
}

impl ZoomTransform {
    /// Fits `bounds` into `viewport`, centered and filling [`ZOOM_FILL`] of it along the axis
    /// where the mark is relatively larger.
    ///
    /// Returns `None` if either rectangle is empty.
    pub fn fit(target: MarkId, bounds: Rect, viewport: Rect) -> Option<Self> {
        let ratio = (bounds.width() / viewport.width()).max(bounds.height() / viewport.height());
        if !(ratio.is_finite() && ratio > 0.0) {
            return None;
        }
        let scale = ZOOM_FILL / ratio;
        let translate = viewport.center().to_vec2() - bounds.center().to_vec2() * scale;
        Some(Self {
            target,
            scale,
            translate,
        })
    }

    /// The transform from scene to screen coordinates.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }
}

/// A zoom side effect requested by [`ZoomState::click`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomAction {
    /// Transition the geometry layer to this transform.
    ZoomTo(ZoomTransform),
    /// Transition the geometry layer back to identity.
    Reset,
}

/// Click-to-zoom state for one view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ZoomState {
    current: Option<ZoomTransform>,
}

impl ZoomState {
    /// Creates an unzoomed state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The zoomed mark, if any.
    pub fn active(&self) -> Option<MarkId> {
        self.current.map(|z| z.target)
    }

    /// The current zoom, if any.
    pub fn current(&self) -> Option<&ZoomTransform> {
        self.current.as_ref()
    }

    /// Drops the zoom (used when the scene is rebuilt).
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Maps a screen position back into scene coordinates.
    pub fn to_scene(&self, pos: Point) -> Point {
        match self.current {
            Some(zoom) => zoom.affine().inverse() * pos,
            None => pos,
        }
    }

    /// Processes a click at screen position `pos`.
    ///
    /// Clicking a data-bound mark zooms to it. Clicking the zoomed mark again, or empty space
    /// while zoomed, resets.
    pub fn click(&mut self, scene: &Scene, pos: Point, viewport: Rect) -> Option<ZoomAction> {
        match scene.hit_test(self.to_scene(pos)) {
            Some(mark) if self.active() != Some(mark.id) => {
                let zoom = ZoomTransform::fit(mark.id, mark.bounds(), viewport)?;
                self.current = Some(zoom);
                Some(ZoomAction::ZoomTo(zoom))
            }
            _ => self.current.take().map(|_| ZoomAction::Reset),
        }
    }
}

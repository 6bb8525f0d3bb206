// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas/plot geometry.
//!
//! Charts here use fixed canvases: a canvas size plus per-side padding yields the plot
//! rectangle that scales map into.

use kurbo::Rect;

/// A width/height pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in scene units.
    pub width: f64,
    /// Height in scene units.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Per-side padding.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    /// Top padding.
    pub top: f64,
    /// Right padding.
    pub right: f64,
    /// Bottom padding.
    pub bottom: f64,
    /// Left padding.
    pub left: f64,
}

impl Insets {
    /// Creates insets from explicit sides.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same padding on every side.
    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }
}

/// A canvas with padding: the outer view and the inner plot rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotFrame {
    /// Outer bounds, anchored at the origin.
    pub view: Rect,
    /// Plot rectangle (the view minus the insets).
    pub plot: Rect,
}

impl PlotFrame {
    /// Computes the frame for a canvas of `size` with `insets`.
    ///
    /// Insets larger than the canvas collapse the plot to zero size rather than inverting it.
    pub fn new(size: Size, insets: Insets) -> Self {
        let view = Rect::new(0.0, 0.0, size.width.max(0.0), size.height.max(0.0));
        let x0 = insets.left.min(view.x1);
        let y0 = insets.top.min(view.y1);
        let plot = Rect::new(
            x0,
            y0,
            (view.x1 - insets.right).max(x0),
            (view.y1 - insets.bottom).max(y0),
        );
        Self { view, plot }
    }

    /// Horizontal pixel range of the plot.
    pub fn x_range(&self) -> (f64, f64) {
        (self.plot.x0, self.plot.x1)
    }

    /// Vertical pixel range of the plot, bottom to top (y grows downward).
    pub fn y_range_inverted(&self) -> (f64, f64) {
        (self.plot.y1, self.plot.y0)
    }

    /// Vertical pixel range of the plot, top to bottom.
    pub fn y_range(&self) -> (f64, f64) {
        (self.plot.y0, self.plot.y1)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn frame_subtracts_insets() {
        let frame = PlotFrame::new(Size::new(900.0, 600.0), Insets::uniform(50.0));
        assert_eq!(frame.plot, Rect::new(50.0, 50.0, 850.0, 550.0));
        assert_eq!(frame.y_range_inverted(), (550.0, 50.0));
    }

    #[test]
    fn oversized_insets_collapse() {
        let frame = PlotFrame::new(Size::new(10.0, 10.0), Insets::uniform(20.0));
        assert_eq!(frame.plot.width(), 0.0);
        assert_eq!(frame.plot.height(), 0.0);
    }
}

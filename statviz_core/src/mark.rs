// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marks: positioned shapes with paint and optional datum metadata.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;

use kurbo::{BezPath, Circle, Point, Rect, Shape as _};
use peniko::Brush;

use crate::datum::Datum;

/// A stable mark identity.
///
/// Ids are derived deterministically from an id base and a row index so that repeated renders of
/// the same data produce the same ids (and therefore `Update` rather than `Exit`/`Enter` diffs).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Wraps a raw id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the id for row `row` under `base`.
    pub const fn for_row(base: u64, row: usize) -> Self {
        Self(base.wrapping_add(row as u64))
    }
}

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// The position is the start of the text.
    #[default]
    Start,
    /// The position is the middle of the text.
    Middle,
    /// The position is the end of the text.
    End,
}

/// Vertical text baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// Alphabetic baseline.
    #[default]
    Alphabetic,
    /// Middle of the em box.
    Middle,
    /// Hanging baseline (top of the text).
    Hanging,
    /// Ideographic baseline.
    Ideographic,
}

/// An unshaped text run.
#[derive(Clone, Debug, PartialEq)]
pub struct TextShape {
    /// Anchor position.
    pub pos: Point,
    /// The text itself.
    pub text: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Rotation around `pos`, in degrees.
    pub angle: f64,
}

impl TextShape {
    /// Rough bounds, assuming an average glyph width of 0.6em.
    pub fn estimated_bounds(&self) -> Rect {
        let w = 0.6 * self.font_size * self.text.chars().count() as f64;
        let h = self.font_size;
        let (x0, x1) = match self.anchor {
            TextAnchor::Start => (self.pos.x, self.pos.x + w),
            TextAnchor::Middle => (self.pos.x - 0.5 * w, self.pos.x + 0.5 * w),
            TextAnchor::End => (self.pos.x - w, self.pos.x),
        };
        let (y0, y1) = match self.baseline {
            TextBaseline::Middle => (self.pos.y - 0.5 * h, self.pos.y + 0.5 * h),
            TextBaseline::Hanging => (self.pos.y, self.pos.y + h),
            TextBaseline::Alphabetic | TextBaseline::Ideographic => (self.pos.y - h, self.pos.y),
        };
        Rect::new(x0, y0, x1, y1)
    }
}

/// Mark geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A circle.
    Circle(Circle),
    /// An arbitrary path.
    Path(BezPath),
    /// A text run.
    Text(TextShape),
}

impl Shape {
    /// Returns the bounding box of the shape (estimated for text).
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rect(r) => r.abs(),
            Self::Circle(c) => c.bounding_box(),
            Self::Path(p) => p.bounding_box(),
            Self::Text(t) => t.estimated_bounds(),
        }
    }

    /// Returns `true` if `pt` lies inside the shape.
    pub fn contains(&self, pt: Point) -> bool {
        match self {
            Self::Rect(r) => r.abs().contains(pt),
            Self::Circle(c) => (pt - c.center).hypot2() <= c.radius * c.radius,
            Self::Path(p) => p.contains(pt),
            Self::Text(t) => t.estimated_bounds().contains(pt),
        }
    }
}

/// Stroke paint and width.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokePaint {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene units.
    pub width: f64,
}

impl StrokePaint {
    /// Creates a stroke.
    pub fn new(brush: impl Into<Brush>, width: f64) -> Self {
        Self {
            brush: brush.into(),
            width,
        }
    }
}

/// A drawable primitive.
#[derive(Clone, Debug)]
pub struct Mark {
    /// Stable identity.
    pub id: MarkId,
    /// Rendering order; higher values draw on top.
    pub z_index: i32,
    /// Geometry.
    pub shape: Shape,
    /// Fill paint.
    pub fill: Brush,
    /// Optional stroke.
    pub stroke: Option<StrokePaint>,
    /// Group opacity in `0..=1`.
    pub opacity: f32,
    /// Optional semantic class (`"bar"`, `"cell"`, ...), used by views for styling and lookup.
    pub class: Option<&'static str>,
    /// The record this mark was derived from.
    pub datum: Option<Arc<dyn Datum>>,
}

impl Mark {
    /// Starts building a mark with the given id.
    pub fn builder(id: MarkId) -> MarkBuilder {
        MarkBuilder {
            mark: Self {
                id,
                z_index: 0,
                shape: Shape::Rect(Rect::ZERO),
                fill: Brush::default(),
                stroke: None,
                opacity: 1.0,
                class: None,
                datum: None,
            },
        }
    }

    /// Returns the mark bounds.
    pub fn bounds(&self) -> Rect {
        self.shape.bounds()
    }

    /// Returns `true` if both marks draw identically and refer to the same datum.
    pub fn same_as(&self, other: &Self) -> bool {
        let same_datum = match (&self.datum, &other.datum) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a.tooltip() == b.tooltip(),
            _ => false,
        };
        self.z_index == other.z_index
            && self.shape == other.shape
            && self.fill == other.fill
            && self.stroke == other.stroke
            && self.opacity == other.opacity
            && self.class == other.class
            && same_datum
    }
}

/// Builder returned by [`Mark::builder`].
#[derive(Debug)]
pub struct MarkBuilder {
    mark: Mark,
}

impl MarkBuilder {
    /// Makes this a rectangle mark.
    pub fn rect(mut self, rect: Rect) -> Self {
        self.mark.shape = Shape::Rect(rect);
        self
    }

    /// Makes this a circle mark.
    pub fn circle(mut self, center: impl Into<Point>, radius: f64) -> Self {
        self.mark.shape = Shape::Circle(Circle::new(center, radius));
        self
    }

    /// Makes this a path mark.
    pub fn path(mut self, path: BezPath) -> Self {
        self.mark.shape = Shape::Path(path);
        self
    }

    /// Makes this a text mark with default text styling.
    pub fn text(mut self, pos: impl Into<Point>, text: impl Into<String>) -> Self {
        self.mark.shape = Shape::Text(TextShape {
            pos: pos.into(),
            text: text.into(),
            font_size: 10.0,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
            angle: 0.0,
        });
        self
    }

    /// Sets the font size (text marks only).
    pub fn font_size(mut self, font_size: f64) -> Self {
        if let Shape::Text(t) = &mut self.mark.shape {
            t.font_size = font_size;
        }
        self
    }

    /// Sets the text anchor (text marks only).
    pub fn text_anchor(mut self, anchor: TextAnchor) -> Self {
        if let Shape::Text(t) = &mut self.mark.shape {
            t.anchor = anchor;
        }
        self
    }

    /// Sets the text baseline (text marks only).
    pub fn text_baseline(mut self, baseline: TextBaseline) -> Self {
        if let Shape::Text(t) = &mut self.mark.shape {
            t.baseline = baseline;
        }
        self
    }

    /// Sets the text rotation in degrees (text marks only).
    pub fn angle(mut self, angle: f64) -> Self {
        if let Shape::Text(t) = &mut self.mark.shape {
            t.angle = angle;
        }
        self
    }

    /// Sets the z-index.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.mark.z_index = z_index;
        self
    }

    /// Sets the fill paint.
    pub fn fill(mut self, fill: impl Into<Brush>) -> Self {
        self.mark.fill = fill.into();
        self
    }

    /// Sets the stroke.
    pub fn stroke(mut self, brush: impl Into<Brush>, width: f64) -> Self {
        self.mark.stroke = Some(StrokePaint::new(brush, width));
        self
    }

    /// Sets the group opacity.
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.mark.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Sets the semantic class.
    pub fn class(mut self, class: &'static str) -> Self {
        self.mark.class = Some(class);
        self
    }

    /// Attaches the source record.
    pub fn datum(mut self, datum: Arc<dyn Datum>) -> Self {
        self.mark.datum = Some(datum);
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        self.mark
    }
}

// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart titles.
//!
//! A title is a centered heading with an optional description line below it.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use peniko::Brush;
use peniko::color::palette::css;
use statviz_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::z_order;

/// A chart-level title with optional description.
#[derive(Clone, Debug, PartialEq)]
pub struct TitleSpec {
    /// Stable mark id; the description uses `id + 1`.
    pub id: MarkId,
    /// Title text (unshaped).
    pub text: String,
    /// Optional description text.
    pub description: Option<String>,
    /// Anchor of the title baseline (horizontally centered).
    pub anchor: Point,
    /// Title font size.
    pub font_size: f64,
    /// Description font size.
    pub description_font_size: f64,
    /// Vertical distance between the title and description baselines.
    pub description_gap: f64,
    /// Text paint.
    pub fill: Brush,
}

impl TitleSpec {
    /// Creates a title centered on `anchor`.
    pub fn new(id: MarkId, text: impl Into<String>, anchor: Point) -> Self {
        Self {
            id,
            text: text.into(),
            description: None,
            anchor,
            font_size: 24.0,
            description_font_size: 16.0,
            description_gap: 20.0,
            fill: css::BLACK.into(),
        }
    }

    /// Adds a description line.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the title font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Emits the title (and description) marks.
    pub fn marks(&self) -> Vec<Mark> {
        let mut out = Vec::with_capacity(2);
        out.push(
            Mark::builder(self.id)
                .text(self.anchor, self.text.clone())
                .font_size(self.font_size)
                .text_anchor(TextAnchor::Middle)
                .text_baseline(TextBaseline::Alphabetic)
                .fill(self.fill.clone())
                .z_index(z_order::TITLES)
                .class("title")
                .build(),
        );
        if let Some(description) = &self.description {
            let pos = Point::new(self.anchor.x, self.anchor.y + self.description_gap);
            out.push(
                Mark::builder(MarkId::from_raw(self.id.0.wrapping_add(1)))
                    .text(pos, description.clone())
                    .font_size(self.description_font_size)
                    .text_anchor(TextAnchor::Middle)
                    .text_baseline(TextBaseline::Alphabetic)
                    .fill(self.fill.clone())
                    .z_index(z_order::TITLES)
                    .class("description")
                    .build(),
            );
        }
        out
    }
}

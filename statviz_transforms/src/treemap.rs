// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Squarified tree-map layout.
//!
//! Rows of children are laid out alternately along the shorter side of the remaining rectangle,
//! adding children to a row while that improves the worst aspect ratio (Bruls, Huizing and van
//! Wijk). The target ratio defaults to the golden ratio.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Rect;

use crate::hierarchy::{Hierarchy, NodeId};

/// The golden ratio, the default target aspect ratio.
pub const PHI: f64 = 1.618_033_988_749_895;

/// A positioned leaf.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    /// The leaf node.
    pub node: NodeId,
    /// Tile rectangle.
    pub rect: Rect,
    /// The leaf's depth.
    pub depth: usize,
}

/// Tree-map layout parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreemapLayout {
    /// Layout width.
    pub width: f64,
    /// Layout height.
    pub height: f64,
    /// Gap between siblings.
    pub padding_inner: f64,
    /// Gap between a parent's edge and its children.
    pub padding_outer: f64,
    /// Target aspect ratio of tiles.
    pub ratio: f64,
}

impl TreemapLayout {
    /// A layout filling `width × height` with no padding.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding_inner: 0.0,
            padding_outer: 0.0,
            ratio: PHI,
        }
    }

    /// Sets the gap between siblings.
    pub fn with_padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding.max(0.0);
        self
    }

    /// Sets the gap between a parent's edge and its children.
    pub fn with_padding_outer(mut self, padding: f64) -> Self {
        self.padding_outer = padding.max(0.0);
        self
    }

    /// Sets the target aspect ratio (values below 1 are treated as 1).
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio.max(1.0);
        self
    }

    /// Lays out a summed hierarchy and returns one tile per leaf, in leaf order.
    pub fn layout(&self, tree: &Hierarchy) -> Vec<Tile> {
        if tree.is_empty() {
            return Vec::new();
        }
        let mut rects = alloc::vec![Rect::ZERO; tree.len()];
        rects[NodeId::ROOT.0] = Rect::new(0.0, 0.0, self.width.max(0.0), self.height.max(0.0));
        // Pre-order storage means a node's rect is final before its children are visited.
        for i in 0..tree.len() {
            let id = NodeId(i);
            if tree.children(id).is_empty() {
                continue;
            }
            let inner = self.inner_rect(rects[i], id == NodeId::ROOT);
            self.squarify(tree, id, inner, &mut rects);
            let half = self.padding_inner / 2.0;
            for &child in tree.children(id) {
                rects[child.0] = shrink(rects[child.0], half);
            }
        }
        tree.leaves()
            .map(|node| Tile {
                node,
                rect: rects[node.0],
                depth: tree.node(node).depth,
            })
            .collect()
    }

    /// The area children are tiled into: inset by the outer padding, grown by half the inner
    /// padding so the outermost children end flush after their own shrink.
    fn inner_rect(&self, rect: Rect, is_root: bool) -> Rect {
        let outer = if is_root { 0.0 } else { self.padding_outer };
        let half = self.padding_inner / 2.0;
        shrink(rect, outer - half)
    }

    fn squarify(&self, tree: &Hierarchy, parent: NodeId, area: Rect, rects: &mut [Rect]) {
        let nodes = tree.children(parent);
        let value_of = |id: NodeId| tree.node(id).value;
        let mut value = value_of(parent);
        let (mut x0, mut y0, x1, y1) = (area.x0, area.y0, area.x1, area.y1);
        if value <= 0.0 {
            for &n in nodes {
                rects[n.0] = Rect::new(x0, y0, x0, y0);
            }
            return;
        }
        let n = nodes.len();
        let (mut i0, mut i1) = (0, 0);
        while i0 < n {
            let dx = x1 - x0;
            let dy = y1 - y0;

            // The first non-empty node starts the row.
            let mut sum_value;
            loop {
                sum_value = value_of(nodes[i1]);
                i1 += 1;
                if sum_value != 0.0 || i1 >= n {
                    break;
                }
            }
            let mut min_value = sum_value;
            let mut max_value = sum_value;
            let alpha = (dy / dx).max(dx / dy) / (value * self.ratio);
            let mut beta = sum_value * sum_value * alpha;
            let mut min_ratio = (max_value / beta).max(beta / min_value);

            // Keep adding nodes while the worst aspect ratio improves.
            while i1 < n {
                let node_value = value_of(nodes[i1]);
                sum_value += node_value;
                min_value = min_value.min(node_value);
                max_value = max_value.max(node_value);
                beta = sum_value * sum_value * alpha;
                let new_ratio = (max_value / beta).max(beta / min_value);
                if new_ratio > min_ratio {
                    sum_value -= node_value;
                    break;
                }
                min_ratio = new_ratio;
                i1 += 1;
            }

            let row = &nodes[i0..i1];
            if dx < dy {
                let y_end = y0 + dy * sum_value / value;
                dice(tree, row, sum_value, Rect::new(x0, y0, x1, y_end), rects);
                y0 = y_end;
            } else {
                let x_end = x0 + dx * sum_value / value;
                slice(tree, row, sum_value, Rect::new(x0, y0, x_end, y1), rects);
                x0 = x_end;
            }
            value -= sum_value;
            i0 = i1;
        }
    }
}

/// Splits `area` horizontally among `row` in proportion to value.
fn dice(tree: &Hierarchy, row: &[NodeId], total: f64, area: Rect, rects: &mut [Rect]) {
    let k = if total > 0.0 { area.width() / total } else { 0.0 };
    let mut x = area.x0;
    for &id in row {
        let next = x + tree.node(id).value * k;
        rects[id.0] = Rect::new(x, area.y0, next, area.y1);
        x = next;
    }
}

/// Splits `area` vertically among `row` in proportion to value.
fn slice(tree: &Hierarchy, row: &[NodeId], total: f64, area: Rect, rects: &mut [Rect]) {
    let k = if total > 0.0 { area.height() / total } else { 0.0 };
    let mut y = area.y0;
    for &id in row {
        let next = y + tree.node(id).value * k;
        rects[id.0] = Rect::new(area.x0, y, area.x1, next);
        y = next;
    }
}

/// Insets every side by `d`, collapsing to the center instead of inverting.
fn shrink(r: Rect, d: f64) -> Rect {
    let (mut x0, mut y0, mut x1, mut y1) = (r.x0 + d, r.y0 + d, r.x1 - d, r.y1 - d);
    if x1 < x0 {
        x0 = (x0 + x1) / 2.0;
        x1 = x0;
    }
    if y1 < y0 {
        y0 = (y0 + y1) / 2.0;
        y1 = y0;
    }
    Rect::new(x0, y0, x1, y1)
}

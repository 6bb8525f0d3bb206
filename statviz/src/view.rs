// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart views.
//!
//! A view owns drawn marks and pointer plumbing for one chart. Status, hover target and zoom
//! target live in an explicit [`ViewState`] that callers pass into every view call.

use kurbo::{Point, Rect};
use statviz_charts::Size;
use statviz_core::{
    MarkDiff, MarkId, PointerEvent, Scene, TooltipAction, TooltipState, ZoomState, ZoomTransform,
};

use crate::descriptor::{ChartDescriptor, ChartKind};
use crate::error::Result;

/// Where a view is in its lifecycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ViewStatus {
    /// Nothing selected yet, or torn down.
    #[default]
    Idle,
    /// Data is loading; the message is shown in place of the chart.
    Loading(String),
    /// A chart is drawn.
    Ready(ChartKind),
    /// Loading or building failed; the message is shown in place of the chart.
    Failed(String),
}

/// View-local state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    /// Lifecycle status.
    pub status: ViewStatus,
    /// The mark under the pointer, if it has a tooltip.
    pub hovered: Option<MarkId>,
    /// The mark zoomed to by the last click, if any.
    pub active: Option<MarkId>,
}

impl ViewState {
    /// The loading or error message, if one is showing.
    pub fn message(&self) -> Option<&str> {
        match &self.status {
            ViewStatus::Loading(m) | ViewStatus::Failed(m) => Some(m),
            ViewStatus::Idle | ViewStatus::Ready(_) => None,
        }
    }
}

/// Something that can display a chart.
pub trait ChartView {
    /// Shows a loading message.
    fn show_loading(&mut self, state: &mut ViewState, message: &str) {
        state.status = ViewStatus::Loading(message.to_string());
        state.hovered = None;
        state.active = None;
    }

    /// Replaces whatever is drawn with `descriptor`.
    fn render(&mut self, state: &mut ViewState, descriptor: &ChartDescriptor) -> Result<()>;

    /// Replaces whatever is drawn with an error message.
    fn show_error(&mut self, state: &mut ViewState, message: &str);

    /// Feeds a pointer event and returns the tooltip side effect to perform.
    ///
    /// Clicks never change the tooltip; they toggle the zoom and update `state.active`.
    fn pointer(&mut self, state: &mut ViewState, event: PointerEvent) -> Option<TooltipAction>;

    /// Removes everything the view drew.
    fn teardown(&mut self, state: &mut ViewState);
}

/// A view backed by a retained [`Scene`].
///
/// Each render replaces the whole scene; the resulting diffs queue up until a backend takes them
/// with [`take_diffs`](Self::take_diffs). A backend applies [`zoom`](Self::zoom) to the geometry
/// layer.
#[derive(Debug, Default)]
pub struct SceneView {
    scene: Scene,
    tooltip: TooltipState,
    zoom: ZoomState,
    size: Size,
    pending: Vec<MarkDiff>,
}

impl SceneView {
    /// An empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// The drawn marks.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Canvas size of the drawn chart.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The current click zoom, if any.
    pub fn zoom(&self) -> Option<&ZoomTransform> {
        self.zoom.current()
    }

    /// Drains the diffs produced since the last call.
    pub fn take_diffs(&mut self) -> Vec<MarkDiff> {
        std::mem::take(&mut self.pending)
    }

    fn clear(&mut self, state: &mut ViewState) {
        let diffs = self.scene.clear();
        self.pending.extend(diffs);
        self.tooltip.reset();
        self.zoom.reset();
        state.hovered = None;
        state.active = None;
    }
}

impl ChartView for SceneView {
    fn render(&mut self, state: &mut ViewState, descriptor: &ChartDescriptor) -> Result<()> {
        let marks = descriptor.marks()?;
        let diffs = self.scene.replace(marks);
        self.pending.extend(diffs);
        self.tooltip.reset();
        self.zoom.reset();
        self.size = descriptor.size;
        state.status = ViewStatus::Ready(descriptor.kind);
        state.hovered = None;
        state.active = None;
        log::debug!("{:?}: rendered {} marks", descriptor.kind, self.scene.len());
        Ok(())
    }

    fn show_error(&mut self, state: &mut ViewState, message: &str) {
        self.clear(state);
        log::error!("{message}");
        state.status = ViewStatus::Failed(message.to_string());
    }

    fn pointer(&mut self, state: &mut ViewState, event: PointerEvent) -> Option<TooltipAction> {
        if !matches!(state.status, ViewStatus::Ready(_)) {
            return None;
        }
        if let PointerEvent::Click(pos) = event {
            let viewport = Rect::from_origin_size(Point::ZERO, (self.size.width, self.size.height));
            if let Some(action) = self.zoom.click(&self.scene, pos, viewport) {
                log::debug!("zoom: {action:?}");
            }
            state.active = self.zoom.active();
            return None;
        }
        let action = self.tooltip.handle(&self.scene, event);
        state.hovered = self.tooltip.hovered();
        action
    }

    fn teardown(&mut self, state: &mut ViewState) {
        self.clear(state);
        state.status = ViewStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use statviz_transforms::GdpRaw;

    use super::*;
    use crate::charts::bar;

    /// Forty quarters from 1947; the second one is $246.3B.
    fn gdp_chart() -> ChartDescriptor {
        let rows: Vec<String> = (0..40)
            .map(|i| {
                let (year, month) = (1947 + i / 4, i % 4 * 3 + 1);
                format!(r#"["{year}-{month:02}-01", {}.3]"#, 243 + 3 * i)
            })
            .collect();
        let raw: GdpRaw =
            serde_json::from_str(&format!(r#"{{"data": [{}]}}"#, rows.join(", "))).unwrap();
        bar::chart(&raw, &bar::BarConfig::default()).unwrap()
    }

    fn bar_center(chart: &ChartDescriptor, i: usize) -> Point {
        chart.geometry.primitives[i].mark.bounds().center()
    }

    #[test]
    fn rerender_replaces_the_scene() {
        let chart = gdp_chart();
        let mut view = SceneView::new();
        let mut state = ViewState::default();
        view.render(&mut state, &chart).unwrap();
        let first = view.scene().len();
        let entered = view.take_diffs();
        assert_eq!(entered.len(), first);
        assert!(entered.iter().all(|d| matches!(d, MarkDiff::Enter { .. })));

        view.render(&mut state, &chart).unwrap();
        assert_eq!(view.scene().len(), first);
        let diffs = view.take_diffs();
        let exits = diffs.iter().filter(|d| matches!(d, MarkDiff::Exit { .. })).count();
        assert_eq!(exits, first);
        let first_enter = diffs.iter().position(|d| matches!(d, MarkDiff::Enter { .. }));
        let last_exit = diffs.iter().rposition(|d| matches!(d, MarkDiff::Exit { .. }));
        assert!(last_exit < first_enter);
        assert_eq!(state.status, ViewStatus::Ready(ChartKind::Bar));
    }

    #[test]
    fn hover_shows_and_hides_the_tooltip() {
        let chart = gdp_chart();
        let mut view = SceneView::new();
        let mut state = ViewState::default();
        view.render(&mut state, &chart).unwrap();

        let bar = chart.geometry.primitives[1].mark.bounds();
        assert!(bar.height() > 0.0);
        let at = bar_center(&chart, 1);
        let shown = view.pointer(&mut state, PointerEvent::Moved(at));
        assert!(matches!(
            shown,
            Some(TooltipAction::Show { ref text, .. }) if text == "Q2 1947:  $246.3B"
        ));
        assert_eq!(state.hovered, Some(chart.geometry.primitives[1].mark.id));
        assert!(matches!(
            view.pointer(&mut state, PointerEvent::Moved(at)),
            Some(TooltipAction::MoveTo { .. })
        ));
        assert_eq!(view.pointer(&mut state, PointerEvent::Left), Some(TooltipAction::Hide));
        assert_eq!(state.hovered, None);
    }

    #[test]
    fn click_zooms_and_a_second_click_resets() {
        let chart = gdp_chart();
        let mut view = SceneView::new();
        let mut state = ViewState::default();
        view.render(&mut state, &chart).unwrap();
        let target = chart.geometry.primitives[10].mark.id;

        let at = bar_center(&chart, 10);
        assert_eq!(view.pointer(&mut state, PointerEvent::Click(at)), None);
        assert_eq!(state.active, Some(target));
        let zoom = *view.zoom().unwrap();
        assert_eq!(zoom.target, target);
        assert!(zoom.scale > 1.0);
        let centered = zoom.affine() * at;
        let middle = Point::new(chart.size.width / 2.0, chart.size.height / 2.0);
        assert!((centered - middle).hypot() < 1e-6);

        view.pointer(&mut state, PointerEvent::Click(centered));
        assert_eq!(state.active, None);
        assert_eq!(view.zoom(), None);

        view.pointer(&mut state, PointerEvent::Click(at));
        assert_eq!(state.active, Some(target));
        let corner = view.zoom().unwrap().affine() * Point::ZERO;
        view.pointer(&mut state, PointerEvent::Click(corner));
        assert_eq!(state.active, None);
    }

    #[test]
    fn rerender_drops_the_zoom() {
        let chart = gdp_chart();
        let mut view = SceneView::new();
        let mut state = ViewState::default();
        view.render(&mut state, &chart).unwrap();
        view.pointer(&mut state, PointerEvent::Click(bar_center(&chart, 3)));
        assert!(state.active.is_some());
        view.render(&mut state, &chart).unwrap();
        assert_eq!(state.active, None);
        assert_eq!(view.zoom(), None);
    }

    #[test]
    fn teardown_clears_marks_and_hover() {
        let chart = gdp_chart();
        let mut view = SceneView::new();
        let mut state = ViewState::default();
        view.render(&mut state, &chart).unwrap();
        view.pointer(&mut state, PointerEvent::Moved(bar_center(&chart, 0)));
        view.pointer(&mut state, PointerEvent::Click(bar_center(&chart, 0)));
        view.teardown(&mut state);
        assert!(view.scene().is_empty());
        assert_eq!(state, ViewState::default());
        assert_eq!(view.pointer(&mut state, PointerEvent::Moved(Point::ZERO)), None);
        assert_eq!(view.pointer(&mut state, PointerEvent::Click(Point::ZERO)), None);
        assert_eq!(state.active, None);
    }

    #[test]
    fn errors_replace_the_chart() {
        let mut view = SceneView::new();
        let mut state = ViewState::default();
        view.render(&mut state, &gdp_chart()).unwrap();
        view.show_error(&mut state, "Error loading data: boom");
        assert!(view.scene().is_empty());
        assert_eq!(state.message(), Some("Error loading data: boom"));
    }
}

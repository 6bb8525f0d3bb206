// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart selection.
//!
//! Exactly one chart is mounted at a time. Selecting another option unmounts the current one
//! first, so a load still in flight for it can never draw.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use crate::descriptor::{ChartKind, TreeMapDataset};
use crate::error::Result;
use crate::mount::MountGuard;
use crate::pipeline::{Outcome, Pipeline};
use crate::view::{ChartView, ViewState};

/// An entry of the chart menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GraphOption {
    /// GDP bar chart.
    Bar,
    /// Cyclist scatter plot.
    Scatter,
    /// Temperature heat map.
    Heat,
    /// Education choropleth.
    Choro,
    /// Sales tree map.
    Tree,
}

impl GraphOption {
    /// Every option, in menu order.
    pub const ALL: [Self; 5] = [Self::Bar, Self::Scatter, Self::Heat, Self::Choro, Self::Tree];

    /// The value used on the command line and in menus.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Scatter => "scatter",
            Self::Heat => "heat",
            Self::Choro => "choro",
            Self::Tree => "tree",
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bar => "Bar Chart",
            Self::Scatter => "Scatterplot Graph",
            Self::Heat => "Heat Map",
            Self::Choro => "Choropleth Map",
            Self::Tree => "Treemap Diagram",
        }
    }

    /// The chart this option shows; tree maps use `tree_dataset`.
    pub fn chart_kind(self, tree_dataset: TreeMapDataset) -> ChartKind {
        match self {
            Self::Bar => ChartKind::Bar,
            Self::Scatter => ChartKind::Scatter,
            Self::Heat => ChartKind::HeatMap,
            Self::Choro => ChartKind::Choropleth,
            Self::Tree => ChartKind::TreeMap(tree_dataset),
        }
    }
}

impl fmt::Display for GraphOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unknown menu value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown chart `{0}` (expected bar, scatter, heat, choro or tree)")]
pub struct UnknownOption(pub String);

impl FromStr for GraphOption {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

/// Loading message for a chart.
pub fn loading_message(kind: ChartKind) -> String {
    format!("Loading {} data...", kind.data_name())
}

/// Error message shown in place of a chart.
pub fn error_message(err: &crate::Error) -> String {
    format!("Error loading data: {err}")
}

/// Owns the view and mounts one chart at a time.
#[derive(Debug)]
pub struct Selector<V> {
    pipeline: Arc<Pipeline>,
    view: V,
    state: ViewState,
    tree_dataset: TreeMapDataset,
    current: Option<(GraphOption, MountGuard)>,
}

impl<V: ChartView> Selector<V> {
    /// A selector with nothing mounted.
    pub fn new(pipeline: Pipeline, view: V) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            view,
            state: ViewState::default(),
            tree_dataset: TreeMapDataset::VideoGames,
            current: None,
        }
    }

    /// Chooses which dataset the tree-map option shows.
    pub fn with_tree_dataset(mut self, dataset: TreeMapDataset) -> Self {
        self.tree_dataset = dataset;
        self
    }

    /// The mounted option.
    pub fn current(&self) -> Option<GraphOption> {
        self.current.as_ref().map(|(o, _)| *o)
    }

    /// The view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The view, for pointer forwarding.
    pub fn view_mut(&mut self) -> (&mut V, &mut ViewState) {
        (&mut self.view, &mut self.state)
    }

    /// Unmounts the current chart, if any, and tears its drawing down.
    pub fn unmount(&mut self) {
        if let Some((option, guard)) = self.current.take() {
            log::info!("unmounting {option}");
            guard.unmount();
            self.view.teardown(&mut self.state);
        }
    }

    /// Unmounts the current chart and mounts `option`, showing its loading message.
    ///
    /// Returns the new chart's guard and the load to drive; hand the load's result to
    /// [`finish`](Self::finish). The load does not borrow the selector, so another option can be
    /// selected while it runs.
    pub fn start(
        &mut self,
        option: GraphOption,
    ) -> (
        MountGuard,
        impl Future<Output = Result<Outcome>> + Send + 'static,
    ) {
        self.unmount();
        let kind = option.chart_kind(self.tree_dataset);
        let guard = MountGuard::new();
        log::info!("mounting {option}");
        self.current = Some((option, guard.clone()));
        self.view.show_loading(&mut self.state, &loading_message(kind));

        let pipeline = Arc::clone(&self.pipeline);
        let load_guard = guard.clone();
        let load = async move { pipeline.run(kind, &load_guard).await };
        (guard, load)
    }

    /// Applies a load result. Returns `false` when the chart it belongs to is no longer mounted
    /// and the result was dropped.
    pub fn finish(&mut self, guard: &MountGuard, result: Result<Outcome>) -> bool {
        if !guard.is_mounted() {
            return false;
        }
        match result {
            Ok(Outcome::Ready(descriptor)) => {
                if let Err(err) = self.view.render(&mut self.state, &descriptor) {
                    self.view.show_error(&mut self.state, &error_message(&err));
                }
                true
            }
            Ok(Outcome::Discarded) => false,
            Err(err) => {
                self.view.show_error(&mut self.state, &error_message(&err));
                true
            }
        }
    }

    /// Mounts `option` and waits for its chart.
    pub async fn select(&mut self, option: GraphOption) -> bool {
        let (guard, load) = self.start(option);
        let result = load.await;
        self.finish(&guard, result)
    }
}

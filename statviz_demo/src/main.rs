// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders the statviz gallery to SVG files and an HTML report.

mod html;
mod svg;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use kurbo::Rect;
use statviz::{
    AssetConfig, ChartDescriptor, DatasetLoader, GraphOption, MountGuard, Pipeline, SceneView,
    Selector, TreeMapDataset, ViewStatus,
};
use statviz_charts::Size;
use statviz_core::MarkDiff;

use crate::html::{HtmlSection, SectionBody};

/// Tree-map dataset choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TreeArg {
    Kickstarter,
    Movies,
    Games,
}

impl From<TreeArg> for TreeMapDataset {
    fn from(value: TreeArg) -> Self {
        match value {
            TreeArg::Kickstarter => Self::Kickstarter,
            TreeArg::Movies => Self::Movies,
            TreeArg::Games => Self::VideoGames,
        }
    }
}

/// statviz gallery renderer
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Charts to render (bar, scatter, heat, choro, tree); all of them when empty
    charts: Vec<GraphOption>,

    /// Directory holding the JSON assets (defaults to $STATVIZ_ASSET_BASE, then assets/data)
    #[clap(long)]
    assets: Option<PathBuf>,

    /// Output directory
    #[clap(long, default_value = ".")]
    out: PathBuf,

    /// Dataset shown by the tree option
    #[clap(long, value_enum, default_value = "games")]
    tree: TreeArg,

    /// Also render the other two tree-map datasets
    #[clap(long)]
    all_tree_maps: bool,
}

fn svg_for(size: Size, diffs: &[MarkDiff]) -> (String, usize) {
    let mut scene = svg::SvgScene::default();
    scene.set_view_box(Rect::new(0.0, 0.0, size.width, size.height));
    scene.apply_diffs(diffs);
    (scene.to_svg_string(), scene.len())
}

fn write_svg(out: &std::path::Path, name: &str, svg: &str) -> std::io::Result<()> {
    let path = out.join(format!("{name}.svg"));
    std::fs::write(&path, svg)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

async fn render_options(
    selector: &mut Selector<SceneView>,
    options: &[GraphOption],
    out: &std::path::Path,
) -> std::io::Result<Vec<HtmlSection>> {
    let mut sections = Vec::with_capacity(options.len());
    for &option in options {
        selector.select(option).await;
        let (view, state) = selector.view_mut();
        let body = match &state.status {
            ViewStatus::Ready(_) => {
                let (svg, marks) = svg_for(view.size(), &view.take_diffs());
                log::debug!("{option}: {marks} marks");
                write_svg(out, option.as_str(), &svg)?;
                SectionBody::Svg(svg)
            }
            _ => {
                view.take_diffs();
                let message = state.message().unwrap_or_default().to_string();
                log::warn!("{option}: {message}");
                SectionBody::Message(message)
            }
        };
        sections.push(HtmlSection {
            id: option.as_str().to_string(),
            title: option.label().to_string(),
            body,
        });
    }
    Ok(sections)
}

fn descriptor_svg(chart: &ChartDescriptor) -> Result<String, statviz::Error> {
    let mut view = SceneView::new();
    let mut state = statviz::ViewState::default();
    statviz::ChartView::render(&mut view, &mut state, chart)?;
    Ok(svg_for(chart.size, &view.take_diffs()).0)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let assets = args.assets.map_or_else(AssetConfig::from_env, AssetConfig::new);
    log::info!("reading assets from {}", assets.base.display());
    std::fs::create_dir_all(&args.out)?;

    let pipeline = Pipeline::new(DatasetLoader::from_fs(assets));
    let options = if args.charts.is_empty() {
        GraphOption::ALL.to_vec()
    } else {
        args.charts
    };

    let tree = TreeMapDataset::from(args.tree);
    let mut selector = Selector::new(pipeline.clone(), SceneView::new()).with_tree_dataset(tree);
    let mut sections = render_options(&mut selector, &options, &args.out).await?;
    selector.unmount();

    if args.all_tree_maps {
        let guard = MountGuard::new();
        if let Some(charts) = pipeline.prefetch_tree_maps(&guard).await?.ready() {
            for (dataset, chart) in TreeMapDataset::ALL.into_iter().zip(&charts) {
                if dataset == tree && options.contains(&GraphOption::Tree) {
                    continue;
                }
                let name = format!("tree-{dataset:?}").to_lowercase();
                let svg = descriptor_svg(chart)?;
                write_svg(&args.out, &name, &svg)?;
                sections.push(HtmlSection {
                    id: name,
                    title: dataset.title().to_string(),
                    body: SectionBody::Svg(svg),
                });
            }
        }
    }

    let report = args.out.join("statviz_gallery.html");
    std::fs::write(&report, html::render_report("statviz gallery", &sections))?;
    println!("wrote {}", report.display());
    Ok(())
}

// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG output for `statviz_demo`.
//!
//! Marks with a datum get a `<title>` child (the browser tooltip) and their `data-*` attributes.

use std::collections::HashMap;
use kurbo::Rect;
use peniko::Brush;
use statviz_core::{Mark, MarkDiff, MarkId, Shape, TextAnchor, TextBaseline};

#[derive(Debug, Default)]
pub(crate) struct SvgScene {
    marks: HashMap<MarkId, Mark>,
    view_box: Option<Rect>,
}

impl SvgScene {
    pub(crate) fn set_view_box(&mut self, view_box: Rect) {
        self.view_box = Some(view_box);
    }

    pub(crate) fn apply_diffs(&mut self, diffs: &[MarkDiff]) {
        for diff in diffs {
            match diff {
                MarkDiff::Enter { id, new, .. } | MarkDiff::Update { id, new, .. } => {
                    self.marks.insert(*id, (**new).clone());
                }
                MarkDiff::Exit { id } => {
                    self.marks.remove(id);
                }
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.marks.len()
    }

    pub(crate) fn to_svg_string(&self) -> String {
        let view_box = self
            .view_box
            .unwrap_or_else(|| Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        let (width, height) = (view_box.width(), view_box.height());
        out.push_str(&format!(
            r#"viewBox="{} {} {width} {height}" width="{width}" height="{height}" "#,
            view_box.x0, view_box.y0
        ));
        out.push_str("font-family=\"sans-serif\">\n");

        let mut marks: Vec<&Mark> = self.marks.values().collect();
        marks.sort_by_key(|m| (m.z_index, m.id));
        for mark in marks {
            write_mark(&mut out, mark);
        }

        out.push_str("</svg>\n");
        out
    }
}

fn write_mark(out: &mut String, mark: &Mark) {
    let tag = match &mark.shape {
        Shape::Rect(r) => {
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                r.x0,
                r.y0,
                r.width(),
                r.height()
            ));
            "rect"
        }
        Shape::Circle(c) => {
            out.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="{}""#,
                c.center.x, c.center.y, c.radius
            ));
            "circle"
        }
        Shape::Path(p) => {
            out.push_str(&format!(r#"<path d="{}""#, p.to_svg()));
            "path"
        }
        Shape::Text(t) => {
            let baseline = match t.baseline {
                TextBaseline::Middle => "middle",
                TextBaseline::Alphabetic => "alphabetic",
                TextBaseline::Hanging => "hanging",
                TextBaseline::Ideographic => "ideographic",
            };
            out.push_str(&format!(
                r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{baseline}""#,
                t.pos.x, t.pos.y, t.font_size
            ));
            if t.angle != 0.0 {
                out.push_str(&format!(
                    r#" transform="rotate({} {} {})""#,
                    t.angle, t.pos.x, t.pos.y
                ));
            }
            out.push_str(match t.anchor {
                TextAnchor::Start => r#" text-anchor="start""#,
                TextAnchor::Middle => r#" text-anchor="middle""#,
                TextAnchor::End => r#" text-anchor="end""#,
            });
            "text"
        }
    };

    write_paint_attr(out, "fill", &mark.fill);
    if let Some(stroke) = &mark.stroke {
        write_paint_attr(out, "stroke", &stroke.brush);
        out.push_str(&format!(r#" stroke-width="{}""#, stroke.width));
    }
    if mark.opacity < 1.0 {
        out.push_str(&format!(r#" opacity="{}""#, mark.opacity));
    }
    if let Some(class) = mark.class {
        out.push_str(&format!(r#" class="{class}""#));
    }
    if let Some(datum) = &mark.datum {
        for (name, value) in datum.attributes() {
            out.push_str(&format!(r#" {name}="{}""#, escape_xml(&value)));
        }
    }
    out.push('>');

    if let Shape::Text(t) = &mark.shape {
        out.push_str(&escape_xml(&t.text));
    }
    if let Some(datum) = &mark.datum {
        out.push_str(&format!("<title>{}</title>", escape_xml(&datum.tooltip())));
    }
    out.push_str(&format!("</{tag}>\n"));
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let fill_opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, fill_opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use peniko::Color;
    use statviz_core::{Attributes, Datum};

    use super::*;

    #[derive(Debug)]
    struct Quarter;

    impl Datum for Quarter {
        fn tooltip(&self) -> String {
            "Q1 1947:  $243.1B".into()
        }

        fn attributes(&self) -> Attributes {
            let mut attrs = Attributes::new();
            attrs.push(("data-date", "1947-01-01".into()));
            attrs
        }
    }

    #[test]
    fn data_marks_carry_title_and_attributes() {
        let mark = Mark::builder(MarkId(7))
            .rect(Rect::new(0.0, 0.0, 4.0, 10.0))
            .fill(Color::from_rgb8(0, 0x59, 0))
            .class("bar")
            .datum(Arc::new(Quarter))
            .build();
        let mut scene = SvgScene::default();
        scene.apply_diffs(&[MarkDiff::Enter {
            id: mark.id,
            z_index: 0,
            new: Box::new(mark),
        }]);
        let svg = scene.to_svg_string();
        assert!(svg.contains(r##"fill="#005900""##));
        assert!(svg.contains(r#"class="bar" data-date="1947-01-01""#));
        assert!(svg.contains("<title>Q1 1947:  $243.1B</title></rect>"));

        scene.apply_diffs(&[MarkDiff::Exit { id: MarkId(7) }]);
        assert_eq!(scene.len(), 0);
    }

    #[test]
    fn header_and_rotated_text() {
        let label = Mark::builder(MarkId(3))
            .text((10.0, 20.0), "Billions & more")
            .font_size(12.0)
            .text_anchor(TextAnchor::Middle)
            .text_baseline(TextBaseline::Middle)
            .angle(-90.0)
            .build();
        let mut scene = SvgScene::default();
        scene.set_view_box(Rect::new(0.0, 0.0, 300.0, 200.0));
        scene.apply_diffs(&[MarkDiff::Enter {
            id: label.id,
            z_index: 0,
            new: Box::new(label),
        }]);
        let svg = scene.to_svg_string();
        assert!(svg.starts_with(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 300 200\" \
             width=\"300\" height=\"200\" font-family=\"sans-serif\">\n"
        ));
        assert!(svg.contains(
            r#"<text x="10" y="20" font-size="12" dominant-baseline="middle" transform="rotate(-90 10 20)" text-anchor="middle""#
        ));
        assert!(svg.contains(">Billions &amp; more</text>\n</svg>\n"));
    }
}

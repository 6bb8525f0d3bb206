// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! HTML report for `statviz_demo`.

use crate::svg::escape_xml;

/// One chart of the report.
#[derive(Debug)]
pub(crate) struct HtmlSection {
    /// Anchor id.
    pub(crate) id: String,
    /// Heading.
    pub(crate) title: String,
    /// What to show: the chart SVG, or the message that replaced it.
    pub(crate) body: SectionBody,
}

#[derive(Debug)]
pub(crate) enum SectionBody {
    Svg(String),
    Message(String),
}

pub(crate) fn render_report(title: &str, sections: &[HtmlSection]) -> String {
    let mut out = String::new();
    let title = escape_xml(title);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str(&format!("<meta charset=\"utf-8\">\n<title>{title}</title>\n"));
    out.push_str(
        "<style>\n\
         body { font-family: sans-serif; margin: 2rem; }\n\
         nav a { margin-right: 1rem; }\n\
         section { margin: 2rem 0; }\n\
         .message { color: #a00; font-size: 1.25rem; }\n\
         </style>\n</head>\n<body>\n",
    );
    out.push_str(&format!("<h1>{title}</h1>\n<nav>\n"));
    for s in sections {
        out.push_str(&format!("<a href=\"#{}\">{}</a>\n", s.id, escape_xml(&s.title)));
    }
    out.push_str("</nav>\n");
    for s in sections {
        out.push_str(&format!(
            "<section id=\"{}\">\n<h2>{}</h2>\n",
            s.id,
            escape_xml(&s.title)
        ));
        match &s.body {
            SectionBody::Svg(svg) => out.push_str(svg),
            SectionBody::Message(m) => {
                out.push_str(&format!("<p class=\"message\">{}</p>\n", escape_xml(m)));
            }
        }
        out.push_str("</section>\n");
    }
    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_sections_show_their_message() {
        let html = render_report(
            "Gallery",
            &[HtmlSection {
                id: "bar".into(),
                title: "Bar Chart".into(),
                body: SectionBody::Message("Error loading data: gdp.json: not found".into()),
            }],
        );
        assert!(html.contains("<a href=\"#bar\">Bar Chart</a>"));
        assert!(html.contains("<p class=\"message\">Error loading data: gdp.json: not found</p>"));
    }
}

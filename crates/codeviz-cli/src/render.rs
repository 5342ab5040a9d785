//! Minimal SVG renderer for a [`Visualization`].
//!
//! Layout coordinates are mapped onto a fixed canvas; node color and radius
//! come from the visualization's style table.

use std::fmt::Write;

use codeviz_core::{NodeKind, Point, Visualization};

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 900.0;
const MARGIN: f64 = 60.0;
const TITLE_HEIGHT: f64 = 40.0;
const EDGE_COLOR: &str = "#888888";

/// Render a visualization as a standalone SVG document.
pub fn render_svg(vis: &Visualization) -> String {
    let project = Projection::fit(vis.positions.values());
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(
        svg,
        r#"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{}"/></marker></defs>"#,
        EDGE_COLOR
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="28" font-family="sans-serif" font-size="20" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        escape(&vis.title)
    );

    for edge in vis.graph.edges() {
        let (Some(a), Some(b)) = (vis.positions.get(&edge.source), vis.positions.get(&edge.target)) else {
            continue;
        };
        let (x1, y1) = project.apply(a);
        let (x2, y2) = project.apply(b);
        let _ = writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1" marker-end="url(#arrow)"/>"#,
            x1, y1, x2, y2, EDGE_COLOR
        );
    }

    for node in vis.graph.nodes() {
        let Some(point) = vis.positions.get(&node.id) else {
            continue;
        };
        let (x, y) = project.apply(point);
        let style = vis
            .styles
            .get(&node.kind)
            .copied()
            .unwrap_or_else(|| NodeKind::Other.style());
        let radius = style.size as f64 / 2.0;

        let _ = writeln!(
            svg,
            r##"<g><title>{} (line {})</title><circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" stroke="#333333" stroke-width="0.5"/>"##,
            escape(&node.node_type),
            node.line.map_or_else(|| "-".to_string(), |l| l.to_string()),
            x,
            y,
            radius,
            style.color
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="10" text-anchor="middle">{}</text></g>"#,
            x,
            y + radius + 11.0,
            escape(&node.label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Affine map from layout space onto the canvas, y pointing down.
struct Projection {
    min: (f64, f64),
    span: (f64, f64),
}

impl Projection {
    fn fit<'a>(points: impl Iterator<Item = &'a Point>) -> Self {
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if !min_x.is_finite() {
            return Self {
                min: (0.0, 0.0),
                span: (0.0, 0.0),
            };
        }
        Self {
            min: (min_x, min_y),
            span: (max_x - min_x, max_y - min_y),
        }
    }

    fn apply(&self, p: &Point) -> (f64, f64) {
        let inner_w = WIDTH - 2.0 * MARGIN;
        let inner_h = HEIGHT - 2.0 * MARGIN - TITLE_HEIGHT;
        let fx = if self.span.0 > f64::EPSILON {
            (p.x - self.min.0) / self.span.0
        } else {
            0.5
        };
        let fy = if self.span.1 > f64::EPSILON {
            (p.y - self.min.1) / self.span.1
        } else {
            0.5
        };
        (MARGIN + fx * inner_w, MARGIN + TITLE_HEIGHT + (1.0 - fy) * inner_h)
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

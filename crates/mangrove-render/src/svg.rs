use std::fmt::Write as _;

use crate::model::{Bounds, MapScene, SceneLink, SceneNode};

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Extra space around the content bounds.
    pub padding: f64,
    /// Optional opaque background rectangle (CSS color).
    pub background: Option<String>,
    /// Label font stack.
    pub font_family: String,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            padding: 50.0,
            background: None,
            font_family: "Inter, sans-serif".to_string(),
        }
    }
}

/// Renders one scene as a self-contained SVG document.
///
/// Links are emitted before nodes so boxes always paint on top, matching the
/// interactive z-order. All styling is inlined per element; the output needs
/// no stylesheet and survives rasterization as-is.
pub fn render_scene_svg(scene: &MapScene, options: &SvgRenderOptions) -> String {
    let bounds = scene.bounds.unwrap_or(Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 100.0,
        max_y: 100.0,
    });
    let pad = options.padding.max(0.0);
    let min_x = bounds.min_x - pad;
    let min_y = bounds.min_y - pad;
    let width = bounds.width() + pad * 2.0;
    let height = bounds.height() + pad * 2.0;

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{min_x} {min_y} {width} {height}" width="{width}" height="{height}">"#
    );

    if let Some(background) = &options.background {
        let _ = write!(
            out,
            r#"<rect x="{min_x}" y="{min_y}" width="{width}" height="{height}" fill="{}"/>"#,
            escape_xml_attr(background)
        );
    }

    for link in &scene.links {
        write_link(&mut out, link);
    }
    for node in &scene.nodes {
        write_node(&mut out, node, &options.font_family);
    }

    out.push_str("</svg>");
    out
}

/// Single-bend cubic between two node centers: both control points sit at the
/// horizontal midpoint, one per endpoint height.
pub fn link_path(link: &SceneLink) -> String {
    let (sx, sy) = (link.source_point.x, link.source_point.y);
    let (tx, ty) = (link.target_point.x, link.target_point.y);
    let mx = (sx + tx) / 2.0;
    format!("M {sx} {sy} C {mx} {sy}, {mx} {ty}, {tx} {ty}")
}

fn write_link(out: &mut String, link: &SceneLink) {
    let _ = write!(
        out,
        r#"<path class="link" d="{}" fill="none" stroke="{}" stroke-width="2" opacity="0.6"/>"#,
        link_path(link),
        link.color
    );
}

fn write_node(out: &mut String, node: &SceneNode, font_family: &str) {
    let is_root = node.depth == 0;
    let class = if is_root { "node root" } else { "node child" };
    let _ = write!(
        out,
        r#"<g class="{class}" id="node-{}" transform="translate({},{})">"#,
        escape_xml_attr(&node.id),
        node.position.x,
        node.position.y
    );

    let (fill, stroke) = if is_root {
        (node.color.as_str(), "none")
    } else {
        ("white", node.color.as_str())
    };
    let _ = write!(
        out,
        r#"<rect rx="20" ry="20" x="{}" y="{}" width="{}" height="{}" fill="{fill}" stroke="{stroke}" stroke-width="2"/>"#,
        -node.width / 2.0,
        -node.height / 2.0,
        node.width,
        node.height
    );

    let (font_size, text_fill, weight) = if is_root {
        (16.0, "white", r#" font-weight="bold""#)
    } else {
        (14.0, "#1f1f1f", "")
    };
    let _ = write!(
        out,
        r#"<text dy="0.35em" text-anchor="middle" font-family="{}" font-size="{font_size}" fill="{text_fill}"{weight}>{}</text>"#,
        escape_xml_attr(font_family),
        escape_xml_text(&node.label)
    );

    out.push_str("</g>");
}

fn escape_xml_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_xml_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

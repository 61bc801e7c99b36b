use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};
use crate::overlay::layer::{Align, TextBlock, Weight};

/// Shared system font database for SVG text.
pub(crate) fn svg_fontdb() -> Arc<usvg::fontdb::Database> {
    static DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts for svg text");
        Arc::new(db)
    })
    .clone()
}

/// Parse an SVG document with the shared font database.
pub(crate) fn parse_svg(src: &str) -> ReelResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb: svg_fontdb(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(src, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Rasterize `tree` stretched to `width x height`, premultiplied RGBA8.
pub(crate) fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> ReelResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ReelError::evaluation("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

/// SVG document drawing `block` in its own frame (origin at the frame's top-left).
///
/// Used when no font file is configured for the block's weight.
pub(crate) fn text_block_svg(block: &TextBlock, family: &str, stroke_width: f64) -> String {
    let w = block.frame.width().max(1.0);
    let h = block.frame.height().max(1.0);
    let (anchor, x) = match block.align {
        Align::Left => ("start", 0.0),
        Align::Center => ("middle", w / 2.0),
    };
    let weight = match block.weight {
        Weight::Bold => 700,
        Weight::Regular => 400,
    };
    let [r, g, b, a] = block.color;
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.2}" height="{h:.2}" viewBox="0 0 {w:.2} {h:.2}">"#
    );
    let _ = write!(
        svg,
        r#"<g font-family="{}, sans-serif" font-weight="{weight}" font-size="{:.2}" text-anchor="{anchor}" fill="rgb({r},{g},{b})" fill-opacity="{:.3}""#,
        escape_xml(family),
        block.size_px,
        f64::from(a) / 255.0
    );
    if let Some([sr, sg, sb, sa]) = block.stroke {
        let _ = write!(
            svg,
            r#" stroke="rgb({sr},{sg},{sb})" stroke-opacity="{:.3}" stroke-width="{stroke_width:.2}" stroke-linejoin="round" paint-order="stroke""#,
            f64::from(sa) / 255.0
        );
    }
    svg.push('>');
    for (i, line) in block.lines.iter().enumerate() {
        let baseline = block.line_height * i as f64 + baseline_offset(block);
        let _ = write!(
            svg,
            r#"<text x="{x:.2}" y="{baseline:.2}">{}</text>"#,
            escape_xml(line)
        );
    }
    svg.push_str("</g></svg>");
    svg
}

/// Distance from a line box top to its baseline.
fn baseline_offset(block: &TextBlock) -> f64 {
    (block.line_height - block.size_px) / 2.0 + block.size_px * 0.8
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg.rs"]
mod tests;

//! Metric text measurement for overlay layout.
//!
//! Builders must stay pure, so layout uses per-glyph-class advance factors instead of shaping.
//! The factors are calibrated to be conservative for common sans-serif display faces; the
//! rasterizer fits shaped glyphs into the measured frame.

use crate::foundation::core::{Point, Rect};
use crate::overlay::layer::{Align, TextBlock, Weight};

const LINE_HEIGHT: f64 = 1.2;
const BOLD_WIDEN: f64 = 1.06;

/// Horizontal advance of `c` as a fraction of the font size.
fn advance_factor(c: char) -> f64 {
    match c {
        ' ' => 0.28,
        'i' | 'l' | 'j' | '\'' | '.' | ',' | '!' | '|' | ':' | ';' => 0.30,
        'f' | 't' | 'r' | 'I' | '(' | ')' => 0.40,
        'm' | 'w' | 'M' | 'W' => 0.88,
        '0'..='9' => 0.60,
        c if c.is_ascii_uppercase() => 0.70,
        c if c.is_ascii() => 0.56,
        // Emoji, arrows and other symbols are drawn about one em wide.
        _ => 1.0,
    }
}

/// Width of a single line of text.
pub fn measure_line(text: &str, size_px: f64, weight: Weight) -> f64 {
    let widen = match weight {
        Weight::Bold => BOLD_WIDEN,
        Weight::Regular => 1.0,
    };
    text.chars().map(advance_factor).sum::<f64>() * size_px * widen
}

/// Greedy word wrap; words wider than `max_width` are split by character.
pub fn wrap(text: &str, size_px: f64, weight: Weight, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure_line(&candidate, size_px, weight) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if measure_line(word, size_px, weight) <= max_width {
            current = word.to_string();
            continue;
        }
        for c in word.chars() {
            current.push(c);
            if measure_line(&current, size_px, weight) > max_width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Keep the first `max_lines` lines, ending the last kept one in `…` within `max_width`.
pub fn truncate_lines(
    lines: &mut Vec<String>,
    max_lines: usize,
    size_px: f64,
    weight: Weight,
    max_width: f64,
) {
    if lines.len() <= max_lines {
        return;
    }
    lines.truncate(max_lines);
    let Some(last) = lines.last_mut() else {
        return;
    };
    let mut head = last.trim_end().to_string();
    loop {
        let candidate = format!("{head}…");
        if head.is_empty() || measure_line(&candidate, size_px, weight) <= max_width {
            *last = candidate;
            return;
        }
        head.pop();
        head.truncate(head.trim_end().len());
    }
}

/// Where a text block is anchored.
#[derive(Clone, Copy, Debug)]
pub enum Anchor {
    /// Top edge centered on the point.
    TopCenter(Point),
    /// Top-left corner at the point.
    TopLeft(Point),
    /// Block centered on the point.
    Center(Point),
}

/// Style inputs for [`layout_block`].
#[derive(Clone, Copy, Debug)]
pub struct TextStyle {
    /// Font size in canvas pixels.
    pub size_px: f64,
    /// Face weight.
    pub weight: Weight,
    /// Straight RGBA fill.
    pub color: [u8; 4],
    /// Optional stroke color.
    pub stroke: Option<[u8; 4]>,
}

/// Wrap `text` to `max_width` and place the result at `anchor`.
pub fn layout_block(text: &str, style: TextStyle, max_width: f64, anchor: Anchor) -> TextBlock {
    layout_block_capped(text, style, max_width, usize::MAX, anchor)
}

/// [`layout_block`] keeping at most `max_lines` lines; a cut ends in an ellipsis.
pub fn layout_block_capped(
    text: &str,
    style: TextStyle,
    max_width: f64,
    max_lines: usize,
    anchor: Anchor,
) -> TextBlock {
    let mut lines = wrap(text, style.size_px, style.weight, max_width);
    truncate_lines(&mut lines, max_lines, style.size_px, style.weight, max_width);
    let width = lines
        .iter()
        .map(|l| measure_line(l, style.size_px, style.weight))
        .fold(0.0, f64::max);
    let line_height = style.size_px * LINE_HEIGHT;
    let height = line_height * lines.len().max(1) as f64;
    let (origin, align) = match anchor {
        Anchor::TopCenter(p) => (Point::new(p.x - width / 2.0, p.y), Align::Center),
        Anchor::TopLeft(p) => (p, Align::Left),
        Anchor::Center(p) => (
            Point::new(p.x - width / 2.0, p.y - height / 2.0),
            Align::Center,
        ),
    };
    TextBlock {
        lines,
        size_px: style.size_px,
        weight: style.weight,
        color: style.color,
        stroke: style.stroke,
        align,
        frame: Rect::from_origin_size(origin, (width, height)),
        line_height,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/typography.rs"]
mod tests;

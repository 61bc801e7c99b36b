//! Overlay builders.
//!
//! Every builder is a pure function of owned inputs and the [`RenderConfig`]. Layout constants are
//! authored against the 1080x1920 reference canvas and scaled with [`RenderConfig::px`]. Each
//! builder validates its result against the safe zone before returning.

use std::time::Duration;

use crate::animation::ease::Ease;
use crate::foundation::core::{Point, Rect, Vec2};
use crate::foundation::error::ReelResult;
use crate::model::config::RenderConfig;
use crate::overlay::layer::{
    Appear, Layer, Motion, Node, NodeContent, OverlayKind, Shape, Weight, format_counter,
};
use crate::overlay::safe_zone::{self, pop_peak_scale};
use crate::overlay::stickers::StickerIcon;
use crate::overlay::typography::{
    Anchor, TextStyle, layout_block, layout_block_capped, measure_line,
};

const PLATE_ALPHA: u8 = 170;
const COUNT_UP: Duration = Duration::from_millis(900);

/// Lines kept from the hook headline.
pub const MAX_HOOK_LINES: usize = 3;

/// One counter row.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterItem {
    /// Final value.
    pub value: f64,
    /// Text before the number.
    pub prefix: String,
    /// Text after the number.
    pub suffix: String,
    /// Digits after the decimal point.
    pub decimals: usize,
    /// Icon shown left of the number.
    pub icon: StickerIcon,
}

/// One badge in a sticker stack.
#[derive(Clone, Debug, PartialEq)]
pub struct Badge {
    /// Icon shown left of the text.
    pub icon: StickerIcon,
    /// Badge text.
    pub text: String,
}

fn style(cfg: &RenderConfig, pt: f64, weight: Weight) -> TextStyle {
    TextStyle {
        size_px: cfg.px(pt),
        weight,
        color: cfg.brand.text,
        stroke: cfg.text_stroke.then_some(cfg.brand.stroke),
    }
}

fn plate_color(cfg: &RenderConfig) -> [u8; 4] {
    let [r, g, b, _] = cfg.brand.stroke;
    [r, g, b, PLATE_ALPHA]
}

fn shape(shape: Shape, fill: [u8; 4], motion: Motion) -> Node {
    Node::new(NodeContent::Shape { shape, fill }, motion)
}

fn pill(rect: Rect, fill: [u8; 4], motion: Motion) -> Node {
    shape(
        Shape::RoundedRect {
            rect,
            radius: rect.height() / 2.0,
        },
        fill,
        motion,
    )
}

fn sticker(icon: StickerIcon, rect: Rect, motion: Motion) -> Node {
    Node::new(NodeContent::Sticker { icon, rect }, motion)
}

/// Width available to content that pops, so the overshoot stays inside the safe zone.
fn pop_safe_width(cfg: &RenderConfig) -> f64 {
    cfg.safe_rect().width() / pop_peak_scale(cfg)
}

fn finish(layer: Layer, cfg: &RenderConfig) -> ReelResult<Layer> {
    safe_zone::validate(&layer, cfg)?;
    Ok(layer)
}

/// Opening headline on a translucent plate near the top of the safe zone.
pub fn hero_hook(text: &str, cfg: &RenderConfig) -> ReelResult<Layer> {
    let safe = cfg.safe_rect();
    let (pad_x, pad_y) = (cfg.px(28.0), cfg.px(18.0));
    let max_w = pop_safe_width(cfg) - 2.0 * pad_x - cfg.px(8.0);
    let top = Point::new(safe.center().x, safe.y0 + cfg.px(72.0));
    let block = layout_block_capped(
        text,
        style(cfg, cfg.typography.hook_pt, Weight::Bold),
        max_w,
        MAX_HOOK_LINES,
        Anchor::TopCenter(top),
    );
    let motion = Motion::appear(Appear::Pop);
    let plate = block.frame.inflate(pad_x, pad_y);
    let pivot = plate.center();

    let mut layer = Layer::new(OverlayKind::HeroHook);
    layer.push(shape(
        Shape::RoundedRect {
            rect: plate,
            radius: cfg.px(24.0),
        },
        plate_color(cfg),
        motion,
    ));
    let mut text = Node::new(NodeContent::Text(block), motion);
    text.pivot = pivot;
    layer.push(text);
    finish(layer, cfg)
}

/// Tinted call-to-action pill with an arrow, tilted slightly, above the bottom inset.
pub fn cta_sticker(text: &str, cfg: &RenderConfig) -> ReelResult<Layer> {
    let safe = cfg.safe_rect();
    let st = style(cfg, cfg.typography.cta_pt, Weight::Bold);
    let icon = st.size_px * 1.1;
    let gap = cfg.px(14.0);
    let (pad_x, pad_y) = (cfg.px(32.0), cfg.px(20.0));
    let max_text = pop_safe_width(cfg) * 0.8 - icon - gap - 2.0 * pad_x;

    let measured = layout_block(text, st, max_text, Anchor::TopLeft(Point::ZERO));
    let content_w = measured.frame.width() + gap + icon;
    let content_h = measured.frame.height().max(icon);
    let pill_h = content_h + 2.0 * pad_y;
    let pill_w = content_w + 2.0 * pad_x;
    let center = Point::new(safe.center().x, safe.y1 - cfg.px(96.0) - pill_h / 2.0);
    let rect = Rect::from_center_size(center, (pill_w, pill_h));
    let text_origin = Point::new(rect.x0 + pad_x, center.y - measured.frame.height() / 2.0);
    let block = layout_block(text, st, max_text, Anchor::TopLeft(text_origin));
    let icon_rect = Rect::from_origin_size(
        Point::new(block.frame.x1 + gap, center.y - icon / 2.0),
        (icon, icon),
    );

    let motion = Motion::appear(Appear::Pop);
    let tilt = -3.0;
    let mut layer = Layer::new(OverlayKind::Cta);
    let shadow = rect + Vec2::new(0.0, cfg.px(8.0));
    layer.push(pill(shadow, cfg.brand.shadow, motion).rotated(tilt, center));
    layer.push(pill(rect, cfg.brand.tint, motion).rotated(tilt, center));
    layer.push(Node::new(NodeContent::Text(block), motion).rotated(tilt, center));
    layer.push(sticker(StickerIcon::Arrow, icon_rect, motion).rotated(tilt, center));
    finish(layer, cfg)
}

/// Ingredient label with a leaf icon, left-aligned in the middle band.
pub fn ingredient_callout(text: &str, cfg: &RenderConfig) -> ReelResult<Layer> {
    let safe = cfg.safe_rect();
    let st = style(cfg, cfg.typography.ingredient_pt, Weight::Bold);
    let icon = st.size_px;
    let gap = cfg.px(12.0);
    let (pad_x, pad_y) = (cfg.px(24.0), cfg.px(16.0));
    let left = safe.x0 + cfg.px(24.0);
    let max_text = safe.x1 - cfg.px(24.0) - left - 2.0 * pad_x - icon - gap;
    let top = f64::from(cfg.canvas.height) * 0.5;

    let text_origin = Point::new(left + pad_x + icon + gap, top + pad_y);
    let block = layout_block(text, st, max_text, Anchor::TopLeft(text_origin));
    let plate = Rect::new(left, top, block.frame.x1 + pad_x, block.frame.y1 + pad_y);
    let icon_rect = Rect::from_origin_size(
        Point::new(left + pad_x, plate.center().y - icon / 2.0),
        (icon, icon),
    );

    let motion = Motion::appear(Appear::Rise {
        distance: cfg.px(40.0),
    });
    let mut layer = Layer::new(OverlayKind::IngredientCallout);
    layer.push(shape(
        Shape::RoundedRect {
            rect: plate,
            radius: cfg.px(18.0),
        },
        plate_color(cfg),
        motion,
    ));
    layer.push(sticker(StickerIcon::Leaf, icon_rect, motion));
    layer.push(Node::new(NodeContent::Text(block), motion));
    finish(layer, cfg)
}

/// Large numbered step text that rises into the lower-middle band.
pub fn step_text(text: &str, cfg: &RenderConfig) -> ReelResult<Layer> {
    let safe = cfg.safe_rect();
    let (pad_x, pad_y) = (cfg.px(28.0), cfg.px(18.0));
    let max_w = safe.width() - 2.0 * pad_x - cfg.px(8.0);
    let center = Point::new(safe.center().x, f64::from(cfg.canvas.height) * 0.6);
    let block = layout_block(
        text,
        style(cfg, cfg.typography.step_pt, Weight::Bold),
        max_w,
        Anchor::Center(center),
    );
    let motion = Motion::appear(Appear::Rise {
        distance: cfg.px(48.0),
    });
    let mut layer = Layer::new(OverlayKind::StepText);
    layer.push(shape(
        Shape::RoundedRect {
            rect: block.frame.inflate(pad_x, pad_y),
            radius: cfg.px(22.0),
        },
        plate_color(cfg),
        motion,
    ));
    layer.push(Node::new(NodeContent::Text(block), motion));
    finish(layer, cfg)
}

/// Labeled bar that fills linearly over `fill_over`.
pub fn progress_bar(label: &str, fill_over: Duration, cfg: &RenderConfig) -> ReelResult<Layer> {
    let safe = cfg.safe_rect();
    let inset = cfg.px(48.0);
    let bar_h = cfg.px(28.0);
    let track = Rect::new(
        safe.x0 + inset,
        safe.y1 - cfg.px(200.0) - bar_h,
        safe.x1 - inset,
        safe.y1 - cfg.px(200.0),
    );
    let st = style(cfg, cfg.typography.counter_pt, Weight::Bold);
    let icon = st.size_px;
    let label_top = track.y0 - cfg.px(20.0) - st.size_px * 1.2;
    let block = layout_block(
        label,
        st,
        track.width() - icon - cfg.px(12.0),
        Anchor::TopLeft(Point::new(track.x0 + icon + cfg.px(12.0), label_top)),
    );
    let icon_rect = Rect::from_origin_size(Point::new(track.x0, label_top), (icon, icon));

    let fade = Motion::appear(Appear::Fade);
    let mut layer = Layer::new(OverlayKind::ProgressBar);
    layer.push(pill(track, [255, 255, 255, 90], fade));
    layer.push(Node::new(
        NodeContent::ProgressFill {
            track,
            fill: cfg.brand.tint,
        },
        fade.with_tween(fill_over, Ease::Linear),
    ));
    layer.push(sticker(StickerIcon::Clock, icon_rect, fade));
    layer.push(Node::new(NodeContent::Text(block), fade));
    finish(layer, cfg)
}

/// Stat rows that pop in one after another and count up from zero.
pub fn counters(items: &[CounterItem], cfg: &RenderConfig) -> ReelResult<Layer> {
    let safe = cfg.safe_rect();
    let st = style(cfg, cfg.typography.counter_pt, Weight::Regular);
    let icon = st.size_px * 1.2;
    let gap = cfg.px(16.0);
    let (pad_x, pad_y) = (cfg.px(28.0), cfg.px(14.0));
    let row_h = icon.max(st.size_px * 1.2) + 2.0 * pad_y;
    let spacing = cfg.px(24.0);
    let total_h = items.len() as f64 * (row_h + spacing) - spacing;
    let mut top = f64::from(cfg.canvas.height) * 0.5 - total_h / 2.0;
    let max_text = pop_safe_width(cfg) - 2.0 * pad_x - icon - gap - cfg.px(8.0);

    let mut layer = Layer::new(OverlayKind::Counters);
    for (i, item) in items.iter().enumerate() {
        let text = format_counter(item.value, &item.prefix, &item.suffix, item.decimals);
        let text_w = measure_line(&text, st.size_px, st.weight).min(max_text);
        let row_w = text_w + icon + gap + 2.0 * pad_x;
        let row = Rect::new(
            safe.center().x - row_w / 2.0,
            top,
            safe.center().x + row_w / 2.0,
            top + row_h,
        );
        let block = layout_block(
            &text,
            st,
            max_text,
            Anchor::TopLeft(Point::new(
                row.x0 + pad_x + icon + gap,
                row.center().y - st.size_px * 0.6,
            )),
        );
        let icon_rect = Rect::from_origin_size(
            Point::new(row.x0 + pad_x, row.center().y - icon / 2.0),
            (icon, icon),
        );
        let motion = Motion::appear(Appear::Pop).delayed(cfg.animation.stagger() * i as u32);
        let pivot = row.center();
        layer.push(pill(row, plate_color(cfg), motion));
        layer.push(sticker(item.icon, icon_rect, motion).rotated(0.0, pivot));
        layer.push(
            Node::new(
                NodeContent::Counter {
                    value: item.value,
                    prefix: item.prefix.clone(),
                    suffix: item.suffix.clone(),
                    decimals: item.decimals,
                    block,
                },
                motion.with_tween(COUNT_UP, Ease::InOutCubic),
            )
            .rotated(0.0, pivot),
        );
        top += row_h + spacing;
    }
    finish(layer, cfg)
}

/// Tinted badges stacked in the upper band, alternately tilted, popping in with a stagger.
pub fn sticker_stack(badges: &[Badge], cfg: &RenderConfig) -> ReelResult<Layer> {
    let safe = cfg.safe_rect();
    let st = style(cfg, cfg.typography.cta_pt, Weight::Bold);
    let icon = st.size_px * 1.2;
    let gap = cfg.px(14.0);
    let (pad_x, pad_y) = (cfg.px(30.0), cfg.px(18.0));
    let max_text = pop_safe_width(cfg) * 0.7 - icon - gap - 2.0 * pad_x;
    let spacing = cfg.px(170.0);

    let mut layer = Layer::new(OverlayKind::StickerStack);
    for (i, badge) in badges.iter().enumerate() {
        let measured = layout_block(&badge.text, st, max_text, Anchor::TopLeft(Point::ZERO));
        let w = measured.frame.width() + icon + gap + 2.0 * pad_x;
        let h = measured.frame.height().max(icon) + 2.0 * pad_y;
        let center = Point::new(safe.center().x, safe.y0 + cfg.px(200.0) + i as f64 * spacing);
        let rect = Rect::from_center_size(center, (w, h));
        let block = layout_block(
            &badge.text,
            st,
            max_text,
            Anchor::TopLeft(Point::new(
                rect.x0 + pad_x + icon + gap,
                center.y - measured.frame.height() / 2.0,
            )),
        );
        let icon_rect =
            Rect::from_origin_size(Point::new(rect.x0 + pad_x, center.y - icon / 2.0), (icon, icon));
        let tilt = if i % 2 == 0 { -6.0 } else { 6.0 };
        let motion = Motion::appear(Appear::Pop).delayed(cfg.animation.stagger() * i as u32);
        layer.push(
            pill(rect + Vec2::new(0.0, cfg.px(8.0)), cfg.brand.shadow, motion).rotated(tilt, center),
        );
        layer.push(pill(rect, cfg.brand.tint, motion).rotated(tilt, center));
        layer.push(sticker(badge.icon, icon_rect, motion).rotated(tilt, center));
        layer.push(Node::new(NodeContent::Text(block), motion).rotated(tilt, center));
    }
    finish(layer, cfg)
}

/// Fixed picture-in-picture circle marking where the creator's camera feed goes.
pub fn pip_placeholder(cfg: &RenderConfig) -> ReelResult<Layer> {
    let safe = cfg.safe_rect();
    let r = cfg.px(150.0);
    let margin = cfg.px(12.0);
    let center = Point::new(safe.x1 - r - margin, safe.y0 + cfg.px(440.0));
    let fade = Motion::appear(Appear::Fade);

    let mut layer = Layer::new(OverlayKind::PipPlaceholder);
    layer.push(shape(
        Shape::Circle { center, radius: r },
        [0, 0, 0, 120],
        fade,
    ));
    layer.push(sticker(
        StickerIcon::Person,
        Rect::from_center_size(center + Vec2::new(0.0, r * 0.1), (r * 1.3, r * 1.3)),
        fade,
    ));
    layer.push(shape(
        Shape::Ring {
            center,
            radius: r,
            width: cfg.px(8.0),
        },
        cfg.brand.text,
        fade,
    ));
    finish(layer, cfg)
}

/// Up to three ingredient tags, tilted and offset into a loose cluster.
pub fn tag_cluster(tags: &[String], cfg: &RenderConfig) -> ReelResult<Layer> {
    const TILTS: [f64; 3] = [-8.0, 5.0, -4.0];
    let safe = cfg.safe_rect();
    let st = style(cfg, cfg.typography.ingredient_pt, Weight::Bold);
    let icon = st.size_px;
    let gap = cfg.px(12.0);
    let (pad_x, pad_y) = (cfg.px(24.0), cfg.px(14.0));
    let max_text = safe.width() * 0.55;
    let offset = cfg.px(90.0);

    let mut layer = Layer::new(OverlayKind::TagCluster);
    for (i, tag) in tags.iter().take(TILTS.len()).enumerate() {
        let measured = layout_block(tag, st, max_text, Anchor::TopLeft(Point::ZERO));
        let w = measured.frame.width() + icon + gap + 2.0 * pad_x;
        let h = measured.frame.height().max(icon) + 2.0 * pad_y;
        let dx = if i % 2 == 0 { -offset } else { offset };
        let center = Point::new(
            safe.center().x + dx,
            f64::from(cfg.canvas.height) * 0.55 + i as f64 * cfg.px(150.0),
        );
        let rect = Rect::from_center_size(center, (w, h));
        let block = layout_block(
            tag,
            st,
            max_text,
            Anchor::TopLeft(Point::new(
                rect.x0 + pad_x + icon + gap,
                center.y - measured.frame.height() / 2.0,
            )),
        );
        let icon_rect =
            Rect::from_origin_size(Point::new(rect.x0 + pad_x, center.y - icon / 2.0), (icon, icon));
        let motion = Motion::appear(Appear::Pop).delayed(cfg.animation.stagger() * i as u32);
        let tilt = TILTS[i];
        layer.push(pill(rect, plate_color(cfg), motion).rotated(tilt, center));
        layer.push(sticker(StickerIcon::Leaf, icon_rect, motion).rotated(tilt, center));
        layer.push(Node::new(NodeContent::Text(block), motion).rotated(tilt, center));
    }
    finish(layer, cfg)
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/factory.rs"]
mod tests;

use std::collections::HashMap;
use std::time::Duration;

use vello_cpu::kurbo::Shape as _;

use crate::assets::fonts::{FontBook, LoadedFont, TextBrushRgba8, TextLayoutEngine};
use crate::assets::svg::{parse_svg, rasterize_svg_to_premul_rgba8, text_block_svg};
use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::ReelResult;
use crate::model::config::{AnimationTiming, RenderConfig};
use crate::overlay::anim::node_state;
use crate::overlay::layer::{Layer, NodeContent, Shape, TextBlock, format_counter};
use crate::overlay::stickers::StickerIcon;
use crate::render::cpu::{affine_to_cpu, color, draw_image, image_paint, point_to_cpu, rect_to_cpu};

/// Text stroke width as a fraction of the font size.
const TEXT_STROKE_RATIO: f64 = 0.08;
/// Entries kept per raster cache before it is flushed.
const MAX_CACHE_ENTRIES: usize = 256;
const STROKE_DIRECTIONS: [(f32, f32); 8] = [
    (1.0, 0.0),
    (0.707, 0.707),
    (0.0, 1.0),
    (-0.707, 0.707),
    (-1.0, 0.0),
    (-0.707, -0.707),
    (0.0, -1.0),
    (0.707, -0.707),
];

#[derive(Clone)]
struct RasterPaint {
    paint: vello_cpu::Image,
    width: u32,
    height: u32,
}

struct GlyphRun {
    font_size: f32,
    glyphs: Vec<vello_cpu::Glyph>,
}

/// Draws overlay layers with `vello_cpu` at an overlay-local time.
///
/// Text uses the configured font files through Parley; weights without a file fall back to
/// SVG text with system fonts. Sticker icons and fallback text are rasterized once per size.
pub(crate) struct OverlayRenderer {
    timing: AnimationTiming,
    fonts: FontBook,
    shaper: TextLayoutEngine,
    layouts: HashMap<String, Vec<GlyphRun>>,
    stickers: HashMap<(StickerIcon, u32, u32), RasterPaint>,
    svg_text: HashMap<String, RasterPaint>,
}

impl OverlayRenderer {
    pub(crate) fn new(cfg: &RenderConfig) -> ReelResult<Self> {
        Ok(Self {
            timing: cfg.animation,
            fonts: FontBook::load(&cfg.fonts)?,
            shaper: TextLayoutEngine::new(),
            layouts: HashMap::new(),
            stickers: HashMap::new(),
            svg_text: HashMap::new(),
        })
    }

    /// Draw `layer` as it appears `local` into a window of length `window`.
    pub(crate) fn draw_layer(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        layer: &Layer,
        local: Duration,
        window: Duration,
    ) -> ReelResult<()> {
        for node in &layer.nodes {
            let state = node_state(&node.motion, local, window, layer.fade_out, &self.timing);
            if state.is_hidden() {
                continue;
            }
            let pivot = node.pivot.to_vec2();
            let xf = Affine::translate(state.offset)
                * Affine::translate(pivot)
                * Affine::scale(state.scale)
                * Affine::translate(-pivot)
                * node.rest_transform();

            let opacity = state.opacity.clamp(0.0, 1.0) as f32;
            if opacity < 1.0 {
                ctx.push_opacity_layer(opacity);
            }
            self.draw_content(ctx, &node.content, xf, state.progress)?;
            if opacity < 1.0 {
                ctx.pop_layer();
            }
        }
        Ok(())
    }

    fn draw_content(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        content: &NodeContent,
        xf: Affine,
        progress: f64,
    ) -> ReelResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        match content {
            NodeContent::Shape { shape, fill } => {
                ctx.set_transform(affine_to_cpu(xf));
                ctx.set_paint(color(*fill));
                draw_shape(ctx, shape);
            }
            NodeContent::Text(block) => self.draw_text(ctx, block, xf)?,
            NodeContent::Sticker { icon, rect } => {
                let r = self.sticker_paint(*icon, *rect)?;
                let place = fit_raster(*rect, &r);
                draw_image(
                    ctx,
                    r.paint,
                    f64::from(r.width),
                    f64::from(r.height),
                    xf * place,
                    1.0,
                );
            }
            NodeContent::Counter {
                value,
                prefix,
                suffix,
                decimals,
                block,
            } => {
                let mut shown = block.clone();
                shown.lines = vec![format_counter(value * progress, prefix, suffix, *decimals)];
                self.draw_text(ctx, &shown, xf)?;
            }
            NodeContent::ProgressFill { track, fill } => {
                let w = track.width() * progress.clamp(0.0, 1.0);
                if w > 0.0 {
                    let bar = Rect::new(track.x0, track.y0, track.x0 + w, track.y1);
                    ctx.set_transform(affine_to_cpu(xf));
                    ctx.set_paint(color(*fill));
                    draw_shape(
                        ctx,
                        &Shape::RoundedRect {
                            rect: bar,
                            radius: (track.height() / 2.0).min(w / 2.0),
                        },
                    );
                }
            }
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        block: &TextBlock,
        xf: Affine,
    ) -> ReelResult<()> {
        let origin = xf * Affine::translate(block.frame.origin().to_vec2());
        let stroke_width = block.size_px * TEXT_STROKE_RATIO;
        let Some(font) = self.fonts.font(block.weight).cloned() else {
            let family = self.fonts.family(block.weight).to_string();
            let svg = text_block_svg(block, &family, stroke_width);
            let r = self.svg_text_paint(svg, block.frame)?;
            let place = fit_raster(block.frame, &r);
            draw_image(
                ctx,
                r.paint,
                f64::from(r.width),
                f64::from(r.height),
                xf * place,
                1.0,
            );
            return Ok(());
        };

        let runs = self.shaped(block, &font)?;
        ctx.set_transform(affine_to_cpu(origin));
        if let Some(stroke) = block.stroke {
            ctx.set_paint(color(stroke));
            let sw = stroke_width as f32;
            for (dx, dy) in STROKE_DIRECTIONS {
                fill_runs(ctx, &font, runs, dx * sw, dy * sw);
            }
        }
        ctx.set_paint(color(block.color));
        fill_runs(ctx, &font, runs, 0.0, 0.0);
        Ok(())
    }

    fn shaped(&mut self, block: &TextBlock, font: &LoadedFont) -> ReelResult<&[GlyphRun]> {
        let key = format!(
            "{:?}|{:.3}|{:.3}|{:?}|{}",
            block.weight,
            block.size_px,
            block.frame.width(),
            block.align,
            block.text()
        );
        if !self.layouts.contains_key(&key) {
            if self.layouts.len() >= MAX_CACHE_ENTRIES {
                self.layouts.clear();
            }
            let layout = self.shaper.layout_lines(
                &block.text(),
                font.bytes.as_slice(),
                block.size_px as f32,
                TextBrushRgba8::from(block.color),
                block.frame.width() as f32,
                block.align,
            )?;
            let mut runs = Vec::new();
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    runs.push(GlyphRun {
                        font_size: run.run().font_size(),
                        glyphs: run
                            .glyphs()
                            .map(|g| vello_cpu::Glyph {
                                id: g.id,
                                x: g.x,
                                y: g.y,
                            })
                            .collect(),
                    });
                }
            }
            self.layouts.insert(key.clone(), runs);
        }
        Ok(self.layouts.get(&key).map(Vec::as_slice).unwrap_or_default())
    }

    fn sticker_paint(&mut self, icon: StickerIcon, rect: Rect) -> ReelResult<RasterPaint> {
        let (w, h) = raster_dims(rect);
        if let Some(r) = self.stickers.get(&(icon, w, h)) {
            return Ok(r.clone());
        }
        let tree = parse_svg(icon.svg())?;
        let r = RasterPaint {
            paint: image_paint(&rasterize_svg_to_premul_rgba8(&tree, w, h)?, w, h)?,
            width: w,
            height: h,
        };
        if self.stickers.len() >= MAX_CACHE_ENTRIES {
            self.stickers.clear();
        }
        self.stickers.insert((icon, w, h), r.clone());
        Ok(r)
    }

    fn svg_text_paint(&mut self, svg: String, frame: Rect) -> ReelResult<RasterPaint> {
        if let Some(r) = self.svg_text.get(&svg) {
            return Ok(r.clone());
        }
        let (w, h) = raster_dims(frame);
        let tree = parse_svg(&svg)?;
        let r = RasterPaint {
            paint: image_paint(&rasterize_svg_to_premul_rgba8(&tree, w, h)?, w, h)?,
            width: w,
            height: h,
        };
        if self.svg_text.len() >= MAX_CACHE_ENTRIES {
            self.svg_text.clear();
        }
        self.svg_text.insert(svg, r.clone());
        Ok(r)
    }
}

fn draw_shape(ctx: &mut vello_cpu::RenderContext, shape: &Shape) {
    match *shape {
        Shape::RoundedRect { rect, radius } => {
            let rr = vello_cpu::kurbo::RoundedRect::from_rect(rect_to_cpu(rect), radius);
            ctx.fill_path(&rr.to_path(0.1));
        }
        Shape::Circle { center, radius } => {
            let c = vello_cpu::kurbo::Circle::new(point_to_cpu(center), radius);
            ctx.fill_path(&c.to_path(0.1));
        }
        Shape::Ring {
            center,
            radius,
            width,
        } => {
            let c = vello_cpu::kurbo::Circle::new(point_to_cpu(center), radius - width / 2.0);
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
            ctx.stroke_path(&c.to_path(0.1));
        }
    }
}

fn fill_runs(
    ctx: &mut vello_cpu::RenderContext,
    font: &LoadedFont,
    runs: &[GlyphRun],
    dx: f32,
    dy: f32,
) {
    for run in runs {
        let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: g.x + dx,
            y: g.y + dy,
        });
        ctx.glyph_run(&font.data)
            .font_size(run.font_size)
            .fill_glyphs(glyphs);
    }
}

/// Whole-pixel raster size covering `rect`.
fn raster_dims(rect: Rect) -> (u32, u32) {
    (
        rect.width().ceil().max(1.0) as u32,
        rect.height().ceil().max(1.0) as u32,
    )
}

/// Map a raster's pixel box onto `rect`.
fn fit_raster(rect: Rect, r: &RasterPaint) -> Affine {
    Affine::translate(rect.origin().to_vec2())
        * Affine::scale_non_uniform(
            rect.width() / f64::from(r.width),
            rect.height() / f64::from(r.height),
        )
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay_raster.rs"]
mod tests;

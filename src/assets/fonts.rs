use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};
use crate::model::config::{FontChoice, FontConfig};
use crate::overlay::layer::{Align, Weight};

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    /// Red channel.
    pub(crate) r: u8,
    /// Green channel.
    pub(crate) g: u8,
    /// Blue channel.
    pub(crate) b: u8,
    /// Alpha channel.
    pub(crate) a: u8,
}

impl From<[u8; 4]> for TextBrushRgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// Font file loaded for one weight.
#[derive(Clone, Debug)]
pub(crate) struct LoadedFont {
    /// Raw font file bytes.
    pub(crate) bytes: Arc<Vec<u8>>,
    /// Font handle for `vello_cpu` glyph runs.
    pub(crate) data: vello_cpu::peniko::FontData,
}

/// Bold and regular fonts for overlay text.
///
/// Weights without a configured file render through the SVG text path with system fonts.
#[derive(Clone, Debug, Default)]
pub(crate) struct FontBook {
    bold: Option<LoadedFont>,
    regular: Option<LoadedFont>,
    bold_family: String,
    regular_family: String,
}

impl FontBook {
    /// Read the font files named in `cfg`.
    pub(crate) fn load(cfg: &FontConfig) -> ReelResult<Self> {
        Ok(Self {
            bold: load_choice(&cfg.bold)?,
            regular: load_choice(&cfg.regular)?,
            bold_family: cfg.bold.family.clone(),
            regular_family: cfg.regular.family.clone(),
        })
    }

    /// Loaded font for `weight`, if a file was configured.
    pub(crate) fn font(&self, weight: Weight) -> Option<&LoadedFont> {
        match weight {
            Weight::Bold => self.bold.as_ref(),
            Weight::Regular => self.regular.as_ref(),
        }
    }

    /// Family name for `weight`, used by the SVG fallback.
    pub(crate) fn family(&self, weight: Weight) -> &str {
        match weight {
            Weight::Bold => &self.bold_family,
            Weight::Regular => &self.regular_family,
        }
    }
}

fn load_choice(choice: &FontChoice) -> ReelResult<Option<LoadedFont>> {
    let Some(path) = choice.path.as_deref() else {
        return Ok(None);
    };
    let bytes = read_font(path)?;
    let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.clone()), 0);
    Ok(Some(LoadedFont {
        bytes: Arc::new(bytes),
        data,
    }))
}

fn read_font(path: &Path) -> ReelResult<Vec<u8>> {
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    if bytes.is_empty() {
        return Err(ReelError::validation(format!(
            "font file '{}' is empty",
            path.display()
        )));
    }
    Ok(bytes)
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape pre-wrapped `text` (lines separated by `\n`) and align it within `width_px`.
    pub(crate) fn layout_lines(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: TextBrushRgba8,
        width_px: f32,
        align: Align,
    ) -> ReelResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ReelError::validation("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::validation("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        let alignment = match align {
            Align::Left => parley::Alignment::Start,
            Align::Center => parley::Alignment::Center,
        };
        layout.align(
            Some(width_px),
            alignment,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;

use smallvec::SmallVec;

use crate::effects::blur::gaussian_blur;
use crate::effects::color::{apply_color_matrix, apply_color_matrix_in_place, color_pop_matrix};
use crate::effects::mask::{circular_mask, circular_mask_in_place, wipe_radius};
use crate::effects::raster::Raster;
use crate::effects::resample::{PanDirection, pan_zoom, pan_zoom_into};
use crate::foundation::core::Point;
use crate::foundation::error::{ReelError, ReelResult};

/// Contrast boost of the "after" color pop.
pub const COLOR_POP_CONTRAST: f32 = 0.1;
/// Saturation boost of the "after" color pop.
pub const COLOR_POP_SATURATION: f32 = 0.08;
/// Final zoom of the Ken Burns move.
pub const PAN_ZOOM_END_SCALE: f64 = 1.08;

/// One image effect, evaluated as `(raster, progress) -> raster`.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Gaussian blur; grows the extent by the radius before clamping.
    Blur {
        /// Radius in output pixels.
        radius_px: u32,
    },
    /// Contrast and saturation boost.
    ColorPop {
        /// Added contrast.
        contrast: f32,
        /// Added saturation.
        saturation: f32,
    },
    /// Zoom ramp with a horizontal pan.
    PanZoom {
        /// Scale at progress 0.
        from_scale: f64,
        /// Scale at progress 1.
        to_scale: f64,
        /// Pan direction.
        direction: PanDirection,
    },
    /// Circular reveal mask.
    CircularWipe {
        /// Mask center as fractions of the extent (`(0, 0)` is top-left).
        origin: Point,
        /// Progress at which the mask uncovers the whole extent.
        reveal_until: f64,
    },
}

impl Effect {
    /// Blur with the given radius.
    pub fn blur(radius_px: u32) -> Self {
        Self::Blur { radius_px }
    }

    /// Standard color pop for finished-dish shots.
    pub fn color_pop() -> Self {
        Self::ColorPop {
            contrast: COLOR_POP_CONTRAST,
            saturation: COLOR_POP_SATURATION,
        }
    }

    /// Standard 1.0 -> 1.08 Ken Burns move for the item at `index`.
    pub fn pan_zoom(index: usize) -> Self {
        Self::PanZoom {
            from_scale: 1.0,
            to_scale: PAN_ZOOM_END_SCALE,
            direction: PanDirection::for_index(index),
        }
    }

    /// Circular reveal from `origin` completing at `reveal_until`.
    pub fn circular_wipe(origin: Point, reveal_until: f64) -> Self {
        Self::CircularWipe {
            origin,
            reveal_until,
        }
    }

    /// Stable name used in plan fingerprints and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blur { .. } => "blur",
            Self::ColorPop { .. } => "color_pop",
            Self::PanZoom { .. } => "pan_zoom",
            Self::CircularWipe { .. } => "circular_wipe",
        }
    }

    /// Return `true` when the output depends on progress.
    pub fn is_time_dependent(&self) -> bool {
        matches!(self, Self::PanZoom { .. } | Self::CircularWipe { .. })
    }

    /// Reject parameters that would expose raster edges or divide by zero.
    pub fn validate(&self) -> ReelResult<()> {
        match *self {
            Self::Blur { .. } => Ok(()),
            Self::ColorPop {
                contrast,
                saturation,
            } => {
                if !contrast.is_finite() || !saturation.is_finite() {
                    return Err(ReelError::validation("color pop amounts must be finite"));
                }
                Ok(())
            }
            Self::PanZoom {
                from_scale,
                to_scale,
                ..
            } => {
                if !(from_scale >= 1.0 && to_scale >= 1.0) {
                    return Err(ReelError::validation("pan/zoom scales must be >= 1"));
                }
                Ok(())
            }
            Self::CircularWipe {
                origin,
                reveal_until,
            } => {
                if !(0.0..=1.0).contains(&origin.x) || !(0.0..=1.0).contains(&origin.y) {
                    return Err(ReelError::validation("wipe origin must lie inside the extent"));
                }
                if !(reveal_until > 0.0 && reveal_until <= 1.0) {
                    return Err(ReelError::validation("wipe reveal_until must be in (0, 1]"));
                }
                Ok(())
            }
        }
    }

    /// Evaluate on `src` at `progress`. The result is not yet clamped.
    pub fn apply(&self, src: &Raster, progress: f64) -> ReelResult<Raster> {
        let p = progress.clamp(0.0, 1.0);
        match *self {
            Self::Blur { radius_px } => gaussian_blur(src, radius_px),
            Self::ColorPop {
                contrast,
                saturation,
            } => Ok(apply_color_matrix(
                src,
                &color_pop_matrix(contrast, saturation),
            )),
            Self::PanZoom {
                from_scale,
                to_scale,
                direction,
            } => {
                let scale = from_scale + (to_scale - from_scale) * p;
                pan_zoom(src, scale, direction, p)
            }
            Self::CircularWipe {
                origin,
                reveal_until,
            } => {
                if p >= reveal_until {
                    return Ok(src.clone());
                }
                let center = Point::new(
                    origin.x * f64::from(src.width),
                    origin.y * f64::from(src.height),
                );
                let radius = wipe_radius(center, src.width, src.height, p, reveal_until);
                Ok(circular_mask(src, center, radius))
            }
        }
    }

    /// Evaluate on `cur` and clamp back to its extent.
    ///
    /// `scratch` is a second buffer of `cur`'s byte length; resampling effects swap it with
    /// `cur`'s pixels. Only blur allocates.
    pub(crate) fn apply_in_place(
        &self,
        cur: &mut Raster,
        scratch: &mut Vec<u8>,
        progress: f64,
    ) -> ReelResult<()> {
        let p = progress.clamp(0.0, 1.0);
        let (w, h) = (cur.width, cur.height);
        match *self {
            Self::Blur { radius_px } => {
                *cur = gaussian_blur(cur, radius_px)?.clamp_to(w, h)?;
            }
            Self::ColorPop {
                contrast,
                saturation,
            } => apply_color_matrix_in_place(cur, &color_pop_matrix(contrast, saturation)),
            Self::PanZoom {
                from_scale,
                to_scale,
                direction,
            } => {
                if scratch.len() != cur.data.len() {
                    scratch.resize(cur.data.len(), 0);
                }
                let scale = from_scale + (to_scale - from_scale) * p;
                pan_zoom_into(cur, scratch, scale, direction, p);
                std::mem::swap(&mut cur.data, scratch);
            }
            Self::CircularWipe {
                origin,
                reveal_until,
            } => {
                if p < reveal_until {
                    let center = Point::new(origin.x * f64::from(w), origin.y * f64::from(h));
                    let radius = wipe_radius(center, w, h, p, reveal_until);
                    circular_mask_in_place(cur, center, radius);
                }
            }
        }
        Ok(())
    }
}

/// Ordered effects applied to one track item.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectChain {
    effects: SmallVec<[Effect; 3]>,
}

impl EffectChain {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an effect.
    pub fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Effects in order.
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Return `true` when the chain has no effects.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Validate every effect.
    pub fn validate(&self) -> ReelResult<()> {
        self.effects.iter().try_for_each(Effect::validate)
    }

    /// Number of leading effects whose output ignores progress.
    pub fn static_prefix_len(&self) -> usize {
        self.effects
            .iter()
            .take_while(|e| !e.is_time_dependent())
            .count()
    }

    /// Evaluate the whole chain at `progress`.
    pub fn apply(&self, input: &Raster, progress: f64) -> ReelResult<Raster> {
        self.apply_range(input, 0, progress)
    }

    /// Evaluate the effects from `start` on, with `input` holding the output of the earlier ones.
    ///
    /// Each effect's output is clamped to the input extent before the next effect sees it.
    pub fn apply_range(&self, input: &Raster, start: usize, progress: f64) -> ReelResult<Raster> {
        let mut cur = input.clone();
        let mut scratch = Vec::new();
        self.apply_range_in_place(&mut cur, start, progress, &mut scratch)?;
        Ok(cur)
    }

    /// [`EffectChain::apply_range`] over `cur`, which holds the input and receives the result.
    pub(crate) fn apply_range_in_place(
        &self,
        cur: &mut Raster,
        start: usize,
        progress: f64,
        scratch: &mut Vec<u8>,
    ) -> ReelResult<()> {
        let (w, h) = (cur.width, cur.height);
        if !cur.matches_extent(w, h) {
            *cur = std::mem::replace(cur, Raster::transparent(0, 0)?).clamp_to(w, h)?;
        }
        for effect in self.effects.iter().skip(start) {
            effect.apply_in_place(cur, scratch, progress)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/fx.rs"]
mod tests;

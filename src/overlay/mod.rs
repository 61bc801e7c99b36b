//! Animated text and sticker overlays.

pub(crate) mod anim;
pub mod factory;
pub(crate) mod layer;
pub(crate) mod safe_zone;
pub(crate) mod stickers;
pub(crate) mod typography;

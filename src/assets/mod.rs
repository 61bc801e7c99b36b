//! Still decoding, fonts, SVG rasterization and clip access.

pub(crate) mod decode;
pub(crate) mod fonts;
pub(crate) mod media;
pub(crate) mod svg;

//! Per-frame image effects over premultiplied RGBA8 rasters.

pub(crate) mod blur;
pub(crate) mod color;
pub(crate) mod composite;
pub(crate) mod fx;
pub(crate) mod mask;
pub(crate) mod raster;
pub(crate) mod resample;

//! Frame production: per-item writers, overlay rasterization and compositing.

pub(crate) mod clip;
pub(crate) mod compositor;
pub(crate) mod cpu;
pub(crate) mod frame;
pub(crate) mod frame_writer;
pub(crate) mod overlay_raster;
pub(crate) mod pool;

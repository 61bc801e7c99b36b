//! Frame sinks, the `ffmpeg` backend and the size-budgeted exporter.

pub(crate) mod exporter;
pub(crate) mod ffmpeg;
pub(crate) mod sink;

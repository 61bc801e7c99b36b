//! snapreel turns a recipe plus a few photos or clips into a short vertical video.
//!
//! A render follows one of five fixed layout templates and runs as a straight pipeline:
//!
//! 1. **Plan**: `(Template, Recipe, MediaBundle, RenderConfig) -> RenderPlan` (base track items,
//!    timed overlays, audio, total duration). Planning validates media, recipe, duration and
//!    safe zones, and fails before any pixel work.
//! 2. **Composite**: `RenderPlan -> FrameRGBA*` at the configured frame rate. Track items are
//!    evaluated through their effect chains, crossfaded or revealed over each other, and overlays
//!    are animated on their own local clocks.
//! 3. **Export**: frames stream into the system `ffmpeg` binary under a soft/hard size budget with
//!    one automatic downgrade retry.
//!
//! [`RenderEngine`] runs all three for a [`RenderRequest`] and adds the share caption, a time
//! budget, cancellation and a one-render-per-context guard.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs and seeds give structurally identical plans.
//! - **No IO in planning**: media is decoded by the caller before a request.
//! - **Premultiplied RGBA8** end-to-end until the encoder flattens onto the background.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod caption;
mod effects;
mod encode;
mod foundation;
mod model;
mod overlay;
mod planner;
mod render;
mod session;

pub use animation::ease::Ease;
pub use animation::spring::Spring;
pub use assets::decode::StillImage;
pub use assets::media::{ClipInfo, clip_source_time, decode_clip_frames_rgba8, probe_clip};
pub use caption::{HASHTAG_POOL, LEAD_HASHTAG, caption, hashtags};
pub use effects::composite::{crossfade_over_in_place, over_in_place};
pub use effects::fx::{Effect, EffectChain};
pub use effects::mask::{circular_mask, wipe_radius};
pub use effects::raster::Raster;
pub use effects::resample::{Fit, PanDirection};
pub use encode::exporter::{EncodeBackend, EncodeParams, ExportReport, ExportSettings, Exporter};
pub use encode::ffmpeg::{FfmpegBackend, FfmpegSink, is_ffmpeg_on_path};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::cancel::CancelToken;
pub use foundation::core::{
    Canvas, Fps, FrameIndex, FrameRange, Point, REFERENCE_WIDTH, Rgba8Premul, TimeRange,
    Transform2D, Vec2, secs,
};
pub use foundation::error::{ReelError, ReelResult};
pub use model::config::{
    AnimationTiming, BrandColors, FontChoice, FontConfig, MIN_SIDE_MARGIN_PX, MIN_VERTICAL_FRACTION,
    RenderConfig, SafeInsets, SafeZone, Typography,
};
pub use model::media::{AudioRef, ClipRef, MediaBundle, MediaField};
pub use model::plan::{
    ItemSummary, Overlay, OverlayBuilder, OverlaySummary, PlanSummary, RenderPlan, TrackItem,
    TrackSource, Transition,
};
pub use model::recipe::{Recipe, RecipeStep, format_dollars};
pub use overlay::factory;
pub use overlay::layer::{Layer, OverlayKind};
pub use overlay::stickers::StickerIcon;
pub use planner::beat::{BeatStrategy, ExplicitBeats, FixedIntervalBeats};
pub use planner::text::{
    MAX_CALLOUT_CHARS, MAX_STEP_WORDS, callout_text, callouts, cta_text, hook_text, step_body,
    step_texts,
};
pub use planner::{Planner, Template, plan};
pub use render::compositor::{CompositeStats, Compositor};
pub use render::frame::FrameRGBA;
pub use session::render_session::{
    RenderEngine, RenderHandle, RenderOutput, RenderRequest, RenderStats, SessionOpts,
};

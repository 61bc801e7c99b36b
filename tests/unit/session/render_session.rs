use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::assets::decode::StillImage;
use crate::encode::exporter::{EncodeBackend, EncodeParams, ExportSettings};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8Premul};
use crate::model::recipe::RecipeStep;
use crate::render::frame::FrameRGBA;

#[derive(Clone, Default)]
struct CountingBackend {
    opens: Arc<AtomicUsize>,
}

struct CountingSink {
    out: PathBuf,
    frames: usize,
}

impl FrameSink for CountingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ReelResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRGBA) -> ReelResult<()> {
        self.frames += 1;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        std::fs::write(&self.out, vec![0u8; self.frames])
            .map_err(|e| ReelError::encoding(e.to_string()))
    }
}

impl EncodeBackend for CountingBackend {
    fn open(&self, out: &Path, _params: &EncodeParams) -> ReelResult<Box<dyn FrameSink>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingSink {
            out: out.to_path_buf(),
            frames: 0,
        }))
    }

    fn reencode(&self, _input: &Path, out: &Path, _params: &EncodeParams) -> ReelResult<()> {
        std::fs::write(out, b"small").map_err(|e| ReelError::encoding(e.to_string()))
    }
}

fn engine(backend: CountingBackend) -> RenderEngine {
    RenderEngine::new(
        Planner::new(),
        Exporter::with_backend(backend, ExportSettings::default()),
        SessionOpts::default(),
    )
}

fn still(v: u8) -> StillImage {
    StillImage::solid(9, 16, Rgba8Premul::from_straight_rgba(v, v / 2, 40, 255)).unwrap()
}

fn request(dir: &Path, context: &str) -> RenderRequest {
    RenderRequest {
        context: context.to_string(),
        template: Template::KineticSteps,
        recipe: Recipe {
            steps: vec![RecipeStep::new("Chop the onions"), RecipeStep::new("Fry everything")],
            time_minutes: Some(15),
            cost_dollars: Some(7.0),
            ..Recipe::titled("Fried Rice")
        },
        media: MediaBundle {
            before: Some(still(200)),
            ..MediaBundle::default()
        },
        config: RenderConfig {
            canvas: Canvas::new(108, 192).unwrap(),
            fps: Fps::new(2, 1).unwrap(),
            ..RenderConfig::default()
        },
        output_path: dir.join("reel.mp4"),
    }
}

#[test]
fn opts_defaults_and_json() {
    let opts = SessionOpts::default();
    assert_eq!(opts.time_budget(), Duration::from_secs(120));
    assert_eq!(opts.render_target(), Duration::from_secs(5));
    let parsed = SessionOpts::from_json_str(r#"{ "render_target_ms": 9000 }"#).unwrap();
    assert_eq!(parsed.time_budget_ms, 120_000);
    assert_eq!(parsed.render_target_ms, 9_000);
    assert!(SessionOpts::from_json_str(r#"{ "time_budget_ms": 0 }"#).is_err());
}

#[test]
fn render_writes_output_and_caption() {
    let dir = tempfile::tempdir().unwrap();
    let backend = CountingBackend::default();
    let out = engine(backend.clone()).render(request(dir.path(), "a")).unwrap();

    assert_eq!(out.path, dir.path().join("reel.mp4"));
    assert!(out.path.exists());
    assert_eq!(out.stats.composite.frames, 30);
    assert_eq!(out.stats.export.passes, 1);
    assert_eq!(out.stats.export.size_bytes, 30);
    assert!(out.caption.starts_with("Just made Fried Rice with SnapChef!"));
    assert!(out.caption.contains("⏱ 15 min · 💰 $7"));
    assert_eq!(backend.opens.load(Ordering::SeqCst), 1);
}

#[test]
fn busy_context_is_rejected_until_released() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(CountingBackend::default());
    let guard = InFlightGuard::acquire(&engine.in_flight, "kitchen").unwrap();
    assert!(engine.is_in_flight("kitchen"));

    let err = engine.render(request(dir.path(), "kitchen")).unwrap_err();
    assert!(matches!(err, ReelError::RenderInFlight { ref context } if context == "kitchen"));
    assert!(matches!(
        engine.spawn(request(dir.path(), "kitchen")),
        Err(ReelError::RenderInFlight { .. })
    ));
    // Other contexts are unaffected.
    engine.render(request(dir.path(), "other")).unwrap();

    drop(guard);
    assert!(!engine.is_in_flight("kitchen"));
    engine.render(request(dir.path(), "kitchen")).unwrap();
}

#[test]
fn failed_render_releases_its_context() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(CountingBackend::default());
    let mut req = request(dir.path(), "ctx");
    req.recipe.steps.clear();
    assert!(matches!(
        engine.render(req),
        Err(ReelError::InvalidRecipe(_))
    ));
    assert!(!engine.is_in_flight("ctx"));
}

#[test]
fn cancelled_render_leaves_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(CountingBackend::default());
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = engine
        .render_with(request(dir.path(), "ctx"), &cancel)
        .unwrap_err();
    assert!(matches!(err, ReelError::Cancelled));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_media_fails_before_the_encoder_opens() {
    let dir = tempfile::tempdir().unwrap();
    let backend = CountingBackend::default();
    let mut req = request(dir.path(), "ctx");
    req.template = Template::SplitScreenSwipe;
    let err = engine(backend.clone()).render(req).unwrap_err();
    assert!(matches!(err, ReelError::MissingMedia { .. }));
    assert_eq!(backend.opens.load(Ordering::SeqCst), 0);
}

#[test]
fn spawned_render_joins_and_frees_the_context() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(CountingBackend::default());
    let handle = engine.spawn(request(dir.path(), "bg")).unwrap();
    let out = handle.join().unwrap();
    assert!(out.path.exists());
    assert!(!engine.is_in_flight("bg"));
}

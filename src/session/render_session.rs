use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context as _;

use crate::caption::caption;
use crate::encode::exporter::{ExportReport, Exporter};
use crate::foundation::cancel::CancelToken;
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::config::RenderConfig;
use crate::model::media::MediaBundle;
use crate::model::recipe::Recipe;
use crate::planner::{Planner, Template};
use crate::render::compositor::{CompositeStats, Compositor};

/// Request-level limits.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionOpts {
    /// Wall-clock budget for one render; exceeding it aborts with `RenderTimeout`.
    pub time_budget_ms: u64,
    /// Render time above which a warning is logged.
    pub render_target_ms: u64,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            time_budget_ms: 120_000,
            render_target_ms: 5_000,
        }
    }
}

impl SessionOpts {
    /// Load options from JSON; absent fields take their defaults.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let opts: Self = serde_json::from_str(s).context("parse session options JSON")?;
        opts.validate()?;
        Ok(opts)
    }

    /// Both durations must be non-zero.
    pub fn validate(&self) -> ReelResult<()> {
        if self.time_budget_ms == 0 || self.render_target_ms == 0 {
            return Err(ReelError::validation(
                "session time budget and render target must be non-zero",
            ));
        }
        Ok(())
    }

    /// Render time budget.
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    /// Soft render-time target.
    pub fn render_target(&self) -> Duration {
        Duration::from_millis(self.render_target_ms)
    }
}

/// Everything one render needs, owned by the request.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    /// Requesting context; at most one render per context runs at a time.
    pub context: String,
    /// Layout template.
    pub template: Template,
    /// Recipe description.
    pub recipe: Recipe,
    /// Decoded media.
    pub media: MediaBundle,
    /// Render configuration.
    pub config: RenderConfig,
    /// Destination video file.
    pub output_path: PathBuf,
}

/// Timings and sizes of a finished render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStats {
    /// Time spent planning.
    pub planning: Duration,
    /// Compositing summary.
    pub composite: CompositeStats,
    /// Export summary.
    pub export: ExportReport,
    /// Request wall time.
    pub total: Duration,
    /// `total` exceeded the session's render target.
    pub over_render_target: bool,
    /// Structural hash of the rendered plan.
    pub plan_fingerprint: u64,
}

/// A finished render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOutput {
    /// Written video file.
    pub path: PathBuf,
    /// Suggested share caption.
    pub caption: String,
    /// Timings and sizes.
    pub stats: RenderStats,
}

type InFlight = Arc<Mutex<HashSet<String>>>;

/// Marks a context busy until dropped.
struct InFlightGuard {
    set: InFlight,
    context: String,
}

impl InFlightGuard {
    fn acquire(set: &InFlight, context: &str) -> ReelResult<Self> {
        let mut busy = set.lock().unwrap_or_else(PoisonError::into_inner);
        if !busy.insert(context.to_string()) {
            return Err(ReelError::RenderInFlight {
                context: context.to_string(),
            });
        }
        Ok(Self {
            set: Arc::clone(set),
            context: context.to_string(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.context);
    }
}

/// Request-level pipeline: plan, composite, export, caption.
///
/// Each request owns its plan and frame pool; the engine only shares the set of busy contexts.
/// Cloning an engine shares that set.
#[derive(Clone, Debug)]
pub struct RenderEngine {
    planner: Planner,
    exporter: Exporter,
    opts: SessionOpts,
    in_flight: InFlight,
}

impl Default for RenderEngine {
    fn default() -> Self {
        Self::new(Planner::new(), Exporter::default(), SessionOpts::default())
    }
}

impl RenderEngine {
    /// Engine over `planner` and `exporter`.
    pub fn new(planner: Planner, exporter: Exporter, opts: SessionOpts) -> Self {
        Self {
            planner,
            exporter,
            opts,
            in_flight: Arc::default(),
        }
    }

    /// Session options.
    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    /// Whether a render for `context` is running.
    pub fn is_in_flight(&self, context: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(context)
    }

    /// Run `req` on the calling thread under the session time budget.
    pub fn render(&self, req: RenderRequest) -> ReelResult<RenderOutput> {
        self.render_with(req, &self.cancel_token())
    }

    /// Run `req` on the calling thread, aborting when `cancel` fires.
    pub fn render_with(&self, req: RenderRequest, cancel: &CancelToken) -> ReelResult<RenderOutput> {
        let _guard = InFlightGuard::acquire(&self.in_flight, &req.context)?;
        self.run(req, cancel)
    }

    /// Run `req` on a dedicated thread.
    ///
    /// A duplicate context is rejected here, before the thread starts.
    pub fn spawn(&self, req: RenderRequest) -> ReelResult<RenderHandle> {
        let guard = InFlightGuard::acquire(&self.in_flight, &req.context)?;
        let cancel = self.cancel_token();
        let engine = self.clone();
        let token = cancel.clone();
        let thread = std::thread::Builder::new()
            .name(format!("snapreel-{}", req.context))
            .spawn(move || {
                let _guard = guard;
                engine.run(req, &token)
            })
            .context("failed to spawn render thread")?;
        Ok(RenderHandle { cancel, thread })
    }

    fn cancel_token(&self) -> CancelToken {
        CancelToken::new().with_budget(self.opts.time_budget())
    }

    #[tracing::instrument(skip_all, fields(context = %req.context, template = %req.template))]
    fn run(&self, req: RenderRequest, cancel: &CancelToken) -> ReelResult<RenderOutput> {
        self.opts.validate()?;
        let started = Instant::now();

        let plan = self
            .planner
            .plan(req.template, &req.recipe, &req.media, &req.config)?;
        let planning = started.elapsed();
        let plan_fingerprint = plan.fingerprint();
        cancel.check()?;

        let compositor = Compositor::new(plan, &req.config)?;
        let (composite, export) = self.exporter.export(compositor, &req.output_path, cancel)?;

        let total = started.elapsed();
        let over_render_target = total > self.opts.render_target();
        if over_render_target {
            tracing::warn!(
                total_ms = total.as_millis() as u64,
                target_ms = self.opts.render_target_ms,
                "render slower than target"
            );
        }
        tracing::info!(
            total_ms = total.as_millis() as u64,
            frames = composite.frames,
            size_bytes = export.size_bytes,
            passes = export.passes,
            "render finished"
        );

        Ok(RenderOutput {
            path: export.path.clone(),
            caption: caption(&req.recipe, req.config.cta_seed),
            stats: RenderStats {
                planning,
                composite,
                export,
                total,
                over_render_target,
                plan_fingerprint,
            },
        })
    }
}

/// A render running on its own thread.
#[derive(Debug)]
pub struct RenderHandle {
    cancel: CancelToken,
    thread: JoinHandle<ReelResult<RenderOutput>>,
}

impl RenderHandle {
    /// Ask the render to stop at the next frame boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token observed by the render.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Return `true` once the render thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the render result.
    pub fn join(self) -> ReelResult<RenderOutput> {
        self.thread
            .join()
            .map_err(|_| ReelError::evaluation("render thread panicked"))?
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;

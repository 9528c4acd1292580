//! Throttled presentation of loading frames
//!
//! The loader owns the only call stack that can draw, so every progress report
//! may end up drawing a frame. The presenter caps that to the configured frame
//! rate and, while drawing, hides the paused 3D scene behind the loading GUI.

mod guards;
pub mod timer;

pub use timer::PresentationTimer;

use crate::backend::{BackgroundSurface, RenderQueueSet, Renderer};
use crate::config::LoadingScreenConfig;
use crate::error::LoadingResult;

use guards::{BackgroundOverride, ClearRetention, CompositorBypass, SceneSuppression};

/// How a frame was drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentKind {
    /// No final compositor: the last scene frame stays under the GUI
    RetainedFrame,
    /// Compositor chain switched off for the frame
    CompositorBypassed {
        /// The compositor's last output was shown behind the GUI
        frozen_background: bool,
    },
}

/// Counters for the current loading session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresenterStats {
    pub frames_presented: u64,
    pub frames_skipped: u64,
}

/// Decides when to draw and performs the present cycle
#[derive(Debug, Clone)]
pub struct ThrottledPresenter {
    timer: PresentationTimer,
    background: BackgroundSurface,
    final_compositor: String,
    final_compositor_output: String,
    wallpaper_interval_ms: f64,
    stats: PresenterStats,
}

impl ThrottledPresenter {
    pub fn new(config: &LoadingScreenConfig) -> Self {
        Self {
            timer: PresentationTimer::with_target_fps(config.target_fps),
            background: BackgroundSurface::default(),
            final_compositor: config.final_compositor.clone(),
            final_compositor_output: config.final_compositor_output.clone(),
            wallpaper_interval_ms: config.wallpaper_interval_ms,
            stats: PresenterStats::default(),
        }
    }

    pub fn timer(&self) -> &PresentationTimer {
        &self.timer
    }

    pub fn stats(&self) -> PresenterStats {
        self.stats
    }

    /// Resting state of the background quad (always hidden outside a cycle)
    pub fn background(&self) -> &BackgroundSurface {
        &self.background
    }

    /// Gate a present at `now`; a refused request counts as a skipped frame
    pub fn should_present(&mut self, now: f64) -> bool {
        let due = self.timer.should_present(now);
        if !due {
            self.stats.frames_skipped += 1;
            log::trace!(
                "[Presenter] Skipping frame, {:.1}ms since last present",
                now - self.timer.last_frame_time_ms()
            );
        }
        due
    }

    pub fn wallpaper_due(&self, now: f64) -> bool {
        self.timer.wallpaper_due(now, self.wallpaper_interval_ms)
    }

    pub fn record_wallpaper_swap(&mut self, now: f64) {
        self.timer.record_wallpaper_swap(now);
    }

    /// Start a new session's counters
    pub fn reset_stats(&mut self) {
        self.stats = PresenterStats::default();
    }

    /// Draw one loading frame with only the background quad and GUI queues.
    ///
    /// `first_load` keeps the wallpaper instead of freezing the compositor's
    /// last output behind the GUI. Renderer state is restored before this
    /// returns, whether or not the frame was presented; the frame timer only
    /// moves on success.
    pub fn present<R: Renderer>(
        &mut self,
        renderer: &mut R,
        first_load: bool,
        now: f64,
    ) -> LoadingResult<PresentKind> {
        let mut scene = SceneSuppression::engage(renderer, &RenderQueueSet::scene());

        let kind = if scene.is_compositor_stage_active(&self.final_compositor) {
            self.present_without_compositors(&mut *scene, first_load)?
        } else {
            let mut retained = ClearRetention::engage(&mut *scene);
            retained.present_frame()?;
            PresentKind::RetainedFrame
        };

        drop(scene);

        self.timer.record_frame(now);
        self.stats.frames_presented += 1;
        log::debug!("[Presenter] Presented loading frame at {:.1}ms ({:?})", now, kind);
        Ok(kind)
    }

    fn present_without_compositors<R: Renderer>(
        &self,
        renderer: &mut R,
        first_load: bool,
    ) -> LoadingResult<PresentKind> {
        let frozen = if first_load {
            None
        } else {
            let texture = renderer
                .compositor_intermediate_texture(&self.final_compositor, &self.final_compositor_output);
            if texture.is_none() {
                log::debug!(
                    "[Presenter] Compositor '{}' has no output '{}', background stays hidden",
                    self.final_compositor,
                    self.final_compositor_output
                );
            }
            texture.map(|texture| BackgroundSurface {
                visible: true,
                texture: Some(texture),
                ..self.background.clone()
            })
        };

        let mut overlay = BackgroundOverride::engage(renderer, &self.background, frozen.as_ref());
        let mut bypass = CompositorBypass::engage(&mut *overlay);
        log::trace!("[Presenter] Bypassing {} compositor stages", bypass.bypassed());
        bypass.present_frame()?;

        Ok(PresentKind::CompositorBypassed {
            frozen_background: frozen.is_some(),
        })
    }
}

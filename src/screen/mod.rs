//! The blocking loading screen driven by the world loader
//!
//! The loader calls [`LoadingScreen::report_progress`] from inside its own
//! loop. Each call updates the caption and bar immediately and, when the frame
//! budget allows, draws one frame before handing control back.

pub mod lifecycle;
pub mod wallpaper;

pub use lifecycle::{LoadingLifecycle, ScreenMode};
pub use wallpaper::WallpaperSelector;

use glam::{IVec2, UVec2};
use rand::rngs::StdRng;

use crate::backend::{Clock, GuiMode, LoadingWidgets, Renderer, ResourceCatalog};
use crate::config::LoadingScreenConfig;
use crate::constants::progress::CAPTION_SUFFIX;
use crate::error::LoadingResult;
use crate::presenter::{PresentKind, PresentationTimer, PresenterStats, ThrottledPresenter};
use crate::progress::aggregator::progress_bar_position;
use crate::progress::{ProgressAggregator, ProgressDepth, ProgressState};

/// Result of one progress report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    /// Overall load progress in [0, 1]
    pub fraction: f32,
    /// How a frame was drawn, if one was
    pub presented: Option<PresentKind>,
}

/// Loading screen over a renderer, resource catalog, widget layout and clock
pub struct LoadingScreen<R, C, W, K> {
    renderer: R,
    catalog: C,
    widgets: W,
    clock: K,
    progress: ProgressAggregator,
    presenter: ThrottledPresenter,
    lifecycle: LoadingLifecycle,
    wallpaper: WallpaperSelector,
}

impl<R, C, W, K> LoadingScreen<R, C, W, K>
where
    R: Renderer,
    C: ResourceCatalog,
    W: LoadingWidgets,
    K: Clock,
{
    pub fn new(
        config: &LoadingScreenConfig,
        renderer: R,
        catalog: C,
        widgets: W,
        clock: K,
    ) -> LoadingResult<Self> {
        config.validate()?;
        log::debug!(
            "[LoadingScreen] Created: {} fps, wallpaper every {}ms, prefix '{}'",
            config.target_fps,
            config.wallpaper_interval_ms,
            config.wallpaper_prefix
        );

        Ok(Self {
            renderer,
            catalog,
            widgets,
            clock,
            progress: ProgressAggregator::new(),
            presenter: ThrottledPresenter::new(config),
            lifecycle: LoadingLifecycle::new(),
            wallpaper: WallpaperSelector::from_config(config),
        })
    }

    /// Replace the wallpaper random source
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.wallpaper.set_rng(rng);
        self
    }

    /// Report loader progress. `depth` 0 is a cell, 1 a reference in the
    /// current cell's sub-list; anything else is an invariant violation.
    ///
    /// Turns the screen on if it is off.
    pub fn report_progress(
        &mut self,
        stage: &str,
        depth: u32,
        current: u32,
        total: u32,
    ) -> LoadingResult<ProgressUpdate> {
        let depth = ProgressDepth::try_from(depth)?;

        if !self.lifecycle.is_loading() {
            self.loading_on();
        }

        let fraction = self.progress.combine(depth, current, total)?;
        let presented = self.on_progress(stage, fraction)?;

        Ok(ProgressUpdate {
            fraction,
            presented,
        })
    }

    /// Show `fraction` and draw a frame if the frame budget allows
    pub fn on_progress(&mut self, stage: &str, fraction: f32) -> LoadingResult<Option<PresentKind>> {
        self.widgets.set_text(&format!("{}{}", stage, CAPTION_SUFFIX));
        self.widgets.set_progress_value(progress_bar_position(fraction));

        let now = self.clock.now_millis();
        if !self.presenter.should_present(now) {
            return Ok(None);
        }

        let first_load = self.lifecycle.is_first_load();
        let swap_wallpaper = first_load && self.presenter.wallpaper_due(now);
        if swap_wallpaper {
            self.show_wallpaper();
        }

        let kind = self.presenter.present(&mut self.renderer, first_load, now)?;
        // Stamped only once the new wallpaper actually reached the screen
        if swap_wallpaper {
            self.presenter.record_wallpaper_swap(now);
        }
        Ok(Some(kind))
    }

    pub fn loading_on(&mut self) {
        let Some(mode) = self.lifecycle.begin() else {
            log::debug!("[LoadingScreen] Already loading, ignoring loading_on");
            return;
        };

        self.widgets.set_visible(true);
        self.progress.reset();
        self.presenter.reset_stats();

        match mode {
            ScreenMode::LoadingWithWallpaper => {
                let now = self.clock.now_millis();
                self.show_wallpaper();
                self.presenter.record_wallpaper_swap(now);
                self.widgets.push_gui_mode(GuiMode::LoadingWallpaper);
            }
            ScreenMode::LoadingPlain | ScreenMode::Off => {
                self.widgets.set_image(None);
                self.widgets.push_gui_mode(GuiMode::Loading);
            }
        }

        log::info!("[LoadingScreen] Loading started ({:?})", mode);
    }

    pub fn loading_off(&mut self) {
        self.widgets.set_visible(false);
        self.widgets.remove_gui_mode(GuiMode::Loading);
        self.widgets.remove_gui_mode(GuiMode::LoadingWallpaper);

        if self.lifecycle.is_loading() {
            let stats = self.presenter.stats();
            log::info!(
                "[LoadingScreen] Loading finished: {} frames presented, {} skipped",
                stats.frames_presented,
                stats.frames_skipped
            );
        }
        self.lifecycle.finish();
    }

    /// Called by the loader once the world is in place
    pub fn loading_done(&mut self) {
        self.loading_off();
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.widgets.set_coord(IVec2::ZERO, UVec2::new(width, height));
    }

    /// Pick a random wallpaper, bind its texture and show it
    pub fn change_wallpaper(&mut self) -> LoadingResult<String> {
        let name = self.wallpaper.choose(&self.catalog)?;
        let texture = self.catalog.bind_texture(&name, self.wallpaper.group())?;
        self.widgets.set_image(Some(&name));
        log::debug!("[Wallpaper] Showing '{}' ({})", name, texture.name());
        Ok(name)
    }

    fn show_wallpaper(&mut self) {
        if let Err(e) = self.change_wallpaper() {
            log::warn!("[Wallpaper] {}, using blank background", e);
            self.widgets.set_image(None);
        }
    }

    pub fn mode(&self) -> ScreenMode {
        self.lifecycle.mode()
    }

    pub fn is_first_load(&self) -> bool {
        self.lifecycle.is_first_load()
    }

    pub fn progress_state(&self) -> &ProgressState {
        self.progress.state()
    }

    pub fn timer(&self) -> &PresentationTimer {
        self.presenter.timer()
    }

    pub fn stats(&self) -> PresenterStats {
        self.presenter.stats()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn widgets(&self) -> &W {
        &self.widgets
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::headless::{HeadlessCatalog, HeadlessRenderer, HeadlessWidgets};
    use crate::backend::ManualClock;
    use crate::error::LoadingError;

    type TestScreen<'a> =
        LoadingScreen<HeadlessRenderer, HeadlessCatalog, HeadlessWidgets, &'a ManualClock>;

    fn screen_with(catalog: HeadlessCatalog, clock: &ManualClock) -> TestScreen<'_> {
        let config = LoadingScreenConfig {
            rng_seed: Some(5),
            ..LoadingScreenConfig::default()
        };
        LoadingScreen::new(
            &config,
            HeadlessRenderer::new(),
            catalog,
            HeadlessWidgets::new(),
            clock,
        )
        .expect("Failed to create loading screen in test")
    }

    fn splash_catalog() -> HeadlessCatalog {
        HeadlessCatalog::new().with_resources("General", &["splash_a.png", "splash_b.png", "ui.png"])
    }

    #[test]
    fn test_first_load_shows_wallpaper() {
        let clock = ManualClock::new(0.0);
        let mut screen = screen_with(splash_catalog(), &clock);

        screen.loading_on();
        assert_eq!(screen.mode(), ScreenMode::LoadingWithWallpaper);
        let widgets = screen.widgets();
        assert!(widgets.visible);
        assert!(widgets.image.as_deref().is_some_and(|i| i.starts_with("splash_")));
        assert_eq!(widgets.gui_modes, vec![GuiMode::LoadingWallpaper]);
        assert_eq!(screen.catalog().bound().len(), 1);
    }

    #[test]
    fn test_later_loads_are_plain() {
        let clock = ManualClock::new(0.0);
        let mut screen = screen_with(splash_catalog(), &clock);

        screen.loading_on();
        screen.loading_done();
        assert_eq!(screen.mode(), ScreenMode::Off);
        assert!(!screen.is_first_load());
        assert!(!screen.widgets().visible);
        assert!(screen.widgets().gui_modes.is_empty());

        screen.loading_on();
        assert_eq!(screen.mode(), ScreenMode::LoadingPlain);
        assert_eq!(screen.widgets().image, None);
        assert_eq!(screen.widgets().gui_modes, vec![GuiMode::Loading]);
    }

    #[test]
    fn test_missing_wallpaper_falls_back_to_blank() {
        let clock = ManualClock::new(0.0);
        let mut screen = screen_with(HeadlessCatalog::new(), &clock);

        let err = screen.change_wallpaper().unwrap_err();
        assert!(matches!(err, LoadingError::NoWallpaperAvailable { .. }));

        screen.loading_on();
        assert_eq!(screen.mode(), ScreenMode::LoadingWithWallpaper);
        assert_eq!(screen.widgets().image, None);
        assert!(screen.widgets().visible);
    }

    #[test]
    fn test_report_turns_screen_on_and_updates_widgets() {
        let clock = ManualClock::new(0.0);
        let mut screen = screen_with(splash_catalog(), &clock);

        let update = screen
            .report_progress("Loading cell", 0, 1, 4)
            .expect("Failed to report progress");
        assert_eq!(screen.mode(), ScreenMode::LoadingWithWallpaper);
        // No frame yet: the clock has not moved past one frame interval
        assert_eq!(update.presented, None);
        assert_eq!(screen.widgets().text, "Loading cell... ");
        assert_eq!(
            screen.widgets().progress,
            progress_bar_position(update.fraction)
        );

        clock.advance(40.0);
        let update = screen
            .report_progress("Loading references", 1, 0, 10)
            .expect("Failed to report progress");
        assert_eq!(update.presented, Some(PresentKind::RetainedFrame));
        assert_eq!(screen.renderer().frames().len(), 1);
    }

    #[test]
    fn test_invalid_depth_is_rejected() {
        let clock = ManualClock::new(0.0);
        let mut screen = screen_with(splash_catalog(), &clock);
        let err = screen.report_progress("Loading", 3, 0, 1).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn test_wallpaper_rotates_only_during_first_load() {
        let clock = ManualClock::new(0.0);
        let mut screen = screen_with(splash_catalog(), &clock);

        screen.loading_on();
        let bound_after_on = screen.catalog().bound().len();

        for _ in 0..10 {
            clock.advance(1000.0);
            screen
                .report_progress("Loading", 0, 0, 1)
                .expect("Failed to report progress");
        }
        // Swaps at 3000, 6000 and 9000ms
        assert_eq!(screen.catalog().bound().len(), bound_after_on + 3);
        assert_eq!(screen.timer().last_wallpaper_swap_ms(), 9000.0);

        screen.loading_off();
        let bound_after_first = screen.catalog().bound().len();
        for _ in 0..10 {
            clock.advance(1000.0);
            screen
                .report_progress("Loading", 0, 0, 1)
                .expect("Failed to report progress");
        }
        assert_eq!(screen.catalog().bound().len(), bound_after_first);
    }

    #[test]
    fn test_resize_sets_full_screen_coord() {
        let clock = ManualClock::new(0.0);
        let mut screen = screen_with(splash_catalog(), &clock);
        screen.on_resize(1920, 1080);
        assert_eq!(screen.widgets().origin, IVec2::ZERO);
        assert_eq!(screen.widgets().size, UVec2::new(1920, 1080));
    }

    #[test]
    fn test_rejected_depth_leaves_screen_off() {
        let clock = ManualClock::new(0.0);
        let mut screen = screen_with(splash_catalog(), &clock);

        let err = screen
            .report_progress("Loading", 7, 0, 1)
            .expect_err("Expected depth 7 to be rejected");
        assert!(err.is_invariant_violation());
        assert_eq!(screen.mode(), ScreenMode::Off);
        assert!(screen.is_first_load());
        assert!(!screen.widgets().visible);
        assert!(screen.widgets().gui_modes.is_empty());
        assert!(screen.catalog().bound().is_empty());
    }

    #[test]
    fn test_wallpaper_stamp_waits_for_successful_present() {
        let clock = ManualClock::new(0.0);
        let mut screen = screen_with(splash_catalog(), &clock);

        screen.loading_on();
        assert_eq!(screen.timer().last_wallpaper_swap_ms(), 0.0);

        clock.advance(3000.0);
        screen.renderer_mut().fail_next_present();
        screen
            .report_progress("Loading", 0, 0, 1)
            .expect_err("Expected present failure");
        assert_eq!(screen.timer().last_wallpaper_swap_ms(), 0.0);
        assert_eq!(screen.timer().last_frame_time_ms(), 0.0);

        clock.advance(10.0);
        let update = screen
            .report_progress("Loading", 0, 0, 1)
            .expect("Failed to report progress after failed present");
        assert!(update.presented.is_some());
        assert_eq!(screen.timer().last_wallpaper_swap_ms(), 3010.0);
    }
}

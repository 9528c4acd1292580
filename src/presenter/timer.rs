/// Frame pacing for the loading screen
///
/// Times are milliseconds from the screen's clock. Both stamps start at zero
/// and only move forward when a frame is presented or a wallpaper is shown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationTimer {
    last_frame_time_ms: f64,
    last_wallpaper_swap_ms: f64,
    target_fps: f32,
}

impl PresentationTimer {
    /// Create a timer for a specific frame rate cap
    pub fn with_target_fps(target_fps: f32) -> Self {
        Self {
            last_frame_time_ms: 0.0,
            last_wallpaper_swap_ms: 0.0,
            target_fps,
        }
    }

    /// Minimum gap between two presented frames
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps as f64
    }

    pub fn last_frame_time_ms(&self) -> f64 {
        self.last_frame_time_ms
    }

    pub fn last_wallpaper_swap_ms(&self) -> f64 {
        self.last_wallpaper_swap_ms
    }

    /// Check if a frame may be presented at `now`
    pub fn should_present(&self, now: f64) -> bool {
        now - self.last_frame_time_ms >= self.frame_interval_ms()
    }

    /// Check if the wallpaper has been shown for at least `interval_ms`
    pub fn wallpaper_due(&self, now: f64, interval_ms: f64) -> bool {
        now - self.last_wallpaper_swap_ms >= interval_ms
    }

    pub fn record_frame(&mut self, now: f64) {
        self.last_frame_time_ms = now;
    }

    pub fn record_wallpaper_swap(&mut self, now: f64) {
        self.last_wallpaper_swap_ms = now;
    }
}

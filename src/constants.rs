// Loading Screen Constants - SINGLE SOURCE OF TRUTH
//
// Every tunable used by the progress model, the presenter and the wallpaper
// rotation lives here. Config defaults are built from these values.

/// Progress model constants
pub mod progress {
    /// Number of reference sub-lists a single cell may spend its progress budget on
    pub const NUM_REF_LISTS: u32 = 20;
    pub const NUM_REF_LISTS_F32: f32 = NUM_REF_LISTS as f32;

    /// Progress bar widget range (fraction 1.0 maps to this value)
    pub const PROGRESS_BAR_RANGE: u32 = 1000;

    /// Suffix appended to the stage name in the loading caption
    pub const CAPTION_SUFFIX: &str = "... ";
}

/// Presentation timing
pub mod timing {
    /// Loading screen frame rate cap
    pub const DEFAULT_TARGET_FPS: f32 = 30.0;

    /// Minimum time a wallpaper stays on screen during the first load
    pub const WALLPAPER_INTERVAL_MS: f64 = 3000.0;
}

/// Resource and compositor names
pub mod names {
    /// Wallpaper resources start with this prefix (case-insensitive)
    pub const WALLPAPER_PREFIX: &str = "splash";
    pub const RESOURCE_GROUP: &str = "General";

    /// Final post-process stage and the intermediate texture it renders into
    pub const FINAL_COMPOSITOR: &str = "gbufferFinalizer";
    pub const FINAL_COMPOSITOR_OUTPUT: &str = "no_mrt_output";
}

/// Render queue numbering (lower draws first)
pub mod render_queues {
    pub const BACKGROUND: u8 = 0;

    /// Scene geometry range suppressed while the loading screen presents
    pub const FIRST_SCENE: u8 = 1;
    pub const LAST_SCENE: u8 = 95;

    pub const OVERLAY: u8 = 100;
    /// Loading background quad, drawn right before the GUI overlay
    pub const LOADING_BACKGROUND: u8 = OVERLAY - 1;
}

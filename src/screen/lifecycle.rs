/// What the loading screen is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenMode {
    Off,
    /// First load of the session: rotating wallpapers
    LoadingWithWallpaper,
    /// Later loads: blank image, last scene frame behind the GUI
    LoadingPlain,
}

/// On/off state plus the first-load latch.
///
/// `first_load` starts out true and is cleared by the first [`finish`]; it is
/// never set again for the lifetime of this value, so `LoadingWithWallpaper`
/// is entered at most once.
///
/// [`finish`]: LoadingLifecycle::finish
#[derive(Debug, Clone)]
pub struct LoadingLifecycle {
    mode: ScreenMode,
    first_load: bool,
}

impl LoadingLifecycle {
    pub fn new() -> Self {
        Self {
            mode: ScreenMode::Off,
            first_load: true,
        }
    }

    pub fn mode(&self) -> ScreenMode {
        self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.mode != ScreenMode::Off
    }

    pub fn is_first_load(&self) -> bool {
        self.first_load
    }

    /// Enter a loading mode; `None` if a load is already showing
    pub fn begin(&mut self) -> Option<ScreenMode> {
        if self.is_loading() {
            return None;
        }
        self.mode = if self.first_load {
            ScreenMode::LoadingWithWallpaper
        } else {
            ScreenMode::LoadingPlain
        };
        Some(self.mode)
    }

    /// Leave loading and latch `first_load` off for good
    pub fn finish(&mut self) {
        self.mode = ScreenMode::Off;
        self.first_load = false;
    }
}

impl Default for LoadingLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

pub mod backend;
pub mod config;
pub mod constants;
pub mod error;
pub mod presenter;
pub mod progress;
pub mod screen;

pub use backend::{
    BackgroundSurface, Clock, GuiMode, LoadingWidgets, ManualClock, RenderQueue, RenderQueueSet,
    Renderer, ResourceCatalog, SystemClock, TextureHandle,
};
pub use config::LoadingScreenConfig;
pub use error::{LoadingError, LoadingErrorContext, LoadingResult};
pub use presenter::{PresentKind, PresentationTimer, PresenterStats, ThrottledPresenter};
pub use progress::{ProgressAggregator, ProgressDepth, ProgressState};
pub use screen::{LoadingLifecycle, LoadingScreen, ProgressUpdate, ScreenMode, WallpaperSelector};

//! Collaborators the loading screen drives
//!
//! The screen never talks to a scene graph, GUI toolkit or windowing system
//! directly. It sees them through these traits, which keeps the present cycle
//! testable with the recording implementations in [`headless`].

pub mod clock;
pub mod headless;

use std::collections::BTreeSet;

use glam::{IVec2, UVec2};

use crate::constants::render_queues;
use crate::error::LoadingResult;

pub use clock::{Clock, ManualClock, SystemClock};

/// Draw-order bucket of the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderQueue(pub u8);

impl RenderQueue {
    pub const BACKGROUND: RenderQueue = RenderQueue(render_queues::BACKGROUND);
    pub const LOADING_BACKGROUND: RenderQueue = RenderQueue(render_queues::LOADING_BACKGROUND);
    pub const OVERLAY: RenderQueue = RenderQueue(render_queues::OVERLAY);
}

/// Render queues excluded from the next frames
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderQueueSet {
    queues: BTreeSet<RenderQueue>,
}

impl RenderQueueSet {
    /// Nothing excluded
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every queue carrying 3D scene geometry
    pub fn scene() -> Self {
        Self {
            queues: (render_queues::FIRST_SCENE..=render_queues::LAST_SCENE)
                .map(RenderQueue)
                .collect(),
        }
    }

    pub fn contains(&self, queue: RenderQueue) -> bool {
        self.queues.contains(&queue)
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }
}

/// Opaque handle to a texture owned by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub String);

impl TextureHandle {
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Full-screen quad drawn behind the loading GUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundSurface {
    pub visible: bool,
    /// Texture bound to the quad material's only slot
    pub texture: Option<TextureHandle>,
    pub queue: RenderQueue,
}

impl Default for BackgroundSurface {
    fn default() -> Self {
        Self {
            visible: false,
            texture: None,
            queue: RenderQueue::LOADING_BACKGROUND,
        }
    }
}

/// GUI modes pushed by the loading screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuiMode {
    Loading,
    LoadingWallpaper,
}

/// Scene renderer and its post-process chain
pub trait Renderer {
    /// Draw and present one frame
    fn present_frame(&mut self) -> LoadingResult<()>;

    /// Skip the given queues until the set is replaced (an empty set renders everything)
    fn set_render_queue_exclusion(&mut self, excluded: &RenderQueueSet);

    /// Whether the named post-process stage is attached to the output
    fn is_compositor_stage_active(&self, name: &str) -> bool;

    /// Intermediate texture `output` rendered by compositor stage `stage`
    fn compositor_intermediate_texture(&self, stage: &str, output: &str) -> Option<TextureHandle>;

    /// Names of every stage in the compositor chain, in chain order
    fn compositor_stages(&self) -> Vec<String>;

    fn is_compositor_stage_enabled(&self, name: &str) -> bool;

    fn set_compositor_stage_enabled(&mut self, name: &str, enabled: bool);

    fn clear_every_frame(&self) -> bool;

    fn set_clear_every_frame(&mut self, enabled: bool);

    /// Push the loading background quad state to the scene
    fn set_background(&mut self, surface: &BackgroundSurface);
}

/// Image resources known to the engine
pub trait ResourceCatalog {
    fn list_resource_names(&self, group: &str) -> Vec<String>;

    /// Load (if needed) and return the texture for an image resource
    fn bind_texture(&mut self, name: &str, group: &str) -> LoadingResult<TextureHandle>;
}

/// Widgets of the loading screen layout plus the window manager's mode stack
pub trait LoadingWidgets {
    fn set_text(&mut self, text: &str);

    /// Progress bar position in 0..=1000
    fn set_progress_value(&mut self, value: u32);

    fn set_visible(&mut self, visible: bool);

    /// Background image; `None` shows a blank background
    fn set_image(&mut self, image: Option<&str>);

    fn set_coord(&mut self, origin: IVec2, size: UVec2);

    fn push_gui_mode(&mut self, mode: GuiMode);

    fn remove_gui_mode(&mut self, mode: GuiMode);
}

//! Headless collaborators that record everything the loading screen does.
//! Used by the simulator binary and by tests.

use std::collections::HashMap;

use glam::{IVec2, UVec2};

use super::{
    BackgroundSurface, GuiMode, LoadingWidgets, RenderQueueSet, Renderer, ResourceCatalog,
    TextureHandle,
};
use crate::error::{render_error, LoadingResult};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CompositorStage {
    name: String,
    enabled: bool,
    outputs: Vec<String>,
}

/// Renderer state that a present cycle is allowed to touch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererSnapshot {
    pub excluded: RenderQueueSet,
    pub clear_every_frame: bool,
    pub stages: Vec<(String, bool)>,
    pub background: BackgroundSurface,
}

/// Renderer without a GPU; every presented frame is captured as a snapshot
#[derive(Debug)]
pub struct HeadlessRenderer {
    excluded: RenderQueueSet,
    clear_every_frame: bool,
    stages: Vec<CompositorStage>,
    background: BackgroundSurface,
    frames: Vec<RendererSnapshot>,
    fail_next_present: bool,
}

impl HeadlessRenderer {
    /// Renderer with an empty compositor chain
    pub fn new() -> Self {
        Self {
            excluded: RenderQueueSet::empty(),
            clear_every_frame: true,
            stages: Vec::new(),
            background: BackgroundSurface::default(),
            frames: Vec::new(),
            fail_next_present: false,
        }
    }

    /// Append an enabled stage rendering into the given intermediate textures
    pub fn with_stage(mut self, name: &str, outputs: &[&str]) -> Self {
        self.stages.push(CompositorStage {
            name: name.to_string(),
            enabled: true,
            outputs: outputs.iter().map(|o| o.to_string()).collect(),
        });
        self
    }

    /// Make the next `present_frame` call fail
    pub fn fail_next_present(&mut self) {
        self.fail_next_present = true;
    }

    /// Frames presented so far, in order
    pub fn frames(&self) -> &[RendererSnapshot] {
        &self.frames
    }

    pub fn snapshot(&self) -> RendererSnapshot {
        RendererSnapshot {
            excluded: self.excluded.clone(),
            clear_every_frame: self.clear_every_frame,
            stages: self
                .stages
                .iter()
                .map(|s| (s.name.clone(), s.enabled))
                .collect(),
            background: self.background.clone(),
        }
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HeadlessRenderer {
    fn present_frame(&mut self) -> LoadingResult<()> {
        if std::mem::take(&mut self.fail_next_present) {
            return Err(render_error("present_frame", "headless surface lost"));
        }
        let snapshot = self.snapshot();
        self.frames.push(snapshot);
        Ok(())
    }

    fn set_render_queue_exclusion(&mut self, excluded: &RenderQueueSet) {
        self.excluded = excluded.clone();
    }

    fn is_compositor_stage_active(&self, name: &str) -> bool {
        self.stages.iter().any(|s| s.name == name)
    }

    fn compositor_intermediate_texture(&self, stage: &str, output: &str) -> Option<TextureHandle> {
        self.stages
            .iter()
            .find(|s| s.name == stage)
            .filter(|s| s.outputs.iter().any(|o| o == output))
            .map(|s| TextureHandle(format!("{}/{}", s.name, output)))
    }

    fn compositor_stages(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.name.clone()).collect()
    }

    fn is_compositor_stage_enabled(&self, name: &str) -> bool {
        self.stages.iter().any(|s| s.name == name && s.enabled)
    }

    fn set_compositor_stage_enabled(&mut self, name: &str, enabled: bool) {
        if let Some(stage) = self.stages.iter_mut().find(|s| s.name == name) {
            stage.enabled = enabled;
        }
    }

    fn clear_every_frame(&self) -> bool {
        self.clear_every_frame
    }

    fn set_clear_every_frame(&mut self, enabled: bool) {
        self.clear_every_frame = enabled;
    }

    fn set_background(&mut self, surface: &BackgroundSurface) {
        self.background = surface.clone();
    }
}

/// In-memory resource groups
#[derive(Debug, Default)]
pub struct HeadlessCatalog {
    groups: HashMap<String, Vec<String>>,
    bound: Vec<String>,
}

impl HeadlessCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resources(mut self, group: &str, names: &[&str]) -> Self {
        self.groups
            .entry(group.to_string())
            .or_default()
            .extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Textures bound so far, in order
    pub fn bound(&self) -> &[String] {
        &self.bound
    }
}

impl ResourceCatalog for HeadlessCatalog {
    fn list_resource_names(&self, group: &str) -> Vec<String> {
        self.groups.get(group).cloned().unwrap_or_default()
    }

    fn bind_texture(&mut self, name: &str, group: &str) -> LoadingResult<TextureHandle> {
        let known = self
            .groups
            .get(group)
            .is_some_and(|names| names.iter().any(|n| n == name));
        if !known {
            return Err(render_error(
                "bind_texture",
                format!("no resource '{}' in group '{}'", name, group),
            ));
        }
        self.bound.push(name.to_string());
        Ok(TextureHandle(name.to_string()))
    }
}

/// Widget state as last set by the loading screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessWidgets {
    pub text: String,
    pub progress: u32,
    pub visible: bool,
    pub image: Option<String>,
    pub origin: IVec2,
    pub size: UVec2,
    pub gui_modes: Vec<GuiMode>,
    /// Every progress value ever set, for monotonicity checks
    pub progress_history: Vec<u32>,
}

impl HeadlessWidgets {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadingWidgets for HeadlessWidgets {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_progress_value(&mut self, value: u32) {
        self.progress = value;
        self.progress_history.push(value);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_image(&mut self, image: Option<&str>) {
        self.image = image.map(str::to_string);
    }

    fn set_coord(&mut self, origin: IVec2, size: UVec2) {
        self.origin = origin;
        self.size = size;
    }

    fn push_gui_mode(&mut self, mode: GuiMode) {
        self.gui_modes.push(mode);
    }

    fn remove_gui_mode(&mut self, mode: GuiMode) {
        self.gui_modes.retain(|m| *m != mode);
    }
}

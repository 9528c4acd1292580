//! Scoped renderer overrides used during a present cycle.
//!
//! Each guard applies one override when engaged and puts the previous state
//! back when dropped, so a failing `present_frame` still leaves the renderer
//! as it was found. Guards nest through `DerefMut` and unwind in reverse
//! order: compositor stages, background quad, clear flag, render queues.

use std::ops::{Deref, DerefMut};

use crate::backend::{BackgroundSurface, RenderQueueSet, Renderer};

/// Excludes render queues until dropped
pub(crate) struct SceneSuppression<'a, R: Renderer> {
    renderer: &'a mut R,
}

impl<'a, R: Renderer> SceneSuppression<'a, R> {
    pub(crate) fn engage(renderer: &'a mut R, excluded: &RenderQueueSet) -> Self {
        renderer.set_render_queue_exclusion(excluded);
        Self { renderer }
    }
}

impl<R: Renderer> Drop for SceneSuppression<'_, R> {
    fn drop(&mut self) {
        self.renderer.set_render_queue_exclusion(&RenderQueueSet::empty());
    }
}

/// Keeps the previous frame on screen by turning off per-frame clearing
pub(crate) struct ClearRetention<'a, R: Renderer> {
    renderer: &'a mut R,
    previous: bool,
}

impl<'a, R: Renderer> ClearRetention<'a, R> {
    pub(crate) fn engage(renderer: &'a mut R) -> Self {
        let previous = renderer.clear_every_frame();
        renderer.set_clear_every_frame(false);
        Self { renderer, previous }
    }
}

impl<R: Renderer> Drop for ClearRetention<'_, R> {
    fn drop(&mut self) {
        self.renderer.set_clear_every_frame(self.previous);
    }
}

/// Shows an alternate background quad, then hides the resting one again
pub(crate) struct BackgroundOverride<'a, R: Renderer> {
    renderer: &'a mut R,
    resting: BackgroundSurface,
}

impl<'a, R: Renderer> BackgroundOverride<'a, R> {
    pub(crate) fn engage(
        renderer: &'a mut R,
        resting: &BackgroundSurface,
        shown: Option<&BackgroundSurface>,
    ) -> Self {
        if let Some(surface) = shown {
            renderer.set_background(surface);
        }
        Self {
            renderer,
            resting: BackgroundSurface {
                visible: false,
                ..resting.clone()
            },
        }
    }
}

impl<R: Renderer> Drop for BackgroundOverride<'_, R> {
    fn drop(&mut self) {
        self.renderer.set_background(&self.resting);
    }
}

/// Disables every compositor stage until dropped
pub(crate) struct CompositorBypass<'a, R: Renderer> {
    renderer: &'a mut R,
    previous: Vec<(String, bool)>,
}

impl<'a, R: Renderer> CompositorBypass<'a, R> {
    pub(crate) fn engage(renderer: &'a mut R) -> Self {
        let previous: Vec<(String, bool)> = renderer
            .compositor_stages()
            .into_iter()
            .map(|name| {
                let enabled = renderer.is_compositor_stage_enabled(&name);
                (name, enabled)
            })
            .collect();

        for (name, _) in &previous {
            renderer.set_compositor_stage_enabled(name, false);
        }

        Self { renderer, previous }
    }

    pub(crate) fn bypassed(&self) -> usize {
        self.previous.len()
    }
}

impl<R: Renderer> Drop for CompositorBypass<'_, R> {
    fn drop(&mut self) {
        for (name, enabled) in &self.previous {
            self.renderer.set_compositor_stage_enabled(name, *enabled);
        }
    }
}

macro_rules! deref_to_renderer {
    ($($guard:ident),*) => {
        $(
            impl<R: Renderer> Deref for $guard<'_, R> {
                type Target = R;

                fn deref(&self) -> &R {
                    self.renderer
                }
            }

            impl<R: Renderer> DerefMut for $guard<'_, R> {
                fn deref_mut(&mut self) -> &mut R {
                    self.renderer
                }
            }
        )*
    };
}

deref_to_renderer!(SceneSuppression, ClearRetention, BackgroundOverride, CompositorBypass);

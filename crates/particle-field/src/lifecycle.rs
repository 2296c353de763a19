//! Mount, animate and tear down one visualizer instance.
//!
//! ```text
//! Unmounted --mount--> MountedIdle --start--> MountedAnimating
//!     ^                                             |
//!     +------------------unmount--------------------+
//! ```
//!
//! `mount` starts the frame loop on its own. Frames are driven by a
//! [`FrameScheduler`]: each frame consumes the pending request and files the
//! next one, so at most one request is ever outstanding and cancelling it is
//! enough to stop the loop.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::VisualizerConfig;
use crate::error::{Result, VisualizerError};
use crate::frame::{update_frame, FrameInput, FrameReport};
use crate::render::FrameTarget;
use crate::scene::{SurfaceSize, VisualizerState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub u64);

/// Host hook that fires a frame callback on the next display refresh.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequestId;
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Schedules frames by asking egui for another repaint. egui cannot take a
/// repaint back, so cancelling only forgets the id; the visualizer ignores
/// callbacks that arrive without a pending request.
pub struct RepaintScheduler {
    ctx: egui::Context,
    next: u64,
}

impl RepaintScheduler {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx, next: 0 }
    }
}

impl FrameScheduler for RepaintScheduler {
    fn request_frame(&mut self) -> FrameRequestId {
        self.next += 1;
        self.ctx.request_repaint();
        FrameRequestId(self.next)
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        log::trace!("dropping frame request {}", id.0);
    }
}

/// The outstanding frame request returned by [`Visualizer::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle {
    pub request: FrameRequestId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecyclePhase {
    Unmounted,
    MountedIdle,
    MountedAnimating,
}

pub struct Visualizer<S: FrameScheduler> {
    config: VisualizerConfig,
    scheduler: S,
    state: Option<VisualizerState>,
    pending: Option<FrameHandle>,
    listening: bool,
}

impl<S: FrameScheduler> Visualizer<S> {
    pub fn new(config: VisualizerConfig, scheduler: S) -> Self {
        Self {
            config,
            scheduler,
            state: None,
            pending: None,
            listening: false,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        match (&self.state, self.pending) {
            (None, _) => LifecyclePhase::Unmounted,
            (Some(_), None) => LifecyclePhase::MountedIdle,
            (Some(_), Some(_)) => LifecyclePhase::MountedAnimating,
        }
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn state(&self) -> Option<&VisualizerState> {
        self.state.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Build a fresh scene on `surface`, attach input and start the frame loop.
    ///
    /// # Errors
    /// [`VisualizerError::AlreadyMounted`] if a scene is live,
    /// [`VisualizerError::MissingSurface`] for a surface without area, and
    /// [`VisualizerError::InvalidConfig`] for a bad configuration. Nothing is
    /// scheduled when mounting fails.
    pub fn mount(&mut self, surface: SurfaceSize) -> Result<FrameHandle> {
        if self.state.is_some() {
            return Err(VisualizerError::AlreadyMounted);
        }
        let config = self.config.clone();
        let state = match config.seed {
            Some(seed) => VisualizerState::new(config, surface, &mut StdRng::seed_from_u64(seed))?,
            None => VisualizerState::new(config, surface, &mut rand::rng())?,
        };
        log::info!(
            "mounted particle field: {} particles, {} stars on {}x{}",
            state.swarm.len(),
            state.stars.len(),
            surface.width,
            surface.height
        );
        self.state = Some(state);
        self.listening = true;

        let handle = FrameHandle { request: self.scheduler.request_frame() };
        self.pending = Some(handle);
        Ok(handle)
    }

    /// Enter `MountedAnimating`. Returns the pending request, filing one if
    /// needed; `None` while unmounted.
    pub fn start(&mut self) -> Option<FrameHandle> {
        self.state.as_ref()?;
        if self.pending.is_none() {
            self.pending = Some(FrameHandle { request: self.scheduler.request_frame() });
        }
        self.pending
    }

    /// Cancel the pending frame request, if any. Safe in every phase.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle.request);
        }
    }

    /// The host's frame callback. Runs one update, submits it to `target` and
    /// files the next request. Returns `None` (and does nothing) unless a
    /// request is pending.
    pub fn frame(&mut self, input: FrameInput<'_>, target: &mut impl FrameTarget) -> Option<FrameReport> {
        self.pending?;
        let state = self.state.as_mut()?;
        self.pending = None;

        let report = update_frame(state, input);
        target.submit(state);

        self.pending = Some(FrameHandle { request: self.scheduler.request_frame() });
        Some(report)
    }

    /// Wheel input in DOM convention. Ignored unless mounted.
    pub fn scroll(&mut self, delta_y: f32) -> bool {
        match self.state.as_mut() {
            Some(state) if self.listening => {
                state.scroll(delta_y);
                true
            }
            _ => false,
        }
    }

    /// Surface resize. Ignored unless mounted or when the size is degenerate.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        match self.state.as_mut() {
            Some(state) if self.listening => state.resize(width, height),
            _ => false,
        }
    }

    /// Tear everything down: cancel the pending frame, detach input, release
    /// the scene. Calling it again is a no-op.
    pub fn unmount(&mut self) {
        self.stop();
        self.listening = false;
        if let Some(state) = self.state.take() {
            log::info!("unmounted particle field after {} frames", state.frame);
        }
    }
}

impl<S: FrameScheduler> Drop for Visualizer<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

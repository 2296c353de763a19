use egui::{Event, MouseWheelUnit, Sense, Vec2};

use crate::config::VisualizerConfig;
use crate::frame::{FrameInput, FrameReport};
use crate::lifecycle::{LifecyclePhase, RepaintScheduler, Visualizer};
use crate::render::{EguiTarget, FrameTarget};
use crate::scene::SurfaceSize;

/// Pixels a browser reports for one wheel notch in pixel delta mode.
const DOM_PIXELS_PER_LINE: f32 = 100.0;

/// Binds a [`Visualizer`] to the space an egui `Ui` has left. Mounts on the
/// first pass that offers a drawable region, follows resizes, and turns
/// wheel input over the surface into zoom.
///
/// egui may run several passes for one displayed frame; only the first pass
/// of a frame steps the scene, later ones repaint it unchanged.
pub struct ParticleFieldView {
    visualizer: Visualizer<RepaintScheduler>,
    // last surface that failed to mount, so the error is logged once per size
    rejected: Option<SurfaceSize>,
    stepped_frame: Option<u64>,
}

impl ParticleFieldView {
    pub fn new(ctx: &egui::Context, config: VisualizerConfig) -> Self {
        Self {
            visualizer: Visualizer::new(config, RepaintScheduler::new(ctx.clone())),
            rejected: None,
            stepped_frame: None,
        }
    }

    pub fn visualizer(&self) -> &Visualizer<RepaintScheduler> {
        &self.visualizer
    }

    pub fn show(&mut self, ui: &mut egui::Ui, input: FrameInput<'_>) -> Option<FrameReport> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let surface = SurfaceSize::new(rect.width(), rect.height());

        if self.visualizer.phase() == LifecyclePhase::Unmounted {
            if self.rejected == Some(surface) {
                return None;
            }
            if let Err(err) = self.visualizer.mount(surface) {
                log::error!("particle field not mounted: {err}");
                self.rejected = Some(surface);
                return None;
            }
            self.rejected = None;
        }

        if self.visualizer.state().is_some_and(|s| s.surface != surface) {
            self.visualizer.resize(surface.width, surface.height);
        }

        if response.hovered() {
            let delta_y = ui.input(|i| dom_delta_y(&i.events, surface.height));
            if delta_y != 0.0 {
                self.visualizer.scroll(delta_y);
                ui.ctx().input_mut(|i| {
                    i.raw_scroll_delta = Vec2::ZERO;
                    i.smooth_scroll_delta = Vec2::ZERO;
                });
            }
        }

        let painter = ui.painter_at(rect);
        let mut target = EguiTarget::new(&painter, rect);
        let frame_nr = ui.ctx().cumulative_frame_nr();
        let report = if self.stepped_frame == Some(frame_nr) {
            None
        } else {
            self.stepped_frame = Some(frame_nr);
            self.visualizer.frame(input, &mut target)
        };
        if report.is_none() {
            // repeat pass or stopped loop: keep showing the last frame
            if let Some(state) = self.visualizer.state() {
                target.submit(state);
            }
        }
        report
    }
}

/// Wheel events of this pass as a DOM `deltaY`: positive scrolls down. egui
/// reports content motion, so the sign flips; lines and pages are scaled to
/// pixels the way a browser in pixel mode would.
fn dom_delta_y(events: &[Event], page_height: f32) -> f32 {
    events
        .iter()
        .map(|event| match event {
            Event::MouseWheel { unit, delta, .. } => {
                let scale = match unit {
                    MouseWheelUnit::Point => 1.0,
                    MouseWheelUnit::Line => DOM_PIXELS_PER_LINE,
                    MouseWheelUnit::Page => page_height,
                };
                -delta.y * scale
            }
            _ => 0.0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Modifiers, Pos2, RawInput, Rect};

    fn config() -> VisualizerConfig {
        let mut config = VisualizerConfig::default();
        config.galaxy.particle_count = 32;
        config.stars.star_count = 32;
        config.seed = Some(5);
        config
    }

    fn input(width: f32, height: f32, events: Vec<Event>) -> RawInput {
        RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(width, height))),
            events,
            ..RawInput::default()
        }
    }

    fn wheel(unit: MouseWheelUnit, y: f32) -> Event {
        Event::MouseWheel { unit, delta: Vec2::new(0.0, y), modifiers: Modifiers::NONE }
    }

    /// One displayed frame with the view filling the central panel. Returns
    /// the scroll delta left over for widgets drawn after the view.
    fn show_frame(ctx: &egui::Context, view: &mut ParticleFieldView, raw: RawInput) -> Vec2 {
        let mut left_over = Vec2::ZERO;
        let _ = ctx.run(raw, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                view.show(ui, FrameInput::idle());
                left_over = ui.input(|i| i.raw_scroll_delta);
            });
        });
        left_over
    }

    fn frame_count(view: &ParticleFieldView) -> u64 {
        view.visualizer().state().map_or(0, |s| s.frame)
    }

    fn zoom(view: &ParticleFieldView) -> f32 {
        view.visualizer().state().map_or(f32::NAN, |s| s.camera.zoom_speed())
    }

    #[test]
    fn discarded_pass_does_not_step_the_scene_again() {
        let ctx = egui::Context::default();
        let mut view = ParticleFieldView::new(&ctx, config());
        let mut passes = 0;
        let _ = ctx.run(input(800.0, 600.0, Vec::new()), |ctx| {
            passes += 1;
            egui::CentralPanel::default().show(ctx, |ui| {
                view.show(ui, FrameInput::idle());
            });
            if passes == 1 {
                ctx.request_discard("layout changed");
            }
        });
        assert_eq!(passes, 2);
        assert_eq!(frame_count(&view), 1);

        show_frame(&ctx, &mut view, input(800.0, 600.0, Vec::new()));
        assert_eq!(frame_count(&view), 2);
    }

    #[test]
    fn wheel_over_the_view_zooms_and_is_consumed() {
        let ctx = egui::Context::default();
        let mut view = ParticleFieldView::new(&ctx, config());
        show_frame(&ctx, &mut view, input(800.0, 600.0, vec![Event::PointerMoved(Pos2::new(400.0, 300.0))]));
        assert_eq!(zoom(&view), 1.0);

        // content moving up is a DOM wheel-down: zoom in
        let left_over = show_frame(&ctx, &mut view, input(800.0, 600.0, vec![wheel(MouseWheelUnit::Point, -100.0)]));
        assert!((zoom(&view) - 0.9).abs() < 1e-6, "zoom {}", zoom(&view));
        assert_eq!(left_over, Vec2::ZERO);

        show_frame(&ctx, &mut view, input(800.0, 600.0, vec![wheel(MouseWheelUnit::Point, 300.0)]));
        assert!((zoom(&view) - 1.2).abs() < 1e-6, "zoom {}", zoom(&view));
    }

    #[test]
    fn wheel_away_from_the_view_is_left_alone() {
        let ctx = egui::Context::default();
        let mut view = ParticleFieldView::new(&ctx, config());
        show_frame(&ctx, &mut view, input(800.0, 600.0, Vec::new()));
        let left_over = show_frame(&ctx, &mut view, input(800.0, 600.0, vec![wheel(MouseWheelUnit::Point, -100.0)]));
        assert_eq!(zoom(&view), 1.0);
        assert_eq!(left_over, Vec2::new(0.0, -100.0));
    }

    #[test]
    fn wheel_notches_count_as_browser_pixels() {
        assert_eq!(dom_delta_y(&[wheel(MouseWheelUnit::Line, -1.0)], 600.0), 100.0);
        assert_eq!(dom_delta_y(&[wheel(MouseWheelUnit::Page, 1.0)], 600.0), -600.0);
        let mixed = [wheel(MouseWheelUnit::Point, -20.0), Event::PointerGone, wheel(MouseWheelUnit::Line, -2.0)];
        assert_eq!(dom_delta_y(&mixed, 600.0), 220.0);

        let ctx = egui::Context::default();
        let mut view = ParticleFieldView::new(&ctx, config());
        show_frame(&ctx, &mut view, input(800.0, 600.0, vec![Event::PointerMoved(Pos2::new(400.0, 300.0))]));
        show_frame(&ctx, &mut view, input(800.0, 600.0, vec![wheel(MouseWheelUnit::Line, -1.0)]));
        assert!((zoom(&view) - 0.9).abs() < 1e-6, "zoom {}", zoom(&view));
    }

    #[test]
    fn view_follows_window_resizes() {
        let ctx = egui::Context::default();
        let mut view = ParticleFieldView::new(&ctx, config());
        show_frame(&ctx, &mut view, input(800.0, 600.0, Vec::new()));
        let first = view.visualizer().state().map(|s| s.surface);

        show_frame(&ctx, &mut view, input(1200.0, 500.0, Vec::new()));
        let state = view.visualizer().state().expect("still mounted");
        assert_ne!(Some(state.surface), first);
        assert!(state.surface.width > state.surface.height);
        assert!((state.camera.aspect - state.surface.aspect()).abs() < 1e-6);
    }

    #[test]
    fn empty_surface_is_retried_only_after_it_changes() {
        let ctx = egui::Context::default();
        let mut view = ParticleFieldView::new(&ctx, config());
        let show_sized = |view: &mut ParticleFieldView, size: Vec2| {
            let _ = ctx.run(input(800.0, 600.0, Vec::new()), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.allocate_ui(size, |ui| view.show(ui, FrameInput::idle()));
                });
            });
        };

        show_sized(&mut view, Vec2::ZERO);
        assert_eq!(view.visualizer().phase(), LifecyclePhase::Unmounted);
        assert_eq!(view.rejected, Some(SurfaceSize::new(0.0, 0.0)));

        show_sized(&mut view, Vec2::ZERO);
        assert_eq!(view.visualizer().phase(), LifecyclePhase::Unmounted);

        show_sized(&mut view, Vec2::new(320.0, 240.0));
        assert_eq!(view.visualizer().phase(), LifecyclePhase::MountedAnimating);
        assert_eq!(view.rejected, None);
    }
}

use egui::{Color32, Painter, Pos2, Rect, Shape, Vec2};
use glam::{Mat4, Vec3};

use crate::camera::CameraState;
use crate::config::{Blending, PointMaterial};
use crate::geometry::Rgb;
use crate::scene::VisualizerState;

/// Receives the finished scene once per frame.
pub trait FrameTarget {
    fn submit(&mut self, state: &VisualizerState);
}

/// One projected point, ready to paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub center: Pos2,
    pub size: f32,
    pub color: Color32,
}

/// Paints onto an egui surface; `rect` is the region the scene was mounted on.
pub struct EguiTarget<'a> {
    pub painter: &'a Painter,
    pub rect: Rect,
}

impl<'a> EguiTarget<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }
}

impl FrameTarget for EguiTarget<'_> {
    fn submit(&mut self, state: &VisualizerState) {
        self.painter.rect_filled(self.rect, 0.0, Color32::BLACK);
        let shapes = scene_sprites(state, self.rect).into_iter().map(|s| {
            Shape::rect_filled(Rect::from_center_size(s.center, Vec2::splat(s.size)), 0.0, s.color)
        });
        self.painter.extend(shapes);
    }
}

/// Stars first, then the swarm on top, both offset to `rect`.
pub fn scene_sprites(state: &VisualizerState, rect: Rect) -> Vec<Sprite> {
    let camera = &state.camera;
    let view_projection = camera.view_projection();
    let mut sprites = Vec::with_capacity(state.stars.len() + state.swarm.len());

    let stars = &state.stars;
    project_cloud(
        camera,
        &(view_projection * stars.model_matrix()),
        &stars.geometry.positions,
        |i| stars.geometry.color(i),
        &stars.material,
        rect,
        &mut sprites,
    );

    let swarm = &state.swarm;
    project_cloud(
        camera,
        &(view_projection * swarm.model_matrix()),
        &swarm.positions,
        |i| swarm.geometry.colors[i],
        &swarm.material,
        rect,
        &mut sprites,
    );
    sprites
}

fn project_cloud(
    camera: &CameraState,
    mvp: &Mat4,
    positions: &[Vec3],
    color_of: impl Fn(usize) -> Rgb,
    material: &PointMaterial,
    rect: Rect,
    out: &mut Vec<Sprite>,
) {
    let half_height = rect.height() * 0.5;
    for (i, p) in positions.iter().enumerate() {
        let Some(screen) = camera.project(mvp, *p, rect.width(), rect.height()) else {
            continue;
        };
        // perspective size attenuation, never thinner than a pixel
        let size = (material.size * half_height / screen.depth).max(1.0);
        out.push(Sprite {
            center: Pos2::new(rect.left() + screen.x, rect.top() + screen.y),
            size,
            color: material_color(color_of(i), material),
        });
    }
}

pub fn material_color(rgb: Rgb, material: &PointMaterial) -> Color32 {
    let [r, g, b] = rgb.map(|c| c.clamp(0.0, 1.0));
    match material.blending {
        // premultiplied colour with zero alpha adds onto what is below
        Blending::Additive => {
            let k = material.opacity * 255.0;
            Color32::from_rgba_premultiplied(
                (r * k).round() as u8,
                (g * k).round() as u8,
                (b * k).round() as u8,
                0,
            )
        }
        Blending::Normal => Color32::from_rgba_unmultiplied(
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            (material.opacity * 255.0).round() as u8,
        ),
    }
}

use glam::{Mat4, Vec3, Vec4Swizzles};

use crate::config::CameraParams;

/// A world point mapped into surface coordinates (origin top-left, y down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Distance along the view direction; drives point-size attenuation.
    pub depth: f32,
}

/// Perspective camera orbiting the origin. Right-handed, always looking at
/// the origin with +Y up.
#[derive(Clone, Debug)]
pub struct CameraState {
    params: CameraParams,
    pub position: Vec3,
    pub aspect: f32,
    zoom_speed: f32,
    time: f32,
}

impl CameraState {
    pub fn new(params: CameraParams, aspect: f32) -> Self {
        let position = Vec3::from_array(params.initial_position);
        Self {
            params,
            position,
            aspect,
            zoom_speed: 1.0,
            time: 0.0,
        }
    }

    pub fn zoom_speed(&self) -> f32 {
        self.zoom_speed
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn base_distance(&self) -> f32 {
        self.params.base_distance
    }

    /// Wheel input, `delta_y` in DOM convention (positive scrolls down and
    /// pulls the camera in).
    pub fn scroll(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        let zoom = self.zoom_speed - delta_y * self.params.zoom_sensitivity;
        self.zoom_speed = zoom.clamp(self.params.min_zoom, self.params.max_zoom);
    }

    /// Returns false (and keeps the old aspect) for a degenerate surface.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return false;
        }
        self.aspect = width / height;
        true
    }

    pub fn advance(&mut self, time_step: f32) {
        self.time += time_step;
    }

    /// Recompute the orbit pose from the current time and zoom.
    pub fn update_pose(&mut self) {
        let distance = self.params.base_distance * self.zoom_speed;
        let phase = self.time * self.params.orbit_rate;
        self.position = Vec3::new(
            phase.sin() * distance,
            self.params.height * self.zoom_speed,
            phase.cos() * distance,
        );
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.params.fov_y_degrees.to_radians(),
            self.aspect.max(1e-6),
            self.params.near,
            self.params.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project through `view_projection` (which may include a model transform)
    /// onto a `width` x `height` surface. Points outside the near/far range are
    /// culled.
    pub fn project(&self, view_projection: &Mat4, point: Vec3, width: f32, height: f32) -> Option<ScreenPoint> {
        let clip = *view_projection * point.extend(1.0);
        // for perspective_rh, w is the view-space distance in front of the eye
        let depth = clip.w;
        if depth < self.params.near || depth > self.params.far {
            return None;
        }
        let ndc = clip.xyz() / depth;
        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * width,
            y: (1.0 - ndc.y) * 0.5 * height,
            depth,
        })
    }
}

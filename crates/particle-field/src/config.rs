use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, VisualizerError};

/// Spiral galaxy layout and the ring it morphs into.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyParams {
    pub particle_count: usize,
    pub arm_count: u32,
    pub arm_width: f32,
    pub spiral_tightness: f32,
    pub vertical_thickness: f32,
    // Radius domain of the spiral; also normalises the colour gradient
    pub max_radius: f32,
    pub circle_radius: f32,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            particle_count: 2000,
            arm_count: 3,
            arm_width: 0.5,
            spiral_tightness: 0.3,
            vertical_thickness: 0.2,
            max_radius: 10.0,
            circle_radius: 8.0,
        }
    }
}

/// Background shell of stars.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarParams {
    pub star_count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_brightness: f32,
    pub max_brightness: f32,
}

impl Default for StarParams {
    fn default() -> Self {
        Self {
            star_count: 2000,
            min_radius: 50.0,
            max_radius: 100.0,
            min_brightness: 0.5,
            max_brightness: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub base_distance: f32,
    pub height: f32,
    pub orbit_rate: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_sensitivity: f32,
    /// Pose used until the first frame moves the camera.
    pub initial_position: [f32; 3],
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            base_distance: 15.0,
            height: 10.0,
            orbit_rate: 0.2,
            min_zoom: 0.3,
            max_zoom: 2.0,
            zoom_sensitivity: 0.001,
            initial_position: [0.0, 15.0, 15.0],
        }
    }
}

/// Per-frame increments. Everything here is counted in frames, not seconds,
/// unless `frame_rate_independent` is set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    pub time_step: f32,
    pub transition_rate: f32,
    pub expansion_gain: f32,
    pub vertical_gain: f32,
    pub particle_spin: f32,
    pub star_spin: f32,
    pub frame_rate_independent: bool,
    pub reference_fps: f32,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            time_step: 0.002,
            transition_rate: 0.05,
            expansion_gain: 0.5,
            vertical_gain: 0.5,
            particle_spin: 0.001,
            star_spin: -0.0002,
            frame_rate_independent: false,
            reference_fps: 60.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Blending {
    Normal,
    Additive,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointMaterial {
    /// World-space point size, attenuated by view depth when drawn.
    pub size: f32,
    pub opacity: f32,
    pub blending: Blending,
}

impl PointMaterial {
    pub fn particles() -> Self {
        Self { size: 0.15, opacity: 0.8, blending: Blending::Additive }
    }

    pub fn stars() -> Self {
        Self { size: 0.1, opacity: 0.8, blending: Blending::Normal }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub galaxy: GalaxyParams,
    pub stars: StarParams,
    pub camera: CameraParams,
    pub motion: MotionParams,
    pub particle_material: PointMaterial,
    pub star_material: PointMaterial,
    /// Fixed seed for reproducible geometry. `None` draws from the thread rng.
    pub seed: Option<u64>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            galaxy: GalaxyParams::default(),
            stars: StarParams::default(),
            camera: CameraParams::default(),
            motion: MotionParams::default(),
            particle_material: PointMaterial::particles(),
            star_material: PointMaterial::stars(),
            seed: None,
        }
    }
}

impl VisualizerConfig {
    /// Parse a (possibly partial) JSON document; missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns [`VisualizerError::ConfigParse`] for malformed JSON and
    /// [`VisualizerError::InvalidConfig`] when the values fail [`Self::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Fails when the file cannot be read or does not hold a valid config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// # Errors
    /// Returns [`VisualizerError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let g = &self.galaxy;
        if g.arm_count == 0 {
            return Err(invalid("galaxy.arm_count must be at least 1"));
        }
        if !(g.max_radius > 0.0) || !(g.circle_radius > 0.0) {
            return Err(invalid("galaxy radii must be positive"));
        }
        let s = &self.stars;
        if !(s.min_radius > 0.0) || s.max_radius < s.min_radius {
            return Err(invalid("stars.min_radius must be positive and not above stars.max_radius"));
        }
        if s.max_brightness < s.min_brightness {
            return Err(invalid("stars.min_brightness must not exceed stars.max_brightness"));
        }
        let c = &self.camera;
        if !(c.min_zoom > 0.0) || c.max_zoom < c.min_zoom {
            return Err(invalid("camera zoom range is empty or non-positive"));
        }
        if !(c.near > 0.0) || c.far <= c.near {
            return Err(invalid("camera.near must be positive and below camera.far"));
        }
        if !(c.fov_y_degrees > 0.0 && c.fov_y_degrees < 180.0) {
            return Err(invalid("camera.fov_y_degrees must lie in (0, 180)"));
        }
        let m = &self.motion;
        if !(0.0..=1.0).contains(&m.transition_rate) {
            return Err(invalid("motion.transition_rate must lie in [0, 1]"));
        }
        if m.frame_rate_independent && !(m.reference_fps > 0.0) {
            return Err(invalid("motion.reference_fps must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> VisualizerError {
    VisualizerError::InvalidConfig(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(VisualizerConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = VisualizerConfig::from_json_str(r#"{ "galaxy": { "particle_count": 4 }, "seed": 7 }"#)
            .expect("valid config");
        assert_eq!(cfg.galaxy.particle_count, 4);
        assert_eq!(cfg.galaxy.arm_count, 3);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.camera, CameraParams::default());
    }

    #[test]
    fn rejects_zero_arms() {
        let err = VisualizerConfig::from_json_str(r#"{ "galaxy": { "arm_count": 0 } }"#).unwrap_err();
        assert!(matches!(err, VisualizerError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_inverted_zoom_range() {
        let mut cfg = VisualizerConfig::default();
        cfg.camera.min_zoom = 3.0;
        assert!(matches!(cfg.validate(), Err(VisualizerError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = VisualizerConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, VisualizerError::ConfigParse(_)));
    }
}

use glam::{Mat4, Vec3};
use rand::Rng;

use crate::camera::CameraState;
use crate::config::{PointMaterial, VisualizerConfig};
use crate::error::{Result, VisualizerError};
use crate::frame::TransitionState;
use crate::geometry::{generate_particles, generate_stars, ParticleGeometry};
use crate::starfield::StarField;

/// Drawable region offered by the host, in drawable units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// The audio-reactive cloud. `positions` is the live buffer, the only
/// per-point data written after construction.
#[derive(Clone, Debug)]
pub struct ParticleSwarm {
    pub geometry: ParticleGeometry,
    pub positions: Vec<Vec3>,
    pub material: PointMaterial,
    rotation: f32,
}

impl ParticleSwarm {
    pub fn new(geometry: ParticleGeometry, material: PointMaterial) -> Self {
        let positions = geometry.original.clone();
        Self { geometry, positions, material, rotation: 0.0 }
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn rotate(&mut self, step: f32) {
        self.rotation += step;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Everything one mounted scene owns. Handed by exclusive reference to each
/// frame update; dropped as a whole on teardown.
#[derive(Clone, Debug)]
pub struct VisualizerState {
    pub config: VisualizerConfig,
    pub surface: SurfaceSize,
    pub camera: CameraState,
    pub swarm: ParticleSwarm,
    pub stars: StarField,
    pub transition: TransitionState,
    pub frame: u64,
    /// Set while playing without spectrum data, so the gap is logged once.
    pub(crate) starved: bool,
}

impl VisualizerState {
    /// Build a fresh scene on `surface`.
    ///
    /// # Errors
    /// [`VisualizerError::MissingSurface`] when the surface has no area, or
    /// [`VisualizerError::InvalidConfig`] when `config` does not validate.
    pub fn new<R: Rng + ?Sized>(config: VisualizerConfig, surface: SurfaceSize, rng: &mut R) -> Result<Self> {
        if !surface.is_drawable() {
            return Err(VisualizerError::MissingSurface {
                width: surface.width,
                height: surface.height,
            });
        }
        config.validate()?;

        let particles = generate_particles(&config.galaxy, rng);
        let stars = generate_stars(&config.stars, rng);
        let swarm = ParticleSwarm::new(particles, config.particle_material.clone());
        let stars = StarField::new(stars, config.star_material.clone(), config.motion.star_spin);
        let camera = CameraState::new(config.camera.clone(), surface.aspect());

        Ok(Self {
            config,
            surface,
            camera,
            swarm,
            stars,
            transition: TransitionState::default(),
            frame: 0,
            starved: false,
        })
    }

    /// Track a new surface size. Degenerate sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if self.camera.resize(width, height) {
            self.surface = SurfaceSize::new(width, height);
            true
        } else {
            log::debug!("ignoring resize to {width}x{height}");
            false
        }
    }

    pub fn scroll(&mut self, delta_y: f32) {
        self.camera.scroll(delta_y);
    }
}

//! Static point layouts, generated once per mount.
//!
//! The particle swarm has two shapes: a spiral galaxy (its resting shape) and
//! a flat ring it morphs into while audio plays. Stars sit on a thick
//! spherical shell far behind both.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::config::{GalaxyParams, StarParams};

pub type Rgb = [f32; 3];

/// Three parallel arrays of `particle_count` entries; immutable after creation.
#[derive(Clone, Debug, Default)]
pub struct ParticleGeometry {
    pub original: Vec<Vec3>,
    pub target: Vec<Vec3>,
    pub colors: Vec<Rgb>,
}

impl ParticleGeometry {
    pub fn len(&self) -> usize {
        self.original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct StarGeometry {
    pub positions: Vec<Vec3>,
    /// Shared by the r, g and b channels.
    pub brightness: Vec<f32>,
}

impl StarGeometry {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn color(&self, i: usize) -> Rgb {
        let b = self.brightness[i];
        [b, b, b]
    }
}

pub fn generate_particles<R: Rng + ?Sized>(params: &GalaxyParams, rng: &mut R) -> ParticleGeometry {
    let n = params.particle_count;
    let mut geometry = ParticleGeometry {
        original: Vec::with_capacity(n),
        target: Vec::with_capacity(n),
        colors: Vec::with_capacity(n),
    };
    for i in 0..n {
        let position = spiral_position(params, rng);
        geometry.colors.push(radial_color(position, params.max_radius));
        geometry.original.push(position);
        geometry.target.push(circle_position(i, n, params.circle_radius));
    }
    geometry
}

/// One particle on a random arm of the spiral.
pub fn spiral_position<R: Rng + ?Sized>(params: &GalaxyParams, rng: &mut R) -> Vec3 {
    let radius = rng.random::<f32>() * params.max_radius;
    let spin_angle = radius * params.spiral_tightness;
    let arm = rng.random_range(0..params.arm_count.max(1));
    let arm_offset = TAU / params.arm_count.max(1) as f32;
    let angle = spin_angle + arm as f32 * arm_offset;

    let spread = (rng.random::<f32>() - 0.5) * params.arm_width * radius;
    let vertical = (rng.random::<f32>() - 0.5) * params.vertical_thickness * radius;

    // spread runs perpendicular to the arm direction, in the disc plane
    Vec3::new(
        radius * angle.cos() + spread * (angle + FRAC_PI_2).cos(),
        vertical,
        radius * angle.sin() + spread * (angle + FRAC_PI_2).sin(),
    )
}

/// Slot `i` of `count` evenly spaced on a horizontal ring.
pub fn circle_position(i: usize, count: usize, radius: f32) -> Vec3 {
    let angle = i as f32 / count as f32 * TAU;
    Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}

/// Purple core fading to warm pink at the rim.
pub fn radial_color(position: Vec3, max_radius: f32) -> Rgb {
    let d = position.length() / max_radius;
    [0.5 + d * 0.5, 0.2 + d * 0.3, 1.0 - d * 0.5]
}

pub fn generate_stars<R: Rng + ?Sized>(params: &StarParams, rng: &mut R) -> StarGeometry {
    let n = params.star_count;
    let mut stars = StarGeometry {
        positions: Vec::with_capacity(n),
        brightness: Vec::with_capacity(n),
    };
    for _ in 0..n {
        let radius = params.min_radius + rng.random::<f32>() * (params.max_radius - params.min_radius);
        let theta = rng.random::<f32>() * TAU;
        let phi = rng.random::<f32>() * PI;
        stars.positions.push(Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        ));
        stars
            .brightness
            .push(params.min_brightness + rng.random::<f32>() * (params.max_brightness - params.min_brightness));
    }
    stars
}

use glam::Mat4;

use crate::config::PointMaterial;
use crate::geometry::StarGeometry;

/// Ambient backdrop. Never reacts to audio; the whole cloud slowly turns
/// about the vertical axis.
#[derive(Clone, Debug)]
pub struct StarField {
    pub geometry: StarGeometry,
    pub material: PointMaterial,
    rotation: f32,
    spin: f32,
}

impl StarField {
    pub fn new(geometry: StarGeometry, material: PointMaterial, spin: f32) -> Self {
        Self { geometry, material, rotation: 0.0, spin }
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn rotate(&mut self) {
        self.rotation += self.spin;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation)
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn rotation_is_applied_to_the_cloud_not_the_points() {
        let geometry = StarGeometry {
            positions: vec![Vec3::new(60.0, 0.0, 0.0)],
            brightness: vec![0.7],
        };
        let mut stars = StarField::new(geometry, PointMaterial::stars(), -0.0002);
        for _ in 0..10 {
            stars.rotate();
        }
        assert!((stars.rotation() + 0.002).abs() < 1e-7);
        assert_eq!(stars.geometry.positions[0], Vec3::new(60.0, 0.0, 0.0));

        let moved = stars.model_matrix().transform_point3(stars.geometry.positions[0]);
        assert!((moved.length() - 60.0).abs() < 1e-3);
        assert!(moved.z > 0.0, "negative spin about +Y carries +X towards +Z");
    }
}

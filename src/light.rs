//! Lighting types for the renderer.

use crate::math::vec3::Vec3;

/// A point light with inverse-square falloff.
///
/// Positions are given in view space; the scene places lights relative to
/// the camera rather than the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    /// Per-channel radiant intensity before falloff.
    pub intensity: Vec3,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            intensity: Vec3::new(500.0, 500.0, 500.0),
        }
    }
}

impl PointLight {
    pub fn new(position: Vec3, intensity: Vec3) -> Self {
        Self {
            position,
            intensity,
        }
    }

    /// A light of equal intensity in every channel.
    pub fn white(position: Vec3, intensity: f32) -> Self {
        Self::new(position, Vec3::new(intensity, intensity, intensity))
    }

    /// Unit direction from `point` toward the light and the intensity that
    /// reaches it (`I / r²`). `None` when the point sits on the light.
    pub fn incident(&self, point: Vec3) -> Option<(Vec3, Vec3)> {
        let to_light = self.position - point;
        let r2 = to_light.length_squared();
        let direction = to_light.try_normalize()?;
        Some((direction, self.intensity / r2))
    }
}

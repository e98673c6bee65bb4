//! Scene and render settings, loaded from RON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```ron
//! (
//!     width: 320,
//!     height: 240,
//!     lights: [(position: (0.0, 10.0, 5.0), intensity: 300.0)],
//! )
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;
use crate::light::PointLight;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LightConfig {
    pub position: (f32, f32, f32),
    pub intensity: f32,
}

impl LightConfig {
    pub fn to_light(&self) -> PointLight {
        let (x, y, z) = self.position;
        PointLight::white(Vec3::new(x, y, z), self.intensity)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub clear_color: [f32; 4],
    /// View-space point lights.
    pub lights: Vec<LightConfig>,
    pub frames: u32,
    pub frame_seconds: f32,
    pub model_scale: f32,
    pub spin_degrees_per_frame: f32,
    pub camera_position: (f32, f32, f32),
}

impl Default for RenderConfig {
    fn default() -> Self {
        let light = |x, y, z| LightConfig {
            position: (x, y, z),
            intensity: 800.0,
        };
        Self {
            width: 800,
            height: 600,
            fov_y_degrees: 45.0,
            z_near: 0.1,
            z_far: 50.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            lights: vec![
                light(20.0, 20.0, 100.0),
                light(-20.0, 20.0, 0.0),
                light(-20.0, -20.0, 0.0),
            ],
            frames: 1,
            frame_seconds: 1.0 / 60.0,
            model_scale: 0.1,
            spin_degrees_per_frame: 3.0,
            camera_position: (0.0, 0.0, 10.0),
        }
    }
}

impl RenderConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = Self::from_ron(&contents)?;
        log::info!(
            "loaded render config {} ({}x{}, {} lights)",
            path.as_ref().display(),
            config.width,
            config.height,
            config.lights.len()
        );
        Ok(config)
    }

    pub fn from_ron(s: &str) -> Result<Self, LoadError> {
        Ok(ron::from_str(s)?)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective(self.fov_y_degrees, self.aspect_ratio(), self.z_near, self.z_far)
    }

    pub fn clear_color(&self) -> Vec4 {
        let [r, g, b, a] = self.clear_color;
        Vec4::new(r, g, b, a)
    }

    pub fn point_lights(&self) -> Vec<PointLight> {
        self.lights.iter().map(LightConfig::to_light).collect()
    }

    pub fn camera_position(&self) -> Vec3 {
        let (x, y, z) = self.camera_position;
        Vec3::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_describe_reference_scene() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.lights.len(), 3);
        assert_eq!(config.point_lights()[0].intensity, Vec3::new(800.0, 800.0, 800.0));
        assert_eq!(config.camera_position(), Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = RenderConfig::from_ron(
            "(width: 64, height: 32, lights: [(position: (1.0, 2.0, 3.0), intensity: 5.0)])",
        )
        .expect("valid ron");
        assert_eq!(config.width, 64);
        assert_relative_eq!(config.aspect_ratio(), 2.0);
        assert_relative_eq!(config.z_far, 50.0);
        assert_eq!(config.lights[0].to_light().position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn malformed_config_is_a_config_error() {
        let err = RenderConfig::from_ron("(width: \"wide\")").unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
    }

    #[test]
    fn projection_uses_config_planes() {
        let config = RenderConfig {
            width: 100,
            height: 100,
            z_near: 1.0,
            z_far: 3.0,
            ..RenderConfig::default()
        };
        let near = config.projection() * Vec4::new(0.0, 0.0, -1.0, 1.0);
        assert_relative_eq!(near.z / near.w, 1.0, epsilon = 1e-5);
    }
}

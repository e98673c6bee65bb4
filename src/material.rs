//! Surface description handed to fragment shaders.

use crate::math::vec3::Vec3;
use crate::texture::{TextureId, TextureRegistry};

/// Blinn-Phong material.
///
/// A texture slot of `None` means the matching constant colour is used
/// as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Ka
    pub ambient: Vec3,
    /// Kd
    pub diffuse: Vec3,
    /// Ks
    pub specular: Vec3,
    /// Ns
    pub shininess: f32,
    pub diffuse_texture: Option<TextureId>,
    pub specular_texture: Option<TextureId>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::ZERO,
            diffuse: Vec3::new(0.8, 0.8, 0.8),
            specular: Vec3::ZERO,
            shininess: 1.0,
            diffuse_texture: None,
            specular_texture: None,
        }
    }
}

impl Material {
    /// Diffuse colour at `(u, v)`: the diffuse texture if one is set and
    /// registered, the constant otherwise.
    pub fn diffuse_at(&self, textures: &TextureRegistry, u: f32, v: f32) -> Vec3 {
        self.diffuse_texture
            .and_then(|id| textures.get(id))
            .map_or(self.diffuse, |t| t.get_color_uv(u, v).xyz())
    }

    /// Specular colour at `(u, v)`, same fallback as [`Material::diffuse_at`].
    pub fn specular_at(&self, textures: &TextureRegistry, u: f32, v: f32) -> Vec3 {
        self.specular_texture
            .and_then(|id| textures.get(id))
            .map_or(self.specular, |t| t.get_color_uv(u, v).xyz())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::WHITE;
    use crate::texture::Texture;

    #[test]
    fn missing_texture_uses_constant() {
        let textures = TextureRegistry::new();
        let material = Material {
            diffuse: Vec3::new(0.1, 0.2, 0.3),
            ..Material::default()
        };
        assert_eq!(material.diffuse_at(&textures, 0.5, 0.5), Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(material.specular_at(&textures, 0.5, 0.5), Vec3::ZERO);
    }

    #[test]
    fn texture_replaces_constant() {
        let mut textures = TextureRegistry::new();
        let mut white = Texture::new(2, 2);
        white.clear(WHITE);
        let id = textures.add(white);
        let material = Material {
            diffuse_texture: Some(id),
            ..Material::default()
        };
        assert_eq!(material.diffuse_at(&textures, 0.3, 0.9), Vec3::ONE);
    }
}

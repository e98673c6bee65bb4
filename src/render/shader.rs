//! Programmable vertex and fragment stages.
//!
//! The draw engine owns the fixed-function parts of the pipeline:
//! - skinning
//! - perspective divide and viewport mapping
//! - culling, coverage and depth testing
//! - attribute interpolation
//!
//! A [`Shader`] supplies the programmable parts: placing a vertex in clip
//! space and colouring a fragment. Any type implementing the trait can be
//! passed to [`Renderer::draw`](super::Renderer::draw).

use crate::light::PointLight;
use crate::material::Material;
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::texture::TextureRegistry;

/// Ambient term gain applied to the material's Ka.
pub const AMBIENT_GAIN: f32 = 10.0;

/// Per-draw camera state shared by every vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub model_view: Mat4,
    pub projection: Mat4,
    /// `(model_view⁻¹)ᵀ`, for carrying normals into view space.
    pub normal_matrix: Mat4,
    pub z_near: f32,
    pub z_far: f32,
}

impl Uniforms {
    /// Derives the normal matrix from `model_view`.
    ///
    /// Returns `None` when `model_view` is singular (e.g. a zero scale);
    /// such a draw has no defined normals and should be skipped.
    pub fn new(model_view: Mat4, projection: Mat4, z_near: f32, z_far: f32) -> Option<Self> {
        let normal_matrix = model_view.inverse()?.transpose();
        Some(Self {
            model_view,
            projection,
            normal_matrix,
            z_near,
            z_far,
        })
    }
}

/// Everything the vertex stage sees for one vertex.
#[derive(Debug, Clone, Copy)]
pub struct VertexInput<'a> {
    pub uniforms: &'a Uniforms,
    /// Weighted blend of this vertex's bone transforms (identity when
    /// unskinned). Already applied to `position`.
    pub skinning: Mat4,
    /// Skinned object-space position, w = 1.
    pub position: Vec4,
    /// Object-space normal, not yet skinned.
    pub normal: Vec3,
}

/// What the vertex stage hands back to the draw engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOutput {
    pub clip_position: Vec4,
    /// Interpolated across the triangle and used for back-face culling.
    pub view_position: Vec4,
    pub view_normal: Vec3,
}

/// Interpolated values for one covered pixel.
#[derive(Debug, Clone, Copy)]
pub struct FragmentInput<'a> {
    pub uv: Vec2,
    /// Unit view-space normal (zero if the mesh has no usable normals).
    pub normal: Vec3,
    pub view_position: Vec4,
    /// Interpolated vertex colour, white when the mesh has none.
    pub color: Vec4,
    pub material: &'a Material,
    pub lights: &'a [PointLight],
    pub textures: &'a TextureRegistry,
}

/// The two programmable stages of the pipeline.
pub trait Shader {
    fn vertex(&self, input: &VertexInput<'_>) -> VertexOutput;

    /// Returns an RGBA colour with channels in `[0, 1]`.
    fn fragment(&self, input: &FragmentInput<'_>) -> Vec4;
}

#[inline]
fn standard_vertex(input: &VertexInput<'_>) -> VertexOutput {
    let u = input.uniforms;
    let view_position = u.model_view * input.position;
    let skinned_normal = input.skinning * input.normal.to_direction();
    VertexOutput {
        clip_position: u.projection * view_position,
        view_position,
        view_normal: (u.normal_matrix * skinned_normal).xyz(),
    }
}

/// Blinn-Phong shading with point lights.
///
/// For every light, with `v` pointing at the eye and `l` at the light:
///
/// ```text
/// La = Ka * 10
/// Ld = max(0, n·l) * Kd * I/r²
/// Ls = max(0, n·h)^Ns * Ks * I/r²      h = normalize(v + l)
/// colour = Σ (La + Ld + Ls)
/// ```
///
/// Kd and Ks come from the material's textures when it has them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhongShader;

impl Shader for PhongShader {
    fn vertex(&self, input: &VertexInput<'_>) -> VertexOutput {
        standard_vertex(input)
    }

    fn fragment(&self, input: &FragmentInput<'_>) -> Vec4 {
        let material = input.material;
        let (u, v) = (input.uv.x, input.uv.y);
        let kd = material.diffuse_at(input.textures, u, v);
        let ks = material.specular_at(input.textures, u, v);
        let la = material.ambient * AMBIENT_GAIN;

        let surface = input.view_position.xyz();
        let to_eye = (-surface).try_normalize().unwrap_or(Vec3::BACK);
        let n = input.normal;

        let mut color = Vec3::ZERO;
        for light in input.lights {
            let Some((l, irradiance)) = light.incident(surface) else {
                continue;
            };
            let ld = kd.mul_elements(irradiance) * n.dot(l).max(0.0);
            let ls = match (to_eye + l).try_normalize() {
                Some(h) => ks.mul_elements(irradiance) * n.dot(h).max(0.0).powf(material.shininess),
                None => Vec3::ZERO,
            };
            color = color + la + ld + ls;
        }

        Vec4::new(color.x, color.y, color.z, 1.0)
    }
}

/// Constant colour, modulated by any per-vertex colour.
#[derive(Debug, Clone, Copy)]
pub struct FlatShader {
    pub color: Vec4,
}

impl FlatShader {
    pub fn new(color: Vec4) -> Self {
        Self { color }
    }
}

impl Shader for FlatShader {
    fn vertex(&self, input: &VertexInput<'_>) -> VertexOutput {
        standard_vertex(input)
    }

    fn fragment(&self, input: &FragmentInput<'_>) -> Vec4 {
        Vec4::new(
            self.color.x * input.color.x,
            self.color.y * input.color.y,
            self.color.z * input.color.z,
            self.color.w * input.color.w,
        )
    }
}

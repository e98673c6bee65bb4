//! The draw engine.
//!
//! [`Renderer`] owns the buffer store, the colour target and the depth
//! buffer. A frame is `clear_color`, `clear_depth`, then one [`draw`] per
//! mesh; the finished image is read back through [`Renderer::render_target`].
//!
//! [`draw`]: Renderer::draw

use super::framebuffer::FrameBuffer;
use super::rasterizer::{is_back_facing, rasterize_triangle, ScreenTriangle};
use super::shader::{FragmentInput, Shader, Uniforms, VertexInput};
use crate::buffer::{
    require, BoneWeightBufferId, BufferStore, ColorBufferId, IndexBufferId, NormalBufferId,
    PositionBufferId, UvBufferId, VertexWeight,
};
use crate::colors::{self, WHITE};
use crate::error::{BufferKind, RenderError};
use crate::light::PointLight;
use crate::material::Material;
use crate::math::interpolate::{interpolate_linear, interpolate_perspective};
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::texture::{Texture, TextureRegistry};

/// How the index buffer is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Primitive {
    /// Filled, depth-tested, shaded triangles.
    #[default]
    Triangle,
    /// Every vertex plotted as one debug-coloured pixel, no depth test.
    Point,
}

/// Buffer handles for one mesh. Optional attributes fall back to zero
/// (normals, UVs), white (colours) or no skinning (bone weights).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBuffers {
    pub positions: PositionBufferId,
    pub indices: IndexBufferId,
    pub normals: Option<NormalBufferId>,
    pub uvs: Option<UvBufferId>,
    pub colors: Option<ColorBufferId>,
    pub bone_weights: Option<BoneWeightBufferId>,
}

impl MeshBuffers {
    pub fn new(positions: PositionBufferId, indices: IndexBufferId) -> Self {
        Self {
            positions,
            indices,
            normals: None,
            uvs: None,
            colors: None,
            bone_weights: None,
        }
    }
}

/// Everything one draw call needs. Built fresh per mesh per frame.
#[derive(Debug, Clone)]
pub struct DrawParams {
    pub buffers: MeshBuffers,
    /// Final bone transforms indexed by bone; empty for static meshes.
    pub bone_transforms: Vec<Mat4>,
    pub uniforms: Uniforms,
    pub material: Material,
    pub lights: Vec<PointLight>,
    pub primitive: Primitive,
}

impl DrawParams {
    pub fn new(buffers: MeshBuffers, uniforms: Uniforms) -> Self {
        Self {
            buffers,
            bone_transforms: Vec::new(),
            uniforms,
            material: Material::default(),
            lights: Vec::new(),
            primitive: Primitive::Triangle,
        }
    }
}

/// Resolved, validated attribute slices for one draw.
struct VertexData<'a> {
    positions: &'a [Vec3],
    normals: Option<&'a [Vec3]>,
    uvs: Option<&'a [Vec2]>,
    colors: Option<&'a [Vec4]>,
    bone_weights: &'a [Vec<VertexWeight>],
    indices: &'a [[u32; 3]],
}

/// Per-vertex results of the vertex stage.
struct ShadedVertex {
    screen: Vec4,
    view_position: Vec4,
    view_normal: Vec3,
}

pub struct Renderer {
    buffers: BufferStore,
    target: Texture,
    depth: Vec<f32>,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffers: BufferStore::new(),
            target: Texture::new(width, height),
            depth: vec![0.0; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.target.width()
    }

    pub fn height(&self) -> u32 {
        self.target.height()
    }

    /// Replaces the colour and depth targets. Uploaded buffers are kept.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.target = Texture::new(width, height);
        self.depth = vec![0.0; (width * height) as usize];
    }

    pub fn buffers(&self) -> &BufferStore {
        &self.buffers
    }

    pub fn buffers_mut(&mut self) -> &mut BufferStore {
        &mut self.buffers
    }

    pub fn clear_color(&mut self, color: Vec4) {
        self.target.clear(color);
    }

    /// Clear the depth buffer to prepare for a new frame.
    /// Every pixel goes back to 0.0, which any fragment in range beats.
    pub fn clear_depth(&mut self) {
        self.depth.fill(0.0);
    }

    /// The finished image, top-left origin.
    pub fn render_target(&self) -> &Texture {
        &self.target
    }

    /// Depth values, row-major from the **bottom** row.
    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.target.as_bytes()
    }

    /// Runs the full pipeline for one mesh.
    ///
    /// All buffer handles and per-mesh invariants are checked before any
    /// pixel is written; on error the targets are left untouched.
    pub fn draw<S: Shader + ?Sized>(
        &mut self,
        params: &DrawParams,
        shader: &S,
        textures: &TextureRegistry,
    ) -> Result<(), RenderError> {
        let Renderer {
            buffers,
            target,
            depth,
        } = self;
        let data = resolve(buffers, params).inspect_err(|err| log::error!("draw rejected: {err}"))?;
        let mut fb = FrameBuffer::new(target, depth);

        let vertices = shade_vertices(&data, params, shader, fb.width(), fb.height());

        match params.primitive {
            Primitive::Point => {
                for v in &vertices {
                    fb.set_pixel(
                        v.screen.x.floor() as i32,
                        v.screen.y.floor() as i32,
                        colors::POINT_DEBUG,
                    );
                }
            }
            Primitive::Triangle => {
                let culled = draw_triangles(&data, &vertices, params, shader, textures, &mut fb);
                log::trace!(
                    "drew {} triangles, {culled} back-facing",
                    data.indices.len() - culled
                );
            }
        }
        Ok(())
    }
}

/// Looks up every buffer the draw names and checks lengths and indices.
fn resolve<'a>(
    buffers: &'a BufferStore,
    params: &DrawParams,
) -> Result<VertexData<'a>, RenderError> {
    let ids = &params.buffers;
    let positions = require(
        buffers.positions(ids.positions),
        BufferKind::Position,
        ids.positions.raw(),
    )?;
    let len = positions.len();

    let check_len = |kind: BufferKind, actual: usize| {
        if actual == len {
            Ok(())
        } else {
            Err(RenderError::BufferLengthMismatch {
                kind,
                expected: len,
                actual,
            })
        }
    };

    let normals = ids
        .normals
        .map(|id| require(buffers.normals(id), BufferKind::Normal, id.raw()))
        .transpose()?;
    let uvs = ids
        .uvs
        .map(|id| require(buffers.uvs(id), BufferKind::Uv, id.raw()))
        .transpose()?;
    let colors = ids
        .colors
        .map(|id| require(buffers.colors(id), BufferKind::Color, id.raw()))
        .transpose()?;
    let bone_weights = ids
        .bone_weights
        .map(|id| require(buffers.bone_weights(id), BufferKind::BoneWeight, id.raw()))
        .transpose()?
        .unwrap_or(&[]);
    let indices = require(
        buffers.indices(ids.indices),
        BufferKind::Index,
        ids.indices.raw(),
    )?;

    if let Some(n) = normals {
        check_len(BufferKind::Normal, n.len())?;
    }
    if let Some(uv) = uvs {
        check_len(BufferKind::Uv, uv.len())?;
    }
    if let Some(c) = colors {
        check_len(BufferKind::Color, c.len())?;
    }
    // An empty weight buffer marks the whole mesh as unskinned.
    if !bone_weights.is_empty() {
        check_len(BufferKind::BoneWeight, bone_weights.len())?;
    }

    let bones = params.bone_transforms.len();
    for (vertex, weights) in bone_weights.iter().enumerate() {
        if let Some(w) = weights.iter().find(|w| w.bone >= bones) {
            return Err(RenderError::BoneOutOfRange {
                vertex,
                bone: w.bone,
                bones,
            });
        }
    }

    if params.primitive == Primitive::Triangle {
        for (triangle, tri) in indices.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= len) {
                return Err(RenderError::IndexOutOfRange {
                    triangle,
                    index,
                    len,
                });
            }
        }
    }

    Ok(VertexData {
        positions,
        normals,
        uvs,
        colors,
        bone_weights,
        indices,
    })
}

/// `Σ weight * bone_transform` over the vertex's influences; identity for
/// a vertex with none.
#[inline]
fn skinning_matrix(weights: &[VertexWeight], bone_transforms: &[Mat4]) -> Mat4 {
    if weights.is_empty() {
        return Mat4::identity();
    }
    weights.iter().fold(Mat4::zero(), |acc, w| {
        acc + bone_transforms[w.bone] * w.weight
    })
}

/// Skins and shades every vertex, then maps clip space to the viewport.
///
/// x and y go from [-1, 1] to [0, width] x [0, height] (bottom-up); z goes
/// to [near, far] via `z * (far - near) / 2 + (far + near) / 2`. The clip
/// w is kept in the fourth slot.
fn shade_vertices<S: Shader + ?Sized>(
    data: &VertexData<'_>,
    params: &DrawParams,
    shader: &S,
    width: u32,
    height: u32,
) -> Vec<ShadedVertex> {
    let uniforms = &params.uniforms;
    let half_depth = (uniforms.z_far - uniforms.z_near) / 2.0;
    let mid_depth = (uniforms.z_far + uniforms.z_near) / 2.0;

    (0..data.positions.len())
        .map(|i| {
            let weights = data.bone_weights.get(i).map(Vec::as_slice).unwrap_or(&[]);
            let skinning = skinning_matrix(weights, &params.bone_transforms);
            let out = shader.vertex(&VertexInput {
                uniforms,
                skinning,
                position: skinning * data.positions[i].to_position(),
                normal: data.normals.map_or(Vec3::ZERO, |n| n[i]),
            });

            let clip = out.clip_position;
            let ndc = clip.perspective_divide();
            let screen = Vec4::new(
                (ndc.x + 1.0) / 2.0 * width as f32,
                (ndc.y + 1.0) / 2.0 * height as f32,
                ndc.z * half_depth + mid_depth,
                clip.w,
            );
            ShadedVertex {
                screen,
                view_position: out.view_position,
                view_normal: out.view_normal,
            }
        })
        .collect()
}

/// Rasterizes every front-facing triangle. Returns how many were culled.
fn draw_triangles<S: Shader + ?Sized>(
    data: &VertexData<'_>,
    vertices: &[ShadedVertex],
    params: &DrawParams,
    shader: &S,
    textures: &TextureRegistry,
    fb: &mut FrameBuffer<'_>,
) -> usize {
    let (width, height) = (fb.width(), fb.height());
    let mut culled = 0;

    for tri in data.indices {
        let [a, b, c] = tri.map(|i| i as usize);
        let corners = [&vertices[a], &vertices[b], &vertices[c]];

        if is_back_facing(corners.map(|v| v.view_position.xyz())) {
            culled += 1;
            continue;
        }

        let triangle = ScreenTriangle::new(corners.map(|v| v.screen));
        let depths = triangle.depths();
        let w = triangle.clip_w();
        let view_positions = corners.map(|v| v.view_position);
        let normals = corners.map(|v| v.view_normal.try_normalize().unwrap_or(Vec3::ZERO));
        let uvs = data.uvs.map_or([Vec2::ZERO; 3], |uv| [uv[a], uv[b], uv[c]]);
        let colors = data.colors.map_or([WHITE; 3], |col| [col[a], col[b], col[c]]);

        rasterize_triangle(&triangle, width, height, |x, y, bary| {
            let depth = interpolate_linear(depths, bary);
            if !fb.test_and_set_depth(x, y, depth) {
                return;
            }
            let normal = interpolate_perspective(normals, w, bary)
                .try_normalize()
                .unwrap_or(Vec3::ZERO);
            let color = shader.fragment(&FragmentInput {
                uv: interpolate_perspective(uvs, w, bary),
                normal,
                view_position: interpolate_perspective(view_positions, w, bary),
                color: interpolate_perspective(colors, w, bary),
                material: &params.material,
                lights: &params.lights,
                textures,
            });
            fb.set_pixel(x, y, color);
        });
    }
    culled
}

//! Rendering: the draw engine, its shader interface and the pixel targets
//! it writes to.

pub mod framebuffer;
pub mod rasterizer;
pub mod renderer;
pub mod shader;

pub use framebuffer::FrameBuffer;
pub use rasterizer::ScreenTriangle;
pub use renderer::{DrawParams, MeshBuffers, Primitive, Renderer};
pub use shader::{
    FlatShader, FragmentInput, PhongShader, Shader, Uniforms, VertexInput, VertexOutput,
};

//! Linear algebra kernel: vectors, matrices, quaternions and the scalar
//! helpers the rasterizer uses for attribute interpolation.

pub mod interpolate;
pub mod mat3;
pub mod mat4;
pub mod quat;
pub mod vec2;
pub mod vec3;
pub mod vec4;

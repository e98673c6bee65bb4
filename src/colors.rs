//! Colour packing between `Vec4` RGBA and ARGB8888 pixels.
//!
//! Shaders work in floating point RGBA with channels in `[0, 1]`; textures
//! and the render target store packed `0xAARRGGBB` words.

use crate::math::interpolate::clamp;
use crate::math::vec4::Vec4;

pub const BLACK: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);
pub const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
pub const TRANSPARENT: Vec4 = Vec4::new(0.0, 0.0, 0.0, 0.0);

/// Colour of every vertex plotted in point-primitive mode.
pub const POINT_DEBUG: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

#[inline]
fn channel_to_byte(value: f32) -> u32 {
    (clamp(value, 0.0, 1.0) * 255.0).round() as u32
}

/// Packs an RGBA colour into ARGB8888, clamping each channel to `[0, 1]`.
#[inline]
pub fn pack_color(color: Vec4) -> u32 {
    (channel_to_byte(color.w) << 24)
        | (channel_to_byte(color.x) << 16)
        | (channel_to_byte(color.y) << 8)
        | channel_to_byte(color.z)
}

#[inline]
pub fn unpack_color(color: u32) -> Vec4 {
    let a = ((color >> 24) & 0xFF) as f32 / 255.0;
    let r = ((color >> 16) & 0xFF) as f32 / 255.0;
    let g = ((color >> 8) & 0xFF) as f32 / 255.0;
    let b = (color & 0xFF) as f32 / 255.0;
    Vec4::new(r, g, b, a)
}

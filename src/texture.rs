//! 2D pixel stores: textures sampled by shaders and the render target.
//!
//! A [`Texture`] keeps packed ARGB pixels with a top-left origin. Textures
//! used by meshes live in a [`TextureRegistry`] and are referenced by
//! [`TextureId`] so several meshes can share one image.

use std::collections::HashMap;
use std::path::Path;

use crate::colors::{pack_color, unpack_color};
use crate::error::LoadError;
use crate::math::vec4::Vec4;

/// Represents a 2D texture or colour buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    data: Vec<u32>, // ARGB8888, row-major, row 0 at the top
    width: u32,
    height: u32,
}

impl Texture {
    /// A texture of the given size filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; (width * height) as usize],
            width,
            height,
        }
    }

    /// Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(width, height, img.as_raw()))
    }

    /// Decode an encoded image held in memory, e.g. a texture embedded in a
    /// model file.
    pub fn from_memory(bytes: &[u8]) -> Result<Self, LoadError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(width, height, img.as_raw()))
    }

    /// Build a texture from tightly packed RGBA8 bytes, top row first.
    ///
    /// Missing trailing pixels are left transparent; extra bytes are ignored.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        let mut texture = Self::new(width, height);
        for (dst, p) in texture.data.iter_mut().zip(rgba.chunks_exact(4)) {
            let [r, g, b, a] = [p[0], p[1], p[2], p[3]];
            *dst = ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32);
        }
        texture
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, i: i32, j: i32) -> Option<usize> {
        if i >= 0 && i < self.width as i32 && j >= 0 && j < self.height as i32 {
            Some((j as u32 * self.width + i as u32) as usize)
        } else {
            None
        }
    }

    /// Colour at column `i`, row `j` (row 0 at the top).
    ///
    /// Out-of-range coordinates read as transparent black.
    #[inline]
    pub fn get_color(&self, i: i32, j: i32) -> Vec4 {
        self.index(i, j)
            .map(|idx| unpack_color(self.data[idx]))
            .unwrap_or(Vec4::ZERO)
    }

    /// Writes a colour at column `i`, row `j`. Out-of-range writes are ignored.
    #[inline]
    pub fn set_color(&mut self, i: i32, j: i32, color: Vec4) {
        if let Some(idx) = self.index(i, j) {
            self.data[idx] = pack_color(color);
        }
    }

    /// Sample the texture at UV coordinates using nearest-neighbor filtering.
    ///
    /// # UV Coordinate Convention
    /// - (0,0) = bottom-left in model UVs, but pixels are stored top-left origin
    /// - V is flipped to correct for this: v_corrected = 1.0 - v
    ///
    /// # Wrapping
    /// Both axes repeat via rem_euclid, so any finite UV lands in `[0, 1)`.
    #[inline]
    pub fn get_color_uv(&self, u: f32, v: f32) -> Vec4 {
        if self.width == 0 || self.height == 0 {
            return Vec4::ZERO;
        }
        let u = u.rem_euclid(1.0);
        let v = (1.0 - v).rem_euclid(1.0);

        let i = ((u * self.width as f32) as u32).min(self.width - 1);
        let j = ((v * self.height as f32) as u32).min(self.height - 1);

        unpack_color(self.data[(j * self.width + i) as usize])
    }

    /// Fills every pixel with `color`.
    pub fn clear(&mut self, color: Vec4) {
        self.data.fill(pack_color(color));
    }

    /// Packed ARGB pixels, row-major from the top.
    pub fn pixels(&self) -> &[u32] {
        &self.data
    }

    /// Raw pixel memory for handing to a presentation surface.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding and u8 has alignment 1, so the pixel
        // storage is valid to view as 4 * len bytes for the borrow's lifetime.
        unsafe { std::slice::from_raw_parts(self.data.as_ptr() as *const u8, self.data.len() * 4) }
    }

    /// Converts to an `image` buffer for encoding to PNG and friends.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for &argb in &self.data {
            bytes.extend_from_slice(&[
                (argb >> 16) as u8,
                (argb >> 8) as u8,
                argb as u8,
                (argb >> 24) as u8,
            ]);
        }
        image::RgbaImage::from_raw(self.width, self.height, bytes)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }
}

/// Stable index of a texture inside a [`TextureRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(usize);

impl TextureId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena of textures shared between meshes.
///
/// Textures are never removed, so a [`TextureId`] stays valid for the life
/// of the registry. Textures registered under a key (usually the file path)
/// are loaded once and handed out again on later requests.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    textures: Vec<Texture>,
    by_key: HashMap<String, TextureId>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an anonymous texture.
    pub fn add(&mut self, texture: Texture) -> TextureId {
        let id = TextureId(self.textures.len());
        self.textures.push(texture);
        id
    }

    /// Adds a texture under `key`, or returns the existing id for that key.
    pub fn add_keyed(&mut self, key: impl Into<String>, texture: Texture) -> TextureId {
        let key = key.into();
        if let Some(&id) = self.by_key.get(&key) {
            log::debug!("texture {key:?} already registered as {}", id.0);
            return id;
        }
        let id = self.add(texture);
        self.by_key.insert(key, id);
        id
    }

    /// Loads an image file once and returns its id on every later call.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<TextureId, LoadError> {
        let key = path.as_ref().to_string_lossy().into_owned();
        if let Some(&id) = self.by_key.get(&key) {
            return Ok(id);
        }
        let texture = Texture::from_file(&path)?;
        log::info!(
            "loaded texture {key} ({}x{})",
            texture.width(),
            texture.height()
        );
        Ok(self.add_keyed(key, texture))
    }

    pub fn id_for(&self, key: &str) -> Option<TextureId> {
        self.by_key.get(key).copied()
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

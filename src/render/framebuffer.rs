//! Frame buffer abstraction for 2D pixel access during a draw call.
//!
//! Pairs the colour target with the depth buffer behind one bounds-checked
//! view. Rasterization works with a **bottom-left** origin (row 0 is the
//! bottom of the image); this view is the one place where rows are flipped
//! into the top-left origin of [`Texture`].

use crate::math::vec4::Vec4;
use crate::texture::Texture;

/// A view into the colour target and depth buffer.
///
/// This is a borrowed view, not an owning type - it's created for the
/// duration of one draw call.
///
/// # Depth Buffer
///
/// Depth is the viewport-remapped z, where a **larger value is closer** to
/// the camera. The buffer is cleared to 0.0, so any fragment in front of
/// the far plane wins an empty pixel.
pub struct FrameBuffer<'a> {
    color: &'a mut Texture,
    depth: &'a mut [f32],
    width: u32,
    height: u32,
}

impl<'a> FrameBuffer<'a> {
    /// Create a view over a colour target and its depth buffer.
    ///
    /// The depth buffer must hold `width * height` entries.
    pub fn new(color: &'a mut Texture, depth: &'a mut [f32]) -> Self {
        let (width, height) = (color.width(), color.height());
        debug_assert_eq!(
            depth.len(),
            (width * height) as usize,
            "Depth buffer size doesn't match dimensions"
        );
        Self {
            color,
            depth,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn depth_index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some((y as u32 * self.width + x as u32) as usize)
        } else {
            None
        }
    }

    /// Stored depth at bottom-up pixel (x, y), or None if out of bounds.
    #[inline]
    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        self.depth_index(x, y).map(|idx| self.depth[idx])
    }

    /// Depth test at bottom-up pixel (x, y).
    ///
    /// Passes only if `depth` is strictly greater than the stored value, in
    /// which case the stored value is replaced. Equal depth does not pass.
    /// Out-of-bounds pixels never pass.
    #[inline]
    pub fn test_and_set_depth(&mut self, x: i32, y: i32, depth: f32) -> bool {
        match self.depth_index(x, y) {
            Some(idx) if depth > self.depth[idx] => {
                self.depth[idx] = depth;
                true
            }
            _ => false,
        }
    }

    /// Writes a colour at bottom-up pixel (x, y) without depth testing.
    ///
    /// Row `y` lands on texture row `height - 1 - y`. Out-of-bounds writes
    /// are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Vec4) {
        if self.depth_index(x, y).is_some() {
            self.color.set_color(x, self.height as i32 - 1 - y, color);
        }
    }

    /// Colour at bottom-up pixel (x, y).
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Vec4> {
        self.depth_index(x, y)
            .map(|_| self.color.get_color(x, self.height as i32 - 1 - y))
    }
}

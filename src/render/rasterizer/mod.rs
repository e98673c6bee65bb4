//! Triangle setup and coverage.
//!
//! Coverage uses the edge function algorithm in [`edgefunction`]; the draw
//! engine supplies screen-space triangles and receives the covered pixels
//! with their barycentric weights.

mod edgefunction;

pub use edgefunction::{
    barycentric, edge_function, is_back_facing, is_inside, rasterize_triangle, BoundingBox,
    BACK_FACE_TOLERANCE,
};

use crate::math::vec2::Vec2;
use crate::math::vec4::Vec4;

/// A triangle ready for rasterization in screen space.
///
/// Each point is `(x, y, depth, clip_w)`: pixel coordinates with a
/// bottom-left origin, the viewport-remapped depth (larger is closer) and
/// the clip-space w kept for perspective-correct interpolation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTriangle {
    pub points: [Vec4; 3],
}

impl ScreenTriangle {
    pub fn new(points: [Vec4; 3]) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points_2d(&self) -> [Vec2; 3] {
        self.points.map(|p| Vec2::new(p.x, p.y))
    }

    #[inline]
    pub fn depths(&self) -> [f32; 3] {
        self.points.map(|p| p.z)
    }

    #[inline]
    pub fn clip_w(&self) -> [f32; 3] {
        self.points.map(|p| p.w)
    }
}

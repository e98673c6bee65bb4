//! Edge function-based triangle coverage.
//!
//! Triangles arrive in screen space with a **bottom-left** origin. Every
//! integer pixel whose centre `(x + 0.5, y + 0.5)` lies in the clamped
//! bounding box is tested against the three directed edges a→b, b→c, c→a.
//!
//! # Edge Function
//!
//! For an edge from A to B and a point P:
//!
//! ```text
//! E(P) = edge.x * to_p.y - to_p.x * edge.y     edge = B - A, to_p = P - A
//! ```
//!
//! This is the 2D cross product (B - A) × (P - A):
//! - Positive value: P is to the left of edge AB
//! - Negative value: P is to the right of edge AB
//! - Zero: P is exactly on the edge
//!
//! A pixel is inside when all three values fall in the same sign class
//! (negative, zero or positive). Either winding is accepted.
//!
//! # Barycentric Coordinates
//!
//! Each weight is the ratio of two edge cross products sharing an edge, e.g.
//!
//! ```text
//! α = (bp × bc) / (-ab × bc)
//! ```
//!
//! which is the sub-triangle area opposite a vertex over the full area.

use super::ScreenTriangle;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// Slack on the back-face test absorbing float error at grazing angles.
pub const BACK_FACE_TOLERANCE: f32 = 0.01;

/// Triangles with less doubled area than this cover no pixel centres.
const DEGENERATE_AREA: f32 = 1e-8;

#[inline]
fn sign_class(value: f32) -> i8 {
    if value < 0.0 {
        -1
    } else if value == 0.0 {
        0
    } else {
        1
    }
}

/// Computes the edge function value for point P relative to edge (A -> B).
#[inline]
pub fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).cross(p - a)
}

/// Inside test by matching sign classes of the three edge functions.
#[inline]
pub fn is_inside(triangle: &ScreenTriangle, p: Vec2) -> bool {
    let [a, b, c] = triangle.points_2d();
    let e_ab = sign_class(edge_function(a, b, p));
    let e_bc = sign_class(edge_function(b, c, p));
    let e_ca = sign_class(edge_function(c, a, p));
    e_ab == e_bc && e_bc == e_ca
}

/// Barycentric weights `[α, β, γ]` of `p`.
///
/// Returns `None` for a degenerate (zero-area) triangle.
#[inline]
pub fn barycentric(triangle: &ScreenTriangle, p: Vec2) -> Option<[f32; 3]> {
    let [a, b, c] = triangle.points_2d();
    let (ab, bc, ca) = (b - a, c - b, a - c);
    let (ap, bp, cp) = (p - a, p - b, p - c);

    // All three denominators are the doubled signed area.
    let area = (-ab).cross(bc);
    if area.abs() < DEGENERATE_AREA {
        return None;
    }

    Some([
        bp.cross(bc) / area,
        cp.cross(ca) / (-bc).cross(ca),
        ap.cross(ab) / (-ca).cross(ab),
    ])
}

/// View-space back-face test.
///
/// With `e1 = v1 - v0` and `e2 = v2 - v1`, the triangle faces away from a
/// camera looking down -Z when `(e1 × e2).z < -BACK_FACE_TOLERANCE`.
#[inline]
pub fn is_back_facing(view: [Vec3; 3]) -> bool {
    let e1 = view[1] - view[0];
    let e2 = view[2] - view[1];
    e1.cross(e2).dot(Vec3::BACK) < -BACK_FACE_TOLERANCE
}

/// Inclusive pixel range covered by a triangle, clamped to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Returns `None` when the triangle lies entirely off-target.
    pub fn clamped(triangle: &ScreenTriangle, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let [a, b, c] = triangle.points_2d();
        let min_x = a.x.min(b.x).min(c.x).max(0.0);
        let max_x = a.x.max(b.x).max(c.x).min((width - 1) as f32);
        let min_y = a.y.min(b.y).min(c.y).max(0.0);
        let max_y = a.y.max(b.y).max(c.y).min((height - 1) as f32);

        if !(min_x <= max_x && min_y <= max_y) {
            return None;
        }
        Some(Self {
            min_x: min_x.floor() as i32,
            max_x: max_x.floor() as i32,
            min_y: min_y.floor() as i32,
            max_y: max_y.floor() as i32,
        })
    }
}

/// Calls `visit(x, y, weights)` for every covered pixel.
///
/// Coordinates are bottom-up. Degenerate triangles cover nothing.
pub fn rasterize_triangle<F>(triangle: &ScreenTriangle, width: u32, height: u32, mut visit: F)
where
    F: FnMut(i32, i32, [f32; 3]),
{
    let Some(bounds) = BoundingBox::clamped(triangle, width, height) else {
        return;
    };

    for y in bounds.min_y..=bounds.max_y {
        for x in bounds.min_x..=bounds.max_x {
            // Sample at pixel center
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if !is_inside(triangle, p) {
                continue;
            }
            if let Some(weights) = barycentric(triangle, p) {
                visit(x, y, weights);
            }
        }
    }
}

//! 4D vector for homogeneous coordinates.
//!
//! There is no `From<Vec3>` conversion: promoting a [`Vec3`]
//! goes through [`Vec3::to_position`] (w = 1) or [`Vec3::to_direction`]
//! (w = 0) so the choice of w is visible at the call site.

use std::ops::{Add, Div, Mul, Neg, Sub};

use super::vec3::Vec3;

/// Below this magnitude w is treated as zero and the vector as a direction.
pub const W_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Drops w without dividing. Use for directions and for values that are
    /// known to already have w = 1.
    pub const fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Divides every component by w, leaving the vector untouched when
    /// |w| < [`W_EPSILON`].
    pub fn perspective_divide(self) -> Self {
        if self.w.abs() < W_EPSILON {
            return self;
        }
        Self::new(self.x / self.w, self.y / self.w, self.z / self.w, 1.0)
    }

    /// Demotes a homogeneous position to 3D by dividing by w.
    pub fn to_vec3_perspective(self) -> Vec3 {
        self.perspective_divide().xyz()
    }

    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn scale(&self, scalar: f32) -> Self {
        Self::new(
            self.x * scalar,
            self.y * scalar,
            self.z * scalar,
            self.w * scalar,
        )
    }

    /// Linearly interpolate between two vectors.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
            self.w + (other.w - self.w) * t,
        )
    }
}

impl Add<Vec4> for Vec4 {
    type Output = Vec4;

    fn add(self, rhs: Vec4) -> Self::Output {
        Self::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl Sub<Vec4> for Vec4 {
    type Output = Vec4;

    fn sub(self, rhs: Vec4) -> Self::Output {
        Self::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.w - rhs.w,
        )
    }
}

impl Mul<f32> for Vec4 {
    type Output = Vec4;

    fn mul(self, rhs: f32) -> Self::Output {
        self.scale(rhs)
    }
}

impl Div<f32> for Vec4 {
    type Output = Vec4;

    fn div(self, rhs: f32) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs, self.w / rhs)
    }
}

impl Neg for Vec4 {
    type Output = Vec4;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perspective_divide_normalizes_w() {
        let v = Vec4::new(2.0, 4.0, 6.0, 2.0).perspective_divide();
        assert_eq!(v, Vec4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn tiny_w_is_left_alone() {
        let v = Vec4::new(2.0, 4.0, 6.0, 1e-8);
        assert_eq!(v.perspective_divide(), v);
        assert_eq!(Vec4::new(1.0, 2.0, 3.0, 0.0).to_vec3_perspective(), Vec3::new(1.0, 2.0, 3.0));
    }
}

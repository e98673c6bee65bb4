//! Unit quaternions for keyframed bone rotations.

use std::ops::{Add, Mul, Neg};

use super::mat4::Mat4;
use super::vec3::Vec3;

/// Below this distance from 1.0, `cos(angle)` is close enough to treat the
/// two rotations as identical and fall back to linear blending.
const SLERP_LINEAR_THRESHOLD: f32 = 1e-4;

/// Rotation quaternion `w + xi + yj + zk`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `degrees` around `axis`. The axis must be non-zero.
    pub fn from_axis_angle(axis: Vec3, degrees: f32) -> Self {
        let axis = axis.normalize();
        let (s, c) = (degrees.to_radians() / 2.0).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn length(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let length = self.length();
        debug_assert!(length > 0.0, "normalize called on a zero quaternion");
        Self::new(
            self.x / length,
            self.y / length,
            self.z / length,
            self.w / length,
        )
    }

    /// Spherical linear interpolation along the shorter arc.
    ///
    /// The result is not renormalized; keyframe sampling does that once
    /// after blending.
    pub fn slerp(self, end: Self, t: f32) -> Self {
        let mut cos_omega = self.dot(end);
        let mut end = end;
        if cos_omega < 0.0 {
            cos_omega = -cos_omega;
            end = -end;
        }

        let (scale_start, scale_end) = if 1.0 - cos_omega > SLERP_LINEAR_THRESHOLD {
            let omega = cos_omega.acos();
            let sin_omega = omega.sin();
            (
                ((1.0 - t) * omega).sin() / sin_omega,
                (t * omega).sin() / sin_omega,
            )
        } else {
            (1.0 - t, t)
        };

        self * scale_start + end * scale_end
    }

    /// Homogeneous rotation matrix for this (unit) quaternion.
    pub fn to_mat4(&self) -> Mat4 {
        let Quat { x, y, z, w } = *self;
        Mat4::new([
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - z * w),
                2.0 * (x * z + y * w),
                0.0,
            ],
            [
                2.0 * (x * y + z * w),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - x * w),
                0.0,
            ],
            [
                2.0 * (x * z - y * w),
                2.0 * (y * z + x * w),
                1.0 - 2.0 * (x * x + y * y),
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

impl Add<Quat> for Quat {
    type Output = Quat;

    fn add(self, rhs: Quat) -> Self::Output {
        Self::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl Mul<f32> for Quat {
    type Output = Quat;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl Neg for Quat {
    type Output = Quat;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

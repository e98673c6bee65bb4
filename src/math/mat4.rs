//! 4x4 transformation matrix for homogeneous coordinates.
//!
//! # Convention
//! - Storage is row-major: `data[row][col]`
//! - Vectors are **column vectors** on the right: `Mat4 * Vec4`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! # Example
//! ```ignore
//! let model = translation * rotation * scale; // scale applied first
//! let clip = projection * view * model * position;
//! ```

use std::ops::{Add, Mul};

use super::mat3::{Mat3, SINGULAR_EPSILON};
use super::vec3::Vec3;
use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    /// Builds a matrix from 16 values listed row by row.
    pub fn from_row_major(values: [f32; 16]) -> Self {
        let mut data = [[0.0f32; 4]; 4];
        for (i, value) in values.into_iter().enumerate() {
            data[i / 4][i % 4] = value;
        }
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn zero() -> Self {
        Mat4::new([[0.0; 4]; 4])
    }

    /// Creates a translation matrix.
    ///
    /// Translation is stored in the last column.
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the X axis. The angle is in degrees.
    pub fn rotation_x(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Y axis. The angle is in degrees.
    pub fn rotation_y(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Mat4::new([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Z axis. The angle is in degrees.
    pub fn rotation_z(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Mat4::new([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a symmetric perspective matrix for a camera looking down -Z.
    ///
    /// The near plane maps to NDC z = +1 and the far plane to z = -1, and
    /// clip-space w carries the (negative) view-space depth.
    ///
    /// # Arguments
    ///
    /// * `fov_y_degrees` - Vertical field of view in degrees.
    /// * `aspect_ratio` - Width divided by height.
    /// * `z_near`, `z_far` - Positive distances to the near and far planes.
    pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        let n = -z_near;
        let f = -z_far;
        let t = n.abs() * (fov_y_degrees.to_radians() / 2.0).tan();
        let r = t * aspect_ratio;
        Mat4::new([
            [n / r, 0.0, 0.0, 0.0],
            [0.0, n / t, 0.0, 0.0],
            [0.0, 0.0, (n + f) / (n - f), 2.0 * n * f / (f - n)],
            [0.0, 0.0, 1.0, 0.0],
        ])
    }

    pub fn transpose(&self) -> Self {
        let m = &self.data;
        Mat4::new([
            [m[0][0], m[1][0], m[2][0], m[3][0]],
            [m[0][1], m[1][1], m[2][1], m[3][1]],
            [m[0][2], m[1][2], m[2][2], m[3][2]],
            [m[0][3], m[1][3], m[2][3], m[3][3]],
        ])
    }

    /// The 3x3 matrix left after deleting `row` and `col`.
    pub fn minor(&self, row: usize, col: usize) -> Mat3 {
        let mut data = [[0.0f32; 3]; 3];
        let rows = (0..4).filter(|&r| r != row);
        for (out_row, r) in rows.enumerate() {
            let cols = (0..4).filter(|&c| c != col);
            for (out_col, c) in cols.enumerate() {
                data[out_row][out_col] = self.data[r][c];
            }
        }
        Mat3::new(data)
    }

    #[inline]
    fn cofactor(&self, row: usize, col: usize) -> f32 {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.minor(row, col).determinant()
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> f32 {
        (0..4).map(|col| self.data[0][col] * self.cofactor(0, col)).sum()
    }

    /// Transpose of the cofactor matrix.
    pub fn adjugate(&self) -> Self {
        let mut data = [[0.0f32; 4]; 4];
        for (row, out) in data.iter_mut().enumerate() {
            for (col, value) in out.iter_mut().enumerate() {
                // Transposed on write: adj[row][col] = C[col][row].
                *value = self.cofactor(col, row);
            }
        }
        Mat4::new(data)
    }

    /// Computes `adjugate / determinant`.
    ///
    /// Returns `None` if |determinant| < 1e-6. Callers treat that as a
    /// rejected operation (for a frame, skip it) rather than substituting a
    /// default matrix.
    pub fn inverse(&self) -> Option<Mat4> {
        let det = self.determinant();
        if det.abs() < SINGULAR_EPSILON {
            return None;
        }
        Some(self.adjugate() * (1.0 / det))
    }

    /// Upper-left 3x3 block (rotation and scale, no translation).
    pub fn linear(&self) -> Mat3 {
        self.minor(3, 3)
    }

    /// Transforms a position (w = 1) and divides by the resulting w.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * p.to_position()).to_vec3_perspective()
    }

    /// Transforms a direction (w = 0); translation is ignored.
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        (*self * d.to_direction()).xyz()
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, out) in result.iter_mut().enumerate() {
            for (col, value) in out.iter_mut().enumerate() {
                *value = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let m = &self.data;
        Vec4::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3] * v.w,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3] * v.w,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3] * v.w,
            m[3][0] * v.x + m[3][1] * v.y + m[3][2] * v.z + m[3][3] * v.w,
        )
    }
}

/// Scalar multiplication, used to weight bone transforms during skinning.
impl Mul<f32> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: f32) -> Self::Output {
        let mut data = self.data;
        data.iter_mut().flatten().for_each(|v| *v *= rhs);
        Mat4::new(data)
    }
}

impl Add<Mat4> for Mat4 {
    type Output = Mat4;

    fn add(self, rhs: Mat4) -> Self::Output {
        let mut data = self.data;
        for (row, rhs_row) in data.iter_mut().zip(rhs.data.iter()) {
            for (v, r) in row.iter_mut().zip(rhs_row.iter()) {
                *v += r;
            }
        }
        Mat4::new(data)
    }
}

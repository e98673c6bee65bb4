//! First-person camera producing the view matrix.
//!
//! # Coordinate System
//!
//! - X: positive right
//! - Y: positive up
//! - The camera looks down **-Z** with +Y up before any rotation
//!
//! # Orientation
//!
//! Orientation is stored as yaw/pitch/roll angles **in degrees** and turned
//! into a rotation matrix when needed:
//!
//! - **Yaw**: Rotation around Y-axis
//! - **Pitch**: Rotation around X-axis, clamped to ±89.9°
//! - **Roll**: Rotation around Z-axis

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

/// Pitch never reaches ±90°, where forward and up would become parallel.
pub const PITCH_LIMIT_DEGREES: f32 = 89.9;

/// Moves shorter than this are ignored.
const MIN_MOVE: f32 = 1e-6;

/// First-person camera with position and yaw/pitch/roll orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    roll: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 10.0))
    }
}

impl Camera {
    /// Creates a camera at `position` looking along -Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
        }
    }

    // =========================================================================
    // Core: Rotation Matrix
    // =========================================================================

    /// Order: Yaw (Y) * Pitch (X) * Roll (Z), so roll is applied first.
    fn rotation_matrix(&self) -> Mat4 {
        Mat4::rotation_y(self.yaw) * Mat4::rotation_x(self.pitch) * Mat4::rotation_z(self.roll)
    }

    // =========================================================================
    // Orientation
    // =========================================================================

    pub fn add_yaw(&mut self, degrees: f32) {
        self.yaw += degrees;
    }

    /// Clamped to [`PITCH_LIMIT_DEGREES`] either way.
    pub fn add_pitch(&mut self, degrees: f32) {
        self.pitch = (self.pitch + degrees).clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
    }

    pub fn add_roll(&mut self, degrees: f32) {
        self.roll += degrees;
    }

    // =========================================================================
    // Movement
    // =========================================================================

    /// Moves the camera along its forward direction.
    pub fn move_forward(&mut self, distance: f32) {
        if distance.abs() < MIN_MOVE {
            return;
        }
        self.position = self.position + self.forward() * distance;
    }

    /// Moves the camera along its right direction.
    pub fn move_right(&mut self, distance: f32) {
        if distance.abs() < MIN_MOVE {
            return;
        }
        self.position = self.position + self.right() * distance;
    }

    /// Moves the camera along world +Y, whatever its orientation.
    pub fn move_up(&mut self, distance: f32) {
        if distance.abs() < MIN_MOVE {
            return;
        }
        self.position = self.position + Vec3::UP * distance;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation_matrix().transform_direction(Vec3::FORWARD)
    }

    pub fn up(&self) -> Vec3 {
        self.rotation_matrix().transform_direction(Vec3::UP)
    }

    /// `forward × up`.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up())
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    // =========================================================================
    // View Matrix
    // =========================================================================

    /// World-to-view transform: move the eye to the origin, then rotate the
    /// basis so right, up and back land on +X, +Y and +Z.
    ///
    /// ```text
    /// | right.x    right.y    right.z    0 |
    /// | up.x       up.y       up.z       0 |  *  translation(-position)
    /// | -fwd.x     -fwd.y     -fwd.z     0 |
    /// | 0          0          0          1 |
    /// ```
    pub fn view_matrix(&self) -> Mat4 {
        let forward = self.forward();
        let up = self.up();
        let right = forward.cross(up);
        let rotation = Mat4::new([
            [right.x, right.y, right.z, 0.0],
            [up.x, up.y, up.z, 0.0],
            [-forward.x, -forward.y, -forward.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let p = self.position;
        rotation * Mat4::translation(-p.x, -p.y, -p.z)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn camera_starts_looking_down_negative_z() {
        let camera = Camera::default();
        assert_vec_eq(camera.position(), Vec3::new(0.0, 0.0, 10.0));
        assert_vec_eq(camera.forward(), Vec3::FORWARD);
        assert_vec_eq(camera.right(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn view_matrix_puts_eye_at_origin() {
        let camera = Camera::default();
        let view = camera.view_matrix();
        assert_vec_eq(view.transform_point(camera.position()), Vec3::ZERO);
        // the world origin is 10 units in front of the camera
        assert_vec_eq(view.transform_point(Vec3::ZERO), Vec3::new(0.0, 0.0, -10.0));
    }

    #[test]
    fn yaw_rotates_horizontally() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.add_yaw(90.0);
        assert_vec_eq(camera.forward(), Vec3::new(-1.0, 0.0, 0.0));
        let p = camera.view_matrix().transform_point(Vec3::new(-3.0, 0.0, 0.0));
        assert_vec_eq(p, Vec3::new(0.0, 0.0, -3.0));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.add_pitch(120.0);
        assert_relative_eq!(camera.pitch(), PITCH_LIMIT_DEGREES);
        camera.add_pitch(-500.0);
        assert_relative_eq!(camera.pitch(), -PITCH_LIMIT_DEGREES);
    }

    #[test]
    fn movement_follows_orientation() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.move_forward(2.0);
        assert_vec_eq(camera.position(), Vec3::new(0.0, 0.0, -2.0));
        camera.move_right(1.0);
        assert_vec_eq(camera.position(), Vec3::new(1.0, 0.0, -2.0));

        camera.add_pitch(45.0);
        camera.move_up(3.0);
        assert_vec_eq(camera.position(), Vec3::new(1.0, 3.0, -2.0));
    }

    #[test]
    fn tiny_moves_are_ignored() {
        let mut camera = Camera::default();
        camera.move_forward(1e-8);
        camera.move_right(-1e-7);
        camera.move_up(5e-7);
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 10.0));
    }
}

//! Scalar clamping and barycentric attribute interpolation.

use std::ops::{Add, Mul};

use super::vec4::W_EPSILON;

/// Clamps `value` into `[min, max]`.
///
/// Unlike [`f32::clamp`] this never panics when `min > max`; `min` wins.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Screen-space barycentric blend `Σ λᵢ·vᵢ`.
///
/// Correct for quantities that are already linear in screen space, such as
/// post-divide depth.
#[inline]
pub fn interpolate_linear<T>(values: [T; 3], bary: [f32; 3]) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    values[0] * bary[0] + values[1] * bary[1] + values[2] * bary[2]
}

/// Perspective-correct barycentric blend.
///
/// Each vertex contribution is divided by that vertex's clip-space `w` before
/// summing, and the sum is renormalized by `Σ λᵢ/wᵢ`:
///
/// ```text
/// v = (λ₀v₀/w₀ + λ₁v₁/w₁ + λ₂v₂/w₂) / (λ₀/w₀ + λ₁/w₁ + λ₂/w₂)
/// ```
///
/// Screen-space weights come from positions after the perspective divide and
/// do not interpolate view-space attributes linearly; this undoes that.
///
/// If any |w| is below [`W_EPSILON`] the vertex was never divided, and the
/// plain screen-space blend is returned instead.
#[inline]
pub fn interpolate_perspective<T>(values: [T; 3], w: [f32; 3], bary: [f32; 3]) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    if w.iter().any(|w| w.abs() < W_EPSILON) {
        return interpolate_linear(values, bary);
    }
    let weights = [bary[0] / w[0], bary[1] / w[1], bary[2] / w[2]];
    let norm = weights[0] + weights[1] + weights[2];
    interpolate_linear(values, weights) * (1.0 / norm)
}

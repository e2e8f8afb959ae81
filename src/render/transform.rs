//! Coordinate transformation and blending helpers.

use std::f32::consts::PI;

/// Rotate a point around the origin.
///
/// With y pointing down (canvas space) a positive angle turns clockwise
/// on screen.
///
/// # Parameters
/// - `x`, `y`: Point coordinates
/// - `angle`: Rotation angle in radians
#[inline]
fn rotate(x: f32, y: f32, angle: f32) -> (f32, f32) {
    let cos_a = angle.cos();
    let sin_a = angle.sin();
    (x * cos_a - y * sin_a, x * sin_a + y * cos_a)
}

/// Rotate a point around the origin (angle in degrees).
#[inline]
pub fn rotate_deg(x: f32, y: f32, angle_deg: f32) -> (f32, f32) {
    rotate(x, y, angle_deg * PI / 180.0)
}

/// Rotate a point around `(cx, cy)` (angle in degrees).
#[inline]
pub fn rotate_about_deg(x: f32, y: f32, cx: f32, cy: f32, angle_deg: f32) -> (f32, f32) {
    let (rx, ry) = rotate_deg(x - cx, y - cy, angle_deg);
    (rx + cx, ry + cy)
}

/// Linear interpolation between two values.
///
/// Returns `a` when `t=0`, `b` when `t=1`, and linear blend in between.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Source-over blend of one 8-bit channel at coverage `alpha`.
#[inline]
pub fn blend_channel(dst: u8, src: u8, alpha: f32) -> u8 {
    lerp(dst as f32, src as f32, alpha.clamp(0.0, 1.0))
        .round()
        .clamp(0.0, 255.0) as u8
}

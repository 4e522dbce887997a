// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The vector type, plus the two fixed-axis rotations
//! the renderer uses to turn the world around the camera.
//!
//! Rotations treat the vector as a row vector multiplied by the
//! rotation matrix (`v · M`), which is a rotation by the negated
//! angle in the usual column-vector convention.  Everything
//! downstream (light placement, the fractal frame) is tuned to this.

/// A point or direction in 3-space.
pub use glam::DVec3 as Vec3;

/// Scale a vector to unit length.  A zero-length vector has no
/// direction, so it comes back unchanged rather than as NaN.
pub fn normalize(v: Vec3) -> Vec3 {
    let norm = v.length();
    if norm == 0.0 {
        v
    } else {
        v / norm
    }
}

/// Rotate about the x-axis (the camera's pitch).
pub fn rotate_vertical(v: Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x, v.y * c + v.z * s, -v.y * s + v.z * c)
}

/// Rotate about the y-axis (the camera's yaw).
pub fn rotate_horizontal(v: Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x * c - v.z * s, v.y, v.x * s + v.z * c)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The mandelbulb distance estimator.
//!
//! Like the Mandelbrot set, the mandelbulb is defined by iterating a
//! point under a power map until it either escapes a bailout radius or
//! runs out of iterations.  In three dimensions the "power" is taken
//! in spherical coordinates: raise the radius to the power and
//! multiply both angles by it.  Tracking the running derivative `dr`
//! alongside gives a conservative bound on the distance from the
//! starting point to the surface, `0.5 * ln(r) * r / dr`, which is
//! what the sphere tracer steps by.

use crate::vector::Vec3;

/// How many times the power map is applied.  Shading and hit
/// thresholds are tuned to this, so it is not a setting.
pub const ITERATIONS: usize = 10;

/// Radius beyond which an orbit is considered escaped.
pub const BAILOUT: f64 = 2.0;

/// Estimate the distance from `pos` to the mandelbulb of the given
/// power.  Negative or zero values mean the point is inside.
pub fn estimate_distance(pos: Vec3, power: f64) -> f64 {
    let mut z = pos;
    let mut dr = 1.0;
    let mut r = 0.0;
    for _ in 0..ITERATIONS {
        r = z.length();
        if r > BAILOUT {
            break;
        }
        // At the origin the polar angle is undefined; any value works
        // because the radius term zeroes the update.
        let theta = if r > 0.0 { (z.z / r).acos() } else { 0.0 };
        let phi = z.y.atan2(z.x);
        dr = power * r.powf(power - 1.0) * dr + 1.0;

        let zr = r.powf(power);
        let (sin_theta, cos_theta) = (theta * power).sin_cos();
        let (sin_phi, cos_phi) = (phi * power).sin_cos();
        z = pos + Vec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta) * zr;
    }
    if r == 0.0 {
        return 0.0;
    }
    0.5 * r.ln() * r / dr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_stays_bounded() {
        let d = estimate_distance(Vec3::ZERO, 8.0);
        assert!(d.is_finite());
        assert!(d <= 0.0);
    }

    #[test]
    fn far_point_is_positive_and_of_the_right_order() {
        let pos = Vec3::new(10.0, 10.0, 10.0);
        let d = estimate_distance(pos, 8.0);
        assert!(d > 0.0);
        // Escapes on the first iteration: 0.5 * ln(r) * r with dr == 1.
        let r = pos.length();
        assert!((d - 0.5 * r.ln() * r).abs() < 1e-12);
        assert!(d > 0.5 * r && d < 2.0 * r);
    }

    #[test]
    fn interior_point_is_not_positive() {
        assert!(estimate_distance(Vec3::new(0.0, 0.0, 0.3), 8.0) <= 0.0);
    }

    #[test]
    fn distance_shrinks_toward_the_bulb() {
        let far = estimate_distance(Vec3::new(0.0, 0.0, 3.0), 8.0);
        let near = estimate_distance(Vec3::new(0.0, 0.0, 1.5), 8.0);
        assert!(far > near);
        assert!(near > 0.0);
    }

    #[test]
    fn power_is_a_free_parameter() {
        let pos = Vec3::new(0.4, 0.6, 0.5);
        assert_ne!(estimate_distance(pos, 8.0), estimate_distance(pos, 3.0));
    }
}

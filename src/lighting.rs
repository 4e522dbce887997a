// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Local illumination at a surface hit.  Lighting is a single scalar
//! intensity; there is no colour anywhere in the pipeline.

use crate::distance::estimate_distance;
use crate::scene::{Camera, SceneSettings};
use crate::vector::{normalize, rotate_horizontal, rotate_vertical, Vec3};

/// Step cap for the march toward the light.
pub const SHADOW_STEPS: usize = 64;

/// Where the shadow march starts, to keep it from finding the surface
/// it left from.
pub const SHADOW_START: f64 = 0.1;

/// Number of samples taken along the normal for ambient occlusion.
pub const AO_SAMPLES: usize = 5;

/// Furthest ambient occlusion sample, and the cap applied to each
/// sampled distance.
pub const AO_MAX_DIST: f64 = 1.0;

/// What the ray marcher needs to know about a lit surface point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Shading {
    /// Final light intensity, fog included
    pub intensity: f64,
    /// Unit surface normal
    pub normal: Vec3,
    /// Unit vector from the surface back toward the viewer
    pub view_dir: Vec3,
}

/// The surface normal, taken as the gradient of the distance field.
///
/// This is a one-sided (backward) difference, `d(p) - d(p - eps)`,
/// rather than a central one.  Rendered output depends on it.
pub fn estimate_normal(pos: Vec3, settings: &SceneSettings) -> Vec3 {
    let eps = settings.epsilon;
    let power = settings.power;
    let d = estimate_distance(pos, power);
    let dx = d - estimate_distance(pos - Vec3::new(eps, 0.0, 0.0), power);
    let dy = d - estimate_distance(pos - Vec3::new(0.0, eps, 0.0), power);
    let dz = d - estimate_distance(pos - Vec3::new(0.0, 0.0, eps), power);
    normalize(Vec3::new(dx, dy, dz))
}

/// March from `pos` toward the light and report how much of it gets
/// through: 0.0 when the fractal is in the way, up to 1.0 when the
/// path is clear.  Near misses darken the result in proportion to how
/// close the path came to the surface, which gives the penumbra.
pub fn soft_shadow(pos: Vec3, light_pos: Vec3, power: f64, settings: &SceneSettings) -> f64 {
    let to_light = light_pos - pos;
    let light_dist = to_light.length();
    let light_dir = normalize(to_light);

    let mut t = SHADOW_START;
    let mut res: f64 = 1.0;
    for _ in 0..SHADOW_STEPS {
        let d = estimate_distance(pos + light_dir * t, power);
        if d < settings.surf_dist {
            return 0.0;
        }
        res = res.min(settings.shadow_sharpness * d / t);
        t += d;
        if t > light_dist {
            break;
        }
    }
    res
}

/// Approximate how much nearby geometry hides `pos` from ambient
/// light, by sampling the distance field at increasing distances along
/// the normal.  0.0 is fully buried; open space scores 1.0 or more,
/// since the sampled distances are capped but the result is not.
pub fn ambient_occlusion(pos: Vec3, normal: Vec3, settings: &SceneSettings) -> f64 {
    let occlusion: f64 = (1..=AO_SAMPLES)
        .map(|i| {
            let dist = i as f64 * AO_MAX_DIST / AO_SAMPLES as f64;
            let sample = estimate_distance(pos + normal * dist, settings.power);
            (dist - sample.min(AO_MAX_DIST)) / dist
        })
        .sum();
    (1.0 - occlusion / AO_SAMPLES as f64).max(0.0)
}

/// Phong highlight.
pub fn specular(view_dir: Vec3, light_dir: Vec3, normal: Vec3, shininess: f64) -> f64 {
    let reflect_dir = normalize(normal * (2.0 * normal.dot(light_dir)) - light_dir);
    view_dir.dot(reflect_dir).max(0.0).powf(shininess)
}

/// Exponential atmospheric attenuation.
pub fn fog(distance: f64, density: f64) -> f64 {
    (-distance * density).exp()
}

/// Light the surface point `pos`, reached along `ray_dir` after
/// travelling `hit_distance`.
///
/// The configured light lives in the camera's frame, so it is turned
/// by the camera's angles the same way sample points are.  Ambient
/// light is occluded but never shadowed; diffuse and specular are
/// both.
pub fn shade(
    pos: Vec3,
    ray_dir: Vec3,
    settings: &SceneSettings,
    camera: &Camera,
    hit_distance: f64,
) -> Shading {
    let normal = estimate_normal(pos, settings);
    let light_pos = rotate_horizontal(
        rotate_vertical(settings.light_pos, camera.angle_ver),
        camera.angle_hor,
    );
    let light_dir = normalize(light_pos - pos);
    let view_dir = normalize(-ray_dir);

    let shadow = soft_shadow(pos, light_pos, settings.power, settings);
    let ao = ambient_occlusion(pos, normal, settings);
    let diffuse = normal.dot(light_dir).max(0.0) * settings.diffuse;
    let highlight = specular(view_dir, light_dir, normal, settings.shininess) * settings.specular;

    let illumination = settings.ambient * ao + (diffuse + highlight) * shadow;
    Shading {
        intensity: illumination * fog(hit_distance, settings.fog_density),
        normal,
        view_dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SceneSettings {
        SceneSettings::default()
    }

    #[test]
    fn shadow_is_total_through_the_bulb() {
        let s = settings();
        let shadow = soft_shadow(
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 0.0, -3.0),
            s.power,
            &s,
        );
        assert_eq!(shadow, 0.0);
    }

    #[test]
    fn shadow_is_total_from_inside() {
        let s = settings();
        let shadow = soft_shadow(
            Vec3::new(0.0, 0.0, 0.3),
            Vec3::new(0.0, 0.0, 5.0),
            s.power,
            &s,
        );
        assert_eq!(shadow, 0.0);
    }

    #[test]
    fn shadow_is_open_facing_away() {
        let s = settings();
        let shadow = soft_shadow(
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 0.0, 6.0),
            s.power,
            &s,
        );
        assert!(shadow > 0.0 && shadow <= 1.0);
    }

    #[test]
    fn open_space_is_brighter_than_a_crevice() {
        let s = settings();
        let open = ambient_occlusion(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0), &s);
        let buried = ambient_occlusion(Vec3::new(0.0, 0.0, 0.7), Vec3::new(0.0, 0.0, -1.0), &s);
        assert!(open > buried);
        assert!(buried >= 0.0);
    }

    #[test]
    fn mirror_direction_gives_full_highlight() {
        let n = Vec3::new(0.0, 0.0, 1.0);
        let l = normalize(Vec3::new(1.0, 0.0, 1.0));
        let v = normalize(Vec3::new(-1.0, 0.0, 1.0));
        assert!((specular(v, l, n, 30.0) - 1.0).abs() < 1e-12);
        assert_eq!(specular(-v, l, n, 30.0), 0.0);
    }

    #[test]
    fn fog_decays_with_distance() {
        assert_eq!(fog(0.0, 0.03), 1.0);
        assert!(fog(10.0, 0.03) < fog(1.0, 0.03));
    }

    // Known deviation from a textbook central-difference normal: the
    // estimator only looks backward along each axis.
    #[test]
    fn normal_uses_backward_difference() {
        let s = settings();
        let p = Vec3::new(0.3, 0.5, 0.9);
        let e = s.epsilon;
        let d = |q: Vec3| estimate_distance(q, s.power);
        let backward = normalize(Vec3::new(
            d(p) - d(p - Vec3::new(e, 0.0, 0.0)),
            d(p) - d(p - Vec3::new(0.0, e, 0.0)),
            d(p) - d(p - Vec3::new(0.0, 0.0, e)),
        ));
        assert_eq!(estimate_normal(p, &s), backward);
    }

    #[test]
    fn normal_is_unit_length() {
        let s = settings();
        let n = estimate_normal(Vec3::new(0.0, 0.0, 1.2), &s);
        assert!((n.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ambient_survives_when_diffuse_is_off() {
        let s = SceneSettings {
            diffuse: 0.0,
            specular: 0.0,
            fog_density: 0.0,
            ..settings()
        };
        let camera = Camera::new(
            Vec3::new(0.0, 0.0, 5.0),
            0.0,
            0.0,
            0.7,
            Vec3::new(0.0, 1.0, 0.0),
        );
        let shading = shade(
            Vec3::new(0.0, 0.0, 4.0),
            Vec3::new(0.0, 0.0, -1.0),
            &s,
            &camera,
            1.0,
        );
        let ao = ambient_occlusion(Vec3::new(0.0, 0.0, 4.0), shading.normal, &s);
        assert!((shading.intensity - s.ambient * ao).abs() < 1e-12);
        assert_eq!(shading.view_dir, Vec3::new(0.0, 0.0, 1.0));
    }
}

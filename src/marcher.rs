// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sphere tracing of a single camera ray.
//!
//! A ray starts at the camera and repeatedly steps forward by the
//! distance estimate at its current position.  Because the estimate
//! never overshoots the surface, the ray either creeps up to it (a
//! hit, once the estimate drops below `surf_dist`) or runs past
//! `max_dist` or out of steps (a miss).  Hits are lit, and if the
//! scene is reflective, a second camera placed at the hit marches one
//! more ray from there.

use crate::distance::estimate_distance;
use crate::error::RenderError;
use crate::lighting::shade;
use crate::scene::{Camera, SceneSettings};
use crate::vector::{normalize, rotate_horizontal, rotate_vertical, Vec3};

/// The two terminal states of a march.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The ray reached the surface.
    Hit,
    /// The ray ran out of steps or distance.
    Miss,
}

/// The result of marching one pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitResult {
    /// `max_dist` minus the distance travelled, so misses report
    /// `max_dist` and nearer hits report larger values.  Not a true
    /// depth, but what the depth buffer is built from.
    pub depth: f64,
    /// Light intensity, 0 on a miss
    pub light: f64,
    /// How the march ended
    pub outcome: Outcome,
}

impl HitResult {
    fn miss(settings: &SceneSettings) -> HitResult {
        HitResult {
            depth: settings.max_dist,
            light: 0.0,
            outcome: Outcome::Miss,
        }
    }

    /// Did the ray reach the surface?
    pub fn is_hit(&self) -> bool {
        self.outcome == Outcome::Hit
    }
}

/// A fixed per-pixel offset in `[0, 0.01)` for the starting distance.
/// Neighbouring pixels start at slightly different points along their
/// rays, which breaks up banding.  It is a pure function of the pixel
/// coordinates, never a random draw.
#[inline]
pub fn jitter(x: usize, y: usize) -> f64 {
    0.01 * (x as f64 * 12.9898 + y as f64 * 78.233).rem_euclid(1.0)
}

/// The world-space direction of the ray through pixel `(x, y)`.
pub fn ray_direction(
    x: usize,
    y: usize,
    camera: &Camera,
    settings: &SceneSettings,
) -> Result<Vec3, RenderError> {
    let width = settings.width() as f64;
    let height = settings.height() as f64;
    let distance = height / camera.fov.tan();
    let dir = normalize(Vec3::new(
        width / 2.0 - x as f64,
        height / 2.0 - y as f64,
        distance,
    ));
    Ok(camera.view_basis(settings.target_pos)?.to_world(dir))
}

/// Where a camera ray first reached the surface, in the rotated
/// fractal frame.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Surface {
    pos: Vec3,
    ray_dir: Vec3,
    traveled: f64,
}

/// Sphere trace the ray through pixel `(x, y)` up to the surface, or
/// `None` when it runs out of steps or distance.
fn march_to_surface(
    x: usize,
    y: usize,
    camera: &Camera,
    settings: &SceneSettings,
) -> Result<Option<Surface>, RenderError> {
    let ray_dir = ray_direction(x, y, camera, settings)?;
    let mut traveled = jitter(x, y);

    for _ in 0..settings.max_steps {
        let pos = rotate_horizontal(
            rotate_vertical(camera.pos + ray_dir * traveled, camera.angle_ver),
            camera.angle_hor,
        );
        let dist = estimate_distance(pos, settings.power);
        if dist < settings.surf_dist {
            return Ok(Some(Surface {
                pos,
                ray_dir,
                traveled,
            }));
        }
        traveled += dist;
        if traveled > settings.max_dist {
            break;
        }
    }
    Ok(None)
}

/// March the ray through pixel `(x, y)`.  `depth` is the reflection
/// depth: 0 for camera rays, one more for each reflection below that.
pub fn ray_march(
    x: usize,
    y: usize,
    camera: &Camera,
    settings: &SceneSettings,
    depth: usize,
) -> Result<HitResult, RenderError> {
    debug_assert!(depth <= settings.max_reflections);

    let surface = match march_to_surface(x, y, camera, settings)? {
        Some(surface) => surface,
        None => return Ok(HitResult::miss(settings)),
    };

    let shading = shade(surface.pos, surface.ray_dir, settings, camera, surface.traveled);
    let mut light = shading.intensity;
    if depth < settings.max_reflections && settings.reflection > 0.0 {
        let mirrored = reflect(surface.pos, shading.normal, camera, settings, depth);
        light = light * (1.0 - settings.reflection) + mirrored.light * settings.reflection;
    }
    Ok(HitResult {
        depth: settings.max_dist - surface.traveled,
        light,
        outcome: Outcome::Hit,
    })
}

/// March the center pixel of a camera sitting just off the surface at
/// `hit`, one reflection deeper.  A camera that cannot look at the
/// target from where it sits sees nothing.
fn reflect(
    hit: Vec3,
    normal: Vec3,
    camera: &Camera,
    settings: &SceneSettings,
    depth: usize,
) -> HitResult {
    let mirror = camera.reflected_at(hit + normal * (2.0 * settings.surf_dist));
    match ray_march(
        settings.width() / 2,
        settings.height() / 2,
        &mirror,
        settings,
        depth + 1,
    ) {
        Ok(result) => result,
        Err(e) => {
            trace!("reflection from {:?} treated as a miss: {}", mirror.pos, e);
            HitResult::miss(settings)
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two immutable inputs of every render: where the camera is and
//! how the scene should be marched and lit.

use std::f64::consts::FRAC_PI_2;

use crate::error::RenderError;
use crate::vector::{normalize, Vec3};

/// Describes a camera: a position, two rotation angles applied to the
/// world before the fractal is evaluated, a field of view, and the
/// world's notion of "up."  Once built it is never modified; orbit
/// animations and reflections simply build new ones.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// Position in world space
    pub pos: Vec3,
    /// Pitch, in radians
    pub angle_ver: f64,
    /// Yaw, in radians
    pub angle_hor: f64,
    /// Field of view, in radians
    pub fov: f64,
    /// World up vector
    pub up: Vec3,
}

/// The camera's orthonormal frame, one axis per row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewBasis {
    /// Camera-space x
    pub right: Vec3,
    /// Camera-space y
    pub up: Vec3,
    /// Camera-space z, pointing at the target
    pub forward: Vec3,
}

impl ViewBasis {
    /// Express a camera-space direction in world space.
    #[inline]
    pub fn to_world(&self, dir: Vec3) -> Vec3 {
        self.right * dir.x + self.up * dir.y + self.forward * dir.z
    }
}

impl Camera {
    /// Constructor.
    pub fn new(pos: Vec3, angle_ver: f64, angle_hor: f64, fov: f64, up: Vec3) -> Camera {
        Camera {
            pos,
            angle_ver,
            angle_hor,
            fov,
            up,
        }
    }

    /// A camera used to sample a reflection from a surface hit.  It
    /// shares the optics of its parent but carries no rotation, since
    /// the hit point is already expressed in the rotated frame.
    pub fn reflected_at(&self, pos: Vec3) -> Camera {
        Camera::new(pos, 0.0, 0.0, self.fov, self.up)
    }

    /// Build the view basis looking at `target`.
    pub fn view_basis(&self, target: Vec3) -> Result<ViewBasis, RenderError> {
        let to_target = target - self.pos;
        if to_target.length() == 0.0 {
            return Err(RenderError::UndefinedViewBasis);
        }
        let forward = normalize(to_target);
        let right = normalize(forward.cross(self.up));
        if right.length() == 0.0 {
            return Err(RenderError::DegenerateUpVector);
        }
        let up = right.cross(forward);
        Ok(ViewBasis { right, up, forward })
    }

    /// Reject optics the ray generator cannot use.
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.fov > 0.0 && self.fov < FRAC_PI_2) {
            return Err(RenderError::InvalidSetting {
                name: "fov",
                value: self.fov,
            });
        }
        for &(name, value) in &[
            ("angle_ver", self.angle_ver),
            ("angle_hor", self.angle_hor),
        ] {
            if !value.is_finite() {
                return Err(RenderError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }
}

/// Largest fractal power accepted.  `r^power` with `r <= 2` must stay
/// comfortably inside `f64`.
pub const MAX_POWER: f64 = 64.0;

/// Render and shading parameters.  Like the `Camera`, this object
/// should not be mutated once a render has started; every core
/// function borrows it immutably.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneSettings {
    /// Image width and height are both `4 * resolution`
    pub resolution: usize,
    /// Sphere tracing step cap
    pub max_steps: usize,
    /// Sphere tracing travel cap
    pub max_dist: f64,
    /// Distance below which a sample counts as a surface hit
    pub surf_dist: f64,
    /// Offset used for the normal gradient
    pub epsilon: f64,
    /// Exponent of the mandelbulb map
    pub power: f64,
    /// Point the camera looks at
    pub target_pos: Vec3,
    /// Light position, relative to the unrotated camera frame
    pub light_pos: Vec3,
    /// Overall light brightness; not used by the shading terms
    pub light_intensity: f64,
    /// Ambient light level
    pub ambient: f64,
    /// Diffuse strength
    pub diffuse: f64,
    /// Specular highlight strength
    pub specular: f64,
    /// Specular exponent; higher means a smaller highlight
    pub shininess: f64,
    /// Weight of the reflected light in `[0, 1]`
    pub reflection: f64,
    /// Reflection glossiness; not used by the shading terms
    pub glossiness: f64,
    /// Maximum reflection recursion depth
    pub max_reflections: usize,
    /// Atmospheric fog density
    pub fog_density: f64,
    /// Higher means harder shadow edges
    pub shadow_sharpness: f64,
}

impl Default for SceneSettings {
    fn default() -> SceneSettings {
        SceneSettings {
            resolution: 100,
            max_steps: 300,
            max_dist: 150.0,
            surf_dist: 0.001,
            epsilon: 0.001,
            power: 8.0,
            target_pos: Vec3::ZERO,
            light_pos: Vec3::new(2.0, 2.0, 2.0),
            light_intensity: 1.2,
            ambient: 0.15,
            diffuse: 0.7,
            specular: 0.4,
            shininess: 30.0,
            reflection: 0.3,
            glossiness: 0.7,
            max_reflections: 1,
            fog_density: 0.03,
            shadow_sharpness: 16.0,
        }
    }
}

impl SceneSettings {
    /// Image width in pixels.
    pub fn width(&self) -> usize {
        4 * self.resolution
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        4 * self.resolution
    }

    /// Check every parameter the march loops depend on for
    /// termination or finite arithmetic.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.resolution == 0 {
            return Err(RenderError::InvalidResolution(self.resolution));
        }
        if self.max_steps == 0 {
            return Err(RenderError::InvalidSetting {
                name: "max_steps",
                value: 0.0,
            });
        }

        let positive = [
            ("max_dist", self.max_dist),
            ("surf_dist", self.surf_dist),
            ("epsilon", self.epsilon),
        ];
        for &(name, value) in &positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(RenderError::InvalidSetting { name, value });
            }
        }

        if !(self.power >= 1.0 && self.power <= MAX_POWER) {
            return Err(RenderError::InvalidSetting {
                name: "power",
                value: self.power,
            });
        }
        if !(self.reflection >= 0.0 && self.reflection <= 1.0) {
            return Err(RenderError::InvalidSetting {
                name: "reflection",
                value: self.reflection,
            });
        }

        let finite = [
            ("ambient", self.ambient),
            ("diffuse", self.diffuse),
            ("specular", self.specular),
            ("shininess", self.shininess),
            ("fog_density", self.fog_density),
            ("shadow_sharpness", self.shadow_sharpness),
        ];
        for &(name, value) in &finite {
            if !value.is_finite() {
                return Err(RenderError::InvalidSetting { name, value });
            }
        }

        if !self.target_pos.is_finite() || !self.light_pos.is_finite() {
            return Err(RenderError::InvalidSetting {
                name: "position",
                value: std::f64::NAN,
            });
        }
        Ok(())
    }
}

#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbulb renderer
//!
//! The mandelbulb is a three-dimensional cousin of the Mandelbrot
//! set.  Where the Mandelbrot squares a complex number over and over,
//! the mandelbulb takes a point in space, writes it in spherical
//! coordinates, raises the radius to some power (classically 8) and
//! multiplies both angles by the same power.  Points whose orbits
//! never escape are inside; the boundary is the fractal.
//!
//! There is no mesh to intersect, so we render it by sphere tracing:
//! for any point in space the distance estimator gives a radius
//! within which the surface cannot be, and a ray can safely step that
//! far.  Rays that creep close enough to the surface are lit with a
//! small local model (diffuse and specular, soft shadows, ambient
//! occlusion, fog, and a bounded number of reflections); rays that
//! wander off are background.
//!
//! A frame is a pair of grids, depth and light, each normalized to
//! `[0, 1]`.  What to do with them (save, display, stitch into an
//! animation) is up to the caller; this library does no I/O.

extern crate crossbeam;
extern crate glam;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num_cpus;

pub mod buffer;
pub mod distance;
pub mod error;
pub mod lighting;
pub mod marcher;
pub mod render;
pub mod scene;
pub mod vector;

pub use buffer::{Buffer, RenderBuffers};
pub use error::RenderError;
pub use marcher::{ray_march, HitResult, Outcome};
pub use render::{render_frame, FrameRenderer};
pub use scene::{Camera, SceneSettings};
pub use vector::Vec3;

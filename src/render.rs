// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Whole-frame rendering.
//!
//! Every pixel is an independent march: no pixel reads another's
//! result, and the inputs are shared read-only.  That makes a frame a
//! parallel map.  Worker threads pull pixel coordinates from a shared
//! iterator, march them, and keep their results in a private list.
//! Once every worker has joined, the lists are scattered into the
//! buffers by coordinate, so the order in which pixels finish does
//! not matter and the grids themselves never need a lock.

use itertools::iproduct;
use std::ops::Range;
use std::sync::{Arc, Mutex};

use crossbeam::thread::ScopedJoinHandle;

use crate::buffer::RenderBuffers;
use crate::error::RenderError;
use crate::marcher::{ray_march, HitResult};
use crate::scene::{Camera, SceneSettings};

type PixelQueue = Arc<Mutex<itertools::Product<Range<usize>, Range<usize>>>>;

type Marched = Vec<(usize, usize, HitResult)>;

/// Renders one frame of the mandelbulb.  The camera and settings are
/// checked once, at construction; after that the renderer is
/// immutable and can be asked for the frame any number of times.
pub struct FrameRenderer {
    camera: Camera,
    settings: SceneSettings,
}

impl FrameRenderer {
    /// Requires the camera pose and the scene settings.  Fails if the
    /// settings are unusable or the camera cannot build a view basis
    /// toward the target.
    pub fn new(camera: Camera, settings: SceneSettings) -> Result<Self, RenderError> {
        settings.validate()?;
        camera.validate()?;
        camera.view_basis(settings.target_pos)?;
        Ok(FrameRenderer { camera, settings })
    }

    /// March every pixel, column by column, on the current thread.
    fn march_all(&self) -> Result<Marched, RenderError> {
        iproduct!(0..self.settings.width(), 0..self.settings.height())
            .map(|(x, y)| Ok((x, y, ray_march(x, y, &self.camera, &self.settings, 0)?)))
            .collect()
    }

    /// Given the marched pixels in any order, build and normalize the
    /// two buffers.
    fn assemble(&self, marched: Marched) -> RenderBuffers {
        let mut buffers = RenderBuffers::new(self.settings.width(), self.settings.height());
        for (x, y, hit) in marched {
            buffers.depth.set(y, x, hit.depth);
            buffers.light.set(y, x, hit.light);
        }
        buffers.normalize();
        buffers
    }

    /// The single-threaded render.
    pub fn render_single(&self) -> Result<RenderBuffers, RenderError> {
        debug!(
            "rendering {}x{} frame on one thread",
            self.settings.width(),
            self.settings.height()
        );
        Ok(self.assemble(self.march_all()?))
    }

    /// A multi-threaded version of the render function that takes a
    /// thread count as an option.  Produces exactly the same buffers
    /// as `render_single`.
    pub fn render(&self, threads: usize) -> Result<RenderBuffers, RenderError> {
        if threads == 0 {
            return Err(RenderError::InvalidThreadCount(threads));
        }
        debug!(
            "rendering {}x{} frame on {} threads",
            self.settings.width(),
            self.settings.height(),
            threads
        );

        let pixels: PixelQueue = Arc::new(Mutex::new(iproduct!(
            0..self.settings.width(),
            0..self.settings.height()
        )));

        let joined = crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<Result<Marched, RenderError>>> = (0..threads)
                .map(|worker| {
                    let pixels = pixels.clone();
                    spawner.spawn(move |_| {
                        let mut marched: Marched = vec![];
                        loop {
                            // Poisoned only if another worker panicked mid-lock.
                            let pixel = match pixels.lock() {
                                Ok(mut queue) => queue.next(),
                                Err(_) => return Err(RenderError::WorkerPanicked),
                            };
                            match pixel {
                                Some((x, y)) => {
                                    let hit = ray_march(x, y, &self.camera, &self.settings, 0)?;
                                    marched.push((x, y, hit));
                                }
                                None => {
                                    break;
                                }
                            }
                        }
                        trace!("worker {} marched {} pixels", worker, marched.len());
                        Ok(marched)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .map_err(|_| RenderError::WorkerPanicked)
                        .and_then(|marched| marched)
                })
                .collect::<Result<Vec<Marched>, RenderError>>()
        })
        .map_err(|_| RenderError::WorkerPanicked)??;

        Ok(self.assemble(joined.into_iter().flatten().collect()))
    }
}

/// Render one frame with a worker per available CPU.  This is the
/// main entry point for callers that do not care about threading.
pub fn render_frame(camera: &Camera, settings: &SceneSettings) -> Result<RenderBuffers, RenderError> {
    FrameRenderer::new(*camera, *settings)?.render(num_cpus::get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3;

    fn camera(pos: Vec3) -> Camera {
        Camera::new(
            pos,
            20f64.to_radians(),
            0.0,
            45f64.to_radians(),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }

    fn small() -> SceneSettings {
        SceneSettings {
            resolution: 2,
            max_reflections: 2,
            ..SceneSettings::default()
        }
    }

    #[test]
    fn zero_threads_is_an_error() {
        let renderer = FrameRenderer::new(camera(Vec3::new(0.0, 0.5, 2.5)), small()).unwrap();
        assert_eq!(
            renderer.render(0).err(),
            Some(RenderError::InvalidThreadCount(0))
        );
    }

    #[test]
    fn bad_camera_is_caught_up_front() {
        assert_eq!(
            FrameRenderer::new(camera(Vec3::ZERO), small()).err(),
            Some(RenderError::UndefinedViewBasis)
        );
    }

    #[test]
    fn threaded_matches_single() {
        let renderer = FrameRenderer::new(camera(Vec3::new(0.0, 0.5, 2.5)), small()).unwrap();
        let single = renderer.render_single().unwrap();
        let threaded = renderer.render(3).unwrap();
        assert_eq!(single, threaded);
    }

    #[test]
    fn frame_is_normalized() {
        let buffers = render_frame(&camera(Vec3::new(0.0, 0.5, 2.5)), &small()).unwrap();
        assert_eq!(buffers.light.width(), 8);
        assert_eq!(buffers.light.height(), 8);
        assert_eq!(buffers.light.min_max(), Some((0.0, 1.0)));
        assert_eq!(buffers.depth.min_max(), Some((0.0, 1.0)));
    }
}

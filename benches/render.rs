// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[macro_use]
extern crate criterion;

use criterion::Criterion;
use mandelbulb::distance::estimate_distance;
use mandelbulb::{ray_march, Camera, FrameRenderer, SceneSettings, Vec3};

fn camera() -> Camera {
    Camera::new(
        Vec3::new(0.0, 0.5, 2.5),
        20f64.to_radians(),
        0.0,
        45f64.to_radians(),
        Vec3::new(0.0, 1.0, 0.0),
    )
}

fn distance_estimator(c: &mut Criterion) {
    c.bench_function("estimate_distance", |b| {
        b.iter(|| estimate_distance(Vec3::new(0.3, 0.5, 0.7), 8.0))
    });
}

fn center_pixel(c: &mut Criterion) {
    let settings = SceneSettings {
        resolution: 25,
        ..SceneSettings::default()
    };
    c.bench_function("ray_march center", move |b| {
        b.iter(|| ray_march(50, 50, &camera(), &settings, 0))
    });
}

fn small_frame(c: &mut Criterion) {
    let settings = SceneSettings {
        resolution: 4,
        ..SceneSettings::default()
    };
    c.bench_function("frame 16x16", move |b| {
        let renderer = FrameRenderer::new(camera(), settings).unwrap();
        b.iter(|| renderer.render(num_cpus::get()))
    });
}

criterion_group!(benches, distance_estimator, center_pixel, small_frame);
criterion_main!(benches);

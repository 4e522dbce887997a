// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render an orbit around the mandelbulb and save every frame as
//! three grayscale images: depth, light, and a blend of the two.

#[macro_use]
extern crate log;

use clap::{App, Arg, ArgMatches};
use failure::Error;
use image::ColorType;
use log::LevelFilter;
use num::clamp;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use mandelbulb::{Buffer, Camera, FrameRenderer, SceneSettings, Vec3};

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn parse<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    let value = matches.value_of(name).unwrap_or_default();
    T::from_str(value).map_err(|_| failure::format_err!("Could not parse {}: {}", name, value))
}

const OUTPUT: &str = "output";
const RESOLUTION: &str = "resolution";
const POWER: &str = "power";
const FRAMES: &str = "frames";
const RADIUS: &str = "radius";
const HEIGHT: &str = "height";
const REFLECTIONS: &str = "reflections";
const THREADS: &str = "threads";
const VERBOSE: &str = "verbose";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("bulb")
        .version("0.1.0")
        .about("Mandelbulb sphere tracer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output directory"),
        )
        .arg(
            Arg::with_name(RESOLUTION)
                .long(RESOLUTION)
                .short("r")
                .takes_value(true)
                .default_value("25")
                .validator(|s| {
                    validate_range(
                        &s,
                        1usize,
                        2_000,
                        "Could not parse resolution",
                        "Resolution must be between 1 and 2000",
                    )
                })
                .help("Image side is four times this many pixels"),
        )
        .arg(
            Arg::with_name(POWER)
                .long(POWER)
                .short("p")
                .takes_value(true)
                .default_value("8")
                .validator(|s| {
                    validate_range(
                        &s,
                        1.0f64,
                        mandelbulb::scene::MAX_POWER,
                        "Could not parse power",
                        "Power must be between 1 and 64",
                    )
                })
                .help("Exponent of the mandelbulb"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .long(FRAMES)
                .short("f")
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        1usize,
                        10_000,
                        "Could not parse frame count",
                        "Frame count must be between 1 and 10000",
                    )
                })
                .help("Number of frames in one full orbit"),
        )
        .arg(
            Arg::with_name(RADIUS)
                .long(RADIUS)
                .takes_value(true)
                .default_value("2.5")
                .help("Distance of the camera from the orbit axis"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .long(HEIGHT)
                .takes_value(true)
                .default_value("0.5")
                .help("Height of the camera above the orbit plane"),
        )
        .arg(
            Arg::with_name(REFLECTIONS)
                .long(REFLECTIONS)
                .takes_value(true)
                .default_value("2")
                .validator(|s| {
                    validate_range(
                        &s,
                        0usize,
                        4,
                        "Could not parse reflection depth",
                        "Reflection depth must be between 0 and 4",
                    )
                })
                .help("Maximum reflection depth"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in the renderer (default: all)"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .short("v")
                .multiple(true)
                .help("More logging; repeat for more"),
        )
        .get_matches()
}

fn init_logger(occurrences: u64) {
    let level = match occurrences {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

/// The camera for frame `index` of an orbit of `frames` frames: it
/// circles the y-axis at `radius`, slightly above the bulb, and
/// looks down at it.
fn orbit_camera(index: usize, frames: usize, radius: f64, height: f64) -> Camera {
    let angle = 2.0 * PI * index as f64 / frames as f64;
    Camera::new(
        Vec3::new(radius * angle.sin(), height, radius * angle.cos()),
        20f64.to_radians(),
        -angle,
        45f64.to_radians(),
        Vec3::new(0.0, 1.0, 0.0),
    )
}

fn quantize(value: f64) -> u8 {
    clamp(value * 255.0, 0.0, 255.0).round() as u8
}

fn to_gray(buffer: &Buffer) -> Vec<u8> {
    buffer.as_slice().iter().map(|&v| quantize(v)).collect()
}

/// Depth and light mixed 3:7.
fn combine(depth: &Buffer, light: &Buffer) -> Vec<u8> {
    depth
        .as_slice()
        .iter()
        .zip(light.as_slice())
        .map(|(&d, &l)| quantize(d * 0.3 + l * 0.7))
        .collect()
}

fn write_image(path: &Path, pixels: &[u8], bounds: (usize, usize)) -> Result<(), Error> {
    image::save_buffer(
        path,
        pixels,
        bounds.0 as u32,
        bounds.1 as u32,
        ColorType::Gray(8),
    )?;
    Ok(())
}

fn frame_path(dir: &Path, index: usize, kind: &str) -> PathBuf {
    dir.join(format!("mandelbulb_frame_{:04}_{}.png", index, kind))
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let output = Path::new(matches.value_of(OUTPUT).unwrap_or_default());
    std::fs::create_dir_all(output)?;

    let settings = SceneSettings {
        resolution: parse(matches, RESOLUTION)?,
        power: parse(matches, POWER)?,
        max_reflections: parse(matches, REFLECTIONS)?,
        ..SceneSettings::default()
    };
    let frames: usize = parse(matches, FRAMES)?;
    let radius: f64 = parse(matches, RADIUS)?;
    let height: f64 = parse(matches, HEIGHT)?;
    let threads = match matches.value_of(THREADS) {
        Some(_) => parse(matches, THREADS)?,
        None => num_cpus::get(),
    };
    let bounds = (settings.width(), settings.height());

    info!(
        "rendering {} frame(s) at {}x{} with {} threads",
        frames, bounds.0, bounds.1, threads
    );
    for index in 0..frames {
        let camera = orbit_camera(index, frames, radius, height);
        let buffers = FrameRenderer::new(camera, settings)?.render(threads)?;
        write_image(&frame_path(output, index, "depth"), &to_gray(&buffers.depth), bounds)?;
        write_image(&frame_path(output, index, "light"), &to_gray(&buffers.light), bounds)?;
        write_image(
            &frame_path(output, index, "combined"),
            &combine(&buffers.depth, &buffers.light),
            bounds,
        )?;
        info!("frame {}/{} done", index + 1, frames);
    }
    info!("images saved to {}", output.display());
    Ok(())
}

fn main() {
    let matches = args();
    init_logger(matches.occurrences_of(VERBOSE));
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_orbit_frame_faces_the_bulb() {
        let camera = orbit_camera(0, 16, 2.5, 0.5);
        assert_eq!(camera.pos, Vec3::new(0.0, 0.5, 2.5));
        assert_eq!(camera.angle_hor, 0.0);
    }

    #[test]
    fn quarter_orbit_is_on_the_x_axis() {
        let camera = orbit_camera(4, 16, 2.5, 0.5);
        assert!((camera.pos.x - 2.5).abs() < 1e-12);
        assert!(camera.pos.z.abs() < 1e-12);
    }

    #[test]
    fn quantize_clamps() {
        assert_eq!(quantize(-1.0), 0);
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 255);
        assert_eq!(quantize(2.0), 255);
    }

    #[test]
    fn range_validation() {
        assert!(validate_range("3", 1usize, 4, "nan", "range").is_ok());
        assert_eq!(
            validate_range("9", 1usize, 4, "nan", "range"),
            Err("range".to_string())
        );
        assert_eq!(
            validate_range("x", 1usize, 4, "nan", "range"),
            Err("nan".to_string())
        );
    }
}

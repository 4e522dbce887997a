// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn renders_every_image_of_every_frame() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("bulb")
        .unwrap()
        .args(&["-o", dir.path().to_str().unwrap(), "-r", "2", "-f", "2", "-t", "1"])
        .assert()
        .success();
    for frame in 0..2 {
        for kind in &["depth", "light", "combined"] {
            let path = dir
                .path()
                .join(format!("mandelbulb_frame_{:04}_{}.png", frame, kind));
            assert!(predicate::path::exists().eval(&path));
        }
    }
}

#[test]
fn output_is_required() {
    Command::cargo_bin("bulb").unwrap().assert().failure();
}

#[test]
fn out_of_range_power_is_rejected() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("bulb")
        .unwrap()
        .args(&["-o", dir.path().to_str().unwrap(), "-p", "1000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Power must be between"));
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Domain errors.  Degenerate inputs are reported here instead of
//! being allowed to turn into NaN somewhere inside a march.

use failure::Fail;

/// Everything that can go wrong before or during a render.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// Width and height are `4 * resolution`, so zero is meaningless.
    #[fail(display = "resolution must be a positive integer, got {}", _0)]
    InvalidResolution(usize),

    /// The worker pool needs at least one thread.
    #[fail(display = "thread count must be at least 1, got {}", _0)]
    InvalidThreadCount(usize),

    /// A numeric setting outside of the range the renderer can handle.
    #[fail(display = "setting {} has unusable value {}", name, value)]
    InvalidSetting {
        /// Name of the offending field
        name: &'static str,
        /// The value that was rejected
        value: f64,
    },

    /// The camera sits on its own target, so there is no forward axis.
    #[fail(display = "undefined view basis: camera position equals target")]
    UndefinedViewBasis,

    /// Forward is parallel to the up vector, so there is no right axis.
    #[fail(display = "undefined view basis: up vector is parallel to the view direction")]
    DegenerateUpVector,

    /// A worker thread died before handing back its pixels.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}

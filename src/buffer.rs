// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Row-major intensity grids, and the pair of them a frame produces.

/// A `height x width` grid of intensities, indexed `(row, column)`,
/// which is to say `(y, x)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Buffer {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Buffer {
    /// A buffer of the given size, filled with zeros.
    pub fn new(width: usize, height: usize) -> Buffer {
        Buffer {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The value at row `y`, column `x`.
    pub fn get(&self, y: usize, x: usize) -> f64 {
        self.data[self.offset(y, x)]
    }

    /// Overwrite the value at row `y`, column `x`.
    pub fn set(&mut self, y: usize, x: usize, value: f64) {
        let offset = self.offset(y, x);
        self.data[offset] = value;
    }

    /// The underlying storage, row after row.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// One row of the grid.
    pub fn row(&self, y: usize) -> &[f64] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// The smallest and largest values, or `None` for an empty grid.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut values = self.data.iter().cloned();
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Stretch the values linearly so that the minimum becomes exactly
    /// 0.0 and the maximum exactly 1.0.  A constant grid has no range to
    /// stretch and is left as it is.
    pub fn normalize(&mut self) {
        if let Some((lo, hi)) = self.min_max() {
            if hi > lo {
                let range = hi - lo;
                for v in &mut self.data {
                    *v = (*v - lo) / range;
                }
            }
        }
    }

    fn offset(&self, y: usize, x: usize) -> usize {
        assert!(y < self.height && x < self.width, "pixel out of bounds");
        y * self.width + x
    }
}

/// The two grids a frame render produces.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderBuffers {
    /// Depth-like values, see `HitResult::depth`
    pub depth: Buffer,
    /// Light intensity
    pub light: Buffer,
}

impl RenderBuffers {
    /// A zeroed pair of the given size.
    pub fn new(width: usize, height: usize) -> RenderBuffers {
        RenderBuffers {
            depth: Buffer::new(width, height),
            light: Buffer::new(width, height),
        }
    }

    /// Normalize both grids to `[0, 1]`.
    pub fn normalize(&mut self) {
        self.light.normalize();
        self.depth.normalize();
    }
}

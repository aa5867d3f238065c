// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::{Error, Result};
use ndarray::{Array1, Array2, ArrayView2};
use siamtrack_tensor::TensorShape;

/// Index grids for a `rows` x `cols` response map, filled in row-major
/// order. The first grid holds the column index of each cell, the second its
/// row index.
///
/// # Examples
/// ```rust
/// let (grid_x, grid_y) = siamtrack_tracker::grid(2, 3);
/// assert_eq!(grid_x[[1, 2]], 2.0);
/// assert_eq!(grid_y[[1, 2]], 1.0);
/// ```
pub fn grid(rows: usize, cols: usize) -> (Array2<f32>, Array2<f32>) {
    let grid_x = Array2::from_shape_fn((rows, cols), |(_, c)| c as f32);
    let grid_y = Array2::from_shape_fn((rows, cols), |(r, _)| r as f32);
    (grid_x, grid_y)
}

/// Anchor centers of every response map cell in crop (instance) space.
///
/// Built once per tracker configuration; its shape is fixed afterwards and
/// every score and regression tensor decoded against it must agree with it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorLattice {
    x: Array2<f32>,
    y: Array2<f32>,
}

impl AnchorLattice {
    /// Lattice of a `score_size` x `score_size` response map whose cells are
    /// `total_stride` crop pixels apart and whose center cell sits on the
    /// center of an `instance_size` crop.
    pub fn new(score_size: usize, total_stride: usize, instance_size: usize) -> Self {
        let (grid_x, grid_y) = grid(score_size, score_size);
        let offset = (score_size / 2) as f32;
        let stride = total_stride as f32;
        let center = (instance_size / 2) as f32;
        Self {
            x: grid_x.mapv(|c| (c - offset) * stride + center),
            y: grid_y.mapv(|r| (r - offset) * stride + center),
        }
    }

    /// Wraps externally computed anchor centers.
    pub fn from_grids(x: Array2<f32>, y: Array2<f32>) -> Result<Self> {
        if x.dim() != y.dim() {
            return Err(Error::ShapeMismatch {
                name: "anchor y".to_owned(),
                actual: TensorShape::new(y.shape()),
                expected: TensorShape::new(x.shape()),
            });
        }
        Ok(Self {
            x: x.as_standard_layout().into_owned(),
            y: y.as_standard_layout().into_owned(),
        })
    }

    pub fn x(&self) -> ArrayView2<'_, f32> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView2<'_, f32> {
        self.y.view()
    }

    pub fn rows(&self) -> usize {
        self.x.nrows()
    }

    pub fn cols(&self) -> usize {
        self.x.ncols()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.x.dim()
    }
}

/// Spatial prior over the response map, peaking at the center, used to
/// discourage large displacements between frames. Read only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowPrior {
    weights: Array2<f32>,
}

impl WindowPrior {
    /// Outer product of two `size` point Hanning windows.
    pub fn hanning(size: usize) -> Self {
        Self::hanning_rect(size, size)
    }

    pub fn hanning_rect(rows: usize, cols: usize) -> Self {
        let h_rows = hanning(rows);
        let h_cols = hanning(cols);
        Self {
            weights: Array2::from_shape_fn((rows, cols), |(r, c)| h_rows[r] * h_cols[c]),
        }
    }

    /// A prior with no spatial preference.
    pub fn uniform(rows: usize, cols: usize) -> Self {
        Self {
            weights: Array2::ones((rows, cols)),
        }
    }

    pub fn from_array(weights: Array2<f32>) -> Self {
        Self {
            weights: weights.as_standard_layout().into_owned(),
        }
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.weights.view()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.weights.dim()
    }
}

/// Symmetric Hanning window `0.5 - 0.5 cos(2 pi n / (m - 1))`.
fn hanning(m: usize) -> Array1<f32> {
    if m <= 1 {
        return Array1::ones(m);
    }
    let denom = (m - 1) as f64;
    Array1::from_shape_fn(m, |n| {
        (0.5 - 0.5 * (2.0 * std::f64::consts::PI * n as f64 / denom).cos()) as f32
    })
}

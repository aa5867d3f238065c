// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::{
    geometry::{recover_box, BoundingBox, Corners, ScaleXY, Size2},
    AnchorLattice, Error, FunctionTimer, Result, WindowPrior,
};
use log::{debug, trace};
use ndarray::{Array2, ArrayView2, ArrayView3, ArrayViewD, Axis, Zip};
use serde::{Deserialize, Serialize};
use siamtrack_tensor::TensorShape;

/// Scoring coefficients applied while decoding a response map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodeParams {
    /// Strength of the size and aspect ratio change penalty.
    pub penalty_k: f32,
    /// Weight of the window prior in the fused score, in `[0, 1]`.
    pub window_influence: f32,
    /// Base size update rate, scaled per frame by the winner's score.
    pub lr: f32,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            penalty_k: 0.04,
            window_influence: 0.44,
            lr: 0.33,
        }
    }
}

/// A box decoded from one anchor together with its scores.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Candidate {
    pub corners: Corners,
    /// Logistic of the raw classification score.
    pub confidence: f32,
    /// Confidence after the size and ratio penalty.
    pub penalized_score: f32,
    /// Penalized score blended with the window prior. The selection key.
    pub fused_score: f32,
}

/// Outcome of decoding one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackEstimate {
    /// The updated target box in image coordinates.
    pub bbox: BoundingBox,
    pub candidate: Candidate,
    /// `(row, col)` of the winning cell.
    pub cell: (usize, usize),
    /// Size update rate applied to `bbox`, `penalized_score * lr`.
    pub adaptive_lr: f32,
}

#[inline(always)]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Diagonal of a box padded by half its perimeter on each side.
#[inline(always)]
fn padded_diagonal(w: f32, h: f32) -> f32 {
    let pad = (w + h) * 0.5;
    ((w + pad) * (h + pad)).sqrt()
}

#[inline(always)]
fn change(r: f32) -> f32 {
    r.max(1.0 / r)
}

/// Decodes and scores one candidate per anchor.
///
/// `target` is the previous target size in crop pixels. `preds` holds the
/// left, top, right and bottom distances from each anchor center, channel
/// first. All inputs must share the lattice shape; cells are independent so
/// the map runs in parallel.
pub fn decode_candidates(
    lattice: &AnchorLattice,
    window: &WindowPrior,
    target: Size2,
    scores: ArrayView2<f32>,
    preds: ArrayView3<f32>,
    params: &DecodeParams,
) -> Array2<Candidate> {
    let target_diag = padded_diagonal(target.width, target.height);
    let target_ratio = target.width / target.height;
    let k = params.penalty_k;
    let w = params.window_influence;

    Zip::from(lattice.x())
        .and(lattice.y())
        .and(window.view())
        .and(scores)
        .and(preds.lanes(Axis(0)))
        .par_map_collect(|&ax, &ay, &prior, &score, delta| {
            let corners = Corners {
                left: ax - delta[0],
                top: ay - delta[1],
                right: ax + delta[2],
                bottom: ay + delta[3],
            };
            let width = corners.width();
            let height = corners.height();

            let confidence = sigmoid(score);
            let cost_size = change(padded_diagonal(width, height) / target_diag);
            let cost_ratio = change(width / height / target_ratio);
            let penalized_score = (-(cost_size * cost_ratio - 1.0) * k).exp() * confidence;
            let fused_score = penalized_score * (1.0 - w) + prior * w;

            Candidate {
                corners,
                confidence,
                penalized_score,
                fused_score,
            }
        })
}

/// Returns the `(row, col)` of the candidate with the largest fused score.
///
/// Cells are scanned in row-major order and only a strictly greater score
/// replaces the current best, so ties go to the first cell. NaN scores are
/// never selected; if every score is NaN the first cell is returned.
pub fn select_candidate(candidates: ArrayView2<Candidate>) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_score = f32::NEG_INFINITY;
    for (cell, candidate) in candidates.indexed_iter() {
        if candidate.fused_score > best_score {
            best_score = candidate.fused_score;
            best = cell;
        }
    }
    best
}

fn check_shape(name: &str, view: &ArrayViewD<f32>, expected: &[usize]) -> Result<()> {
    let actual = TensorShape::new(view.shape());
    let expected = TensorShape::new(expected);
    if !actual.matches(&expected) {
        return Err(Error::ShapeMismatch {
            name: name.to_owned(),
            actual,
            expected,
        });
    }
    if !view.is_standard_layout() {
        return Err(Error::NotContiguous(format!("{name} tensor {actual}")));
    }
    Ok(())
}

/// Selects and reconstructs the tracked box for one frame.
///
/// `scores` must have the lattice shape `(R, C)` and `preds` the shape
/// `(4, R, C)`, both contiguous; leading unit batch dimensions are accepted.
/// Any other shape fails with [`Error::ShapeMismatch`] before anything is
/// decoded.
///
/// `previous` is the previous target box with its center in image
/// coordinates and its size in crop coordinates, `scale` maps image pixels to
/// crop pixels and `instance_size` is the size of the crop the network saw.
///
/// # Examples
/// ```rust
/// use ndarray::{Array2, Array3};
/// use siamtrack_tracker::{
///     estimate_track_rect, AnchorLattice, BoundingBox, DecodeParams, ScaleXY, Size2,
///     WindowPrior,
/// };
/// # fn main() -> siamtrack_tracker::Result<()> {
/// let lattice = AnchorLattice::from_grids(
///     Array2::from_elem((1, 1), 50.0),
///     Array2::from_elem((1, 1), 50.0),
/// )?;
/// let window = WindowPrior::uniform(1, 1);
/// let scores = Array2::from_elem((1, 1), 0.8f32.ln() - 0.2f32.ln());
/// let preds = Array3::from_elem((4, 1, 1), 5.0f32);
/// let params = DecodeParams { penalty_k: 0.0, window_influence: 0.0, lr: 0.5 };
///
/// let estimate = estimate_track_rect(
///     &lattice,
///     &window,
///     &BoundingBox::from_center(50.0, 50.0, 10.0, 10.0),
///     scores.view().into_dyn(),
///     preds.view().into_dyn(),
///     ScaleXY::uniform(1.0),
///     Size2::square(100.0),
///     &params,
/// )?;
/// assert!((estimate.adaptive_lr - 0.4).abs() < 1e-5);
/// # Ok(())
/// # }
/// ```
#[allow(clippy::too_many_arguments)]
pub fn estimate_track_rect(
    lattice: &AnchorLattice,
    window: &WindowPrior,
    previous: &BoundingBox,
    scores: ArrayViewD<f32>,
    preds: ArrayViewD<f32>,
    scale: ScaleXY,
    instance_size: Size2,
    params: &DecodeParams,
) -> Result<TrackEstimate> {
    let _timer = FunctionTimer::new("estimate_track_rect");
    let (rows, cols) = lattice.dim();

    if window.dim() != (rows, cols) {
        return Err(Error::ShapeMismatch {
            name: "window".to_owned(),
            actual: TensorShape::from([window.dim().0, window.dim().1]),
            expected: TensorShape::from([rows, cols]),
        });
    }
    check_shape("score", &scores, &[rows, cols])?;
    check_shape("pred bbox", &preds, &[4, rows, cols])?;

    let scores = scores.into_shape_with_order((rows, cols))?;
    let preds = preds.into_shape_with_order((4, rows, cols))?;

    let candidates = decode_candidates(lattice, window, previous.size(), scores, preds, params);
    let cell = select_candidate(candidates.view());
    let candidate = candidates[cell];
    let adaptive_lr = candidate.penalized_score * params.lr;

    debug!(
        "cell: {:?}, fused score: {}, confidence: {}, adaptive lr: {}",
        cell, candidate.fused_score, candidate.confidence, adaptive_lr
    );

    let bbox = recover_box(
        instance_size,
        &candidate.corners.to_box(),
        previous,
        scale,
        adaptive_lr,
    );
    trace!(
        "instance size: {:?}, winner: {:?}, previous: {:?}, scale: {:?}, recovered: {:?}",
        instance_size,
        candidate.corners,
        previous,
        scale,
        bbox
    );

    Ok(TrackEstimate {
        bbox,
        candidate,
        cell,
        adaptive_lr,
    })
}

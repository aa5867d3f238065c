// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use divan::black_box_drop;
use ndarray::{Array2, Array3};
use siamtrack_tracker::{
    decode_candidates, estimate_track_rect, select_candidate, AnchorLattice, BoundingBox,
    DecodeParams, ScaleXY, Size2, WindowPrior,
};

const SCORE_SIZES: &[usize] = &[17, 25, 31];

fn outputs(n: usize) -> (Array2<f32>, Array3<f32>) {
    let scores = Array2::from_shape_fn((n, n), |(r, c)| ((r * 7 + c * 3) % 13) as f32 - 6.0);
    let preds = Array3::from_shape_fn((4, n, n), |(k, r, c)| 8.0 + ((k + r + c) % 9) as f32);
    (scores, preds)
}

#[divan::bench(args = SCORE_SIZES)]
fn decoder_estimate_track_rect(bencher: divan::Bencher, n: usize) {
    let lattice = AnchorLattice::new(n, 8, 255);
    let window = WindowPrior::hanning(n);
    let (scores, preds) = outputs(n);
    let previous = BoundingBox::from_center(320.0, 240.0, 60.0, 40.0);
    let params = DecodeParams::default();

    bencher.bench_local(|| {
        black_box_drop(
            estimate_track_rect(
                &lattice,
                &window,
                &previous,
                scores.view().into_dyn(),
                preds.view().into_dyn(),
                ScaleXY::uniform(1.6),
                Size2::square(255.0),
                &params,
            )
            .unwrap(),
        );
    });
}

#[divan::bench(args = SCORE_SIZES)]
fn decoder_decode_candidates(bencher: divan::Bencher, n: usize) {
    let lattice = AnchorLattice::new(n, 8, 255);
    let window = WindowPrior::hanning(n);
    let (scores, preds) = outputs(n);
    let params = DecodeParams::default();

    bencher.bench_local(|| {
        black_box_drop(decode_candidates(
            &lattice,
            &window,
            Size2::new(60.0, 40.0),
            scores.view(),
            preds.view(),
            &params,
        ));
    });
}

#[divan::bench(args = SCORE_SIZES)]
fn decoder_select_candidate(bencher: divan::Bencher, n: usize) {
    let lattice = AnchorLattice::new(n, 8, 255);
    let window = WindowPrior::hanning(n);
    let (scores, preds) = outputs(n);
    let candidates = decode_candidates(
        &lattice,
        &window,
        Size2::new(60.0, 40.0),
        scores.view(),
        preds.view(),
        &DecodeParams::default(),
    );

    bencher.bench_local(|| black_box_drop(select_candidate(candidates.view())));
}

fn main() {
    divan::main();
}

// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use siamtrack_image::{Rect, TensorImage, RGB};
use siamtrack_tensor::Tensor;
use siamtrack_tracker::{
    BoundingBox, EngineOutput, Error, InferenceEngine, Result, SiamTracker, TrackerBuilder,
    TrackerConfig,
};
use std::sync::Arc;

#[ctor::ctor]
fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Engine answering every search crop with a single confident cell whose
/// box has the same half extent on all four sides.
struct PeakEngine {
    score_size: usize,
    peak: (usize, usize),
    half_extent: f32,
    templates: Vec<(usize, usize, BoundingBox)>,
    searches: Vec<(usize, usize)>,
}

impl PeakEngine {
    fn new(score_size: usize, peak: (usize, usize), half_extent: f32) -> Self {
        Self {
            score_size,
            peak,
            half_extent,
            templates: Vec::new(),
            searches: Vec::new(),
        }
    }
}

impl InferenceEngine for PeakEngine {
    fn template(&mut self, crop: &TensorImage, target_box: &BoundingBox) -> Result<()> {
        self.templates.push((crop.width(), crop.height(), *target_box));
        Ok(())
    }

    fn track(&mut self, crop: &TensorImage) -> Result<EngineOutput> {
        self.searches.push((crop.width(), crop.height()));
        let n = self.score_size;
        let mut scores = vec![-10.0f32; n * n];
        scores[self.peak.0 * n + self.peak.1] = 10.0;
        Ok(EngineOutput {
            scores: Tensor::from_vec(&[1, 1, n, n], scores, Some("score"))?,
            preds: Tensor::from_vec(
                &[1, 4, n, n],
                vec![self.half_extent; 4 * n * n],
                Some("pred bbox"),
            )?,
        })
    }
}

struct FailingEngine;

impl InferenceEngine for FailingEngine {
    fn template(&mut self, _crop: &TensorImage, _target_box: &BoundingBox) -> Result<()> {
        Ok(())
    }

    fn track(&mut self, _crop: &TensorImage) -> Result<EngineOutput> {
        Err(Error::Engine("device lost".to_string()))
    }
}

fn frame(width: usize, height: usize) -> TensorImage {
    let mut image = TensorImage::new(width, height, RGB).unwrap();
    for (i, p) in image.as_mut_slice().iter_mut().enumerate() {
        *p = (i % 251) as u8;
    }
    image
}

#[test]
fn test_track_before_init() {
    let mut tracker = TrackerBuilder::new()
        .build(PeakEngine::new(31, (15, 15), 10.0))
        .unwrap();
    assert!(!tracker.is_initialized());
    let result = tracker.track(&frame(64, 48));
    assert!(matches!(result, Err(Error::NotInitialized)));
    assert!(tracker.engine().searches.is_empty());
}

#[test]
fn test_init_template() {
    let mut tracker = TrackerBuilder::new()
        .build(PeakEngine::new(31, (15, 15), 10.0))
        .unwrap();
    tracker
        .init(&frame(320, 240), Rect::new(140, 100, 40, 40))
        .unwrap();
    assert!(tracker.is_initialized());

    let state = tracker.state().unwrap();
    assert_eq!((state.cx, state.cy), (160.0, 120.0));
    assert_eq!((state.width, state.height), (40.0, 40.0));

    // context side is 80, scaled into the 127 exemplar
    let (w, h, target_box) = tracker.engine().templates[0];
    assert_eq!((w, h), (127, 127));
    assert!((target_box.width - 63.5).abs() < 1e-4);
    assert!((target_box.x - 31.25).abs() < 1e-4);

    let result = tracker.init(&frame(320, 240), Rect::new(10, 10, 0, 5));
    assert!(matches!(result, Err(Error::InvalidTarget(_))));
}

#[test]
fn test_track_follows_peak() {
    // target scaled into the search crop is 40 * 127 / 80 = 63.5 wide
    let mut tracker = TrackerBuilder::new()
        .build(PeakEngine::new(31, (15, 17), 31.75))
        .unwrap();
    tracker
        .init(&frame(320, 240), Rect::new(140, 100, 40, 40))
        .unwrap();

    let result = tracker.track(&frame(320, 240)).unwrap();
    assert_eq!(result.cell, (15, 17));
    assert!(result.score > 0.999);
    assert_eq!(tracker.engine().searches, vec![(255, 255)]);
    assert_eq!(tracker.frame_count(), 1);

    // two cells right is 16 crop pixels, 16 / 1.5875 image pixels
    let (cx, cy) = result.bbox.center();
    assert!((cx - (160.0 + 16.0 / 1.5875)).abs() < 1e-3);
    assert!((cy - 120.0).abs() < 1e-3);
    assert!((result.bbox.width - 40.0).abs() < 1e-3);
    assert!((result.bbox.height - 40.0).abs() < 1e-3);

    let pixels = result.pixel_box(320, 240);
    assert_eq!((pixels.width, pixels.height), (40, 40));
    assert_eq!(pixels.y, 100);
}

#[test]
fn test_track_clamps_center() {
    // target near the right edge, the engine pushes it further right
    let mut tracker = TrackerBuilder::new()
        .build(PeakEngine::new(31, (15, 30), 31.75))
        .unwrap();
    tracker.init(&frame(64, 48), Rect::new(50, 20, 12, 12)).unwrap();

    let result = tracker.track(&frame(64, 48)).unwrap();
    assert_eq!(result.cell, (15, 30));
    let state = tracker.state().unwrap();
    assert_eq!(state.cx, 64.0);
    assert!((state.cy - 26.0).abs() < 1e-3);
    assert!(state.width >= 10.0 && state.width <= 64.0);
}

#[test]
fn test_track_clamps_min_size() {
    let config = TrackerConfig {
        penalty_k: 0.0,
        lr: 1.0,
        ..Default::default()
    };
    let mut tracker = TrackerBuilder::new()
        .with_config(config)
        .build(PeakEngine::new(31, (15, 15), 0.5))
        .unwrap();
    tracker
        .init(&frame(320, 240), Rect::new(140, 100, 40, 40))
        .unwrap();

    let result = tracker.track(&frame(320, 240)).unwrap();
    assert_eq!(result.bbox.width, 10.0);
    assert_eq!(result.bbox.height, 10.0);
    assert!(result.adaptive_lr > 0.99);
}

#[test]
fn test_shape_mismatch_keeps_state() {
    // engine built for a 25x25 map, tracker configured for 31x31
    let mut tracker = TrackerBuilder::new()
        .build(PeakEngine::new(25, (12, 12), 10.0))
        .unwrap();
    tracker
        .init(&frame(320, 240), Rect::new(140, 100, 40, 40))
        .unwrap();
    let before = *tracker.state().unwrap();

    let result = tracker.track(&frame(320, 240));
    assert!(matches!(
        result,
        Err(Error::ShapeMismatch { ref name, .. }) if name == "score"
    ));
    assert_eq!(*tracker.state().unwrap(), before);
    assert_eq!(tracker.frame_count(), 0);
}

#[test]
fn test_engine_error() {
    let mut tracker = SiamTracker::new(TrackerConfig::default(), FailingEngine).unwrap();
    tracker
        .init(&frame(320, 240), Rect::new(140, 100, 40, 40))
        .unwrap();
    let result = tracker.track(&frame(320, 240));
    assert!(matches!(result, Err(Error::Engine(e)) if e == "device lost"));
}

#[test]
fn test_shared_lattice() {
    let first = SiamTracker::new(TrackerConfig::default(), FailingEngine).unwrap();
    let second = SiamTracker::with_shared(
        TrackerConfig::default(),
        FailingEngine,
        first.lattice().clone(),
        first.window().clone(),
    )
    .unwrap();
    assert!(Arc::ptr_eq(first.lattice(), second.lattice()));

    let config = TrackerConfig {
        score_size: 25,
        ..Default::default()
    };
    let result = SiamTracker::with_shared(
        config,
        FailingEngine,
        first.lattice().clone(),
        first.window().clone(),
    );
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

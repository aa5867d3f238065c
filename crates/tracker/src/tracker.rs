// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::{
    estimate_track_rect,
    geometry::{box_in_crop, clamp_to_image, padded_side_length},
    AnchorLattice, BoundingBox, Error, FunctionTimer, PixelBox, Result, ScaleXY, Size2,
    TrackerConfig, WindowPrior,
};
use log::{debug, warn};
use siamtrack_image::{CPUProcessor, CropRect, Rect, TensorImage};
use siamtrack_tensor::Tensor;
use std::sync::Arc;

/// Raw network output for one search crop.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// Classification logits, shape `(R, C)` plus optional leading unit
    /// dimensions.
    pub scores: Tensor<f32>,
    /// Left, top, right and bottom distances from each anchor, shape
    /// `(4, R, C)` plus optional leading unit dimensions.
    pub preds: Tensor<f32>,
}

/// The network behind the tracker.
///
/// `template` is called once per [`SiamTracker::init`] with the exemplar crop
/// and the target box inside it; `track` once per frame with the search crop.
pub trait InferenceEngine {
    fn template(&mut self, crop: &TensorImage, target_box: &BoundingBox) -> Result<()>;

    fn track(&mut self, crop: &TensorImage) -> Result<EngineOutput>;
}

/// Target center and size in image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackState {
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    pub height: f32,
}

impl TrackState {
    pub fn to_box(&self) -> BoundingBox {
        BoundingBox::from_center(self.cx, self.cy, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackResult {
    /// Tracked box in image pixels, after clamping.
    pub bbox: BoundingBox,
    /// Confidence of the winning anchor.
    pub score: f32,
    /// `(row, col)` of the winning anchor.
    pub cell: (usize, usize),
    pub adaptive_lr: f32,
}

impl TrackResult {
    /// The tracked box rounded to pixels of an `image_width` x
    /// `image_height` frame.
    pub fn pixel_box(&self, image_width: usize, image_height: usize) -> PixelBox {
        clamp_to_image(&self.bbox, image_width, image_height)
    }
}

/// Single object tracker driving an [`InferenceEngine`].
///
/// # Examples
/// ```rust,no_run
/// # use siamtrack_tracker::{InferenceEngine, TrackerBuilder, Result};
/// # use siamtrack_image::{Rect, TensorImage};
/// # fn run<E: InferenceEngine>(engine: E, frames: &[TensorImage]) -> Result<()> {
/// let mut tracker = TrackerBuilder::new().build(engine)?;
/// tracker.init(&frames[0], Rect::new(100, 80, 40, 60))?;
/// for frame in &frames[1..] {
///     let result = tracker.track(frame)?;
///     println!("{:?} {}", result.pixel_box(frame.width(), frame.height()), result.score);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SiamTracker<E: InferenceEngine> {
    config: TrackerConfig,
    engine: E,
    lattice: Arc<AnchorLattice>,
    window: Arc<WindowPrior>,
    processor: CPUProcessor,
    state: Option<TrackState>,
    image_size: (usize, usize),
    frame_count: u64,
}

impl<E: InferenceEngine> SiamTracker<E> {
    /// Creates a tracker with its own anchor lattice and Hanning window.
    pub fn new(config: TrackerConfig, engine: E) -> Result<Self> {
        config.validate()?;
        let lattice = AnchorLattice::new(
            config.score_size,
            config.total_stride,
            config.instance_size,
        );
        let window = WindowPrior::hanning(config.score_size);
        Self::with_shared(config, engine, Arc::new(lattice), Arc::new(window))
    }

    /// Creates a tracker reusing a lattice and window prior, for instance
    /// shared with other trackers of the same configuration.
    pub fn with_shared(
        config: TrackerConfig,
        engine: E,
        lattice: Arc<AnchorLattice>,
        window: Arc<WindowPrior>,
    ) -> Result<Self> {
        config.validate()?;
        let expected = (config.score_size, config.score_size);
        if lattice.dim() != expected || window.dim() != expected {
            return Err(Error::InvalidConfig(format!(
                "lattice {:?} and window {:?} do not match score_size {}",
                lattice.dim(),
                window.dim(),
                config.score_size
            )));
        }
        Ok(Self {
            config,
            engine,
            lattice,
            window,
            processor: CPUProcessor::new()?,
            state: None,
            image_size: (0, 0),
            frame_count: 0,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn state(&self) -> Option<&TrackState> {
        self.state.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Frames tracked since the last `init`.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn lattice(&self) -> &Arc<AnchorLattice> {
        &self.lattice
    }

    pub fn window(&self) -> &Arc<WindowPrior> {
        &self.window
    }

    /// Starts tracking `target` in `image`.
    ///
    /// Cuts the exemplar crop around the target with its context, hands it
    /// to the engine together with the target box in crop coordinates, and
    /// resets the tracking state. May be called again to re-target.
    pub fn init(&mut self, image: &TensorImage, target: Rect) -> Result<()> {
        let _timer = FunctionTimer::new("SiamTracker::init");
        if target.width == 0 || target.height == 0 {
            return Err(Error::InvalidTarget(format!(
                "target {:?} has an empty size",
                target
            )));
        }

        let width = target.width as f32;
        let height = target.height as f32;
        let cx = target.left as f32 + width / 2.0;
        let cy = target.top as f32 + height / 2.0;

        let s_z = padded_side_length(width, height, self.config.context_amount).round();
        let exemplar = self.config.exemplar_size;
        let mut crop = TensorImage::new(exemplar, exemplar, image.fourcc())?;
        self.processor
            .extract_subwindow(image, CropRect::square(cx, cy, s_z), true, &mut crop)?;

        let target_box = box_in_crop(s_z, exemplar as f32, Size2::new(width, height));
        debug!(
            "init target: {:?}, template side: {}, box in template: {:?}",
            target, s_z, target_box
        );
        self.engine.template(&crop, &target_box)?;

        self.state = Some(TrackState {
            cx,
            cy,
            width,
            height,
        });
        self.image_size = (image.width(), image.height());
        self.frame_count = 0;
        Ok(())
    }

    /// Locates the target in `image`.
    ///
    /// Fails with [`Error::NotInitialized`] before `init`. Engine and decode
    /// errors leave the previous state untouched.
    pub fn track(&mut self, image: &TensorImage) -> Result<TrackResult> {
        let _timer = FunctionTimer::new("SiamTracker::track");
        let state = self.state.ok_or(Error::NotInitialized)?;
        if (image.width(), image.height()) != self.image_size {
            warn!(
                "frame size {}x{} differs from the initial frame {}x{}",
                image.width(),
                image.height(),
                self.image_size.0,
                self.image_size.1
            );
        }

        let config = &self.config;
        let exemplar = config.exemplar_size as f32;
        let instance = config.instance_size as f32;
        let s_z = padded_side_length(state.width, state.height, config.context_amount);
        let scale_z = exemplar / s_z;
        let pad = (instance - exemplar) / 2.0 / scale_z;
        let s_x = (s_z + 2.0 * pad).round();

        let mut crop = TensorImage::new(config.instance_size, config.instance_size, image.fourcc())?;
        self.processor.extract_subwindow(
            image,
            CropRect::square(state.cx, state.cy, s_x),
            true,
            &mut crop,
        )?;

        let output = self.engine.track(&crop)?;
        let previous = BoundingBox::from_center(
            state.cx,
            state.cy,
            state.width * scale_z,
            state.height * scale_z,
        );
        let estimate = estimate_track_rect(
            &self.lattice,
            &self.window,
            &previous,
            output.scores.view()?,
            output.preds.view()?,
            ScaleXY::uniform(scale_z),
            Size2::square(instance),
            &config.decode_params(),
        )?;

        let (image_width, image_height) = (self.image_size.0 as f32, self.image_size.1 as f32);
        let min_size = config.min_target_size;
        let (cx, cy) = estimate.bbox.center();
        let next = TrackState {
            cx: cx.min(image_width).max(0.0),
            cy: cy.min(image_height).max(0.0),
            width: estimate.bbox.width.min(image_width).max(min_size),
            height: estimate.bbox.height.min(image_height).max(min_size),
        };
        if next.cx != cx
            || next.cy != cy
            || next.width != estimate.bbox.width
            || next.height != estimate.bbox.height
        {
            debug!("clamped {:?} to {:?}", estimate.bbox, next);
        }

        self.state = Some(next);
        self.frame_count += 1;
        debug!(
            "frame {}: search side {}, state {:?}",
            self.frame_count, s_x, next
        );

        Ok(TrackResult {
            bbox: next.to_box(),
            score: estimate.candidate.confidence,
            cell: estimate.cell,
            adaptive_lr: estimate.adaptive_lr,
        })
    }
}

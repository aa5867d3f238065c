// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

/*!

## siamtrack - Tracker

The `siamtrack_tracker` crate turns the raw output of a Siamese tracking
network into the next position of the tracked object.

Each frame the network sees a search crop centered on the previous target
position and produces, for every cell of a fixed anchor lattice, a
classification logit and four distances to the box edges. The decoder
penalizes boxes whose size or aspect ratio changed a lot, blends the result
with a Hanning window prior, picks the best cell and maps its box back to
image coordinates with an exponentially smoothed size.

[`SiamTracker`] wires the whole per-frame loop around any
[`InferenceEngine`]; [`estimate_track_rect`] and the geometry helpers can
also be used on their own.

## Examples

```rust
# use siamtrack_tracker::{AnchorLattice, WindowPrior, TrackerBuilder, Result};
# fn main() -> Result<()> {
let config = TrackerBuilder::new()
    .with_config_yaml_str("window_influence: 0.3\n".to_string())
    .build_config()?;
let lattice = AnchorLattice::new(config.score_size, config.total_stride, config.instance_size);
let window = WindowPrior::hanning(config.score_size);
assert_eq!(lattice.dim(), (31, 31));
// the center anchor sits on the center of the search crop
assert_eq!(lattice.x()[[15, 15]], 127.0);
assert_eq!(window.view()[[15, 15]], 1.0);
# Ok(())
# }
```
*/

pub use anchors::{grid, AnchorLattice, WindowPrior};
pub use config::{TrackerBuilder, TrackerConfig};
pub use decode::{
    decode_candidates, estimate_track_rect, select_candidate, sigmoid, Candidate, DecodeParams,
    TrackEstimate,
};
pub use error::{Error, Result};
pub use geometry::{
    box_in_crop, clamp_to_image, padded_side_length, recover_box, BoundingBox, Corners,
    PixelBox, ScaleXY, Size2,
};
pub use tracker::{EngineOutput, InferenceEngine, SiamTracker, TrackResult, TrackState};

pub(crate) use siamtrack_image::FunctionTimer;

mod anchors;
mod config;
mod decode;
mod error;
pub mod geometry;
mod tracker;

#[cfg(test)]
#[ctor::ctor]
fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

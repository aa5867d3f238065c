// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

/*!

## siamtrack

Per-frame decision core of a single object Siamese tracker.

- [`tensor`]: host tensors with shape contracts for network inputs and
  outputs.
- [`image`]: interleaved 8-bit images, CPU resizing and the subwindow
  extractor producing fixed-size network inputs.
- [`tracker`]: anchor lattice, window prior, box decoder and the
  [`tracker::SiamTracker`] driver.
*/

pub use siamtrack_image as image;
pub use siamtrack_tensor as tensor;
pub use siamtrack_tracker as tracker;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

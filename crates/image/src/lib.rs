// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

/*!

## siamtrack - Image

The `siamtrack_image` crate holds the image side of the tracker: an
interleaved 8-bit image stored in a tensor, a CPU resize processor built on
`fast_image_resize`, and the subwindow extractor which turns an arbitrary
(possibly out of bounds) crop rectangle of a source frame into a fixed-size
network input.

Pixels that fall outside the source frame are synthesized with the global
per-channel mean of the source image, so extraction never fails because of
the crop position.

## Examples

```rust
# use siamtrack_image::{get_subwindow, CropRect, TensorImage, RGB};
# fn main() -> Result<(), siamtrack_image::Error> {
let frame = TensorImage::new(640, 480, RGB)?;
// 300x300 region centered on the top left corner, mostly outside the frame
let crop = CropRect::new(0.0, 0.0, 300.0, 300.0);
let search = get_subwindow(&frame, crop, true, 255, 255)?;
assert_eq!(search.width(), 255);
assert_eq!(search.height(), 255);
# Ok(())
# }
```
*/

use four_char_code::{four_char_code, FourCharCode};
use ndarray::{ArrayView3, ArrayViewMut3};
use siamtrack_tensor::Tensor;
use std::fmt::Display;

pub use cpu::CPUProcessor;
pub use error::{Error, Result};
pub use subwindow::{get_subwindow, CropRect, SubwindowBounds};

mod cpu;
mod error;
mod subwindow;

/// 8 bit RGB
pub const RGB: FourCharCode = four_char_code!("RGB ");
/// 8 bit BGR, the channel order of most camera pipelines feeding the tracker
pub const BGR: FourCharCode = four_char_code!("BGR ");
/// 8 bit RGBA
pub const RGBA: FourCharCode = four_char_code!("RGBA");
/// 8 bit grayscale, full range
pub const GREY: FourCharCode = four_char_code!("Y800");

/// An interleaved image represented as a `[height, width, channels]` tensor
/// with associated format information.
#[derive(Debug, Clone)]
pub struct TensorImage {
    tensor: Tensor<u8>,
    fourcc: FourCharCode,
}

impl TensorImage {
    /// Creates a new zero filled `TensorImage` with the specified width,
    /// height and format.
    ///
    /// # Examples
    /// ```rust
    /// use siamtrack_image::{RGB, TensorImage};
    /// # fn main() -> Result<(), siamtrack_image::Error> {
    /// let img = TensorImage::new(640, 480, RGB)?;
    /// assert_eq!(img.width(), 640);
    /// assert_eq!(img.height(), 480);
    /// assert_eq!(img.channels(), 3);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(width: usize, height: usize, fourcc: FourCharCode) -> Result<Self> {
        let channels = fourcc_channels(fourcc)?;
        let tensor = Tensor::new(&[height, width, channels], Some("image"))?;
        Ok(Self { tensor, fourcc })
    }

    /// Creates a new `TensorImage` from an existing tensor and specified
    /// format.
    pub fn from_tensor(tensor: Tensor<u8>, fourcc: FourCharCode) -> Result<Self> {
        let shape = tensor.shape();
        if shape.len() != 3 {
            return Err(Error::InvalidShape(format!(
                "Tensor shape must have 3 dimensions, got {}: {:?}",
                shape.len(),
                shape
            )));
        }

        if fourcc_channels(fourcc)? != shape[2] {
            return Err(Error::InvalidShape(format!(
                "Invalid tensor shape {:?} for format {}",
                shape,
                fourcc.display()
            )));
        }

        Ok(Self { tensor, fourcc })
    }

    /// Wraps a packed, row-major pixel buffer.
    pub fn from_vec(
        width: usize,
        height: usize,
        fourcc: FourCharCode,
        data: Vec<u8>,
    ) -> Result<Self> {
        let channels = fourcc_channels(fourcc)?;
        let tensor = Tensor::from_vec(&[height, width, channels], data, Some("image"))?;
        Ok(Self { tensor, fourcc })
    }

    pub fn tensor(&self) -> &Tensor<u8> {
        &self.tensor
    }

    pub fn into_tensor(self) -> Tensor<u8> {
        self.tensor
    }

    pub fn fourcc(&self) -> FourCharCode {
        self.fourcc
    }

    pub fn width(&self) -> usize {
        self.tensor.shape()[1]
    }

    pub fn height(&self) -> usize {
        self.tensor.shape()[0]
    }

    pub fn channels(&self) -> usize {
        self.tensor.shape()[2]
    }

    pub fn row_stride(&self) -> usize {
        self.width() * self.channels()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.tensor.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.tensor.as_mut_slice()
    }

    /// Returns the channel values of the pixel at column `x`, row `y`.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let channels = self.channels();
        let start = y * self.row_stride() + x * channels;
        &self.as_slice()[start..start + channels]
    }

    pub fn view(&self) -> Result<ArrayView3<'_, u8>> {
        let shape = (self.height(), self.width(), self.channels());
        Ok(ArrayView3::from_shape(shape, self.tensor.as_slice())?)
    }

    pub fn view_mut(&mut self) -> Result<ArrayViewMut3<'_, u8>> {
        let shape = (self.height(), self.width(), self.channels());
        Ok(ArrayViewMut3::from_shape(
            shape,
            self.tensor.as_mut_slice(),
        )?)
    }

    /// Per-channel arithmetic mean over every pixel of the image.
    pub fn mean(&self) -> Vec<f64> {
        let channels = self.channels();
        let mut sums = vec![0u64; channels];
        for px in self.as_slice().chunks_exact(channels) {
            for (sum, &v) in sums.iter_mut().zip(px) {
                *sum += v as u64;
            }
        }
        let count = (self.width() * self.height()) as f64;
        sums.into_iter().map(|s| s as f64 / count).collect()
    }

    /// Sets every pixel to `color`, which must provide one value per channel.
    pub fn fill(&mut self, color: &[u8]) -> Result<()> {
        let channels = self.channels();
        if color.len() != channels {
            return Err(Error::InvalidShape(format!(
                "Fill color has {} channels, image has {}",
                color.len(),
                channels
            )));
        }
        for px in self.as_mut_slice().chunks_exact_mut(channels) {
            px.copy_from_slice(color);
        }
        Ok(())
    }
}

/// An integer rectangle fully inside an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    // Creates a new Rect with the specified left, top, width, and height.
    pub fn new(left: usize, top: usize, width: usize, height: usize) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    // Checks if the rectangle is valid for the given image.
    pub fn check_rect(&self, image: &TensorImage) -> bool {
        self.left + self.width <= image.width() && self.top + self.height <= image.height()
    }
}

fn fourcc_channels(fourcc: FourCharCode) -> Result<usize> {
    match fourcc {
        RGBA => Ok(4),
        RGB | BGR => Ok(3),
        GREY => Ok(1),
        _ => Err(Error::NotSupported(format!(
            "Unsupported fourcc: {}",
            fourcc.display()
        ))),
    }
}

/// Logs the time between its creation and drop at `trace` level.
pub struct FunctionTimer<T: Display> {
    name: T,
    start: std::time::Instant,
}

impl<T: Display> FunctionTimer<T> {
    pub fn new(name: T) -> Self {
        Self {
            name,
            start: std::time::Instant::now(),
        }
    }
}

impl<T: Display> Drop for FunctionTimer<T> {
    fn drop(&mut self) {
        log::trace!("{} elapsed: {:?}", self.name, self.start.elapsed())
    }
}

// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::{CPUProcessor, Rect, Result, TensorImage};

/// A floating point crop rectangle in source image pixels.
///
/// Depending on how it is passed to the extractor, `x`/`y` are either the
/// crop center or its top left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A square crop of side `side` centered on (`cx`, `cy`).
    pub fn square(cx: f32, cy: f32, side: f32) -> Self {
        Self::new(cx, cy, side, side)
    }
}

/// Integer bounds of a requested subwindow together with how far it
/// overflows each edge of the source image.
///
/// `xmax`/`ymax` are exclusive. Every pad is `>= 0`. Coordinates saturate
/// at the `i64` range, so any finite or infinite crop yields valid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubwindowBounds {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
    pub left_pad: i64,
    pub top_pad: i64,
    pub right_pad: i64,
    pub bottom_pad: i64,
}

impl SubwindowBounds {
    /// Rounds `crop` to integer bounds and measures the overflow against an
    /// image of `image_width` x `image_height`.
    ///
    /// A centered crop starts at `cx - (w + 1) / 2`, a top left crop at its
    /// origin; the far edge is the start plus the size. Every coordinate is
    /// rounded half up, also for negative values.
    pub fn new(crop: CropRect, centered: bool, image_width: usize, image_height: usize) -> Self {
        let (x, y) = (crop.x as f64, crop.y as f64);
        let (width, height) = (crop.width as f64, crop.height as f64);
        let (xmin, ymin) = if centered {
            (
                round_half_up(x - (width + 1.0) / 2.0),
                round_half_up(y - (height + 1.0) / 2.0),
            )
        } else {
            (round_half_up(x), round_half_up(y))
        };
        let xmax = round_half_up(xmin as f64 + width);
        let ymax = round_half_up(ymin as f64 + height);

        let image_width = image_width as i64;
        let image_height = image_height as i64;
        SubwindowBounds {
            xmin,
            ymin,
            xmax,
            ymax,
            left_pad: xmin.saturating_neg().max(0),
            top_pad: ymin.saturating_neg().max(0),
            right_pad: xmax.saturating_sub(image_width).max(0),
            bottom_pad: ymax.saturating_sub(image_height).max(0),
        }
    }

    /// Width of the buffer covering the requested rectangle, at least one
    /// pixel.
    pub fn width(&self) -> usize {
        span(self.xmin, self.xmax)
    }

    /// Height of the buffer covering the requested rectangle, at least one
    /// pixel.
    pub fn height(&self) -> usize {
        span(self.ymin, self.ymax)
    }

    pub fn is_padded(&self) -> bool {
        self.left_pad > 0 || self.top_pad > 0 || self.right_pad > 0 || self.bottom_pad > 0
    }

    /// The requested rectangle when it lies entirely inside the image and
    /// is not empty.
    pub fn inside_rect(&self) -> Option<Rect> {
        if self.is_padded() || self.xmax <= self.xmin || self.ymax <= self.ymin {
            return None;
        }
        Some(Rect::new(
            self.xmin as usize,
            self.ymin as usize,
            (self.xmax - self.xmin) as usize,
            (self.ymax - self.ymin) as usize,
        ))
    }

    /// The in-bounds part of the requested rectangle in source coordinates,
    /// and the offset at which it lands inside the padded buffer. `None` when
    /// the rectangle does not overlap the image at all.
    pub fn valid_region(&self) -> Option<(Rect, usize, usize)> {
        let left = self.xmin.saturating_add(self.left_pad);
        let top = self.ymin.saturating_add(self.top_pad);
        let right = self.xmax.saturating_sub(self.right_pad);
        let bottom = self.ymax.saturating_sub(self.bottom_pad);
        // i64::MIN origins saturate their pad one short of reaching zero
        if left < 0 || top < 0 || right <= left || bottom <= top {
            return None;
        }
        Some((
            Rect::new(
                left as usize,
                top as usize,
                (right - left) as usize,
                (bottom - top) as usize,
            ),
            self.left_pad as usize,
            self.top_pad as usize,
        ))
    }
}

#[inline(always)]
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

fn span(min: i64, max: i64) -> usize {
    usize::try_from(max.saturating_sub(min).max(1)).unwrap_or(usize::MAX)
}

/// Extracts `crop` from `src` into a new `width` x `height` image with the
/// same format as `src`.
///
/// When `centered` is set `crop.x`/`crop.y` are the crop center, otherwise
/// its top left corner. See [`CPUProcessor::extract_subwindow`].
pub fn get_subwindow(
    src: &TensorImage,
    crop: CropRect,
    centered: bool,
    width: usize,
    height: usize,
) -> Result<TensorImage> {
    let mut processor = CPUProcessor::new()?;
    let mut dst = TensorImage::new(width, height, src.fourcc())?;
    processor.extract_subwindow(src, crop, centered, &mut dst)?;
    Ok(dst)
}

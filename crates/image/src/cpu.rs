// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::{
    subwindow::{CropRect, SubwindowBounds},
    Error, FunctionTimer, Rect, Result, TensorImage,
};
use fast_image_resize::images::{Image, ImageRef};
use log::trace;
use ndarray::s;

/// CPUProcessor resizes and crops interleaved 8-bit images on the CPU.
pub struct CPUProcessor {
    resizer: fast_image_resize::Resizer,
    options: fast_image_resize::ResizeOptions,
}

impl CPUProcessor {
    /// Creates a processor using bilinear interpolation.
    pub fn new() -> Result<Self> {
        let resizer = fast_image_resize::Resizer::new();
        let options = fast_image_resize::ResizeOptions::new()
            .resize_alg(fast_image_resize::ResizeAlg::Convolution(
                fast_image_resize::FilterType::Bilinear,
            ))
            .use_alpha(false);
        Ok(Self { resizer, options })
    }

    pub fn new_nearest() -> Result<Self> {
        let resizer = fast_image_resize::Resizer::new();
        let options = fast_image_resize::ResizeOptions::new()
            .resize_alg(fast_image_resize::ResizeAlg::Nearest)
            .use_alpha(false);
        Ok(Self { resizer, options })
    }

    /// Resizes `src_rect` of `src` (the whole image when `None`) into `dst`.
    /// When the region already has the destination size the pixels are
    /// copied unchanged.
    pub fn resize(
        &mut self,
        src: &TensorImage,
        src_rect: Option<Rect>,
        dst: &mut TensorImage,
    ) -> Result<()> {
        if src.channels() != dst.channels() {
            return Err(Error::NotSupported(format!(
                "Channel conversion from {} to {} is not supported",
                src.fourcc().display(),
                dst.fourcc().display()
            )));
        }

        let rect = src_rect.unwrap_or(Rect::new(0, 0, src.width(), src.height()));
        if !rect.check_rect(src) || rect.width == 0 || rect.height == 0 {
            return Err(Error::InvalidShape(format!(
                "Src crop invalid: {:?} for {}x{} image",
                rect,
                src.width(),
                src.height()
            )));
        }

        if rect.width == dst.width() && rect.height == dst.height() {
            let src_view = src.view()?;
            let mut dst_view = dst.view_mut()?;
            dst_view.assign(&src_view.slice(s![
                rect.top..rect.top + rect.height,
                rect.left..rect.left + rect.width,
                ..
            ]));
            return Ok(());
        }

        let pixel_type = match src.channels() {
            1 => fast_image_resize::PixelType::U8,
            3 => fast_image_resize::PixelType::U8x3,
            4 => fast_image_resize::PixelType::U8x4,
            _ => {
                return Err(Error::NotSupported(
                    "Unsupported source image format".to_string(),
                ));
            }
        };

        let options = self.options.crop(
            rect.left as f64,
            rect.top as f64,
            rect.width as f64,
            rect.height as f64,
        );

        let src_view = ImageRef::new(
            src.width() as u32,
            src.height() as u32,
            src.as_slice(),
            pixel_type,
        )?;
        let (width, height) = (dst.width() as u32, dst.height() as u32);
        let mut dst_view = Image::from_slice_u8(width, height, dst.as_mut_slice(), pixel_type)?;
        self.resizer.resize(&src_view, &mut dst_view, &options)?;
        Ok(())
    }

    /// Builds a fixed-size model input from an arbitrary crop of `src`.
    ///
    /// The output size is the size of `dst`. A crop fully inside `src` is
    /// resized directly. Otherwise a buffer covering the whole requested
    /// rectangle is filled with the per-channel mean of `src`, the in-bounds
    /// part is copied to its offset and the buffer is resized into `dst`. A
    /// crop entirely outside `src` yields an image filled with the mean.
    pub fn extract_subwindow(
        &mut self,
        src: &TensorImage,
        crop: CropRect,
        centered: bool,
        dst: &mut TensorImage,
    ) -> Result<()> {
        let _timer = FunctionTimer::new("CPUProcessor::extract_subwindow");
        let bounds = SubwindowBounds::new(crop, centered, src.width(), src.height());
        trace!("subwindow {:?} -> {:?}", crop, bounds);

        if let Some(rect) = bounds.inside_rect() {
            return self.resize(src, Some(rect), dst);
        }

        let color: Vec<u8> = src
            .mean()
            .into_iter()
            .map(|m| m.round().clamp(0.0, 255.0) as u8)
            .collect();
        let Some((rect, left, top)) = bounds.valid_region() else {
            // nothing of the source is visible, the resized buffer is flat
            return dst.fill(&color);
        };

        let mut padded = TensorImage::new(bounds.width(), bounds.height(), src.fourcc())?;
        padded.fill(&color)?;
        let src_view = src.view()?;
        padded
            .view_mut()?
            .slice_mut(s![top..top + rect.height, left..left + rect.width, ..])
            .assign(&src_view.slice(s![
                rect.top..rect.top + rect.height,
                rect.left..rect.left + rect.width,
                ..
            ]));

        self.resize(&padded, None, dst)
    }
}

// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Conversions between source image space and crop (instance) space.

use num_traits::Float;
use serde::{Deserialize, Serialize};

/// An axis aligned box in top-left plus size form.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn size(&self) -> Size2 {
        Size2::new(self.width, self.height)
    }

    pub fn to_corners(&self) -> Corners {
        Corners {
            left: self.x,
            top: self.y,
            right: self.x + self.width,
            bottom: self.y + self.height,
        }
    }
}

/// Corner form (left, top, right, bottom), used while decoding anchors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Corners {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Corners {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn to_box(&self) -> BoundingBox {
        BoundingBox::new(self.left, self.top, self.width(), self.height())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size2 {
    pub width: f32,
    pub height: f32,
}

impl Size2 {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn square(side: f32) -> Self {
        Self::new(side, side)
    }
}

/// Crop pixels per image pixel along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleXY {
    pub x: f32,
    pub y: f32,
}

impl ScaleXY {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn uniform(scale: f32) -> Self {
        Self::new(scale, scale)
    }
}

impl Default for ScaleXY {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// Integer box handed to consumers that address pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Side of the square crop covering a `width` x `height` target plus its
/// context: `sqrt((w + p)(h + p))` with `p = context_amount * (w + h)`.
///
/// Width and height must be positive and `context_amount` non-negative; the
/// result is not meaningful otherwise.
pub fn padded_side_length<T: Float>(width: T, height: T, context_amount: T) -> T {
    let pad = context_amount * (width + height);
    ((width + pad) * (height + pad)).sqrt()
}

/// The target box as it appears in a `model_side` crop that was cut from an
/// `observed_side` region of the image centered on the target.
pub fn box_in_crop(observed_side: f32, model_side: f32, target: Size2) -> BoundingBox {
    let scale = model_side / observed_side;
    let width = target.width * scale;
    let height = target.height * scale;
    let center = (model_side - 1.0) / 2.0;
    BoundingBox::new(center - width / 2.0, center - height / 2.0, width, height)
}

/// Rounds a box to pixels and limits it to an image of `image_width` x
/// `image_height`.
///
/// The origin is clamped to be non-negative and each size component is capped
/// to the image dimension independently. Origin plus size may still exceed
/// the image.
pub fn clamp_to_image(bbox: &BoundingBox, image_width: usize, image_height: usize) -> PixelBox {
    PixelBox {
        x: ((bbox.x + 0.5) as i32).max(0),
        y: ((bbox.y + 0.5) as i32).max(0),
        width: ((bbox.width + 0.5) as i32).min(image_width as i32),
        height: ((bbox.height + 0.5) as i32).min(image_height as i32),
    }
}

/// Maps a box predicted in crop space back to image space.
///
/// The displacement of the predicted center from the crop center, divided
/// by `scale`, moves the previous center. The size is an exponential moving
/// average between the previous and predicted sizes, both in crop space,
/// converted to image space. `previous` carries its center in image
/// coordinates and its size in crop coordinates.
pub fn recover_box(
    crop: Size2,
    predicted: &BoundingBox,
    previous: &BoundingBox,
    scale: ScaleXY,
    update_rate: f32,
) -> BoundingBox {
    let (pred_cx, pred_cy) = predicted.center();
    let dx = (pred_cx - (crop.width / 2.0).trunc()) / scale.x;
    let dy = (pred_cy - (crop.height / 2.0).trunc()) / scale.y;

    let (prev_cx, prev_cy) = previous.center();
    let width =
        (previous.width * (1.0 - update_rate) + predicted.width * update_rate) / scale.x;
    let height =
        (previous.height * (1.0 - update_rate) + predicted.height * update_rate) / scale.y;

    BoundingBox::from_center(prev_cx + dx, prev_cy + dy, width, height)
}

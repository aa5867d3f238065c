// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    ResizeImageBuffer(fast_image_resize::ImageBufferError),
    Resize(fast_image_resize::ResizeError),
    Tensor(siamtrack_tensor::Error),
    NotSupported(String),
    InvalidShape(String),
    Internal(String),
}

impl From<fast_image_resize::ImageBufferError> for Error {
    fn from(err: fast_image_resize::ImageBufferError) -> Self {
        Error::ResizeImageBuffer(err)
    }
}

impl From<fast_image_resize::ResizeError> for Error {
    fn from(err: fast_image_resize::ResizeError) -> Self {
        Error::Resize(err)
    }
}

impl From<siamtrack_tensor::Error> for Error {
    fn from(err: siamtrack_tensor::Error) -> Self {
        Error::Tensor(err)
    }
}

impl From<ndarray::ShapeError> for Error {
    fn from(err: ndarray::ShapeError) -> Self {
        Error::Internal(format!("{err}"))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ResizeImageBuffer(e) => write!(f, "{}", e),
            Error::Resize(e) => write!(f, "{}", e),
            Error::Tensor(e) => write!(f, "Tensor error: {}", e),
            Error::NotSupported(msg) => write!(f, "Not supported: {}", msg),
            Error::InvalidShape(msg) => write!(f, "Invalid shape: {}", msg),
            Error::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

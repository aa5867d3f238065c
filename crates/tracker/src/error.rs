// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use siamtrack_tensor::TensorShape;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    Tensor(siamtrack_tensor::Error),
    Image(siamtrack_image::Error),
    Shape(ndarray::ShapeError),
    /// A tensor disagrees with the anchor lattice the tracker was configured
    /// with. Never retried: it means the network and the configuration have
    /// drifted apart.
    ShapeMismatch {
        name: String,
        actual: TensorShape,
        expected: TensorShape,
    },
    NotContiguous(String),
    InvalidConfig(String),
    InvalidTarget(String),
    NotInitialized,
    Engine(String),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl From<siamtrack_tensor::Error> for Error {
    fn from(err: siamtrack_tensor::Error) -> Self {
        Error::Tensor(err)
    }
}

impl From<siamtrack_image::Error> for Error {
    fn from(err: siamtrack_image::Error) -> Self {
        Error::Image(err)
    }
}

impl From<ndarray::ShapeError> for Error {
    fn from(err: ndarray::ShapeError) -> Self {
        Error::Shape(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Tensor(e) => write!(f, "Tensor error: {}", e),
            Error::Image(e) => write!(f, "Image error: {}", e),
            Error::Shape(e) => write!(f, "{}", e),
            Error::ShapeMismatch {
                name,
                actual,
                expected,
            } => write!(
                f,
                "Invalid {name} shape, input {name} shape: {actual}, expected {name} shape: {expected}"
            ),
            Error::NotContiguous(name) => write!(f, "{} is not stored contiguously", name),
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::InvalidTarget(msg) => write!(f, "Invalid target: {}", msg),
            Error::NotInitialized => write!(f, "Tracker has not been initialized"),
            Error::Engine(msg) => write!(f, "Inference engine error: {}", msg),
            Error::Json(e) => write!(f, "{}", e),
            Error::Yaml(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Tensor(e) => Some(e),
            Error::Image(e) => Some(e),
            Error::Shape(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Yaml(e) => Some(e),
            _ => None,
        }
    }
}

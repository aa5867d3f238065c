// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// The logical dimensions of a tensor, outermost first.
///
/// Network runtimes usually report outputs with leading batch dimensions
/// (`[1x1x31x31]` for a single score map). Comparisons between a runtime
/// shape and the shape a consumer expects go through [`TensorShape::squeezed`]
/// so that those unit batch dimensions do not cause false mismatches, while
/// any difference in the remaining dimensions still does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TensorShape {
    dims: Vec<usize>,
}

impl TensorShape {
    pub fn new(dims: &[usize]) -> Self {
        Self {
            dims: dims.to_vec(),
        }
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Number of elements described by the shape. An empty shape has no
    /// elements; a volume beyond `usize` saturates at `usize::MAX`.
    pub fn volume(&self) -> usize {
        if self.dims.is_empty() {
            return 0;
        }
        self.dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .unwrap_or(usize::MAX)
    }

    /// Returns the shape with leading unit dimensions removed.
    ///
    /// # Examples
    /// ```rust
    /// use siamtrack_tensor::TensorShape;
    /// let shape = TensorShape::new(&[1, 4, 31, 31]);
    /// assert_eq!(shape.squeezed().dims(), &[4, 31, 31]);
    /// ```
    pub fn squeezed(&self) -> TensorShape {
        let first = self
            .dims
            .iter()
            .position(|&d| d != 1)
            .unwrap_or(self.dims.len());
        TensorShape::new(&self.dims[first..])
    }

    /// True when both shapes agree once leading unit dimensions are removed.
    pub fn matches(&self, other: &TensorShape) -> bool {
        self.squeezed() == other.squeezed()
    }
}

impl From<&[usize]> for TensorShape {
    fn from(dims: &[usize]) -> Self {
        TensorShape::new(dims)
    }
}

impl<const N: usize> From<[usize; N]> for TensorShape {
    fn from(dims: [usize; N]) -> Self {
        TensorShape::new(&dims)
    }
}

impl From<Vec<usize>> for TensorShape {
    fn from(dims: Vec<usize>) -> Self {
        Self { dims }
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, "x")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

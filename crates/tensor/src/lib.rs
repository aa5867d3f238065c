// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

/*!
## siamtrack - Tensors

Host-resident, contiguous, row-major tensors as they arrive from an
inference runtime once any accelerator memory has been synchronised back
to the CPU. A tensor carries a name (used in error messages) and a
[`TensorShape`]; consumers compare that shape against their own
configuration with [`TensorShape::matches`] before touching the data.

```rust
use siamtrack_tensor::{Tensor, TensorShape};
# fn main() -> Result<(), siamtrack_tensor::Error> {
let scores = Tensor::<f32>::new(&[1, 1, 31, 31], Some("cls_score"))?;
assert!(scores.tensor_shape().matches(&TensorShape::from([31, 31])));
assert!(!scores.tensor_shape().matches(&TensorShape::from([25, 25])));
# Ok(())
# }
```
*/

pub use error::{Error, Result};
pub use shape::TensorShape;

use log::trace;
use ndarray::{ArrayViewD, ArrayViewMutD, IxDyn};
use num_traits::Num;

mod error;
mod shape;

/// A named, shape-tagged tensor stored contiguously in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T>
where
    T: Num + Clone + Send + Sync + std::fmt::Debug,
{
    name: String,
    shape: TensorShape,
    data: Vec<T>,
}

impl<T> Tensor<T>
where
    T: Num + Clone + Send + Sync + std::fmt::Debug,
{
    /// Allocates a zero filled tensor.
    pub fn new(shape: &[usize], name: Option<&str>) -> Result<Self> {
        let shape = TensorShape::new(shape);
        let len = shape.volume();
        if len == 0 || len > isize::MAX as usize / std::mem::size_of::<T>().max(1) {
            return Err(Error::InvalidSize(len));
        }

        let name = name.unwrap_or("mem_tensor").to_owned();
        trace!("Allocating tensor {name} with shape {shape}");
        Ok(Tensor {
            name,
            shape,
            data: vec![T::zero(); len],
        })
    }

    /// Wraps an existing buffer. The buffer length must equal the volume of
    /// the shape.
    pub fn from_vec(shape: &[usize], data: Vec<T>, name: Option<&str>) -> Result<Self> {
        let shape = TensorShape::new(shape);
        if shape.volume() == 0 {
            return Err(Error::InvalidSize(0));
        }
        if shape.volume() != data.len() {
            return Err(Error::ShapeMismatch(format!(
                "Buffer of {} elements does not fit shape {}",
                data.len(),
                shape
            )));
        }

        Ok(Tensor {
            name: name.unwrap_or("mem_tensor").to_owned(),
            shape,
            data,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn tensor_shape(&self) -> &TensorShape {
        &self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of the tensor data in bytes.
    pub fn size(&self) -> usize {
        self.len() * std::mem::size_of::<T>()
    }

    pub fn reshape(&mut self, shape: &[usize]) -> Result<()> {
        let new_shape = TensorShape::new(shape);
        if new_shape.volume() == 0 {
            return Err(Error::InvalidSize(0));
        }

        if new_shape.volume() != self.len() {
            return Err(Error::ShapeMismatch(format!(
                "Cannot reshape incompatible shape: {} to {}",
                self.shape, new_shape
            )));
        }

        self.shape = new_shape;
        Ok(())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Borrows the data as a dynamic-dimension `ndarray` view.
    pub fn view(&self) -> Result<ArrayViewD<'_, T>> {
        Ok(ArrayViewD::from_shape(
            IxDyn(self.shape.dims()),
            &self.data,
        )?)
    }

    pub fn view_mut(&mut self) -> Result<ArrayViewMutD<'_, T>> {
        Ok(ArrayViewMutD::from_shape(
            IxDyn(self.shape.dims()),
            &mut self.data,
        )?)
    }
}

// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use num_traits::Num;
use siamtrack_tensor::Tensor;

#[divan::bench(types = [u8, f32], args = [[1, 1, 25, 25], [1, 4, 25, 25], [1, 1, 31, 31], [1, 4, 31, 31]])]
fn tensor_alloc<T>(size: [usize; 4])
where
    T: Num + Clone + Send + Sync + std::fmt::Debug,
{
    let _tensor = Tensor::<T>::new(&size, None).expect("Failed to allocate tensor");
}

#[divan::bench(types = [u8, f32], args = [[1, 1, 31, 31], [1, 4, 31, 31]])]
fn tensor_view<T>(bencher: divan::Bencher, size: [usize; 4])
where
    T: Num + Clone + Send + Sync + std::fmt::Debug,
{
    let tensor = Tensor::<T>::new(&size, None).expect("Failed to allocate tensor");
    bencher.bench_local(|| {
        let _view = tensor.view().expect("Failed to view tensor");
    });
}

fn main() {
    divan::main();
}

// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use siamtrack_image::{CPUProcessor, CropRect, TensorImage, RGB};

const FRAMES: &[(usize, usize)] = &[(640, 480), (1280, 720), (1920, 1080)];

fn frame(width: usize, height: usize) -> TensorImage {
    let data = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
    TensorImage::from_vec(width, height, RGB, data).expect("Failed to create frame")
}

#[divan::bench(args = FRAMES)]
fn subwindow_inside(bencher: divan::Bencher, size: &(usize, usize)) {
    let src = frame(size.0, size.1);
    let mut processor = CPUProcessor::new().unwrap();
    let mut dst = TensorImage::new(255, 255, RGB).unwrap();
    let crop = CropRect::square(size.0 as f32 / 2.0, size.1 as f32 / 2.0, 300.0);

    bencher.bench_local(|| {
        processor
            .extract_subwindow(&src, crop, true, &mut dst)
            .expect("Failed to extract subwindow");
    });
}

#[divan::bench(args = FRAMES)]
fn subwindow_padded(bencher: divan::Bencher, size: &(usize, usize)) {
    let src = frame(size.0, size.1);
    let mut processor = CPUProcessor::new().unwrap();
    let mut dst = TensorImage::new(255, 255, RGB).unwrap();
    let crop = CropRect::square(20.0, 20.0, 300.0);

    bencher.bench_local(|| {
        processor
            .extract_subwindow(&src, crop, true, &mut dst)
            .expect("Failed to extract subwindow");
    });
}

fn main() {
    divan::main();
}

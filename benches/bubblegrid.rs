use bubblegrid::lowlevel::{detect_circles, smooth};
use bubblegrid::{BubbleDetector, CircleConfig, DetectConfig, GaussianKernel, PixelBuffer};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// Renders a page of `rows x cols` bubbles on a 50px pitch; every third is filled.
fn make_sheet(rows: usize, cols: usize) -> (Vec<u8>, usize, usize) {
    let pitch = 50usize;
    let radius = 15.0f32;
    let width = cols * pitch + 2 * pitch;
    let height = rows * pitch + 2 * pitch;
    let mut data = vec![255u8; width * height];
    for row in 0..rows {
        for col in 0..cols {
            let cx = (pitch + pitch / 2 + col * pitch) as f32;
            let cy = (pitch + pitch / 2 + row * pitch) as f32;
            let filled = (row * cols + col) % 3 == 0;
            for y in (cy - 20.0) as usize..=(cy + 20.0) as usize {
                for x in (cx - 20.0) as usize..=(cx + 20.0) as usize {
                    let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
                    if filled && d <= radius + 1.5 {
                        data[y * width + x] = 30;
                    } else if (d - radius).abs() <= 1.5 {
                        data[y * width + x] = 40;
                    }
                }
            }
        }
    }
    (data, width, height)
}

fn bench_pipeline(c: &mut Criterion) {
    let (data, width, height) = make_sheet(20, 5);
    let view = PixelBuffer::from_slice(&data, width, height).unwrap();
    let kernel = GaussianKernel::default();

    c.bench_function("smooth_5x5", |b| {
        b.iter(|| black_box(smooth(view, &kernel)));
    });

    let smoothed = smooth(view, &kernel);
    c.bench_function("detect_circles", |b| {
        b.iter(|| black_box(detect_circles(smoothed.view(), &CircleConfig::default()).unwrap()));
    });

    let detector = BubbleDetector::new();
    c.bench_function("detect_sheet_100", |b| {
        b.iter(|| black_box(detector.detect(view).unwrap()));
    });

    if cfg!(feature = "rayon") {
        let detector_par = BubbleDetector::new().with_config(DetectConfig {
            parallel: true,
            ..DetectConfig::default()
        });
        c.bench_function("detect_sheet_100_parallel", |b| {
            b.iter(|| black_box(detector_par.detect(view).unwrap()));
        });

        let pages = vec![view; 8];
        c.bench_function("detect_batch_8_parallel", |b| {
            b.iter(|| black_box(detector_par.detect_batch(&pages)));
        });
    }
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);

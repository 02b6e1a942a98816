use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use region_fx::image_edit::{
    OverlayConfig, PixelBuffer, Region, add_camera_overlay, apply_mosaic_to_region, apply_motion_blur_to_region,
    rasterize,
};

fn generate_gradient(width: usize, height: usize) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]);
        }
    }
    PixelBuffer::new(width, height, data).expect("gradient buffer")
}

fn centre_polygon(width: usize, height: usize) -> Region {
    let (w, h) = (width as f64, height as f64);
    Region::polygon([
        (w * 0.2, h * 0.3),
        (w * 0.5, h * 0.1),
        (w * 0.8, h * 0.3),
        (w * 0.7, h * 0.9),
        (w * 0.3, h * 0.8),
    ])
}

fn benchmark_rasterize(c: &mut Criterion) {
    let mut group = c.benchmark_group("rasterize_by_size");

    for (width, height, label) in [(100, 100, "100x100"), (1000, 1000, "1000x1000"), (4000, 3000, "4000x3000")] {
        let region = centre_polygon(width, height);
        group.bench_with_input(BenchmarkId::from_parameter(label), &region, |b, region| {
            b.iter(|| rasterize(black_box(region), width, height));
        });
    }

    group.finish();
}

fn benchmark_mosaic(c: &mut Criterion) {
    let mut group = c.benchmark_group("mosaic_block_size");
    let image = generate_gradient(1000, 1000);
    let region = centre_polygon(1000, 1000);

    for block_size in [4usize, 20, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(block_size), &block_size, |b, &block_size| {
            b.iter(|| apply_mosaic_to_region(black_box(&image), &region, block_size));
        });
    }

    group.finish();
}

fn benchmark_motion_blur(c: &mut Criterion) {
    let mut group = c.benchmark_group("motion_blur_intensity");
    group.sample_size(10);
    let image = generate_gradient(500, 500);
    let region = centre_polygon(500, 500);

    for intensity in [3usize, 15, 45] {
        group.bench_with_input(BenchmarkId::from_parameter(intensity), &intensity, |b, &intensity| {
            b.iter(|| apply_motion_blur_to_region(black_box(&image), &region, intensity, 30.0));
        });
    }

    group.finish();
}

fn benchmark_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay_by_size");
    let config = OverlayConfig::default();

    for (width, height, label) in [(200, 200, "200x200"), (1920, 1080, "1920x1080"), (4000, 3000, "4000x3000")] {
        let image = generate_gradient(width, height);
        group.bench_with_input(BenchmarkId::from_parameter(label), &image, |b, image| {
            b.iter(|| add_camera_overlay(black_box(image), 0.45, "00:12:34", &config));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_rasterize,
    benchmark_mosaic,
    benchmark_motion_blur,
    benchmark_overlay
);
criterion_main!(benches);

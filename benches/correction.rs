use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use macs_io::image_pipeline::{
    CorrectionOptions, CorrectionPipeline, CpuCorrectionPipeline, Distortion, ExportConfig,
    GeoPose, MacsImage, MacsToTiffPipeline, MetaData, PixelFormat, RawImage, SaveOptions,
    TiffCompression,
};
use std::io::Cursor;

fn generate_mock_mosaic(width: usize, height: usize) -> RawImage {
    let samples: Vec<u16> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (((x + y) % 256) as u16) << 8))
        .collect();
    RawImage::from_samples(&samples, width, height, PixelFormat::BayerRG16)
        .expect("mock mosaic is well formed")
}

fn benchmark_correction_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("correction_by_size");
    let pipeline = CpuCorrectionPipeline::new();
    let options = CorrectionOptions::builder()
        .gamma(2.2)
        .color_balance(1.3, 1.0, 1.6)
        .build()
        .expect("valid options");

    let sizes = [
        (100, 100, "100x100"),
        (500, 500, "500x500"),
        (1000, 1000, "1000x1000"),
    ];

    for (width, height, label) in sizes {
        let raw = generate_mock_mosaic(width, height);
        group.bench_with_input(BenchmarkId::from_parameter(label), &raw, |b, raw| {
            b.iter(|| {
                let _ = pipeline.run(black_box(raw), &options);
            });
        });
    }

    group.finish();
}

fn benchmark_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("distortion_impact");
    let pipeline = CpuCorrectionPipeline::new();
    let raw = generate_mock_mosaic(500, 500);

    group.bench_function("without_distortion", |b| {
        let options = CorrectionOptions::default();
        b.iter(|| {
            let _ = pipeline.run(black_box(&raw), &options);
        });
    });

    group.bench_function("with_distortion", |b| {
        let options = CorrectionOptions::builder()
            .distortion(Distortion {
                k1: 1e-7,
                k2: 1e-13,
                ..Distortion::default()
            })
            .build()
            .expect("valid options");
        b.iter(|| {
            let _ = pipeline.run(black_box(&raw), &options);
        });
    });

    group.finish();
}

fn benchmark_container_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("container_encoding");
    let image = MacsImage::new(
        generate_mock_mosaic(500, 500),
        MetaData::default(),
        GeoPose::default(),
    );

    for (options, label) in [
        (SaveOptions::new(), "plain"),
        (SaveOptions::new().compression(true), "zlib"),
        (SaveOptions::new().preview(true), "preview"),
    ] {
        group.bench_function(label, |b| {
            b.iter(|| {
                let _ = black_box(&image).to_bytes(options);
            });
        });
    }

    group.finish();
}

fn benchmark_tiff_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiff_export");
    let container = MacsImage::new(
        generate_mock_mosaic(500, 500),
        MetaData::default(),
        GeoPose::default(),
    )
    .to_bytes(SaveOptions::new())
    .expect("mock container encodes");

    for (compression, label) in [
        (TiffCompression::None, "none"),
        (TiffCompression::Lzw, "lzw"),
        (TiffCompression::DeflateBalanced, "deflate"),
    ] {
        let config = ExportConfig::builder().compression(compression).build();
        let pipeline = MacsToTiffPipeline::new(CorrectionOptions::default(), config)
            .expect("valid options");
        group.bench_function(label, |b| {
            b.iter(|| {
                let mut output = Cursor::new(Vec::new());
                let _ = pipeline.convert(black_box(&container), &mut output);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_correction_sizes,
    benchmark_distortion,
    benchmark_container_encoding,
    benchmark_tiff_export
);
criterion_main!(benches);

use crate::image_pipeline::common::error::{MacsError, Result};
use crate::image_pipeline::correction::{
    CorrectedImage, CorrectionOptions, CorrectionPipeline, CpuCorrectionPipeline, Devignetting,
    Distortion, Samples, Stretch,
};
use crate::image_pipeline::raw::unpack::pack_12bit_le;
use crate::image_pipeline::raw::{BayerPattern, PixelEndianness, PixelFormat, RawImage};

fn mono16(width: usize, height: usize, samples: &[u16]) -> RawImage {
    RawImage::from_samples(samples, width, height, PixelFormat::Mono16).unwrap()
}

fn run(raw: &RawImage, options: &CorrectionOptions) -> Result<CorrectedImage> {
    CpuCorrectionPipeline::new().run(raw, options)
}

#[test]
fn small_mono_reduces_to_zero() {
    let raw = mono16(2, 2, &[127, 128, 129, 130]);
    let options = CorrectionOptions::builder()
        .convert_to_8bit(true)
        .build()
        .unwrap();
    let out = run(&raw, &options).unwrap();
    assert_eq!((out.width, out.height, out.channels), (2, 2, 1));
    assert_eq!(out.samples, Samples::U8(vec![0, 0, 0, 0]));
}

#[test]
fn default_options_are_identity() {
    let samples: Vec<u16> = (0..12).map(|i| i * 5000).collect();
    let out = run(&mono16(4, 3, &samples), &CorrectionOptions::default()).unwrap();
    assert_eq!(out.samples, Samples::U16(samples));
}

#[test]
fn eight_bit_law_holds() {
    let samples = [0u16, 255, 256, 1000, 40000, 65535];
    let options = CorrectionOptions {
        convert_to_8bit: true,
        ..CorrectionOptions::default()
    };
    let out = run(&mono16(3, 2, &samples), &options).unwrap();
    let expected = samples.iter().map(|s| (s / 256) as u8).collect();
    assert_eq!(out.samples, Samples::U8(expected));
}

#[test]
fn eight_bit_source_stays_eight_bit() {
    let data = vec![0, 17, 128, 255];
    let raw = RawImage::new(data.clone(), 2, 2, 2, PixelFormat::Mono8, PixelEndianness::Undefined)
        .unwrap();
    let out = run(&raw, &CorrectionOptions::default()).unwrap();
    assert_eq!(out.samples, Samples::U8(data));
}

#[test]
fn packed_twelve_bit_is_widened() {
    let data = pack_12bit_le(&[0x001, 0xFFF]);
    let raw = RawImage::new(data, 2, 1, 3, PixelFormat::Mono12Packed, PixelEndianness::Little)
        .unwrap();
    let out = run(&raw, &CorrectionOptions::default()).unwrap();
    assert_eq!(out.samples, Samples::U16(vec![0x0010, 0xFFF0]));
}

#[test]
fn bayer_output_is_rgb_with_same_dimensions() {
    let raw = RawImage::from_samples(&[2000; 6 * 4], 6, 4, PixelFormat::BayerGR16).unwrap();
    let out = run(&raw, &CorrectionOptions::default()).unwrap();
    assert_eq!((out.width, out.height, out.channels), (6, 4, 3));
    assert_eq!(out.samples, Samples::U16(vec![2000; 6 * 4 * 3]));
}

#[test]
fn color_balance_applies_after_debayer() {
    // R = 1000, G = 2000, B = 3000 laid out as a BG mosaic
    let mosaic: Vec<u16> = (0..4)
        .flat_map(|y| (0..4).map(move |x| [1000, 2000, 3000][BayerPattern::Bg.color_at(x, y)]))
        .collect();
    let raw = RawImage::from_samples(&mosaic, 4, 4, PixelFormat::BayerBG16).unwrap();
    let options = CorrectionOptions::builder()
        .color_balance(2.0, 1.0, 0.5)
        .build()
        .unwrap();
    let out = run(&raw, &options).unwrap();
    let Samples::U16(data) = out.samples else {
        panic!("expected 16-bit output");
    };
    for pixel in data.chunks_exact(3) {
        assert_eq!(pixel, &[2000, 2000, 1500]);
    }
}

#[test]
fn rgb_passes_through_debayer() {
    let samples: Vec<u16> = (0..2 * 2 * 3).map(|i| i * 1000).collect();
    let raw = RawImage::from_samples(&samples, 2, 2, PixelFormat::Rgb16).unwrap();
    let out = run(&raw, &CorrectionOptions::default()).unwrap();
    assert_eq!(out.channels, 3);
    assert_eq!(out.samples, Samples::U16(samples));
}

#[test]
fn uniform_devignetting_offsets_every_pixel() {
    let samples: Vec<u16> = (0..16).map(|i| 100 + i).collect();
    let options = CorrectionOptions::builder()
        .devignetting(Devignetting {
            c: 3.0,
            factor: 2.0,
            offset: 4.0,
            cx: 0.3,
            ..Devignetting::default()
        })
        .build()
        .unwrap();
    let out = run(&mono16(4, 4, &samples), &options).unwrap();
    let expected = samples.iter().map(|s| s + 10).collect();
    assert_eq!(out.samples, Samples::U16(expected));
}

#[test]
fn zero_distortion_leaves_image_unchanged() {
    let samples: Vec<u16> = (0..25).map(|i| i * 999).collect();
    let options = CorrectionOptions::builder()
        .distortion(Distortion {
            cx_px: 1.0,
            cy_px: 3.0,
            ..Distortion::default()
        })
        .build()
        .unwrap();
    let out = run(&mono16(5, 5, &samples), &options).unwrap();
    assert_eq!(out.samples, Samples::U16(samples));
}

#[test]
fn invalid_options_fail_before_processing() {
    let options = CorrectionOptions {
        stretch: Stretch {
            gamma: 1.0,
            min: 0.6,
            max: 0.4,
        },
        ..CorrectionOptions::default()
    };
    let err = run(&mono16(1, 1, &[0]), &options).unwrap_err();
    assert!(matches!(err, MacsError::InvalidOptions(_)));
}

#[test]
fn timings_list_only_active_stages() {
    let raw = mono16(2, 2, &[1, 2, 3, 4]);
    let pipeline = CpuCorrectionPipeline::new();

    let (_, timings) = pipeline
        .run_with_timings(&raw, &CorrectionOptions::default())
        .unwrap();
    let names: Vec<&str> = timings.steps().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["unpack", "debayer", "bit_depth"]);

    let options = CorrectionOptions::builder().gamma(2.2).build().unwrap();
    let (_, timings) = pipeline.run_with_timings(&raw, &options).unwrap();
    assert!(timings.get_step("color").is_some());
    assert!(timings.get_step("devignette").is_none());
}

//! Radial brightness falloff correction on raw samples

use crate::image_pipeline::correction::options::Devignetting;
use crate::image_pipeline::debayer::ImageBuffer;

/// Adds `v(r)·factor + offset` to every sample, where `r` is the distance
/// to the (shifted) image center normalized by the half diagonal of the
/// larger image side.
///
/// The correction is evaluated in native units of `bit_depth`; the result
/// is clamped to `[0, 2^bit_depth - 1]` and renormalized to 16 bits.
pub fn apply(image: &ImageBuffer, bit_depth: u32, params: &Devignetting) -> ImageBuffer {
    let shift = 16 - bit_depth.clamp(1, 16);
    let scale = f64::from(1u32 << shift);
    let native_max = f64::from((1u32 << (16 - shift)) - 1);

    let w = image.width as f64;
    let h = image.height as f64;
    let center_x = 0.5 * w + params.cx * 0.5 * w;
    let center_y = 0.5 * h + params.cy * 0.5 * h;
    let half_side = 0.5 * w.max(h);
    let norm = (2.0 * half_side * half_side).sqrt();

    let mut data = Vec::with_capacity(image.data.len());
    for (y, row) in image
        .data
        .chunks_exact(image.width * image.channels)
        .enumerate()
    {
        let dy = y as f64 - center_y;
        for (x, pixel) in row.chunks_exact(image.channels).enumerate() {
            let dx = x as f64 - center_x;
            let r = (dx * dx + dy * dy).sqrt() / norm;
            let v = params.a * r * r + params.b * r + params.c;
            let correction = v * params.factor + params.offset;
            data.extend(pixel.iter().map(|&s| {
                let native = f64::from(s) / scale + correction;
                let clamped = native.round().clamp(0.0, native_max) as u16;
                clamped << shift
            }));
        }
    }
    ImageBuffer::new(image.width, image.height, image.channels, data)
}

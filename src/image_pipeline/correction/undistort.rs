//! Radial lens distortion correction

use crate::image_pipeline::correction::options::Distortion;
use crate::image_pipeline::debayer::ImageBuffer;
use crate::image_pipeline::raw::ColorLayout;

/// Resamples `image` so that straight lines in the scene become straight.
///
/// Output pixel `p` reads the input at `pp + s·(p - pp)`, with
/// `s = 1 + k1·r² + k2·r⁴ + k3·r⁶` and `r = |p - pp|` in pixels. Lookups
/// outside the image are clamped to the border. On Bayer mosaics only
/// samples of the same CFA color take part in the interpolation.
pub fn apply(image: &ImageBuffer, layout: ColorLayout, params: &Distortion) -> ImageBuffer {
    let (ppx, ppy) = params.principal_point(image.width, image.height);
    let mosaic = matches!(layout, ColorLayout::Bayer(_));

    let mut data = Vec::with_capacity(image.data.len());
    for y in 0..image.height {
        for x in 0..image.width {
            let dx = x as f64 - ppx;
            let dy = y as f64 - ppy;
            let r2 = dx * dx + dy * dy;
            let s = 1.0 + r2 * (params.k1 + r2 * (params.k2 + r2 * params.k3));
            let src_x = ppx + s * dx;
            let src_y = ppy + s * dy;
            for channel in 0..image.channels {
                let value = if mosaic {
                    sample_lattice(image, src_x, src_y, x % 2, y % 2)
                } else {
                    sample_bilinear(image, src_x, src_y, channel)
                };
                data.push(value);
            }
        }
    }
    ImageBuffer::new(image.width, image.height, image.channels, data)
}

/// Interpolation weights and indices along one axis of a grid with `n`
/// nodes, clamped to the edge.
fn axis(u: f64, n: usize) -> (usize, usize, f64) {
    let last = (n - 1) as f64;
    let u = u.clamp(0.0, last);
    let i0 = u.floor() as usize;
    let i1 = (i0 + 1).min(n - 1);
    (i0, i1, u - i0 as f64)
}

fn blend(v00: u16, v10: u16, v01: u16, v11: u16, fx: f64, fy: f64) -> u16 {
    let top = f64::from(v00) * (1.0 - fx) + f64::from(v10) * fx;
    let bottom = f64::from(v01) * (1.0 - fx) + f64::from(v11) * fx;
    let value = top * (1.0 - fy) + bottom * fy;
    value.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

fn sample_bilinear(image: &ImageBuffer, x: f64, y: f64, channel: usize) -> u16 {
    let (x0, x1, fx) = axis(x, image.width);
    let (y0, y1, fy) = axis(y, image.height);
    blend(
        image.get(x0, y0, channel),
        image.get(x1, y0, channel),
        image.get(x0, y1, channel),
        image.get(x1, y1, channel),
        fx,
        fy,
    )
}

/// Bilinear lookup on the stride-2 sub-lattice starting at
/// `(phase_x, phase_y)`, i.e. the sites sharing one CFA color.
fn sample_lattice(image: &ImageBuffer, x: f64, y: f64, phase_x: usize, phase_y: usize) -> u16 {
    let nx = (image.width - phase_x).div_ceil(2);
    let ny = (image.height - phase_y).div_ceil(2);
    let (i0, i1, fx) = axis((x - phase_x as f64) / 2.0, nx);
    let (j0, j1, fy) = axis((y - phase_y as f64) / 2.0, ny);
    let at = |i: usize, j: usize| image.get(phase_x + 2 * i, phase_y + 2 * j, 0);
    blend(at(i0, j0), at(i1, j0), at(i0, j1), at(i1, j1), fx, fy)
}

//! Color balance, linear stretch and gamma

use crate::image_pipeline::correction::options::{ColorBalance, Stretch};
use crate::image_pipeline::debayer::ImageBuffer;

const FULL_SCALE: f64 = u16::MAX as f64;

/// Applies per-channel gains, then maps `[min, max]` of the full range onto
/// `[0, 1]` and raises the result to `1 / gamma`.
///
/// Single channel images ignore the balance.
pub fn apply(image: &ImageBuffer, balance: &ColorBalance, stretch: &Stretch) -> ImageBuffer {
    let gains = if image.channels == 3 {
        balance.gains()
    } else {
        [1.0; 3]
    };
    let low = stretch.min * FULL_SCALE;
    let range = (stretch.max - stretch.min) * FULL_SCALE;
    let exponent = 1.0 / stretch.gamma;

    let data = image
        .data
        .chunks_exact(image.channels)
        .flat_map(|pixel| {
            pixel.iter().enumerate().map(move |(c, &s)| {
                let scaled = f64::from(s) * gains[c];
                let linear = ((scaled - low) / range).clamp(0.0, 1.0);
                (FULL_SCALE * linear.powf(exponent)).round() as u16
            })
        })
        .collect();
    ImageBuffer::new(image.width, image.height, image.channels, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_identity() {
        let image = ImageBuffer::new(2, 1, 3, vec![0, 1, 2, 32768, 65534, 65535]);
        let out = apply(&image, &ColorBalance::default(), &Stretch::default());
        assert_eq!(out, image);
    }

    #[test]
    fn gains_apply_per_channel_and_saturate() {
        let image = ImageBuffer::new(1, 1, 3, vec![1000, 1000, 40000]);
        let balance = ColorBalance {
            r: 2.0,
            g: 1.0,
            b: 2.0,
        };
        let out = apply(&image, &balance, &Stretch::default());
        assert_eq!(out.data, vec![2000, 1000, 65535]);
    }

    #[test]
    fn mono_ignores_balance() {
        let image = ImageBuffer::new(2, 1, 1, vec![100, 200]);
        let balance = ColorBalance {
            r: 3.0,
            g: 0.5,
            b: 0.0,
        };
        let out = apply(&image, &balance, &Stretch::default());
        assert_eq!(out, image);
    }

    #[test]
    fn stretch_maps_range_onto_full_scale() {
        let image = ImageBuffer::new(3, 1, 1, vec![0, 32768, 65535]);
        let stretch = Stretch {
            gamma: 1.0,
            min: 0.25,
            max: 0.75,
        };
        let out = apply(&image, &ColorBalance::default(), &stretch);
        assert_eq!(out.data[0], 0);
        assert_eq!(out.data[2], 65535);
        assert!((32767..=32769).contains(&out.data[1]));
    }

    #[test]
    fn gamma_brightens_midtones() {
        let image = ImageBuffer::new(1, 1, 1, vec![16384]);
        let stretch = Stretch {
            gamma: 2.0,
            ..Stretch::default()
        };
        let out = apply(&image, &ColorBalance::default(), &stretch);
        let expected = (65535.0 * (16384.0f64 / 65535.0).sqrt()).round() as u16;
        assert_eq!(out.data, vec![expected]);
    }
}

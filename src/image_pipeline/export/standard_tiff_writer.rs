use std::io::Write;

use tiff::encoder::colortype::{Gray8, Gray16, RGB8, RGB16};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tracing::debug;

use crate::image_pipeline::common::error::{MacsError, Result};
use crate::image_pipeline::correction::{CorrectedImage, Samples};
use crate::image_pipeline::export::types::{ExportConfig, TiffCompression};
use crate::image_pipeline::export::writer::ImageExporter;

/// Writes Gray8, Gray16, RGB8 or RGB16 TIFF images with the `tiff` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardTiffWriter;

impl ImageExporter for StandardTiffWriter {
    fn write_image(
        &self,
        image: &CorrectedImage,
        output: &mut dyn Write,
        config: &ExportConfig,
    ) -> Result<()> {
        debug!(
            "Encoding TIFF image: {}x{}x{}",
            image.width, image.height, image.channels
        );

        let width = u32::try_from(image.width)
            .map_err(|_| MacsError::InvalidDimensions(image.width, image.height))?;
        let height = u32::try_from(image.height)
            .map_err(|_| MacsError::InvalidDimensions(image.width, image.height))?;

        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut buffer = Vec::new();
        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| MacsError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => tiff::tags::Predictor::Horizontal,
                _ => tiff::tags::Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        let written = match (&image.samples, image.channels) {
            (Samples::U8(data), 1) => encoder.write_image::<Gray8>(width, height, data),
            (Samples::U16(data), 1) => encoder.write_image::<Gray16>(width, height, data),
            (Samples::U8(data), 3) => encoder.write_image::<RGB8>(width, height, data),
            (Samples::U16(data), 3) => encoder.write_image::<RGB16>(width, height, data),
            (_, channels) => {
                return Err(MacsError::EncodeError(format!(
                    "no TIFF color type for {channels} channels"
                )));
            }
        };
        written.map_err(|e| MacsError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tiff::decoder::{Decoder, DecodingResult};

    use super::*;

    fn decode(bytes: Vec<u8>) -> (u32, u32, tiff::ColorType, DecodingResult) {
        let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
        let (w, h) = decoder.dimensions().unwrap();
        let color = decoder.colortype().unwrap();
        (w, h, color, decoder.read_image().unwrap())
    }

    #[test]
    fn writes_gray16() {
        let image = CorrectedImage {
            width: 3,
            height: 2,
            channels: 1,
            samples: Samples::U16(vec![0, 1, 2, 300, 4000, 65535]),
        };
        let mut out = Vec::new();
        StandardTiffWriter
            .write_image(&image, &mut out, &ExportConfig::default())
            .unwrap();
        let (w, h, color, data) = decode(out);
        assert_eq!((w, h), (3, 2));
        assert_eq!(color, tiff::ColorType::Gray(16));
        match data {
            DecodingResult::U16(v) => assert_eq!(v, vec![0, 1, 2, 300, 4000, 65535]),
            _ => panic!("expected 16-bit samples"),
        }
    }

    #[test]
    fn writes_compressed_rgb8() {
        let pixels: Vec<u8> = (0..4 * 4 * 3).map(|i| (i * 5) as u8).collect();
        let image = CorrectedImage {
            width: 4,
            height: 4,
            channels: 3,
            samples: Samples::U8(pixels.clone()),
        };
        let config = ExportConfig::builder()
            .compression(TiffCompression::DeflateBalanced)
            .predictor(Some(2))
            .build();
        let mut out = Vec::new();
        StandardTiffWriter.write_image(&image, &mut out, &config).unwrap();
        let (_, _, color, data) = decode(out);
        assert_eq!(color, tiff::ColorType::RGB(8));
        match data {
            DecodingResult::U8(v) => assert_eq!(v, pixels),
            _ => panic!("expected 8-bit samples"),
        }
    }

    #[test]
    fn rejects_unsupported_channel_count() {
        let image = CorrectedImage {
            width: 1,
            height: 1,
            channels: 2,
            samples: Samples::U8(vec![0, 0]),
        };
        let err = StandardTiffWriter
            .write_image(&image, &mut Vec::new(), &ExportConfig::default())
            .unwrap_err();
        assert!(matches!(err, MacsError::EncodeError(_)));
    }
}

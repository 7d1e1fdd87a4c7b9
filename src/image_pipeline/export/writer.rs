use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::correction::CorrectedImage;
use crate::image_pipeline::export::types::ExportConfig;

/// Serializes a corrected image into some file format.
pub trait ImageExporter {
    fn write_image(
        &self,
        image: &CorrectedImage,
        output: &mut dyn Write,
        config: &ExportConfig,
    ) -> Result<()>;
}

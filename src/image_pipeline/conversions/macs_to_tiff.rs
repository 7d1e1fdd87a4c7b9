use std::io::Write;
use std::path::Path;

use tracing::{info, instrument};

use crate::image_pipeline::{
    common::error::{MacsError, Result},
    common::timing::{PipelineTimings, Timer},
    correction::{CorrectionOptions, CorrectionPipeline, CpuCorrectionPipeline},
    export::{ExportConfig, ImageExporter, StandardTiffWriter},
    macs_image::MacsImage,
};

/// Decodes a container, corrects it and encodes the result as TIFF.
pub struct MacsToTiffPipeline<P: CorrectionPipeline, W: ImageExporter> {
    pipeline: P,
    writer: W,
    options: CorrectionOptions,
    config: ExportConfig,
}

impl MacsToTiffPipeline<CpuCorrectionPipeline, StandardTiffWriter> {
    /// # Errors
    ///
    /// `InvalidOptions` if `options` do not validate.
    pub fn new(options: CorrectionOptions, config: ExportConfig) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            pipeline: CpuCorrectionPipeline::new(),
            writer: StandardTiffWriter,
            options,
            config,
        })
    }
}

impl<P: CorrectionPipeline, W: ImageExporter> MacsToTiffPipeline<P, W> {
    pub fn with_custom(
        pipeline: P,
        writer: W,
        options: CorrectionOptions,
        config: ExportConfig,
    ) -> Self {
        Self {
            pipeline,
            writer,
            options,
            config,
        }
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output: &mut dyn Write) -> Result<()> {
        self.convert_with_timings(input_data, output).map(|_| ())
    }

    pub fn convert_with_timings(
        &self,
        input_data: &[u8],
        output: &mut dyn Write,
    ) -> Result<PipelineTimings> {
        let mut timings = PipelineTimings::new();
        info!("Starting MACS to TIFF conversion");

        let timer = Timer::start("decode_container");
        let image = {
            let _span = tracing::info_span!("decode_container").entered();
            MacsImage::from_bytes(input_data)?
        };
        let (name, duration) = timer.stop();
        timings.add_step(name, duration);

        self.correct_and_encode(&image, output, &mut timings)?;
        Ok(timings)
    }

    /// Like [`Self::convert_with_timings`] for an image that is already
    /// decoded.
    #[instrument(skip_all, fields(width = image.raw().width(), height = image.raw().height()))]
    pub fn convert_image_with_timings(
        &self,
        image: &MacsImage,
        output: &mut dyn Write,
    ) -> Result<PipelineTimings> {
        let mut timings = PipelineTimings::new();
        self.correct_and_encode(image, output, &mut timings)?;
        Ok(timings)
    }

    fn correct_and_encode(
        &self,
        image: &MacsImage,
        output: &mut dyn Write,
        timings: &mut PipelineTimings,
    ) -> Result<()> {
        let timer = Timer::start("correct");
        let corrected = {
            let _span = tracing::info_span!("correct",
                width = image.raw().width(),
                height = image.raw().height()
            )
            .entered();
            image.corrected_image_with(&self.pipeline, &self.options)?
        };
        let (name, duration) = timer.stop();
        timings.add_step(name, duration);

        let timer = Timer::start("encode_tiff");
        {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_image(&corrected, output, &self.config)?;
        }
        let (name, duration) = timer.stop();
        timings.add_step(name, duration);

        info!(
            "Conversion complete: {}x{} in {:.3}ms",
            corrected.width,
            corrected.height,
            timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok(())
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<S: AsRef<Path>, T: AsRef<Path>>(
        &self,
        input_path: S,
        output_path: T,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                MacsError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        // encode fully before touching the output path
        let mut encoded = Vec::new();
        self.convert(&input_data, &mut encoded)?;

        {
            let _span = tracing::info_span!("write_output_file").entered();
            std::fs::write(output_path, &encoded).map_err(|e| {
                MacsError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        Ok(())
    }

    pub fn options(&self) -> &CorrectionOptions {
        &self.options
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// # Errors
    ///
    /// `InvalidOptions` if `options` do not validate; the current options
    /// are kept.
    pub fn set_options(&mut self, options: CorrectionOptions) -> Result<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    pub fn set_config(&mut self, config: ExportConfig) {
        self.config = config;
    }
}

use tracing::{debug, info, instrument};

use crate::image_pipeline::common::error::{MacsError, Result};
use crate::image_pipeline::common::timing::{PipelineTimings, Timer};
use crate::image_pipeline::correction::options::CorrectionOptions;
use crate::image_pipeline::correction::types::CorrectedImage;
use crate::image_pipeline::correction::{bit_depth, color, devignette, undistort};
use crate::image_pipeline::debayer::{CpuDebayer, ImageBuffer};
use crate::image_pipeline::raw::RawImage;

/// Turns a raw image into a viewable one.
///
/// Implementations must be pure: the same input and options always give the
/// same output.
pub trait CorrectionPipeline {
    fn run(&self, raw: &RawImage, options: &CorrectionOptions) -> Result<CorrectedImage>;
}

/// Runs devignetting, distortion correction, debayering, color balance with
/// stretch/gamma and the output bit depth conversion, in that order.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuCorrectionPipeline {
    debayer: CpuDebayer,
}

fn timed<T>(timings: &mut PipelineTimings, name: &'static str, f: impl FnOnce() -> T) -> T {
    let _span = tracing::info_span!("stage", stage = name).entered();
    let timer = Timer::start(name);
    let out = f();
    let (name, duration) = timer.stop();
    timings.add_step(name, duration);
    out
}

impl CpuCorrectionPipeline {
    pub fn new() -> Self {
        Self {
            debayer: CpuDebayer::new(),
        }
    }

    /// Like [`CorrectionPipeline::run`], also reporting per-stage durations.
    ///
    /// Stages whose options are at their identity values are skipped and do
    /// not appear in the timings.
    #[instrument(skip_all, fields(width = raw.width(), height = raw.height(), format = %raw.format()))]
    pub fn run_with_timings(
        &self,
        raw: &RawImage,
        options: &CorrectionOptions,
    ) -> Result<(CorrectedImage, PipelineTimings)> {
        options.validate()?;
        let layout = raw
            .format()
            .layout()
            .ok_or_else(|| MacsError::UnsupportedFormat(raw.format().to_string()))?;
        info!("Starting image correction");

        let mut timings = PipelineTimings::new();
        let samples = timed(&mut timings, "unpack", || raw.samples())?;
        let mut image = ImageBuffer::new(raw.width(), raw.height(), raw.channel_count(), samples);

        if !options.devignetting.is_identity() {
            image = timed(&mut timings, "devignette", || {
                devignette::apply(&image, raw.bit_depth(), &options.devignetting)
            });
        }

        if !options.distortion.is_identity() {
            image = timed(&mut timings, "undistort", || {
                undistort::apply(&image, layout, &options.distortion)
            });
        }

        image = timed(&mut timings, "debayer", || self.debayer.process(&image, layout))?;

        if !(options.color_balance.is_identity() && options.stretch.is_identity()) {
            image = timed(&mut timings, "color", || {
                color::apply(&image, &options.color_balance, &options.stretch)
            });
        } else {
            debug!("Color balance and stretch at defaults, skipping");
        }

        let to_8bit = options.convert_to_8bit || raw.bit_depth() == 8;
        let ImageBuffer {
            width,
            height,
            channels,
            data,
        } = image;
        let samples = timed(&mut timings, "bit_depth", || bit_depth::convert(data, to_8bit));

        info!(
            "Correction complete: {}x{}x{} at {} bits in {:.3}ms",
            width,
            height,
            channels,
            samples.bits_per_sample(),
            timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok((
            CorrectedImage {
                width,
                height,
                channels,
                samples,
            },
            timings,
        ))
    }
}

impl CorrectionPipeline for CpuCorrectionPipeline {
    fn run(&self, raw: &RawImage, options: &CorrectionOptions) -> Result<CorrectedImage> {
        self.run_with_timings(raw, options).map(|(image, _)| image)
    }
}

use anyhow::{Context, bail};
use macs_io::image_pipeline::{
    CorrectionOptions, ExportConfig, MacsImage, MacsToTiffPipeline, TiffCompression,
};
use macs_io::logger;

use tracing::{error, info};

fn print_info(image: &MacsImage) {
    let raw = image.raw();
    info!(
        "Image: {}x{} {} ({} bit, {:?} endian, pitch {} bytes)",
        raw.width(),
        raw.height(),
        raw.format(),
        raw.bit_depth(),
        raw.endianness(),
        raw.pitch()
    );

    let meta = image.meta();
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    info!(
        "Camera: {} {} \"{}\" serial {}",
        text(&meta.cam_vendor),
        text(&meta.cam_model),
        text(&meta.cam_name),
        text(&meta.cam_serial)
    );
    if let Some(exp) = meta.exp_time_us {
        info!("Exposure: {} us", exp);
    }
    if let Some(id) = meta.image_id {
        info!("Image id: {}", id);
    }

    let pose = image.pose();
    if pose.is_empty() {
        info!("Pose: none");
    } else {
        let time = pose
            .time
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        info!(
            "Pose: {} lat {:.6} lon {:.6} alt {:.1} m, rpy ({:.2}, {:.2}, {:.2}), {:.1} m/s",
            time,
            pose.lat,
            pose.lon,
            pose.alt,
            pose.roll,
            pose.pitch,
            pose.yaw,
            pose.speed()
        );
    }
    info!(
        "Preview: {}",
        image
            .preview()
            .map(|p| format!("{} bytes", p.len()))
            .unwrap_or_else(|| "none".to_string())
    );
}

fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        bail!("usage: macs_io <image.macs> [output.tiff]");
    };
    let output = args.next();

    let image = MacsImage::load(&input).with_context(|| format!("loading {input}"))?;
    print_info(&image);

    if let Some(output) = output {
        let config = ExportConfig::builder()
            .compression(TiffCompression::DeflateBalanced)
            .predictor(Some(2))
            .build();
        let pipeline = MacsToTiffPipeline::new(CorrectionOptions::default(), config)?;
        let mut encoded = Vec::new();
        let timings = pipeline.convert_image_with_timings(&image, &mut encoded)?;
        std::fs::write(&output, encoded).with_context(|| format!("writing {output}"))?;
        timings.log_summary();
        info!("Exported {}", output);
    }
    Ok(())
}

fn main() {
    logger::init();

    info!("Starting macs_io...");

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

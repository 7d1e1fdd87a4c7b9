//! A raw capture together with everything stored next to it

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, instrument, warn};

use crate::image_pipeline::common::error::{MacsError, Result};
use crate::image_pipeline::container::{
    PayloadCompression, SaveOptions, read_container, write_container,
};
use crate::image_pipeline::correction::{
    CorrectedImage, CorrectionOptions, CorrectionPipeline, CpuCorrectionPipeline,
};
use crate::image_pipeline::export::{ExportConfig, ImageExporter, StandardTiffWriter};
use crate::image_pipeline::meta::{GeoPose, MetaData};
use crate::image_pipeline::preview::render_preview;
use crate::image_pipeline::raw::RawImage;

/// Raw image, metadata, geo reference and optional preview of one capture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacsImage {
    raw: RawImage,
    meta: MetaData,
    pose: GeoPose,
    preview: Option<Vec<u8>>,
    file_name: Option<PathBuf>,
}

impl MacsImage {
    pub fn new(raw: RawImage, meta: MetaData, pose: GeoPose) -> Self {
        Self {
            raw,
            meta,
            pose,
            preview: None,
            file_name: None,
        }
    }

    /// Reads a container file.
    ///
    /// # Errors
    ///
    /// `InputReadError` if the file cannot be read, otherwise any decoding
    /// error of [`read_container`].
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = {
            let _span = tracing::info_span!("read_input_file").entered();
            fs::read(path)
                .map_err(|e| MacsError::InputReadError(format!("{}: {}", path.display(), e)))?
        };
        let mut image = Self::from_bytes(&data)?;
        image.file_name = Some(path.to_path_buf());
        info!(
            width = image.raw.width(),
            height = image.raw.height(),
            format = %image.raw.format(),
            "Loaded MACS image"
        );
        Ok(image)
    }

    /// Decodes a container held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let contents = read_container(data)?;
        Ok(Self {
            raw: contents.raw,
            meta: contents.meta,
            pose: contents.pose,
            preview: contents.preview,
            file_name: None,
        })
    }

    /// Encodes the image as a container.
    ///
    /// A preview that cannot be rendered is left out with a warning.
    pub fn to_bytes(&self, options: SaveOptions) -> Result<Vec<u8>> {
        let preview = if options.preview {
            match self.render_preview() {
                Ok(jpeg) => Some(jpeg),
                Err(e) => {
                    warn!("Saving without preview: {}", e);
                    None
                }
            }
        } else {
            None
        };
        let compression = if options.compression {
            PayloadCompression::Zlib
        } else {
            PayloadCompression::None
        };
        write_container(
            &self.raw,
            &self.meta,
            &self.pose,
            preview.as_deref(),
            compression,
        )
    }

    /// Writes the container to `path`.
    ///
    /// The data goes to a temporary file in the destination directory which
    /// is then renamed over `path`; on failure no partial file is left.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save<P: AsRef<Path>>(&self, path: P, options: SaveOptions) -> Result<()> {
        let path = path.as_ref();
        let data = self.to_bytes(options)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let write_err = |e: std::io::Error| {
            MacsError::OutputWriteError(format!("{}: {}", path.display(), e))
        };

        let _span = tracing::info_span!("write_output_file", bytes = data.len()).entered();
        let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
        file.write_all(&data).map_err(write_err)?;
        file.as_file().sync_all().map_err(write_err)?;
        file.persist(path).map_err(|e| write_err(e.error))?;

        info!(bytes = data.len(), "Saved MACS image");
        Ok(())
    }

    /// Runs the CPU correction pipeline.
    pub fn corrected_image(&self, options: &CorrectionOptions) -> Result<CorrectedImage> {
        self.corrected_image_with(&CpuCorrectionPipeline::new(), options)
    }

    pub fn corrected_image_with<P: CorrectionPipeline>(
        &self,
        pipeline: &P,
        options: &CorrectionOptions,
    ) -> Result<CorrectedImage> {
        pipeline.run(&self.raw, options)
    }

    /// Corrected image reduced to 8 bits per sample.
    pub fn to_8bit(&self, options: &CorrectionOptions) -> Result<CorrectedImage> {
        let options = CorrectionOptions {
            convert_to_8bit: true,
            ..*options
        };
        self.corrected_image(&options)
    }

    /// Corrects the image and writes it to `path` as TIFF.
    pub fn export_tiff<P: AsRef<Path>>(
        &self,
        path: P,
        options: &CorrectionOptions,
        config: &ExportConfig,
    ) -> Result<()> {
        let path = path.as_ref();
        let image = self.corrected_image(options)?;
        let mut file = fs::File::create(path)
            .map_err(|e| MacsError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
        StandardTiffWriter.write_image(&image, &mut file, config)
    }

    fn render_preview(&self) -> Result<Vec<u8>> {
        render_preview(&self.to_8bit(&CorrectionOptions::default())?)
    }

    pub fn raw(&self) -> &RawImage {
        &self.raw
    }

    /// Replaces the pixel data, dropping the preview read with the old one.
    pub fn set_raw(&mut self, raw: RawImage) {
        self.raw = raw;
        self.preview = None;
    }

    pub fn meta(&self) -> &MetaData {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut MetaData {
        &mut self.meta
    }

    pub fn pose(&self) -> &GeoPose {
        &self.pose
    }

    pub fn pose_mut(&mut self) -> &mut GeoPose {
        &mut self.pose
    }

    /// JPEG thumbnail read from the container, if it had one.
    pub fn preview(&self) -> Option<&[u8]> {
        self.preview.as_deref()
    }

    /// Path the image was loaded from.
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }
}

//! Correction configuration types

use crate::image_pipeline::common::error::{MacsError, Result};

/// Linear stretch of `[min, max]` (fractions of the full range) followed by
/// gamma correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stretch {
    pub gamma: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for Stretch {
    fn default() -> Self {
        Self {
            gamma: 1.0,
            min: 0.0,
            max: 1.0,
        }
    }
}

impl Stretch {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-channel gain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBalance {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Default for ColorBalance {
    fn default() -> Self {
        Self {
            r: 1.0,
            g: 1.0,
            b: 1.0,
        }
    }
}

impl ColorBalance {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn gains(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

/// Radial vignetting model `v = a·r² + b·r + c`, applied as
/// `raw + v·factor + offset`.
///
/// `cx`/`cy` shift the center in units of half the image size, `offset` is
/// in native sample units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Devignetting {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub cx: f64,
    pub cy: f64,
    pub factor: f64,
    pub offset: f64,
}

impl Devignetting {
    pub fn is_identity(&self) -> bool {
        self.factor == 0.0 && self.offset == 0.0
    }
}

/// Radial lens distortion `s = 1 + k1·r² + k2·r⁴ + k3·r⁶`, with `r` in
/// pixels from the principal point.
///
/// A negative `cx_px`/`cy_px` selects the image center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distortion {
    pub cx_px: f64,
    pub cy_px: f64,
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
}

impl Default for Distortion {
    fn default() -> Self {
        Self {
            cx_px: -1.0,
            cy_px: -1.0,
            k1: 0.0,
            k2: 0.0,
            k3: 0.0,
        }
    }
}

impl Distortion {
    pub fn is_identity(&self) -> bool {
        self.k1 == 0.0 && self.k2 == 0.0 && self.k3 == 0.0
    }

    /// Principal point for a `width`×`height` image.
    pub fn principal_point(&self, width: usize, height: usize) -> (f64, f64) {
        let cx = if self.cx_px < 0.0 { 0.5 * width as f64 } else { self.cx_px };
        let cy = if self.cy_px < 0.0 { 0.5 * height as f64 } else { self.cy_px };
        (cx, cy)
    }
}

/// Configuration for turning a raw image into a viewable one.
///
/// The default is an identity transform that returns the debayered image at
/// its native precision.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorrectionOptions {
    pub stretch: Stretch,
    pub color_balance: ColorBalance,
    pub convert_to_8bit: bool,
    pub devignetting: Devignetting,
    pub distortion: Distortion,
}

impl CorrectionOptions {
    pub fn builder() -> CorrectionOptionsBuilder {
        CorrectionOptionsBuilder::default()
    }

    /// Checks every constraint on the option values.
    ///
    /// # Errors
    ///
    /// `InvalidOptions` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("stretch.gamma", self.stretch.gamma),
            ("stretch.min", self.stretch.min),
            ("stretch.max", self.stretch.max),
            ("color_balance.r", self.color_balance.r),
            ("color_balance.g", self.color_balance.g),
            ("color_balance.b", self.color_balance.b),
            ("devignetting.a", self.devignetting.a),
            ("devignetting.b", self.devignetting.b),
            ("devignetting.c", self.devignetting.c),
            ("devignetting.cx", self.devignetting.cx),
            ("devignetting.cy", self.devignetting.cy),
            ("devignetting.factor", self.devignetting.factor),
            ("devignetting.offset", self.devignetting.offset),
            ("distortion.cx_px", self.distortion.cx_px),
            ("distortion.cy_px", self.distortion.cy_px),
            ("distortion.k1", self.distortion.k1),
            ("distortion.k2", self.distortion.k2),
            ("distortion.k3", self.distortion.k3),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(MacsError::InvalidOptions(format!(
                "{name} must be finite, got {value}"
            )));
        }

        let Stretch { gamma, min, max } = self.stretch;
        if gamma <= 0.0 {
            return Err(MacsError::InvalidOptions(format!(
                "stretch.gamma must be positive, got {gamma}"
            )));
        }
        if min >= max {
            return Err(MacsError::InvalidOptions(format!(
                "stretch.min ({min}) must be less than stretch.max ({max})"
            )));
        }
        if min < 0.0 || max > 1.0 {
            return Err(MacsError::InvalidOptions(format!(
                "stretch range [{min}, {max}] must lie within [0, 1]"
            )));
        }
        if let Some(gain) = self.color_balance.gains().into_iter().find(|g| *g < 0.0) {
            return Err(MacsError::InvalidOptions(format!(
                "color balance gains must be non-negative, got {gain}"
            )));
        }
        Ok(())
    }
}

/// Builder for [`CorrectionOptions`]; unset groups keep their defaults.
#[derive(Default)]
pub struct CorrectionOptionsBuilder {
    stretch: Option<Stretch>,
    color_balance: Option<ColorBalance>,
    convert_to_8bit: Option<bool>,
    devignetting: Option<Devignetting>,
    distortion: Option<Distortion>,
}

impl CorrectionOptionsBuilder {
    pub fn stretch(mut self, stretch: Stretch) -> Self {
        self.stretch = Some(stretch);
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.stretch.get_or_insert_with(Stretch::default).gamma = gamma;
        self
    }

    pub fn stretch_range(mut self, min: f64, max: f64) -> Self {
        let stretch = self.stretch.get_or_insert_with(Stretch::default);
        stretch.min = min;
        stretch.max = max;
        self
    }

    pub fn color_balance(mut self, r: f64, g: f64, b: f64) -> Self {
        self.color_balance = Some(ColorBalance { r, g, b });
        self
    }

    pub fn convert_to_8bit(mut self, enable: bool) -> Self {
        self.convert_to_8bit = Some(enable);
        self
    }

    pub fn devignetting(mut self, devignetting: Devignetting) -> Self {
        self.devignetting = Some(devignetting);
        self
    }

    pub fn distortion(mut self, distortion: Distortion) -> Self {
        self.distortion = Some(distortion);
        self
    }

    /// # Errors
    ///
    /// `InvalidOptions` if the assembled options fail
    /// [`CorrectionOptions::validate`].
    pub fn build(self) -> Result<CorrectionOptions> {
        let options = CorrectionOptions {
            stretch: self.stretch.unwrap_or_default(),
            color_balance: self.color_balance.unwrap_or_default(),
            convert_to_8bit: self.convert_to_8bit.unwrap_or_default(),
            devignetting: self.devignetting.unwrap_or_default(),
            distortion: self.distortion.unwrap_or_default(),
        };
        options.validate()?;
        Ok(options)
    }
}

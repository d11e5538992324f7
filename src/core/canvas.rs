use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

pub const POINTS_PER_INCH: f64 = 72.0;

/// Axis selector for distance conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Fixed physical drawing area: size in inches plus resolution.
///
/// Every layout distance is expressed as a fraction of this canvas, so the
/// conversions below are the only place where inches, points and pixels meet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    width_in: f64,
    height_in: f64,
    dpi: f64,
}

impl Canvas {
    pub fn new(width_in: f64, height_in: f64, dpi: f64) -> ChartResult<Self> {
        let valid = |value: f64| value.is_finite() && value > 0.0;
        if !valid(width_in) || !valid(height_in) || !valid(dpi) {
            return Err(ChartError::InvalidCanvas {
                width: width_in,
                height: height_in,
                dpi,
            });
        }

        Ok(Self {
            width_in,
            height_in,
            dpi,
        })
    }

    #[must_use]
    pub fn size_inches(self) -> (f64, f64) {
        (self.width_in, self.height_in)
    }

    #[must_use]
    pub fn dpi(self) -> f64 {
        self.dpi
    }

    #[must_use]
    pub fn width_px(self) -> f64 {
        self.width_in * self.dpi
    }

    #[must_use]
    pub fn height_px(self) -> f64 {
        self.height_in * self.dpi
    }

    /// Integer pixel dimensions of raster output.
    #[must_use]
    pub fn pixel_size(self) -> (u32, u32) {
        (
            self.width_px().round().max(1.0) as u32,
            self.height_px().round().max(1.0) as u32,
        )
    }

    /// Ratio used to express vertical fractions along the horizontal axis.
    #[must_use]
    pub fn aspect_coefficient(self) -> f64 {
        self.height_in / self.width_in
    }

    fn extent_in(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width_in,
            Axis::Vertical => self.height_in,
        }
    }

    /// Converts a pixel distance into a canvas fraction along `axis`.
    #[must_use]
    pub fn pixels_to_fraction(self, pixels: f64, axis: Axis) -> f64 {
        pixels / (self.dpi * self.extent_in(axis))
    }

    #[must_use]
    pub fn fraction_to_pixels(self, fraction: f64, axis: Axis) -> f64 {
        fraction * self.dpi * self.extent_in(axis)
    }

    /// Converts a canvas fraction into typographic points along `axis`.
    #[must_use]
    pub fn fraction_to_points(self, fraction: f64, axis: Axis) -> f64 {
        fraction * self.extent_in(axis) * POINTS_PER_INCH
    }

    #[must_use]
    pub fn points_to_fraction(self, points: f64, axis: Axis) -> f64 {
        (points / POINTS_PER_INCH) / self.extent_in(axis)
    }

    #[must_use]
    pub fn points_to_pixels(self, points: f64) -> f64 {
        points * self.dpi / POINTS_PER_INCH
    }
}

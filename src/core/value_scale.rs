use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Share of the data span added past the maximum on linear axes.
pub const LINEAR_UPPER_MARGIN_RATIO: f64 = 0.05;

/// Mapping mode used by the value (horizontal) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScaleMode {
    #[default]
    Linear,
    Log10,
}

/// Maps bar values onto fractions of the plotting width.
///
/// Bars always start at the lower domain bound, so a bar's rendered length is
/// `fraction(value) * plot_width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueScale {
    mode: ScaleMode,
    domain_start: f64,
    domain_end: f64,
}

impl ValueScale {
    pub fn new(mode: ScaleMode, domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start >= domain_end {
            return Err(ChartError::InvalidData(
                "value scale domain must be finite and increasing".to_owned(),
            ));
        }
        if mode == ScaleMode::Log10 && domain_start <= 0.0 {
            return Err(ChartError::InvalidData(
                "log value scale domain must be > 0".to_owned(),
            ));
        }

        Ok(Self {
            mode,
            domain_start,
            domain_end,
        })
    }

    /// Fits a scale to the dataset extremes.
    ///
    /// Linear axes start at zero and leave a small margin past the maximum.
    /// Log axes snap to the enclosing decades of the positive values.
    pub fn from_extremes(mode: ScaleMode, minimum: f64, maximum: f64) -> ChartResult<Self> {
        if !minimum.is_finite() || !maximum.is_finite() || minimum < 0.0 || maximum < minimum {
            return Err(ChartError::InvalidData(
                "value extremes must be finite, >= 0 and ordered".to_owned(),
            ));
        }

        match mode {
            ScaleMode::Linear => {
                let end = if maximum > 0.0 {
                    maximum * (1.0 + LINEAR_UPPER_MARGIN_RATIO)
                } else {
                    1.0
                };
                Self::new(mode, 0.0, end)
            }
            ScaleMode::Log10 => {
                let smallest = if minimum > 0.0 { minimum } else { maximum.min(1.0) };
                let smallest = if smallest > 0.0 { smallest } else { 1.0 };
                let largest = maximum.max(smallest);
                let low = smallest.log10().floor();
                let mut high = largest.log10().ceil();
                if high <= low {
                    high = low + 1.0;
                }
                Self::new(mode, 10f64.powf(low), 10f64.powf(high))
            }
        }
    }

    #[must_use]
    pub fn mode(self) -> ScaleMode {
        self.mode
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.domain_start && value <= self.domain_end
    }

    /// Position of `value` as a fraction of the plotting width, clamped to the
    /// visible range.
    #[must_use]
    pub fn fraction(self, value: f64) -> f64 {
        let raw = match self.mode {
            ScaleMode::Linear => {
                (value - self.domain_start) / (self.domain_end - self.domain_start)
            }
            ScaleMode::Log10 => {
                if value <= 0.0 {
                    return 0.0;
                }
                let start = self.domain_start.log10();
                (value.log10() - start) / (self.domain_end.log10() - start)
            }
        };
        raw.clamp(0.0, 1.0)
    }

    /// Maps a value to an x pixel inside a plot spanning `plot_x0..plot_x0 + plot_width`.
    #[must_use]
    pub fn value_to_pixel(self, value: f64, plot_x0: f64, plot_width: f64) -> f64 {
        plot_x0 + self.fraction(value) * plot_width
    }
}

#[cfg(test)]
mod tests {
    use super::{ScaleMode, ValueScale};

    #[test]
    fn linear_scale_starts_at_zero_with_upper_margin() {
        let scale = ValueScale::from_extremes(ScaleMode::Linear, 2.0, 10.0).expect("scale");
        let (start, end) = scale.domain();
        assert_eq!(start, 0.0);
        assert!((end - 10.5).abs() <= 1e-12);
        assert!((scale.fraction(10.5) - 1.0).abs() <= 1e-12);
    }

    #[test]
    fn log_scale_snaps_to_enclosing_decades() {
        let scale = ValueScale::from_extremes(ScaleMode::Log10, 3.0, 4_500.0).expect("scale");
        assert_eq!(scale.domain(), (1.0, 10_000.0));
        assert_eq!(scale.fraction(0.0), 0.0);
        assert!((scale.fraction(100.0) - 0.5).abs() <= 1e-12);
    }

    #[test]
    fn all_zero_values_still_produce_a_usable_domain() {
        let scale = ValueScale::from_extremes(ScaleMode::Linear, 0.0, 0.0).expect("scale");
        assert_eq!(scale.domain(), (0.0, 1.0));
    }
}

use serde::{Deserialize, Serialize};

use crate::core::Canvas;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

use super::VAlign;

/// Per-chart styling and solver tuning.
///
/// Constructed once per chart and threaded through data preparation, layout
/// and frame building. Every field has a default, so partial JSON documents
/// deserialize and unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Iteration cap of the right-label bisection.
    pub right_label_max_iterations: usize,
    /// Lower bound of the plotting width (canvas fraction) during right-label fitting.
    pub min_plot_width: f64,
    /// Bisection stops once the search interval is narrower than this.
    pub right_label_tolerance: f64,
    /// Canvas size in inches.
    pub figsize: (f64, f64),
    pub dpi: f64,
    pub default_color: Color,
    pub default_label: String,
    pub tints: Vec<Color>,
    pub color_alpha: f64,
    /// Outer canvas margin, vertical canvas fraction.
    pub margin: f64,
    /// Gap between the title and the plot, vertical canvas fraction.
    pub title_pad: f64,
    /// Gap around axis labels and the legend, vertical canvas fraction.
    pub pad: f64,
    pub title_font_size: f64,
    pub axis_title_font_size: f64,
    pub data_font_size: f64,
    /// Vertical alignment of the left labels, copied by the right labels.
    pub bar_label_v_align: VAlign,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            right_label_max_iterations: 1000,
            min_plot_width: 0.01,
            right_label_tolerance: 0.001,
            figsize: (6.0, 5.0),
            dpi: 100.0,
            default_color: Color::BLACK,
            default_label: "else".to_owned(),
            tints: default_tints(),
            color_alpha: 0.8,
            margin: 0.05,
            title_pad: 0.04,
            pad: 0.02,
            title_font_size: 16.0,
            axis_title_font_size: 10.0,
            data_font_size: 8.0,
            bar_label_v_align: VAlign::Center,
        }
    }
}

fn default_tints() -> Vec<Color> {
    [
        (0x34, 0xa8, 0x54),
        (0xf8, 0xb4, 0x4e),
        (0xd5, 0x02, 0x09),
        (0x52, 0x84, 0xe5),
        (0xf7, 0x6c, 0x00),
        (0xa8, 0xa8, 0xa8),
        (0xeb, 0x66, 0xb4),
        (0x19, 0x19, 0x70),
        (0x66, 0x36, 0xa9),
    ]
    .into_iter()
    .map(|(red, green, blue)| {
        Color::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    })
    .collect()
}

impl StyleConfig {
    /// Parses a (possibly partial) JSON style document.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let style: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse style json: {e}")))?;
        style.validate()
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize style: {e}")))
    }

    pub fn canvas(&self) -> ChartResult<Canvas> {
        Canvas::new(self.figsize.0, self.figsize.1, self.dpi)
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.canvas()?;

        if self.right_label_max_iterations == 0 {
            return Err(ChartError::InvalidConfig(
                "right_label_max_iterations must be > 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("min_plot_width", self.min_plot_width),
            ("right_label_tolerance", self.right_label_tolerance),
            ("title_font_size", self.title_font_size),
            ("axis_title_font_size", self.axis_title_font_size),
            ("data_font_size", self.data_font_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "`{name}` must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("margin", self.margin),
            ("title_pad", self.title_pad),
            ("pad", self.pad),
        ] {
            if !value.is_finite() || !(0.0..0.5).contains(&value) {
                return Err(ChartError::InvalidConfig(format!(
                    "`{name}` must be finite and in [0, 0.5)"
                )));
            }
        }
        if self.min_plot_width >= 1.0 {
            return Err(ChartError::InvalidConfig(
                "`min_plot_width` must be < 1".to_owned(),
            ));
        }
        if !self.color_alpha.is_finite() || !(0.0..=1.0).contains(&self.color_alpha) {
            return Err(ChartError::InvalidConfig(
                "`color_alpha` must be in [0, 1]".to_owned(),
            ));
        }
        self.default_color.validate()?;
        for tint in &self.tints {
            tint.validate()?;
        }

        Ok(self)
    }

    /// Converts a font size in points to canvas pixels.
    #[must_use]
    pub fn font_px(&self, points: f64) -> f64 {
        points * self.dpi / crate::core::POINTS_PER_INCH
    }
}

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Order in which slicing and the statistics-dependent steps run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Slice first; sorting, coloring, bounds and automatic labels only see
    /// the retained bars.
    #[default]
    SlicedView,
    /// Sort, color, bound and label over the whole dataset, then slice.
    GlobalView,
}

/// Highlighted vertical reference line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VerticalLineDescriptor")]
pub struct VerticalLine {
    pub number: f64,
    pub color: Color,
    pub label: String,
}

#[derive(Deserialize)]
struct VerticalLineDescriptor {
    number: Option<f64>,
    color: Option<Color>,
    label: Option<String>,
}

impl TryFrom<VerticalLineDescriptor> for VerticalLine {
    type Error = ChartError;

    fn try_from(raw: VerticalLineDescriptor) -> Result<Self, Self::Error> {
        let (Some(number), Some(color), Some(label)) = (raw.number, raw.color, raw.label) else {
            return Err(missing_vertical_line_keys());
        };
        Self::new(number, color, label)
    }
}

fn missing_vertical_line_keys() -> ChartError {
    ChartError::InvalidConfig(
        "vertical line has to define three keys: 'number', 'label' and 'color'".to_owned(),
    )
}

impl VerticalLine {
    pub fn new(number: f64, color: Color, label: impl Into<String>) -> ChartResult<Self> {
        if !number.is_finite() {
            return Err(ChartError::InvalidConfig(
                "vertical line number must be finite".to_owned(),
            ));
        }
        color.validate()?;
        Ok(Self {
            number,
            color,
            label: label.into(),
        })
    }

    /// Parses a `{"number": .., "label": .., "color": ..}` descriptor.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse vertical line json: {e}"))
        })?;
        let has_all_keys = value.as_object().is_some_and(|object| {
            ["number", "label", "color"]
                .iter()
                .all(|key| object.contains_key(*key))
        });
        if !has_all_keys {
            return Err(missing_vertical_line_keys());
        }
        serde_json::from_value(value)
            .map_err(|e| ChartError::InvalidConfig(format!("invalid vertical line: {e}")))
    }

    /// The line is only drawn inside the data extremes.
    #[must_use]
    pub fn is_within(&self, minimum: f64, maximum: f64) -> bool {
        minimum <= self.number && self.number <= maximum
    }
}

/// Chart construction options besides the data arrays and styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    /// Sort bars by value, largest on top.
    pub sort: bool,
    /// One-based, inclusive `(start, stop)` range of bars to keep.
    pub slice: Option<(usize, usize)>,
    pub view_mode: ViewMode,
    /// Switch to a log10 value axis when magnitudes spread widely.
    pub auto_scale: bool,
    /// Explicit category -> color map, overriding the automatic tints.
    pub color_dic: Option<IndexMap<String, Color>>,
    pub vertical_line: Option<VerticalLine>,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub legend_title: Option<String>,
    pub legend_visible: bool,
    /// PNG destination written by callers that own a raster backend.
    pub file_name: Option<PathBuf>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            sort: false,
            slice: None,
            view_mode: ViewMode::SlicedView,
            auto_scale: false,
            color_dic: None,
            vertical_line: None,
            title: None,
            xlabel: None,
            ylabel: None,
            legend_title: None,
            legend_visible: true,
            file_name: None,
        }
    }
}

impl ChartOptions {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse chart options: {e}")))
    }

    #[must_use]
    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn with_slice(mut self, start: usize, stop: usize) -> Self {
        self.slice = Some((start, stop));
        self
    }

    #[must_use]
    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    #[must_use]
    pub fn with_auto_scale(mut self, auto_scale: bool) -> Self {
        self.auto_scale = auto_scale;
        self
    }

    #[must_use]
    pub fn with_color_dic(mut self, color_dic: IndexMap<String, Color>) -> Self {
        self.color_dic = Some(color_dic);
        self
    }

    #[must_use]
    pub fn with_vertical_line(mut self, line: VerticalLine) -> Self {
        self.vertical_line = Some(line);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_xlabel(mut self, xlabel: impl Into<String>) -> Self {
        self.xlabel = Some(xlabel.into());
        self
    }

    #[must_use]
    pub fn with_ylabel(mut self, ylabel: impl Into<String>) -> Self {
        self.ylabel = Some(ylabel.into());
        self
    }

    #[must_use]
    pub fn with_legend_title(mut self, legend_title: impl Into<String>) -> Self {
        self.legend_title = Some(legend_title.into());
        self
    }

    #[must_use]
    pub fn with_legend_visible(mut self, legend_visible: bool) -> Self {
        self.legend_visible = legend_visible;
        self
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<PathBuf>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

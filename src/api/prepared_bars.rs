use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

use super::{ChartOptions, StyleConfig, ViewMode};

/// Where the text of a label column comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LabelSource {
    #[default]
    None,
    /// One-based position of each bar.
    Rank,
    /// Share of each bar in the total, in percent.
    Proportion,
    Values(Vec<String>),
}

impl LabelSource {
    /// Parses the textual options `rank` and `proportion`.
    pub fn from_option(option: &str) -> ChartResult<Self> {
        match option {
            "rank" => Ok(Self::Rank),
            "proportion" => Ok(Self::Proportion),
            other => Err(ChartError::InvalidConfig(format!(
                "`{other}` is not a label option: use a label list, 'rank' or 'proportion'"
            ))),
        }
    }

    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Values(values.into_iter().map(Into::into).collect())
    }

    fn explicit_len(&self) -> Option<usize> {
        match self {
            Self::Values(values) => Some(values.len()),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelSourceRepr {
    Option(String),
    Values(Vec<String>),
}

impl Serialize for LabelSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_none(),
            Self::Rank => serializer.serialize_str("rank"),
            Self::Proportion => serializer.serialize_str("proportion"),
            Self::Values(values) => values.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for LabelSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<LabelSourceRepr>::deserialize(deserializer)? {
            None => Ok(Self::None),
            Some(LabelSourceRepr::Values(values)) => Ok(Self::Values(values)),
            Some(LabelSourceRepr::Option(option)) => {
                Self::from_option(&option).map_err(serde::de::Error::custom)
            }
        }
    }
}

/// Raw parallel arrays handed to the chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BarsInput {
    pub numbers: Vec<f64>,
    #[serde(default)]
    pub left_labels: LabelSource,
    #[serde(default)]
    pub right_labels: LabelSource,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl BarsInput {
    #[must_use]
    pub fn new(numbers: Vec<f64>) -> Self {
        Self {
            numbers,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_left_labels(mut self, labels: LabelSource) -> Self {
        self.left_labels = labels;
        self
    }

    #[must_use]
    pub fn with_right_labels(mut self, labels: LabelSource) -> Self {
        self.right_labels = labels;
        self
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    /// Checks the array contract before any processing.
    pub fn validate(&self, slice: Option<(usize, usize)>) -> ChartResult<()> {
        let len = self.numbers.len();
        if len == 0 {
            return Err(ChartError::InvalidData(
                "at least one number is required".to_owned(),
            ));
        }

        for (name, other) in [
            ("left_labels", self.left_labels.explicit_len()),
            ("right_labels", self.right_labels.explicit_len()),
            ("categories", self.categories.as_ref().map(Vec::len)),
        ] {
            if let Some(other) = other {
                if other != len {
                    return Err(ChartError::InvalidData(format!(
                        "feature containers have to be the same length: numbers has {len}, {name} has {other}"
                    )));
                }
            }
        }

        for (position, value) in self.numbers.iter().copied().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "supplied numbers have to be finite and non-negative ({value} at the zero-based position {position})"
                )));
            }
        }

        if let Some((start, stop)) = slice {
            if start == 0 || start > stop || stop > len {
                return Err(ChartError::InvalidConfig(format!(
                    "slice ({start}, {stop}) is not valid for {len} bars (one-based, inclusive)"
                )));
            }
        }

        Ok(())
    }
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

/// Borrowed view of one prepared bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar<'a> {
    pub value: f64,
    pub left_label: Option<&'a str>,
    pub color: Color,
}

/// Bars ready for layout, stored bottom-to-top (drawing order).
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedBars {
    numbers: Vec<f64>,
    left_labels: Option<Vec<String>>,
    right_labels: Option<Vec<String>>,
    categories: Option<Vec<String>>,
    colors: Option<Vec<Color>>,
    legend: Vec<LegendEntry>,
    default_color: Color,
    minimum: f64,
    maximum: f64,
    spread: u32,
}

impl PreparedBars {
    /// Validates `input` and runs the cut / sort / label / color pipeline in
    /// the order selected by `options.view_mode`.
    pub fn prepare(
        input: BarsInput,
        options: &ChartOptions,
        style: &StyleConfig,
    ) -> ChartResult<Self> {
        input.validate(options.slice)?;
        if let Some(color_dic) = &options.color_dic {
            for color in color_dic.values() {
                color.validate()?;
            }
        }

        let BarsInput {
            numbers,
            left_labels,
            right_labels,
            categories,
        } = input;
        let mut columns = Columns {
            numbers,
            left_labels: explicit(&left_labels),
            right_labels: explicit(&right_labels),
            categories,
            colors: None,
        };
        let sources = LabelSources {
            left: left_labels,
            right: right_labels,
        };

        let stats = match options.view_mode {
            ViewMode::SlicedView => {
                if let Some(slice) = options.slice {
                    columns.cut(slice);
                }
                columns.build(&sources, options, style)
            }
            ViewMode::GlobalView => {
                let stats = columns.build(&sources, options, style);
                if let Some(slice) = options.slice {
                    columns.cut(slice);
                }
                stats
            }
        };
        columns.reverse();

        debug!(
            bars = columns.numbers.len(),
            minimum = stats.minimum,
            maximum = stats.maximum,
            spread = stats.spread,
            legend_entries = stats.legend.len(),
            "prepared bars"
        );

        Ok(Self {
            numbers: columns.numbers,
            left_labels: columns.left_labels,
            right_labels: columns.right_labels,
            categories: columns.categories,
            colors: columns.colors,
            legend: stats.legend,
            default_color: style.default_color,
            minimum: stats.minimum,
            maximum: stats.maximum,
            spread: stats.spread,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Values bottom-to-top; index 0 is the lowest bar.
    #[must_use]
    pub fn numbers(&self) -> &[f64] {
        &self.numbers
    }

    /// Values in reading order, top bar first.
    #[must_use]
    pub fn top_to_bottom_numbers(&self) -> Vec<f64> {
        self.numbers.iter().rev().copied().collect()
    }

    #[must_use]
    pub fn left_labels(&self) -> Option<&[String]> {
        self.left_labels.as_deref()
    }

    #[must_use]
    pub fn right_labels(&self) -> Option<&[String]> {
        self.right_labels.as_deref()
    }

    #[must_use]
    pub fn categories(&self) -> Option<&[String]> {
        self.categories.as_deref()
    }

    /// Resolved per-bar colors; `None` when no categories were supplied.
    #[must_use]
    pub fn colors(&self) -> Option<&[Color]> {
        self.colors.as_deref()
    }

    #[must_use]
    pub fn bar_color(&self, index: usize) -> Color {
        self.colors
            .as_ref()
            .and_then(|colors| colors.get(index).copied())
            .unwrap_or(self.default_color)
    }

    #[must_use]
    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    #[must_use]
    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    #[must_use]
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Difference between the largest and smallest decimal magnitude.
    #[must_use]
    pub fn spread(&self) -> u32 {
        self.spread
    }

    pub fn bars(&self) -> impl Iterator<Item = Bar<'_>> + '_ {
        (0..self.numbers.len()).map(move |index| Bar {
            value: self.numbers[index],
            left_label: label_at(self.left_labels.as_deref(), index),
            color: self.bar_color(index),
        })
    }
}

fn label_at(labels: Option<&[String]>, index: usize) -> Option<&str> {
    labels.and_then(|labels| labels.get(index)).map(String::as_str)
}

fn explicit(source: &LabelSource) -> Option<Vec<String>> {
    match source {
        LabelSource::Values(values) => Some(values.clone()),
        _ => None,
    }
}

struct LabelSources {
    left: LabelSource,
    right: LabelSource,
}

struct BuildStats {
    minimum: f64,
    maximum: f64,
    spread: u32,
    legend: Vec<LegendEntry>,
}

struct Columns {
    numbers: Vec<f64>,
    left_labels: Option<Vec<String>>,
    right_labels: Option<Vec<String>>,
    categories: Option<Vec<String>>,
    colors: Option<Vec<Color>>,
}

impl Columns {
    fn build(
        &mut self,
        sources: &LabelSources,
        options: &ChartOptions,
        style: &StyleConfig,
    ) -> BuildStats {
        let (minimum, maximum) = if options.sort {
            self.sort_descending();
            (
                self.numbers.last().copied().unwrap_or(0.0),
                self.numbers.first().copied().unwrap_or(0.0),
            )
        } else {
            self.numbers
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), value| {
                    (low.min(*value), high.max(*value))
                })
        };

        if self.left_labels.is_none() {
            self.left_labels = automatic_labels(&sources.left, &self.numbers);
        }
        if self.right_labels.is_none() {
            self.right_labels = automatic_labels(&sources.right, &self.numbers);
        }

        let legend = match &self.categories {
            Some(categories) => {
                let color_dic = options
                    .color_dic
                    .clone()
                    .unwrap_or_else(|| automatic_color_dic(categories, &style.tints));
                let (colors, legend) = resolve_colors(categories, &color_dic, style);
                self.colors = Some(colors);
                legend
            }
            None => Vec::new(),
        };

        BuildStats {
            minimum,
            maximum,
            spread: spread(minimum, maximum),
            legend,
        }
    }

    fn sort_descending(&mut self) {
        let mut order: Vec<usize> = (0..self.numbers.len()).collect();
        order.sort_by(|&left, &right| self.compare_rows(right, left));

        self.numbers = order.iter().map(|&index| self.numbers[index]).collect();
        permute(&mut self.left_labels, &order);
        permute(&mut self.right_labels, &order);
        permute(&mut self.categories, &order);
        permute(&mut self.colors, &order);
    }

    /// Row order: value first, then the label columns as tie-breakers.
    fn compare_rows(&self, left: usize, right: usize) -> Ordering {
        let text = |column: &Option<Vec<String>>| {
            column
                .as_ref()
                .map_or(Ordering::Equal, |values| values[left].cmp(&values[right]))
        };
        self.numbers[left]
            .total_cmp(&self.numbers[right])
            .then_with(|| text(&self.left_labels))
            .then_with(|| text(&self.right_labels))
            .then_with(|| text(&self.categories))
    }

    /// Keeps the one-based inclusive range `start..=stop`.
    fn cut(&mut self, (start, stop): (usize, usize)) {
        let range = start - 1..stop;
        self.numbers = self.numbers[range.clone()].to_vec();
        cut_column(&mut self.left_labels, range.clone());
        cut_column(&mut self.right_labels, range.clone());
        cut_column(&mut self.categories, range.clone());
        cut_column(&mut self.colors, range);
    }

    fn reverse(&mut self) {
        self.numbers.reverse();
        for column in [
            &mut self.left_labels,
            &mut self.right_labels,
            &mut self.categories,
        ] {
            if let Some(values) = column {
                values.reverse();
            }
        }
        if let Some(colors) = &mut self.colors {
            colors.reverse();
        }
    }
}

fn permute<T: Clone>(column: &mut Option<Vec<T>>, order: &[usize]) {
    if let Some(values) = column {
        *values = order.iter().map(|&index| values[index].clone()).collect();
    }
}

fn cut_column<T: Clone>(column: &mut Option<Vec<T>>, range: std::ops::Range<usize>) {
    if let Some(values) = column {
        *values = values[range].to_vec();
    }
}

fn automatic_labels(source: &LabelSource, numbers: &[f64]) -> Option<Vec<String>> {
    match source {
        LabelSource::Rank => Some((1..=numbers.len()).map(|rank| rank.to_string()).collect()),
        LabelSource::Proportion => {
            let total: f64 = numbers.iter().sum();
            Some(
                numbers
                    .iter()
                    .map(|value| {
                        let share = if total > 0.0 { value / total } else { 0.0 };
                        format_percentage(share)
                    })
                    .collect(),
            )
        }
        LabelSource::None | LabelSource::Values(_) => None,
    }
}

/// `0.127` -> `13 %`; shares rounding below one percent print as `< 1 %`.
#[must_use]
pub fn format_percentage(share: f64) -> String {
    let percent = (100.0 * share).round();
    if percent < 1.0 {
        "< 1 %".to_owned()
    } else {
        format!("{percent} %")
    }
}

/// Decimal magnitude: 0 below one, otherwise the digit count of the integer part.
#[must_use]
pub fn magnitude(value: f64) -> u32 {
    if value < 1.0 {
        0
    } else {
        value.log10().floor() as u32 + 1
    }
}

fn spread(minimum: f64, maximum: f64) -> u32 {
    let (low, high) = (magnitude(minimum), magnitude(maximum));
    high.max(low) - high.min(low)
}

/// Maps the most common categories to tints, ties broken by first appearance.
fn automatic_color_dic(categories: &[String], tints: &[Color]) -> IndexMap<String, Color> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for category in categories {
        *counts.entry(category.as_str()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|left, right| right.1.cmp(&left.1));

    ranked
        .into_iter()
        .zip(tints.iter().copied())
        .map(|((category, _), tint)| (category.to_owned(), tint))
        .collect()
}

fn resolve_colors(
    categories: &[String],
    color_dic: &IndexMap<String, Color>,
    style: &StyleConfig,
) -> (Vec<Color>, Vec<LegendEntry>) {
    let mut residual = false;
    let colors: Vec<Color> = categories
        .iter()
        .map(|category| {
            color_dic.get(category).copied().unwrap_or_else(|| {
                residual = true;
                style.default_color
            })
        })
        .collect();

    let mut legend: Vec<LegendEntry> = color_dic
        .iter()
        .map(|(label, color)| LegendEntry {
            label: label.clone(),
            color: *color,
        })
        .collect();
    legend.sort_by(|left, right| left.label.cmp(&right.label));
    if residual {
        legend.push(LegendEntry {
            label: style.default_label.clone(),
            color: style.default_color,
        });
    }

    (colors, legend)
}

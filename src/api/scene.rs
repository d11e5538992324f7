use std::collections::BTreeSet;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{
    Axis, Canvas, PixelRect, PlotRect, TextExtent, TickFormat, ValueScale, value_axis_ticks,
};
use crate::render::{Color, FontWeight, TextHAlign, TextMeasurer};

use super::{ChartOptions, PreparedBars, StyleConfig, VerticalLine};

pub const TICK_LENGTH_PT: f64 = 3.5;
pub const TICK_PAD_PT: f64 = 3.5;
/// Fraction of the bar count added above and below the bar stack.
pub const BAR_AXIS_MARGIN_RATIO: f64 = 0.05;

const LEGEND_HANDLE_LENGTH_EM: f64 = 2.0;
const LEGEND_HANDLE_HEIGHT_EM: f64 = 0.7;
const LEGEND_HANDLE_TEXT_PAD_EM: f64 = 0.8;
const LEGEND_LABEL_SPACING_EM: f64 = 0.25;

/// Optional decorations, resolved against the prepared data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decorations {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub legend_title: Option<String>,
    pub show_legend: bool,
    /// Present only when the line falls inside the data extremes.
    pub vertical_line: Option<VerticalLine>,
    /// Compact labels unless the scale is picked automatically.
    pub tick_format: TickFormat,
}

impl Decorations {
    #[must_use]
    pub fn resolve(options: &ChartOptions, data: &PreparedBars) -> Self {
        Self {
            title: options.title.clone(),
            xlabel: options.xlabel.clone(),
            ylabel: options.ylabel.clone(),
            legend_title: options.legend_title.clone(),
            show_legend: options.legend_visible && data.categories().is_some(),
            vertical_line: options
                .vertical_line
                .clone()
                .filter(|line| line.is_within(data.minimum(), data.maximum())),
            tick_format: if options.auto_scale {
                TickFormat::Plain
            } else {
                TickFormat::Compact
            },
        }
    }
}

/// Vertical alignment of a bar-aligned label relative to the bar centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VAlign {
    /// Text top on the bar centre.
    Top,
    #[default]
    Center,
    /// Text bottom on the bar centre.
    Bottom,
}

impl VAlign {
    /// Bottom and top pixel edges of a text of `height` anchored at `y`.
    #[must_use]
    pub fn span(self, y: f64, height: f64) -> (f64, f64) {
        match self {
            Self::Top => (y - height, y),
            Self::Center => (y - height * 0.5, y + height * 0.5),
            Self::Bottom => (y, y + height),
        }
    }
}

/// Data-space anchor of a left label, reused to align the right label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelAnchor {
    pub index: usize,
    pub y: f64,
    pub v_align: VAlign,
}

/// Text element placed by a render pass, with its pixel bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub bbox: PixelRect,
    pub font_size_px: f64,
    pub weight: FontWeight,
    pub h_align: TextHAlign,
    pub vertical: bool,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBar {
    pub index: usize,
    pub value: f64,
    pub bbox: PixelRect,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTick {
    pub value: f64,
    pub x: f64,
    pub label: PlacedText,
    pub in_bounds: bool,
    pub hidden: bool,
}

impl PlacedTick {
    /// Drawable: inside the axis bounds, not suppressed, with text.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.in_bounds && !self.hidden && !self.label.text.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegendHandle {
    Patch { bbox: PixelRect, color: Color },
    Line { x0: f64, x1: f64, y: f64, color: Color },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub handle: LegendHandle,
    pub label: PlacedText,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLegend {
    pub bbox: PixelRect,
    pub title: Option<PlacedText>,
    pub rows: Vec<LegendRow>,
}

impl PlacedLegend {
    /// True when the vertically centred legend is taller than the canvas.
    #[must_use]
    pub fn overflows(&self, canvas_height: f64) -> bool {
        self.bbox.y0 < 0.0 || self.bbox.y1 > canvas_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedLine {
    pub x: f64,
    pub y0: f64,
    pub y1: f64,
    pub color: Color,
    pub width_px: f64,
}

/// Everything one render pass placed, in canvas pixels (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub tick_length_px: f64,
    pub plot: PixelRect,
    pub bars: Vec<PlacedBar>,
    pub y_tick_labels: Vec<PlacedText>,
    pub label_anchors: Vec<LabelAnchor>,
    pub right_labels: Vec<(usize, PlacedText)>,
    pub x_ticks: Vec<PlacedTick>,
    pub title: Option<PlacedText>,
    pub x_label: Option<PlacedText>,
    pub y_label: Option<PlacedText>,
    pub legend: Option<PlacedLegend>,
    pub vertical_line: Option<PlacedLine>,
}

impl Scene {
    /// Every text box drawn by this scene, hidden ticks excluded.
    pub fn visible_texts(&self) -> impl Iterator<Item = &PlacedText> + '_ {
        self.title
            .iter()
            .chain(self.y_tick_labels.iter())
            .chain(self.right_labels.iter().map(|(_, label)| label))
            .chain(
                self.x_ticks
                    .iter()
                    .filter(|tick| tick.is_visible())
                    .map(|tick| &tick.label),
            )
            .chain(self.x_label.iter())
            .chain(self.y_label.iter())
            .chain(self.legend.iter().flat_map(|legend| {
                legend
                    .title
                    .iter()
                    .chain(legend.rows.iter().map(|row| &row.label))
            }))
            .filter(|text| !text.text.is_empty())
    }
}

/// Solver-owned inputs of a render pass besides the static chart content.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub rect: PlotRect,
    /// Left edge of the legend box as a canvas fraction, once anchored.
    pub legend_anchor: Option<f64>,
    pub hidden_ticks: BTreeSet<OrderedFloat<f64>>,
}

impl SceneState {
    #[must_use]
    pub fn new(rect: PlotRect) -> Self {
        Self {
            rect,
            legend_anchor: None,
            hidden_ticks: BTreeSet::new(),
        }
    }
}

/// Places every chart element for a given plot rectangle and measures it.
pub struct SceneBuilder<'a, M: TextMeasurer + ?Sized> {
    canvas: Canvas,
    style: &'a StyleConfig,
    data: &'a PreparedBars,
    scale: ValueScale,
    decorations: &'a Decorations,
    measurer: &'a M,
}

impl<'a, M: TextMeasurer + ?Sized> SceneBuilder<'a, M> {
    pub fn new(
        canvas: Canvas,
        style: &'a StyleConfig,
        data: &'a PreparedBars,
        scale: ValueScale,
        decorations: &'a Decorations,
        measurer: &'a M,
    ) -> Self {
        Self {
            canvas,
            style,
            data,
            scale,
            decorations,
            measurer,
        }
    }

    #[must_use]
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    #[must_use]
    pub fn decorations(&self) -> &Decorations {
        self.decorations
    }

    #[must_use]
    pub fn data(&self) -> &PreparedBars {
        self.data
    }

    #[must_use]
    pub fn build(&self, state: &SceneState) -> Scene {
        let canvas_width = self.canvas.width_px();
        let canvas_height = self.canvas.height_px();
        let rect = state.rect;
        let plot = PixelRect::from_origin_size(
            rect.x0 * canvas_width,
            rect.y0 * canvas_height,
            rect.width * canvas_width,
            rect.height * canvas_height,
        );

        let bars = self.place_bars(plot);
        let (y_tick_labels, label_anchors) = self.place_left_labels(plot);
        let right_labels = self.place_right_labels(plot, &bars, &label_anchors);
        let x_ticks = self.place_x_ticks(plot, &state.hidden_ticks);
        let title = self.place_title(plot);
        let y_label = self.place_y_label(plot, &y_tick_labels);
        let x_label = self.place_x_label(plot, &x_ticks);
        let legend = self.place_legend(state.legend_anchor, canvas_width, canvas_height);
        let vertical_line = self.decorations.vertical_line.as_ref().map(|line| PlacedLine {
            x: self.scale.value_to_pixel(line.number, plot.x0, plot.width()),
            y0: plot.y0,
            y1: plot.y1,
            color: line.color.with_alpha(self.style.color_alpha),
            width_px: self.canvas.points_to_pixels(2.0),
        });

        Scene {
            canvas_width,
            canvas_height,
            tick_length_px: self.canvas.points_to_pixels(TICK_LENGTH_PT),
            plot,
            bars,
            y_tick_labels,
            label_anchors,
            right_labels,
            x_ticks,
            title,
            x_label,
            y_label,
            legend,
            vertical_line,
        }
    }

    fn data_font_px(&self) -> f64 {
        self.style.font_px(self.style.data_font_size)
    }

    fn axis_title_font_px(&self) -> f64 {
        self.style.font_px(self.style.axis_title_font_size)
    }

    fn measure(&self, text: &str, font_size_px: f64, weight: FontWeight) -> TextExtent {
        self.measurer.measure(text, font_size_px, weight)
    }

    /// Data y limits of the bar stack: bars of height one centred on their index.
    fn bar_axis_limits(&self) -> (f64, f64) {
        let count = self.data.len() as f64;
        let margin = BAR_AXIS_MARGIN_RATIO * count;
        (-0.5 - margin, count - 0.5 + margin)
    }

    fn data_y_to_pixel(&self, y: f64, plot: PixelRect) -> f64 {
        let (low, high) = self.bar_axis_limits();
        plot.y0 + (y - low) / (high - low) * plot.height()
    }

    fn place_bars(&self, plot: PixelRect) -> Vec<PlacedBar> {
        self.data
            .bars()
            .enumerate()
            .map(|(index, bar)| {
                let center = index as f64;
                let bottom = self.data_y_to_pixel(center - 0.5, plot);
                let top = self.data_y_to_pixel(center + 0.5, plot);
                let end = self.scale.value_to_pixel(bar.value, plot.x0, plot.width());
                PlacedBar {
                    index,
                    value: bar.value,
                    bbox: PixelRect::new(plot.x0, bottom, end, top),
                    color: bar.color.with_alpha(self.style.color_alpha),
                }
            })
            .collect()
    }

    fn place_left_labels(&self, plot: PixelRect) -> (Vec<PlacedText>, Vec<LabelAnchor>) {
        let font_size_px = self.data_font_px();
        let right_edge = plot.x0 - self.canvas.points_to_pixels(TICK_PAD_PT);

        self.data
            .bars()
            .enumerate()
            .map(|(index, bar)| {
                let text = bar.left_label.unwrap_or_default().to_owned();
                let extent = self.measure(&text, font_size_px, FontWeight::Normal);
                let v_align = self.style.bar_label_v_align;
                let (bottom, top) =
                    v_align.span(self.data_y_to_pixel(index as f64, plot), extent.height);
                let placed = PlacedText {
                    text,
                    bbox: PixelRect::new(right_edge - extent.width, bottom, right_edge, top),
                    font_size_px,
                    weight: FontWeight::Normal,
                    h_align: TextHAlign::Right,
                    vertical: false,
                    color: Color::BLACK,
                };
                let anchor = LabelAnchor {
                    index,
                    y: index as f64,
                    v_align,
                };
                (placed, anchor)
            })
            .unzip()
    }

    fn place_right_labels(
        &self,
        plot: PixelRect,
        bars: &[PlacedBar],
        anchors: &[LabelAnchor],
    ) -> Vec<(usize, PlacedText)> {
        let Some(labels) = self.data.right_labels() else {
            return Vec::new();
        };
        let font_size_px = self.data_font_px();

        anchors
            .iter()
            .filter_map(|anchor| {
                let label = labels.get(anchor.index)?;
                let bar = bars.get(anchor.index)?;
                let text = format!(" {label}");
                let extent = self.measure(&text, font_size_px, FontWeight::Normal);
                let (bottom, top) = anchor
                    .v_align
                    .span(self.data_y_to_pixel(anchor.y, plot), extent.height);
                let placed = PlacedText {
                    text,
                    bbox: PixelRect::new(bar.bbox.x1, bottom, bar.bbox.x1 + extent.width, top),
                    font_size_px,
                    weight: FontWeight::Normal,
                    h_align: TextHAlign::Left,
                    vertical: false,
                    color: Color::BLACK,
                };
                Some((anchor.index, placed))
            })
            .collect()
    }

    fn place_x_ticks(
        &self,
        plot: PixelRect,
        hidden: &BTreeSet<OrderedFloat<f64>>,
    ) -> Vec<PlacedTick> {
        let font_size_px = self.data_font_px();
        let top = plot.y0 - self.canvas.points_to_pixels(TICK_LENGTH_PT + TICK_PAD_PT);

        value_axis_ticks(self.scale, plot.width(), self.decorations.tick_format)
            .into_iter()
            .map(|tick| {
                let x = self.scale.value_to_pixel(tick.value, plot.x0, plot.width());
                let extent = self.measure(&tick.label, font_size_px, FontWeight::Normal);
                PlacedTick {
                    value: tick.value,
                    x,
                    in_bounds: self.scale.contains(tick.value),
                    hidden: hidden.contains(&OrderedFloat(tick.value)),
                    label: PlacedText {
                        text: tick.label,
                        bbox: PixelRect::new(
                            x - extent.width * 0.5,
                            top - extent.height,
                            x + extent.width * 0.5,
                            top,
                        ),
                        font_size_px,
                        weight: FontWeight::Normal,
                        h_align: TextHAlign::Center,
                        vertical: false,
                        color: Color::BLACK,
                    },
                }
            })
            .collect()
    }

    fn place_title(&self, plot: PixelRect) -> Option<PlacedText> {
        let title = self.decorations.title.as_ref()?;
        let font_size_px = self.style.font_px(self.style.title_font_size);
        let extent = self.measure(title, font_size_px, FontWeight::Bold);
        let bottom = plot.y1
            + self
                .canvas
                .fraction_to_pixels(self.style.title_pad, Axis::Vertical);
        let center = plot.center_x();
        Some(PlacedText {
            text: title.clone(),
            bbox: PixelRect::new(
                center - extent.width * 0.5,
                bottom,
                center + extent.width * 0.5,
                bottom + extent.height,
            ),
            font_size_px,
            weight: FontWeight::Bold,
            h_align: TextHAlign::Center,
            vertical: false,
            color: Color::BLACK,
        })
    }

    fn place_y_label(&self, plot: PixelRect, tick_labels: &[PlacedText]) -> Option<PlacedText> {
        let ylabel = self.decorations.ylabel.as_ref()?;
        let font_size_px = self.axis_title_font_px();
        let extent = self.measure(ylabel, font_size_px, FontWeight::Bold);
        let tick_edge = tick_labels
            .iter()
            .map(|label| label.bbox.x0)
            .fold(plot.x0, f64::min);
        let label_pad = self.canvas.fraction_to_pixels(
            self.canvas.aspect_coefficient() * self.style.pad,
            Axis::Horizontal,
        );
        let right = tick_edge - label_pad;
        let center = (plot.y0 + plot.y1) * 0.5;
        // Rotated a quarter turn: the measured height becomes the box width.
        Some(PlacedText {
            text: ylabel.clone(),
            bbox: PixelRect::new(
                right - extent.height,
                center - extent.width * 0.5,
                right,
                center + extent.width * 0.5,
            ),
            font_size_px,
            weight: FontWeight::Bold,
            h_align: TextHAlign::Center,
            vertical: true,
            color: Color::BLACK,
        })
    }

    fn place_x_label(&self, plot: PixelRect, ticks: &[PlacedTick]) -> Option<PlacedText> {
        let xlabel = self.decorations.xlabel.as_ref()?;
        let font_size_px = self.axis_title_font_px();
        let extent = self.measure(xlabel, font_size_px, FontWeight::Bold);
        let tick_edge = ticks
            .iter()
            .filter(|tick| tick.is_visible())
            .map(|tick| tick.label.bbox.y0)
            .fold(
                plot.y0 - self.canvas.points_to_pixels(TICK_LENGTH_PT + TICK_PAD_PT),
                f64::min,
            );
        let label_pad = self
            .canvas
            .fraction_to_pixels(self.style.pad, Axis::Vertical);
        let top = tick_edge - label_pad;
        let center = plot.center_x();
        Some(PlacedText {
            text: xlabel.clone(),
            bbox: PixelRect::new(
                center - extent.width * 0.5,
                top - extent.height,
                center + extent.width * 0.5,
                top,
            ),
            font_size_px,
            weight: FontWeight::Bold,
            h_align: TextHAlign::Center,
            vertical: false,
            color: Color::BLACK,
        })
    }

    fn place_legend(
        &self,
        anchor: Option<f64>,
        canvas_width: f64,
        canvas_height: f64,
    ) -> Option<PlacedLegend> {
        if !self.decorations.show_legend {
            return None;
        }
        let font_size_px = self.axis_title_font_px();
        let em = font_size_px;
        let handle_length = LEGEND_HANDLE_LENGTH_EM * em;
        let handle_height = LEGEND_HANDLE_HEIGHT_EM * em;
        let text_offset = handle_length + LEGEND_HANDLE_TEXT_PAD_EM * em;
        let spacing = LEGEND_LABEL_SPACING_EM * em;

        let alpha = self.style.color_alpha;
        let mut entries: Vec<(String, LegendSwatch)> = self
            .data
            .legend()
            .iter()
            .map(|entry| {
                (
                    entry.label.clone(),
                    LegendSwatch::Patch(entry.color.with_alpha(alpha)),
                )
            })
            .collect();
        if let Some(line) = &self.decorations.vertical_line {
            entries.push((
                line.label.clone(),
                LegendSwatch::Line(line.color.with_alpha(alpha)),
            ));
        }

        let title_extent = self
            .decorations
            .legend_title
            .as_ref()
            .map(|title| (title, self.measure(title, font_size_px, FontWeight::Bold)));
        let row_extents: Vec<TextExtent> = entries
            .iter()
            .map(|(label, _)| self.measure(label, font_size_px, FontWeight::Normal))
            .collect();

        let rows_width = row_extents
            .iter()
            .map(|extent| text_offset + extent.width)
            .fold(0.0, f64::max);
        let width = title_extent
            .map_or(0.0, |(_, extent)| extent.width)
            .max(rows_width);
        let row_heights: Vec<f64> = row_extents
            .iter()
            .map(|extent| extent.height.max(handle_height))
            .collect();
        let mut height = row_heights.iter().sum::<f64>()
            + spacing * row_heights.len().saturating_sub(1) as f64;
        if let Some((_, extent)) = title_extent {
            height += extent.height + spacing;
        }

        let left = anchor.unwrap_or(0.0) * canvas_width;
        let bottom = canvas_height * 0.5 - height * 0.5;
        let bbox = PixelRect::from_origin_size(left, bottom, width, height);

        let mut cursor = bbox.y1;
        let title = title_extent.map(|(text, extent)| {
            let center = bbox.center_x();
            let placed = PlacedText {
                text: text.clone(),
                bbox: PixelRect::new(
                    center - extent.width * 0.5,
                    cursor - extent.height,
                    center + extent.width * 0.5,
                    cursor,
                ),
                font_size_px,
                weight: FontWeight::Bold,
                h_align: TextHAlign::Center,
                vertical: false,
                color: Color::BLACK,
            };
            cursor -= extent.height + spacing;
            placed
        });

        let mut rows = Vec::with_capacity(entries.len());
        for (((label, swatch), extent), row_height) in
            entries.into_iter().zip(row_extents).zip(row_heights)
        {
            let middle = cursor - row_height * 0.5;
            let handle = match swatch {
                LegendSwatch::Patch(color) => LegendHandle::Patch {
                    bbox: PixelRect::new(
                        left,
                        middle - handle_height * 0.5,
                        left + handle_length,
                        middle + handle_height * 0.5,
                    ),
                    color,
                },
                LegendSwatch::Line(color) => LegendHandle::Line {
                    x0: left,
                    x1: left + handle_length,
                    y: middle,
                    color,
                },
            };
            rows.push(LegendRow {
                handle,
                label: PlacedText {
                    text: label,
                    bbox: PixelRect::new(
                        left + text_offset,
                        middle - extent.height * 0.5,
                        left + text_offset + extent.width,
                        middle + extent.height * 0.5,
                    ),
                    font_size_px,
                    weight: FontWeight::Normal,
                    h_align: TextHAlign::Left,
                    vertical: false,
                    color: Color::BLACK,
                },
            });
            cursor -= row_height + spacing;
        }

        Some(PlacedLegend { bbox, title, rows })
    }
}

enum LegendSwatch {
    Patch(Color),
    Line(Color),
}

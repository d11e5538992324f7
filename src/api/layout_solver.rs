use std::collections::BTreeSet;
use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::{Axis, Canvas, PixelRect, PlotRect};
use crate::error::ChartResult;
use crate::render::TextMeasurer;

use super::right_label_fitter::{RightLabelFit, RightLabelFitter, RightLabelSpan};
use super::scene::{LabelAnchor, Scene, SceneBuilder, SceneState, TICK_LENGTH_PT, TICK_PAD_PT};
use super::tick_declutter::declutter;
use super::StyleConfig;

/// Reservation steps, in the order the solver runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutStep {
    Init,
    Title,
    LeftLabels,
    YLabel,
    Legend,
    RightLabels,
    TickDeclutter,
    XLabel,
}

impl LayoutStep {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Title => "title",
            Self::LeftLabels => "left_labels",
            Self::YLabel => "ylabel",
            Self::Legend => "legend",
            Self::RightLabels => "right_labels",
            Self::TickDeclutter => "tick_declutter",
            Self::XLabel => "xlabel",
        }
    }
}

impl fmt::Display for LayoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Plot rectangle after one step and the canvas fraction that step reserved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutStepRecord {
    pub step: LayoutStep,
    pub rect: PlotRect,
    pub reserved: f64,
}

/// Result of a solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub plot_rect: PlotRect,
    /// Height/width aspect ratio converting vertical fractions to horizontal ones.
    pub x_coeff: f64,
    pub steps: SmallVec<[LayoutStepRecord; 8]>,
    /// Left edge of the legend as a canvas fraction.
    pub legend_anchor: Option<f64>,
    pub hidden_ticks: BTreeSet<OrderedFloat<f64>>,
    pub right_label_fit: Option<RightLabelFit>,
    pub left_label_anchors: Vec<LabelAnchor>,
    /// Lowest bottom edge of the surviving value-axis tick labels, in pixels.
    pub lowest_tick_edge_px: Option<f64>,
}

impl ChartLayout {
    #[must_use]
    pub fn scene_state(&self) -> SceneState {
        SceneState {
            rect: self.plot_rect,
            legend_anchor: self.legend_anchor,
            hidden_ticks: self.hidden_ticks.clone(),
        }
    }

    pub fn step_sequence(&self) -> impl Iterator<Item = LayoutStep> + '_ {
        self.steps.iter().map(|record| record.step)
    }

    #[must_use]
    pub fn record(&self, step: LayoutStep) -> Option<&LayoutStepRecord> {
        self.steps.iter().find(|record| record.step == step)
    }
}

/// Ordered reservation pipeline over repeated render passes.
///
/// Each step renders the chart for the current rectangle, measures the
/// element it owns and shrinks the rectangle by exactly that extent plus
/// padding. Steps never revisit earlier ones.
pub struct LayoutSolver<'a, M: TextMeasurer + ?Sized> {
    builder: &'a SceneBuilder<'a, M>,
    style: &'a StyleConfig,
}

impl<'a, M: TextMeasurer + ?Sized> LayoutSolver<'a, M> {
    pub fn new(builder: &'a SceneBuilder<'a, M>, style: &'a StyleConfig) -> Self {
        Self { builder, style }
    }

    pub fn solve(&self) -> ChartResult<ChartLayout> {
        let canvas = self.builder.canvas();
        let x_coeff = canvas.aspect_coefficient();
        let mut run = SolverRun {
            canvas,
            state: SceneState::new(PlotRect::with_margin(self.style.margin, x_coeff)?),
            steps: SmallVec::new(),
        };
        run.record(LayoutStep::Init, 0.0);

        let decorations = self.builder.decorations();

        if decorations.title.is_some() {
            let scene = self.render(&run.state);
            if let Some(title) = &scene.title {
                let reserved = run.vertical(title.bbox.height()) + self.style.title_pad;
                run.state.rect.shrink_top(reserved, LayoutStep::Title.name())?;
                run.record(LayoutStep::Title, reserved);
            }
        }

        let scene = self.render(&run.state);
        let left_label_anchors = scene.label_anchors.clone();
        let leftmost = scene
            .y_tick_labels
            .iter()
            .map(|label| label.bbox.x0)
            .fold(scene.plot.x0, f64::min);
        let reserved = (run.state.rect.x0 - run.horizontal(leftmost)).abs();
        run.state
            .rect
            .shrink_left(reserved, LayoutStep::LeftLabels.name())?;
        run.record(LayoutStep::LeftLabels, reserved);

        if decorations.ylabel.is_some() {
            let scene = self.render(&run.state);
            if let Some(ylabel) = &scene.y_label {
                let reserved = run.horizontal(ylabel.bbox.width()) + x_coeff * self.style.pad;
                run.state
                    .rect
                    .shrink_left(reserved, LayoutStep::YLabel.name())?;
                run.record(LayoutStep::YLabel, reserved);
            }
        }

        if decorations.show_legend {
            let scene = self.render(&run.state);
            if let Some(legend) = &scene.legend {
                if legend.overflows(scene.canvas_height) {
                    warn!(
                        rows = legend.rows.len(),
                        y0 = legend.bbox.y0,
                        y1 = legend.bbox.y1,
                        canvas_height = scene.canvas_height,
                        "legend is taller than the canvas and will be clipped"
                    );
                }
                let width = run.horizontal(legend.bbox.width());
                let reserved = width + x_coeff * self.style.pad;
                run.state
                    .rect
                    .shrink_right(reserved, LayoutStep::Legend.name())?;
                run.state.legend_anchor = Some(1.0 - width - x_coeff * self.style.margin);
                run.record(LayoutStep::Legend, reserved);
            }
        }

        let mut right_label_fit = None;
        if self.builder.data().right_labels().is_some() {
            let scene = self.render(&run.state);
            let spans = right_label_spans(&scene, run.canvas);
            let current = run.state.rect.width;
            let fit = RightLabelFitter::from_style(self.style).fit(current, &spans);
            let reserved = (current - fit.width).max(0.0);
            run.state
                .rect
                .shrink_right(reserved, LayoutStep::RightLabels.name())?;
            debug!(
                outcome = ?fit.outcome,
                iterations = fit.iterations,
                "right labels fitted"
            );
            run.record(LayoutStep::RightLabels, reserved);
            right_label_fit = Some(fit);
        }

        let scene = self.render(&run.state);
        let candidates: Vec<(f64, PixelRect)> = scene
            .x_ticks
            .iter()
            .filter(|tick| tick.is_visible())
            .map(|tick| (tick.value, tick.label.bbox))
            .collect();
        let boxes: Vec<PixelRect> = candidates.iter().map(|(_, bbox)| *bbox).collect();
        let decluttered = declutter(&boxes);
        run.state.hidden_ticks.extend(
            decluttered
                .hidden
                .iter()
                .filter_map(|index| candidates.get(*index))
                .map(|(value, _)| OrderedFloat(*value)),
        );
        debug!(
            kept = decluttered.kept.len(),
            hidden = decluttered.hidden.len(),
            "value axis tick labels decluttered"
        );
        run.record(LayoutStep::TickDeclutter, 0.0);

        let tick_edge_px = decluttered
            .lowest_edge_px
            .unwrap_or(scene.plot.y0 - run.canvas.points_to_pixels(TICK_LENGTH_PT + TICK_PAD_PT));
        let mut reserved = (run.state.rect.y0 - run.vertical(tick_edge_px)).abs();
        if decorations.xlabel.is_some() {
            let scene = self.render(&run.state);
            if let Some(xlabel) = &scene.x_label {
                reserved += run.vertical(xlabel.bbox.height()) + self.style.pad;
            }
        }
        run.state
            .rect
            .shrink_bottom(reserved, LayoutStep::XLabel.name())?;
        run.record(LayoutStep::XLabel, reserved);
        // Tick labels moved up with the plot bottom.
        let lowest_tick_edge_px = decluttered
            .lowest_edge_px
            .map(|edge| edge + run.canvas.fraction_to_pixels(reserved, Axis::Vertical));

        let SolverRun { state, steps, .. } = run;
        Ok(ChartLayout {
            plot_rect: state.rect,
            x_coeff,
            steps,
            legend_anchor: state.legend_anchor,
            hidden_ticks: state.hidden_ticks,
            right_label_fit,
            left_label_anchors,
            lowest_tick_edge_px,
        })
    }

    fn render(&self, state: &SceneState) -> Scene {
        self.builder.build(state)
    }
}

struct SolverRun {
    canvas: Canvas,
    state: SceneState,
    steps: SmallVec<[LayoutStepRecord; 8]>,
}

impl SolverRun {
    fn horizontal(&self, pixels: f64) -> f64 {
        self.canvas.pixels_to_fraction(pixels, Axis::Horizontal)
    }

    fn vertical(&self, pixels: f64) -> f64 {
        self.canvas.pixels_to_fraction(pixels, Axis::Vertical)
    }

    fn record(&mut self, step: LayoutStep, reserved: f64) {
        let rect = self.state.rect;
        debug!(
            step = step.name(),
            reserved,
            x0 = rect.x0,
            y0 = rect.y0,
            width = rect.width,
            height = rect.height,
            "layout step applied"
        );
        self.steps.push(LayoutStepRecord {
            step,
            rect,
            reserved,
        });
    }
}

fn right_label_spans(scene: &Scene, canvas: Canvas) -> Vec<RightLabelSpan> {
    let plot_width = scene.plot.width();
    if plot_width <= 0.0 {
        return Vec::new();
    }
    scene
        .right_labels
        .iter()
        .filter_map(|(index, label)| {
            let bar = scene.bars.get(*index)?;
            Some(RightLabelSpan::new(
                bar.bbox.width() / plot_width,
                canvas.pixels_to_fraction(label.bbox.width(), Axis::Horizontal),
            ))
        })
        .collect()
}

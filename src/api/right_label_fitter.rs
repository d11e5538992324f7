use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::StyleConfig;

/// One right-side label as seen by the width search.
///
/// `bar_ratio` is the bar's pixel width divided by the plotting width, so
/// it stays constant while the plot shrinks; `label_width` is the label's
/// pixel width as a fraction of the canvas width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RightLabelSpan {
    pub bar_ratio: f64,
    pub label_width: f64,
}

impl RightLabelSpan {
    #[must_use]
    pub fn new(bar_ratio: f64, label_width: f64) -> Self {
        Self {
            bar_ratio,
            label_width,
        }
    }

    /// Horizontal extent (canvas fraction) of bar plus label for plot width `width`.
    #[must_use]
    pub fn reach(self, width: f64) -> f64 {
        self.bar_ratio * width + self.label_width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitOutcome {
    /// Every label already ends inside the current width.
    AlreadyFits,
    Converged,
    /// Bisection stopped at the iteration cap; the last feasible bound is used.
    IterationCapReached,
    /// Even the minimum width overflows; labels will be clipped.
    Infeasible,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RightLabelFit {
    pub width: f64,
    pub iterations: usize,
    pub outcome: FitOutcome,
}

/// Bisection search for the plotting width that keeps right labels inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RightLabelFitter {
    pub min_width: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl RightLabelFitter {
    #[must_use]
    pub fn new(min_width: f64, tolerance: f64, max_iterations: usize) -> Self {
        Self {
            min_width,
            tolerance,
            max_iterations,
        }
    }

    #[must_use]
    pub fn from_style(style: &StyleConfig) -> Self {
        Self::new(
            style.min_plot_width,
            style.right_label_tolerance,
            style.right_label_max_iterations,
        )
    }

    /// Total horizontal extent needed at plot width `width`.
    #[must_use]
    pub fn required_extent(width: f64, labels: &[RightLabelSpan]) -> f64 {
        labels
            .iter()
            .map(|label| label.reach(width))
            .fold(width, f64::max)
    }

    /// Finds the widest plot width in `[min_width, current]` whose labels fit
    /// within `current`.
    #[must_use]
    pub fn fit(&self, current: f64, labels: &[RightLabelSpan]) -> RightLabelFit {
        if Self::required_extent(current, labels) <= current {
            return RightLabelFit {
                width: current,
                iterations: 0,
                outcome: FitOutcome::AlreadyFits,
            };
        }

        let min_width = self.min_width.min(current);
        if Self::required_extent(min_width, labels) >= current {
            warn!(
                current,
                min_width, "right labels cannot fit; plotting at the minimum width and clipping"
            );
            return RightLabelFit {
                width: min_width,
                iterations: 0,
                outcome: FitOutcome::Infeasible,
            };
        }

        let (mut low, mut high) = (min_width, current);
        let mut iterations = 0;
        while (high - low).abs() > self.tolerance && iterations < self.max_iterations {
            let middle = (low + high) * 0.5;
            if Self::required_extent(middle, labels) < current {
                low = middle;
            } else {
                high = middle;
            }
            iterations += 1;
            trace!(iterations, low, high, "right label bisection step");
        }

        let outcome = if (high - low).abs() > self.tolerance {
            warn!(
                iterations,
                low, high, "right label bisection hit the iteration cap"
            );
            FitOutcome::IterationCapReached
        } else {
            FitOutcome::Converged
        };

        RightLabelFit {
            width: low,
            iterations,
            outcome,
        }
    }
}

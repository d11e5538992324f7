use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Slack tolerated on the upper canvas bounds when fractions are summed.
const EDGE_EPSILON: f64 = 1e-9;

/// Plotting area position in canvas fractions, origin at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotRect {
    pub x0: f64,
    pub y0: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    pub fn new(x0: f64, y0: f64, width: f64, height: f64) -> ChartResult<Self> {
        let rect = Self {
            x0,
            y0,
            width,
            height,
        };
        rect.check("init")?;
        Ok(rect)
    }

    /// Full canvas minus `margin` on every side.
    ///
    /// `margin` is a vertical fraction; `x_coeff` converts it to the
    /// horizontal axis.
    pub fn with_margin(margin: f64, x_coeff: f64) -> ChartResult<Self> {
        let horizontal = x_coeff * margin;
        Self::new(
            horizontal,
            margin,
            1.0 - 2.0 * horizontal,
            1.0 - 2.0 * margin,
        )
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x0 + self.width
    }

    #[must_use]
    pub fn top(self) -> f64 {
        self.y0 + self.height
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        let finite = [self.x0, self.y0, self.width, self.height]
            .iter()
            .all(|value| value.is_finite());
        finite
            && self.width > 0.0
            && self.height > 0.0
            && self.x0 >= 0.0
            && self.y0 >= 0.0
            && self.right() <= 1.0 + EDGE_EPSILON
            && self.top() <= 1.0 + EDGE_EPSILON
    }

    /// Moves the left edge right by `delta`; the right edge stays fixed.
    pub fn shrink_left(&mut self, delta: f64, step: &'static str) -> ChartResult<()> {
        let delta = self.checked_delta(delta, step)?;
        self.apply(
            Self {
                x0: self.x0 + delta,
                width: self.width - delta,
                ..*self
            },
            step,
        )
    }

    /// Moves the right edge left by `delta`; the left edge stays fixed.
    pub fn shrink_right(&mut self, delta: f64, step: &'static str) -> ChartResult<()> {
        let delta = self.checked_delta(delta, step)?;
        self.apply(
            Self {
                width: self.width - delta,
                ..*self
            },
            step,
        )
    }

    /// Moves the top edge down by `delta`; the bottom edge stays fixed.
    pub fn shrink_top(&mut self, delta: f64, step: &'static str) -> ChartResult<()> {
        let delta = self.checked_delta(delta, step)?;
        self.apply(
            Self {
                height: self.height - delta,
                ..*self
            },
            step,
        )
    }

    /// Moves the bottom edge up by `delta`; the top edge stays fixed.
    pub fn shrink_bottom(&mut self, delta: f64, step: &'static str) -> ChartResult<()> {
        let delta = self.checked_delta(delta, step)?;
        self.apply(
            Self {
                y0: self.y0 + delta,
                height: self.height - delta,
                ..*self
            },
            step,
        )
    }

    fn apply(&mut self, next: Self, step: &'static str) -> ChartResult<()> {
        next.check(step)?;
        *self = next;
        Ok(())
    }

    fn checked_delta(self, delta: f64, step: &'static str) -> ChartResult<f64> {
        if delta.is_finite() && delta >= 0.0 {
            return Ok(delta);
        }
        Err(ChartError::LayoutInfeasible {
            step,
            width: self.width,
            height: self.height,
        })
    }

    fn check(self, step: &'static str) -> ChartResult<()> {
        if self.is_valid() {
            return Ok(());
        }
        Err(ChartError::LayoutInfeasible {
            step,
            width: self.width,
            height: self.height,
        })
    }
}

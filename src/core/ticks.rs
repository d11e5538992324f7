use crate::core::value_scale::{ScaleMode, ValueScale};

pub const VALUE_AXIS_TARGET_SPACING_PX: f64 = 72.0;
pub const VALUE_AXIS_MIN_TICKS: usize = 2;
pub const VALUE_AXIS_MAX_TICKS: usize = 11;

const NICE_STEP_MULTIPLIERS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];
const MAX_DECIMALS: usize = 9;

/// One candidate tick on the value axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TickValue {
    pub value: f64,
    pub label: String,
}

pub fn axis_tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Smallest `{1, 2, 2.5, 5, 10} * 10^k` step giving at most `tick_count` intervals.
#[must_use]
pub fn nice_step(span: f64, tick_count: usize) -> f64 {
    if !span.is_finite() || span <= 0.0 {
        return 1.0;
    }
    let intervals = tick_count.saturating_sub(1).max(1) as f64;
    let raw = span / intervals;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let multiplier = NICE_STEP_MULTIPLIERS
        .iter()
        .copied()
        .find(|candidate| *candidate >= normalized - 1e-12)
        .unwrap_or(10.0);
    multiplier * magnitude
}

/// Number of decimals needed to print multiples of `step` exactly.
#[must_use]
pub fn step_precision(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    (0..=MAX_DECIMALS)
        .find(|decimals| {
            let scaled = step * 10f64.powi(*decimals as i32);
            (scaled - scaled.round()).abs() <= 1e-9 * scaled.abs().max(1.0)
        })
        .unwrap_or(MAX_DECIMALS)
}

/// Label style of the value-axis ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickFormat {
    /// [`format_tick_value`]: scientific outside `[1e-3, 1e6]`.
    #[default]
    Compact,
    /// Fixed decimals on linear axes, `10ᵏ` on log axes.
    Plain,
}

impl TickFormat {
    fn linear_label(self, value: f64, precision: usize) -> String {
        match self {
            Self::Compact => format_tick_value(value, precision),
            Self::Plain => format!("{value:.precision$}"),
        }
    }

    fn decade_label(self, exponent: i32) -> String {
        match self {
            Self::Compact => {
                format_tick_value(10f64.powi(exponent), exponent.min(0).unsigned_abs() as usize)
            }
            Self::Plain => format!("10{}", superscript(&exponent.to_string())),
        }
    }
}

/// Candidate ticks for `scale` over a plot `axis_span_px` pixels wide.
///
/// Candidates may fall outside the domain; callers filter them with
/// [`ValueScale::contains`].
#[must_use]
pub fn value_axis_ticks(scale: ValueScale, axis_span_px: f64, format: TickFormat) -> Vec<TickValue> {
    let (start, end) = scale.domain();
    match scale.mode() {
        ScaleMode::Linear => {
            let count = axis_tick_target_count(
                axis_span_px,
                VALUE_AXIS_TARGET_SPACING_PX,
                VALUE_AXIS_MIN_TICKS,
                VALUE_AXIS_MAX_TICKS,
            );
            let step = nice_step(end - start, count);
            let precision = step_precision(step);
            let first = (start / step).floor() as i64 - 1;
            let last = (end / step).ceil() as i64;
            (first..=last)
                .map(|index| {
                    let value = index as f64 * step;
                    TickValue {
                        value,
                        label: format.linear_label(value, precision),
                    }
                })
                .collect()
        }
        ScaleMode::Log10 => {
            let first = start.log10().floor() as i32;
            let last = end.log10().ceil() as i32;
            (first..=last)
                .map(|exponent| TickValue {
                    value: 10f64.powi(exponent),
                    label: format.decade_label(exponent),
                })
                .collect()
        }
    }
}

/// Formats a value-axis tick.
///
/// Zero prints as `0`, magnitudes above 1e6 or below 1e-3 use
/// `n×10ᵉ` with a one-decimal mantissa, everything else prints with
/// `precision` decimals.
#[must_use]
pub fn format_tick_value(value: f64, precision: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_owned();
    }
    let magnitude = value.abs();
    if magnitude > 1e6 || magnitude < 1e-3 {
        let text = format!("{value:.1e}");
        let Some((mantissa, exponent)) = text.split_once('e') else {
            return text;
        };
        if mantissa.parse::<f64>().is_ok_and(|m| m == 0.0) {
            return "0".to_owned();
        }
        return format!("{mantissa}×10{}", superscript(exponent));
    }
    format!("{value:.precision$}")
}

fn superscript(digits: &str) -> String {
    digits
        .chars()
        .filter_map(|ch| match ch {
            '-' => Some('⁻'),
            '0' => Some('⁰'),
            '1' => Some('¹'),
            '2' => Some('²'),
            '3' => Some('³'),
            '4' => Some('⁴'),
            '5' => Some('⁵'),
            '6' => Some('⁶'),
            '7' => Some('⁷'),
            '8' => Some('⁸'),
            '9' => Some('⁹'),
            _ => None,
        })
        .collect()
}

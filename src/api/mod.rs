mod bar_chart;
mod chart_job;
mod chart_options;
mod layout_solver;
mod prepared_bars;
mod right_label_fitter;
mod scene;
mod scene_frame;
mod style_config;
mod tick_declutter;

pub use bar_chart::{AUTO_LOG_MAXIMUM, BarChart, render_batch, value_scale_for};
pub use chart_job::{
    CHART_JOB_JSON_SCHEMA_V1, ChartJob, ChartJobJsonContractV1, LAYOUT_SNAPSHOT_JSON_SCHEMA_V1,
    LayoutSnapshot,
};
pub use chart_options::{ChartOptions, VerticalLine, ViewMode};
pub use layout_solver::{ChartLayout, LayoutSolver, LayoutStep, LayoutStepRecord};
pub use prepared_bars::{
    Bar, BarsInput, LabelSource, LegendEntry, PreparedBars, format_percentage, magnitude,
};
pub use right_label_fitter::{FitOutcome, RightLabelFit, RightLabelFitter, RightLabelSpan};
pub use scene::{
    BAR_AXIS_MARGIN_RATIO, Decorations, LabelAnchor, LegendHandle, LegendRow, PlacedBar,
    PlacedLegend, PlacedLine, PlacedText, PlacedTick, Scene, SceneBuilder, SceneState,
    TICK_LENGTH_PT, TICK_PAD_PT, VAlign,
};
pub use style_config::StyleConfig;
pub use tick_declutter::{DeclutterResult, declutter};

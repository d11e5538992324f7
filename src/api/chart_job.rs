use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::PlotRect;
use crate::error::{ChartError, ChartResult};

use super::{
    BarsInput, ChartLayout, ChartOptions, LayoutStepRecord, RightLabelFit, StyleConfig,
};

pub const CHART_JOB_JSON_SCHEMA_V1: u32 = 1;
pub const LAYOUT_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Everything needed to build one chart: data, options and styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartJob {
    pub data: BarsInput,
    #[serde(default)]
    pub options: ChartOptions,
    #[serde(default)]
    pub style: StyleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartJobJsonContractV1 {
    pub schema_version: u32,
    pub job: ChartJob,
}

impl ChartJob {
    #[must_use]
    pub fn new(data: BarsInput) -> Self {
        Self {
            data,
            options: ChartOptions::default(),
            style: StyleConfig::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }

    /// Accepts either a bare job or a versioned `{schema_version, job}` payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse chart job json: {e}")))?;
        if value.get("schema_version").is_none() {
            return serde_json::from_value(value)
                .map_err(|e| ChartError::InvalidConfig(format!("invalid chart job: {e}")));
        }
        let payload: ChartJobJsonContractV1 = serde_json::from_value(value).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse chart job json payload: {e}"))
        })?;
        if payload.schema_version != CHART_JOB_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidConfig(format!(
                "unsupported chart job schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.job)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ChartResult<Self> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json_compat_str(&input)
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartJobJsonContractV1 {
            schema_version: CHART_JOB_JSON_SCHEMA_V1,
            job: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize chart job contract v1: {e}"))
        })
    }
}

/// Serializable summary of a solved layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub schema_version: u32,
    pub plot_rect: PlotRect,
    pub x_coeff: f64,
    pub steps: Vec<LayoutStepRecord>,
    pub legend_anchor: Option<f64>,
    pub hidden_ticks: Vec<f64>,
    pub right_label_fit: Option<RightLabelFit>,
}

impl ChartLayout {
    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            schema_version: LAYOUT_SNAPSHOT_JSON_SCHEMA_V1,
            plot_rect: self.plot_rect,
            x_coeff: self.x_coeff,
            steps: self.steps.to_vec(),
            legend_anchor: self.legend_anchor,
            hidden_ticks: self.hidden_ticks.iter().map(|value| value.0).collect(),
            right_label_fit: self.right_label_fit,
        }
    }
}

impl LayoutSnapshot {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize layout snapshot: {e}"))
        })
    }
}

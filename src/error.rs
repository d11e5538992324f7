use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid canvas: width={width}in, height={height}in, dpi={dpi}")]
    InvalidCanvas { width: f64, height: f64, dpi: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A reservation step left no room for the plotting rectangle.
    #[error(
        "canvas too small for requested decorations: `{step}` step would leave width={width}, height={height}"
    )]
    LayoutInfeasible {
        step: &'static str,
        width: f64,
        height: f64,
    },

    #[error("render backend failure: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChartError {
    #[must_use]
    pub fn is_layout_infeasible(&self) -> bool {
        matches!(self, Self::LayoutInfeasible { .. })
    }

    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::InvalidData(_) | Self::InvalidCanvas { .. }
        )
    }
}

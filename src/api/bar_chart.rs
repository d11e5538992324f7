use tracing::info;

use crate::core::{Canvas, PlotRect, ScaleMode, ValueScale};
use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer, TextMeasurer};

use super::{
    BarsInput, ChartJob, ChartLayout, ChartOptions, Decorations, LayoutSolver, PreparedBars,
    Scene, SceneBuilder, StyleConfig,
};

/// Log scale is chosen above this maximum even when magnitudes are close.
pub const AUTO_LOG_MAXIMUM: f64 = 1e6;

/// A solved horizontal bar chart.
///
/// Construction validates the inputs, prepares the bars, runs the layout
/// solver and keeps the final scene. Rendering is a pure function of the
/// stored scene, so repeated renders produce identical frames.
#[derive(Debug, Clone)]
pub struct BarChart {
    canvas: Canvas,
    style: StyleConfig,
    options: ChartOptions,
    data: PreparedBars,
    scale: ValueScale,
    layout: ChartLayout,
    scene: Scene,
}

impl BarChart {
    pub fn build<M: TextMeasurer + ?Sized>(
        input: BarsInput,
        options: ChartOptions,
        style: StyleConfig,
        measurer: &M,
    ) -> ChartResult<Self> {
        let style = style.validate()?;
        let canvas = style.canvas()?;
        let data = PreparedBars::prepare(input, &options, &style)?;
        let scale = value_scale_for(&data, &options)?;
        let decorations = Decorations::resolve(&options, &data);

        let (layout, scene) = {
            let builder = SceneBuilder::new(canvas, &style, &data, scale, &decorations, measurer);
            let layout = LayoutSolver::new(&builder, &style).solve()?;
            let scene = builder.build(&layout.scene_state());
            (layout, scene)
        };

        let rect = layout.plot_rect;
        info!(
            bars = data.len(),
            scale = ?scale.mode(),
            x0 = rect.x0,
            y0 = rect.y0,
            width = rect.width,
            height = rect.height,
            "bar chart laid out"
        );

        Ok(Self {
            canvas,
            style,
            options,
            data,
            scale,
            layout,
            scene,
        })
    }

    pub fn from_job<M: TextMeasurer + ?Sized>(job: ChartJob, measurer: &M) -> ChartResult<Self> {
        Self::build(job.data, job.options, job.style, measurer)
    }

    #[must_use]
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    #[must_use]
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    #[must_use]
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    #[must_use]
    pub fn data(&self) -> &PreparedBars {
        &self.data
    }

    #[must_use]
    pub fn scale(&self) -> ValueScale {
        self.scale
    }

    #[must_use]
    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    #[must_use]
    pub fn plot_rect(&self) -> PlotRect {
        self.layout.plot_rect
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn render_frame(&self) -> RenderFrame {
        self.scene.to_render_frame()
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) -> ChartResult<()> {
        let frame = self.render_frame();
        frame.validate()?;
        renderer.render(&frame)
    }
}

#[cfg(feature = "cairo-backend")]
impl BarChart {
    pub fn encode_png(&self) -> ChartResult<Vec<u8>> {
        let (width, height) = self.canvas.pixel_size();
        let mut renderer = crate::render::CairoRenderer::new(width, height)?;
        self.render(&mut renderer)?;
        renderer.encode_png()
    }

    /// PNG bytes together with the image size in pixels, for inline display.
    pub fn png_with_size(&self) -> ChartResult<(Vec<u8>, (u32, u32))> {
        Ok((self.encode_png()?, self.canvas.pixel_size()))
    }

    pub fn write_png(&self, path: impl AsRef<std::path::Path>) -> ChartResult<()> {
        std::fs::write(path, self.encode_png()?)?;
        Ok(())
    }

    pub fn write_pdf(&self, path: impl AsRef<std::path::Path>) -> ChartResult<()> {
        crate::render::render_pdf(&self.render_frame(), self.canvas.dpi(), path)
    }

    /// Writes the PNG to `options.file_name` when one is configured.
    pub fn save(&self) -> ChartResult<Option<std::path::PathBuf>> {
        let Some(path) = self.options.file_name.clone() else {
            return Ok(None);
        };
        self.write_png(&path)?;
        info!(path = %path.display(), "chart written");
        Ok(Some(path))
    }
}

/// Picks the value-axis scale from the prepared extremes.
pub fn value_scale_for(data: &PreparedBars, options: &ChartOptions) -> ChartResult<ValueScale> {
    let mode = if options.auto_scale
        && (data.spread() > 1 || data.maximum() > AUTO_LOG_MAXIMUM)
    {
        ScaleMode::Log10
    } else {
        ScaleMode::Linear
    };
    ValueScale::from_extremes(mode, data.minimum(), data.maximum())
}

/// Builds and renders independent jobs, in parallel with `parallel-render`.
pub fn render_batch<M>(jobs: Vec<ChartJob>, measurer: &M) -> Vec<ChartResult<RenderFrame>>
where
    M: TextMeasurer + Sync + ?Sized,
{
    #[cfg(feature = "parallel-render")]
    {
        use rayon::prelude::*;

        jobs.into_par_iter()
            .map(|job| BarChart::from_job(job, measurer).map(|chart| chart.render_frame()))
            .collect()
    }

    #[cfg(not(feature = "parallel-render"))]
    {
        jobs.into_iter()
            .map(|job| BarChart::from_job(job, measurer).map(|chart| chart.render_frame()))
            .collect()
    }
}

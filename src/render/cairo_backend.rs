use std::f64::consts::FRAC_PI_2;
use std::path::Path;

use cairo::{Context, Format, ImageSurface, PdfSurface};
use pango::FontDescription;
use tracing::warn;

use crate::core::{POINTS_PER_INCH, TextExtent};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, FontWeight, HeuristicTextMeasurer, RenderFrame, Renderer, TextHAlign, TextMeasurer,
    TextPrimitive,
};

const FONT_FAMILY: &str = "Sans";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

/// Cairo + Pango + PangoCairo raster backend.
///
/// Frames are painted on an offscreen ARGB32 surface that can be encoded as
/// PNG afterwards.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: u32, height: u32) -> ChartResult<Self> {
        let (Ok(width), Ok(height)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(ChartError::InvalidData(
                "cairo surface size exceeds i32".to_owned(),
            ));
        };
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    /// Encodes the current surface content as PNG.
    pub fn encode_png(&self) -> ChartResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.surface
            .write_to_png(&mut bytes)
            .map_err(|err| ChartError::Backend(format!("failed to encode png: {err}")))?;
        Ok(bytes)
    }

    pub fn write_png(&self, path: impl AsRef<Path>) -> ChartResult<()> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.last_stats = draw_frame(&context, frame)?;
        self.surface.flush();
        Ok(())
    }
}

/// Writes `frame` as a single-page PDF, scaling pixels to points with `dpi`.
pub fn render_pdf(frame: &RenderFrame, dpi: f64, path: impl AsRef<Path>) -> ChartResult<()> {
    if !dpi.is_finite() || dpi <= 0.0 {
        return Err(ChartError::InvalidData("pdf dpi must be > 0".to_owned()));
    }
    let scale = POINTS_PER_INCH / dpi;
    let surface = PdfSurface::new(
        f64::from(frame.width) * scale,
        f64::from(frame.height) * scale,
        path,
    )
    .map_err(|err| map_backend_error("failed to create pdf surface", err))?;
    let context = Context::new(&surface)
        .map_err(|err| map_backend_error("failed to create cairo context", err))?;
    context.scale(scale, scale);
    draw_frame(&context, frame)?;
    surface.finish();
    Ok(())
}

/// Pango-backed measurer matching what [`CairoRenderer`] draws.
#[derive(Debug)]
pub struct CairoTextMeasurer {
    surface: ImageSurface,
}

impl CairoTextMeasurer {
    pub fn new() -> ChartResult<Self> {
        let surface = ImageSurface::create(Format::ARgb32, 1, 1)
            .map_err(|err| map_backend_error("failed to create measuring surface", err))?;
        Ok(Self { surface })
    }
}

impl TextMeasurer for CairoTextMeasurer {
    fn measure(&self, text: &str, font_size_px: f64, weight: FontWeight) -> TextExtent {
        if text.is_empty() {
            return TextExtent::default();
        }
        let context = match Context::new(&self.surface) {
            Ok(context) => context,
            Err(err) => {
                warn!(error = %err, "falling back to heuristic text metrics");
                return HeuristicTextMeasurer.measure(text, font_size_px, weight);
            }
        };
        let layout = pangocairo::functions::create_layout(&context);
        layout.set_font_description(Some(&font_description(font_size_px, weight)));
        layout.set_text(text);
        let (width, height) = layout.pixel_size();
        TextExtent::new(f64::from(width), f64::from(height))
    }
}

fn draw_frame(context: &Context, frame: &RenderFrame) -> ChartResult<CairoRenderStats> {
    frame.validate()?;

    apply_color(context, frame.background);
    context
        .paint()
        .map_err(|err| map_backend_error("failed to clear surface", err))?;

    let mut stats = CairoRenderStats::default();

    for rect in &frame.rects {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        apply_color(context, rect.fill_color);
        if rect.border_width > 0.0 {
            context
                .fill_preserve()
                .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            apply_color(context, rect.border_color);
            context.set_line_width(rect.border_width);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke rectangle border", err))?;
        } else {
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
        }
        stats.rects_drawn += 1;
    }

    for line in &frame.lines {
        apply_color(context, line.color);
        context.set_line_width(line.stroke_width);
        context.move_to(line.x1, line.y1);
        context.line_to(line.x2, line.y2);
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke line", err))?;
        stats.lines_drawn += 1;
    }

    for text in &frame.texts {
        draw_text(context, text)?;
        stats.texts_drawn += 1;
    }

    Ok(stats)
}

fn draw_text(context: &Context, text: &TextPrimitive) -> ChartResult<()> {
    let layout = pangocairo::functions::create_layout(context);
    layout.set_font_description(Some(&font_description(text.font_size_px, text.weight)));
    layout.set_alignment(match text.h_align {
        TextHAlign::Left => pango::Alignment::Left,
        TextHAlign::Center => pango::Alignment::Center,
        TextHAlign::Right => pango::Alignment::Right,
    });
    layout.set_text(&text.text);
    let (layout_width, _layout_height) = layout.pixel_size();

    context
        .save()
        .map_err(|err| map_backend_error("failed to save cairo state", err))?;
    apply_color(context, text.color);
    if text.vertical {
        context.translate(text.x, text.y + f64::from(layout_width));
        context.rotate(-FRAC_PI_2);
    } else {
        context.translate(text.x, text.y);
    }
    context.move_to(0.0, 0.0);
    pangocairo::functions::show_layout(context, &layout);
    context
        .restore()
        .map_err(|err| map_backend_error("failed to restore cairo state", err))?;
    Ok(())
}

fn font_description(font_size_px: f64, weight: FontWeight) -> FontDescription {
    let mut description = FontDescription::new();
    description.set_family(FONT_FAMILY);
    description.set_absolute_size(font_size_px * f64::from(pango::SCALE));
    description.set_weight(match weight {
        FontWeight::Normal => pango::Weight::Normal,
        FontWeight::Bold => pango::Weight::Bold,
    });
    description
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}

use crate::core::TextExtent;
use crate::render::FontWeight;

/// Line height as a multiple of the font size.
pub const LINE_SPACING: f64 = 1.2;

/// Text measurement capability the layout solver depends on.
///
/// Implementations report the pixel extent of an unrotated, possibly
/// multi-line text block. Empty text measures as zero.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size_px: f64, weight: FontWeight) -> TextExtent;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font_size_px: f64, weight: FontWeight) -> TextExtent {
        (**self).measure(text, font_size_px, weight)
    }
}

/// Deterministic measurer for headless layout and tests.
///
/// It assumes an average glyph advance of `0.6em` (`0.66em` for bold) and a
/// line height of [`LINE_SPACING`] em.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size_px: f64, weight: FontWeight) -> TextExtent {
        if text.is_empty() {
            return TextExtent::default();
        }
        let advance = match weight {
            FontWeight::Normal => 0.6,
            FontWeight::Bold => 0.66,
        };
        let mut line_count = 0usize;
        let mut widest = 0usize;
        for line in text.lines() {
            line_count += 1;
            widest = widest.max(line.chars().count());
        }
        let line_count = line_count.max(1);
        TextExtent::new(
            advance * font_size_px * widest as f64,
            LINE_SPACING * font_size_px * line_count as f64,
        )
    }
}

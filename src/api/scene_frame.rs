use crate::render::{Color, LinePrimitive, RectPrimitive, RenderFrame, TextPrimitive};

use super::scene::{LegendHandle, PlacedText, Scene};

const GRID_ALPHA: f64 = 0.3;
const GRID_WIDTH_PX: f64 = 0.8;
const SPINE_WIDTH_PX: f64 = 0.8;
const BAR_BORDER_PX: f64 = 1.0;

impl Scene {
    /// Converts placed elements into backend draw commands (origin top-left).
    #[must_use]
    pub fn to_render_frame(&self) -> RenderFrame {
        let height = self.canvas_height;
        let flip = |y: f64| height - y;
        let mut frame = RenderFrame::new(
            self.canvas_width.round().max(1.0) as u32,
            self.canvas_height.round().max(1.0) as u32,
        );
        let plot = self.plot;

        let grid_color = Color::BLACK.with_alpha(GRID_ALPHA);
        for tick in self.x_ticks.iter().filter(|tick| tick.in_bounds) {
            frame.lines.push(LinePrimitive::new(
                tick.x,
                flip(plot.y0),
                tick.x,
                flip(plot.y1),
                GRID_WIDTH_PX,
                grid_color,
            ));
            frame.lines.push(LinePrimitive::new(
                tick.x,
                flip(plot.y0),
                tick.x,
                flip(plot.y0 - self.tick_length_px),
                SPINE_WIDTH_PX,
                Color::BLACK,
            ));
        }

        for bar in &self.bars {
            let bbox = bar.bbox;
            frame.rects.push(
                RectPrimitive::new(bbox.x0, flip(bbox.y1), bbox.width(), bbox.height(), bar.color)
                    .with_border(BAR_BORDER_PX, Color::WHITE),
            );
        }

        if let Some(line) = self.vertical_line {
            frame.lines.push(LinePrimitive::new(
                line.x,
                flip(line.y0),
                line.x,
                flip(line.y1),
                line.width_px,
                line.color,
            ));
        }

        // Left and bottom spines only.
        frame.lines.push(LinePrimitive::new(
            plot.x0,
            flip(plot.y0),
            plot.x0,
            flip(plot.y1),
            SPINE_WIDTH_PX,
            Color::BLACK,
        ));
        frame.lines.push(LinePrimitive::new(
            plot.x0,
            flip(plot.y0),
            plot.x1,
            flip(plot.y0),
            SPINE_WIDTH_PX,
            Color::BLACK,
        ));

        if let Some(legend) = &self.legend {
            for row in &legend.rows {
                match row.handle {
                    LegendHandle::Patch { bbox, color } => frame.rects.push(RectPrimitive::new(
                        bbox.x0,
                        flip(bbox.y1),
                        bbox.width(),
                        bbox.height(),
                        color,
                    )),
                    LegendHandle::Line { x0, x1, y, color } => frame.lines.push(
                        LinePrimitive::new(x0, flip(y), x1, flip(y), 2.0 * SPINE_WIDTH_PX, color),
                    ),
                }
            }
        }

        frame
            .texts
            .extend(self.visible_texts().map(|text| text_primitive(text, height)));
        frame
    }
}

fn text_primitive(text: &PlacedText, canvas_height: f64) -> TextPrimitive {
    TextPrimitive::new(
        text.text.clone(),
        text.bbox.x0,
        canvas_height - text.bbox.y1,
        text.font_size_px,
        text.color,
        text.h_align,
    )
    .with_weight(text.weight)
    .rotated(text.vertical)
}

use catbars::api::{BarChart, BarsInput, ChartOptions, LabelSource, StyleConfig};
use catbars::render::{
    Color, HeuristicTextMeasurer, LinePrimitive, NullRenderer, RenderFrame, Renderer,
    TextHAlign, TextPrimitive,
};

fn chart() -> BarChart {
    let input = BarsInput::new(vec![12.0, 30.0, 7.0])
        .with_left_labels(LabelSource::values(["one", "two", "three"]))
        .with_right_labels(LabelSource::Rank);
    let options = ChartOptions::default()
        .with_title("Counts")
        .with_xlabel("n");
    BarChart::build(input, options, StyleConfig::default(), &HeuristicTextMeasurer)
        .expect("chart builds")
}

#[test]
fn frame_matches_canvas_pixels_and_validates() {
    let chart = chart();
    let frame = chart.render_frame();

    assert_eq!((frame.width, frame.height), chart.canvas().pixel_size());
    frame.validate().expect("valid frame");
    assert_eq!(frame.background, Color::WHITE);
    assert_eq!(frame.rects.len(), 3);
}

#[test]
fn frame_flips_scene_coordinates_to_a_top_left_origin() {
    let chart = chart();
    let scene = chart.scene();
    let frame = chart.render_frame();
    let height = f64::from(frame.height);

    for (bar, rect) in scene.bars.iter().zip(&frame.rects) {
        assert!((rect.x - bar.bbox.x0).abs() < 1e-9);
        assert!((rect.y - (height - bar.bbox.y1)).abs() < 1e-9);
        assert!((rect.height - bar.bbox.height()).abs() < 1e-9);
    }

    let title = scene.title.as_ref().expect("title placed");
    let drawn = frame
        .texts
        .iter()
        .find(|text| text.text == title.text)
        .expect("title drawn");
    assert!((drawn.y - (height - title.bbox.y1)).abs() < 1e-9);
    // Title sits in the upper part of the image.
    assert!(drawn.y < height / 2.0);
}

#[test]
fn frame_draws_left_and_bottom_spines() {
    let chart = chart();
    let plot = chart.scene().plot;
    let frame = chart.render_frame();
    let bottom = f64::from(frame.height) - plot.y0;

    let spine = |line: &&LinePrimitive| line.color == Color::BLACK && line.y1 == bottom;
    let vertical = frame
        .lines
        .iter()
        .filter(spine)
        .any(|line| line.x1 == plot.x0 && line.x2 == plot.x0);
    let horizontal = frame
        .lines
        .iter()
        .filter(spine)
        .any(|line| line.x1 == plot.x0 && line.x2 == plot.x1 && line.y2 == bottom);
    assert!(vertical && horizontal);
}

#[test]
fn hidden_ticks_are_not_drawn() {
    let chart = chart();
    let frame = chart.render_frame();
    let hidden: Vec<&str> = chart
        .scene()
        .x_ticks
        .iter()
        .filter(|tick| tick.hidden)
        .map(|tick| tick.label.text.as_str())
        .collect();

    for text in &frame.texts {
        assert!(!hidden.contains(&text.text.as_str()));
    }
    assert_eq!(frame.texts.len(), chart.scene().visible_texts().count());
}

#[test]
fn null_renderer_counts_primitives() {
    let chart = chart();
    let mut renderer = NullRenderer::default();
    chart.render(&mut renderer).expect("render");
    chart.render(&mut renderer).expect("render twice");

    assert_eq!(renderer.frames_rendered, 2);
    assert_eq!(renderer.last_frame.as_ref(), Some(&chart.render_frame()));
    assert_eq!(renderer.last_line_count, chart.render_frame().lines.len());
}

#[test]
fn invalid_primitives_fail_validation() {
    let frame = RenderFrame::new(100, 100).with_text(TextPrimitive::new(
        "x",
        1.0,
        1.0,
        -4.0,
        Color::BLACK,
        TextHAlign::Left,
    ));
    assert!(frame.validate().is_err());

    let frame = RenderFrame::new(0, 100);
    assert!(frame.validate().is_err());

    let mut renderer = NullRenderer::default();
    let line = LinePrimitive::new(0.0, f64::NAN, 1.0, 1.0, 1.0, Color::BLACK);
    assert!(renderer.render(&RenderFrame::new(10, 10).with_line(line)).is_err());
    assert_eq!(renderer.frames_rendered, 0);
}

#![cfg(feature = "cairo-backend")]

use catbars::ChartError;
use catbars::api::{BarChart, BarsInput, ChartOptions, LabelSource, StyleConfig};
use catbars::render::{CairoRenderer, CairoTextMeasurer, FontWeight, TextMeasurer};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn chart(measurer: &CairoTextMeasurer) -> BarChart {
    let input = BarsInput::new(vec![4.0, 9.0, 2.5])
        .with_left_labels(LabelSource::values(["apples", "pears", "plums"]))
        .with_right_labels(LabelSource::Proportion)
        .with_categories(["fruit", "fruit", "stone"]);
    let options = ChartOptions::default()
        .with_title("Harvest")
        .with_xlabel("tonnes");
    BarChart::build(input, options, StyleConfig::default(), measurer).expect("chart builds")
}

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).expect_err("invalid width must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn pango_measurer_reports_real_extents() {
    let measurer = CairoTextMeasurer::new().expect("measurer");

    let short = measurer.measure("ab", 12.0, FontWeight::Normal);
    let long = measurer.measure("abcdefgh", 12.0, FontWeight::Normal);
    assert!(short.width > 0.0 && short.height > 0.0);
    assert!(long.width > short.width);
    assert_eq!(measurer.measure("", 12.0, FontWeight::Normal).width, 0.0);
}

#[test]
fn chart_encodes_png_at_canvas_size() {
    let measurer = CairoTextMeasurer::new().expect("measurer");
    let chart = chart(&measurer);

    let (bytes, size) = chart.png_with_size().expect("png");
    assert!(bytes.starts_with(&PNG_SIGNATURE));
    assert_eq!(size, (600, 500));
}

#[test]
fn cairo_renderer_draws_every_primitive() {
    let measurer = CairoTextMeasurer::new().expect("measurer");
    let chart = chart(&measurer);
    let frame = chart.render_frame();

    let mut renderer = CairoRenderer::new(frame.width, frame.height).expect("renderer");
    chart.render(&mut renderer).expect("render");
    let stats = renderer.last_stats();

    assert_eq!(stats.rects_drawn, frame.rects.len());
    assert_eq!(stats.lines_drawn, frame.lines.len());
    assert_eq!(stats.texts_drawn, frame.texts.len());
}

#[test]
fn chart_writes_png_and_pdf_files() {
    let measurer = CairoTextMeasurer::new().expect("measurer");
    let chart = chart(&measurer);
    let dir = std::env::temp_dir().join(format!("catbars-cairo-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");

    let png = dir.join("chart.png");
    let pdf = dir.join("chart.pdf");
    chart.write_png(&png).expect("png written");
    chart.write_pdf(&pdf).expect("pdf written");

    let pdf_bytes = std::fs::read(&pdf).expect("read pdf");
    assert!(pdf_bytes.starts_with(b"%PDF"));
    assert!(std::fs::metadata(&png).expect("png metadata").len() > 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn save_is_a_no_op_without_a_file_name() {
    let measurer = CairoTextMeasurer::new().expect("measurer");
    let chart = chart(&measurer);
    assert_eq!(chart.save().expect("save"), None);
}

#[test]
fn repeated_builds_encode_identical_png_bytes() {
    let measurer = CairoTextMeasurer::new().expect("measurer");
    let first = chart(&measurer).encode_png().expect("first png");
    let second = chart(&measurer).encode_png().expect("second png");

    assert!(first.starts_with(&PNG_SIGNATURE));
    assert_eq!(first, second);
}

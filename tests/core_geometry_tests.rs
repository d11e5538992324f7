use approx::assert_relative_eq;
use catbars::ChartError;
use catbars::core::{
    Axis, Canvas, PixelRect, PlotRect, ScaleMode, TickFormat, ValueScale, format_tick_value,
    value_axis_ticks,
};

#[test]
fn pixel_and_fraction_conversions_round_trip() {
    let canvas = Canvas::new(6.0, 5.0, 100.0).expect("canvas");

    for axis in [Axis::Horizontal, Axis::Vertical] {
        let fraction = canvas.pixels_to_fraction(123.4, axis);
        assert_relative_eq!(canvas.fraction_to_pixels(fraction, axis), 123.4, epsilon = 1e-9);

        let points = canvas.fraction_to_points(0.25, axis);
        assert_relative_eq!(canvas.points_to_fraction(points, axis), 0.25, epsilon = 1e-12);
    }
    assert_eq!(canvas.pixel_size(), (600, 500));
    assert_relative_eq!(canvas.aspect_coefficient(), 5.0 / 6.0);
}

#[test]
fn points_scale_with_resolution() {
    let low = Canvas::new(4.0, 4.0, 72.0).expect("canvas");
    let high = Canvas::new(4.0, 4.0, 144.0).expect("canvas");

    assert_relative_eq!(low.points_to_pixels(10.0), 10.0);
    assert_relative_eq!(high.points_to_pixels(10.0), 20.0);
    // Fractions do not depend on the resolution.
    assert_relative_eq!(
        low.points_to_fraction(36.0, Axis::Vertical),
        high.points_to_fraction(36.0, Axis::Vertical)
    );
}

#[test]
fn invalid_canvas_reports_its_dimensions() {
    let err = Canvas::new(6.0, -1.0, 100.0).expect_err("negative height");
    assert!(matches!(
        err,
        ChartError::InvalidCanvas {
            width,
            height,
            dpi
        } if width == 6.0 && height == -1.0 && dpi == 100.0
    ));
}

#[test]
fn margin_rect_uses_the_horizontal_coefficient() {
    let rect = PlotRect::with_margin(0.05, 0.5).expect("rect");

    assert_relative_eq!(rect.x0, 0.025, epsilon = 1e-12);
    assert_relative_eq!(rect.y0, 0.05, epsilon = 1e-12);
    assert_relative_eq!(rect.width, 0.95, epsilon = 1e-12);
    assert_relative_eq!(rect.height, 0.9, epsilon = 1e-12);
}

#[test]
fn shrinking_moves_one_edge_only() {
    let mut rect = PlotRect::new(0.1, 0.1, 0.8, 0.8).expect("rect");

    rect.shrink_left(0.1, "left").expect("left");
    assert_relative_eq!(rect.x0, 0.2, epsilon = 1e-12);
    assert_relative_eq!(rect.right(), 0.9, epsilon = 1e-12);

    rect.shrink_right(0.2, "right").expect("right");
    assert_relative_eq!(rect.x0, 0.2, epsilon = 1e-12);
    assert_relative_eq!(rect.right(), 0.7, epsilon = 1e-12);

    rect.shrink_top(0.1, "top").expect("top");
    assert_relative_eq!(rect.y0, 0.1, epsilon = 1e-12);
    assert_relative_eq!(rect.top(), 0.8, epsilon = 1e-12);

    rect.shrink_bottom(0.3, "bottom").expect("bottom");
    assert_relative_eq!(rect.y0, 0.4, epsilon = 1e-12);
    assert_relative_eq!(rect.top(), 0.8, epsilon = 1e-12);
}

#[test]
fn exhausting_a_dimension_is_infeasible_and_leaves_the_rect_untouched() {
    let mut rect = PlotRect::new(0.1, 0.1, 0.5, 0.5).expect("rect");

    let err = rect.shrink_top(0.5, "title").expect_err("zero height");
    assert!(matches!(err, ChartError::LayoutInfeasible { step: "title", .. }));
    assert_relative_eq!(rect.height, 0.5, epsilon = 1e-12);

    let err = rect.shrink_left(-0.1, "left_labels").expect_err("negative delta");
    assert!(err.is_layout_infeasible());
    assert!(rect.shrink_right(f64::NAN, "legend").is_err());
}

#[test]
fn rect_outside_the_canvas_is_rejected() {
    assert!(PlotRect::new(0.5, 0.0, 0.6, 0.5).is_err());
    assert!(PlotRect::new(-0.1, 0.0, 0.5, 0.5).is_err());
    assert!(PlotRect::new(0.0, 0.0, 1.0, 1.0).is_ok());
}

#[test]
fn pixel_boxes_touching_at_an_edge_do_not_overlap() {
    let left = PixelRect::new(0.0, 0.0, 10.0, 10.0);
    let touching = PixelRect::new(10.0, 0.0, 20.0, 10.0);
    let crossing = PixelRect::new(9.0, 5.0, 20.0, 15.0);

    assert!(!left.overlaps(touching));
    assert!(left.overlaps(crossing));
}

#[test]
fn linear_ticks_cover_the_domain_with_nice_steps() {
    let scale = ValueScale::from_extremes(ScaleMode::Linear, 3.0, 95.0).expect("scale");
    let ticks = value_axis_ticks(scale, 400.0, TickFormat::Compact);

    let in_bounds: Vec<f64> = ticks
        .iter()
        .map(|tick| tick.value)
        .filter(|value| scale.contains(*value))
        .collect();
    assert_eq!(in_bounds.first().copied(), Some(0.0));
    assert!(in_bounds.len() >= 2);
    let step = in_bounds[1] - in_bounds[0];
    for pair in in_bounds.windows(2) {
        assert_relative_eq!(pair[1] - pair[0], step, epsilon = 1e-9);
    }
    // Candidates extend past the domain.
    assert!(ticks.iter().any(|tick| !scale.contains(tick.value)));
}

#[test]
fn log_ticks_land_on_decades() {
    let scale = ValueScale::from_extremes(ScaleMode::Log10, 2.0, 3_000.0).expect("scale");
    assert_eq!(scale.mode(), ScaleMode::Log10);

    let ticks = value_axis_ticks(scale, 400.0, TickFormat::Compact);
    for tick in ticks.iter().filter(|tick| scale.contains(tick.value)) {
        let exponent = tick.value.log10();
        assert_relative_eq!(exponent, exponent.round(), epsilon = 1e-9);
    }
    assert_relative_eq!(scale.fraction(100.0), 2.0 / 4.0, epsilon = 1e-12);
}

#[test]
fn tick_formatter_switches_to_scientific_notation() {
    assert_eq!(format_tick_value(0.0, 2), "0");
    assert_eq!(format_tick_value(250.0, 0), "250");
    assert_eq!(format_tick_value(0.5, 1), "0.5");
    assert_eq!(format_tick_value(2_500_000.0, 0), "2.5×10⁶");
    assert_eq!(format_tick_value(0.0002, 4), "2.0×10⁻⁴");
}

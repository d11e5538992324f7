use catbars::ChartError;
use catbars::api::{
    BarsInput, ChartJob, ChartOptions, LabelSource, StyleConfig, VAlign, VerticalLine, ViewMode,
};
use catbars::render::Color;

#[test]
fn partial_style_json_keeps_defaults_and_ignores_unknown_keys() {
    let style = StyleConfig::from_json_str(
        r#"{ "dpi": 150, "title_font_size": 20, "bar_label_v_align": "bottom", "not_a_setting": true }"#,
    )
    .expect("style parses");

    assert_eq!(style.bar_label_v_align, VAlign::Bottom);
    assert_eq!(style.dpi, 150.0);
    assert_eq!(style.title_font_size, 20.0);
    assert_eq!(style.right_label_max_iterations, 1000);
    assert_eq!(style.figsize, (6.0, 5.0));
    assert_eq!(style.default_label, "else");
    assert_eq!(style.tints.len(), 9);
}

#[test]
fn style_round_trips_through_json() {
    let style = StyleConfig::default();
    let json = style.to_json_pretty().expect("serialize");
    let parsed = StyleConfig::from_json_str(&json).expect("parse");

    assert_eq!(parsed.tints.len(), style.tints.len());
    assert_eq!(parsed.default_color, Color::BLACK);
    assert_eq!(parsed.margin, style.margin);
}

#[test]
fn out_of_range_style_values_are_rejected() {
    for json in [
        r#"{ "dpi": 0 }"#,
        r#"{ "figsize": [0, 5] }"#,
        r#"{ "margin": 0.7 }"#,
        r#"{ "color_alpha": 1.5 }"#,
        r#"{ "right_label_max_iterations": 0 }"#,
        r#"{ "default_color": "chartreuse-ish" }"#,
    ] {
        let err = StyleConfig::from_json_str(json).expect_err(json);
        assert!(err.is_configuration(), "{json} gave {err}");
    }
}

#[test]
fn chart_options_default_to_a_visible_legend_and_sliced_view() {
    let options = ChartOptions::from_json_str(r#"{ "sort": true, "slice": [2, 4] }"#)
        .expect("options parse");

    assert!(options.sort);
    assert_eq!(options.slice, Some((2, 4)));
    assert!(options.legend_visible);
    assert_eq!(options.view_mode, ViewMode::SlicedView);
    assert!(options.color_dic.is_none());
}

#[test]
fn color_dic_accepts_names_and_hex() {
    let options = ChartOptions::from_json_str(
        r##"{ "color_dic": { "fruit": "red", "veg": "#0f0" } }"##,
    )
    .expect("options parse");
    let color_dic = options.color_dic.expect("color map");

    assert_eq!(color_dic["fruit"], Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(color_dic["veg"], Color::rgb(0.0, 1.0, 0.0));
    let keys: Vec<&str> = color_dic.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["fruit", "veg"]);
}

#[test]
fn vertical_line_requires_all_three_keys() {
    let err = VerticalLine::from_json_str(r#"{ "number": 3, "label": "goal" }"#)
        .expect_err("missing color must fail");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
    assert!(err.to_string().contains("three keys"));

    let line = VerticalLine::from_json_str(r#"{ "number": 3, "label": "goal", "color": "navy" }"#)
        .expect("complete descriptor");
    assert_eq!(line.number, 3.0);
    assert_eq!(line.label, "goal");

    let nested = ChartOptions::from_json_str(r#"{ "vertical_line": { "number": 1 } }"#);
    assert!(nested.is_err());
}

#[test]
fn label_sources_deserialize_from_lists_and_keywords() {
    let input: BarsInput = serde_json::from_str(
        r#"{ "numbers": [1, 2], "left_labels": ["a", "b"], "right_labels": "proportion" }"#,
    )
    .expect("input parses");

    assert_eq!(input.left_labels, LabelSource::values(["a", "b"]));
    assert_eq!(input.right_labels, LabelSource::Proportion);
    assert!(input.categories.is_none());

    let bad = serde_json::from_str::<BarsInput>(r#"{ "numbers": [1], "left_labels": "median" }"#);
    assert!(bad.is_err());
}

#[test]
fn chart_jobs_parse_bare_and_versioned_payloads() {
    let bare = ChartJob::from_json_compat_str(
        r#"{ "data": { "numbers": [3, 1] }, "options": { "title": "t" } }"#,
    )
    .expect("bare job");
    assert_eq!(bare.options.title.as_deref(), Some("t"));
    assert_eq!(bare.style, StyleConfig::default());

    let versioned = bare.to_json_contract_v1_pretty().expect("serialize");
    let parsed = ChartJob::from_json_compat_str(&versioned).expect("versioned job");
    assert_eq!(parsed, bare);

    let unsupported = ChartJob::from_json_compat_str(
        r#"{ "schema_version": 9, "job": { "data": { "numbers": [1] } } }"#,
    );
    assert!(unsupported.is_err());
}

#[test]
fn colors_accept_css_names_and_alpha_hex() {
    let green = Color::parse("darkgreen").expect("css name");
    assert_eq!(green.to_hex(), "#006400");

    let translucent = Color::parse("#34a854cc").expect("hex with alpha");
    assert_eq!(translucent.to_hex(), "#34a854cc");
    assert!((translucent.alpha - 0.8).abs() < 1e-2);

    assert_eq!(Color::parse("rgb(255, 0, 0)").expect("rgb()"), Color::rgb(1.0, 0.0, 0.0));
    assert!(Color::parse("steelblue").is_ok() && Color::parse("lightgray").is_ok());
    assert!(Color::parse("not a color").is_err());
}

#[test]
fn job_color_maps_use_css_color_names() {
    let options = ChartOptions::from_json_str(
        r#"{ "color_dic": { "a": "darkgreen", "b": "steelblue" } }"#,
    )
    .expect("options parse");
    let color_dic = options.color_dic.expect("color map");
    assert_eq!(color_dic["a"], Color::parse("#006400").expect("hex"));

    let style = StyleConfig::from_json_str(r#"{ "default_color": "slategray" }"#)
        .expect("style parses");
    assert_eq!(style.default_color.to_hex(), "#708090");
}

use catbars::ChartError;
use catbars::api::{BarsInput, ChartOptions, LabelSource, PreparedBars, StyleConfig, ViewMode};
use catbars::render::Color;
use indexmap::IndexMap;

fn prepare(input: BarsInput, options: &ChartOptions) -> PreparedBars {
    PreparedBars::prepare(input, options, &StyleConfig::default()).expect("prepare bars")
}

fn sample_input() -> BarsInput {
    BarsInput::new(vec![4.0, 1.0, 3.0, 2.0])
        .with_left_labels(LabelSource::values(["d", "a", "c", "b"]))
        .with_right_labels(LabelSource::values(["D", "A", "C", "B"]))
        .with_categories(["DD", "AA", "CC", "BB"])
}

#[test]
fn unsorted_bars_are_drawn_in_reverse_input_order() {
    let bars = prepare(sample_input(), &ChartOptions::default());

    assert_eq!(bars.numbers(), &[2.0, 3.0, 1.0, 4.0]);
    assert_eq!(bars.top_to_bottom_numbers(), vec![4.0, 1.0, 3.0, 2.0]);
}

#[test]
fn sorting_permutes_every_column_together() {
    let options = ChartOptions::default().with_sort(true);
    let bars = prepare(sample_input(), &options);

    assert_eq!(bars.numbers(), &[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(bars.left_labels().expect("left labels"), &["a", "b", "c", "d"]);
    assert_eq!(bars.right_labels().expect("right labels"), &["A", "B", "C", "D"]);
    assert_eq!(bars.categories().expect("categories"), &["AA", "BB", "CC", "DD"]);

    let colors = bars.colors().expect("colors");
    let style = StyleConfig::default();
    // Every category appears once, so tints follow the sorted order: DD, CC, BB, AA.
    assert_eq!(colors[0], style.tints[3]);
    assert_eq!(colors[1], style.tints[2]);
    assert_eq!(colors[2], style.tints[1]);
    assert_eq!(colors[3], style.tints[0]);
}

#[test]
fn slicing_keeps_the_one_based_inclusive_range() {
    let options = ChartOptions::default().with_slice(2, 4);
    let bars = prepare(sample_input(), &options);

    assert_eq!(bars.numbers(), &[2.0, 3.0, 1.0]);
    assert_eq!(bars.top_to_bottom_numbers(), vec![1.0, 3.0, 2.0]);
    assert_eq!(bars.left_labels().expect("left labels"), &["b", "c", "a"]);
}

#[test]
fn slicing_then_sorting_orders_the_retained_bars() {
    let options = ChartOptions::default().with_slice(2, 4).with_sort(true);
    let bars = prepare(sample_input(), &options);

    assert_eq!(bars.numbers(), &[1.0, 2.0, 3.0]);
    assert_eq!(bars.minimum(), 1.0);
    assert_eq!(bars.maximum(), 3.0);
}

#[test]
fn global_view_sorts_before_slicing_and_keeps_global_bounds() {
    let options = ChartOptions::default()
        .with_slice(2, 3)
        .with_sort(true)
        .with_view_mode(ViewMode::GlobalView);
    let bars = prepare(sample_input(), &options);

    // Sorted descending: 4, 3, 2, 1; items two and three are 3 and 2.
    assert_eq!(bars.numbers(), &[2.0, 3.0]);
    assert_eq!(bars.minimum(), 1.0);
    assert_eq!(bars.maximum(), 4.0);
}

#[test]
fn rank_labels_are_assigned_after_sorting() {
    let input = BarsInput::new(vec![10.0, 30.0, 20.0]).with_left_labels(LabelSource::Rank);
    let bars = prepare(input, &ChartOptions::default().with_sort(true));

    assert_eq!(bars.numbers(), &[10.0, 20.0, 30.0]);
    assert_eq!(bars.left_labels().expect("ranks"), &["3", "2", "1"]);
}

#[test]
fn proportion_labels_use_the_sliced_total_by_default() {
    let input = BarsInput::new(vec![50.0, 30.0, 20.0]).with_right_labels(LabelSource::Proportion);

    let sliced = prepare(input.clone(), &ChartOptions::default().with_slice(2, 3));
    assert_eq!(sliced.right_labels().expect("labels"), &["40 %", "60 %"]);

    let global = prepare(
        input,
        &ChartOptions::default()
            .with_slice(2, 3)
            .with_view_mode(ViewMode::GlobalView),
    );
    assert_eq!(global.right_labels().expect("labels"), &["20 %", "30 %"]);
}

#[test]
fn tiny_shares_print_below_one_percent() {
    let input = BarsInput::new(vec![1_000.0, 1.0]).with_right_labels(LabelSource::Proportion);
    let bars = prepare(input, &ChartOptions::default());

    assert_eq!(bars.right_labels().expect("labels"), &["< 1 %", "100 %"]);
}

#[test]
fn categories_beyond_the_palette_share_the_default_entry() {
    let style = StyleConfig {
        tints: vec![Color::parse("red").expect("red"), Color::parse("blue").expect("blue")],
        ..StyleConfig::default()
    };
    let input = BarsInput::new(vec![1.0, 2.0, 3.0, 4.0, 5.0])
        .with_categories(["x", "y", "y", "z", "w"]);
    let bars =
        PreparedBars::prepare(input, &ChartOptions::default(), &style).expect("prepare bars");

    let labels: Vec<&str> = bars.legend().iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, vec!["x", "y", "else"]);
    let fallback = bars
        .legend()
        .iter()
        .find(|entry| entry.label == "else")
        .expect("default entry");
    assert_eq!(fallback.color, style.default_color);
}

#[test]
fn explicit_color_map_overrides_the_palette() {
    let mut color_dic = IndexMap::new();
    color_dic.insert("fruit".to_owned(), Color::parse("#ff0000").expect("color"));
    let input = BarsInput::new(vec![1.0, 2.0]).with_categories(["fruit", "veg"]);
    let bars = prepare(input, &ChartOptions::default().with_color_dic(color_dic));

    let colors = bars.colors().expect("colors");
    assert_eq!(colors[1], Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(colors[0], Color::BLACK);
    assert_eq!(bars.legend().len(), 2);
}

#[test]
fn spread_reflects_decimal_magnitudes() {
    let bars = prepare(BarsInput::new(vec![5.0, 50_000.0]), &ChartOptions::default());
    assert_eq!(bars.spread(), 4);
}

#[test]
fn mismatched_lengths_are_rejected() {
    let input = BarsInput::new(vec![1.0, 2.0]).with_left_labels(LabelSource::values(["a"]));
    let err = PreparedBars::prepare(input, &ChartOptions::default(), &StyleConfig::default())
        .expect_err("length mismatch must fail");

    assert!(matches!(err, ChartError::InvalidData(_)));
    assert!(err.to_string().contains("same length"));
}

#[test]
fn negative_values_name_their_position() {
    let input = BarsInput::new(vec![1.0, -2.0]);
    let err = PreparedBars::prepare(input, &ChartOptions::default(), &StyleConfig::default())
        .expect_err("negative value must fail");

    assert!(err.to_string().contains("zero-based position 1"));
}

#[test]
fn empty_and_out_of_range_inputs_are_rejected() {
    let empty = PreparedBars::prepare(
        BarsInput::new(Vec::new()),
        &ChartOptions::default(),
        &StyleConfig::default(),
    );
    assert!(empty.is_err());

    for slice in [(0, 2), (3, 2), (1, 5)] {
        let err = PreparedBars::prepare(
            BarsInput::new(vec![1.0, 2.0, 3.0]),
            &ChartOptions::default().with_slice(slice.0, slice.1),
            &StyleConfig::default(),
        )
        .expect_err("invalid slice must fail");
        assert!(err.is_configuration());
    }
}

#[test]
fn unknown_label_options_are_configuration_errors() {
    let err = LabelSource::from_option("median").expect_err("unknown option must fail");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

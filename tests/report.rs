mod common;

use csv_report::{
    dataset::Dataset,
    error::ReportError,
    generate_report,
    generator::{PromptReportGenerator, ReportGenerator, StatisticalReportGenerator},
    profile::{ColumnType, analyze_columns},
    stats::summarize_column,
};

use common::{SALES_DATA, fixture_text, single_column_csv};

#[test]
fn sales_fixture_profiles_every_column_in_header_order() {
    let dataset = Dataset::from_csv_str(&fixture_text(SALES_DATA)).expect("parse sales");
    let profiles = analyze_columns(&dataset);
    let summary = profiles
        .iter()
        .map(|p| (p.name.as_str(), p.inferred_type, p.missing_percentage))
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        vec![
            ("order_id", ColumnType::Numerical, 0.0),
            ("region", ColumnType::Categorical, 0.0),
            ("units", ColumnType::Numerical, 12.5),
            ("unit_price", ColumnType::Numerical, 0.0),
            ("status", ColumnType::Categorical, 12.5),
        ]
    );
}

#[test]
fn sales_report_renders_statistics() {
    let report = generate_report(&fixture_text(SALES_DATA)).expect("report");
    let text = report.text();
    assert!(text.contains("- Rows: 8\n- Columns: 5"));
    assert!(text.contains("- **units**: Numerical, 12.5% missing"));
    assert!(text.contains(
        "### order_id\n\n- Mean: 1003.75\n- Median: 1004.00\n- Min: 1001.00\n- Max: 1007.00\n- Std Dev: 1.98\n"
    ));
    assert!(text.contains("### units\n\n- Mean: 3.43\n- Median: 3.00"));
    assert!(text.contains("- Std Dev: 1.92"));
    assert!(!text.contains("### region"));
    assert!(text.contains("The dataset contains 8 rows across 5 columns, 3 of which are numerical."));
}

#[test]
fn missing_percentage_counts_blank_cells() {
    let dataset = Dataset::from_csv_str(&single_column_csv("v", &["1", "", "  ", "2"])).unwrap();
    assert_eq!(analyze_columns(&dataset)[0].missing_percentage, 50.0);
}

#[test]
fn missing_percentage_covers_every_row_not_just_the_sample() {
    let mut cells = vec!["5"; 100];
    cells.extend(std::iter::repeat_n("", 100));
    let report = generate_report(&single_column_csv("v", &cells)).unwrap();
    assert!(report.text().contains("- Rows: 200\n"));
    assert!(report.text().contains("- **v**: Numerical, 50.0% missing"));
}

#[test]
fn type_inference_threshold_is_exclusive() {
    let at_threshold = Dataset::from_csv_str(&single_column_csv("v", &["1", "2", "3", "4", "x"]))
        .unwrap();
    assert_eq!(
        analyze_columns(&at_threshold)[0].inferred_type,
        ColumnType::Categorical
    );

    let above = Dataset::from_csv_str(&single_column_csv("v", &["1", "2", "3", "4", "5", "x"]))
        .unwrap();
    assert_eq!(analyze_columns(&above)[0].inferred_type, ColumnType::Numerical);
}

#[test]
fn median_uses_lower_middle_element() {
    let dataset = Dataset::from_csv_str(&single_column_csv("v", &["1", "2", "3", "4"])).unwrap();
    assert_eq!(summarize_column(&dataset, 0).unwrap().median, 3.0);
}

#[test]
fn std_dev_is_population_based() {
    let dataset = Dataset::from_csv_str(&single_column_csv(
        "v",
        &["2", "4", "4", "4", "5", "5", "7", "9"],
    ))
    .unwrap();
    let summary = summarize_column(&dataset, 0).unwrap();
    assert_eq!(summary.mean, 5.0);
    assert_eq!(summary.std_dev, 2.0);
}

#[test]
fn single_value_reports_zero_std_dev() {
    let report = generate_report("v\n10\n").unwrap();
    assert!(report.text().contains("- Std Dev: 0.00"));
}

#[test]
fn report_is_byte_identical_across_runs() {
    let text = fixture_text(SALES_DATA);
    let first = generate_report(&text).unwrap();
    let second = generate_report(&text).unwrap();
    assert_eq!(first.text().as_bytes(), second.text().as_bytes());
}

#[test]
fn numerical_column_without_numbers_reports_placeholder() {
    // such a column never samples as numerical, so go through the aggregator
    let dataset =
        Dataset::from_csv_str(&single_column_csv("v", &["NaN-text", "NaN-text"])).unwrap();
    let err = summarize_column(&dataset, 0).unwrap_err();
    assert_eq!(err.to_string(), "N/A (no numeric values)");
}

#[test]
fn overflowing_numerals_are_not_numeric() {
    // "1e999" overflows to infinity and is rejected as non-finite
    let report = generate_report("big,n\n1e999,1\n1e999,2\n").unwrap();
    assert!(report.text().contains("- **big**: Categorical, 0.0% missing"));
    assert!(report.text().contains("### n"));
}

#[test]
fn huge_finite_values_render_as_numbers() {
    let report = generate_report("v\n1e308\n1e308\n").unwrap();
    let text = report.text();
    assert!(!text.contains(": inf"));
    assert!(text.contains("- Std Dev: 0.00"));
    assert!(text.contains("- Mean: 1000"));
    assert!(text.contains("- Max: 1000"));
}

#[test]
fn repeated_header_names_are_renamed_not_rejected() {
    let report = generate_report("a,a\n1,2\n").unwrap();
    let text = report.text();
    assert!(text.contains("- **a**: Numerical, 0.0% missing"));
    assert!(text.contains("- **a_1**: Numerical, 0.0% missing"));
    assert!(text.contains("### a_1\n\n- Mean: 2.00"));
}

#[test]
fn header_only_input_is_rejected_before_analysis() {
    let err = generate_report("a,b,c\n").unwrap_err();
    assert_eq!(err.downcast_ref::<ReportError>(), Some(&ReportError::EmptyInput));
}

#[test]
fn generators_share_one_interface() {
    let dataset = Dataset::from_csv_str(&fixture_text(SALES_DATA)).unwrap();
    let backend = |prompt: &str| -> anyhow::Result<String> {
        Ok(format!("# Generated\n\n{} bytes analysed", prompt.len()))
    };
    let generators: Vec<Box<dyn ReportGenerator>> = vec![
        Box::new(StatisticalReportGenerator),
        Box::new(PromptReportGenerator::new(backend)),
    ];
    for generator in &generators {
        let report = generator.generate(&dataset).expect(generator.name());
        assert!(!report.text().trim().is_empty());
    }
}

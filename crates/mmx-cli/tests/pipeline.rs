//! Integration tests for CSV ingestion and the transform/validate stages.

use std::io::Write;

use mmx_cli::ingest::load_dataset;
use mmx_cli::pipeline::{TransformRequest, check_formulas, filter_stage, run_transform};
use mmx_model::{CellValue, Dataset};
use mmx_transform::ExpansionOptions;
use tempfile::NamedTempFile;

const WEEKLY: &str = "\
date,tv_spend,radio,sales
2021-01-01,100,5,10
2021-01-02,0,,12
2021-01-03,0,7,11
2021-01-04,50,n/a,15
2021-01-05,0,2,14
";

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn weekly() -> Dataset {
    let file = write_csv(WEEKLY);
    load_dataset(file.path()).unwrap()
}

fn request(formulas: &[&str]) -> TransformRequest {
    TransformRequest {
        formulas: formulas.iter().map(ToString::to_string).collect(),
        ..TransformRequest::default()
    }
}

#[test]
fn test_load_detects_numeric_cells() {
    let dataset = weekly();
    assert_eq!(dataset.columns, ["date", "tv_spend", "radio", "sales"]);
    assert_eq!(dataset.len(), 5);
    let first = &dataset.rows[0];
    assert_eq!(first["date"], CellValue::from("2021-01-01"));
    assert_eq!(first["tv_spend"], CellValue::Number(100.0));
    assert_eq!(dataset.rows[1]["radio"], CellValue::Empty);
    assert_eq!(dataset.rows[3]["radio"], CellValue::from("n/a"));
}

#[test]
fn test_load_strips_bom() {
    let file = write_csv("\u{feff}date,x\n2021-01-01,1\n");
    let dataset = load_dataset(file.path()).unwrap();
    assert_eq!(dataset.columns, ["date", "x"]);
}

#[test]
fn test_load_missing_file_has_context() {
    let err = load_dataset(std::path::Path::new("/nonexistent/weekly.csv")).unwrap_err();
    assert!(err.to_string().starts_with("read csv: "));
}

#[test]
fn test_transform_names_series_canonically() {
    let dataset = weekly();
    let report = run_transform(&dataset, &request(&["adstock(lag(tv_spend, 1), 0.5)"])).unwrap();
    assert_eq!(report.rows_kept, 5);
    assert!(report.warnings.is_empty());
    let series = &report.series[0];
    assert_eq!(series.name, "adstock(lag(tv_spend, 1), 0.5)");
    assert!(series.values.iter().all(|v| v.is_nan()));
}

#[test]
fn test_transform_lead_then_adstock() {
    let dataset = weekly();
    let report = run_transform(&dataset, &request(&["adstock(lead(tv_spend, 1), 0.5)"])).unwrap();
    let series = &report.series[0];
    assert_eq!(&series.values[..4], &[0.0, 0.0, 50.0, 25.0]);
    assert!(series.values[4].is_nan());
}

#[test]
fn test_transform_with_date_range() {
    let dataset = weekly();
    let mut req = request(&["sales", "log(sales)"]);
    req.date_column = Some("date".to_string());
    req.start = Some("2021-01-02".to_string());
    req.end = Some("2021-01-04".to_string());

    let report = run_transform(&dataset, &req).unwrap();
    assert_eq!(report.rows_total, 5);
    assert_eq!(report.rows_kept, 3);
    assert_eq!(
        report.dates.as_deref(),
        Some(&["2021-01-02".to_string(), "2021-01-03".to_string(), "2021-01-04".to_string()][..])
    );
    assert_eq!(report.series[0].values, vec![12.0, 11.0, 15.0]);
    assert!((report.series[1].values[0] - 12f64.ln()).abs() < 1e-12);
}

#[test]
fn test_non_numeric_cells_become_gaps() {
    let dataset = weekly();
    let report = run_transform(&dataset, &request(&["radio"])).unwrap();
    let values = &report.series[0].values;
    assert_eq!(values[0], 5.0);
    assert!(values[1].is_nan());
    assert!(values[3].is_nan());
    insta::assert_snapshot!(
        serde_json::to_string(&report.series[0]).unwrap(),
        @r#"{"name":"radio","values":[5.0,null,7.0,null,2.0]}"#
    );
}

#[test]
fn test_lenient_formula_is_applied_with_warning() {
    let dataset = weekly();
    let report = run_transform(&dataset, &request(&["adstock(log(sales), 0.5)"])).unwrap();
    // The inner log is not the outermost wrapper, so only the adstock applies.
    assert_eq!(report.series[0].name, "adstock(sales, 0.5)");
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("out of canonical order"));
}

#[test]
fn test_unknown_variable_fails() {
    let dataset = weekly();
    let err = run_transform(&dataset, &request(&["log(tv)"])).unwrap_err();
    assert_eq!(format!("{err:#}"), "apply formula 'log(tv)': variable 'tv' not found in dataset");
}

#[test]
fn test_empty_formula_fails() {
    let dataset = weekly();
    let err = run_transform(&dataset, &request(&["  "])).unwrap_err();
    assert!(format!("{err:#}").ends_with("empty or malformed formula"));
}

#[test]
fn test_bounds_require_date_column() {
    let dataset = weekly();
    let mut req = request(&["sales"]);
    req.start = Some("2021-01-01".to_string());
    assert!(filter_stage(&dataset, &req).is_err());

    req.date_column = Some("week".to_string());
    let err = filter_stage(&dataset, &req).unwrap_err();
    assert_eq!(err.to_string(), "date column 'week' not found in dataset");
}

#[test]
fn test_half_open_range_keeps_everything() {
    let dataset = weekly();
    let mut req = request(&["sales"]);
    req.date_column = Some("date".to_string());
    req.end = Some("2021-01-02".to_string());
    assert_eq!(filter_stage(&dataset, &req).unwrap().len(), 5);
}

#[test]
fn test_log_offset_reaches_engine() {
    let dataset = weekly();
    let mut req = request(&["log(tv_spend)"]);
    req.options = ExpansionOptions::default().with_log_offset(1.0);
    let report = run_transform(&dataset, &req).unwrap();
    assert_eq!(report.series[0].values[1], 0.0);
}

#[test]
fn test_check_formulas() {
    let dataset = weekly();
    let checks = check_formulas(
        &dataset,
        &[
            "log(adstock(tv_spend, 0.5))".to_string(),
            "adstock(log(tv_spend), 0.5)".to_string(),
            "ln(sales)".to_string(),
        ],
    );
    assert!(checks[0].validation.valid);
    assert!(!checks[1].validation.valid);
    assert_eq!(checks[1].canonical.as_deref(), Some("adstock(tv_spend, 0.5)"));
    insta::assert_snapshot!(
        serde_json::to_string(&checks[2]).unwrap(),
        @r#"{"formula":"ln(sales)","canonical":"sales","valid":false,"error":"Unknown function 'ln'"}"#
    );
}

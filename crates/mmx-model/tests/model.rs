//! Tests for mmx-model types.

use mmx_model::{
    CellValue, Dataset, MmxError, PreTransform, Row, TransformationSpec, TransformationStep,
    TransformedSeries,
};

fn row(pairs: &[(&str, CellValue)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

#[test]
fn spec_serializes_camel_case() {
    let spec = TransformationSpec::identity("sales")
        .with_adstock(0.5)
        .with_pre_transform(PreTransform::Log);
    let json = serde_json::to_value(&spec).expect("serialize spec");
    assert_eq!(json["variable"], "sales");
    assert_eq!(json["preTransform"], "log");
    assert_eq!(json["adstock"], 0.5);
    assert_eq!(json["dimretAdstock"], false);
}

#[test]
fn spec_deserializes_with_defaults() {
    let spec: TransformationSpec =
        serde_json::from_str(r#"{"variable":"tv","lag":2}"#).expect("deserialize spec");
    assert_eq!(spec, TransformationSpec::identity("tv").with_lag(2));
}

#[test]
fn step_uses_type_tag() {
    let step = TransformationStep::LagLead { amount: -2.0 };
    let json = serde_json::to_string(&step).expect("serialize step");
    assert_eq!(json, r#"{"type":"lag_lead","amount":-2.0}"#);

    let round: TransformationStep =
        serde_json::from_str(r#"{"type":"moving_average","amount":3}"#).expect("deserialize");
    assert_eq!(round, TransformationStep::MovingAverage { amount: 3.0 });
}

#[test]
fn numeric_column_maps_bad_cells_to_nan() {
    let dataset = Dataset::from_rows(vec![
        row(&[("date", "2021-01-01".into()), ("tv", 1.5.into())]),
        row(&[("date", "2021-01-02".into()), ("tv", " 2 ".into())]),
        row(&[("date", "2021-01-03".into()), ("tv", "n/a".into())]),
        row(&[("date", "2021-01-04".into())]),
    ]);

    let values = dataset.numeric_column("tv").expect("tv column");
    assert_eq!(values.len(), 4);
    assert_eq!(values[0], 1.5);
    assert_eq!(values[1], 2.0);
    assert!(values[2].is_nan());
    assert!(values[3].is_nan());
}

#[test]
fn numeric_column_rejects_unknown_variable() {
    let dataset = Dataset::from_rows(vec![row(&[("tv", 1.0.into())])]);
    let err = dataset.numeric_column("radio").unwrap_err();
    assert!(matches!(err, MmxError::UnknownVariable { ref name } if name == "radio"));
    assert_eq!(err.to_string(), "variable 'radio' not found in dataset");
}

#[test]
fn from_rows_keeps_first_seen_columns() {
    let dataset = Dataset::from_rows(vec![
        row(&[("b", 1.0.into())]),
        row(&[("a", 1.0.into()), ("b", 2.0.into())]),
    ]);
    assert_eq!(dataset.column_names(), ["b".to_string(), "a".to_string()]);
}

#[test]
fn transformed_series_writes_nan_as_null() {
    let series = TransformedSeries::new("lag(tv, 1)", vec![f64::NAN, 1.0, f64::NEG_INFINITY]);
    let json = serde_json::to_string(&series).expect("serialize series");
    assert_eq!(json, r#"{"name":"lag(tv, 1)","values":[null,1.0,null]}"#);

    let round: TransformedSeries = serde_json::from_str(&json).expect("deserialize series");
    assert!(round.values[0].is_nan());
    assert_eq!(round.values[1], 1.0);
    assert_eq!(round.finite_count(), 1);
}

#[test]
fn cell_value_text_rendering() {
    assert_eq!(CellValue::Empty.as_text(), None);
    assert_eq!(CellValue::Text("  ".into()).as_text(), None);
    assert_eq!(
        CellValue::Number(20210101.0).as_text().as_deref(),
        Some("20210101")
    );
    assert!(CellValue::Text(" ".into()).is_empty());
}

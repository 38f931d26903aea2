//! The stages behind `mmx transform` and `mmx validate`.
//!
//! Kept free of printing so the same flow can be asserted in tests:
//! filter the dataset by date, then parse, expand and apply each formula.

use anyhow::{Context, Result, bail};
use mmx_formula::{FormulaValidation, format_formula, parse, validate};
use mmx_model::{Dataset, TransformedSeries};
use mmx_transform::{ExpansionOptions, transform_column};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

/// Inputs of one transform run.
#[derive(Debug, Clone, Default)]
pub struct TransformRequest {
    pub formulas: Vec<String>,
    pub date_column: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub options: ExpansionOptions,
}

/// Output of one transform run.
#[derive(Debug, Clone, Serialize)]
pub struct TransformReport {
    pub rows_total: usize,
    pub rows_kept: usize,
    /// Date cells of the kept rows, when a date column was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<String>>,
    pub series: Vec<TransformedSeries>,
    /// Formulas that were applied despite failing validation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Validation outcome for one formula.
#[derive(Debug, Clone, Serialize)]
pub struct FormulaCheck {
    pub formula: String,
    /// Canonical rewrite, when the formula parses at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(flatten)]
    pub validation: FormulaValidation,
}

/// Restrict `dataset` to the requested date range.
///
/// Without a date column the dataset is returned as is; bounds without a
/// date column are rejected.
pub fn filter_stage(dataset: &Dataset, request: &TransformRequest) -> Result<Dataset> {
    let Some(date_column) = request.date_column.as_deref() else {
        if request.start.is_some() || request.end.is_some() {
            bail!("--start/--end require --date-column");
        }
        return Ok(dataset.clone());
    };
    if !dataset.has_column(date_column) {
        bail!("date column '{date_column}' not found in dataset");
    }
    let view = mmx_view::filter(
        dataset,
        date_column,
        request.start.as_deref(),
        request.end.as_deref(),
    )
    .context("apply date range")?;
    info!(
        date_column,
        rows_total = dataset.len(),
        rows_kept = view.len(),
        "filtered dataset"
    );
    Ok(view)
}

/// Filter, then apply every formula of the request.
pub fn run_transform(dataset: &Dataset, request: &TransformRequest) -> Result<TransformReport> {
    let view = filter_stage(dataset, request)?;
    let dates = match request.date_column.as_deref() {
        Some(column) => Some(view.text_column(column)?),
        None => None,
    };

    let mut series = Vec::with_capacity(request.formulas.len());
    let mut warnings = Vec::new();
    for formula in &request.formulas {
        let span = info_span!("formula", formula = %formula);
        let _guard = span.enter();

        let spec = parse(formula).with_context(|| format!("parse formula '{formula}'"))?;
        let validation = validate(formula, dataset.column_names());
        if let Some(error) = validation.error {
            warn!(%error, "formula failed validation, applying lenient parse");
            warnings.push(format!("{formula}: {error}"));
        }

        let name = format_formula(&spec);
        let output = transform_column(&view, &spec, name, &request.options)
            .with_context(|| format!("apply formula '{formula}'"))?;
        debug!(
            name = %output.name,
            finite = output.finite_count(),
            len = output.len(),
            "transformed column"
        );
        series.push(output);
    }

    Ok(TransformReport {
        rows_total: dataset.len(),
        rows_kept: view.len(),
        dates,
        series,
        warnings,
    })
}

/// Validate every formula against the dataset's columns.
pub fn check_formulas(dataset: &Dataset, formulas: &[String]) -> Vec<FormulaCheck> {
    formulas
        .iter()
        .map(|formula| FormulaCheck {
            formula: formula.clone(),
            canonical: parse(formula).ok().map(|spec| format_formula(&spec)),
            validation: validate(formula, dataset.column_names()),
        })
        .collect()
}

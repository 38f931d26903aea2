use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use mmx_cli::ingest::load_dataset;
use mmx_cli::pipeline::{TransformRequest, check_formulas, run_transform};
use mmx_formula::formula_examples;
use mmx_transform::ExpansionOptions;

use crate::cli::{OutputFormatArg, TransformArgs, ValidateArgs};
use crate::summary::{apply_table_style, print_series_table, print_validation_table};

pub fn run_transform_command(args: &TransformArgs) -> Result<()> {
    let span = info_span!("transform", input = %args.input.display());
    let _guard = span.enter();
    let started = Instant::now();

    let dataset = load_dataset(&args.input)?;
    let request = TransformRequest {
        formulas: args.formulas.clone(),
        date_column: args.date_column.clone(),
        start: args.start.clone(),
        end: args.end.clone(),
        options: ExpansionOptions::default().with_log_offset(args.log_offset),
    };
    let report = run_transform(&dataset, &request)?;
    info!(
        series = report.series.len(),
        rows = report.rows_kept,
        elapsed_ms = started.elapsed().as_millis(),
        "transform complete"
    );

    match args.format {
        OutputFormatArg::Table => print_series_table(&report),
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&report).context("serialize report")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Returns `true` when every formula is valid.
pub fn run_validate_command(args: &ValidateArgs) -> Result<bool> {
    let dataset = load_dataset(&args.input)?;
    let checks = check_formulas(&dataset, &args.formulas);
    let invalid = checks.iter().filter(|c| !c.validation.valid).count();
    info!(formulas = checks.len(), invalid, "validation complete");

    match args.format {
        OutputFormatArg::Table => print_validation_table(&checks),
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&checks).context("serialize checks")?;
            println!("{json}");
        }
    }
    Ok(invalid == 0)
}

pub fn run_examples() {
    let mut table = Table::new();
    table.set_header(vec!["Formula"]);
    apply_table_style(&mut table);
    for example in formula_examples() {
        table.add_row(vec![*example]);
    }
    println!("{table}");
}

//! CSV ingestion into a [`Dataset`].

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use mmx_model::{CellValue, Dataset, Row};
use tracing::info;

/// Load a headed CSV file.
///
/// Cells that read as finite numbers become [`CellValue::Number`], blank
/// cells [`CellValue::Empty`], and everything else stays text. Column order
/// follows the header.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("read headers: {}", path.display()))?
        .iter()
        .map(|h| h.trim().trim_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let mut row = Row::new();
        for (idx, value) in record.iter().enumerate() {
            let Some(key) = headers.get(idx) else {
                continue;
            };
            row.insert(key.clone(), parse_cell(value));
        }
        rows.push(row);
    }

    info!(
        path = %path.display(),
        rows = rows.len(),
        columns = headers.len(),
        "loaded dataset"
    );
    Ok(Dataset::new(headers, rows))
}

/// Classify one raw CSV field.
pub fn parse_cell(value: &str) -> CellValue {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => CellValue::Number(number),
        _ => CellValue::Text(trimmed.to_string()),
    }
}

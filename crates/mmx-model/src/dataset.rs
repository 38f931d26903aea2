//! Tabular input data as handed over by file ingestion.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MmxError, Result};

/// A single cell: text, a number, or nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    /// Returns true for `Empty` and blank text.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Textual rendering of the cell, `None` when empty.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) if s.trim().is_empty() => None,
            CellValue::Text(s) => Some(Cow::Borrowed(s.trim())),
            CellValue::Number(n) => Some(Cow::Owned(n.to_string())),
        }
    }

    /// Numeric value of the cell; text is parsed, anything else is `NaN`.
    pub fn as_f64(&self) -> f64 {
        match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            CellValue::Empty => f64::NAN,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// One record, keyed by column name.
pub type Row = BTreeMap<String, CellValue>;

/// Ordered rows plus the column order they were read with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Build a dataset whose column order is the first-seen key order.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    /// Same columns, different rows.
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Extract a column as numbers.
    ///
    /// Missing or non-numeric cells become `NaN`; an unknown column is an error.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        if !self.has_column(name) {
            return Err(MmxError::UnknownVariable {
                name: name.to_string(),
            });
        }
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(name).map_or(f64::NAN, CellValue::as_f64))
            .collect())
    }

    /// Extract a column as display text (empty string for missing cells).
    pub fn text_column(&self, name: &str) -> Result<Vec<String>> {
        if !self.has_column(name) {
            return Err(MmxError::UnknownVariable {
                name: name.to_string(),
            });
        }
        Ok(self
            .rows
            .iter()
            .map(|row| {
                row.get(name)
                    .and_then(CellValue::as_text)
                    .map(Cow::into_owned)
                    .unwrap_or_default()
            })
            .collect())
    }
}

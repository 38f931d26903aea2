//! Date-bounded row selection.

use chrono::NaiveDate;
use mmx_model::{CellValue, Dataset, MmxError, Result, Row};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::datetime::{SlashOrder, parse_calendar_day};

/// Inclusive calendar-day bounds.
///
/// The range only filters when both ends are set; a half-open range lets
/// every row through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Both bounds as days.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// Read bounds from text. Blank strings count as absent; anything else
    /// that is not a calendar day fails with [`MmxError::InvalidDate`].
    pub fn parse(start: Option<&str>, end: Option<&str>, order: SlashOrder) -> Result<Self> {
        Ok(Self {
            start: parse_bound(start, order)?,
            end: parse_bound(end, order)?,
        })
    }

    /// True when both bounds are set and rows will actually be filtered.
    pub fn is_active(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Inclusion test for one day; an inactive range contains every day.
    pub fn contains(&self, day: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= day && day <= end,
            _ => true,
        }
    }
}

fn parse_bound(value: Option<&str>, order: SlashOrder) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(text) => parse_calendar_day(text, order)
            .map(Some)
            .ok_or_else(|| MmxError::InvalidDate {
                value: text.to_string(),
            }),
    }
}

/// Row filter bound to one date column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub date_column: String,
    #[serde(default)]
    pub order: SlashOrder,
}

impl RangeFilter {
    pub fn new(date_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
            order: SlashOrder::default(),
        }
    }

    pub fn with_order(mut self, order: SlashOrder) -> Self {
        self.order = order;
        self
    }

    /// The rows whose date falls inside `range`, in their original order.
    ///
    /// With an inactive range every row is returned unchanged, including
    /// rows with no usable date. Otherwise rows without a date, or whose
    /// date cannot be parsed, are dropped one by one.
    pub fn filter(&self, rows: &[Row], range: &DateRange) -> Vec<Row> {
        let (Some(start), Some(end)) = (range.start, range.end) else {
            return rows.to_vec();
        };

        let mut missing = 0usize;
        let mut unparseable = 0usize;
        let mut kept = Vec::new();

        for row in rows {
            let Some(text) = row.get(&self.date_column).and_then(CellValue::as_text) else {
                missing += 1;
                continue;
            };
            let Some(day) = parse_calendar_day(&text, self.order) else {
                unparseable += 1;
                continue;
            };
            if start <= day && day <= end {
                kept.push(row.clone());
            }
        }

        if missing > 0 || unparseable > 0 {
            debug!(
                date_column = %self.date_column,
                missing,
                unparseable,
                "excluded rows without a usable date"
            );
        }
        debug!(
            date_column = %self.date_column,
            %start,
            %end,
            total = rows.len(),
            kept = kept.len(),
            "applied date range"
        );
        kept
    }
}

/// Filter rows by `date_column` with month-first slash dates.
pub fn filter_rows(rows: &[Row], date_column: &str, range: &DateRange) -> Vec<Row> {
    RangeFilter::new(date_column).filter(rows, range)
}

/// Date-bounded view of a dataset from textual bounds.
///
/// Column order is preserved. Bounds follow [`DateRange::parse`].
pub fn filter(
    dataset: &Dataset,
    date_column: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Dataset> {
    let range = DateRange::parse(start, end, SlashOrder::default())?;
    Ok(dataset.with_rows(filter_rows(&dataset.rows, date_column, &range)))
}

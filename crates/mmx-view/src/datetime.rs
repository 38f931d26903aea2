//! Calendar-day parsing for date columns and range bounds.
//!
//! Only the calendar day matters for range filtering, so every accepted
//! form is reduced to a [`NaiveDate`]. A time of day is dropped and a UTC
//! offset (`Z`, `+02:00`, `-0500`) is ignored: `2021-01-05T23:30:00-05:00`
//! is 5 January, the day as written.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// How to read ambiguous `NN/NN/YYYY` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlashOrder {
    /// `01/02/2021` is 2 January.
    #[default]
    MonthFirst,
    /// `01/02/2021` is 1 February.
    DayFirst,
}

impl SlashOrder {
    fn date_formats(self) -> [&'static str; 2] {
        match self {
            SlashOrder::MonthFirst => ["%m/%d/%Y", "%d/%m/%Y"],
            SlashOrder::DayFirst => ["%d/%m/%Y", "%m/%d/%Y"],
        }
    }
}

/// Date-only formats tried after the slash forms.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%b-%Y",  // 15-Jan-2024
    "%d %b %Y",  // 15 Jan 2024
    "%b %d, %Y", // Jan 15, 2024
    "%B %d, %Y", // January 15, 2024
];

/// Time suffixes accepted after any date form.
const TIME_FORMATS: [&str; 6] = [
    "T%H:%M:%S%.f",
    "T%H:%M:%S",
    "T%H:%M",
    " %H:%M:%S%.f",
    " %H:%M:%S",
    " %H:%M",
];

/// Parse `value` as a calendar day.
///
/// The preferred slash order is tried first; when it yields an impossible
/// date (`13/01/2021` month-first) the other order is tried. Returns `None`
/// for empty or unrecognized input, including compact `20210101`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use mmx_view::{SlashOrder, parse_calendar_day};
///
/// let day = NaiveDate::from_ymd_opt(2021, 1, 5);
/// assert_eq!(parse_calendar_day("2021-01-05T18:00:00Z", SlashOrder::MonthFirst), day);
/// assert_eq!(parse_calendar_day("01/05/2021", SlashOrder::MonthFirst), day);
/// assert_eq!(parse_calendar_day("05/01/2021", SlashOrder::DayFirst), day);
/// ```
pub fn parse_calendar_day(value: &str, order: SlashOrder) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let local = strip_utc_offset(trimmed);

    let [preferred, fallback] = order.date_formats();
    let formats = [preferred, fallback]
        .into_iter()
        .chain(DATE_FORMATS.iter().copied());

    for date_format in formats {
        if let Ok(day) = NaiveDate::parse_from_str(local, date_format) {
            return Some(day);
        }
        for time_format in TIME_FORMATS {
            let full = format!("{date_format}{time_format}");
            if let Ok(datetime) = NaiveDateTime::parse_from_str(local, &full) {
                return Some(datetime.date());
            }
        }
    }

    None
}

/// Drop a trailing `Z` or `±HH:MM`/`±HHMM` following a time of day.
fn strip_utc_offset(value: &str) -> &str {
    let Some(time_start) = value.find(['T', ' ']).filter(|&i| {
        value[i + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
    }) else {
        return value;
    };

    if let Some(stripped) = value.strip_suffix(['Z', 'z']) {
        return stripped;
    }

    let time = &value[time_start + 1..];
    match time.rfind(['+', '-']) {
        Some(sign) => {
            let offset = &time[sign + 1..];
            let digits = offset.chars().filter(char::is_ascii_digit).count();
            let well_formed = offset.chars().all(|c| c.is_ascii_digit() || c == ':')
                && (digits == 2 || digits == 4);
            if well_formed {
                &value[..time_start + 1 + sign]
            } else {
                value
            }
        }
        None => value,
    }
}

//! Range-filtered views of a dataset.
//!
//! - **datetime**: reducing date cells and bounds to calendar days
//! - **filter**: [`DateRange`] and row selection by inclusive day bounds

pub mod datetime;
pub mod filter;

pub use datetime::{SlashOrder, parse_calendar_day};
pub use filter::{DateRange, RangeFilter, filter, filter_rows};

//! Shared data model for media-mix variable transformations.
//!
//! - **spec**: the parsed form of a transformation formula
//! - **step**: elementary engine operations
//! - **dataset**: tabular rows handed over by file ingestion
//! - **series**: the named output column

pub mod dataset;
pub mod error;
pub mod series;
pub mod spec;
pub mod step;

pub use dataset::{CellValue, Dataset, Row};
pub use error::{MmxError, Result};
pub use series::TransformedSeries;
pub use spec::{PreTransform, TransformationSpec};
pub use step::{StepKind, TransformationStep};

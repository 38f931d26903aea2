//! Transformation engine for media-mix variables.
//!
//! - **ops**: elementary series operations (`apply_*`)
//! - **engine**: left-to-right folding of steps
//! - **expand**: turning a [`mmx_model::TransformationSpec`] into ordered steps
//! - **pipeline**: named step sequences with statistics
//! - **column**: running a spec against a dataset column
//!
//! Every function is pure: inputs are borrowed, outputs freshly allocated,
//! so calls can run concurrently without coordination.

pub mod column;
pub mod engine;
pub mod expand;
pub mod ops;
pub mod pipeline;

pub use column::transform_column;
pub use engine::{apply_all, apply_step};
pub use expand::{ExpansionOptions, expand};
pub use pipeline::{PipelineStats, StepCategory, TransformPipeline};

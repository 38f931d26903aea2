//! Applying a spec to a dataset column.

use mmx_model::{Dataset, Result, TransformationSpec, TransformedSeries};

use crate::expand::ExpansionOptions;
use crate::pipeline::TransformPipeline;

/// Transform the column named by `spec.variable`.
///
/// The variable is checked against the dataset here and nowhere earlier;
/// an unknown name fails with [`mmx_model::MmxError::UnknownVariable`].
/// Non-numeric cells enter the engine as `NaN`. The output series is
/// called `name`, typically the canonical formula.
pub fn transform_column(
    dataset: &Dataset,
    spec: &TransformationSpec,
    name: impl Into<String>,
    options: &ExpansionOptions,
) -> Result<TransformedSeries> {
    let series = dataset.numeric_column(&spec.variable)?;
    let pipeline = TransformPipeline::from_spec(name, spec, options);
    Ok(pipeline.execute(&series))
}

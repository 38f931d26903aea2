//! Named, inspectable step sequences.
//!
//! A [`TransformPipeline`] is the expanded form of one formula: the ordered
//! steps plus the name the output column will carry. Callers can inspect or
//! extend it before running it, e.g. to append a smoothing step.

use mmx_model::{StepKind, TransformationSpec, TransformationStep, TransformedSeries};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::apply_all;
use crate::expand::{ExpansionOptions, expand};

/// Stage a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepCategory {
    Temporal,
    Decay,
    Saturation,
    Smoothing,
    Numeric,
}

impl StepCategory {
    pub fn of(kind: StepKind) -> Self {
        match kind {
            StepKind::LagLead => Self::Temporal,
            StepKind::Adstock | StepKind::NormalizedAdstock | StepKind::DimretAdstock => {
                Self::Decay
            }
            StepKind::DiminishingReturnsAbsolute
            | StepKind::DiminishingReturnsExponential
            | StepKind::NormalizedDiminishingReturns => Self::Saturation,
            StepKind::MovingAverage => Self::Smoothing,
            StepKind::Log | StepKind::Sqrt | StepKind::Exp => Self::Numeric,
        }
    }
}

/// Ordered steps producing one named output series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformPipeline {
    /// Name of the produced series, usually the canonical formula.
    pub name: String,

    /// Steps in execution order.
    pub steps: Vec<TransformationStep>,
}

impl TransformPipeline {
    /// Create an empty pipeline.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Build the pipeline for a parsed spec.
    pub fn from_spec(
        name: impl Into<String>,
        spec: &TransformationSpec,
        options: &ExpansionOptions,
    ) -> Self {
        Self {
            name: name.into(),
            steps: expand(spec, options),
        }
    }

    /// Append a step; it runs after every existing step.
    pub fn add_step(&mut self, step: TransformationStep) {
        self.steps.push(step);
    }

    pub fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the steps over `series`.
    pub fn execute(&self, series: &[f64]) -> TransformedSeries {
        let values = apply_all(series, &self.steps);
        let stats = self.stats();
        debug!(
            name = %self.name,
            steps = stats.total_steps,
            input_len = series.len(),
            "executed transformation pipeline"
        );
        TransformedSeries::new(self.name.clone(), values)
    }

    /// Count steps per category.
    pub fn stats(&self) -> PipelineStats {
        let mut stats = PipelineStats {
            total_steps: self.steps.len(),
            ..PipelineStats::default()
        };
        for step in &self.steps {
            match StepCategory::of(step.kind()) {
                StepCategory::Temporal => stats.temporal_steps += 1,
                StepCategory::Decay => stats.decay_steps += 1,
                StepCategory::Saturation => stats.saturation_steps += 1,
                StepCategory::Smoothing => stats.smoothing_steps += 1,
                StepCategory::Numeric => stats.numeric_steps += 1,
            }
        }
        stats
    }

    /// Display names of the steps, in order.
    pub fn describe(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.kind().display_name()).collect()
    }
}

/// Statistics about a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub total_steps: usize,
    pub temporal_steps: usize,
    pub decay_steps: usize,
    pub saturation_steps: usize,
    pub smoothing_steps: usize,
    pub numeric_steps: usize,
}

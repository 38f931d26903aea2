//! Elementary transformation steps understood by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One explicit operation on a numeric series.
///
/// Steps are applied in the order given; the engine never reorders them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformationStep {
    /// `ln(x + amount)`.
    Log { amount: f64 },

    /// `sqrt(max(x, 0))`.
    Sqrt,

    /// `e^x`.
    Exp,

    /// Signed shift: positive lags, negative leads.
    LagLead { amount: f64 },

    /// Geometric carryover `y[i] = x[i] + amount * y[i-1]`.
    Adstock { amount: f64 },

    /// Adstock scaled by `1 - amount`.
    NormalizedAdstock { amount: f64 },

    /// `x / (x + |amount|)`.
    DiminishingReturnsAbsolute { amount: f64 },

    /// `1 - exp(-amount * x)`.
    DiminishingReturnsExponential { amount: f64 },

    /// Exponential saturation rescaled to the input's sum.
    NormalizedDiminishingReturns { amount: f64 },

    /// Adstock followed by exponential saturation, as one step.
    DimretAdstock {
        decay: f64,
        slope: f64,
        #[serde(default)]
        normalized: bool,
    },

    /// Trailing simple moving average over `amount` periods.
    MovingAverage { amount: f64 },
}

/// Parameter-free discriminant of a [`TransformationStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Log,
    Sqrt,
    Exp,
    LagLead,
    Adstock,
    NormalizedAdstock,
    DiminishingReturnsAbsolute,
    DiminishingReturnsExponential,
    NormalizedDiminishingReturns,
    DimretAdstock,
    MovingAverage,
}

impl StepKind {
    /// Returns a human-readable display name for the step type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Log => "Log",
            Self::Sqrt => "Square Root",
            Self::Exp => "Exponential",
            Self::LagLead => "Lag & Lead",
            Self::Adstock => "Adstock",
            Self::NormalizedAdstock => "Normalized Adstock",
            Self::DiminishingReturnsAbsolute => "Diminishing Returns (Absolute)",
            Self::DiminishingReturnsExponential => "Diminishing Returns (Exponential)",
            Self::NormalizedDiminishingReturns => "Normalized Diminishing Returns",
            Self::DimretAdstock => "Adstock + Diminishing Returns",
            Self::MovingAverage => "Moving Average",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl TransformationStep {
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Log { .. } => StepKind::Log,
            Self::Sqrt => StepKind::Sqrt,
            Self::Exp => StepKind::Exp,
            Self::LagLead { .. } => StepKind::LagLead,
            Self::Adstock { .. } => StepKind::Adstock,
            Self::NormalizedAdstock { .. } => StepKind::NormalizedAdstock,
            Self::DiminishingReturnsAbsolute { .. } => StepKind::DiminishingReturnsAbsolute,
            Self::DiminishingReturnsExponential { .. } => StepKind::DiminishingReturnsExponential,
            Self::NormalizedDiminishingReturns { .. } => StepKind::NormalizedDiminishingReturns,
            Self::DimretAdstock { .. } => StepKind::DimretAdstock,
            Self::MovingAverage { .. } => StepKind::MovingAverage,
        }
    }

    /// The primary scalar parameter, if the step has one.
    ///
    /// For the fused step this is the decay rate.
    pub fn amount(&self) -> Option<f64> {
        match *self {
            Self::Log { amount }
            | Self::LagLead { amount }
            | Self::Adstock { amount }
            | Self::NormalizedAdstock { amount }
            | Self::DiminishingReturnsAbsolute { amount }
            | Self::DiminishingReturnsExponential { amount }
            | Self::NormalizedDiminishingReturns { amount }
            | Self::MovingAverage { amount } => Some(amount),
            Self::DimretAdstock { decay, .. } => Some(decay),
            Self::Sqrt | Self::Exp => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_amount() {
        let step = TransformationStep::Adstock { amount: 0.4 };
        assert_eq!(step.kind(), StepKind::Adstock);
        assert_eq!(step.amount(), Some(0.4));
        assert_eq!(TransformationStep::Sqrt.amount(), None);
    }

    #[test]
    fn display_names_are_distinct() {
        assert_eq!(StepKind::LagLead.to_string(), "Lag & Lead");
        assert_ne!(
            StepKind::DiminishingReturnsAbsolute.display_name(),
            StepKind::DiminishingReturnsExponential.display_name()
        );
    }
}

//! Function vocabulary of the formula language.

use std::fmt;
use std::str::FromStr;

use mmx_model::PreTransform;

/// A recognized formula function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Log,
    Sqrt,
    Exp,
    Lag,
    Lead,
    Adstock,
    NAdstock,
    Dimret,
    NDimret,
    DimretAdstock,
    NDimretAdstock,
}

/// Transformation stage a function belongs to.
///
/// Stages are listed in the order they execute, innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Temporal,
    Adstock,
    Dimret,
    PreTransform,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Temporal => "lag/lead",
            Stage::Adstock => "adstock",
            Stage::Dimret => "dimret",
            Stage::PreTransform => "log/sqrt/exp",
        }
    }

    fn slot(self) -> usize {
        match self {
            Stage::Temporal => 0,
            Stage::Adstock => 1,
            Stage::Dimret => 2,
            Stage::PreTransform => 3,
        }
    }
}

impl Function {
    pub const ALL: [Function; 11] = [
        Function::Log,
        Function::Sqrt,
        Function::Exp,
        Function::Lag,
        Function::Lead,
        Function::Adstock,
        Function::NAdstock,
        Function::Dimret,
        Function::NDimret,
        Function::DimretAdstock,
        Function::NDimretAdstock,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Function::Log => "log",
            Function::Sqrt => "sqrt",
            Function::Exp => "exp",
            Function::Lag => "lag",
            Function::Lead => "lead",
            Function::Adstock => "adstock",
            Function::NAdstock => "n_adstock",
            Function::Dimret => "dimret",
            Function::NDimret => "n_dimret",
            Function::DimretAdstock => "dimret_adstock",
            Function::NDimretAdstock => "n_dimret_adstock",
        }
    }

    /// Number of numeric arguments after the wrapped expression.
    pub fn param_count(&self) -> usize {
        match self {
            Function::Log | Function::Sqrt | Function::Exp => 0,
            Function::Lag
            | Function::Lead
            | Function::Adstock
            | Function::NAdstock
            | Function::Dimret
            | Function::NDimret => 1,
            Function::DimretAdstock | Function::NDimretAdstock => 2,
        }
    }

    /// Whether the numeric arguments must be integer periods.
    pub fn takes_periods(&self) -> bool {
        matches!(self, Function::Lag | Function::Lead)
    }

    /// Whether this is one of the `n_` normalized variants.
    pub fn is_normalized(&self) -> bool {
        matches!(
            self,
            Function::NAdstock | Function::NDimret | Function::NDimretAdstock
        )
    }

    /// Inclusive range of stages this function occupies.
    ///
    /// The fused decay+saturation functions cover both the adstock and
    /// dimret stages.
    pub fn stages(&self) -> (Stage, Stage) {
        match self {
            Function::Lag | Function::Lead => (Stage::Temporal, Stage::Temporal),
            Function::Adstock | Function::NAdstock => (Stage::Adstock, Stage::Adstock),
            Function::Dimret | Function::NDimret => (Stage::Dimret, Stage::Dimret),
            Function::DimretAdstock | Function::NDimretAdstock => (Stage::Adstock, Stage::Dimret),
            Function::Log | Function::Sqrt | Function::Exp => {
                (Stage::PreTransform, Stage::PreTransform)
            }
        }
    }

    /// Slot indices covered by [`Function::stages`].
    pub(crate) fn slots(&self) -> std::ops::RangeInclusive<usize> {
        let (lo, hi) = self.stages();
        lo.slot()..=hi.slot()
    }

    pub fn pre_transform(&self) -> Option<PreTransform> {
        match self {
            Function::Log => Some(PreTransform::Log),
            Function::Sqrt => Some(PreTransform::Sqrt),
            Function::Exp => Some(PreTransform::Exp),
            _ => None,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = String;

    /// Case-insensitive lookup by function name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Function::ALL
            .iter()
            .copied()
            .find(|f| f.name() == lower)
            .ok_or_else(|| format!("unknown function: {s}"))
    }
}

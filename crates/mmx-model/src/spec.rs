//! Structured form of a transformation formula.
//!
//! A [`TransformationSpec`] describes *what* happens to one base variable:
//! a temporal shift, a decay/saturation stage and an outer pre-transform.
//! The order those stages run in is fixed and does not depend on how the
//! formula text was nested:
//!
//! 1. temporal shift (`lag` or `lead`)
//! 2. decay/saturation (fused `dimret_adstock`, or `adstock` then `dimret`)
//! 3. pre-transform (`log`, `sqrt` or `exp`), outermost

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outer numeric transform applied after the temporal and decay stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreTransform {
    Log,
    Sqrt,
    Exp,
}

impl PreTransform {
    pub const ALL: [PreTransform; 3] = [PreTransform::Log, PreTransform::Sqrt, PreTransform::Exp];

    /// Function name as written in a formula.
    pub fn as_str(&self) -> &'static str {
        match self {
            PreTransform::Log => "log",
            PreTransform::Sqrt => "sqrt",
            PreTransform::Exp => "exp",
        }
    }
}

impl fmt::Display for PreTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreTransform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(PreTransform::Log),
            "sqrt" => Ok(PreTransform::Sqrt),
            "exp" => Ok(PreTransform::Exp),
            other => Err(format!("unknown pre-transform: {other}")),
        }
    }
}

/// Parsed transformation of a single base variable.
///
/// All numeric fields default to zero and all flags to `false`; a spec in
/// that state is the identity transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationSpec {
    /// Base column name. Checked against the dataset only when applied.
    pub variable: String,

    #[serde(default)]
    pub pre_transform: Option<PreTransform>,

    /// Periods to shift backward in time.
    #[serde(default)]
    pub lag: u32,

    /// Periods to shift forward in time. Ignored when `lag` is non-zero.
    #[serde(default)]
    pub lead: u32,

    /// Geometric decay rate; `0` disables adstock.
    #[serde(default)]
    pub adstock: f64,

    /// Saturation slope; `0` disables diminishing returns.
    #[serde(default)]
    pub dimret: f64,

    /// Apply `adstock` and `dimret` as one fused step.
    #[serde(default)]
    pub dimret_adstock: bool,

    /// Scale adstock output by `1 - adstock` (`n_adstock`).
    #[serde(default)]
    pub normalized_adstock: bool,

    /// Rescale saturated output to the input's sum (`n_dimret`).
    #[serde(default)]
    pub normalized_dimret: bool,
}

impl TransformationSpec {
    /// The identity spec for `variable`.
    pub fn identity(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            pre_transform: None,
            lag: 0,
            lead: 0,
            adstock: 0.0,
            dimret: 0.0,
            dimret_adstock: false,
            normalized_adstock: false,
            normalized_dimret: false,
        }
    }

    pub fn with_pre_transform(mut self, pre: PreTransform) -> Self {
        self.pre_transform = Some(pre);
        self
    }

    pub fn with_lag(mut self, periods: u32) -> Self {
        self.lag = periods;
        self
    }

    pub fn with_lead(mut self, periods: u32) -> Self {
        self.lead = periods;
        self
    }

    pub fn with_adstock(mut self, rate: f64) -> Self {
        self.adstock = rate;
        self
    }

    pub fn with_dimret(mut self, slope: f64) -> Self {
        self.dimret = slope;
        self
    }

    /// Fused decay+saturation with both parameters.
    pub fn with_dimret_adstock(mut self, rate: f64, slope: f64) -> Self {
        self.adstock = rate;
        self.dimret = slope;
        self.dimret_adstock = true;
        self
    }

    /// Signed shift in engine convention: positive lag, negative lead.
    pub fn shift(&self) -> i64 {
        if self.lag > 0 {
            i64::from(self.lag)
        } else {
            -i64::from(self.lead)
        }
    }

    /// Returns true when applying this spec leaves a series unchanged.
    pub fn is_identity(&self) -> bool {
        self.pre_transform.is_none()
            && self.lag == 0
            && self.lead == 0
            && self.adstock == 0.0
            && self.dimret == 0.0
    }
}

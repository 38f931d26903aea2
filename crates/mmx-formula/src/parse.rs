//! Lenient formula parsing into a [`TransformationSpec`].

use mmx_model::{MmxError, Result, TransformationSpec};
use tracing::trace;

use crate::function::{Function, Stage};
use crate::parser::{Call, MAX_NESTING, parse_syntax};

/// Parse a transformation formula.
///
/// Fails only when the formula names no base variable. Everything else is
/// recovered from: missing `)` are implied, unknown functions are transparent,
/// wrappers with unusable arguments are ignored, a repeated stage keeps its
/// innermost occurrence, and a pre-transform counts only as the outermost
/// wrapper. Use [`crate::validate`] to reject such formulas instead.
///
/// Nesting is capped at [`MAX_NESTING`] calls; a deeper formula fails with
/// [`MmxError::NestingTooDeep`] rather than recursing without bound.
///
/// # Examples
/// ```
/// use mmx_formula::parse;
///
/// let spec = parse("log(adstock(tv_spend, 0.5))").unwrap();
/// assert_eq!(spec.variable, "tv_spend");
/// assert_eq!(spec.adstock, 0.5);
/// assert!(spec.pre_transform.is_some());
/// ```
pub fn parse(formula: &str) -> Result<TransformationSpec> {
    let trimmed = formula.trim();
    if trimmed.is_empty() {
        return Err(MmxError::EmptyFormula);
    }

    let syntax = parse_syntax(trimmed);
    if syntax.too_deep {
        return Err(MmxError::NestingTooDeep { limit: MAX_NESTING });
    }
    let Some(variable) = syntax.variable else {
        return Err(MmxError::EmptyFormula);
    };

    let spec = fold_calls(variable, &syntax.calls);
    trace!(
        formula = trimmed,
        variable = %spec.variable,
        wrappers = syntax.calls.len(),
        skipped = syntax.diagnostics.len(),
        "parsed formula"
    );
    Ok(spec)
}

/// Fold the wrapper chain (innermost first) into spec fields.
fn fold_calls(variable: String, calls: &[Call]) -> TransformationSpec {
    let mut spec = TransformationSpec::identity(variable);
    let mut lag_seen = false;
    let mut lead_seen = false;
    let mut adstock_seen = false;
    let mut dimret_seen = false;
    let mut fused_seen = false;

    for (index, call) in calls.iter().enumerate() {
        let Some(function) = call.function else {
            continue;
        };
        if !call.has_expected_arity() {
            continue;
        }

        match function {
            Function::Lag if !lag_seen => {
                if let Some(periods) = call.args[0].periods() {
                    spec.lag = periods;
                    lag_seen = true;
                }
            }
            Function::Lead if !lead_seen => {
                if let Some(periods) = call.args[0].periods() {
                    spec.lead = periods;
                    lead_seen = true;
                }
            }
            Function::Adstock | Function::NAdstock if !adstock_seen && !fused_seen => {
                if let Some(rate) = call.args[0].value() {
                    spec.adstock = rate;
                    spec.normalized_adstock = function.is_normalized();
                    adstock_seen = true;
                }
            }
            Function::Dimret | Function::NDimret if !dimret_seen && !fused_seen => {
                if let Some(slope) = call.args[0].value() {
                    spec.dimret = slope;
                    spec.normalized_dimret = function.is_normalized();
                    dimret_seen = true;
                }
            }
            Function::DimretAdstock | Function::NDimretAdstock if !fused_seen => {
                if let (Some(rate), Some(slope)) = (call.args[0].value(), call.args[1].value()) {
                    spec = spec.with_dimret_adstock(rate, slope);
                    spec.normalized_adstock = function.is_normalized();
                    spec.normalized_dimret = function.is_normalized();
                    fused_seen = true;
                }
            }
            _ if function.stages().0 == Stage::PreTransform && index + 1 == calls.len() => {
                spec.pre_transform = function.pre_transform();
            }
            _ => {}
        }
    }

    spec
}

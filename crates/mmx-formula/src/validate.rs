//! Strict pre-flight check for formulas.
//!
//! Unlike [`crate::parse`], validation rejects anything the lenient parser
//! would silently recover from, and additionally requires the wrappers to be
//! nested in execution order (innermost first): `lag`/`lead`, `adstock`,
//! `dimret`, then `log`/`sqrt`/`exp`. A formula such as `adstock(log(x), 0.5)`
//! is rejected because its text suggests the log runs first while the
//! engine always applies it last.
//!
//! Parameter ranges are not checked; `adstock(x, 1.5)` is valid.

use mmx_model::{MmxError, Result};
use serde::{Deserialize, Serialize};

use crate::function::Function;
use crate::lexer::{TokenKind, tokenize};
use crate::parser::{Arg, Call, parse_syntax};

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FormulaValidation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
        }
    }

    /// Convert into a `Result` for callers that propagate with `?`.
    pub fn into_result(self, formula: &str) -> Result<()> {
        if self.valid {
            return Ok(());
        }
        Err(MmxError::InvalidFormula {
            formula: formula.to_string(),
            reason: self.error.unwrap_or_default(),
        })
    }
}

/// Check a formula against the grammar, the function vocabulary, the
/// dataset's variables and the canonical nesting order.
///
/// Never panics and never returns an error; the first problem found is
/// reported in [`FormulaValidation::error`].
pub fn validate<S: AsRef<str>>(formula: &str, known_variables: &[S]) -> FormulaValidation {
    match check(formula, known_variables) {
        Ok(()) => FormulaValidation::ok(),
        Err(message) => FormulaValidation::invalid(message),
    }
}

fn check<S: AsRef<str>>(formula: &str, known_variables: &[S]) -> std::result::Result<(), String> {
    let formula = formula.trim();
    if formula.is_empty() {
        return Err("Formula cannot be empty".to_string());
    }

    check_balanced(formula)?;
    check_function_names(formula)?;

    let syntax = parse_syntax(formula);
    let Some(variable) = syntax.variable.as_deref() else {
        return Err("No variable found in formula".to_string());
    };
    if let Some(diagnostic) = syntax.diagnostics.first() {
        return Err(diagnostic.message.clone());
    }

    for call in &syntax.calls {
        check_arguments(call)?;
    }

    if !known_variables.iter().any(|v| v.as_ref() == variable) {
        return Err(format!("Variable '{variable}' not found in dataset"));
    }

    check_nesting_order(&syntax.calls)
}

fn check_balanced(formula: &str) -> std::result::Result<(), String> {
    let mut depth = 0i64;
    for c in formula.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return Err("Unbalanced parentheses".to_string());
        }
    }
    if depth != 0 {
        return Err("Unbalanced parentheses".to_string());
    }
    Ok(())
}

fn check_function_names(formula: &str) -> std::result::Result<(), String> {
    let tokens = tokenize(formula);
    for pair in tokens.windows(2) {
        if let (TokenKind::Ident(name), TokenKind::LParen) = (&pair[0].kind, &pair[1].kind)
            && name.parse::<Function>().is_err()
        {
            return Err(format!("Unknown function '{}'", name.to_ascii_lowercase()));
        }
    }
    Ok(())
}

fn check_arguments(call: &Call) -> std::result::Result<(), String> {
    let Some(function) = call.function else {
        return Err(format!("Unknown function '{}'", call.name.to_ascii_lowercase()));
    };

    let expected = function.param_count();
    if call.args.len() != expected {
        return Err(format!(
            "Function '{function}' expects {expected} numeric argument{}, got {}",
            if expected == 1 { "" } else { "s" },
            call.args.len()
        ));
    }

    for arg in &call.args {
        if let Arg::Invalid { raw } = arg {
            return Err(format!("Invalid numeric argument '{raw}' for '{function}'"));
        }
        if function.takes_periods() && arg.periods().is_none() {
            return Err(format!(
                "Function '{function}' expects a non-negative integer period, got '{}'",
                arg.raw()
            ));
        }
    }
    Ok(())
}

/// Wrappers, read innermost first, must occupy strictly increasing stages.
fn check_nesting_order(calls: &[Call]) -> std::result::Result<(), String> {
    let mut used = [false; 4];
    let mut next_free = 0usize;

    for call in calls {
        let Some(function) = call.function else {
            continue;
        };
        let slots = function.slots();
        if slots.clone().any(|slot| used[slot]) {
            let (stage, _) = function.stages();
            return Err(format!(
                "Function '{function}' repeats the {} stage",
                stage.as_str()
            ));
        }
        if *slots.start() < next_free {
            return Err(format!(
                "Function '{function}' is nested out of canonical order \
                 (expected lag/lead, then adstock, then dimret, then log/sqrt/exp, innermost first)"
            ));
        }
        for slot in slots.clone() {
            used[slot] = true;
        }
        next_free = slots.end() + 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 3] = ["sales", "tv_spend", "radio"];

    fn error(formula: &str) -> String {
        validate(formula, &VARS).error.unwrap_or_default()
    }

    #[test]
    fn accepts_canonical_formulas() {
        for formula in [
            "sales",
            "log(sales)",
            "adstock(tv_spend, 0.5)",
            "lag(radio, 1)",
            "dimret(tv_spend, 0.3)",
            "dimret_adstock(tv_spend, 0.4, 0.2)",
            "log(adstock(sales, 0.6))",
            "sqrt(dimret(radio, 0.25))",
            "exp(n_dimret(n_adstock(lead(sales, 2), 0.5), 0.1))",
            "adstock(tv_spend, 1.5)",
        ] {
            assert_eq!(validate(formula, &VARS), FormulaValidation::ok(), "{formula}");
        }
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(error("  "), "Formula cannot be empty");
    }

    #[test]
    fn rejects_unbalanced() {
        assert_eq!(error("log(adstock(sales, 0.5)"), "Unbalanced parentheses");
        assert_eq!(error("sales)("), "Unbalanced parentheses");
    }

    #[test]
    fn rejects_unknown_function() {
        assert_eq!(error("ln(sales)"), "Unknown function 'ln'");
    }

    #[test]
    fn rejects_unknown_variable() {
        assert_eq!(error("log(tv)"), "Variable 'tv' not found in dataset");
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!(
            error("adstock(sales)"),
            "Function 'adstock' expects 1 numeric argument, got 0"
        );
        assert_eq!(
            error("dimret_adstock(sales, 0.5)"),
            "Function 'dimret_adstock' expects 2 numeric arguments, got 1"
        );
        assert_eq!(
            error("adstock(sales, abc)"),
            "Invalid numeric argument 'abc' for 'adstock'"
        );
        assert_eq!(
            error("lag(sales, 1.5)"),
            "Function 'lag' expects a non-negative integer period, got '1.5'"
        );
    }

    #[test]
    fn rejects_out_of_order_nesting() {
        assert!(error("adstock(log(sales), 0.5)").contains("out of canonical order"));
        assert!(error("adstock(dimret(sales, 0.2), 0.5)").contains("out of canonical order"));
        assert!(error("lag(adstock(sales, 0.5), 1)").contains("out of canonical order"));
    }

    #[test]
    fn rejects_repeated_stage() {
        assert_eq!(
            error("adstock(adstock(sales, 0.3), 0.5)"),
            "Function 'adstock' repeats the adstock stage"
        );
        assert_eq!(
            error("lead(lag(sales, 1), 2)"),
            "Function 'lead' repeats the lag/lead stage"
        );
        assert!(error("dimret_adstock(adstock(sales, 0.3), 0.5, 0.2)").contains("repeats"));
    }

    #[test]
    fn into_result_carries_reason() {
        let err = validate("ln(sales)", &VARS)
            .into_result("ln(sales)")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid formula 'ln(sales)': Unknown function 'ln'"
        );
        assert!(validate("sales", &VARS).into_result("sales").is_ok());
    }
}

//! Canonical formula rendering.

use mmx_model::TransformationSpec;

/// Render a spec as a formula in canonical nesting order.
///
/// Temporal shift innermost, then decay/saturation, then the pre-transform
/// as the outermost wrap. Parsing the result yields the same spec for any
/// spec produced by [`crate::parse`].
///
/// # Examples
/// ```
/// use mmx_formula::{format_formula, parse};
///
/// let spec = parse("log(adstock(lag(tv, 1), 0.5))").unwrap();
/// assert_eq!(format_formula(&spec), "log(adstock(lag(tv, 1), 0.5))");
/// ```
pub fn format_formula(spec: &TransformationSpec) -> String {
    let mut formula = spec.variable.clone();

    if spec.lag > 0 {
        formula = format!("lag({formula}, {})", spec.lag);
    }
    if spec.lead > 0 {
        formula = format!("lead({formula}, {})", spec.lead);
    }

    if spec.dimret_adstock {
        let name = if spec.normalized_adstock && spec.normalized_dimret {
            "n_dimret_adstock"
        } else {
            "dimret_adstock"
        };
        formula = format!(
            "{name}({formula}, {}, {})",
            number(spec.adstock),
            number(spec.dimret)
        );
    } else {
        if spec.adstock != 0.0 || spec.normalized_adstock {
            let name = if spec.normalized_adstock {
                "n_adstock"
            } else {
                "adstock"
            };
            formula = format!("{name}({formula}, {})", number(spec.adstock));
        }
        if spec.dimret != 0.0 || spec.normalized_dimret {
            let name = if spec.normalized_dimret {
                "n_dimret"
            } else {
                "dimret"
            };
            formula = format!("{name}({formula}, {})", number(spec.dimret));
        }
    }

    if let Some(pre) = spec.pre_transform {
        formula = format!("{pre}({formula})");
    }

    formula
}

/// Shortest decimal that parses back to the same value; never exponent form.
fn number(value: f64) -> String {
    format!("{value}")
}

/// Example formulas covering each function family.
pub fn formula_examples() -> &'static [&'static str] {
    &[
        "sales",
        "log(sales)",
        "adstock(tv_spend, 0.5)",
        "lag(temperature, 1)",
        "dimret(marketing, 0.3)",
        "dimret_adstock(tv_spend, 0.4, 0.2)",
        "log(adstock(sales, 0.6))",
        "sqrt(dimret(impressions, 0.25))",
    ]
}

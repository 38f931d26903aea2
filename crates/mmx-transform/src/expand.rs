//! Expansion of a [`TransformationSpec`] into engine steps.

use mmx_model::{PreTransform, TransformationSpec, TransformationStep};
use serde::{Deserialize, Serialize};

/// Knobs for [`expand`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionOptions {
    /// Offset added before taking the logarithm: `ln(x + log_offset)`.
    ///
    /// Zero keeps `log(0) = -inf`; a tiny positive value such as `1e-10`
    /// keeps zero-spend periods finite.
    #[serde(default)]
    pub log_offset: f64,
}

impl ExpansionOptions {
    pub fn with_log_offset(mut self, offset: f64) -> Self {
        self.log_offset = offset;
        self
    }
}

/// Ordered steps for `spec`.
///
/// The order is fixed regardless of how the formula was nested:
/// temporal shift, then decay/saturation, then the pre-transform.
/// Zero-valued parameters emit nothing, so the identity spec expands to an
/// empty list.
pub fn expand(spec: &TransformationSpec, options: &ExpansionOptions) -> Vec<TransformationStep> {
    let mut steps = Vec::with_capacity(4);

    let shift = spec.shift();
    if shift != 0 {
        steps.push(TransformationStep::LagLead {
            amount: shift as f64,
        });
    }

    if spec.dimret_adstock {
        if spec.adstock != 0.0 || spec.dimret != 0.0 {
            steps.push(TransformationStep::DimretAdstock {
                decay: spec.adstock,
                slope: spec.dimret,
                normalized: spec.normalized_adstock && spec.normalized_dimret,
            });
        }
    } else {
        if spec.adstock != 0.0 {
            steps.push(if spec.normalized_adstock {
                TransformationStep::NormalizedAdstock {
                    amount: spec.adstock,
                }
            } else {
                TransformationStep::Adstock {
                    amount: spec.adstock,
                }
            });
        }
        if spec.dimret != 0.0 {
            steps.push(if spec.normalized_dimret {
                TransformationStep::NormalizedDiminishingReturns { amount: spec.dimret }
            } else {
                TransformationStep::DiminishingReturnsExponential { amount: spec.dimret }
            });
        }
    }

    match spec.pre_transform {
        Some(PreTransform::Log) => steps.push(TransformationStep::Log {
            amount: options.log_offset,
        }),
        Some(PreTransform::Sqrt) => steps.push(TransformationStep::Sqrt),
        Some(PreTransform::Exp) => steps.push(TransformationStep::Exp),
        None => {}
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_expands_to_nothing() {
        let spec = TransformationSpec::identity("sales");
        assert!(expand(&spec, &ExpansionOptions::default()).is_empty());
    }

    #[test]
    fn fixed_order() {
        let spec = TransformationSpec::identity("tv")
            .with_pre_transform(PreTransform::Log)
            .with_dimret(0.2)
            .with_adstock(0.5)
            .with_lead(2);
        let steps = expand(&spec, &ExpansionOptions::default().with_log_offset(1e-10));
        assert_eq!(
            steps,
            vec![
                TransformationStep::LagLead { amount: -2.0 },
                TransformationStep::Adstock { amount: 0.5 },
                TransformationStep::DiminishingReturnsExponential { amount: 0.2 },
                TransformationStep::Log { amount: 1e-10 },
            ]
        );
    }

    #[test]
    fn lag_wins_over_lead() {
        let spec = TransformationSpec::identity("x").with_lag(1).with_lead(4);
        assert_eq!(
            expand(&spec, &ExpansionOptions::default()),
            vec![TransformationStep::LagLead { amount: 1.0 }]
        );
    }

    #[test]
    fn fused_replaces_independent_steps() {
        let mut spec = TransformationSpec::identity("x").with_dimret_adstock(0.4, 0.2);
        assert_eq!(
            expand(&spec, &ExpansionOptions::default()),
            vec![TransformationStep::DimretAdstock {
                decay: 0.4,
                slope: 0.2,
                normalized: false
            }]
        );
        spec.normalized_adstock = true;
        spec.normalized_dimret = true;
        assert!(matches!(
            expand(&spec, &ExpansionOptions::default())[0],
            TransformationStep::DimretAdstock { normalized: true, .. }
        ));
    }

    #[test]
    fn normalized_variants() {
        let mut spec = TransformationSpec::identity("x").with_adstock(0.5).with_dimret(0.3);
        spec.normalized_adstock = true;
        spec.normalized_dimret = true;
        assert_eq!(
            expand(&spec, &ExpansionOptions::default()),
            vec![
                TransformationStep::NormalizedAdstock { amount: 0.5 },
                TransformationStep::NormalizedDiminishingReturns { amount: 0.3 },
            ]
        );
    }
}

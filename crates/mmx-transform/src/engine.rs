//! Left-to-right application of transformation steps.

use mmx_model::TransformationStep;
use tracing::trace;

use crate::ops;

/// Apply a single step to a series.
pub fn apply_step(series: &[f64], step: &TransformationStep) -> Vec<f64> {
    match *step {
        TransformationStep::Log { amount } => ops::apply_log(series, amount),
        TransformationStep::Sqrt => ops::apply_sqrt(series),
        TransformationStep::Exp => ops::apply_exp(series),
        TransformationStep::LagLead { amount } => ops::apply_lag_lead(series, amount),
        TransformationStep::Adstock { amount } => ops::apply_adstock(series, amount),
        TransformationStep::NormalizedAdstock { amount } => {
            ops::apply_normalized_adstock(series, amount)
        }
        TransformationStep::DiminishingReturnsAbsolute { amount } => {
            ops::apply_diminishing_returns_absolute(series, amount)
        }
        TransformationStep::DiminishingReturnsExponential { amount } => {
            ops::apply_diminishing_returns_exponential(series, amount)
        }
        TransformationStep::NormalizedDiminishingReturns { amount } => {
            ops::apply_normalized_diminishing_returns(series, amount)
        }
        TransformationStep::DimretAdstock {
            decay,
            slope,
            normalized,
        } => ops::apply_dimret_adstock(series, decay, slope, normalized),
        TransformationStep::MovingAverage { amount } => ops::apply_moving_average(series, amount),
    }
}

/// Fold `steps` over `series` in the order given.
///
/// Each step consumes the previous step's output. With no steps the result
/// is a copy of the input.
///
/// # Examples
/// ```
/// use mmx_model::TransformationStep;
/// use mmx_transform::apply_all;
///
/// let steps = [
///     TransformationStep::LagLead { amount: -1.0 },
///     TransformationStep::Adstock { amount: 0.5 },
/// ];
/// let out = apply_all(&[0.0, 2.0, 0.0], &steps);
/// assert_eq!(&out[..2], &[2.0, 1.0]);
/// assert!(out[2].is_nan());
/// ```
pub fn apply_all(series: &[f64], steps: &[TransformationStep]) -> Vec<f64> {
    steps.iter().enumerate().fold(series.to_vec(), |current, (index, step)| {
        let next = apply_step(&current, step);
        trace!(
            index,
            step = %step.kind(),
            amount = ?step.amount(),
            len = next.len(),
            "applied transformation step"
        );
        next
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_steps_copy_input() {
        let x = [1.0, f64::NAN, 3.0];
        let out = apply_all(&x, &[]);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], 1.0);
        assert!(out[1].is_nan());
    }

    #[test]
    fn order_is_respected() {
        let x = [1.0, 2.0, 3.0];
        let shift_then_log = apply_all(
            &x,
            &[
                TransformationStep::LagLead { amount: 1.0 },
                TransformationStep::Log { amount: 0.0 },
            ],
        );
        let log_then_shift = apply_all(
            &x,
            &[
                TransformationStep::Log { amount: 0.0 },
                TransformationStep::LagLead { amount: 1.0 },
            ],
        );
        assert!(shift_then_log[0].is_nan());
        assert_eq!(shift_then_log[1], 0.0);
        assert_eq!(shift_then_log[1..], log_then_shift[1..]);

        let ma_then_exp = apply_all(
            &x,
            &[
                TransformationStep::MovingAverage { amount: 2.0 },
                TransformationStep::Exp,
            ],
        );
        assert!((ma_then_exp[1] - 1.5f64.exp()).abs() < 1e-12);
    }

    #[test]
    fn dispatch_matches_ops() {
        let x = [0.5, 1.0, 2.0];
        let step = TransformationStep::DimretAdstock {
            decay: 0.3,
            slope: 0.7,
            normalized: true,
        };
        assert_eq!(apply_step(&x, &step), ops::apply_dimret_adstock(&x, 0.3, 0.7, true));
        assert_eq!(
            apply_step(&x, &TransformationStep::DiminishingReturnsAbsolute { amount: 2.0 }),
            ops::apply_diminishing_returns_absolute(&x, 2.0)
        );
    }
}

//! Elementary series operations.
//!
//! Every function returns a freshly allocated series of the input's length.
//! None of them fail: invalid numeric inputs produce `NaN` or infinities
//! (`ln` of a non-positive value, for instance) rather than errors, and
//! parameters are used exactly as given, even outside their usual range.
//!
//! `NaN` inputs stay `NaN` in the output. Because [`apply_adstock`] is
//! recursive on its own output, a `NaN` input also poisons every later value.

/// `ln(x + amount)`.
pub fn apply_log(series: &[f64], amount: f64) -> Vec<f64> {
    series.iter().map(|x| (x + amount).ln()).collect()
}

/// `sqrt(max(x, 0))`.
pub fn apply_sqrt(series: &[f64]) -> Vec<f64> {
    series
        .iter()
        .map(|&x| if x.is_nan() { x } else { x.max(0.0).sqrt() })
        .collect()
}

/// `e^x`.
pub fn apply_exp(series: &[f64]) -> Vec<f64> {
    series.iter().map(|x| x.exp()).collect()
}

/// Shift by `periods`: positive lags (values move later), negative leads.
///
/// Fractional periods truncate toward zero. Positions with no source value
/// become `NaN`.
///
/// # Examples
/// ```
/// use mmx_transform::ops::apply_lag_lead;
///
/// let lagged = apply_lag_lead(&[1.0, 2.0, 3.0], 1.0);
/// assert!(lagged[0].is_nan());
/// assert_eq!(&lagged[1..], &[1.0, 2.0]);
/// ```
pub fn apply_lag_lead(series: &[f64], periods: f64) -> Vec<f64> {
    let shift = periods.trunc() as i64;
    if shift == 0 {
        return series.to_vec();
    }

    let n = series.len();
    let k = usize::try_from(shift.unsigned_abs()).unwrap_or(usize::MAX);
    let mut result = vec![f64::NAN; n];
    if k >= n {
        return result;
    }

    if shift > 0 {
        result[k..].copy_from_slice(&series[..n - k]);
    } else {
        result[..n - k].copy_from_slice(&series[k..]);
    }
    result
}

/// Geometric carryover: `y[0] = x[0]`, `y[i] = x[i] + decay * y[i-1]`.
///
/// The recurrence runs on the output, so every earlier input keeps
/// contributing with weight `decay^age`, and a `NaN` at any index carries
/// into every output after it.
pub fn apply_adstock(series: &[f64], decay: f64) -> Vec<f64> {
    let mut result = Vec::with_capacity(series.len());
    for (i, &x) in series.iter().enumerate() {
        let y = if i == 0 { x } else { x + decay * result[i - 1] };
        result.push(y);
    }
    result
}

/// Adstock scaled by `1 - decay`, so a unit impulse keeps unit total weight.
pub fn apply_normalized_adstock(series: &[f64], decay: f64) -> Vec<f64> {
    apply_adstock(series, decay)
        .into_iter()
        .map(|y| y * (1.0 - decay))
        .collect()
}

/// `x / (x + |saturation_point|)`.
pub fn apply_diminishing_returns_absolute(series: &[f64], saturation_point: f64) -> Vec<f64> {
    let half = saturation_point.abs();
    series.iter().map(|x| x / (x + half)).collect()
}

/// `1 - exp(-slope * x)`.
pub fn apply_diminishing_returns_exponential(series: &[f64], slope: f64) -> Vec<f64> {
    series.iter().map(|x| 1.0 - (-slope * x).exp()).collect()
}

/// Exponential saturation rescaled so the output sums to the input's sum.
pub fn apply_normalized_diminishing_returns(series: &[f64], slope: f64) -> Vec<f64> {
    let saturated = apply_diminishing_returns_exponential(series, slope);
    rescale_to_sum(saturated, finite_sum(series))
}

/// Adstock followed by exponential saturation of the adstocked values.
///
/// With `normalized`, the result is rescaled to the input's sum.
pub fn apply_dimret_adstock(series: &[f64], decay: f64, slope: f64, normalized: bool) -> Vec<f64> {
    let adstocked = apply_adstock(series, decay);
    let saturated = if slope == 0.0 {
        adstocked
    } else {
        apply_diminishing_returns_exponential(&adstocked, slope)
    };
    if normalized {
        rescale_to_sum(saturated, finite_sum(series))
    } else {
        saturated
    }
}

/// Trailing mean over `window` periods; the first `window - 1` values are `NaN`.
///
/// The window truncates to an integer; a window below one yields all `NaN`.
pub fn apply_moving_average(series: &[f64], window: f64) -> Vec<f64> {
    let n = series.len();
    let mut result = vec![f64::NAN; n];
    let window = window.trunc();
    if window.is_nan() || window < 1.0 {
        return result;
    }
    let w = window as usize;
    if w > n {
        return result;
    }

    for (offset, values) in series.windows(w).enumerate() {
        result[offset + w - 1] = values.iter().sum::<f64>() / window;
    }
    result
}

/// Sum of the finite values.
fn finite_sum(series: &[f64]) -> f64 {
    series.iter().filter(|v| v.is_finite()).sum()
}

fn rescale_to_sum(series: Vec<f64>, target: f64) -> Vec<f64> {
    let current = finite_sum(&series);
    if current > 0.0 {
        let factor = target / current;
        series.into_iter().map(|v| v * factor).collect()
    } else {
        series
    }
}

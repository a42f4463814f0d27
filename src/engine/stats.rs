//! Numeric reductions over `f64` series shared by the engine components.

/// Arithmetic mean; `None` for an empty series.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`).
pub fn population_std(values: &[f64]) -> Option<f64> {
    // ---
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Median of an unsorted series; `None` when empty or non-finite values are present.
pub fn median(values: &[f64]) -> Option<f64> {
    // ---
    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Percentile `q` in `[0, 100]` with linear interpolation between closest ranks.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    // ---
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Ordinary least-squares line through `(x_mean, y_mean)` with `slope`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    x_mean: f64,
    y_mean: f64,
}

impl LinearFit {
    // ---
    /// Fit over paired points, centering on the means so epoch-scale `x`
    /// values do not lose precision.
    ///
    /// A constant `x` yields a flat line through the mean of `y`. Returns
    /// `None` for fewer than two points or non-finite coefficients.
    pub fn fit(x: &[f64], y: &[f64]) -> Option<Self> {
        // ---
        let n = x.len().min(y.len());
        if n < 2 {
            return None;
        }
        let (x, y) = (&x[..n], &y[..n]);
        let x_mean = mean(x)?;
        let y_mean = mean(y)?;

        let (sxx, sxy) = x
            .iter()
            .zip(y)
            .fold((0.0, 0.0), |(sxx, sxy), (xi, yi)| {
                let dx = xi - x_mean;
                (sxx + dx * dx, sxy + dx * (yi - y_mean))
            });

        let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
        if !(slope.is_finite() && x_mean.is_finite() && y_mean.is_finite()) {
            return None;
        }

        Some(LinearFit {
            slope,
            x_mean,
            y_mean,
        })
    }

    /// Evaluate the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.y_mean + self.slope * (x - self.x_mean)
    }
}

/// Pearson correlation coefficient; `None` for unequal lengths, fewer than
/// two points, or zero variance in either series.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    // ---
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let (dx, dy) = (xi - mx, yi - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    r.is_finite().then_some(r)
}

/// Round to a fixed number of decimal places.
///
/// Goes through the decimal formatter, which rounds the exact binary value
/// and sends exact halves to even (`3.125` -> `3.12`, `2.675` -> `2.67`).
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

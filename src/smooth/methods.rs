use nalgebra::{DMatrix, DVector};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A transform received parameters outside its declared domain.
///
/// The registry clamps slider input at the boundary, so in normal operation
/// these only fire for programmatic callers; the engine drops the offending
/// method's series and leaves the others untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidParameterError {
    #[error("{name} = {value} outside {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("window {0} must be odd")]
    EvenWindow(usize),
    #[error("polyorder {polyorder} must be less than window {window}")]
    PolyOrderTooHigh { polyorder: usize, window: usize },
    #[error("window {window} exceeds series length {len}")]
    WindowLongerThanSeries { window: usize, len: usize },
    #[error("least-squares solve failed: {0}")]
    Computation(String),
}

type Result<T> = std::result::Result<T, InvalidParameterError>;

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value < min || value > max || !value.is_finite() {
        return Err(InvalidParameterError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_window(name: &'static str, window: usize, min: usize, max: usize, len: usize) -> Result<()> {
    check_range(name, window as f64, min as f64, max as f64)?;
    if window % 2 == 0 {
        return Err(InvalidParameterError::EvenWindow(window));
    }
    if window > len {
        return Err(InvalidParameterError::WindowLongerThanSeries { window, len });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Moving average
// ---------------------------------------------------------------------------

/// Centered rolling mean over `window` points (odd, 3..=51).
///
/// Positions without a full window take the nearest valid centered mean:
/// leading edges are filled backward from the first valid center, trailing
/// edges forward from the last one.
pub fn moving_average(values: &[f64], window: usize) -> Result<Vec<f64>> {
    let n = values.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    check_window("window", window, 3, 51, n)?;

    let half = window / 2;
    let mut out = vec![0.0; n];

    // Sliding sum over valid centers: half..n-half.
    let mut sum: f64 = values[..window].iter().sum();
    out[half] = sum / window as f64;
    for i in half + 1..n - half {
        sum += values[i + half] - values[i - half - 1];
        out[i] = sum / window as f64;
    }

    // Backward fill to the start, then forward fill to the end.
    let first_valid = out[half];
    for v in out.iter_mut().take(half) {
        *v = first_valid;
    }
    let last_valid = out[n - 1 - half];
    for v in out.iter_mut().skip(n - half) {
        *v = last_valid;
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Exponential moving average
// ---------------------------------------------------------------------------

/// Recursive exponential smoothing: out[0] = in[0],
/// out[i] = alpha * in[i] + (1 - alpha) * out[i-1].
pub fn exponential_moving_average(values: &[f64], alpha: f64) -> Result<Vec<f64>> {
    check_range("alpha", alpha, 0.01, 1.0)?;

    let mut out = Vec::with_capacity(values.len());
    let mut prev = match values.first() {
        Some(&v) => v,
        None => return Ok(out),
    };
    out.push(prev);
    for &v in &values[1..] {
        prev = alpha * v + (1.0 - alpha) * prev;
        out.push(prev);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Savitzky-Golay
// ---------------------------------------------------------------------------

/// Savitzky-Golay smoothing: least-squares polynomial convolution in the
/// interior, and a polynomial fit over the first/last `window` values
/// evaluated at the edge indices (the `interp` boundary convention).
pub fn savitzky_golay(values: &[f64], window: usize, polyorder: usize) -> Result<Vec<f64>> {
    let n = values.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    check_range("polyorder", polyorder as f64, 1.0, 5.0)?;
    if polyorder >= window {
        return Err(InvalidParameterError::PolyOrderTooHigh { polyorder, window });
    }
    check_window("window", window, 5, 51, n)?;

    let half = window / 2;
    let coeffs = sg_coefficients(window, polyorder)?;

    let mut out = vec![0.0; n];
    for i in half..n - half {
        let mut acc = 0.0;
        for (k, &c) in coeffs.iter().enumerate() {
            acc += c * values[i - half + k];
        }
        out[i] = acc;
    }

    // Edge values come from a polynomial fitted to the terminal window.
    let head = polyfit(&values[..window], polyorder)?;
    for (i, v) in out.iter_mut().take(half).enumerate() {
        *v = poly_eval(&head, i as f64);
    }
    let tail = polyfit(&values[n - window..], polyorder)?;
    for i in n - half..n {
        out[i] = poly_eval(&tail, (i - (n - window)) as f64);
    }

    Ok(out)
}

/// Convolution coefficients for the centered smoothing case: solve the
/// normal equations (AᵀA)c = e₀ on a centered Vandermonde matrix and expand
/// back to per-position weights.
fn sg_coefficients(window: usize, polyorder: usize) -> Result<Vec<f64>> {
    let half = (window - 1) / 2;
    let mut vandermonde = DMatrix::<f64>::zeros(window, polyorder + 1);
    for i in 0..window {
        let x = i as f64 - half as f64;
        for j in 0..=polyorder {
            vandermonde[(i, j)] = x.powi(j as i32);
        }
    }

    let ata = vandermonde.transpose() * &vandermonde;
    let mut rhs = DVector::<f64>::zeros(polyorder + 1);
    rhs[0] = 1.0;
    let poly = ata
        .lu()
        .solve(&rhs)
        .ok_or_else(|| InvalidParameterError::Computation("singular SG system".into()))?;

    let mut weights = vec![0.0; window];
    for (i, w) in weights.iter_mut().enumerate() {
        let x = i as f64 - half as f64;
        for j in 0..=polyorder {
            *w += poly[j] * x.powi(j as i32);
        }
    }
    Ok(weights)
}

/// Least-squares polynomial fit of `ys` over x = 0..ys.len(), lowest power
/// first.
fn polyfit(ys: &[f64], polyorder: usize) -> Result<Vec<f64>> {
    let n = ys.len();
    let mut a = DMatrix::<f64>::zeros(n, polyorder + 1);
    for i in 0..n {
        for j in 0..=polyorder {
            a[(i, j)] = (i as f64).powi(j as i32);
        }
    }
    let ata = a.transpose() * &a;
    let aty = a.transpose() * DVector::from_column_slice(ys);
    let coeffs = ata
        .lu()
        .solve(&aty)
        .ok_or_else(|| InvalidParameterError::Computation("singular edge fit".into()))?;
    Ok(coeffs.iter().copied().collect())
}

fn poly_eval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

// ---------------------------------------------------------------------------
// LOESS
// ---------------------------------------------------------------------------

/// Locally weighted linear regression at x = sample index with tricube
/// weights. `frac` of the series forms each point's neighborhood.
pub fn loess(values: &[f64], frac: f64) -> Result<Vec<f64>> {
    check_range("frac", frac, 0.01, 0.5)?;

    let n = values.len();
    if n < 2 {
        return Ok(values.to_vec());
    }
    let k = ((frac * n as f64).ceil() as usize).clamp(2, n);

    let mut out = vec![0.0; n];
    for i in 0..n {
        // Nearest k samples form a contiguous window on a uniform index axis.
        let start = i.saturating_sub((k - 1) / 2).min(n - k);
        let end = start + k;
        let radius = (i - start).max(end - 1 - i) as f64;

        let (mut sw, mut swx, mut swy, mut swxx, mut swxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for j in start..end {
            let d = (j as f64 - i as f64).abs() / radius;
            let w = tricube(d);
            let dx = j as f64 - i as f64;
            sw += w;
            swx += w * dx;
            swy += w * values[j];
            swxx += w * dx * dx;
            swxy += w * dx * values[j];
        }

        let denom = sw * swxx - swx * swx;
        out[i] = if denom.abs() > 1e-12 * sw.max(1.0) {
            // Intercept of the weighted linear fit, i.e. the fit at dx = 0.
            (swxx * swy - swx * swxy) / denom
        } else {
            swy / sw
        };
    }
    Ok(out)
}

/// Tricube kernel: (1 - |d|³)³ inside the unit interval, zero outside.
fn tricube(d: f64) -> f64 {
    if d >= 1.0 {
        0.0
    } else {
        let t = 1.0 - d * d * d;
        t * t * t
    }
}

// ---------------------------------------------------------------------------
// Gaussian kernel smoothing
// ---------------------------------------------------------------------------

/// Convolution with a discrete Gaussian (std dev `sigma`, extent 4 sigma),
/// reflecting the signal across each edge.
pub fn gaussian(values: &[f64], sigma: f64) -> Result<Vec<f64>> {
    check_range("sigma", sigma, 0.1, 10.0)?;

    let n = values.len() as i64;
    if n == 0 {
        return Ok(Vec::new());
    }

    let radius = (4.0 * sigma + 0.5) as i64;
    let mut kernel = Vec::with_capacity((2 * radius + 1) as usize);
    for t in -radius..=radius {
        let t = t as f64;
        kernel.push((-t * t / (2.0 * sigma * sigma)).exp());
    }
    let norm: f64 = kernel.iter().sum();

    let mut out = Vec::with_capacity(values.len());
    for i in 0..n {
        let mut acc = 0.0;
        for (k, &w) in kernel.iter().enumerate() {
            let j = i + k as i64 - radius;
            acc += w * values[reflect_index(j, n)];
        }
        out.push(acc / norm);
    }
    Ok(out)
}

/// Reflect an out-of-bounds index across the array edges:
/// `a b c d -> d c b a | a b c d | d c b a`.
fn reflect_index(mut i: i64, n: i64) -> usize {
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - 1 - i;
        } else {
            return i as usize;
        }
    }
}

// ---------------------------------------------------------------------------
// Kalman filter
// ---------------------------------------------------------------------------

/// Scalar random-walk Kalman filter, forward pass only.
///
/// Prior mean is the first observation with unit variance; every index
/// (including 0) runs a predict/update cycle, so out[0] == in[0].
pub fn kalman(values: &[f64], transition_std: f64, observation_std: f64) -> Result<Vec<f64>> {
    check_range("transition_std", transition_std, 0.001, 1.0)?;
    check_range("observation_std", observation_std, 0.001, 1.0)?;

    let q = transition_std * transition_std;
    let r = observation_std * observation_std;

    let mut out = Vec::with_capacity(values.len());
    let mut mean = match values.first() {
        Some(&v) => v,
        None => return Ok(out),
    };
    let mut var = 1.0;

    for (i, &y) in values.iter().enumerate() {
        // Predict: identity transition, process noise accumulates.
        if i > 0 {
            var += q;
        }
        // Update: Bayesian correction weighted by the Kalman gain.
        let gain = var / (var + r);
        mean += gain * (y - mean);
        var *= 1.0 - gain;
        out.push(mean);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLIER: [f64; 10] = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0, 7.0, 8.0, 9.0, 10.0];

    fn noisy_ramp(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| i as f64 * 0.1 + if i % 3 == 0 { 0.4 } else { -0.2 })
            .collect()
    }

    #[test]
    fn moving_average_centers_on_the_outlier() {
        let out = moving_average(&OUTLIER, 3).unwrap();
        assert_eq!(out.len(), OUTLIER.len());
        // mean(4, 100, 7)
        assert!((out[5] - 37.0).abs() < 1e-12);
    }

    #[test]
    fn moving_average_fills_edges_from_nearest_valid_center() {
        let out = moving_average(&OUTLIER, 5).unwrap();
        // First valid center is index 2: mean(1..=5) = 3.
        assert_eq!(out[0], 3.0);
        assert_eq!(out[1], 3.0);
        // Last valid center is index 7: mean(100,7,8,9,10) = 26.8.
        assert!((out[8] - 26.8).abs() < 1e-12);
        assert!((out[9] - 26.8).abs() < 1e-12);
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn moving_average_rejects_bad_windows() {
        assert!(matches!(
            moving_average(&OUTLIER, 4),
            Err(InvalidParameterError::EvenWindow(4))
        ));
        assert!(matches!(
            moving_average(&OUTLIER, 53),
            Err(InvalidParameterError::OutOfRange { .. })
        ));
        assert!(matches!(
            moving_average(&OUTLIER, 11),
            Err(InvalidParameterError::WindowLongerThanSeries { window: 11, len: 10 })
        ));
    }

    #[test]
    fn ema_with_alpha_one_is_identity() {
        let data = noisy_ramp(80);
        let out = exponential_moving_average(&data, 1.0).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn ema_follows_the_recursion() {
        let out = exponential_moving_average(&[10.0, 20.0, 30.0], 0.5).unwrap();
        assert_eq!(out, vec![10.0, 15.0, 22.5]);
    }

    #[test]
    fn ema_rejects_out_of_range_alpha() {
        assert!(exponential_moving_average(&OUTLIER, 0.0).is_err());
        assert!(exponential_moving_average(&OUTLIER, 1.5).is_err());
    }

    #[test]
    fn savgol_preserves_linear_signals_exactly() {
        let line: Vec<f64> = (0..60).map(|i| 3.0 + 0.5 * i as f64).collect();
        let out = savitzky_golay(&line, 11, 2).unwrap();
        assert_eq!(out.len(), line.len());
        for (a, b) in out.iter().zip(&line) {
            assert!((a - b).abs() < 1e-8, "{a} vs {b}");
        }
    }

    #[test]
    fn savgol_rejects_polyorder_not_below_window() {
        let data = noisy_ramp(60);
        assert!(matches!(
            savitzky_golay(&data, 5, 5),
            Err(InvalidParameterError::PolyOrderTooHigh { polyorder: 5, window: 5 })
        ));
    }

    #[test]
    fn savgol_window_5_poly_2_matches_known_coefficients() {
        // Classic (-3, 12, 17, 12, -3) / 35 stencil.
        let coeffs = sg_coefficients(5, 2).unwrap();
        let expected = [-3.0 / 35.0, 12.0 / 35.0, 17.0 / 35.0, 12.0 / 35.0, -3.0 / 35.0];
        for (c, e) in coeffs.iter().zip(expected) {
            assert!((c - e).abs() < 1e-10, "{c} vs {e}");
        }
    }

    #[test]
    fn loess_preserves_linear_signals() {
        let line: Vec<f64> = (0..100).map(|i| 1.0 + 2.0 * i as f64).collect();
        let out = loess(&line, 0.2).unwrap();
        assert_eq!(out.len(), line.len());
        for (a, b) in out.iter().zip(&line) {
            assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        }
    }

    #[test]
    fn loess_smooths_the_outlier() {
        let out = loess(&OUTLIER, 0.5).unwrap();
        assert_eq!(out.len(), OUTLIER.len());
        assert!(out[5] < 100.0);
    }

    #[test]
    fn gaussian_pulls_the_outlier_down() {
        let out = gaussian(&OUTLIER, 2.0).unwrap();
        assert_eq!(out.len(), OUTLIER.len());
        assert!(out[5] < 100.0);
        // Substantially below the spike, not marginally.
        assert!(out[5] < 60.0);
    }

    #[test]
    fn gaussian_keeps_constant_signals_constant() {
        // Kernel normalization + reflection: a constant stays constant.
        let data = vec![4.2; 64];
        let out = gaussian(&data, 3.0).unwrap();
        for v in out {
            assert!((v - 4.2).abs() < 1e-12);
        }
    }

    #[test]
    fn reflect_index_mirrors_both_edges() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(2, 4), 2);
    }

    #[test]
    fn kalman_starts_at_the_first_observation() {
        let data = noisy_ramp(50);
        let out = kalman(&data, 0.05, 0.2).unwrap();
        assert_eq!(out[0], data[0]);
        assert_eq!(out.len(), data.len());
    }

    #[test]
    fn kalman_tracks_a_constant_signal() {
        let data = vec![7.0; 40];
        let out = kalman(&data, 0.05, 0.2).unwrap();
        for v in out {
            assert!((v - 7.0).abs() < 1e-12);
        }
    }

    #[test]
    fn kalman_rejects_out_of_range_noise() {
        assert!(kalman(&OUTLIER, 0.0, 0.2).is_err());
        assert!(kalman(&OUTLIER, 0.05, 2.0).is_err());
    }

    #[test]
    fn prefix_length_changes_boundary_behavior_not_a_regression() {
        // Gaussian smoothing of the first 50 points depends on whether the
        // series continues past them: the longer prefix feeds real samples
        // into the window where the shorter one reflects. Values near the cut
        // are expected to differ.
        let data: Vec<f64> = (0..500)
            .map(|i| (i as f64 * 0.13).sin() + (i as f64 * 0.71).cos() * 0.3)
            .collect();
        let short = gaussian(&data[..50], 2.0).unwrap();
        let long = gaussian(&data, 2.0).unwrap();
        assert!(
            short
                .iter()
                .zip(&long[..50])
                .any(|(a, b)| (a - b).abs() > 1e-9),
            "expected boundary effects near the prefix cut"
        );
        // Away from the cut the two agree.
        assert!((short[10] - long[10]).abs() < 1e-9);
    }
}

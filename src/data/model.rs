use chrono::{DateTime, Utc};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Signal – the loaded time series
// ---------------------------------------------------------------------------

/// Smallest prefix the UI may select for display.
pub const MIN_SUBSET: usize = 50;

/// The full loaded time series, immutable after load.
///
/// `xs` is the plot-axis representation of `timestamps`: hours elapsed since
/// the first sample. All three vectors have the same length.
#[derive(Debug, Clone)]
pub struct Signal {
    /// Sample timestamps, strictly increasing (validated by the loader).
    pub timestamps: Vec<DateTime<Utc>>,
    /// Hours since the first timestamp, for the x axis.
    pub xs: Vec<f64>,
    /// Observed (noisy) values.
    pub values: Vec<f64>,
}

impl Signal {
    /// Build a signal from parallel timestamp/value vectors.
    ///
    /// The loader is responsible for validating monotonicity and minimum
    /// length before constructing.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        let t0 = timestamps.first().copied();
        let xs = timestamps
            .iter()
            .map(|t| match t0 {
                Some(t0) => (*t - t0).num_seconds() as f64 / 3600.0,
                None => 0.0,
            })
            .collect();
        Signal {
            timestamps,
            xs,
            values,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the signal is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the first `n` samples as the active view.
    pub fn view(&self, n: usize) -> Result<ActiveView<'_>, InvalidRangeError> {
        if n < MIN_SUBSET || n > self.len() {
            return Err(InvalidRangeError {
                requested: n,
                min: MIN_SUBSET,
                max: self.len(),
            });
        }
        Ok(ActiveView {
            xs: &self.xs[..n],
            values: &self.values[..n],
        })
    }
}

// ---------------------------------------------------------------------------
// ActiveView – the bounded prefix selected for display/analysis
// ---------------------------------------------------------------------------

/// A prefix view of the signal. Smoothing always runs over a view, never the
/// full signal directly, so every output series stays aligned 1:1 with `xs`.
#[derive(Debug, Clone, Copy)]
pub struct ActiveView<'a> {
    pub xs: &'a [f64],
    pub values: &'a [f64],
}

impl ActiveView<'_> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Requested subset size outside `[MIN_SUBSET, signal length]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("subset size {requested} out of range {min}..={max}")]
pub struct InvalidRangeError {
    pub requested: usize,
    pub min: usize,
    pub max: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hourly_signal(n: usize) -> Signal {
        let t0 = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..n)
            .map(|i| t0 + chrono::Duration::hours(i as i64))
            .collect();
        let values = (0..n).map(|i| i as f64).collect();
        Signal::new(timestamps, values)
    }

    #[test]
    fn view_returns_exact_prefix_length() {
        let sig = hourly_signal(200);
        for n in [50, 51, 137, 200] {
            let view = sig.view(n).unwrap();
            assert_eq!(view.len(), n);
            assert_eq!(view.xs.len(), n);
            assert_eq!(view.values[n - 1], (n - 1) as f64);
        }
    }

    #[test]
    fn view_rejects_out_of_range_sizes() {
        let sig = hourly_signal(200);
        assert!(sig.view(49).is_err());
        assert!(sig.view(201).is_err());
        let err = sig.view(0).unwrap_err();
        assert_eq!(err.min, MIN_SUBSET);
        assert_eq!(err.max, 200);
    }

    #[test]
    fn xs_are_hours_since_start() {
        let sig = hourly_signal(60);
        assert_eq!(sig.xs[0], 0.0);
        assert_eq!(sig.xs[59], 59.0);
    }
}

use crate::data::model::ActiveView;

use super::methods::{self, InvalidParameterError};
use super::registry::{MethodKind, MethodParams, MethodRegistry};

// ---------------------------------------------------------------------------
// Smoothing engine
// ---------------------------------------------------------------------------

/// One enabled method's recomputation result for the current cycle.
#[derive(Debug, Clone)]
pub struct MethodOutput {
    pub kind: MethodKind,
    /// Smoothed series aligned 1:1 with the view, or the reason this
    /// method's trace is dropped for the cycle.
    pub result: Result<Vec<f64>, InvalidParameterError>,
}

/// Recompute every enabled method's series over the active view.
///
/// Always a full recompute: any parameter, enabled-flag, or subset change
/// re-runs all enabled transforms. Methods are independent; a failure is
/// carried in that method's own entry and the rest are unaffected.
pub fn compute(view: &ActiveView<'_>, registry: &MethodRegistry) -> Vec<MethodOutput> {
    registry
        .iter()
        .filter(|d| d.enabled)
        .map(|d| MethodOutput {
            kind: d.kind,
            result: apply(&d.params, view.values),
        })
        .collect()
}

/// Apply one method's transform to a value series.
pub fn apply(params: &MethodParams, values: &[f64]) -> Result<Vec<f64>, InvalidParameterError> {
    match *params {
        MethodParams::MovingAverage { window } => methods::moving_average(values, window),
        MethodParams::ExponentialMovingAverage { alpha } => {
            methods::exponential_moving_average(values, alpha)
        }
        MethodParams::SavitzkyGolay { window, polyorder } => {
            methods::savitzky_golay(values, window, polyorder)
        }
        MethodParams::Loess { frac } => methods::loess(values, frac),
        MethodParams::Gaussian { sigma } => methods::gaussian(values, sigma),
        MethodParams::Kalman {
            transition_std,
            observation_std,
        } => methods::kalman(values, transition_std, observation_std),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Signal;
    use chrono::{TimeZone, Utc};

    fn noisy_signal(n: usize) -> Signal {
        let t0 = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..n)
            .map(|i| t0 + chrono::Duration::hours(i as i64))
            .collect();
        let values = (0..n)
            .map(|i| (i as f64 * 0.1).sin() + (i as f64 * 1.7).cos() * 0.3)
            .collect();
        Signal::new(timestamps, values)
    }

    #[test]
    fn every_enabled_method_yields_a_full_length_series() {
        let sig = noisy_signal(120);
        let view = sig.view(100).unwrap();
        let outputs = compute(&view, &MethodRegistry::default());
        assert_eq!(outputs.len(), 6);
        for out in &outputs {
            let series = out.result.as_ref().unwrap();
            assert_eq!(series.len(), 100, "{:?}", out.kind);
            assert!(series.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn disabled_methods_are_skipped_without_affecting_others() {
        let sig = noisy_signal(120);
        let view = sig.view(80).unwrap();

        let all = compute(&view, &MethodRegistry::default());
        let mut registry = MethodRegistry::default();
        registry.set_enabled(MethodKind::Gaussian, false);
        let without = compute(&view, &registry);

        assert_eq!(without.len(), 5);
        assert!(without.iter().all(|o| o.kind != MethodKind::Gaussian));
        // Remaining series are byte-for-byte what they were before.
        for out in &without {
            let reference = all.iter().find(|o| o.kind == out.kind).unwrap();
            assert_eq!(
                out.result.as_ref().unwrap(),
                reference.result.as_ref().unwrap()
            );
        }
    }

    #[test]
    fn one_failing_method_leaves_the_other_five_intact() {
        let sig = noisy_signal(120);
        let view = sig.view(80).unwrap();

        let mut registry = MethodRegistry::default();
        // Bypass the clamping setters to simulate a bad parameter reaching
        // the engine.
        registry.get_mut(MethodKind::SavitzkyGolay).params = MethodParams::SavitzkyGolay {
            window: 5,
            polyorder: 5,
        };

        let outputs = compute(&view, &registry);
        assert_eq!(outputs.len(), 6);
        let failed: Vec<MethodKind> = outputs
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.kind)
            .collect();
        assert_eq!(failed, vec![MethodKind::SavitzkyGolay]);

        let reference = compute(&view, &MethodRegistry::default());
        for out in outputs.iter().filter(|o| o.result.is_ok()) {
            let r = reference.iter().find(|o| o.kind == out.kind).unwrap();
            assert_eq!(out.result.as_ref().unwrap(), r.result.as_ref().unwrap());
        }
    }

    #[test]
    fn changing_one_parameter_does_not_change_other_series() {
        let sig = noisy_signal(120);
        let view = sig.view(100).unwrap();

        let mut registry = MethodRegistry::default();
        let before = compute(&view, &registry);
        registry
            .set_parameter(MethodKind::ExponentialMovingAverage, "alpha", 0.9)
            .unwrap();
        let after = compute(&view, &registry);

        for (a, b) in before.iter().zip(&after) {
            assert_eq!(a.kind, b.kind);
            if a.kind == MethodKind::ExponentialMovingAverage {
                assert_ne!(a.result.as_ref().unwrap(), b.result.as_ref().unwrap());
            } else {
                assert_eq!(a.result.as_ref().unwrap(), b.result.as_ref().unwrap());
            }
        }
    }
}

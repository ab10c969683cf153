use crate::data::model::{Signal, MIN_SUBSET};
use crate::smooth::engine;
use crate::smooth::registry::{MethodKind, MethodRegistry};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Trace opacity for the smoothed series; the original signal's opacity is
/// user-controlled.
pub const SMOOTH_OPACITY: f32 = 0.8;

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded signal (None until a dataset is loaded).
    pub signal: Option<Signal>,

    /// The six method descriptors; mutated only by the control panel.
    pub registry: MethodRegistry,

    /// How many points from the start of the series to display.
    pub subset_size: usize,

    /// Opacity of the raw signal trace.
    pub signal_opacity: f32,

    /// Smoothed series for the current cycle, in registry order (enabled,
    /// successfully computed methods only).
    pub outputs: Vec<(MethodKind, Vec<f64>)>,

    /// Methods whose transform failed this cycle, with the reason.
    pub method_errors: Vec<(MethodKind, String)>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            signal: None,
            registry: MethodRegistry::default(),
            subset_size: 500,
            signal_opacity: 0.7,
            outputs: Vec::new(),
            method_errors: Vec::new(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded signal, clamp the subset into its valid range,
    /// and compute the first cycle.
    pub fn set_signal(&mut self, signal: Signal) {
        self.subset_size = self.subset_size.clamp(MIN_SUBSET, signal.len());
        self.signal = Some(signal);
        self.status_message = None;
        self.recompute();
    }

    /// The single entry point for any control change: recompute every
    /// enabled method's series over the current view.
    ///
    /// An out-of-range subset is surfaced as a status message and the
    /// previous outputs are kept (no recomputation for that event).
    pub fn recompute(&mut self) {
        let Some(signal) = &self.signal else {
            return;
        };

        let view = match signal.view(self.subset_size) {
            Ok(view) => view,
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };

        self.outputs.clear();
        self.method_errors.clear();
        for out in engine::compute(&view, &self.registry) {
            match out.result {
                Ok(series) => self.outputs.push((out.kind, series)),
                Err(e) => {
                    log::warn!("{} dropped for this cycle: {e}", out.kind.label());
                    self.method_errors.push((out.kind, e.to_string()));
                }
            }
        }
    }
}

use eframe::egui::Color32;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Method identities
// ---------------------------------------------------------------------------

/// The six smoothing techniques, in fixed display order. Legend and
/// trace-draw order follow `MethodKind::ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    MovingAverage,
    ExponentialMovingAverage,
    SavitzkyGolay,
    Loess,
    Gaussian,
    Kalman,
}

impl MethodKind {
    pub const ALL: [MethodKind; 6] = [
        MethodKind::MovingAverage,
        MethodKind::ExponentialMovingAverage,
        MethodKind::SavitzkyGolay,
        MethodKind::Loess,
        MethodKind::Gaussian,
        MethodKind::Kalman,
    ];

    /// Display name used for checkboxes and legend entries.
    pub fn label(self) -> &'static str {
        match self {
            MethodKind::MovingAverage => "Moving Avg",
            MethodKind::ExponentialMovingAverage => "EMA",
            MethodKind::SavitzkyGolay => "SavGol",
            MethodKind::Loess => "LOESS",
            MethodKind::Gaussian => "Gaussian",
            MethodKind::Kalman => "Kalman",
        }
    }

    /// Fixed trace colour, invariant for the process lifetime.
    pub fn color(self) -> Color32 {
        match self {
            MethodKind::MovingAverage => Color32::from_rgb(0x1f, 0x77, 0xb4),
            MethodKind::ExponentialMovingAverage => Color32::from_rgb(0xff, 0x7f, 0x0e),
            MethodKind::SavitzkyGolay => Color32::from_rgb(0x2c, 0xa0, 0x2c),
            MethodKind::Loess => Color32::from_rgb(0xd6, 0x27, 0x28),
            MethodKind::Gaussian => Color32::from_rgb(0x94, 0x67, 0xbd),
            MethodKind::Kalman => Color32::from_rgb(0x17, 0xbe, 0xcf),
        }
    }

    /// Declared parameter domains, driving both the sliders and the
    /// clamp/snap performed by [`MethodRegistry::set_parameter`].
    pub fn param_specs(self) -> &'static [ParamSpec] {
        match self {
            MethodKind::MovingAverage => &[ParamSpec {
                key: "window",
                label: "Window",
                min: 3.0,
                max: 51.0,
                step: 2.0,
                integer: true,
            }],
            MethodKind::ExponentialMovingAverage => &[ParamSpec {
                key: "alpha",
                label: "Alpha",
                min: 0.01,
                max: 1.0,
                step: 0.01,
                integer: false,
            }],
            MethodKind::SavitzkyGolay => &[
                ParamSpec {
                    key: "window",
                    label: "Window",
                    min: 5.0,
                    max: 51.0,
                    step: 2.0,
                    integer: true,
                },
                ParamSpec {
                    key: "polyorder",
                    label: "Poly",
                    min: 1.0,
                    max: 5.0,
                    step: 1.0,
                    integer: true,
                },
            ],
            MethodKind::Loess => &[ParamSpec {
                key: "frac",
                label: "Frac",
                min: 0.01,
                max: 0.5,
                step: 0.01,
                integer: false,
            }],
            MethodKind::Gaussian => &[ParamSpec {
                key: "sigma",
                label: "Sigma",
                min: 0.1,
                max: 10.0,
                step: 0.1,
                integer: false,
            }],
            MethodKind::Kalman => &[
                ParamSpec {
                    key: "transition_std",
                    label: "Transition std",
                    min: 0.001,
                    max: 1.0,
                    step: 0.01,
                    integer: false,
                },
                ParamSpec {
                    key: "observation_std",
                    label: "Observation std",
                    min: 0.001,
                    max: 1.0,
                    step: 0.01,
                    integer: false,
                },
            ],
        }
    }
}

/// One slider's declared domain.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub integer: bool,
}

// ---------------------------------------------------------------------------
// Parameters – statically typed per method
// ---------------------------------------------------------------------------

/// Per-method parameter set. One variant per method so each parameter is a
/// typed field rather than an entry in a loosely-typed map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MethodParams {
    MovingAverage { window: usize },
    ExponentialMovingAverage { alpha: f64 },
    SavitzkyGolay { window: usize, polyorder: usize },
    Loess { frac: f64 },
    Gaussian { sigma: f64 },
    Kalman { transition_std: f64, observation_std: f64 },
}

impl MethodParams {
    /// Defaults match the original dashboard's slider defaults.
    fn default_for(kind: MethodKind) -> Self {
        match kind {
            MethodKind::MovingAverage => MethodParams::MovingAverage { window: 15 },
            MethodKind::ExponentialMovingAverage => {
                MethodParams::ExponentialMovingAverage { alpha: 0.1 }
            }
            MethodKind::SavitzkyGolay => MethodParams::SavitzkyGolay {
                window: 15,
                polyorder: 2,
            },
            MethodKind::Loess => MethodParams::Loess { frac: 0.05 },
            MethodKind::Gaussian => MethodParams::Gaussian { sigma: 2.0 },
            MethodKind::Kalman => MethodParams::Kalman {
                transition_std: 0.05,
                observation_std: 0.2,
            },
        }
    }

    /// Read a parameter by its spec key.
    pub fn get(&self, key: &str) -> Option<f64> {
        match (self, key) {
            (MethodParams::MovingAverage { window }, "window") => Some(*window as f64),
            (MethodParams::ExponentialMovingAverage { alpha }, "alpha") => Some(*alpha),
            (MethodParams::SavitzkyGolay { window, .. }, "window") => Some(*window as f64),
            (MethodParams::SavitzkyGolay { polyorder, .. }, "polyorder") => Some(*polyorder as f64),
            (MethodParams::Loess { frac }, "frac") => Some(*frac),
            (MethodParams::Gaussian { sigma }, "sigma") => Some(*sigma),
            (MethodParams::Kalman { transition_std, .. }, "transition_std") => Some(*transition_std),
            (MethodParams::Kalman { observation_std, .. }, "observation_std") => {
                Some(*observation_std)
            }
            _ => None,
        }
    }

    /// Write a parameter by its spec key. Returns false for unknown keys.
    fn set(&mut self, key: &str, value: f64) -> bool {
        match (self, key) {
            (MethodParams::MovingAverage { window }, "window") => *window = value as usize,
            (MethodParams::ExponentialMovingAverage { alpha }, "alpha") => *alpha = value,
            (MethodParams::SavitzkyGolay { window, .. }, "window") => *window = value as usize,
            (MethodParams::SavitzkyGolay { polyorder, .. }, "polyorder") => {
                *polyorder = value as usize
            }
            (MethodParams::Loess { frac }, "frac") => *frac = value,
            (MethodParams::Gaussian { sigma }, "sigma") => *sigma = value,
            (MethodParams::Kalman { transition_std, .. }, "transition_std") => {
                *transition_std = value
            }
            (MethodParams::Kalman { observation_std, .. }, "observation_std") => {
                *observation_std = value
            }
            _ => return false,
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Descriptor and registry
// ---------------------------------------------------------------------------

/// Registry record for one smoothing technique.
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    pub kind: MethodKind,
    pub color: Color32,
    pub enabled: bool,
    pub params: MethodParams,
}

/// Accessing a parameter key the method does not declare.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("method {kind:?} has no parameter '{key}'")]
pub struct UnknownMethodError {
    pub kind: MethodKind,
    pub key: String,
}

/// The fixed table of six method descriptors, in display order. Only the
/// control surface (UI) mutates it; every mutation is followed by a full
/// engine recompute.
#[derive(Debug, Clone)]
pub struct MethodRegistry {
    descriptors: Vec<MethodDescriptor>,
}

impl Default for MethodRegistry {
    fn default() -> Self {
        let descriptors = MethodKind::ALL
            .iter()
            .map(|&kind| MethodDescriptor {
                kind,
                color: kind.color(),
                enabled: true,
                params: MethodParams::default_for(kind),
            })
            .collect();
        MethodRegistry { descriptors }
    }
}

impl MethodRegistry {
    /// Descriptors in display order.
    pub fn iter(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.descriptors.iter()
    }

    pub fn get(&self, kind: MethodKind) -> &MethodDescriptor {
        // The table always holds all six kinds.
        self.descriptors
            .iter()
            .find(|d| d.kind == kind)
            .expect("registry holds every MethodKind")
    }

    pub fn get_mut(&mut self, kind: MethodKind) -> &mut MethodDescriptor {
        self.descriptors
            .iter_mut()
            .find(|d| d.kind == kind)
            .expect("registry holds every MethodKind")
    }

    /// Update one parameter, clamped to its declared range and snapped to
    /// its declared step.
    pub fn set_parameter(
        &mut self,
        kind: MethodKind,
        key: &str,
        value: f64,
    ) -> Result<(), UnknownMethodError> {
        let spec = kind
            .param_specs()
            .iter()
            .find(|s| s.key == key)
            .ok_or_else(|| UnknownMethodError {
                kind,
                key: key.to_string(),
            })?;

        let snapped = snap_to_spec(value, spec);
        let ok = self.get_mut(kind).params.set(key, snapped);
        debug_assert!(ok, "spec key must exist on the params variant");
        Ok(())
    }

    pub fn set_enabled(&mut self, kind: MethodKind, enabled: bool) {
        self.get_mut(kind).enabled = enabled;
    }
}

/// Snap to the parameter's declared step grid (anchored at `min`), then clamp.
fn snap_to_spec(value: f64, spec: &ParamSpec) -> f64 {
    let stepped = ((value - spec.min) / spec.step).round() * spec.step + spec.min;
    let clamped = stepped.clamp(spec.min, spec.max);
    if spec.integer {
        clamped.round()
    } else {
        clamped
    }
}

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::model::MIN_SUBSET;
use crate::smooth::registry::MethodKind;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – data and smoothing controls
// ---------------------------------------------------------------------------

/// Render the control panel. All registry mutations funnel through the
/// registry setters; one recompute runs at the end if anything changed.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let Some(signal_len) = state.signal.as_ref().map(|s| s.len()) else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Data parameters ----
            ui.strong("Data Parameters");
            ui.label("Points to display from the start of the series, and raw-signal visibility.");
            changed |= ui
                .add(
                    Slider::new(&mut state.subset_size, MIN_SUBSET..=signal_len)
                        .step_by(20.0)
                        .text("Points shown"),
                )
                .changed();
            // Opacity only affects rendering, not the computed series, but a
            // single change event re-runs the whole cycle anyway.
            changed |= ui
                .add(
                    Slider::new(&mut state.signal_opacity, 0.0..=1.0)
                        .step_by(0.05)
                        .text("Signal opacity"),
                )
                .changed();
            ui.separator();

            // ---- Per-method controls ----
            ui.strong("Smoothing Parameters");
            ui.label("Select which methods to display and adjust their parameters.");
            ui.add_space(4.0);

            for kind in MethodKind::ALL {
                let (mut enabled, params, color) = {
                    let d = state.registry.get(kind);
                    (d.enabled, d.params, d.color)
                };

                let label = RichText::new(kind.label()).color(color).strong();
                if ui.checkbox(&mut enabled, label).changed() {
                    state.registry.set_enabled(kind, enabled);
                    changed = true;
                }

                for spec in kind.param_specs() {
                    let mut value = params.get(spec.key).unwrap_or(spec.min);
                    let mut slider = Slider::new(&mut value, spec.min..=spec.max)
                        .step_by(spec.step)
                        .text(spec.label);
                    if spec.integer {
                        slider = slider.fixed_decimals(0);
                    }
                    if ui.add(slider).changed() {
                        if let Err(e) = state.registry.set_parameter(kind, spec.key, value) {
                            // Spec key tables and params variants are fixed;
                            // a miss is a programming error.
                            log::error!("{e}");
                        }
                        changed = true;
                    }
                }

                if let Some((_, msg)) = state.method_errors.iter().find(|(k, _)| *k == kind) {
                    ui.label(RichText::new(msg).color(Color32::RED).small());
                }
                ui.add_space(6.0);
            }
        });

    if changed {
        state.recompute();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(sig) = &state.signal {
            ui.label(format!(
                "{} points loaded, {} shown, {} methods enabled",
                sig.len(),
                state.subset_size.min(sig.len()),
                state.registry.iter().filter(|d| d.enabled).count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open time-series data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(signal) => {
                log::info!("Loaded {} points from {}", signal.len(), path.display());
                state.set_signal(signal);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

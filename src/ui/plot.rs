use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::state::{AppState, SMOOTH_OPACITY};

// ---------------------------------------------------------------------------
// Comparison plot (central panel)
// ---------------------------------------------------------------------------

const ORIGINAL_COLOR: Color32 = Color32::BLACK;

/// Render the comparison chart: the original signal first (caller-controlled
/// opacity), then each enabled method's series in registry order.
pub fn comparison_plot(ui: &mut Ui, state: &AppState) {
    let Some(signal) = &state.signal else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to compare smoothing methods  (File → Open…)");
        });
        return;
    };

    let n = state.subset_size.min(signal.len());
    let xs = &signal.xs[..n];
    let values = &signal.values[..n];

    ui.heading("Smoothing Methods Comparison");

    Plot::new("smoothing_comparison")
        .legend(Legend::default())
        .x_axis_label("Time (h)")
        .y_axis_label("Value")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let original: PlotPoints = xs
                .iter()
                .zip(values.iter())
                .map(|(&x, &y)| [x, y])
                .collect();
            plot_ui.line(
                Line::new(original)
                    .name("Original")
                    .color(ORIGINAL_COLOR.gamma_multiply(state.signal_opacity))
                    .width(1.0),
            );

            for (kind, series) in &state.outputs {
                let descriptor = state.registry.get(*kind);
                if !descriptor.enabled {
                    continue;
                }
                let points: PlotPoints = xs
                    .iter()
                    .zip(series.iter())
                    .map(|(&x, &y)| [x, y])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(kind.label())
                        .color(descriptor.color.gamma_multiply(SMOOTH_OPACITY))
                        .width(1.5),
                );
            }
        });
}

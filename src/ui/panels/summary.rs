// ComboStats - ui/panels/summary.rs
//
// Load summary modal window.
// Shows the database target, per-dataset row counts, timing, and any
// configuration warnings collected at startup.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the load summary dialog (if state.show_summary is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_summary {
        return;
    }

    let mut open = true;
    egui::Window::new("Load Summary")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .min_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if let Some(ref summary) = state.last_load {
                ui.strong("Overview");
                egui::Grid::new("summary_overview")
                    .num_columns(2)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Database:");
                        ui.label(egui::RichText::new(&summary.source).monospace());
                        ui.end_row();

                        ui.label("Loaded at:");
                        ui.label(summary.loaded_at.format("%Y-%m-%d %H:%M:%S").to_string());
                        ui.end_row();

                        ui.label("Duration:");
                        ui.label(format!("{:.2}s", summary.duration.as_secs_f64()));
                        ui.end_row();

                        ui.label("Total rows:");
                        ui.label(summary.total_rows().to_string());
                        ui.end_row();
                    });

                ui.add_space(8.0);
                ui.separator();
                ui.strong("Per-dataset breakdown");

                egui::Grid::new("summary_datasets")
                    .num_columns(3)
                    .striped(true)
                    .spacing([12.0, 3.0])
                    .show(ui, |ui| {
                        ui.strong("Dataset");
                        ui.strong("Loaded");
                        ui.strong("Shown");
                        ui.end_row();

                        for (kind, rows) in &summary.rows {
                            let (filtered, _) = state.row_counts(*kind);
                            ui.label(kind.title());
                            ui.label(rows.to_string());
                            ui.label(filtered.to_string());
                            ui.end_row();
                        }
                    });
            } else if state.load_in_progress {
                ui.label("A load is in progress.");
            } else {
                ui.label("No load has completed yet.");
            }

            if !state.warnings.is_empty() {
                ui.add_space(8.0);
                ui.separator();
                ui.strong(format!("Warnings ({})", state.warnings.len()));

                egui::ScrollArea::vertical()
                    .id_salt("summary_warnings")
                    .max_height(120.0)
                    .show(ui, |ui| {
                        for warn in &state.warnings {
                            ui.label(
                                egui::RichText::new(warn)
                                    .color(theme::WARNING_TEXT)
                                    .size(11.5),
                            );
                        }
                    });
            }

            ui.add_space(8.0);
            ui.separator();
            if ui.button("Close").clicked() {
                state.show_summary = false;
            }
        });

    if !open {
        state.show_summary = false;
    }
}

// ComboStats - ui/panels/table.rs
//
// Central panel: dataset tabs, the paginated striped grid of the current
// page, and first/prev/next/last navigation.
//
// Page changes are collected while the view is borrowed and applied after,
// so `state` is never mutated during the grid pass.

use crate::app::state::AppState;
use crate::core::dataset::{self, DatasetKind};
use crate::core::model::Value;
use crate::ui::theme;
use crate::util::constants::DATE_FORMAT;

/// Human-readable header for a dataset column.
pub fn column_label(column: &str) -> &str {
    match column {
        dataset::COL_COMBO => "Combo",
        dataset::COL_PLAYERS => "Players",
        dataset::COL_MATCHES => "Matches",
        dataset::COL_WINS => "Wins",
        dataset::COL_LOSSES => "Losses",
        dataset::COL_WIN_RATE => "Win rate %",
        dataset::COL_SERIES_TYPE => "Series type",
        dataset::COL_LENGTH => "Length",
        dataset::COL_START => "Start",
        dataset::COL_END => "End",
        dataset::COL_IN_PROGRESS => "In progress",
        dataset::COL_OPPONENT => "Opponent",
        other => other,
    }
}

/// Display text for one cell.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => theme::MISSING_CELL.to_string(),
        Value::Float(f) => format!("{f:.1}"),
        Value::Date(d) => d.format(DATE_FORMAT).to_string(),
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        other => other.key(),
    }
}

/// Dataset tab strip. Switching tabs keeps every dataset's filters.
pub fn render_tabs(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        for kind in DatasetKind::all() {
            let (filtered, total) = state.row_counts(*kind);
            let label = format!("{} ({filtered}/{total})", kind.title());
            if ui
                .selectable_label(state.active == *kind, label)
                .clicked()
            {
                state.active = *kind;
            }
        }
    });
}

/// Render the grid and page controls for the active dataset.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let kind = state.active;
    let page_size = state.config.page_size;
    let paginate = state.config.paginate;

    let Some(view) = state.view(kind) else {
        ui.centered_and_justified(|ui| {
            if state.load_in_progress {
                ui.label("Loading\u{2026}");
            } else if state.datasets.is_none() {
                ui.label("No data loaded.\nUse File \u{2192} Reload to query the database.");
            } else {
                ui.label("This table could not be computed. See the error above.");
            }
        });
        return;
    };

    if view.filtered.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label("No rows match the current filters.");
        });
        return;
    }

    let page = view.page;
    let page_count = view.page_count;
    let first_row = if paginate { (page - 1) * page_size } else { 0 };
    let dark_mode = state.config.dark_mode;
    let win_rate_col = view.visible.column_index(dataset::COL_WIN_RATE);

    let mut requested_page: Option<usize> = None;

    if paginate {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(page > 1, egui::Button::new("\u{23ee} First"))
                .clicked()
            {
                requested_page = Some(1);
            }
            if ui
                .add_enabled(page > 1, egui::Button::new("\u{25c0} Prev"))
                .clicked()
            {
                requested_page = Some(page - 1);
            }
            ui.label(format!("Page {page} / {page_count}"));
            if ui
                .add_enabled(page < page_count, egui::Button::new("Next \u{25b6}"))
                .clicked()
            {
                requested_page = Some(page + 1);
            }
            if ui
                .add_enabled(page < page_count, egui::Button::new("Last \u{23ed}"))
                .clicked()
            {
                requested_page = Some(page_count);
            }
            ui.separator();
            ui.label(
                egui::RichText::new(format!(
                    "rows {}\u{2013}{} of {}",
                    first_row + 1,
                    first_row + view.visible.len(),
                    view.filtered.len()
                ))
                .weak(),
            );
        });
        ui.add_space(4.0);
    }

    egui::ScrollArea::both()
        .id_salt(("table", kind.id()))
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            egui::Grid::new(("grid", kind.id()))
                .num_columns(view.visible.schema().len() + 1)
                .striped(true)
                .spacing(theme::CELL_SPACING)
                .show(ui, |ui| {
                    ui.strong("#");
                    for name in view.visible.schema().names() {
                        ui.strong(column_label(name));
                    }
                    ui.end_row();

                    for (i, row) in view.visible.rows().iter().enumerate() {
                        ui.label(
                            egui::RichText::new((first_row + i + 1).to_string()).weak(),
                        );
                        for (col, value) in row.iter().enumerate() {
                            let text = format_cell(value);
                            match (win_rate_col, value.as_f64()) {
                                (Some(rc), Some(rate)) if rc == col => {
                                    ui.colored_label(theme::win_rate_colour(rate, dark_mode), text);
                                }
                                _ => {
                                    ui.label(text);
                                }
                            }
                        }
                        ui.end_row();
                    }
                });
        });

    if let Some(p) = requested_page {
        state.set_page(kind, p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&Value::Null), "--");
        assert_eq!(format_cell(&Value::Float(66.666)), "66.7");
        assert_eq!(format_cell(&Value::Bool(true)), "yes");
        assert_eq!(
            format_cell(&Value::Date(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap())),
            "2024-01-09"
        );
        assert_eq!(format_cell(&Value::Int(7)), "7");
    }

    #[test]
    fn test_column_label_falls_back_to_name() {
        assert_eq!(column_label("taux_victoire"), "Win rate %");
        assert_eq!(column_label("notes"), "notes");
    }
}

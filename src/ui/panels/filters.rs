// ComboStats - ui/panels/filters.rs
//
// Filter controls sidebar for the active dataset.
//
// Every widget reads its current value from the session store and writes
// back through `SessionStore::set`. Any change resets paging and re-runs the
// pipeline once at the end of the frame's sidebar pass.

use crate::app::session::{keys, WidgetValue, CHOICE_ALL};
use crate::app::state::AppState;
use crate::core::dataset::{self, DatasetKind};
use crate::core::model::ColumnType;
use crate::ui::panels::table::column_label;
use crate::util::constants::DATE_FORMAT;
use chrono::NaiveDate;
use std::ops::RangeInclusive;

/// Render the filter controls.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.datasets.is_none() {
        ui.label(egui::RichText::new("No data loaded.").weak());
        return;
    }

    let kind = state.active;
    let mut changed = false;

    changed |= player_checkboxes(ui, state);
    ui.separator();

    changed |= text_filter(
        ui,
        state,
        keys::COMBO_SEARCH,
        "Combo contains:",
        "e.g. fire",
    );
    ui.separator();

    match kind {
        DatasetKind::Series => {
            changed |= series_toggles(ui, state);
            ui.separator();
        }
        DatasetKind::Confrontations => {
            changed |= text_filter(
                ui,
                state,
                keys::OPPONENT_SEARCH,
                "Opponent contains:",
                "e.g. water",
            );
            ui.separator();
        }
        DatasetKind::Stats => {}
    }

    for column in kind.range_columns() {
        changed |= range_slider(ui, state, kind, column);
    }
    ui.separator();

    changed |= ranking_choice(ui, state, kind);
    ui.separator();

    if changed {
        state.reset_pages();
        state.refresh();
    }

    if ui
        .button("Reset Filters")
        .on_hover_text("Restore every filter to its default for the loaded data")
        .clicked()
    {
        state.reset_filters();
    }
}

/// Player-count checkboxes shared by every dataset.
fn player_checkboxes(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    let mut options: Vec<String> = state
        .session
        .options(keys::PLAYERS)
        .map(|o| o.iter().cloned().collect())
        .unwrap_or_default();
    if options.is_empty() {
        return false;
    }
    // Numeric order ("2" before "10"); non-numeric keys last, by text.
    options.sort_by_key(|o| (o.parse::<i64>().unwrap_or(i64::MAX), o.clone()));

    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label("Players:");
        if ui.small_button("All").clicked() {
            let all = options.iter().cloned().collect();
            state
                .session
                .set(keys::PLAYERS, WidgetValue::Selection(all));
            changed = true;
        }
        if ui
            .small_button("Clear")
            .on_hover_text("An empty selection shows every player count")
            .clicked()
        {
            state
                .session
                .set(keys::PLAYERS, WidgetValue::Selection(Default::default()));
            changed = true;
        }
    });

    ui.horizontal_wrapped(|ui| {
        for option in &options {
            let mut checked = state
                .session
                .selection(keys::PLAYERS)
                .is_some_and(|s| s.contains(option));
            if ui.checkbox(&mut checked, option.as_str()).changed() {
                if checked {
                    state.session.select(keys::PLAYERS, option);
                } else {
                    state.session.deselect(keys::PLAYERS, option);
                }
                changed = true;
            }
        }
    });

    if state
        .session
        .selection(keys::PLAYERS)
        .is_some_and(|s| s.is_empty())
    {
        ui.label(
            egui::RichText::new("None selected: showing all.")
                .small()
                .weak(),
        );
    }
    changed
}

fn text_filter(
    ui: &mut egui::Ui,
    state: &mut AppState,
    key: &str,
    label: &str,
    hint: &str,
) -> bool {
    ui.label(label);
    let mut text = state.session.text(key).unwrap_or_default().to_string();
    let response = ui.add(
        egui::TextEdit::singleline(&mut text)
            .hint_text(hint)
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        state.session.set(key, WidgetValue::Text(text));
        return true;
    }
    false
}

/// Series type radio buttons and the in-progress checkbox.
fn series_toggles(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    let mut changed = false;

    ui.label("Series type:");
    let current = state
        .session
        .choice(keys::SERIES_TYPE)
        .unwrap_or(CHOICE_ALL)
        .to_string();
    let mut choice = current.clone();
    ui.horizontal(|ui| {
        ui.radio_value(&mut choice, CHOICE_ALL.to_string(), "All");
        ui.radio_value(&mut choice, dataset::SERIES_WINS.to_string(), "Wins");
        ui.radio_value(&mut choice, dataset::SERIES_LOSSES.to_string(), "Losses");
    });
    if choice != current {
        state.session.set(keys::SERIES_TYPE, WidgetValue::Choice(choice));
        changed = true;
    }

    let mut in_progress = state.session.flag(keys::IN_PROGRESS_ONLY);
    if ui
        .checkbox(&mut in_progress, "In progress only")
        .changed()
    {
        state
            .session
            .set(keys::IN_PROGRESS_ONLY, WidgetValue::Flag(in_progress));
        changed = true;
    }
    changed
}

/// Min/max sliders bounded by the values observed in the loaded table.
fn range_slider(
    ui: &mut egui::Ui,
    state: &mut AppState,
    kind: DatasetKind,
    column: &str,
) -> bool {
    let key = keys::range(kind, column);
    let Some((min, max)) = state
        .datasets
        .as_ref()
        .and_then(|d| d.get(kind).numeric_bounds(column))
    else {
        return false;
    };
    let Some((mut lo, mut hi)) = state.session.range(&key) else {
        return false;
    };

    let ty = kind.column_type(column);
    let is_date = ty == ColumnType::Date;
    let step = if ty == ColumnType::Float { 0.1 } else { 1.0 };
    let format = move |v: f64, _: RangeInclusive<usize>| format_bound(v, is_date);

    ui.label(format!("{}:", column_label(column)));
    let mut changed = false;
    changed |= ui
        .add(
            egui::Slider::new(&mut lo, min..=max)
                .step_by(step)
                .text("min")
                .custom_formatter(format),
        )
        .changed();
    changed |= ui
        .add(
            egui::Slider::new(&mut hi, min..=max)
                .step_by(step)
                .text("max")
                .custom_formatter(format),
        )
        .changed();

    if changed {
        let lo = snap_to_bounds(lo, min, max, step);
        let hi = snap_to_bounds(hi, min, max, step);
        state.session.set(&key, WidgetValue::Range(lo, hi));
    }
    changed
}

/// Clamp a slider value into `[min, max]`, pulling it onto a bound when it
/// lies within half a step of it. Step snapping can otherwise leave the top
/// value just below an off-grid maximum and drop that row.
fn snap_to_bounds(value: f64, min: f64, max: f64, step: f64) -> f64 {
    let value = value.clamp(min, max);
    let tolerance = step / 2.0;
    if max - value < tolerance {
        max
    } else if value - min < tolerance {
        min
    } else {
        value
    }
}

fn format_bound(value: f64, is_date: bool) -> String {
    if is_date {
        return NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
            .map_or_else(|| format!("{value:.0}"), |d| d.format(DATE_FORMAT).to_string());
    }
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Ranking column used for the table sort and the chart.
fn ranking_choice(ui: &mut egui::Ui, state: &mut AppState, kind: DatasetKind) -> bool {
    let key = keys::sort(kind);
    let current = state
        .session
        .choice(&key)
        .unwrap_or_else(|| kind.default_ranking())
        .to_string();
    let mut selected = current.clone();

    ui.horizontal(|ui| {
        ui.label("Rank by:");
        egui::ComboBox::from_id_salt(("rank_by", kind.id()))
            .selected_text(column_label(&selected))
            .show_ui(ui, |ui| {
                for column in kind.ranking_columns() {
                    ui.selectable_value(&mut selected, column.to_string(), column_label(column));
                }
            });
    });

    if selected != current {
        tracing::debug!(dataset = kind.id(), column = %selected, "Ranking changed");
        state.session.set(&key, WidgetValue::Choice(selected));
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bound() {
        assert_eq!(format_bound(12.0, false), "12");
        assert_eq!(format_bound(66.66, false), "66.7");
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let days = f64::from(chrono::Datelike::num_days_from_ce(&day));
        assert_eq!(format_bound(days, true), "2024-03-01");
    }

    #[test]
    fn test_snap_to_bounds() {
        // Off-grid maximum reached by a 0.1 step from an off-grid minimum.
        assert_eq!(snap_to_bounds(66.69999999999999, 33.3, 66.7, 0.1), 66.7);
        assert_eq!(snap_to_bounds(66.65, 12.34, 66.67, 0.1), 66.67);
        assert_eq!(snap_to_bounds(12.38, 12.34, 66.67, 0.1), 12.34);
        assert_eq!(snap_to_bounds(99.0, 0.0, 80.0, 1.0), 80.0);
        assert_eq!(snap_to_bounds(-3.0, 0.0, 80.0, 1.0), 0.0);
        assert_eq!(snap_to_bounds(40.0, 0.0, 80.0, 1.0), 40.0);
    }
}

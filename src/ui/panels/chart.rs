// ComboStats - ui/panels/chart.rs
//
// Bar chart of the top-ranked rows of the active dataset (egui_plot).
// Bars follow the current filters and the selected ranking column.

use crate::app::session::keys;
use crate::app::state::AppState;
use crate::ui::panels::table::column_label;
use crate::ui::theme;
use egui_plot::{Bar, BarChart, Plot};

/// Longest bar label shown on the x axis before truncation.
const MAX_AXIS_LABEL_CHARS: usize = 14;

/// Render the ranking chart for `state.active`.
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    let kind = state.active;
    let data = state.chart_data(kind);
    if data.is_empty() {
        ui.label(egui::RichText::new("Nothing to chart for the current filters.").weak());
        return;
    }

    let ranking = state
        .session
        .choice(&keys::sort(kind))
        .unwrap_or_else(|| kind.default_ranking());
    ui.label(
        egui::RichText::new(format!(
            "Top {} by {}",
            data.len(),
            column_label(ranking)
        ))
        .strong(),
    );

    let bars: Vec<Bar> = data
        .iter()
        .enumerate()
        .map(|(i, d)| {
            Bar::new(i as f64, d.value)
                .name(&d.label)
                .fill(theme::BAR_FILL)
        })
        .collect();
    let labels: Vec<String> = data.iter().map(|d| truncate_label(&d.label)).collect();

    Plot::new(("ranking_chart", kind.id()))
        .height(theme::CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .y_axis_label(column_label(ranking))
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(column_label(ranking)));
        });
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_AXIS_LABEL_CHARS {
        return label.to_string();
    }
    let head: String = label.chars().take(MAX_AXIS_LABEL_CHARS - 1).collect();
    format!("{head}\u{2026}")
}

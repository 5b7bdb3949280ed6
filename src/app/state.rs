// ComboStats - app/state.rs
//
// Application state management. Holds the loaded datasets, the session
// widget values, the computed view of each dataset, and UI flags.
// Owned by the eframe::App implementation.

use crate::app::load::LoadSummary;
use crate::app::session::{keys, SessionStore, WidgetValue};
use crate::core::chart::{self, BarDatum};
use crate::core::dataset::{DatasetKind, Datasets};
use crate::core::model::Table;
use crate::core::view::{self, ViewResult};
use crate::platform::config::AppConfig;
use std::collections::BTreeMap;

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Validated configuration.
    pub config: AppConfig,

    /// Tables from the most recent successful load (None before the first).
    pub datasets: Option<Datasets>,

    /// Current filter widget values.
    pub session: SessionStore,

    /// Dataset tab shown in the central panel.
    pub active: DatasetKind,

    /// Filtered, sorted, paged view per dataset.
    pub views: BTreeMap<DatasetKind, ViewResult>,

    /// Summary of the most recent successful load.
    pub last_load: Option<LoadSummary>,

    /// Whether a load is currently in progress.
    pub load_in_progress: bool,

    /// Error from the last failed load or pipeline run, shown as a banner.
    pub error_message: Option<String>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings (config validation, etc.).
    pub warnings: Vec<String>,

    /// A panel asked for the datasets to be reloaded.
    pub request_reload: bool,

    /// Whether to show the ranking chart above the table.
    pub show_chart: bool,

    /// Whether to show the load summary dialog.
    pub show_summary: bool,

    /// Whether to show the about dialog.
    pub show_about: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    /// Create initial state. Data arrives later via `install`.
    pub fn new(config: AppConfig, debug_mode: bool) -> Self {
        Self {
            config,
            datasets: None,
            session: SessionStore::new(),
            active: DatasetKind::Stats,
            views: BTreeMap::new(),
            last_load: None,
            load_in_progress: false,
            error_message: None,
            status_message: "Ready.".to_string(),
            warnings: Vec::new(),
            request_reload: false,
            show_chart: true,
            show_summary: false,
            show_about: false,
            debug_mode,
        }
    }

    /// Replace the loaded data, start a fresh session, and recompute views.
    pub fn install(&mut self, datasets: Datasets, summary: Option<LoadSummary>) {
        self.session.clear();
        self.session.init_defaults(&datasets);
        self.status_message = format!("Loaded {} rows.", datasets.total_rows());
        self.datasets = Some(datasets);
        self.last_load = summary;
        self.error_message = None;
        self.refresh();
    }

    /// Re-run filter -> sort -> page for every dataset.
    ///
    /// Called after every widget change. A failing dataset keeps no view and
    /// its error is shown; the other datasets still refresh.
    pub fn refresh(&mut self) {
        let Some(ref datasets) = self.datasets else {
            self.views.clear();
            return;
        };

        let mut errors = Vec::new();
        for kind in DatasetKind::all() {
            let request = self.session.view_request(*kind, self.config.paginate);
            match view::render(datasets.get(*kind), &request, self.config.page_size) {
                Ok(result) => {
                    self.views.insert(*kind, result);
                }
                Err(e) => {
                    tracing::warn!(dataset = kind.id(), error = %e, "View refresh failed");
                    self.views.remove(kind);
                    errors.push(format!("{}: {e}", kind.title()));
                }
            }
        }

        // Write back clamped page numbers so the next read matches what is shown.
        for (kind, result) in &self.views {
            let key = keys::page(*kind);
            if self.config.paginate && self.session.page(&key) != Some(result.page) {
                self.session.set(&key, WidgetValue::Page(result.page));
            }
        }

        self.error_message = (!errors.is_empty()).then(|| errors.join("\n"));
    }

    /// Computed view of `kind`, if data is loaded.
    pub fn view(&self, kind: DatasetKind) -> Option<&ViewResult> {
        self.views.get(&kind)
    }

    /// Move `kind` to `page` (clamped by the pipeline) and refresh.
    pub fn set_page(&mut self, kind: DatasetKind, page: usize) {
        self.session
            .set(&keys::page(kind), WidgetValue::Page(page.max(1)));
        self.refresh();
    }

    /// Go back to page 1 of every dataset. Called whenever filters change so
    /// the user does not land on a page that no longer exists.
    pub fn reset_pages(&mut self) {
        for kind in DatasetKind::all() {
            self.session.set(&keys::page(*kind), WidgetValue::Page(1));
        }
    }

    /// Restore every widget to the defaults derived from the loaded data.
    pub fn reset_filters(&mut self) {
        self.session.clear();
        if let Some(ref datasets) = self.datasets {
            self.session.init_defaults(datasets);
        }
        self.refresh();
        self.status_message = "Filters reset.".to_string();
    }

    /// Top-N bars of the active ranking column for `kind`.
    pub fn chart_data(&self, kind: DatasetKind) -> Vec<BarDatum> {
        let Some(view) = self.view(kind) else {
            return Vec::new();
        };
        let ranking = self
            .session
            .choice(&keys::sort(kind))
            .unwrap_or_else(|| kind.default_ranking());
        match chart::top_n(
            &view.filtered,
            kind.chart_label_column(),
            ranking,
            self.config.top_n,
        ) {
            Ok(bars) => bars,
            Err(e) => {
                tracing::debug!(dataset = kind.id(), error = %e, "No chart data");
                Vec::new()
            }
        }
    }

    /// Rows matching the filters for `kind` (all pages), for export.
    pub fn filtered_rows(&self, kind: DatasetKind) -> Option<&Table> {
        self.view(kind).map(|v| &v.filtered)
    }

    /// `(filtered, total)` row counts for `kind`.
    pub fn row_counts(&self, kind: DatasetKind) -> (usize, usize) {
        let total = self.datasets.as_ref().map_or(0, |d| d.get(kind).len());
        let filtered = self.view(kind).map_or(0, |v| v.filtered.len());
        (filtered, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Column, ColumnType, Schema, Value};

    fn datasets(rows: i64) -> Datasets {
        let stats = Table::new(
            Schema::new(vec![
                Column::new("combo", ColumnType::Text),
                Column::new("nb_joueurs", ColumnType::Integer),
                Column::new("matches", ColumnType::Integer),
                Column::new("victoires", ColumnType::Integer),
            ]),
            (0..rows)
                .map(|i| {
                    vec![
                        Value::Text(format!("combo{i}")),
                        Value::Int(2 + i % 2),
                        Value::Int(10 + i),
                        Value::Int(i),
                    ]
                })
                .collect(),
        );
        let empty = |kind: DatasetKind| {
            Table::new(
                Schema::new(
                    kind.columns()
                        .iter()
                        .map(|(name, ty)| Column::new(*name, *ty))
                        .collect(),
                ),
                Vec::new(),
            )
        };
        Datasets {
            stats,
            series: empty(DatasetKind::Series),
            confrontations: empty(DatasetKind::Confrontations),
        }
    }

    #[test]
    fn test_install_builds_views_with_defaults() {
        let mut state = AppState::new(AppConfig::default(), false);
        state.install(datasets(45), None);

        let view = state.view(DatasetKind::Stats).unwrap();
        assert_eq!(view.filtered.len(), 45);
        assert_eq!(view.visible.len(), 20);
        assert_eq!(view.page_count, 3);
        // Default ranking: victoires descending.
        assert_eq!(view.visible.value(0, "combo"), Some(&Value::from("combo44")));
        assert!(state.error_message.is_none());
    }

    #[test]
    fn test_page_beyond_last_is_clamped_and_written_back() {
        let mut state = AppState::new(AppConfig::default(), false);
        state.install(datasets(45), None);
        state.set_page(DatasetKind::Stats, 99);
        assert_eq!(state.view(DatasetKind::Stats).unwrap().page, 3);
        assert_eq!(state.session.page(&keys::page(DatasetKind::Stats)), Some(3));
    }

    #[test]
    fn test_cross_filter_by_player_count() {
        let mut state = AppState::new(AppConfig::default(), false);
        state.install(datasets(10), None);
        state.session.deselect(keys::PLAYERS, "3");
        state.refresh();
        assert_eq!(state.row_counts(DatasetKind::Stats), (5, 10));
    }

    #[test]
    fn test_empty_player_selection_shows_everything() {
        let mut state = AppState::new(AppConfig::default(), false);
        state.install(datasets(10), None);
        state.session.deselect(keys::PLAYERS, "2");
        state.session.deselect(keys::PLAYERS, "3");
        state.refresh();
        assert_eq!(state.row_counts(DatasetKind::Stats), (10, 10));
    }

    #[test]
    fn test_reset_filters_restores_defaults() {
        let mut state = AppState::new(AppConfig::default(), false);
        state.install(datasets(10), None);
        state.session.set(
            keys::COMBO_SEARCH,
            WidgetValue::Text("combo1".to_string()),
        );
        state.refresh();
        assert_eq!(state.row_counts(DatasetKind::Stats).0, 1);
        state.reset_filters();
        assert_eq!(state.row_counts(DatasetKind::Stats).0, 10);
    }

    #[test]
    fn test_chart_uses_selected_ranking() {
        let mut state = AppState::new(AppConfig::default(), false);
        state.install(datasets(30), None);
        let bars = state.chart_data(DatasetKind::Stats);
        assert_eq!(bars.len(), 20);
        assert_eq!(bars[0].label, "combo29");

        state.session.set(
            &keys::sort(DatasetKind::Stats),
            WidgetValue::Choice("taux_victoire".to_string()),
        );
        state.refresh();
        // Ranking column absent from this table: view errors, chart empty.
        assert!(state.chart_data(DatasetKind::Stats).is_empty());
        assert!(state.error_message.is_some());
    }

    #[test]
    fn test_unpaginated_config_shows_all_rows() {
        let config = AppConfig {
            paginate: false,
            ..AppConfig::default()
        };
        let mut state = AppState::new(config, false);
        state.install(datasets(45), None);
        assert_eq!(state.view(DatasetKind::Stats).unwrap().visible.len(), 45);
    }
}

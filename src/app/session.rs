// ComboStats - app/session.rs
//
// Session state store: the current value of every filter widget.
//
// Design:
// - Values live for one application session and are never written to disk.
// - Defaults are derived from freshly loaded tables on first access
//   (full option set for selections, observed min/max for ranges).
// - Reads after a `set` see the new value immediately; the UI mutates the
//   store through explicit setters and then re-runs the pipeline.
// - The store is owned by `AppState` and passed by reference; there is no
//   global widget state.

use crate::core::dataset::{self, DatasetKind, Datasets};
use crate::core::filter::FilterSpec;
use crate::core::view::ViewRequest;
use std::collections::{BTreeSet, HashMap};

/// Session keys of the filter widgets.
pub mod keys {
    use crate::core::dataset::DatasetKind;

    /// Player counts selected (shared across datasets).
    pub const PLAYERS: &str = "shared.nb_joueurs";
    /// Combo text search (shared across datasets).
    pub const COMBO_SEARCH: &str = "shared.combo";
    /// Series type radio: "all", "victoires", or "defaites".
    pub const SERIES_TYPE: &str = "series.type_serie";
    /// Only series still in progress.
    pub const IN_PROGRESS_ONLY: &str = "series.en_cours";
    /// Opponent text search on the head-to-head table.
    pub const OPPONENT_SEARCH: &str = "confrontations.combo_adverse";

    pub fn range(kind: DatasetKind, column: &str) -> String {
        format!("{}.range.{column}", kind.id())
    }

    pub fn sort(kind: DatasetKind) -> String {
        format!("{}.sort", kind.id())
    }

    pub fn page(kind: DatasetKind) -> String {
        format!("{}.page", kind.id())
    }
}

/// Radio value meaning "no restriction".
pub const CHOICE_ALL: &str = "all";

/// The value held by one widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetValue {
    /// Multi-select / checkbox list.
    Selection(BTreeSet<String>),
    /// Two-handle slider, inclusive.
    Range(f64, f64),
    /// Text input.
    Text(String),
    /// Checkbox.
    Flag(bool),
    /// Radio or combo box.
    Choice(String),
    /// 1-based page number.
    Page(usize),
}

/// Per-session widget values, keyed by widget.
#[derive(Debug, Default, Clone)]
pub struct SessionStore {
    values: HashMap<String, WidgetValue>,
    /// Full option set behind each selection widget.
    options: HashMap<String, BTreeSet<String>>,
    /// Observed min/max behind each range widget.
    bounds: HashMap<String, (f64, f64)>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the value for `key`, computing it with `default` on first access.
    pub fn get_or_init<F>(&mut self, key: &str, default: F) -> &WidgetValue
    where
        F: FnOnce() -> WidgetValue,
    {
        self.values.entry(key.to_string()).or_insert_with(default)
    }

    pub fn get(&self, key: &str) -> Option<&WidgetValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: &str, value: WidgetValue) {
        tracing::trace!(key, ?value, "Session value set");
        self.values.insert(key.to_string(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Forget every value, option set, and bound.
    pub fn clear(&mut self) {
        self.values.clear();
        self.options.clear();
        self.bounds.clear();
    }

    pub fn selection(&self, key: &str) -> Option<&BTreeSet<String>> {
        match self.values.get(key) {
            Some(WidgetValue::Selection(s)) => Some(s),
            _ => None,
        }
    }

    pub fn range(&self, key: &str) -> Option<(f64, f64)> {
        match self.values.get(key) {
            Some(WidgetValue::Range(lo, hi)) => Some((*lo, *hi)),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(WidgetValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(WidgetValue::Flag(true)))
    }

    pub fn choice(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(WidgetValue::Choice(s)) => Some(s),
            _ => None,
        }
    }

    pub fn page(&self, key: &str) -> Option<usize> {
        match self.values.get(key) {
            Some(WidgetValue::Page(p)) => Some(*p),
            _ => None,
        }
    }

    /// Add `value` to the selection at `key`, creating the selection if needed.
    pub fn select(&mut self, key: &str, value: &str) {
        match self.values.get_mut(key) {
            Some(WidgetValue::Selection(s)) => {
                s.insert(value.to_string());
            }
            _ => {
                let mut s = BTreeSet::new();
                s.insert(value.to_string());
                self.set(key, WidgetValue::Selection(s));
            }
        }
    }

    /// Remove `value` from the selection at `key`. Absent values are ignored.
    pub fn deselect(&mut self, key: &str, value: &str) {
        if let Some(WidgetValue::Selection(s)) = self.values.get_mut(key) {
            s.remove(value);
        }
    }

    /// The full option set of a selection widget.
    pub fn options(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.options.get(key)
    }

    /// Register the option set of a selection widget and default the
    /// selection to every option.
    pub fn init_selection(&mut self, key: &str, options: BTreeSet<String>) {
        let all = options.clone();
        self.options.insert(key.to_string(), options);
        self.get_or_init(key, || WidgetValue::Selection(all));
    }

    /// The observed bounds of a range widget.
    pub fn bounds(&self, key: &str) -> Option<(f64, f64)> {
        self.bounds.get(key).copied()
    }

    /// Register the observed bounds of a range widget and default the range
    /// to cover them.
    pub fn init_range(&mut self, key: &str, lo: f64, hi: f64) {
        self.bounds.insert(key.to_string(), (lo, hi));
        self.get_or_init(key, || WidgetValue::Range(lo, hi));
    }

    /// Seed every widget from freshly loaded data.
    ///
    /// Only keys with no value yet are touched, so calling this again within
    /// a session keeps the user's choices.
    pub fn init_defaults(&mut self, datasets: &Datasets) {
        let mut players = BTreeSet::new();
        for kind in DatasetKind::all() {
            players.extend(datasets.get(*kind).distinct_keys(dataset::COL_PLAYERS));
        }
        self.init_selection(keys::PLAYERS, players);

        self.get_or_init(keys::COMBO_SEARCH, || WidgetValue::Text(String::new()));
        self.get_or_init(keys::SERIES_TYPE, || {
            WidgetValue::Choice(CHOICE_ALL.to_string())
        });
        self.get_or_init(keys::IN_PROGRESS_ONLY, || WidgetValue::Flag(false));
        self.get_or_init(keys::OPPONENT_SEARCH, || WidgetValue::Text(String::new()));

        for kind in DatasetKind::all() {
            let table = datasets.get(*kind);
            for column in kind.range_columns() {
                if let Some((lo, hi)) = table.numeric_bounds(column) {
                    self.init_range(&keys::range(*kind, column), lo, hi);
                }
            }
            self.get_or_init(&keys::sort(*kind), || {
                WidgetValue::Choice(kind.default_ranking().to_string())
            });
            self.get_or_init(&keys::page(*kind), || WidgetValue::Page(1));
        }
        tracing::debug!(widgets = self.values.len(), "Session defaults initialised");
    }

    /// Membership spec for a selection widget, or `None` when every option
    /// is selected (no effective restriction).
    fn membership_spec(&self, key: &str, column: &str) -> Option<FilterSpec> {
        let selected = self.selection(key)?;
        if let Some(all) = self.options(key) {
            if all.is_subset(selected) {
                return None;
            }
        }
        Some(FilterSpec::membership(column, selected.iter().cloned()))
    }

    /// Range spec for a slider, or `None` when the range still covers every
    /// observed value (no effective restriction, missing values stay visible).
    fn range_spec(&self, key: &str, column: &str) -> Option<FilterSpec> {
        let (lo, hi) = self.range(key)?;
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        if let Some((min, max)) = self.bounds(key) {
            if lo <= min && hi >= max {
                return None;
            }
        }
        Some(FilterSpec::range(column, lo, hi))
    }

    /// The declarative filter list for `kind` under the current widget values.
    ///
    /// Shared cross-filters (`nb_joueurs`, `combo`) come first, then the
    /// dataset's own range and toggle filters.
    pub fn filters_for(&self, kind: DatasetKind) -> Vec<FilterSpec> {
        let mut specs = Vec::new();

        if let Some(spec) = self.membership_spec(keys::PLAYERS, dataset::COL_PLAYERS) {
            specs.push(spec);
        }
        if let Some(query) = self.text(keys::COMBO_SEARCH) {
            specs.push(FilterSpec::contains(dataset::COL_COMBO, query));
        }

        for column in kind.range_columns() {
            if let Some(spec) = self.range_spec(&keys::range(kind, column), column) {
                specs.push(spec);
            }
        }

        match kind {
            DatasetKind::Series => {
                if let Some(choice) = self.choice(keys::SERIES_TYPE) {
                    if choice != CHOICE_ALL {
                        specs.push(FilterSpec::equals(dataset::COL_SERIES_TYPE, choice));
                    }
                }
                if self.flag(keys::IN_PROGRESS_ONLY) {
                    specs.push(FilterSpec::equals(dataset::COL_IN_PROGRESS, true));
                }
            }
            DatasetKind::Confrontations => {
                if let Some(query) = self.text(keys::OPPONENT_SEARCH) {
                    specs.push(FilterSpec::contains(dataset::COL_OPPONENT, query));
                }
            }
            DatasetKind::Stats => {}
        }

        specs
    }

    /// Filters, ranking column, and page for `kind`.
    pub fn view_request(&self, kind: DatasetKind, paginate: bool) -> ViewRequest {
        ViewRequest {
            filters: self.filters_for(kind),
            sort_by: self
                .choice(&keys::sort(kind))
                .map(str::to_string)
                .or_else(|| Some(kind.default_ranking().to_string())),
            page: paginate.then(|| self.page(&keys::page(kind)).unwrap_or(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{apply, Predicate};
    use crate::core::model::{Column, ColumnType, Schema, Table, Value};

    fn datasets() -> Datasets {
        let stats = Table::new(
            Schema::new(vec![
                Column::new("combo", ColumnType::Text),
                Column::new("nb_joueurs", ColumnType::Integer),
                Column::new("matches", ColumnType::Integer),
                Column::new("taux_victoire", ColumnType::Float),
            ]),
            vec![
                vec!["A".into(), Value::Int(2), Value::Int(10), Value::Float(70.0)],
                vec!["B".into(), Value::Int(10), Value::Int(5), Value::Float(20.0)],
                vec!["C".into(), Value::Int(3), Value::Null, Value::Null],
            ],
        );
        Datasets {
            stats,
            ..Default::default()
        }
    }

    #[test]
    fn test_get_or_init_runs_factory_once() {
        let mut store = SessionStore::new();
        let mut calls = 0;
        store.get_or_init("k", || {
            calls += 1;
            WidgetValue::Flag(true)
        });
        store.get_or_init("k", || {
            calls += 1;
            WidgetValue::Flag(false)
        });
        assert_eq!(calls, 1);
        assert!(store.flag("k"));
    }

    #[test]
    fn test_set_is_visible_immediately() {
        let mut store = SessionStore::new();
        store.get_or_init("r", || WidgetValue::Range(0.0, 10.0));
        store.set("r", WidgetValue::Range(2.0, 3.0));
        assert_eq!(store.range("r"), Some((2.0, 3.0)));
        assert_eq!(
            store.get_or_init("r", || WidgetValue::Range(0.0, 10.0)),
            &WidgetValue::Range(2.0, 3.0)
        );
    }

    #[test]
    fn test_select_and_deselect() {
        let mut store = SessionStore::new();
        store.select("p", "2");
        store.select("p", "3");
        store.deselect("p", "2");
        store.deselect("p", "9");
        store.deselect("missing", "1");
        let selected: Vec<_> = store.selection("p").unwrap().iter().cloned().collect();
        assert_eq!(selected, vec!["3"]);
        assert!(!store.contains("missing"));
    }

    #[test]
    fn test_defaults_follow_loaded_data() {
        let mut store = SessionStore::new();
        store.init_defaults(&datasets());

        let players: Vec<_> = store.options(keys::PLAYERS).unwrap().iter().cloned().collect();
        assert_eq!(players.len(), 3);
        assert_eq!(store.selection(keys::PLAYERS).unwrap().len(), 3);
        assert_eq!(
            store.range(&keys::range(DatasetKind::Stats, "matches")),
            Some((5.0, 10.0))
        );
        assert_eq!(
            store.choice(&keys::sort(DatasetKind::Stats)),
            Some("victoires")
        );
        assert_eq!(store.page(&keys::page(DatasetKind::Stats)), Some(1));
        // Empty series table: no observed bounds, no range widget.
        assert!(store
            .range(&keys::range(DatasetKind::Series, "longueur"))
            .is_none());
    }

    #[test]
    fn test_init_defaults_keeps_existing_choices() {
        let mut store = SessionStore::new();
        store.init_defaults(&datasets());
        store.set(keys::COMBO_SEARCH, WidgetValue::Text("a".to_string()));
        store.init_defaults(&datasets());
        assert_eq!(store.text(keys::COMBO_SEARCH), Some("a"));
    }

    #[test]
    fn test_full_selection_adds_no_membership_filter() {
        let mut store = SessionStore::new();
        store.init_defaults(&datasets());
        let specs = store.filters_for(DatasetKind::Stats);
        assert!(specs.iter().all(|s| s.column != "nb_joueurs"));

        store.deselect(keys::PLAYERS, "10");
        let specs = store.filters_for(DatasetKind::Stats);
        let membership = specs.iter().find(|s| s.column == "nb_joueurs").unwrap();
        match &membership.predicate {
            Predicate::Membership(selected) => assert_eq!(selected.len(), 2),
            other => panic!("unexpected predicate {other:?}"),
        }
    }

    fn range_specs(store: &SessionStore, kind: DatasetKind) -> Vec<FilterSpec> {
        store
            .filters_for(kind)
            .into_iter()
            .filter(|s| matches!(s.predicate, Predicate::Range { .. }))
            .collect()
    }

    #[test]
    fn test_untouched_range_adds_no_filter() {
        let mut store = SessionStore::new();
        store.init_defaults(&datasets());
        let key = keys::range(DatasetKind::Stats, "matches");
        assert_eq!(store.bounds(&key), Some((5.0, 10.0)));
        assert!(range_specs(&store, DatasetKind::Stats).is_empty());

        store.set(&key, WidgetValue::Range(6.0, 10.0));
        assert_eq!(
            range_specs(&store, DatasetKind::Stats),
            vec![FilterSpec::range("matches", 6.0, 10.0)]
        );

        // Widened past the observed bounds: no restriction again.
        store.set(&key, WidgetValue::Range(0.0, 99.0));
        assert!(range_specs(&store, DatasetKind::Stats).is_empty());
    }

    #[test]
    fn test_default_ranges_keep_rows_with_missing_values() {
        let mut store = SessionStore::new();
        let datasets = datasets();
        store.init_defaults(&datasets);
        let filtered = apply(&datasets.stats, &store.filters_for(DatasetKind::Stats)).unwrap();
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_series_toggles_become_equality_filters() {
        let mut store = SessionStore::new();
        store.init_defaults(&datasets());
        assert!(store
            .filters_for(DatasetKind::Series)
            .iter()
            .all(|s| !matches!(s.predicate, Predicate::Equals(_))));

        store.set(keys::SERIES_TYPE, WidgetValue::Choice("defaites".to_string()));
        store.set(keys::IN_PROGRESS_ONLY, WidgetValue::Flag(true));
        let specs = store.filters_for(DatasetKind::Series);
        assert!(specs.contains(&FilterSpec::equals("type_serie", "defaites")));
        assert!(specs.contains(&FilterSpec::equals("en_cours", true)));
        // Series toggles never leak into the other datasets.
        assert!(store
            .filters_for(DatasetKind::Stats)
            .iter()
            .all(|s| s.column != "type_serie"));
    }

    #[test]
    fn test_view_request_respects_pagination_switch() {
        let mut store = SessionStore::new();
        store.init_defaults(&datasets());
        store.set(&keys::page(DatasetKind::Stats), WidgetValue::Page(3));
        let paged = store.view_request(DatasetKind::Stats, true);
        assert_eq!(paged.page, Some(3));
        assert_eq!(paged.sort_by.as_deref(), Some("victoires"));
        assert_eq!(store.view_request(DatasetKind::Stats, false).page, None);
    }
}

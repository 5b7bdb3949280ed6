// ComboStats - tests/e2e_pipeline.rs
//
// End-to-end tests for the load -> session -> filter -> sort -> page ->
// export pipeline.
//
// These tests build a real SQLite statistics store in a temporary directory,
// read real secrets.toml files, and run the real queries. No mocks, no stubs.

use combostats::app::session::{keys, WidgetValue};
use combostats::app::state::AppState;
use combostats::core::dataset::{DatasetKind, COL_COMBO, COL_WINS};
use combostats::core::export::export_csv;
use combostats::core::model::Value;
use combostats::platform::config::{load_secrets, AppConfig};
use combostats::platform::db::{load_all, DatabaseTarget, SqliteSource, StatsSource};
use combostats::util::error::ConfigError;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Create `combostats.db` in `dir` with a small, known data set.
fn seed_store(dir: &Path) {
    let conn = Connection::open(dir.join("combostats.db")).unwrap();
    conn.execute_batch(
        "CREATE TABLE participations (combo TEXT, nb_joueurs INTEGER, victoire INTEGER);
         INSERT INTO participations VALUES
            ('Alpha', 2, 1), ('Alpha', 2, 1), ('Alpha', 2, 0),
            ('Alpha', 4, 1),
            ('Beta', 2, 0),
            ('Delta', 3, 1), ('Delta', 3, 0),
            ('Gamma', 4, 1), ('Gamma', 4, 1), ('Gamma', 4, 1), ('Gamma', 4, 1), ('Gamma', 4, 0);

         CREATE TABLE series (combo TEXT, nb_joueurs INTEGER, type_serie TEXT, longueur INTEGER,
                              date_debut TEXT, date_fin TEXT, en_cours INTEGER);
         INSERT INTO series VALUES
            ('Alpha', 2, 'victoires', 3, '2024-01-01', '2024-01-05', 0),
            ('Beta', 2, 'defaites', 2, '2024-01-10', '2024-01-12', 0),
            ('Gamma', 4, 'victoires', 4, '2024-02-01', NULL, 1);

         CREATE TABLE confrontations (combo TEXT, nb_joueurs INTEGER, combo_adverse TEXT,
                                      matches INTEGER, victoires INTEGER);
         INSERT INTO confrontations VALUES
            ('Alpha', 2, 'Beta', 3, 2),
            ('Beta', 2, 'Alpha', 3, 1),
            ('Gamma', 4, 'Alpha', 1, 1);",
    )
    .unwrap();
}

fn write_secrets(dir: &Path, host: &Path) -> std::path::PathBuf {
    let path = dir.join("secrets.toml");
    fs::write(
        &path,
        format!(
            "DB_USERNAME = \"analyst\"\nDB_PASSWORD = \"s3cret\"\nDB_HOST = '{}'\n",
            host.display()
        ),
    )
    .unwrap();
    path
}

fn source_for(dir: &TempDir) -> SqliteSource {
    let secrets = load_secrets(&write_secrets(dir.path(), dir.path())).unwrap();
    SqliteSource::new(DatabaseTarget::from_secrets(&secrets))
}

/// Load everything into a fresh `AppState` with the given page size.
fn loaded_state(dir: &TempDir, page_size: usize) -> AppState {
    let source = source_for(dir);
    let datasets = load_all(&source, |_, _| {}).unwrap();
    let config = AppConfig {
        page_size,
        ..AppConfig::default()
    };
    let mut state = AppState::new(config, false);
    state.install(datasets, None);
    state
}

fn combos(state: &AppState, kind: DatasetKind) -> Vec<String> {
    let view = state.view(kind).unwrap();
    (0..view.visible.len())
        .map(|i| view.visible.value(i, COL_COMBO).unwrap().key())
        .collect()
}

// =============================================================================
// Secrets and loading
// =============================================================================

#[test]
fn e2e_secrets_drive_the_connection() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path());
    let source = source_for(&dir);

    assert!(source.describe().starts_with("analyst@"));
    assert!(!source.describe().contains("s3cret"));

    let stats = source.load(DatasetKind::Stats).unwrap();
    assert_eq!(stats.len(), 5);
}

#[test]
fn e2e_missing_secret_is_fatal_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("secrets.toml");
    fs::write(&path, "DB_USERNAME = \"analyst\"\nDB_HOST = \"/srv\"\n").unwrap();

    match load_secrets(&path) {
        Err(ConfigError::MissingSecret { key, .. }) => assert_eq!(key, "DB_PASSWORD"),
        other => panic!("expected missing secret, got {other:?}"),
    }
}

#[test]
fn e2e_missing_store_fails_load_without_panicking() {
    let dir = TempDir::new().unwrap();
    let source = source_for(&dir);
    let err = load_all(&source, |_, _| {}).unwrap_err();
    assert!(err.to_string().contains("combostats.db"), "{err}");
}

// =============================================================================
// Pipeline
// =============================================================================

#[test]
fn e2e_default_view_is_ranked_by_wins_and_paged() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path());
    let mut state = loaded_state(&dir, 2);

    // Gamma(4) > Alpha/2(2) > Alpha/4(1) = Delta(1) > Beta(0); ties keep load order.
    assert_eq!(combos(&state, DatasetKind::Stats), vec!["Gamma", "Alpha"]);
    assert_eq!(state.view(DatasetKind::Stats).unwrap().page_count, 3);

    state.set_page(DatasetKind::Stats, 2);
    assert_eq!(combos(&state, DatasetKind::Stats), vec!["Alpha", "Delta"]);

    state.set_page(DatasetKind::Stats, 50);
    let view = state.view(DatasetKind::Stats).unwrap();
    assert_eq!(view.page, 3);
    assert_eq!(combos(&state, DatasetKind::Stats), vec!["Beta"]);
}

#[test]
fn e2e_default_view_keeps_rows_with_missing_values() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path());
    let conn = Connection::open(dir.path().join("combostats.db")).unwrap();
    conn.execute_batch(
        "INSERT INTO series VALUES ('Delta', 3, 'defaites', NULL, 'bad-date', NULL, 0);
         INSERT INTO confrontations VALUES ('Beta', 2, 'Gamma', 0, 0);",
    )
    .unwrap();
    drop(conn);

    let state = loaded_state(&dir, 20);
    assert_eq!(state.row_counts(DatasetKind::Stats), (5, 5));
    assert_eq!(state.row_counts(DatasetKind::Series), (4, 4));
    assert_eq!(state.row_counts(DatasetKind::Confrontations), (4, 4));
}

#[test]
fn e2e_player_filter_crosses_every_dataset() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path());
    let mut state = loaded_state(&dir, 20);

    state.session.deselect(keys::PLAYERS, "2");
    state.session.deselect(keys::PLAYERS, "3");
    state.refresh();

    assert_eq!(state.row_counts(DatasetKind::Stats), (2, 5));
    assert_eq!(state.row_counts(DatasetKind::Series), (1, 3));
    assert_eq!(state.row_counts(DatasetKind::Confrontations), (1, 3));
}

#[test]
fn e2e_series_toggles_and_opponent_search() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path());
    let mut state = loaded_state(&dir, 20);

    state
        .session
        .set(keys::IN_PROGRESS_ONLY, WidgetValue::Flag(true));
    state.refresh();
    assert_eq!(combos(&state, DatasetKind::Series), vec!["Gamma"]);

    state
        .session
        .set(keys::IN_PROGRESS_ONLY, WidgetValue::Flag(false));
    state
        .session
        .set(keys::SERIES_TYPE, WidgetValue::Choice("defaites".to_string()));
    state.refresh();
    assert_eq!(combos(&state, DatasetKind::Series), vec!["Beta"]);

    state
        .session
        .set(keys::OPPONENT_SEARCH, WidgetValue::Text("ALP".to_string()));
    state.refresh();
    assert_eq!(state.row_counts(DatasetKind::Confrontations), (2, 3));
}

#[test]
fn e2e_chart_follows_filters() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path());
    let mut state = loaded_state(&dir, 20);

    let bars = state.chart_data(DatasetKind::Stats);
    assert_eq!(bars.len(), 5);
    assert_eq!(bars[0].label, "Gamma");
    assert_eq!(bars[0].value, 4.0);

    state
        .session
        .set(keys::COMBO_SEARCH, WidgetValue::Text("alpha".to_string()));
    state.refresh();
    let bars = state.chart_data(DatasetKind::Stats);
    assert_eq!(bars.len(), 2);
    assert!(bars.iter().all(|b| b.label == "Alpha"));
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn e2e_export_writes_every_filtered_row() {
    let dir = TempDir::new().unwrap();
    seed_store(dir.path());
    let state = loaded_state(&dir, 2);

    let table = state.filtered_rows(DatasetKind::Stats).unwrap();
    assert_eq!(table.value(0, COL_WINS), Some(&Value::Int(4)));

    let out = dir.path().join("stats.csv");
    let rows = export_csv(table, fs::File::create(&out).unwrap(), &out).unwrap();
    // All pages are exported, not only the visible one.
    assert_eq!(rows, 5);

    let content = fs::read_to_string(&out).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("combo,nb_joueurs,matches,victoires,defaites,taux_victoire")
    );
    assert_eq!(lines.next(), Some("Gamma,4,5,4,1,80"));
    assert_eq!(lines.next(), Some("Alpha,2,3,2,1,66.7"));
}

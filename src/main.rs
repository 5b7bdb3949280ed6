// ComboStats - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. secrets.toml loading (fatal if missing or incomplete)
// 4. Headless CSV export, or eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use combostats::app;

pub use combostats::core;
pub use combostats::platform;
pub use combostats::ui;
pub use combostats::util;

use clap::Parser;
use platform::db::{DatabaseTarget, SqliteSource, StatsSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use util::error::ComboStatsError;

/// Exit status for configuration and secrets failures.
const EXIT_CONFIG: i32 = 2;

/// ComboStats - Combo match statistics dashboard.
///
/// Loads per-combo statistics, win/loss series and head-to-head records from
/// the statistics database and presents them as filterable, paginated tables
/// with a ranking chart.
#[derive(Parser, Debug)]
#[command(name = "ComboStats", version, about)]
struct Cli {
    /// Path to secrets.toml (defaults to the platform config directory).
    #[arg(short = 's', long = "secrets")]
    secrets: Option<PathBuf>,

    /// Directory holding config.toml and secrets.toml.
    #[arg(short = 'c', long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Write the statistics table ranked by wins to this CSV file and exit
    /// without opening a window.
    #[arg(short = 'e', long = "export")]
    export: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    // Resolve platform paths: CLI override > platform default
    let platform_paths = match cli.config_dir {
        Some(ref dir) => platform::config::PlatformPaths::at(dir),
        None => platform::config::PlatformPaths::resolve(),
    };

    // Config is read before logging starts so its level can apply; warnings
    // are logged once the subscriber is up.
    let (config, config_warnings) =
        platform::config::load_config(&platform_paths.config_file());

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "ComboStats starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let secrets_path = cli
        .secrets
        .clone()
        .unwrap_or_else(|| platform_paths.secrets_file());
    let secrets = match platform::config::load_secrets(&secrets_path) {
        Ok(s) => s,
        Err(e) => {
            let e = ComboStatsError::from(e);
            tracing::error!(error = %e, "Cannot start without database secrets");
            eprintln!("Error: {e}");
            std::process::exit(EXIT_CONFIG);
        }
    };

    let source = Arc::new(SqliteSource::new(DatabaseTarget::from_secrets(&secrets)));
    tracing::info!(target_db = %source.describe(), "Database target configured");

    if let Some(ref export_path) = cli.export {
        match export_headless(source.as_ref(), export_path) {
            Ok(rows) => {
                println!("Exported {rows} rows to {}", export_path.display());
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "Headless export failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    // Create application state
    let mut state = app::state::AppState::new(config, cli.debug);
    state.warnings = config_warnings;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([900.0, 560.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |_cc| Ok(Box::new(gui::ComboStatsApp::new(state, source)))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch ComboStats GUI: {e}");
        std::process::exit(1);
    }
}

/// Load the statistics table, rank it by wins, and write it as CSV.
fn export_headless(source: &dyn StatsSource, path: &Path) -> util::error::Result<usize> {
    let stats = source.load(core::dataset::DatasetKind::Stats)?;
    let ranked = core::view::sort_descending(&stats, core::dataset::COL_WINS)?;
    let file = std::fs::File::create(path).map_err(|e| util::error::ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let rows = core::export::export_csv(&ranked, std::io::BufWriter::new(file), path)?;
    Ok(rows)
}

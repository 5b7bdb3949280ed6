// ComboStats - gui.rs
//
// Top-level eframe::App implementation.
// Wires together all UI panels and manages the load lifecycle.

use crate::app::load::{LoadManager, LoadProgress};
use crate::app::state::AppState;
use crate::platform::db::StatsSource;
use crate::ui;
use crate::util::constants::MAX_LOAD_MESSAGES_PER_FRAME;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Export file formats offered by the File menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }
}

/// The ComboStats application.
pub struct ComboStatsApp {
    pub state: AppState,
    pub load_manager: LoadManager,
    source: Arc<dyn StatsSource>,
    /// Visuals last pushed to the context: (dark_mode, font_size).
    applied_style: Option<(bool, f32)>,
}

impl ComboStatsApp {
    /// Create the application and start the first load.
    pub fn new(state: AppState, source: Arc<dyn StatsSource>) -> Self {
        let mut app = Self {
            state,
            load_manager: LoadManager::new(),
            source,
            applied_style: None,
        };
        app.start_load();
        app
    }

    fn start_load(&mut self) {
        if self.load_manager.is_active() {
            tracing::debug!("Reload ignored: a load is already running");
            return;
        }
        self.state.load_in_progress = true;
        self.state.status_message = "Loading datasets...".to_string();
        self.load_manager.start_load(Arc::clone(&self.source));
    }

    fn handle_progress(&mut self, msg: LoadProgress) {
        match msg {
            LoadProgress::Started { source } => {
                self.state.status_message = format!("Querying {source}...");
            }
            LoadProgress::DatasetLoaded { kind, rows } => {
                self.state.status_message = format!("Loaded {} ({rows} rows)...", kind.title());
            }
            LoadProgress::Completed { datasets, summary } => {
                let message = format!(
                    "Loaded {} rows in {:.2}s.",
                    summary.total_rows(),
                    summary.duration.as_secs_f64()
                );
                self.state.install(datasets, Some(summary));
                self.state.load_in_progress = false;
                if self.state.error_message.is_none() {
                    self.state.status_message = message;
                }
            }
            LoadProgress::Failed { error } => {
                self.state.load_in_progress = false;
                self.state.status_message = "Load failed.".to_string();
                self.state.error_message = Some(format!("Load failed: {error}"));
            }
        }
    }

    /// Ask for a destination and write the active dataset's filtered rows.
    fn export(&mut self, format: ExportFormat) {
        let kind = self.state.active;
        let Some(table) = self.state.filtered_rows(kind) else {
            self.state.status_message = "Nothing to export.".to_string();
            return;
        };
        let Some(dest) = rfd::FileDialog::new()
            .add_filter(format.label(), &[format.extension()])
            .set_file_name(format!("{}.{}", kind.id(), format.extension()))
            .save_file()
        else {
            return;
        };

        self.state.status_message = match write_export(table, &dest, format) {
            Ok(n) => format!("Exported {n} rows to {}.", format.label()),
            Err(e) => {
                tracing::warn!(error = %e, "Export failed");
                format!("{} export failed: {e}", format.label())
            }
        };
    }
}

fn write_export(
    table: &crate::core::model::Table,
    dest: &Path,
    format: ExportFormat,
) -> crate::util::error::Result<usize> {
    let file = std::fs::File::create(dest).map_err(|e| crate::util::error::ExportError::Io {
        path: dest.to_path_buf(),
        source: e,
    })?;
    let writer = std::io::BufWriter::new(file);
    let rows = match format {
        ExportFormat::Csv => crate::core::export::export_csv(table, writer, dest)?,
        ExportFormat::Json => crate::core::export::export_json(table, writer, dest)?,
    };
    Ok(rows)
}

impl eframe::App for ComboStatsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let style = (self.state.config.dark_mode, self.state.config.font_size);
        if self.applied_style != Some(style) {
            ui::theme::apply(ctx, style.0, style.1);
            self.applied_style = Some(style);
        }

        // Poll for load progress
        let messages = self.load_manager.poll_progress(MAX_LOAD_MESSAGES_PER_FRAME);
        let had_messages = !messages.is_empty();
        for msg in messages {
            self.handle_progress(msg);
        }
        // Repaint while loading so progress updates appear promptly.
        if had_messages {
            ctx.request_repaint();
        } else if self.load_manager.is_active() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // request_reload: set by a panel or the F5 shortcut.
        if ctx.input(|i| i.key_pressed(egui::Key::F5)) {
            self.state.request_reload = true;
        }
        if self.state.request_reload {
            self.state.request_reload = false;
            self.start_load();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let loading = self.load_manager.is_active();
                    if ui
                        .add_enabled(!loading, egui::Button::new("Reload"))
                        .clicked()
                    {
                        self.state.request_reload = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    // Export -- enabled only when the active table has rows
                    let has_rows = self
                        .state
                        .filtered_rows(self.state.active)
                        .is_some_and(|t| !t.is_empty());
                    ui.add_enabled_ui(has_rows, |ui| {
                        ui.menu_button("Export", |ui| {
                            for format in [ExportFormat::Csv, ExportFormat::Json] {
                                if ui.button(format!("Export {}...", format.label())).clicked() {
                                    self.export(format);
                                    ui.close_menu();
                                }
                            }
                        });
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Load Summary").clicked() {
                        self.state.show_summary = true;
                        ui.close_menu();
                    }
                    ui.checkbox(&mut self.state.show_chart, "Ranking Chart");
                    let mut dark = self.state.config.dark_mode;
                    if ui.checkbox(&mut dark, "Dark Mode").changed() {
                        self.state.config.dark_mode = dark;
                    }
                    ui.separator();
                    if ui.button("About").clicked() {
                        self.state.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.state.load_in_progress {
                    ui.spinner();
                }
                ui.label(&self.state.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (filtered, total) = self.state.row_counts(self.state.active);
                    if total > 0 {
                        ui.label(format!("{filtered}/{total} rows"));
                    }
                    if self.state.debug_mode {
                        ui.label(egui::RichText::new("DEBUG").small().weak());
                    }
                });
            });
        });

        // Error banner
        if let Some(error) = self.state.error_message.clone() {
            egui::TopBottomPanel::top("error_banner").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(ui::theme::ERROR_TEXT, error);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("Dismiss").clicked() {
                            self.state.error_message = None;
                        }
                    });
                });
            });
        }

        // Left sidebar
        egui::SidePanel::left("sidebar")
            .default_width(ui::theme::SIDEBAR_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("sidebar_filters")
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui::panels::filters::render(ui, &mut self.state);
                    });
            });

        // Central panel (tabs, chart, table)
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::table::render_tabs(ui, &mut self.state);
            ui.separator();
            if self.state.show_chart && self.state.view(self.state.active).is_some() {
                ui::panels::chart::render(ui, &self.state);
                ui.separator();
            }
            ui::panels::table::render(ui, &mut self.state);
        });

        // Dialogs (modal-ish)
        ui::panels::summary::render(ctx, &mut self.state);
        ui::panels::about::render(ctx, &mut self.state);
    }
}

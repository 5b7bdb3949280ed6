// ComboStats - app/load.rs
//
// Load lifecycle management. Runs the dataset queries on a background
// thread so the window keeps repainting while the database answers, and
// sends progress messages to the UI thread via an mpsc channel.
//
// Architecture:
//   - `LoadManager` lives on the UI thread; `run_load` runs on a background thread.
//   - Starting a new load drops the previous receiver. A superseded thread
//     notices the closed channel on its next send and exits.
//   - There is no cancellation or retry: a slow query only delays the
//     next render, a failed query fails the whole load cycle.

use crate::core::dataset::{DatasetKind, Datasets};
use crate::platform::db::{self, StatsSource};
use chrono::{DateTime, Local};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

/// Outcome of a completed load, shown in the load summary window.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    /// Target description (never includes the password).
    pub source: String,
    /// Rows returned per dataset, in tab order.
    pub rows: Vec<(DatasetKind, usize)>,
    pub duration: Duration,
    pub loaded_at: DateTime<Local>,
}

impl LoadSummary {
    pub fn total_rows(&self) -> usize {
        self.rows.iter().map(|(_, n)| n).sum()
    }
}

/// Messages sent from the load thread to the UI.
#[derive(Debug)]
pub enum LoadProgress {
    /// Load started against the described source.
    Started { source: String },

    /// One dataset finished loading.
    DatasetLoaded { kind: DatasetKind, rows: usize },

    /// All datasets loaded.
    Completed {
        datasets: Datasets,
        summary: LoadSummary,
    },

    /// The load failed; nothing was replaced.
    Failed { error: String },
}

/// Manages a load operation on a background thread.
pub struct LoadManager {
    progress_rx: Option<mpsc::Receiver<LoadProgress>>,
}

impl LoadManager {
    pub fn new() -> Self {
        Self { progress_rx: None }
    }

    /// Start loading every dataset from `source`.
    ///
    /// Spawns a background thread immediately; progress is sent over the channel.
    pub fn start_load(&mut self, source: Arc<dyn StatsSource>) {
        let (tx, rx) = mpsc::channel();
        self.progress_rx = Some(rx);

        std::thread::spawn(move || {
            run_load(source.as_ref(), tx);
        });

        tracing::info!("Load started");
    }

    /// True while a load has been started and has not yet reported an outcome.
    pub fn is_active(&self) -> bool {
        self.progress_rx.is_some()
    }

    /// Poll for progress messages without blocking. Returns at most `max`
    /// pending messages.
    pub fn poll_progress(&mut self, max: usize) -> Vec<LoadProgress> {
        let mut messages = Vec::new();
        let mut finished = false;
        if let Some(ref rx) = self.progress_rx {
            while messages.len() < max {
                match rx.try_recv() {
                    Ok(msg) => {
                        if matches!(
                            msg,
                            LoadProgress::Completed { .. } | LoadProgress::Failed { .. }
                        ) {
                            finished = true;
                        }
                        messages.push(msg);
                    }
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => {
                        if !finished {
                            messages.push(LoadProgress::Failed {
                                error: "Load thread exited unexpectedly".to_string(),
                            });
                        }
                        finished = true;
                        break;
                    }
                }
            }
        }
        if finished {
            self.progress_rx = None;
        }
        messages
    }
}

impl Default for LoadManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Load every dataset and report over `tx`.
fn run_load(source: &dyn StatsSource, tx: mpsc::Sender<LoadProgress>) {
    let description = source.describe();
    if tx
        .send(LoadProgress::Started {
            source: description.clone(),
        })
        .is_err()
    {
        return;
    }

    let start = Instant::now();
    let mut rows = Vec::new();
    let result = db::load_all(source, |kind, count| {
        rows.push((kind, count));
        // Non-fatal: the UI may have started a newer load.
        let _ = tx.send(LoadProgress::DatasetLoaded { kind, rows: count });
    });

    let msg = match result {
        Ok(datasets) => {
            let summary = LoadSummary {
                source: description,
                rows,
                duration: start.elapsed(),
                loaded_at: Local::now(),
            };
            tracing::info!(
                rows = summary.total_rows(),
                ms = summary.duration.as_millis() as u64,
                "Load complete"
            );
            LoadProgress::Completed { datasets, summary }
        }
        Err(e) => {
            tracing::error!(error = %e, "Load failed");
            LoadProgress::Failed {
                error: e.to_string(),
            }
        }
    };
    let _ = tx.send(msg);
}

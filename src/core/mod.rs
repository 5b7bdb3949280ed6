// ComboStats - core/mod.rs
//
// Core business logic layer.
// Dependencies: util and data crates (chrono, csv, serde) only.
// Must NOT depend on: ui, platform, app, or any database crate.

pub mod chart;
pub mod dataset;
pub mod export;
pub mod filter;
pub mod model;
pub mod view;

// ComboStats - platform/mod.rs
//
// Platform abstraction layer: configuration files, platform directories,
// and the database loader.
// Dependencies: util, core (table model and dataset catalogue).
// Must NOT depend on: app, ui.

pub mod config;
pub mod db;

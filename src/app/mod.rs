// ComboStats - app/mod.rs
//
// Application layer: load orchestration, session widget state, view state.
// Dependencies: core layer, platform::db through the `StatsSource` trait.
// Must NOT depend on: ui.

pub mod load;
pub mod session;
pub mod state;

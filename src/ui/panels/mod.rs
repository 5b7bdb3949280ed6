// ComboStats - ui/panels/mod.rs

pub mod about;
pub mod chart;
pub mod filters;
pub mod summary;
pub mod table;

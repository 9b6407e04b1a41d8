pub mod catalog;
pub mod config;
pub mod detail;
pub mod overlay;
pub mod region;
pub mod simulation;
pub mod store;

// Re-export transit from the transit crate
pub use otobus_transit as transit;

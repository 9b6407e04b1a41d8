//! On-device city coordinate storage.

pub mod sqlite;

pub use sqlite::SqliteCityStore;

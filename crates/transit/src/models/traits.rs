//! Core traits for city data.
//!
//! Implementations can be in-memory or database-backed.

use crate::identifiers::CityName;
use crate::models::city::City;
use crate::models::types::*;

/// Key-value table mapping a city name to its coordinate
pub trait CityStore: Send + Sync {
    /// Resolve a city by name, `TransitError::CityNotFound` if it is unknown
    fn lookup(&self, name: &CityName) -> Result<Coordinate>;

    /// Insert `defaults` only if the table is currently empty.
    ///
    /// Returns the number of rows inserted, so a second call returns 0.
    fn ensure_seeded(&self, defaults: &[City]) -> Result<usize>;

    /// Every stored city, in insertion order
    fn all_cities(&self) -> Result<Vec<City>>;
}

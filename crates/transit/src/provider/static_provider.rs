//! In-memory city store.
//!
//! Backs tests and platforms without a database. Cheap to share behind an
//! `Arc`; all access goes through one `RwLock`.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::identifiers::CityName;
use crate::models::{city::City, traits::CityStore, types::*};

#[derive(Default)]
struct CityTable {
    // Insertion order, for pickers
    cities: Vec<City>,
    // Lookup map into `cities`
    index: HashMap<CityName, usize>,
}

/// In-memory [`CityStore`] keeping cities in insertion order
#[derive(Default)]
pub struct InMemoryCityStore {
    table: RwLock<CityTable>,
}

impl InMemoryCityStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing rows; later duplicates are ignored
    pub fn from_cities(cities: impl IntoIterator<Item = City>) -> Self {
        let mut table = CityTable::default();
        for city in cities {
            insert(&mut table, city);
        }

        Self {
            table: RwLock::new(table),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CityTable>> {
        self.table
            .read()
            .map_err(|_| TransitError::Storage("city table lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CityTable>> {
        self.table
            .write()
            .map_err(|_| TransitError::Storage("city table lock poisoned".into()))
    }
}

fn insert(table: &mut CityTable, city: City) -> bool {
    if table.index.contains_key(&city.name) {
        return false;
    }

    table.index.insert(city.name.clone(), table.cities.len());
    table.cities.push(city);
    true
}

impl CityStore for InMemoryCityStore {
    fn lookup(&self, name: &CityName) -> Result<Coordinate> {
        let table = self.read()?;
        table
            .index
            .get(name)
            .map(|&i| table.cities[i].location)
            .ok_or_else(|| TransitError::CityNotFound(name.clone()))
    }

    fn ensure_seeded(&self, defaults: &[City]) -> Result<usize> {
        let mut table = self.write()?;
        if !table.cities.is_empty() {
            return Ok(0);
        }

        Ok(defaults
            .iter()
            .filter(|city| insert(&mut table, (*city).clone()))
            .count())
    }

    fn all_cities(&self) -> Result<Vec<City>> {
        Ok(self.read()?.cities.clone())
    }
}

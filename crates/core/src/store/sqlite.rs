//! SQLite-backed [`CityStore`].
//!
//! One `cities` table keyed by name. The connection sits behind a mutex since
//! `rusqlite::Connection` is `Send` but not `Sync`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use otobus_transit::{City, CityName, CityStore, Coordinate, Result, TransitError};
use rusqlite::{Connection, OptionalExtension, params};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cities (
    name      TEXT NOT NULL UNIQUE,
    latitude  REAL NOT NULL,
    longitude REAL NOT NULL
);";

pub struct SqliteCityStore {
    connection: Mutex<Connection>,
}

fn storage_error(error: rusqlite::Error) -> TransitError {
    TransitError::Storage(error.to_string())
}

impl SqliteCityStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening city store");
        Self::from_connection(Connection::open(path).map_err(storage_error)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory().map_err(storage_error)?)
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        connection.execute_batch(SCHEMA).map_err(storage_error)?;

        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| TransitError::Storage("city store connection poisoned".into()))
    }
}

impl CityStore for SqliteCityStore {
    fn lookup(&self, name: &CityName) -> Result<Coordinate> {
        let connection = self.connection()?;

        connection
            .query_row(
                "SELECT latitude, longitude FROM cities WHERE name = ?1",
                params![name.as_str()],
                |row| Ok(Coordinate::new(row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(storage_error)?
            .ok_or_else(|| TransitError::CityNotFound(name.clone()))
    }

    fn ensure_seeded(&self, defaults: &[City]) -> Result<usize> {
        let mut connection = self.connection()?;
        let transaction = connection.transaction().map_err(storage_error)?;

        let existing: i64 = transaction
            .query_row("SELECT COUNT(*) FROM cities", [], |row| row.get(0))
            .map_err(storage_error)?;
        if existing > 0 {
            return Ok(0);
        }

        let mut inserted = 0;
        {
            let mut insert = transaction
                .prepare(
                    "INSERT OR IGNORE INTO cities (name, latitude, longitude) VALUES (?1, ?2, ?3)",
                )
                .map_err(storage_error)?;

            for city in defaults {
                inserted += insert
                    .execute(params![
                        city.name.as_str(),
                        city.location.latitude,
                        city.location.longitude
                    ])
                    .map_err(storage_error)?;
            }
        }

        transaction.commit().map_err(storage_error)?;
        tracing::info!(inserted, "seeded city store");

        Ok(inserted)
    }

    fn all_cities(&self) -> Result<Vec<City>> {
        let connection = self.connection()?;
        let mut query = connection
            .prepare("SELECT name, latitude, longitude FROM cities ORDER BY rowid")
            .map_err(storage_error)?;

        let rows = query
            .query_map([], |row| {
                let name: String = row.get(0)?;
                Ok(City::new(name, Coordinate::new(row.get(1)?, row.get(2)?)))
            })
            .map_err(storage_error)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage_error)
    }
}

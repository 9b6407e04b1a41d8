use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use otobus_core::catalog::TripQuery;
use otobus_core::config::{ConfigError, TrackerConfig};
use otobus_core::detail::{BusDetailSession, TrackingContext};
use otobus_core::simulation::TokioScheduler;
use otobus_core::store::SqliteCityStore;
use otobus_core::transit::{
    CityStore, GreatCircleRouteProvider, RouteProvider, TransitError, TripIdentifier,
    default_cities,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::runtime::Runtime;

use crate::detail::{
    BusLocationListener, DetailSession, ForeignRouteProvider, ListenerBridge, RouteSource,
};
use crate::records::{CityRecord, TripRecord};

const CONFIG_FILE: &str = "otobus.json";

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum AppError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Storage(String),

    #[error("invalid travel date: {0}")]
    InvalidDate(String),

    #[error("unknown trip: {0}")]
    UnknownTrip(String),

    #[error("{0}")]
    Runtime(String),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        AppError::Config(error.to_string())
    }
}

impl From<TransitError> for AppError {
    fn from(error: TransitError) -> Self {
        AppError::Storage(error.to_string())
    }
}

/// Read `otobus.json` from `base`, falling back to defaults when absent
fn load_config(base: &Path) -> Result<TrackerConfig, AppError> {
    let path = base.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(TrackerConfig::default());
    }

    let json = std::fs::read_to_string(&path)
        .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "loaded tracker config");
    Ok(TrackerConfig::from_json(&json)?)
}

fn parse_date(date: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| AppError::InvalidDate(date.into()))
}

#[derive(uniffi::Object)]
pub struct AppState {
    base_path: PathBuf,
    config: TrackerConfig,
    cities: Arc<SqliteCityStore>,
    runtime: Runtime,
}

#[uniffi::export]
impl AppState {
    /// Open (and on first launch, seed) the city store under `base_path`
    #[uniffi::constructor]
    pub fn new(base_path: String) -> Result<Self, AppError> {
        let base_path = PathBuf::from(base_path);
        let config = load_config(&base_path)?;

        let cities = SqliteCityStore::open(base_path.join(&config.database_file))?;
        cities.ensure_seeded(&default_cities())?;

        let runtime = Runtime::new().map_err(|e| AppError::Runtime(e.to_string()))?;

        Ok(Self {
            base_path,
            config,
            cities: Arc::new(cities),
            runtime,
        })
    }

    pub fn base_path(&self) -> String {
        self.base_path.display().to_string()
    }

    /// Cities for the departure and destination pickers
    pub fn cities(&self) -> Result<Vec<CityRecord>, AppError> {
        Ok(self
            .cities
            .all_cities()?
            .into_iter()
            .map(CityRecord::from)
            .collect())
    }

    /// Trips for the list screen. `date` is `YYYY-MM-DD`.
    pub fn search_trips(
        &self,
        from: String,
        to: String,
        date: String,
    ) -> Result<Vec<TripRecord>, AppError> {
        let query = TripQuery::new(from, to, parse_date(&date)?);
        Ok(query.search().into_iter().map(TripRecord::from).collect())
    }

    /// Open the detail screen for one trip and start loading its route.
    ///
    /// Returns immediately; progress arrives through `listener`. Without a
    /// `route_source` routes follow the great circle between the cities.
    pub fn open_detail(
        &self,
        trip_id: String,
        from: String,
        to: String,
        date: String,
        listener: Arc<dyn BusLocationListener>,
        route_source: Option<Arc<dyn RouteSource>>,
    ) -> Result<Arc<DetailSession>, AppError> {
        let query = TripQuery::new(from, to, parse_date(&date)?);
        let trip = query
            .find(&TripIdentifier::new(&trip_id))
            .ok_or(AppError::UnknownTrip(trip_id))?;

        let routes: Arc<dyn RouteProvider> = match route_source {
            Some(source) => Arc::new(ForeignRouteProvider(source)),
            None => Arc::new(GreatCircleRouteProvider::new(self.config.max_leg_length_m)),
        };
        let context = TrackingContext {
            cities: self.cities.clone(),
            routes,
            scheduler: Arc::new(TokioScheduler::new(self.runtime.handle().clone())),
            config: self.config.clone(),
        };

        let session = Arc::new(BusDetailSession::new(
            trip,
            query.from,
            query.to,
            context,
            Some(Arc::new(ListenerBridge(listener))),
        ));

        let loading = Arc::clone(&session);
        let loader = self.runtime.spawn(async move {
            if let Err(error) = loading.load(StdRng::from_os_rng()).await {
                tracing::warn!(%error, "detail session degraded");
            }
        });

        Ok(Arc::new(DetailSession::new(session, loader)))
    }
}

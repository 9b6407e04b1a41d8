//! Plain records crossing the FFI boundary.

use otobus_core::catalog::ScheduledTrip;
use otobus_core::detail::{DetailSnapshot, DetailStatus};
use otobus_core::region::MapRegion;
use otobus_core::transit::{City, Coordinate, RouteLeg, TravelMode};

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Clone, Copy, Debug, PartialEq, uniffi::Record)]
pub struct CoordinateRecord {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinate> for CoordinateRecord {
    fn from(c: Coordinate) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

impl From<CoordinateRecord> for Coordinate {
    fn from(c: CoordinateRecord) -> Self {
        Coordinate::new(c.latitude, c.longitude)
    }
}

#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct CityRecord {
    pub name: String,
    pub coordinate: CoordinateRecord,
}

impl From<City> for CityRecord {
    fn from(city: City) -> Self {
        Self {
            name: city.name.to_string(),
            coordinate: city.location.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct TripRecord {
    pub id: String,
    pub operator: String,
    /// Local date-time, `YYYY-MM-DDTHH:MM`
    pub departs_at: String,
    pub arrives_at: String,
    pub duration_minutes: i64,
}

impl From<ScheduledTrip> for TripRecord {
    fn from(scheduled: ScheduledTrip) -> Self {
        Self {
            id: scheduled.trip.id.to_string(),
            operator: scheduled.trip.operator.to_string(),
            departs_at: scheduled.departs_at.format(DATE_TIME_FORMAT).to_string(),
            arrives_at: scheduled.arrives_at.format(DATE_TIME_FORMAT).to_string(),
            duration_minutes: scheduled.trip.duration().num_minutes(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, uniffi::Record)]
pub struct RegionRecord {
    pub center: CoordinateRecord,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl From<MapRegion> for RegionRecord {
    fn from(region: MapRegion) -> Self {
        Self {
            center: region.center.into(),
            latitude_delta: region.latitude_delta,
            longitude_delta: region.longitude_delta,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, uniffi::Record)]
pub struct RouteLegRecord {
    pub distance_m: f64,
    pub point: CoordinateRecord,
}

impl From<RouteLegRecord> for RouteLeg {
    fn from(leg: RouteLegRecord) -> Self {
        RouteLeg::new(leg.distance_m, leg.point.into())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum TravelModeRecord {
    Automobile,
    Walking,
}

impl From<TravelMode> for TravelModeRecord {
    fn from(mode: TravelMode) -> Self {
        match mode {
            TravelMode::Automobile => Self::Automobile,
            TravelMode::Walking => Self::Walking,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum DetailStatusRecord {
    Loading,
    CitiesUnavailable,
    RouteUnavailable,
    Tracking,
    Closed,
}

impl From<DetailStatus> for DetailStatusRecord {
    fn from(status: DetailStatus) -> Self {
        match status {
            DetailStatus::Loading => Self::Loading,
            DetailStatus::CitiesUnavailable => Self::CitiesUnavailable,
            DetailStatus::RouteUnavailable => Self::RouteUnavailable,
            DetailStatus::Tracking => Self::Tracking,
            DetailStatus::Closed => Self::Closed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct DetailSnapshotRecord {
    pub status: DetailStatusRecord,
    pub from: Option<CoordinateRecord>,
    pub to: Option<CoordinateRecord>,
    pub bus_location: Option<CoordinateRecord>,
    pub region: RegionRecord,
    pub route_distance_m: Option<f64>,
}

impl From<DetailSnapshot> for DetailSnapshotRecord {
    fn from(snapshot: DetailSnapshot) -> Self {
        Self {
            status: snapshot.status.into(),
            from: snapshot.from.map(Into::into),
            to: snapshot.to.map(Into::into),
            bus_location: snapshot.bus_location.map(Into::into),
            region: snapshot.region.into(),
            route_distance_m: snapshot.route.as_ref().map(|route| route.total_distance()),
        }
    }
}

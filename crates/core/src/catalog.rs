//! Mock intercity trips shown in the trip list.
//!
//! There is no operator feed; every city pair gets the same four departures.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use otobus_transit::{CityName, TripIdentifier};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusTrip {
    pub id: TripIdentifier,
    pub operator: &'static str,
    pub departure: NaiveTime,
    pub arrival: NaiveTime,
}

impl BusTrip {
    /// Time on the road. Arrivals earlier than the departure are next-day.
    pub fn duration(&self) -> TimeDelta {
        let delta = self.arrival - self.departure;
        if delta < TimeDelta::zero() {
            delta + TimeDelta::days(1)
        } else {
            delta
        }
    }

    /// Bind the trip to a travel date
    pub fn on(&self, date: NaiveDate) -> ScheduledTrip {
        let departs_at = date.and_time(self.departure);
        ScheduledTrip {
            trip: self.clone(),
            departs_at,
            arrives_at: departs_at + self.duration(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledTrip {
    pub trip: BusTrip,
    pub departs_at: NaiveDateTime,
    pub arrives_at: NaiveDateTime,
}

fn trip(id: &str, operator: &'static str, departure: (u32, u32), arrival: (u32, u32)) -> BusTrip {
    BusTrip {
        id: TripIdentifier::new(id),
        operator,
        departure: NaiveTime::from_hms_opt(departure.0, departure.1, 0).unwrap_or_default(),
        arrival: NaiveTime::from_hms_opt(arrival.0, arrival.1, 0).unwrap_or_default(),
    }
}

/// Every trip the app offers, in listing order
pub fn mock_trips() -> Vec<BusTrip> {
    vec![
        trip("metro-turizm-1200", "Metro Turizm", (12, 0), (16, 0)),
        trip("pamukkale-1330", "Pamukkale", (13, 30), (18, 0)),
        trip("kamil-koc-1400", "Kamil Koç", (14, 0), (19, 0)),
        trip("luks-artvin-2200", "Lüks Artvin", (22, 0), (9, 0)),
    ]
}

/// A search from the home screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripQuery {
    pub from: CityName,
    pub to: CityName,
    pub date: NaiveDate,
}

impl TripQuery {
    pub fn new(from: impl Into<CityName>, to: impl Into<CityName>, date: NaiveDate) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            date,
        }
    }

    pub fn search(&self) -> Vec<ScheduledTrip> {
        tracing::debug!(from = %self.from, to = %self.to, date = %self.date, "searching trips");
        mock_trips().iter().map(|trip| trip.on(self.date)).collect()
    }

    /// Find one scheduled trip of this search by id
    pub fn find(&self, id: &TripIdentifier) -> Option<ScheduledTrip> {
        mock_trips()
            .into_iter()
            .find(|trip| &trip.id == id)
            .map(|trip| trip.on(self.date))
    }
}

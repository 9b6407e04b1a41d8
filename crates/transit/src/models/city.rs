//! Cities the app can route between.

use crate::identifiers::CityName;
use crate::models::types::Coordinate;

/// The fixed table every store is seeded with on first launch
pub const DEFAULT_CITIES: [(&str, Coordinate); 8] = [
    ("İstanbul", Coordinate::new(41.04124295119551, 28.892961713110324)),
    ("Ankara", Coordinate::new(39.91922282467059, 32.8124133672408)),
    ("İzmir", Coordinate::new(38.43235381105256, 27.213664125186995)),
    ("Antalya", Coordinate::new(36.92191963957377, 30.66493170977289)),
    ("Bursa", Coordinate::new(40.26587425839043, 29.05533494061983)),
    ("Adana", Coordinate::new(36.997157966017475, 35.264156709776465)),
    ("Samsun", Coordinate::new(41.28736240653642, 36.28946739649466)),
    ("Erzurum", Coordinate::new(39.96160580962217, 41.22031049457884)),
];

#[derive(Clone, Debug, PartialEq)]
pub struct City {
    pub name: CityName,
    pub location: Coordinate,
}

impl City {
    pub fn new(name: impl Into<CityName>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// [`DEFAULT_CITIES`] as owned rows, in picker order
pub fn default_cities() -> Vec<City> {
    DEFAULT_CITIES
        .iter()
        .map(|(name, location)| City::new(*name, *location))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_cities_are_unique() {
        let cities = default_cities();
        let names: HashSet<_> = cities.iter().map(|c| c.name.clone()).collect();

        assert_eq!(cities.len(), 8);
        assert_eq!(names.len(), 8);
        assert_eq!(cities[0].name.as_str(), "İstanbul");
        assert_eq!(cities[7].name.as_str(), "Erzurum");
    }
}

use geo::Rect;
use otobus_transit::Coordinate;

/// The part of the map the detail view shows.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MapRegion {
    pub center: Coordinate,
    /// Degrees of latitude visible, top to bottom
    pub latitude_delta: f64,
    /// Degrees of longitude visible, left to right
    pub longitude_delta: f64,
}

impl MapRegion {
    // Middle of Anatolia, wide enough to show every seeded city
    pub const TURKEY: MapRegion = MapRegion {
        center: Coordinate::new(40.0, 30.0),
        latitude_delta: 5.0,
        longitude_delta: 5.0,
    };

    /// Region exactly covering `rect` (x is longitude, y is latitude)
    pub fn from_rect(rect: Rect) -> Self {
        let center = rect.center();
        Self {
            center: Coordinate::new(center.y, center.x),
            latitude_delta: rect.height(),
            longitude_delta: rect.width(),
        }
    }

    /// Same span, moved to `center`
    pub fn recentered(self, center: Coordinate) -> Self {
        Self { center, ..self }
    }
}

impl Default for MapRegion {
    fn default() -> Self {
        Self::TURKEY
    }
}

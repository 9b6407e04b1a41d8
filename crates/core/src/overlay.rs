//! GeoJSON for the route line drawn under the bus marker.

use geojson::{Feature, Geometry, JsonObject};
use otobus_transit::Route;

pub fn route_feature(route: &Route) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("total_distance_m".into(), route.total_distance().into());
    properties.insert("leg_count".into(), route.legs().len().into());

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(route.path()))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn route_geojson(route: &Route) -> Result<String, serde_json::Error> {
    serde_json::to_string(&route_feature(route))
}

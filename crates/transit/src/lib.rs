//! # otobus-transit
//!
//! Data model and collaborator traits for intercity bus tracking.
//!
//! ## Features
//!
//! - **Coordinates and cities**: the fixed city table the app is seeded with
//! - **Routes**: multi-leg driving routes with total distance and bounds
//! - **Pluggable collaborators**: implement [`CityStore`] and [`RouteProvider`]
//!   for your platform, or use the in-memory and great-circle versions
//!
//! ## Example
//!
//! ```
//! use otobus_transit::prelude::*;
//!
//! let store = InMemoryCityStore::new();
//! store.ensure_seeded(&default_cities()).unwrap();
//!
//! let istanbul = store.lookup(&CityName::new("İstanbul")).unwrap();
//! let ankara = store.lookup(&CityName::new("Ankara")).unwrap();
//!
//! let provider = GreatCircleRouteProvider::default();
//! let route = futures_executor::block_on(
//!     provider.compute_route(istanbul, ankara, TravelMode::Automobile),
//! )
//! .unwrap();
//!
//! assert!(route.total_distance() > 300_000.0); // ~350km as the crow flies
//! assert_eq!(route.legs().last().map(|leg| leg.point), Some(ankara));
//! ```

pub mod identifiers;
pub mod models;
pub mod network;
pub mod provider;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{city::*, route::*, traits::*, types::*};
    pub use crate::network::traits::*;
    pub use crate::provider::{GreatCircleRouteProvider, InMemoryCityStore};
}

pub use prelude::*;

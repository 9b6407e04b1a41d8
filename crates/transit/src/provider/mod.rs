//! City stores and route providers.

pub mod great_circle;
pub mod static_provider;

pub use great_circle::GreatCircleRouteProvider;
pub use static_provider::InMemoryCityStore;

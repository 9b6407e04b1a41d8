//! Network and IO abstractions.

pub mod traits;

pub use traits::{RouteFuture, RouteProvider};

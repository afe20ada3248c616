pub mod map;
pub mod routes;

pub use map::MapService;
pub use routes::{GoogleRoutesClient, RoutingProvider};

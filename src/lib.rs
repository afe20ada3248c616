pub mod config;
pub mod error;
pub mod handlers;
pub mod libraries;
pub mod models;
pub mod services;

pub use config::{Config, FailurePolicy};
pub use error::{MapError, PolylineError, RoutingError};
pub use services::{GoogleRoutesClient, MapService, RoutingProvider};

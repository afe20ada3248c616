pub mod driver;
pub mod location;
pub mod requests;

// Re-export commonly used types
pub use driver::{Driver, MarkerData, TripEstimate};
pub use location::{Coordinate, Region};
pub use requests::{
    DriverTimesRequest, DriverTimesResponse, ErrorResponse, MarkersRequest, RegionRequest,
    RouteRequest, RouteResponse,
};

pub mod fare;
pub mod markers;
pub mod polyline;
pub mod region;

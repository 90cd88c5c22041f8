//! roomsync-http: availability endpoint IO boundary.
//! Builds the endpoint URL, performs the GET and classifies the response.
//! No reconciliation logic here.

pub mod endpoint;
pub mod fetcher;

pub use endpoint::{AvailabilityEndpoint, DEFAULT_PATH, EndpointError};
pub use fetcher::{AvailabilityFetcher, HttpFetcher, classify_response};

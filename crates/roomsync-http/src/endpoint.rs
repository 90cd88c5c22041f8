//! Availability endpoint URL.

use thiserror::Error;
use url::Url;

/// Path the booking site serves the availability snapshot on.
pub const DEFAULT_PATH: &str = "/api/rooms/available";

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid endpoint url {url:?}: {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported endpoint scheme {0:?} (expected http or https)")]
    Scheme(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityEndpoint {
    url: Url,
}

impl AvailabilityEndpoint {
    /// Parse `url`; a bare origin (no path) gets [`DEFAULT_PATH`].
    pub fn parse(url: &str) -> Result<Self, EndpointError> {
        let mut parsed = Url::parse(url).map_err(|source| EndpointError::Parse {
            url: url.to_string(),
            source,
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(EndpointError::Scheme(other.to_string())),
        }
        if parsed.path() == "/" {
            parsed.set_path(DEFAULT_PATH);
        }
        Ok(Self { url: parsed })
    }

    /// Restrict the snapshot to one location (`?location=`).
    #[must_use]
    pub fn with_location(mut self, location: &str) -> Self {
        if !location.is_empty() {
            self.url.query_pairs_mut().append_pair("location", location);
        }
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl std::fmt::Display for AvailabilityEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_origin_gets_default_path() {
        let ep = AvailabilityEndpoint::parse("http://127.0.0.1:5000").expect("valid");
        assert_eq!(ep.to_string(), "http://127.0.0.1:5000/api/rooms/available");
    }

    #[test]
    fn explicit_path_is_kept() {
        let ep = AvailabilityEndpoint::parse("https://hotel.example/v2/availability").expect("valid");
        assert_eq!(ep.url().path(), "/v2/availability");
    }

    #[test]
    fn location_is_query_encoded() {
        let ep = AvailabilityEndpoint::parse("http://localhost:5000/api/rooms/available")
            .expect("valid")
            .with_location("New Delhi");
        assert_eq!(
            ep.to_string(),
            "http://localhost:5000/api/rooms/available?location=New+Delhi"
        );
    }

    #[test]
    fn empty_location_adds_nothing() {
        let ep = AvailabilityEndpoint::parse("http://localhost:5000")
            .expect("valid")
            .with_location("");
        assert!(ep.url().query().is_none());
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(matches!(
            AvailabilityEndpoint::parse("not a url"),
            Err(EndpointError::Parse { .. })
        ));
        assert!(matches!(
            AvailabilityEndpoint::parse("ftp://hotel.example/rooms"),
            Err(EndpointError::Scheme(_))
        ));
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PollError;

// ─── Availability ─────────────────────────────────────────────────

/// Room state as reported by the availability endpoint.
///
/// The site only ever emits a handful of values; anything else is kept
/// verbatim so it can still be displayed on the badge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Availability {
    Available,
    Unavailable,
    Occupied,
    Cleaning,
    Maintenance,
    Other(String),
}

impl Availability {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::Occupied => "occupied",
            Self::Cleaning => "cleaning",
            Self::Maintenance => "maintenance",
            Self::Other(raw) => raw,
        }
    }

    /// Only `available` rooms can be booked.
    pub fn is_bookable(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl From<String> for Availability {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "available" => Self::Available,
            "unavailable" => Self::Unavailable,
            "occupied" => Self::Occupied,
            "cleaning" => Self::Cleaning,
            "maintenance" => Self::Maintenance,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for Availability {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<Availability> for String {
    fn from(value: Availability) -> Self {
        match value {
            Availability::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Snapshot ─────────────────────────────────────────────────────

/// One room entry of an availability snapshot. Extra wire fields
/// (name, price, location, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub room_id: String,
    pub availability: Availability,
}

impl RoomRecord {
    pub fn new(room_id: impl Into<String>, availability: impl Into<Availability>) -> Self {
        Self {
            room_id: room_id.into(),
            availability: availability.into(),
        }
    }
}

/// Full set of room records returned by one successful poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rooms: Vec<RoomRecord>,
    /// Entries of the `rooms` array that could not be read as a record,
    /// as `rooms[<index>]: <reason>`.
    #[serde(default)]
    pub skipped: Vec<String>,
}

impl Snapshot {
    pub fn new(rooms: Vec<RoomRecord>) -> Self {
        Self {
            rooms,
            skipped: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

// ─── Wire envelope ────────────────────────────────────────────────

/// Response body of `GET /api/rooms/available`.
///
/// `rooms` stays untyped so one bad entry does not discard the others.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityResponse {
    pub success: bool,
    #[serde(default)]
    pub rooms: Vec<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AvailabilityResponse {
    /// Turn the envelope into a snapshot, honoring the `success` flag.
    /// Unreadable entries are logged and listed in `Snapshot::skipped`.
    pub fn into_snapshot(self) -> Result<Snapshot, PollError> {
        if !self.success {
            return Err(PollError::Rejected {
                error: self.error.unwrap_or_else(|| "unspecified error".to_string()),
            });
        }

        let mut snapshot = Snapshot::default();
        for (i, entry) in self.rooms.into_iter().enumerate() {
            match serde_json::from_value::<RoomRecord>(entry) {
                Ok(record) => snapshot.rooms.push(record),
                Err(e) => {
                    tracing::warn!("skipping room entry {i}: {e}");
                    snapshot.skipped.push(format!("rooms[{i}]: {e}"));
                }
            }
        }
        Ok(snapshot)
    }
}

/// Parse a raw response body into a snapshot.
pub fn parse_availability_body(body: &str) -> Result<Snapshot, PollError> {
    let response: AvailabilityResponse =
        serde_json::from_str(body).map_err(|e| PollError::Malformed(e.to_string()))?;
    response.into_snapshot()
}

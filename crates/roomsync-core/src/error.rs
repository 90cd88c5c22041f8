//! Error types for polling and booking.

use thiserror::Error;

/// Why a poll produced no snapshot. Every variant is non-fatal: the poll
/// loop logs it and leaves the card board untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("availability request failed: {0}")]
    Transport(String),

    #[error("availability endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("malformed availability response: {0}")]
    Malformed(String),

    #[error("availability endpoint reported failure: {error}")]
    Rejected { error: String },
}

impl PollError {
    /// Short stable label for logs and status output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Malformed(_) => "malformed",
            Self::Rejected { .. } => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingRefused {
    #[error("This room is no longer available")]
    Unavailable { room_id: String },

    #[error("no room card for {room_id}")]
    UnknownRoom { room_id: String },
}

//! roomsync-core: room availability model.
//! Wire types, rendered room cards, reconciliation and the booking guard.
//! Pure logic, no IO.

pub mod booking;
pub mod card;
pub mod error;
pub mod reconcile;
pub mod types;

pub use booking::check_booking;
pub use card::{BadgeTone, BookingAction, CardBoard, CardSurface, RoomCard, StatusBadge};
pub use error::{BookingRefused, PollError};
pub use reconcile::{ReconcileReport, reconcile};
pub use types::{Availability, AvailabilityResponse, RoomRecord, Snapshot, parse_availability_body};

//! roomsync-poller: periodic availability refresh.
//! Fetches the snapshot on a fixed period and reconciles it into the
//! rendered room cards, never more than one request at a time.

pub mod flight;
pub mod poller;
pub mod stats;

pub use flight::{FlightGuard, SingleFlight};
pub use poller::{PollResult, Poller, TickOutcome, poll_once};
pub use stats::PollStats;

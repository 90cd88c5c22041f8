//! Click guard for the booking action.

use crate::card::CardBoard;
use crate::error::BookingRefused;

/// Allow a booking only if the card's availability flag is set.
pub fn check_booking(board: &CardBoard, room_id: &str) -> Result<(), BookingRefused> {
    let card = board.get(room_id).ok_or_else(|| BookingRefused::UnknownRoom {
        room_id: room_id.to_string(),
    })?;

    if card.is_bookable() {
        Ok(())
    } else {
        Err(BookingRefused::Unavailable {
            room_id: room_id.to_string(),
        })
    }
}

//! Room cards and the board that holds them.
//!
//! A card mirrors what the booking page renders per room: a status badge and
//! a booking action. The board is rendered once from an initial snapshot and
//! afterwards only patched in place.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Availability, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Success,
    Danger,
}

impl BadgeTone {
    pub fn for_availability(availability: &Availability) -> Self {
        if availability.is_bookable() {
            Self::Success
        } else {
            Self::Danger
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBadge {
    pub label: String,
    pub tone: BadgeTone,
}

/// Booking button state. `enabled` is what the user can click,
/// `data_available` is the flag the click guard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingAction {
    pub enabled: bool,
    pub data_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCard {
    pub room_id: String,
    pub badge: StatusBadge,
    pub booking: BookingAction,
}

impl RoomCard {
    pub fn new(room_id: impl Into<String>, availability: &Availability) -> Self {
        let mut card = Self {
            room_id: room_id.into(),
            badge: StatusBadge {
                label: String::new(),
                tone: BadgeTone::Danger,
            },
            booking: BookingAction {
                enabled: false,
                data_available: false,
            },
        };
        card.apply(availability);
        card
    }

    /// Patch badge and booking action to reflect `availability`.
    /// Returns `true` if anything visible changed.
    pub fn apply(&mut self, availability: &Availability) -> bool {
        let bookable = availability.is_bookable();
        let badge = StatusBadge {
            label: availability.as_str().to_string(),
            tone: BadgeTone::for_availability(availability),
        };
        let booking = BookingAction {
            enabled: bookable,
            data_available: bookable,
        };

        if self.badge == badge && self.booking == booking {
            return false;
        }
        self.badge = badge;
        self.booking = booking;
        true
    }

    pub fn is_bookable(&self) -> bool {
        self.booking.data_available
    }
}

// ─── Surface ──────────────────────────────────────────────────────

/// Lookup of rendered room cards by `room_id`. Reconciliation only needs this.
pub trait CardSurface {
    fn card_mut(&mut self, room_id: &str) -> Option<&mut RoomCard>;
}

impl<T: CardSurface + ?Sized> CardSurface for &mut T {
    fn card_mut(&mut self, room_id: &str) -> Option<&mut RoomCard> {
        (**self).card_mut(room_id)
    }
}

// ─── Board ────────────────────────────────────────────────────────

/// In-memory rendered page: cards in render order, indexed by `room_id`.
#[derive(Debug, Clone, Default)]
pub struct CardBoard {
    cards: Vec<RoomCard>,
    index: HashMap<String, usize>,
}

impl CardBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one card per snapshot record. A repeated `room_id` keeps its
    /// first position and takes the later value.
    pub fn render(snapshot: &Snapshot) -> Self {
        let mut board = Self::new();
        for record in &snapshot.rooms {
            board.insert(RoomCard::new(record.room_id.clone(), &record.availability));
        }
        board
    }

    pub fn insert(&mut self, card: RoomCard) {
        match self.index.get(&card.room_id) {
            Some(&pos) => self.cards[pos] = card,
            None => {
                self.index.insert(card.room_id.clone(), self.cards.len());
                self.cards.push(card);
            }
        }
    }

    pub fn get(&self, room_id: &str) -> Option<&RoomCard> {
        self.index.get(room_id).map(|&pos| &self.cards[pos])
    }

    pub fn cards(&self) -> &[RoomCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardSurface for CardBoard {
    fn card_mut(&mut self, room_id: &str) -> Option<&mut RoomCard> {
        let pos = *self.index.get(room_id)?;
        self.cards.get_mut(pos)
    }
}

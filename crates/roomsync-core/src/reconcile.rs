//! Reconciliation: patch rendered cards from a fetched snapshot.

use serde::Serialize;

use crate::card::CardSurface;
use crate::types::Snapshot;

/// What one reconciliation pass did to the surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Cards whose badge or booking action changed.
    pub updated: Vec<String>,
    /// Cards that matched a record but already showed its value.
    pub unchanged: Vec<String>,
    /// Records with no rendered card. Ignored.
    pub unmatched: Vec<String>,
    /// Snapshot entries that were unreadable and never applied.
    pub malformed: Vec<String>,
}

impl ReconcileReport {
    pub fn matched(&self) -> usize {
        self.updated.len() + self.unchanged.len()
    }
}

/// Apply every record of `snapshot` to its card on `surface`.
///
/// Cards without a record are not touched; records without a card are
/// reported in `unmatched` and otherwise ignored.
pub fn reconcile<S: CardSurface + ?Sized>(surface: &mut S, snapshot: &Snapshot) -> ReconcileReport {
    let mut report = ReconcileReport {
        malformed: snapshot.skipped.clone(),
        ..ReconcileReport::default()
    };

    for record in &snapshot.rooms {
        match surface.card_mut(&record.room_id) {
            Some(card) => {
                if card.apply(&record.availability) {
                    report.updated.push(record.room_id.clone());
                } else {
                    report.unchanged.push(record.room_id.clone());
                }
            }
            None => {
                tracing::debug!("no card for room {}", record.room_id);
                report.unmatched.push(record.room_id.clone());
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardBoard;
    use crate::types::{Availability, RoomRecord};

    fn page() -> CardBoard {
        CardBoard::render(&Snapshot::new(vec![
            RoomRecord::new("101", "available"),
            RoomRecord::new("102", "unavailable"),
        ]))
    }

    #[test]
    fn example_scenario() {
        let mut board = page();
        let before_102 = board.get("102").cloned();

        let report = reconcile(
            &mut board,
            &Snapshot::new(vec![RoomRecord::new("101", "unavailable")]),
        );

        assert_eq!(report.updated, ["101"]);
        let card = board.get("101").expect("card 101");
        assert_eq!(card.badge.label, "unavailable");
        assert!(!card.booking.enabled);
        assert_eq!(board.get("102").cloned(), before_102);
    }

    #[test]
    fn unmatched_records_are_reported() {
        let mut board = page();
        let report = reconcile(
            &mut board,
            &Snapshot::new(vec![
                RoomRecord::new("999", "available"),
                RoomRecord::new("102", "unavailable"),
            ]),
        );
        assert_eq!(report.unmatched, ["999"]);
        assert_eq!(report.unchanged, ["102"]);
        assert!(report.updated.is_empty());
        assert_eq!(report.matched(), 1);
        assert_eq!(board.len(), 2, "reconcile never adds cards");
    }

    #[test]
    fn state_mapping() {
        let mut board = page();
        for (value, enabled) in [
            ("available", true),
            ("occupied", false),
            ("available", true),
            ("maintenance", false),
            ("something-new", false),
        ] {
            reconcile(&mut board, &Snapshot::new(vec![RoomRecord::new("102", value)]));
            let card = board.get("102").expect("card 102");
            assert_eq!(card.booking.enabled, enabled, "{value}");
            assert_eq!(card.booking.data_available, enabled, "{value}");
            assert_eq!(card.badge.label, Availability::from(value).as_str());
        }
    }

    #[test]
    fn skipped_entries_are_reported_as_malformed() {
        let mut board = page();
        let mut snapshot = Snapshot::new(vec![RoomRecord::new("102", "available")]);
        snapshot.skipped.push("rooms[0]: missing field `availability`".to_string());

        let report = reconcile(&mut board, &snapshot);
        assert_eq!(report.updated, ["102"]);
        assert_eq!(report.malformed, ["rooms[0]: missing field `availability`"]);
    }

    #[test]
    fn empty_snapshot_is_noop() {
        let mut board = page();
        let before = board.cards().to_vec();
        let report = reconcile(&mut board, &Snapshot::default());
        assert_eq!(report, ReconcileReport::default());
        assert_eq!(board.cards(), before.as_slice());
    }
}

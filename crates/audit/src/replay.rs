//! Replay an item's audit trail from zero state.
//!
//! Used for reconciliation: folding every entry that touches an item, oldest
//! first, must land on exactly the bucket values its live record shows.

use serde::{Deserialize, Serialize};

use stockbook_core::{ItemRef, StockState};

use crate::entry::{AuditEntry, AuditKind};

/// Bucket values reconstructed purely from the audit trail.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayedBuckets {
    pub sellable: u64,
    pub damaged: u64,
    pub hold: u64,
    pub transit: u64,
}

impl ReplayedBuckets {
    pub fn total(&self) -> u64 {
        self.sellable + self.damaged + self.hold + self.transit
    }

    pub fn bucket(&self, state: StockState) -> u64 {
        match state {
            StockState::Sellable => self.sellable,
            StockState::Damaged => self.damaged,
            StockState::Hold => self.hold,
            StockState::Transit => self.transit,
        }
    }

    fn bucket_mut(&mut self, state: StockState) -> &mut u64 {
        match state {
            StockState::Sellable => &mut self.sellable,
            StockState::Damaged => &mut self.damaged,
            StockState::Hold => &mut self.hold,
            StockState::Transit => &mut self.transit,
        }
    }

    pub fn matches(&self, sellable: u64, damaged: u64, hold: u64, transit: u64) -> bool {
        self.sellable == sellable
            && self.damaged == damaged
            && self.hold == hold
            && self.transit == transit
    }
}

/// Fold an item's entries from zero state into bucket values.
///
/// Entries that do not touch the item are skipped, so the full log can be
/// passed as-is. Entries are processed in the order given; callers pass them
/// oldest first (append order).
pub fn replay_item(item: &ItemRef, entries: &[AuditEntry]) -> ReplayedBuckets {
    let mut buckets = ReplayedBuckets::default();

    for entry in entries.iter().filter(|e| e.touches(item)) {
        match &entry.kind {
            AuditKind::StockReceived { state, .. } => {
                *buckets.bucket_mut(*state) += entry.quantity;
            }
            AuditKind::BucketTransfer {
                from_state,
                to_state,
                ..
            } => {
                *buckets.bucket_mut(*from_state) -= entry.quantity;
                *buckets.bucket_mut(*to_state) += entry.quantity;
            }
            AuditKind::VariantTransfer {
                from_variant,
                to_variant,
                ..
            } => {
                if *item == ItemRef::Variant(*from_variant) {
                    buckets.sellable -= entry.quantity;
                }
                if *item == ItemRef::Variant(*to_variant) {
                    buckets.sellable += entry.quantity;
                }
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockbook_core::{ProductId, VariantId};
    use uuid::Uuid;

    fn entry(entry_id: u64, kind: AuditKind, quantity: u64) -> AuditEntry {
        AuditEntry {
            entry_id,
            event_id: Uuid::now_v7(),
            kind,
            quantity,
            reason: None,
            occurred_at: Utc::now(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn replay_reproduces_receipts_and_transfers() {
        let item = ItemRef::Variant(VariantId::new());

        let entries = vec![
            entry(
                1,
                AuditKind::StockReceived {
                    item,
                    state: StockState::Sellable,
                    resulting_version: 1,
                },
                10,
            ),
            entry(
                2,
                AuditKind::BucketTransfer {
                    item,
                    from_state: StockState::Sellable,
                    to_state: StockState::Damaged,
                    resulting_version: 2,
                },
                3,
            ),
            entry(
                3,
                AuditKind::BucketTransfer {
                    item,
                    from_state: StockState::Sellable,
                    to_state: StockState::Transit,
                    resulting_version: 3,
                },
                2,
            ),
        ];

        let buckets = replay_item(&item, &entries);
        assert!(buckets.matches(5, 3, 0, 2));
        assert_eq!(buckets.total(), 10);
    }

    #[test]
    fn replay_applies_each_side_of_a_variant_transfer() {
        let product_id = ProductId::new();
        let from = VariantId::new();
        let to = VariantId::new();

        let entries = vec![
            entry(
                1,
                AuditKind::StockReceived {
                    item: ItemRef::Variant(from),
                    state: StockState::Sellable,
                    resulting_version: 1,
                },
                10,
            ),
            entry(
                2,
                AuditKind::StockReceived {
                    item: ItemRef::Variant(to),
                    state: StockState::Sellable,
                    resulting_version: 1,
                },
                2,
            ),
            entry(
                3,
                AuditKind::VariantTransfer {
                    product_id,
                    from_variant: from,
                    to_variant: to,
                    from_version: 2,
                    to_version: 2,
                },
                4,
            ),
        ];

        let source = replay_item(&ItemRef::Variant(from), &entries);
        let destination = replay_item(&ItemRef::Variant(to), &entries);

        assert_eq!(source.sellable, 6);
        assert_eq!(destination.sellable, 6);
        assert_eq!(source.sellable + destination.sellable, 12);
    }

    #[test]
    fn replay_ignores_unrelated_entries() {
        let mine = ItemRef::Product(ProductId::new());
        let other = ItemRef::Product(ProductId::new());

        let entries = vec![entry(
            1,
            AuditKind::StockReceived {
                item: other,
                state: StockState::Hold,
                resulting_version: 1,
            },
            9,
        )];

        assert_eq!(replay_item(&mine, &entries), ReplayedBuckets::default());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockbook_core::{ItemRef, ProductId, StockState, VariantId};

/// What a committed mutation did, with the ids it touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditKind {
    /// Intra-item transfer between two buckets of one record.
    BucketTransfer {
        item: ItemRef,
        from_state: StockState,
        to_state: StockState,
        resulting_version: u64,
    },
    /// Inter-variant transfer of sellable stock between two siblings.
    VariantTransfer {
        product_id: ProductId,
        from_variant: VariantId,
        to_variant: VariantId,
        from_version: u64,
        to_version: u64,
    },
    /// New stock received into a single bucket.
    StockReceived {
        item: ItemRef,
        state: StockState,
        resulting_version: u64,
    },
}

impl AuditKind {
    /// Items this entry touches, used to filter per-item trails.
    pub fn subjects(&self) -> Vec<ItemRef> {
        match self {
            AuditKind::BucketTransfer { item, .. } | AuditKind::StockReceived { item, .. } => {
                vec![*item]
            }
            AuditKind::VariantTransfer {
                from_variant,
                to_variant,
                ..
            } => vec![ItemRef::Variant(*from_variant), ItemRef::Variant(*to_variant)],
        }
    }

    pub fn touches(&self, item: &ItemRef) -> bool {
        self.subjects().contains(item)
    }
}

/// A committed mutation, not yet assigned its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub kind: AuditKind,
    pub quantity: u64,
    pub reason: Option<String>,
    /// Business time supplied by the caller.
    pub occurred_at: DateTime<Utc>,
}

/// An immutable fact in the audit log.
///
/// `entry_id` is assigned by the log at append time: monotonic, unique, and
/// the log's total order. Append order is causal order; an entry exists only
/// for mutations that were durably applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entry_id: u64,
    pub event_id: Uuid,
    pub kind: AuditKind,
    pub quantity: u64,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn touches(&self, item: &ItemRef) -> bool {
        self.kind.touches(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_transfer_touches_both_sides() {
        let from = VariantId::new();
        let to = VariantId::new();
        let kind = AuditKind::VariantTransfer {
            product_id: ProductId::new(),
            from_variant: from,
            to_variant: to,
            from_version: 2,
            to_version: 5,
        };

        assert!(kind.touches(&ItemRef::Variant(from)));
        assert!(kind.touches(&ItemRef::Variant(to)));
        assert!(!kind.touches(&ItemRef::Variant(VariantId::new())));
    }

    #[test]
    fn bucket_transfer_touches_only_its_item() {
        let item = ItemRef::Product(ProductId::new());
        let kind = AuditKind::BucketTransfer {
            item,
            from_state: StockState::Sellable,
            to_state: StockState::Damaged,
            resulting_version: 1,
        };

        assert_eq!(kind.subjects(), vec![item]);
    }
}

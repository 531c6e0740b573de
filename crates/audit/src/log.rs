use std::sync::{Arc, RwLock};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use stockbook_core::ItemRef;

use crate::entry::{AuditEntry, NewAuditEntry};

/// Audit log operation error.
///
/// Appends are expected to succeed; failure here means the log backend is
/// unavailable, which callers surface as a transient fault.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit log unavailable: {0}")]
    Unavailable(String),
}

/// Append-only log of committed stock mutations.
///
/// No update or delete operation exists. Entries carry a monotonically
/// increasing `entry_id` assigned at append time; `entries_for` returns an
/// item's entries oldest first, in append order.
pub trait AuditLog: Send + Sync {
    /// Append one entry and return it with its assigned id.
    fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuditError>;

    /// All entries touching the given item, oldest first.
    fn entries_for(&self, item: &ItemRef) -> Result<Vec<AuditEntry>, AuditError>;

    /// The full log, oldest first.
    fn all(&self) -> Result<Vec<AuditEntry>, AuditError>;
}

impl<L> AuditLog for Arc<L>
where
    L: AuditLog + ?Sized,
{
    fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuditError> {
        (**self).append(entry)
    }

    fn entries_for(&self, item: &ItemRef) -> Result<Vec<AuditEntry>, AuditError> {
        (**self).entries_for(item)
    }

    fn all(&self) -> Result<Vec<AuditEntry>, AuditError> {
        (**self).all()
    }
}

/// In-memory append-only audit log.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLog for InMemoryAuditLog {
    fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuditError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AuditError::Unavailable("lock poisoned".to_string()))?;

        let stored = AuditEntry {
            entry_id: entries.len() as u64 + 1,
            event_id: Uuid::now_v7(),
            kind: entry.kind,
            quantity: entry.quantity,
            reason: entry.reason,
            occurred_at: entry.occurred_at,
            recorded_at: Utc::now(),
        };
        entries.push(stored.clone());
        Ok(stored)
    }

    fn entries_for(&self, item: &ItemRef) -> Result<Vec<AuditEntry>, AuditError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| AuditError::Unavailable("lock poisoned".to_string()))?;

        Ok(entries.iter().filter(|e| e.touches(item)).cloned().collect())
    }

    fn all(&self) -> Result<Vec<AuditEntry>, AuditError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| AuditError::Unavailable("lock poisoned".to_string()))?;

        Ok(entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AuditKind;
    use stockbook_core::{ProductId, StockState, VariantId};

    fn received(item: ItemRef, quantity: u64, version: u64) -> NewAuditEntry {
        NewAuditEntry {
            kind: AuditKind::StockReceived {
                item,
                state: StockState::Sellable,
                resulting_version: version,
            },
            quantity,
            reason: None,
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn entry_ids_are_monotonic_and_unique() {
        let log = InMemoryAuditLog::new();
        let item = ItemRef::Product(ProductId::new());

        let a = log.append(received(item, 1, 1)).unwrap();
        let b = log.append(received(item, 2, 2)).unwrap();
        let c = log.append(received(item, 3, 3)).unwrap();

        assert_eq!((a.entry_id, b.entry_id, c.entry_id), (1, 2, 3));
    }

    #[test]
    fn entries_for_filters_by_subject_and_keeps_append_order() {
        let log = InMemoryAuditLog::new();
        let mine = ItemRef::Variant(VariantId::new());
        let other = ItemRef::Variant(VariantId::new());

        log.append(received(mine, 5, 1)).unwrap();
        log.append(received(other, 7, 1)).unwrap();
        log.append(received(mine, 2, 2)).unwrap();

        let trail = log.entries_for(&mine).unwrap();
        assert_eq!(trail.len(), 2);
        assert!(trail[0].entry_id < trail[1].entry_id);
        assert_eq!(trail[0].quantity, 5);
        assert_eq!(trail[1].quantity, 2);
    }

    #[test]
    fn variant_transfer_appears_in_both_trails() {
        let log = InMemoryAuditLog::new();
        let from = VariantId::new();
        let to = VariantId::new();

        log.append(NewAuditEntry {
            kind: AuditKind::VariantTransfer {
                product_id: ProductId::new(),
                from_variant: from,
                to_variant: to,
                from_version: 2,
                to_version: 2,
            },
            quantity: 4,
            reason: Some("rebalance".to_string()),
            occurred_at: Utc::now(),
        })
        .unwrap();

        assert_eq!(log.entries_for(&ItemRef::Variant(from)).unwrap().len(), 1);
        assert_eq!(log.entries_for(&ItemRef::Variant(to)).unwrap().len(), 1);
    }
}

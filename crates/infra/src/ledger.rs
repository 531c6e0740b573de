//! Transfer execution pipeline (application-level orchestration).
//!
//! `StockLedger` is the single writer for stock records. It composes the
//! persistence store, the catalog resolver, and the audit log behind the
//! operations callers use, and owns the lock discipline that makes each
//! transfer atomic:
//!
//! ```text
//! Request
//!   ↓
//! 1. Shape validation + catalog resolution (no locks held)
//!   ↓
//! 2. Acquire record lock(s), pairs always in ItemRef order
//!   ↓
//! 3. Load fresh state, check the caller's expected version
//!   ↓
//! 4. Re-validate and mutate (pure domain logic)
//!   ↓
//! 5. Persist with an exact-version write (atomic for pairs)
//!   ↓
//! 6. Append one audit entry
//! ```
//!
//! Any rejection before step 5 aborts with no mutation and no audit entry.
//! Rejections are expected outcomes and come back as typed values; nothing
//! here is fatal to the process.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockbook_audit::{AuditEntry, AuditError, AuditKind, AuditLog, NewAuditEntry, ReplayedBuckets};
use stockbook_core::{ExpectedVersion, ItemRef, ProductId, RejectedReason};
use stockbook_ledger::{
    ReceiveStockRequest, StockRecord, TransferRequest, VariantTransferRequest,
    validate_variant_pair,
};

use crate::catalog::{CatalogError, CatalogResolver};
use crate::locks::LockRegistry;
use crate::store::{StockStore, StoreError};

/// Error surface of the ledger operations.
///
/// Business rejections keep their closed taxonomy; infrastructure faults
/// (store, catalog, audit backend) surface separately as transient failures
/// the caller may retry.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("transfer rejected: {0}")]
    Rejected(#[from] RejectedReason),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        match value {
            // A version race at the store is the same outcome as one caught
            // by the executor's own check: the caller's read was stale.
            StoreError::Concurrency { expected, actual } => {
                LedgerError::Rejected(RejectedReason::ConcurrentModification { expected, actual })
            }
            other => LedgerError::Store(other),
        }
    }
}

impl LedgerError {
    pub fn rejection(&self) -> Option<&RejectedReason> {
        match self {
            LedgerError::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Outcome of replaying an item's audit trail against its live record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub item: ItemRef,
    pub consistent: bool,
    pub replayed: ReplayedBuckets,
    pub record: StockRecord,
}

/// The stock ledger: validator, executor, and read surface in one place.
///
/// Generic over its collaborators so tests and deployments can mix
/// in-memory and real backends without touching domain code.
#[derive(Debug)]
pub struct StockLedger<S, C, A> {
    store: S,
    catalog: C,
    audit: A,
    locks: LockRegistry,
}

impl<S, C, A> StockLedger<S, C, A> {
    pub fn new(store: S, catalog: C, audit: A) -> Self {
        Self {
            store,
            catalog,
            audit,
            locks: LockRegistry::new(),
        }
    }
}

impl<S, C, A> StockLedger<S, C, A>
where
    S: StockStore,
    C: CatalogResolver,
    A: AuditLog,
{
    /// Current record for an item.
    pub fn stock_record(&self, item: &ItemRef) -> Result<StockRecord, LedgerError> {
        self.store
            .load(item)?
            .ok_or(LedgerError::Rejected(RejectedReason::ItemNotFound))
    }

    /// Move quantity between two buckets of one item.
    pub fn transfer_within_item(
        &self,
        request: TransferRequest,
    ) -> Result<StockRecord, LedgerError> {
        let lock = self.locks.handle(request.item);
        let _guard = lock
            .lock()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".to_string()))
            .map_err(LedgerError::Store)?;

        let mut record = self.stock_record(&request.item)?;
        request.expected_version.check(record.version())?;

        let previous_version = record.version();
        let now = Utc::now();
        record.transfer(request.from_state, request.to_state, request.quantity, now)?;

        let saved = self
            .store
            .save(record, ExpectedVersion::Exact(previous_version))?;

        // The mutation is durable; a failed append surfaces to the caller
        // but is not rolled back (at-least-once toward the audit backend).
        self.audit.append(NewAuditEntry {
            kind: AuditKind::BucketTransfer {
                item: request.item,
                from_state: request.from_state,
                to_state: request.to_state,
                resulting_version: saved.version(),
            },
            quantity: request.quantity,
            reason: request.reason,
            occurred_at: now,
        })?;

        tracing::info!(
            item = %request.item,
            from = %request.from_state,
            to = %request.to_state,
            quantity = request.quantity,
            version = saved.version(),
            "intra-item transfer committed"
        );

        Ok(saved)
    }

    /// Move sellable stock between two variants of the same product.
    pub fn transfer_between_variants(
        &self,
        request: VariantTransferRequest,
    ) -> Result<(StockRecord, StockRecord), LedgerError> {
        validate_variant_pair(request.from_variant, request.to_variant, request.quantity)?;

        // Catalog resolution happens before any lock is taken; no lock is
        // ever held across collaborator IO.
        let from_product = self.owning_product(request.from_variant)?;
        let to_product = self.owning_product(request.to_variant)?;
        if from_product != to_product {
            return Err(RejectedReason::CrossProductTransfer.into());
        }

        let from_item = ItemRef::Variant(request.from_variant);
        let to_item = ItemRef::Variant(request.to_variant);

        let (first, second) = self.locks.ordered_pair(from_item, to_item);
        let _guard_first = first
            .lock()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".to_string()))
            .map_err(LedgerError::Store)?;
        let _guard_second = second
            .lock()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".to_string()))
            .map_err(LedgerError::Store)?;

        let mut source = self.stock_record(&from_item)?;
        let mut destination = self.stock_record(&to_item)?;
        request.expected_from.check(source.version())?;
        request.expected_to.check(destination.version())?;

        let source_previous = source.version();
        let destination_previous = destination.version();
        let now = Utc::now();

        source.withdraw_sellable(request.quantity, now)?;
        destination.deposit_sellable(request.quantity, now);

        let (saved_source, saved_destination) = self.store.save_pair(
            source,
            ExpectedVersion::Exact(source_previous),
            destination,
            ExpectedVersion::Exact(destination_previous),
        )?;

        self.audit.append(NewAuditEntry {
            kind: AuditKind::VariantTransfer {
                product_id: from_product,
                from_variant: request.from_variant,
                to_variant: request.to_variant,
                from_version: saved_source.version(),
                to_version: saved_destination.version(),
            },
            quantity: request.quantity,
            reason: request.reason,
            occurred_at: now,
        })?;

        tracing::info!(
            product = %from_product,
            from = %request.from_variant,
            to = %request.to_variant,
            quantity = request.quantity,
            "inter-variant transfer committed"
        );

        Ok((saved_source, saved_destination))
    }

    /// Add newly received stock into a single bucket, creating the item's
    /// record on first receipt.
    ///
    /// Receipts are additive: receiving into a bucket that already holds
    /// stock increments it. Reorder level and placement metadata only apply
    /// when the record is created.
    pub fn receive_stock(&self, request: ReceiveStockRequest) -> Result<StockRecord, LedgerError> {
        let product_id = match request.item {
            ItemRef::Product(product) => product,
            ItemRef::Variant(variant) => self.owning_product(variant)?,
        };

        let lock = self.locks.handle(request.item);
        let _guard = lock
            .lock()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".to_string()))
            .map_err(LedgerError::Store)?;

        let now = Utc::now();
        let mut record = match self.store.load(&request.item)? {
            Some(existing) => existing,
            None => StockRecord::new(request.item, product_id, now)
                .with_reorder_level(request.reorder_level.unwrap_or(0))
                .with_placement(request.warehouse.clone(), request.location.clone()),
        };

        let previous_version = record.version();
        record.receive(request.state, request.quantity, now)?;

        let saved = self
            .store
            .save(record, ExpectedVersion::Exact(previous_version))?;

        self.audit.append(NewAuditEntry {
            kind: AuditKind::StockReceived {
                item: request.item,
                state: request.state,
                resulting_version: saved.version(),
            },
            quantity: request.quantity,
            reason: request.reason,
            occurred_at: now,
        })?;

        tracing::info!(
            item = %request.item,
            state = %request.state,
            quantity = request.quantity,
            version = saved.version(),
            "stock received"
        );

        Ok(saved)
    }

    /// Records whose sellable stock is at or below the threshold
    /// (each record's own reorder level unless overridden).
    pub fn list_low_stock(&self, threshold: Option<u64>) -> Result<Vec<StockRecord>, LedgerError> {
        let mut low: Vec<StockRecord> = self
            .store
            .list()?
            .into_iter()
            .filter(|r| r.is_low_with(threshold))
            .collect();
        low.sort_by_key(|r| r.item());
        Ok(low)
    }

    /// An item's audit trail, oldest first.
    pub fn audit_trail(&self, item: &ItemRef) -> Result<Vec<AuditEntry>, LedgerError> {
        Ok(self.audit.entries_for(item)?)
    }

    /// Replay an item's audit trail from zero state and compare against the
    /// live record.
    pub fn reconcile(&self, item: &ItemRef) -> Result<Reconciliation, LedgerError> {
        let record = self.stock_record(item)?;
        let entries = self.audit.entries_for(item)?;
        let replayed = stockbook_audit::replay::replay_item(item, &entries);

        Ok(Reconciliation {
            item: *item,
            consistent: replayed.matches(
                record.sellable(),
                record.damaged(),
                record.hold(),
                record.transit(),
            ),
            replayed,
            record,
        })
    }

    fn owning_product(&self, variant: stockbook_core::VariantId) -> Result<ProductId, LedgerError> {
        self.catalog
            .product_of(variant)?
            .ok_or(LedgerError::Rejected(RejectedReason::ItemNotFound))
    }
}

/// Ledger wired entirely with the in-memory collaborators.
pub type InMemoryStockLedger = StockLedger<
    Arc<crate::store::InMemoryStockStore>,
    Arc<crate::catalog::InMemoryCatalog>,
    Arc<stockbook_audit::InMemoryAuditLog>,
>;

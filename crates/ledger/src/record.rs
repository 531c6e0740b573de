use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{DomainResult, ItemRef, ProductId, RejectedReason, StockState};

use crate::transfer::{validate_intra, validate_withdrawal};

/// Stock bookkeeping for one item (a product's default record or one variant).
///
/// Every unit the record knows about sits in exactly one of the four state
/// buckets. The total across buckets is never stored; it is always recomputed,
/// so a bucket-level mutation cannot drift away from the sum.
///
/// `version` strictly increases on every committed mutation and is the token
/// used for optimistic-concurrency detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    item: ItemRef,
    product_id: ProductId,
    sellable: u64,
    damaged: u64,
    hold: u64,
    transit: u64,
    reorder_level: u64,
    warehouse: Option<String>,
    location: Option<String>,
    version: u64,
    updated_at: DateTime<Utc>,
}

impl StockRecord {
    /// Create an empty record for an item that is about to receive its first
    /// stock. All buckets start at zero and `version` at 0; the first
    /// committed mutation takes it to 1.
    pub fn new(item: ItemRef, product_id: ProductId, at: DateTime<Utc>) -> Self {
        Self {
            item,
            product_id,
            sellable: 0,
            damaged: 0,
            hold: 0,
            transit: 0,
            reorder_level: 0,
            warehouse: None,
            location: None,
            version: 0,
            updated_at: at,
        }
    }

    pub fn with_reorder_level(mut self, reorder_level: u64) -> Self {
        self.reorder_level = reorder_level;
        self
    }

    pub fn with_placement(mut self, warehouse: Option<String>, location: Option<String>) -> Self {
        self.warehouse = warehouse;
        self.location = location;
        self
    }

    pub fn item(&self) -> ItemRef {
        self.item
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn sellable(&self) -> u64 {
        self.sellable
    }

    pub fn damaged(&self) -> u64 {
        self.damaged
    }

    pub fn hold(&self) -> u64 {
        self.hold
    }

    pub fn transit(&self) -> u64 {
        self.transit
    }

    pub fn reorder_level(&self) -> u64 {
        self.reorder_level
    }

    pub fn warehouse(&self) -> Option<&str> {
        self.warehouse.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Quantity currently in the given bucket.
    pub fn bucket(&self, state: StockState) -> u64 {
        match state {
            StockState::Sellable => self.sellable,
            StockState::Damaged => self.damaged,
            StockState::Hold => self.hold,
            StockState::Transit => self.transit,
        }
    }

    /// Total units across all buckets. Always recomputed.
    pub fn total_stock(&self) -> u64 {
        self.sellable + self.damaged + self.hold + self.transit
    }

    /// Low-stock evaluation: sellable has fallen to the reorder level.
    ///
    /// Advisory projection over whatever snapshot the caller holds; never a
    /// gate on mutation.
    pub fn is_low(&self) -> bool {
        self.sellable <= self.reorder_level
    }

    /// Low-stock evaluation against an explicit threshold override.
    pub fn is_low_with(&self, threshold: Option<u64>) -> bool {
        self.sellable <= threshold.unwrap_or(self.reorder_level)
    }

    /// No sellable stock at all.
    pub fn is_out(&self) -> bool {
        self.sellable == 0
    }

    /// Add newly received stock into a single bucket.
    ///
    /// Nothing is removed from any other bucket, so the "sufficient stock"
    /// rule does not apply; only the quantity itself is validated.
    pub fn receive(
        &mut self,
        state: StockState,
        quantity: u64,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        if quantity == 0 {
            return Err(RejectedReason::InvalidQuantity);
        }
        *self.bucket_mut(state) += quantity;
        self.touch(at);
        Ok(())
    }

    /// Move quantity between two buckets of this record.
    ///
    /// Validates first; on success the record's total is unchanged.
    pub fn transfer(
        &mut self,
        from: StockState,
        to: StockState,
        quantity: u64,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        validate_intra(self, from, to, quantity)?;
        *self.bucket_mut(from) -= quantity;
        *self.bucket_mut(to) += quantity;
        self.touch(at);
        Ok(())
    }

    /// Remove sellable stock, as the source side of an inter-variant transfer.
    pub fn withdraw_sellable(&mut self, quantity: u64, at: DateTime<Utc>) -> DomainResult<()> {
        validate_withdrawal(self, quantity)?;
        self.sellable -= quantity;
        self.touch(at);
        Ok(())
    }

    /// Add sellable stock, as the destination side of an inter-variant
    /// transfer. The quantity was validated on the source side.
    pub fn deposit_sellable(&mut self, quantity: u64, at: DateTime<Utc>) {
        self.sellable += quantity;
        self.touch(at);
    }

    fn bucket_mut(&mut self, state: StockState) -> &mut u64 {
        match state {
            StockState::Sellable => &mut self.sellable,
            StockState::Damaged => &mut self.damaged,
            StockState::Hold => &mut self.hold,
            StockState::Transit => &mut self.transit,
        }
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbook_core::VariantId;

    fn test_record() -> StockRecord {
        StockRecord::new(
            ItemRef::Variant(VariantId::new()),
            ProductId::new(),
            Utc::now(),
        )
    }

    fn record_with_sellable(quantity: u64) -> StockRecord {
        let mut record = test_record();
        record
            .receive(StockState::Sellable, quantity, Utc::now())
            .unwrap();
        record
    }

    #[test]
    fn receive_increments_a_single_bucket() {
        let mut record = test_record();
        record.receive(StockState::Hold, 5, Utc::now()).unwrap();

        assert_eq!(record.hold(), 5);
        assert_eq!(record.sellable(), 0);
        assert_eq!(record.damaged(), 0);
        assert_eq!(record.transit(), 0);
        assert_eq!(record.total_stock(), 5);
    }

    #[test]
    fn receive_is_additive_on_a_nonempty_bucket() {
        let mut record = record_with_sellable(10);
        record.receive(StockState::Sellable, 4, Utc::now()).unwrap();
        assert_eq!(record.sellable(), 14);
    }

    #[test]
    fn receive_rejects_zero_quantity() {
        let mut record = test_record();
        let err = record.receive(StockState::Sellable, 0, Utc::now()).unwrap_err();
        assert_eq!(err, RejectedReason::InvalidQuantity);
        assert_eq!(record.version(), 0);
    }

    #[test]
    fn transfer_moves_quantity_and_conserves_total() {
        let mut record = record_with_sellable(10);

        record
            .transfer(StockState::Sellable, StockState::Damaged, 3, Utc::now())
            .unwrap();

        assert_eq!(record.sellable(), 7);
        assert_eq!(record.damaged(), 3);
        assert_eq!(record.hold(), 0);
        assert_eq!(record.transit(), 0);
        assert_eq!(record.total_stock(), 10);
    }

    #[test]
    fn transfer_rejects_insufficient_stock_and_leaves_state_unchanged() {
        let mut record = record_with_sellable(5);
        let before = record.clone();

        let err = record
            .transfer(StockState::Sellable, StockState::Hold, 8, Utc::now())
            .unwrap_err();

        assert_eq!(
            err,
            RejectedReason::InsufficientStock {
                requested: 8,
                available: 5
            }
        );
        assert_eq!(record, before);
    }

    #[test]
    fn transfer_rejects_same_bucket() {
        let mut record = record_with_sellable(5);
        let err = record
            .transfer(StockState::Sellable, StockState::Sellable, 2, Utc::now())
            .unwrap_err();
        assert_eq!(err, RejectedReason::NoOpTransfer);
    }

    #[test]
    fn version_increments_on_every_committed_mutation() {
        let mut record = test_record();
        assert_eq!(record.version(), 0);

        record.receive(StockState::Sellable, 10, Utc::now()).unwrap();
        assert_eq!(record.version(), 1);

        record
            .transfer(StockState::Sellable, StockState::Transit, 2, Utc::now())
            .unwrap();
        assert_eq!(record.version(), 2);

        record.withdraw_sellable(1, Utc::now()).unwrap();
        assert_eq!(record.version(), 3);

        record.deposit_sellable(1, Utc::now());
        assert_eq!(record.version(), 4);
    }

    #[test]
    fn rejected_mutations_do_not_bump_version() {
        let mut record = record_with_sellable(5);
        let version = record.version();

        let _ = record.transfer(StockState::Sellable, StockState::Hold, 99, Utc::now());
        let _ = record.transfer(StockState::Hold, StockState::Hold, 1, Utc::now());
        let _ = record.receive(StockState::Hold, 0, Utc::now());
        let _ = record.withdraw_sellable(99, Utc::now());

        assert_eq!(record.version(), version);
    }

    #[test]
    fn low_stock_boundary_is_inclusive() {
        let mut record = record_with_sellable(3);
        record = record.with_reorder_level(3);
        assert!(record.is_low());

        record.receive(StockState::Sellable, 1, Utc::now()).unwrap();
        assert!(!record.is_low());
    }

    #[test]
    fn low_stock_threshold_override() {
        let record = record_with_sellable(7).with_reorder_level(3);
        assert!(!record.is_low());
        assert!(record.is_low_with(Some(10)));
        assert!(!record.is_low_with(None));
    }

    #[test]
    fn out_of_stock_means_zero_sellable() {
        let mut record = record_with_sellable(1);
        assert!(!record.is_out());

        record.withdraw_sellable(1, Utc::now()).unwrap();
        assert!(record.is_out());

        // Stock in other buckets does not count as sellable.
        record.receive(StockState::Hold, 5, Utc::now()).unwrap();
        assert!(record.is_out());
    }
}

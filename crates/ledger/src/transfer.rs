use serde::{Deserialize, Serialize};

use stockbook_core::{
    DomainResult, ExpectedVersion, ItemRef, RejectedReason, StockState, VariantId,
};

use crate::record::StockRecord;

/// Request to move quantity between two buckets of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub item: ItemRef,
    pub from_state: StockState,
    pub to_state: StockState,
    pub quantity: u64,
    pub reason: Option<String>,
    /// Version the caller read before requesting; `Any` skips the check.
    #[serde(default)]
    pub expected_version: ExpectedVersion,
}

/// Request to move sellable stock between two variants of the same product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantTransferRequest {
    pub from_variant: VariantId,
    pub to_variant: VariantId,
    pub quantity: u64,
    pub reason: Option<String>,
    #[serde(default)]
    pub expected_from: ExpectedVersion,
    #[serde(default)]
    pub expected_to: ExpectedVersion,
}

/// Request to add newly received stock into a single bucket.
///
/// Creates the item's record on first receipt; placement metadata is only
/// applied at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveStockRequest {
    pub item: ItemRef,
    pub state: StockState,
    pub quantity: u64,
    pub reason: Option<String>,
    pub reorder_level: Option<u64>,
    pub warehouse: Option<String>,
    pub location: Option<String>,
}

/// Validate an intra-item transfer against the current record state.
///
/// Pure; callers re-run this inside the executor's atomic section against the
/// freshest record to close the check-then-commit race window.
pub fn validate_intra(
    record: &StockRecord,
    from: StockState,
    to: StockState,
    quantity: u64,
) -> DomainResult<()> {
    if quantity == 0 {
        return Err(RejectedReason::InvalidQuantity);
    }
    if from == to {
        return Err(RejectedReason::NoOpTransfer);
    }
    let available = record.bucket(from);
    if quantity > available {
        return Err(RejectedReason::InsufficientStock {
            requested: quantity,
            available,
        });
    }
    Ok(())
}

/// Validate the id-level shape of an inter-variant transfer.
///
/// Runs before catalog resolution; the cross-product check needs the resolver
/// and the sufficiency check needs the records, so both happen later.
pub fn validate_variant_pair(
    from_variant: VariantId,
    to_variant: VariantId,
    quantity: u64,
) -> DomainResult<()> {
    if quantity == 0 {
        return Err(RejectedReason::InvalidQuantity);
    }
    if from_variant == to_variant {
        return Err(RejectedReason::NoOpTransfer);
    }
    Ok(())
}

/// Validate a sellable withdrawal on the source record of an inter-variant
/// transfer.
pub fn validate_withdrawal(record: &StockRecord, quantity: u64) -> DomainResult<()> {
    if quantity == 0 {
        return Err(RejectedReason::InvalidQuantity);
    }
    let available = record.sellable();
    if quantity > available {
        return Err(RejectedReason::InsufficientStock {
            requested: quantity,
            available,
        });
    }
    Ok(())
}

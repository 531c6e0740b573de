//! Domain rejection model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, RejectedReason>;

/// Why a requested ledger operation was refused.
///
/// This is a **closed** taxonomy: every refusal a caller can receive is one
/// of these variants, surfaced as a typed return. Infrastructure concerns
/// (storage, collaborators being unreachable) belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RejectedReason {
    /// Transfer quantity must be strictly positive.
    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    /// Source and destination are the same bucket or the same variant.
    #[error("source and destination are identical; nothing to transfer")]
    NoOpTransfer,

    /// The source bucket does not hold the requested quantity.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u64, available: u64 },

    /// The two variants do not belong to the same product.
    #[error("variants belong to different products")]
    CrossProductTransfer,

    /// The caller's view of the record was stale at commit time.
    #[error("record modified concurrently (expected version {expected}, actual {actual})")]
    ConcurrentModification { expected: u64, actual: u64 },

    /// No stock record exists for the referenced item.
    #[error("stock record not found")]
    ItemNotFound,
}

impl RejectedReason {
    /// Stable machine-readable code, used by the HTTP layer and logs.
    pub fn code(&self) -> &'static str {
        match self {
            RejectedReason::InvalidQuantity => "invalid_quantity",
            RejectedReason::NoOpTransfer => "noop_transfer",
            RejectedReason::InsufficientStock { .. } => "insufficient_stock",
            RejectedReason::CrossProductTransfer => "cross_product_transfer",
            RejectedReason::ConcurrentModification { .. } => "concurrent_modification",
            RejectedReason::ItemNotFound => "item_not_found",
        }
    }
}

//! Stock-ledger domain module.
//!
//! This crate contains the business rules for per-item stock bookkeeping,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage): the stock record with its four state buckets, the transfer
//! validator, and the low-stock evaluator.

pub mod record;
pub mod transfer;

pub use record::StockRecord;
pub use transfer::{
    ReceiveStockRequest, TransferRequest, VariantTransferRequest, validate_intra,
    validate_variant_pair, validate_withdrawal,
};

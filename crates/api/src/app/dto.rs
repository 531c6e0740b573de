use serde::Deserialize;

use stockbook_audit::AuditEntry;
use stockbook_core::{ExpectedVersion, ItemRef, StockState, VariantId};
use stockbook_ledger::StockRecord;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct TransferStockRequest {
    pub from_state: StockState,
    pub to_state: StockState,
    pub quantity: u64,
    pub reason: Option<String>,
    /// Version read before requesting; omit to skip the staleness check.
    pub expected_version: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ReceiveStockBody {
    pub state: StockState,
    pub quantity: u64,
    pub reason: Option<String>,
    pub reorder_level: Option<u64>,
    pub warehouse: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VariantTransferBody {
    pub from_variant: VariantId,
    pub to_variant: VariantId,
    pub quantity: u64,
    pub reason: Option<String>,
    pub expected_from: Option<u64>,
    pub expected_to: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<u64>,
}

pub fn expected_version(value: Option<u64>) -> ExpectedVersion {
    value.map(ExpectedVersion::Exact).unwrap_or_default()
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn item_to_json(item: ItemRef) -> serde_json::Value {
    let (kind, id) = match item {
        ItemRef::Product(p) => ("product", p.to_string()),
        ItemRef::Variant(v) => ("variant", v.to_string()),
    };
    serde_json::json!({ "kind": kind, "id": id })
}

pub fn record_to_json(record: &StockRecord) -> serde_json::Value {
    serde_json::json!({
        "item": item_to_json(record.item()),
        "product_id": record.product_id().to_string(),
        "sellable": record.sellable(),
        "damaged": record.damaged(),
        "hold": record.hold(),
        "transit": record.transit(),
        "total_stock": record.total_stock(),
        "reorder_level": record.reorder_level(),
        "warehouse": record.warehouse(),
        "location": record.location(),
        "version": record.version(),
        "updated_at": record.updated_at().to_rfc3339(),
        "low_stock": record.is_low(),
        "out_of_stock": record.is_out(),
    })
}

pub fn audit_entry_to_json(entry: &AuditEntry) -> serde_json::Value {
    serde_json::json!({
        "entry_id": entry.entry_id,
        "event_id": entry.event_id.to_string(),
        "kind": entry.kind,
        "quantity": entry.quantity,
        "reason": entry.reason,
        "occurred_at": entry.occurred_at.to_rfc3339(),
        "recorded_at": entry.recorded_at.to_rfc3339(),
    })
}

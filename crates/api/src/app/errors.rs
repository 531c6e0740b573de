use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockbook_core::{ItemRef, ProductId, RejectedReason, VariantId};
use stockbook_infra::{CatalogError, LedgerError};

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::Rejected(reason) => rejection_to_response(reason),
        LedgerError::Store(e) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_error", e.to_string())
        }
        LedgerError::Catalog(e) => catalog_error_to_response(e),
        LedgerError::Audit(e) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "audit_error", e.to_string())
        }
    }
}

pub fn rejection_to_response(reason: RejectedReason) -> axum::response::Response {
    let status = match reason {
        RejectedReason::InvalidQuantity | RejectedReason::NoOpTransfer => StatusCode::BAD_REQUEST,
        RejectedReason::InsufficientStock { .. } | RejectedReason::CrossProductTransfer => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        RejectedReason::ConcurrentModification { .. } => StatusCode::CONFLICT,
        RejectedReason::ItemNotFound => StatusCode::NOT_FOUND,
    };
    json_error(status, reason.code(), reason.to_string())
}

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::VariantConflict(_) => {
            json_error(StatusCode::CONFLICT, "variant_conflict", err.to_string())
        }
        CatalogError::Unavailable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "catalog_error", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse the `/:kind/:id` path segments into an item reference.
pub fn parse_item_ref(kind: &str, id: &str) -> Result<ItemRef, axum::response::Response> {
    match kind {
        "product" => id
            .parse::<ProductId>()
            .map(ItemRef::Product)
            .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")),
        "variant" => id
            .parse::<VariantId>()
            .map(ItemRef::Variant)
            .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid variant id")),
        _ => Err(json_error(
            StatusCode::BAD_REQUEST,
            "invalid_item_kind",
            "kind must be one of: product, variant",
        )),
    }
}

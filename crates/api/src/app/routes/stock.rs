use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use stockbook_ledger::{ReceiveStockRequest, TransferRequest, VariantTransferRequest};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/low", get(list_low_stock))
        .route("/transfers/variants", post(transfer_between_variants))
        .route("/:kind/:id", get(get_stock_record))
        .route("/:kind/:id/transfer", post(transfer_within_item))
        .route("/:kind/:id/receive", post(receive_stock))
        .route("/:kind/:id/audit", get(get_audit_trail))
        .route("/:kind/:id/reconcile", get(reconcile))
}

pub async fn get_stock_record(
    Extension(services): Extension<Arc<AppServices>>,
    Path((kind, id)): Path<(String, String)>,
) -> axum::response::Response {
    let item = match errors::parse_item_ref(&kind, &id) {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    match services.ledger().stock_record(&item) {
        Ok(record) => (StatusCode::OK, Json(dto::record_to_json(&record))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn transfer_within_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((kind, id)): Path<(String, String)>,
    Json(body): Json<dto::TransferStockRequest>,
) -> axum::response::Response {
    let item = match errors::parse_item_ref(&kind, &id) {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    let request = TransferRequest {
        item,
        from_state: body.from_state,
        to_state: body.to_state,
        quantity: body.quantity,
        reason: body.reason,
        expected_version: dto::expected_version(body.expected_version),
    };

    match services.ledger().transfer_within_item(request) {
        Ok(record) => (StatusCode::OK, Json(dto::record_to_json(&record))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn transfer_between_variants(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::VariantTransferBody>,
) -> axum::response::Response {
    let request = VariantTransferRequest {
        from_variant: body.from_variant,
        to_variant: body.to_variant,
        quantity: body.quantity,
        reason: body.reason,
        expected_from: dto::expected_version(body.expected_from),
        expected_to: dto::expected_version(body.expected_to),
    };

    match services.ledger().transfer_between_variants(request) {
        Ok((from, to)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "from": dto::record_to_json(&from),
                "to": dto::record_to_json(&to),
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn receive_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path((kind, id)): Path<(String, String)>,
    Json(body): Json<dto::ReceiveStockBody>,
) -> axum::response::Response {
    let item = match errors::parse_item_ref(&kind, &id) {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    let request = ReceiveStockRequest {
        item,
        state: body.state,
        quantity: body.quantity,
        reason: body.reason,
        reorder_level: body.reorder_level,
        warehouse: body.warehouse,
        location: body.location,
    };

    match services.ledger().receive_stock(request) {
        Ok(record) => (StatusCode::OK, Json(dto::record_to_json(&record))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_audit_trail(
    Extension(services): Extension<Arc<AppServices>>,
    Path((kind, id)): Path<(String, String)>,
) -> axum::response::Response {
    let item = match errors::parse_item_ref(&kind, &id) {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    match services.ledger().audit_trail(&item) {
        Ok(entries) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "count": entries.len(),
                "entries": entries.iter().map(dto::audit_entry_to_json).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn reconcile(
    Extension(services): Extension<Arc<AppServices>>,
    Path((kind, id)): Path<(String, String)>,
) -> axum::response::Response {
    let item = match errors::parse_item_ref(&kind, &id) {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    match services.ledger().reconcile(&item) {
        Ok(reconciliation) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "item": dto::item_to_json(reconciliation.item),
                "consistent": reconciliation.consistent,
                "replayed": reconciliation.replayed,
                "record": dto::record_to_json(&reconciliation.record),
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_low_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::LowStockQuery>,
) -> axum::response::Response {
    match services.ledger().list_low_stock(query.threshold) {
        Ok(records) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "count": records.len(),
                "records": records.iter().map(dto::record_to_json).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

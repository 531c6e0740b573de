use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use stockbook_core::{ProductId, VariantId};
use stockbook_infra::CatalogResolver;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:id/variants", post(add_variant).get(list_variants))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let product_id = ProductId::new();

    if let Err(e) = services.catalog().register_product(product_id) {
        return errors::catalog_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": product_id.to_string() })),
    )
        .into_response()
}

pub async fn add_variant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id");
        }
    };

    let variant_id = VariantId::new();
    if let Err(e) = services.catalog().register_variant(product_id, variant_id) {
        return errors::catalog_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": variant_id.to_string(),
            "product_id": product_id.to_string(),
        })),
    )
        .into_response()
}

pub async fn list_variants(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id");
        }
    };

    match services.catalog().variants_of_product(product_id) {
        Ok(variants) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "product_id": product_id.to_string(),
                "variants": variants.iter().map(|v| v.to_string()).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

use axum::Router;

pub mod catalog;
pub mod stock;
pub mod system;

/// Router for all ledger endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/stock", stock::router())
        .nest("/catalog", catalog::router())
}

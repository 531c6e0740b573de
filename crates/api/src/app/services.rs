use std::sync::Arc;

use stockbook_audit::InMemoryAuditLog;
use stockbook_infra::{InMemoryCatalog, InMemoryStockLedger, InMemoryStockStore, StockLedger};

/// Shared service graph injected into handlers.
///
/// The in-memory collaborators back a single-process deployment; swapping a
/// real store/catalog behind the same traits only changes this wiring.
#[derive(Clone)]
pub struct AppServices {
    ledger: Arc<InMemoryStockLedger>,
    catalog: Arc<InMemoryCatalog>,
}

impl AppServices {
    pub fn ledger(&self) -> &InMemoryStockLedger {
        &self.ledger
    }

    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }
}

pub fn build_services() -> AppServices {
    let catalog = Arc::new(InMemoryCatalog::new());
    let ledger = StockLedger::new(
        Arc::new(InMemoryStockStore::new()),
        catalog.clone(),
        Arc::new(InMemoryAuditLog::new()),
    );

    AppServices {
        ledger: Arc::new(ledger),
        catalog,
    }
}

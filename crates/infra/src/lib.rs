//! Infrastructure layer: storage, collaborators, and the transfer executor.

pub mod catalog;
pub mod ledger;
pub mod locks;
pub mod store;

pub use catalog::{CatalogError, CatalogResolver, InMemoryCatalog};
pub use ledger::{InMemoryStockLedger, LedgerError, Reconciliation, StockLedger};
pub use locks::LockRegistry;
pub use store::{InMemoryStockStore, StockStore, StoreError};

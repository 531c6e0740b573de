use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use stockbook_audit::InMemoryAuditLog;
use stockbook_core::{ExpectedVersion, ItemRef, ProductId, StockState};
use stockbook_infra::{InMemoryCatalog, InMemoryStockLedger, InMemoryStockStore, StockLedger};
use stockbook_ledger::{ReceiveStockRequest, TransferRequest};

/// Naive baseline: direct key-value bucket updates (no locks per record, no
/// versioning, no audit trail).
#[derive(Debug, Clone)]
struct NaiveBucketStore {
    inner: Arc<RwLock<HashMap<ItemRef, [u64; 4]>>>,
}

impl NaiveBucketStore {
    fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn seed(&self, item: ItemRef, sellable: u64) {
        let mut map = self.inner.write().unwrap();
        map.insert(item, [sellable, 0, 0, 0]);
    }

    fn transfer(&self, item: ItemRef, from: usize, to: usize, quantity: u64) -> Result<(), ()> {
        let mut map = self.inner.write().unwrap();
        let buckets = map.get_mut(&item).ok_or(())?;
        if buckets[from] < quantity {
            return Err(());
        }
        buckets[from] -= quantity;
        buckets[to] += quantity;
        Ok(())
    }
}

fn setup_ledger(initial_sellable: u64) -> (InMemoryStockLedger, ItemRef) {
    let ledger = StockLedger::new(
        Arc::new(InMemoryStockStore::new()),
        Arc::new(InMemoryCatalog::new()),
        Arc::new(InMemoryAuditLog::new()),
    );
    let item = ItemRef::Product(ProductId::new());
    ledger
        .receive_stock(ReceiveStockRequest {
            item,
            state: StockState::Sellable,
            quantity: initial_sellable,
            reason: None,
            reorder_level: None,
            warehouse: None,
            location: None,
        })
        .unwrap();
    (ledger, item)
}

fn bench_transfer_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_latency");
    group.sample_size(1000);

    group.bench_function("ledger_intra_transfer", |b| {
        let (ledger, item) = setup_ledger(u64::MAX / 2);
        b.iter(|| {
            ledger
                .transfer_within_item(TransferRequest {
                    item,
                    from_state: StockState::Sellable,
                    to_state: StockState::Hold,
                    quantity: black_box(1),
                    reason: None,
                    expected_version: ExpectedVersion::Any,
                })
                .unwrap()
        });
    });

    group.bench_function("naive_map_update", |b| {
        let store = NaiveBucketStore::new();
        let item = ItemRef::Product(ProductId::new());
        store.seed(item, u64::MAX / 2);
        b.iter(|| store.transfer(item, 0, 1, black_box(1)).unwrap());
    });

    group.finish();
}

fn bench_transfer_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_throughput");
    group.throughput(Throughput::Elements(100));

    group.bench_function("ledger_100_transfers", |b| {
        let (ledger, item) = setup_ledger(u64::MAX / 2);
        b.iter(|| {
            for _ in 0..100 {
                ledger
                    .transfer_within_item(TransferRequest {
                        item,
                        from_state: StockState::Sellable,
                        to_state: StockState::Hold,
                        quantity: 1,
                        reason: None,
                        expected_version: ExpectedVersion::Any,
                    })
                    .unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_transfer_latency, bench_transfer_throughput);
criterion_main!(benches);

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use stockbook_core::ItemRef;

/// Per-item mutual exclusion for the transfer executor.
///
/// Each stock record is the unit of locking. The registry hands out one
/// shared mutex per item; callers that need two (inter-variant transfers)
/// must acquire them in `ItemRef` order so that a concurrent reverse
/// transfer can never deadlock against them.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<ItemRef, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock handle for one item, created on first use.
    pub fn handle(&self, item: ItemRef) -> Arc<Mutex<()>> {
        let mut locks = match self.locks.lock() {
            Ok(guard) => guard,
            // The registry map only ever inserts handles; recovering from a
            // poisoned map cannot observe torn state.
            Err(poisoned) => poisoned.into_inner(),
        };
        locks.entry(item).or_default().clone()
    }

    /// Lock handles for a pair of items, returned in acquisition order.
    pub fn ordered_pair(&self, a: ItemRef, b: ItemRef) -> (Arc<Mutex<()>>, Arc<Mutex<()>>) {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        (self.handle(first), self.handle(second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbook_core::VariantId;

    #[test]
    fn same_item_yields_the_same_lock() {
        let registry = LockRegistry::new();
        let item = ItemRef::Variant(VariantId::new());

        let a = registry.handle(item);
        let b = registry.handle(item);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn pair_order_is_independent_of_argument_order() {
        let registry = LockRegistry::new();
        let a = ItemRef::Variant(VariantId::new());
        let b = ItemRef::Variant(VariantId::new());

        let (x1, x2) = registry.ordered_pair(a, b);
        let (y1, y2) = registry.ordered_pair(b, a);

        assert!(Arc::ptr_eq(&x1, &y1));
        assert!(Arc::ptr_eq(&x2, &y2));
    }
}

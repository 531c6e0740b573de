//! Stock state buckets.

use serde::{Deserialize, Serialize};

/// One of the four mutually exclusive stock buckets of an item.
///
/// A unit of stock is always in exactly one bucket; transfers move quantity
/// between buckets without changing the item's total.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockState {
    /// Available for sale.
    Sellable,
    /// Damaged, not sellable.
    Damaged,
    /// Held back (quality check, reservation, dispute).
    Hold,
    /// In transit between locations.
    Transit,
}

impl StockState {
    pub const ALL: [StockState; 4] = [
        StockState::Sellable,
        StockState::Damaged,
        StockState::Hold,
        StockState::Transit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StockState::Sellable => "sellable",
            StockState::Damaged => "damaged",
            StockState::Hold => "hold",
            StockState::Transit => "transit",
        }
    }
}

impl core::fmt::Display for StockState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Strongly-typed identifiers used across the ledger.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a product (the parent identity shared by its variants).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

/// Identifier of a concrete sellable variant of a product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s).map(Self)
            }
        }
    };
}

impl_uuid_newtype!(ProductId);
impl_uuid_newtype!(VariantId);

/// Reference to one stock-keeping item.
///
/// A product's stock is tracked either on its default record (products sold
/// without variants) or per variant. The tag makes the distinction explicit;
/// there is no sentinel "empty variant id" anywhere in the model.
///
/// `Ord` is derived so that pairs of items can always be locked in one
/// globally fixed order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemRef {
    /// The product's default (non-variant) stock record.
    Product(ProductId),
    /// A variant's stock record.
    Variant(VariantId),
}

impl core::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ItemRef::Product(id) => write!(f, "product:{id}"),
            ItemRef::Variant(id) => write!(f, "variant:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_refs_order_deterministically() {
        let a = ItemRef::Variant(VariantId::new());
        let b = ItemRef::Variant(VariantId::new());

        let mut one = [a, b];
        let mut two = [b, a];
        one.sort();
        two.sort();
        assert_eq!(one, two);
    }

    #[test]
    fn product_and_variant_refs_never_collide() {
        let id = Uuid::now_v7();
        assert_ne!(
            ItemRef::Product(ProductId::from_uuid(id)),
            ItemRef::Variant(VariantId::from_uuid(id))
        );
    }
}

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use stockbook_core::{ProductId, VariantId};

/// Catalog collaborator error.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("variant {0} is already registered to a different product")]
    VariantConflict(VariantId),

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Catalog lookup consumed (not implemented) by the ledger.
///
/// The ledger only needs product/variant ownership: which variants belong to
/// a product, and which product owns a variant. Resolution happens before
/// any record lock is taken, so implementations are free to do IO.
pub trait CatalogResolver: Send + Sync {
    fn variants_of_product(&self, product: ProductId) -> Result<Vec<VariantId>, CatalogError>;

    fn product_of(&self, variant: VariantId) -> Result<Option<ProductId>, CatalogError>;
}

impl<C> CatalogResolver for Arc<C>
where
    C: CatalogResolver + ?Sized,
{
    fn variants_of_product(&self, product: ProductId) -> Result<Vec<VariantId>, CatalogError> {
        (**self).variants_of_product(product)
    }

    fn product_of(&self, variant: VariantId) -> Result<Option<ProductId>, CatalogError> {
        (**self).product_of(variant)
    }
}

#[derive(Debug, Default)]
struct CatalogInner {
    variants: HashMap<ProductId, Vec<VariantId>>,
    owners: HashMap<VariantId, ProductId>,
}

/// In-memory catalog.
///
/// Intended for tests/dev deployments; a production deployment would adapt
/// the catalog service behind the same trait.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<CatalogInner>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product with no variants yet. Idempotent.
    pub fn register_product(&self, product: ProductId) -> Result<(), CatalogError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| CatalogError::Unavailable("lock poisoned".to_string()))?;

        inner.variants.entry(product).or_default();
        Ok(())
    }

    /// Register a variant under its owning product.
    ///
    /// Re-registering the same pairing is a no-op; attaching the variant to a
    /// different product is refused.
    pub fn register_variant(
        &self,
        product: ProductId,
        variant: VariantId,
    ) -> Result<(), CatalogError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| CatalogError::Unavailable("lock poisoned".to_string()))?;

        match inner.owners.get(&variant) {
            Some(owner) if *owner != product => {
                return Err(CatalogError::VariantConflict(variant));
            }
            Some(_) => return Ok(()),
            None => {}
        }

        inner.owners.insert(variant, product);
        inner.variants.entry(product).or_default().push(variant);
        Ok(())
    }
}

impl CatalogResolver for InMemoryCatalog {
    fn variants_of_product(&self, product: ProductId) -> Result<Vec<VariantId>, CatalogError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| CatalogError::Unavailable("lock poisoned".to_string()))?;

        Ok(inner.variants.get(&product).cloned().unwrap_or_default())
    }

    fn product_of(&self, variant: VariantId) -> Result<Option<ProductId>, CatalogError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| CatalogError::Unavailable("lock poisoned".to_string()))?;

        Ok(inner.owners.get(&variant).copied())
    }
}

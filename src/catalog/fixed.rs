use async_trait::async_trait;

use super::{Catalog, CatalogError, Product};

/// Catalog whose contents are fixed at startup, typically from the
/// `[catalog]` section of the settings file.
#[derive(Debug, Clone, Default)]
pub struct FixedCatalog {
    currencies: Vec<String>,
    products: Vec<Product>,
}

impl FixedCatalog {
    #[must_use]
    pub fn new(currencies: Vec<String>, products: Vec<Product>) -> Self {
        Self {
            currencies,
            products,
        }
    }
}

#[async_trait]
impl Catalog for FixedCatalog {
    async fn list_currencies(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.currencies.clone())
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }
}

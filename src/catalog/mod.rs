//! Catalog/stock collaborator: product metadata and live stock levels.

mod rest;

pub use rest::*;

use async_trait::async_trait;

use crate::domain::{CatalogProduct, ProductId, Stock};
use crate::error::CatalogError;

/// Read and write access to the inventory service.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /products/{id}`
    async fn get_product(&self, id: ProductId) -> Result<CatalogProduct, CatalogError>;

    /// `GET /stock/{id}`
    async fn get_stock(&self, id: ProductId) -> Result<Stock, CatalogError>;

    /// `PUT /stock/{id}`
    async fn put_stock(&self, stock: Stock) -> Result<(), CatalogError>;
}

//! # Mock Framework
//!
//! Utilities for testing cart code in isolation.
//!
//! Use [`create_mock_client`] to get a [`CartClient`] and the receiver its
//! requests land on, then helpers like [`expect_add`] or [`expect_update`] to
//! assert what was sent and script the reply.
//!
//! [`InMemoryCatalog`] stands in for the inventory service when the real
//! [`CartService`](crate::actors::CartService) is under test.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use url::Url;

use crate::catalog::CatalogApi;
use crate::clients::CartClient;
use crate::domain::{CatalogProduct, Product, ProductId, Stock, UpdateProductAmount};
use crate::error::CatalogError;
use crate::messages::{CartRequest, CartResponse};

/// Creates a client whose requests are delivered to the returned receiver
/// instead of a running service.
pub fn create_mock_client(buffer_size: usize) -> (CartClient, mpsc::Receiver<CartRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CartClient::new(sender), receiver)
}

/// Helper to verify that the next message is an AddProduct request
pub async fn expect_add(receiver: &mut mpsc::Receiver<CartRequest>) -> Option<(ProductId, CartResponse)> {
    match receiver.recv().await {
        Some(CartRequest::AddProduct { product_id, respond_to }) => Some((product_id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a RemoveProduct request
pub async fn expect_remove(receiver: &mut mpsc::Receiver<CartRequest>) -> Option<(ProductId, CartResponse)> {
    match receiver.recv().await {
        Some(CartRequest::RemoveProduct { product_id, respond_to }) => Some((product_id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an UpdateProductAmount request
pub async fn expect_update(receiver: &mut mpsc::Receiver<CartRequest>) -> Option<(UpdateProductAmount, CartResponse)> {
    match receiver.recv().await {
        Some(CartRequest::UpdateProductAmount { update, respond_to }) => Some((update, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a GetCart request
pub async fn expect_get_cart(receiver: &mut mpsc::Receiver<CartRequest>) -> Option<CartResponse> {
    match receiver.recv().await {
        Some(CartRequest::GetCart { respond_to }) => Some(respond_to),
        _ => None,
    }
}

pub fn sample_catalog_product(id: ProductId) -> CatalogProduct {
    CatalogProduct {
        id,
        title: format!("Tênis {}", id),
        price: Decimal::new(17990, 2),
        image: Url::parse(&format!("https://cdn.example.com/tenis{}.jpg", id)).unwrap(),
    }
}

/// A line item priced at R$ 179,90.
pub fn sample_product(id: ProductId, amount: u32) -> Product {
    Product::from_catalog(sample_catalog_product(id), amount)
}

/// In-memory inventory service.
///
/// Records every stock write and can be switched offline, or made to refuse
/// stock writes only, to simulate service failures.
#[derive(Default)]
pub struct InMemoryCatalog {
    products: Mutex<HashMap<ProductId, CatalogProduct>>,
    stock: Mutex<HashMap<ProductId, u32>>,
    stock_writes: Mutex<Vec<Stock>>,
    product_reads: Mutex<Vec<ProductId>>,
    offline: AtomicBool,
    reject_stock_writes: AtomicBool,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sample product with the given stock level.
    pub fn with_product(self, id: ProductId, stock: u32) -> Self {
        self.products.lock().unwrap().insert(id, sample_catalog_product(id));
        self.stock.lock().unwrap().insert(id, stock);
        self
    }

    /// Overrides the catalog price of a product added with `with_product`.
    pub fn with_price(self, id: ProductId, price: Decimal) -> Self {
        if let Some(product) = self.products.lock().unwrap().get_mut(&id) {
            product.price = price;
        }
        self
    }

    pub fn set_stock(&self, id: ProductId, amount: u32) {
        self.stock.lock().unwrap().insert(id, amount);
    }

    pub fn stock_of(&self, id: ProductId) -> Option<u32> {
        self.stock.lock().unwrap().get(&id).copied()
    }

    pub fn stock_writes(&self) -> Vec<Stock> {
        self.stock_writes.lock().unwrap().clone()
    }

    /// Product ids whose metadata has been requested, in order.
    pub fn product_reads(&self) -> Vec<ProductId> {
        self.product_reads.lock().unwrap().clone()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Makes `put_stock` fail while reads keep working.
    pub fn set_reject_stock_writes(&self, reject: bool) {
        self.reject_stock_writes.store(reject, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), CatalogError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CatalogError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for InMemoryCatalog {
    async fn get_product(&self, id: ProductId) -> Result<CatalogProduct, CatalogError> {
        self.check_online()?;
        self.product_reads.lock().unwrap().push(id);
        self.products
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("products/{}", id)))
    }

    async fn get_stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.check_online()?;
        self.stock_of(id)
            .map(|amount| Stock { id, amount })
            .ok_or_else(|| CatalogError::NotFound(format!("stock/{}", id)))
    }

    async fn put_stock(&self, stock: Stock) -> Result<(), CatalogError> {
        self.check_online()?;
        if self.reject_stock_writes.load(Ordering::SeqCst) {
            return Err(CatalogError::Service("stock update rejected".to_string()));
        }
        self.set_stock(stock.id, stock.amount);
        self.stock_writes.lock().unwrap().push(stock);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);

        let add_task = tokio::spawn(async move { client.add_product(7).await });

        let (product_id, responder) = expect_add(&mut receiver).await.expect("Expected AddProduct request");
        assert_eq!(product_id, 7);
        responder.send(Ok(vec![sample_product(7, 1)])).unwrap();

        let result = add_task.await.unwrap();
        assert_eq!(result, Ok(vec![sample_product(7, 1)]));
    }

    #[tokio::test]
    async fn test_in_memory_catalog_goes_offline() {
        let catalog = InMemoryCatalog::new().with_product(1, 2);
        assert_eq!(catalog.get_stock(1).await.unwrap(), Stock { id: 1, amount: 2 });

        catalog.set_offline(true);
        assert!(matches!(catalog.get_stock(1).await, Err(CatalogError::Network(_))));
    }

    #[tokio::test]
    async fn test_in_memory_catalog_rejects_stock_writes() {
        let catalog = InMemoryCatalog::new().with_product(1, 2);
        catalog.set_reject_stock_writes(true);

        let result = catalog.put_stock(Stock { id: 1, amount: 1 }).await;
        assert!(matches!(result, Err(CatalogError::Service(_))));
        assert_eq!(catalog.stock_of(1), Some(2));
        assert!(catalog.stock_writes().is_empty());
    }
}

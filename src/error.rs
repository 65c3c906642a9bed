use thiserror::Error;

use crate::domain::ProductId;
use crate::notification::{Notification, Operation};

/// Errors raised by the catalog/stock service client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Catalog network error: {0}")]
    Network(String),
    #[error("Catalog resource not found: {0}")]
    NotFound(String),
    #[error("Catalog service error: {0}")]
    Service(String),
    #[error("Catalog response parse error: {0}")]
    Parse(String),
}

/// Errors raised while reading or writing the persisted snapshot.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),
    #[error("Storage serialization error: {0}")]
    Serialization(String),
    #[error("Invalid cart snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Out of stock: requested {requested}, available {available}")]
    OutOfStock { requested: u64, available: u32 },
    #[error("Product not in cart: {0}")]
    NotFound(ProductId),
    #[error("Product already in cart: {0}")]
    AlreadyInCart(ProductId),
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),
    #[error("Invalid price for product {0}")]
    InvalidPrice(ProductId),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Service communication error: {0}")]
    ServiceCommunication(String),
}

impl CartError {
    pub fn is_out_of_stock(&self) -> bool {
        matches!(self, CartError::OutOfStock { .. })
    }

    /// User-facing notification for a failure of `operation`.
    ///
    /// Stock violations get their own message; everything else collapses into
    /// the operation's generic failure message.
    pub fn notification(&self, operation: Operation) -> Notification {
        let message = if self.is_out_of_stock() {
            Notification::OUT_OF_STOCK
        } else {
            operation.failure_message()
        };
        Notification {
            operation,
            message: message.to_string(),
        }
    }
}

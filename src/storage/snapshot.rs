use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::KeyValueStore;
use crate::domain::{Cart, Product};
use crate::error::StorageError;

/// Default local-storage key holding the serialized cart.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Serialize/deserialize boundary between the in-memory cart and the store.
///
/// The persisted shape is a bare JSON array of line items.
#[derive(Clone)]
pub struct CartSnapshot {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CartSnapshot {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads and validates the persisted cart.
    ///
    /// A missing key is an empty cart.
    pub async fn try_load(&self) -> Result<Cart, StorageError> {
        let Some(raw) = self.store.get(&self.key).await? else {
            return Ok(Cart::new());
        };
        let items: Vec<Product> =
            serde_json::from_str(&raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
        Cart::from_items(items).map_err(StorageError::InvalidSnapshot)
    }

    /// Like [`CartSnapshot::try_load`], but an unreadable snapshot is logged
    /// and replaced by an empty cart.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load(&self) -> Cart {
        match self.try_load().await {
            Ok(cart) => {
                debug!(items = cart.len(), "Cart snapshot loaded");
                cart
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable cart snapshot");
                Cart::new()
            }
        }
    }

    /// Overwrites the persisted cart.
    #[instrument(skip(self, cart), fields(key = %self.key, items = cart.len()))]
    pub async fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cart.items()).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(&self.key, raw).await?;
        debug!("Cart snapshot saved");
        Ok(())
    }
}

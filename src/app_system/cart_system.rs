use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, instrument};
use crate::actors::CartService;
use crate::catalog::{CatalogApi, HttpCatalog};
use crate::clients::CartClient;
use crate::error::StorageError;
use crate::notification::{Notification, Notifier};
use crate::storage::{CartSnapshot, JsonFileStore, KeyValueStore};
use super::CartConfig;

const NOTIFICATION_CAPACITY: usize = 64;

/// The running cart: the service task plus the handles UI code needs.
///
/// Responsible for reading the persisted snapshot once, starting the cart
/// service, and shutting it down.
pub struct CartSystem {
    pub cart_client: CartClient,
    notifier: Notifier,
    handle: tokio::task::JoinHandle<()>,
}

impl CartSystem {
    /// Starts against the HTTP catalog and the JSON file store named in `config`.
    pub async fn start(config: &CartConfig) -> Result<Self, StorageError> {
        let catalog = Arc::new(HttpCatalog::new(config.api_base_url.as_str()));
        let store = Arc::new(JsonFileStore::open(&config.storage_path).await?);
        Ok(Self::with_parts(catalog, store, config).await)
    }

    /// Starts against explicit collaborators.
    #[instrument(name = "cart_system", skip_all, fields(key = %config.storage_key))]
    pub async fn with_parts(
        catalog: Arc<dyn CatalogApi>,
        store: Arc<dyn KeyValueStore>,
        config: &CartConfig,
    ) -> Self {
        info!("Starting cart system");
        let snapshot = CartSnapshot::new(store, config.storage_key.clone());
        let cart = snapshot.load().await;
        let notifier = Notifier::new(NOTIFICATION_CAPACITY);

        let (service, cart_client) = CartService::new(
            config.channel_buffer,
            catalog,
            snapshot,
            cart,
            config.stock_policy,
            notifier.clone(),
        );
        let handle = tokio::spawn(service.run());

        Self {
            cart_client,
            notifier,
            handle,
        }
    }

    /// Receiver for user-facing failure notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down cart system...");
        // Client clones held elsewhere keep the channel open.
        let _ = self.cart_client.shutdown().await;

        if let Err(e) = self.handle.await {
            error!("Cart service task failed: {:?}", e);
            return Err(format!("Cart service task failed: {:?}", e));
        }

        info!("Cart system shutdown complete.");
        Ok(())
    }
}

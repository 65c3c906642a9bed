//! # Cart Service
//!
//! A stock-aware shopping cart for a storefront, with a write-through local
//! snapshot.
//!
//! ## Terminology
//!
//! - **Service** ([`CartService`]) owns the cart and applies every mutation.
//! - **Client** ([`CartClient`]) is the cloneable handle UI components hold to
//!   talk to the service.
//!
//! ## Ingredients
//!
//! - **Domain types** - line items and stock rules → [`Product`], [`Cart`], [`StockPolicy`]
//! - **Message enums** - typed requests with oneshot replies → [`CartRequest`]
//! - **Collaborators** - inventory service and persisted store → [`CatalogApi`], [`KeyValueStore`], [`CartSnapshot`]
//! - **UI surface** - table rows, controls and failure toasts → [`CartView`], [`Notifier`]
//! - **System** - configuration, startup, shutdown and tracing → [`CartSystem`], [`CartConfig`], [`setup_tracing`]
//!
//! ## Example Usage
//!
//! ```no_run
//! # use cart_service::{CartConfig, CartSystem, UpdateProductAmount};
//! # async fn demo() -> anyhow::Result<()> {
//! let config = CartConfig::load()?;
//! let system = CartSystem::start(&config).await?;
//!
//! let cart = system.cart_client.add_product(1).await?;
//! let cart = system
//!     .cart_client
//!     .update_product_amount(UpdateProductAmount { product_id: 1, amount: 2 })
//!     .await?;
//!
//! system.shutdown().await.map_err(anyhow::Error::msg)?;
//! # Ok(())
//! # }
//! ```

pub mod actors;
pub mod app_system;
pub mod catalog;
pub mod clients;
pub mod domain;
pub mod error;
pub mod messages;
pub mod notification;
pub mod storage;
pub mod view;

#[cfg(test)]
mod mock_framework;

pub use actors::CartService;
pub use app_system::{setup_tracing, CartConfig, CartSystem, ConfigError};
pub use catalog::{CatalogApi, HttpCatalog};
pub use clients::CartClient;
pub use domain::*;
pub use error::{CartError, CatalogError, StorageError};
pub use messages::CartRequest;
pub use notification::{Notification, Notifier, Operation};
pub use storage::{CartSnapshot, JsonFileStore, KeyValueStore, MemoryStore};
pub use view::{format_price, CartRow, CartView};

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};
use crate::catalog::CatalogApi;
use crate::clients::CartClient;
use crate::domain::{check_ceiling, Cart, Product, ProductId, Stock, StockPolicy, UpdateProductAmount};
use crate::error::CartError;
use crate::messages::{CartRequest, CartResponse};
use crate::notification::{Notifier, Operation};
use crate::storage::CartSnapshot;

// =============================================================================
// CART SERVICE
// =============================================================================

/// Owns the cart and applies every mutation, one request at a time.
///
/// Each mutation is computed on a copy of the cart and only becomes visible
/// once the snapshot has been written, so a failed request leaves both the
/// in-memory and the persisted cart unchanged.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    catalog: Arc<dyn CatalogApi>,
    snapshot: CartSnapshot,
    policy: StockPolicy,
    notifier: Notifier,
    cart: Cart,
}

impl CartService {
    pub fn new(
        buffer_size: usize,
        catalog: Arc<dyn CatalogApi>,
        snapshot: CartSnapshot,
        cart: Cart,
        policy: StockPolicy,
        notifier: Notifier,
    ) -> (Self, CartClient) {
        // mpsc::channel panics on zero capacity.
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let service = Self {
            receiver,
            catalog,
            snapshot,
            policy,
            notifier,
            cart,
        };
        let client = CartClient::new(sender);
        (service, client)
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!(items = self.cart.len(), policy = ?self.policy, "CartService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::AddProduct { product_id, respond_to } => {
                    self.handle_add_product(product_id, respond_to).await;
                }
                CartRequest::RemoveProduct { product_id, respond_to } => {
                    self.handle_remove_product(product_id, respond_to).await;
                }
                CartRequest::UpdateProductAmount { update, respond_to } => {
                    self.handle_update_product_amount(update, respond_to).await;
                }
                CartRequest::GetCart { respond_to } => {
                    let _ = respond_to.send(Ok(self.cart.items().to_vec()));
                }
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }
        info!("CartService stopped");
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_add_product(&mut self, product_id: ProductId, respond_to: CartResponse) {
        info!("Processing add_product request");
        let result = self.add_product(product_id).await;
        self.reply(Operation::Add, result, respond_to);
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_remove_product(&mut self, product_id: ProductId, respond_to: CartResponse) {
        info!("Processing remove_product request");
        let result = self.remove_product(product_id).await;
        self.reply(Operation::Remove, result, respond_to);
    }

    #[instrument(fields(product_id = update.product_id, amount = update.amount), skip(self, update, respond_to))]
    async fn handle_update_product_amount(&mut self, update: UpdateProductAmount, respond_to: CartResponse) {
        info!("Processing update_product_amount request");
        let result = self.update_product_amount(update).await;
        self.reply(Operation::UpdateAmount, result, respond_to);
    }

    async fn add_product(&mut self, product_id: ProductId) -> Result<Vec<Product>, CartError> {
        let stock = self.catalog.get_stock(product_id).await?;
        let held = self.cart.amount_of(product_id);
        let ceiling = self.policy.ceiling(held, stock.amount);
        let mut next = self.cart.clone();

        if held > 0 {
            let amount = next.increment(product_id, ceiling)?;
            debug!(amount, "Line item incremented");
        } else {
            // Stock is checked before metadata is fetched.
            check_ceiling(1, ceiling)?;
            let product = self.catalog.get_product(product_id).await?;
            info!(title = %product.title, "Product added to cart");
            next.insert(product, ceiling)?;
        }

        self.commit(next, Some((stock, 1))).await
    }

    async fn remove_product(&mut self, product_id: ProductId) -> Result<Vec<Product>, CartError> {
        let mut next = self.cart.clone();
        let removed = next.remove(product_id)?;

        let stock_write = match self.policy {
            StockPolicy::Reserve => Some((self.catalog.get_stock(product_id).await?, -i64::from(removed.amount))),
            StockPolicy::Ceiling => None,
        };

        info!(amount = removed.amount, "Line item removed");
        self.commit(next, stock_write).await
    }

    async fn update_product_amount(&mut self, update: UpdateProductAmount) -> Result<Vec<Product>, CartError> {
        let UpdateProductAmount { product_id, amount } = update;
        if amount <= 0 {
            return Err(CartError::InvalidAmount(amount));
        }
        let held = match self.cart.get(product_id) {
            Some(item) => item.amount,
            None => return Err(CartError::NotFound(product_id)),
        };

        let stock = self.catalog.get_stock(product_id).await?;
        let ceiling = self.policy.ceiling(held, stock.amount);
        let mut next = self.cart.clone();
        let previous = next.set_amount(product_id, amount, ceiling)?;
        debug!(previous, "Line item amount set");

        self.commit(next, Some((stock, amount - i64::from(previous)))).await
    }

    /// Writes the stock level back to the catalog when the policy asks for it.
    async fn write_back_stock(&self, stock: Stock, delta: i64) -> Result<(), CartError> {
        if let Some(updated) = self.policy.write_back(stock, delta) {
            debug!(product_id = updated.id, amount = updated.amount, "Writing back stock level");
            self.catalog.put_stock(updated).await?;
        }
        Ok(())
    }

    /// Persists `next`, then writes back stock, then makes `next` current.
    ///
    /// A failed stock write puts the previous snapshot back, so neither the
    /// cart nor the catalog stock moves.
    async fn commit(&mut self, next: Cart, stock_write: Option<(Stock, i64)>) -> Result<Vec<Product>, CartError> {
        self.snapshot.save(&next).await?;

        if let Some((stock, delta)) = stock_write {
            if let Err(e) = self.write_back_stock(stock, delta).await {
                if let Err(restore) = self.snapshot.save(&self.cart).await {
                    warn!(error = %restore, "Failed to restore cart snapshot after stock write failure");
                }
                return Err(e);
            }
        }

        self.cart = next;
        Ok(self.cart.items().to_vec())
    }

    fn reply(&self, operation: Operation, result: Result<Vec<Product>, CartError>, respond_to: CartResponse) {
        match &result {
            Ok(items) => info!(items = items.len(), "Cart updated"),
            Err(e) => {
                error!(error = %e, ?operation, "Cart operation failed");
                self.notifier.notify(e.notification(operation));
            }
        }
        let _ = respond_to.send(result);
    }
}

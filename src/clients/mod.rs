use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};
use crate::domain::{Product, ProductId, UpdateProductAmount};
use crate::error::CartError;
use crate::messages::CartRequest;

// =============================================================================
// Client method macro
// =============================================================================

/// Generate client methods with oneshot channel boilerplate and automatic tracing.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| <$error_type>::ServiceCommunication("Service closed".to_string()))?;

                response.await.map_err(|_| <$error_type>::ServiceCommunication("Service dropped".to_string()))?
            }
        }
    };
}

// =============================================================================
// Cart Client
// =============================================================================

/// Handle to the cart service, passed to every UI component that reads or
/// mutates the cart. Mutations return the cart as it is after the change.
#[derive(Clone, Debug)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    /// Number of distinct line items.
    pub async fn cart_size(&self) -> Result<usize, CartError> {
        Ok(self.get_cart().await?.len())
    }

    /// Sum of `price * amount` over the cart.
    pub async fn total(&self) -> Result<Decimal, CartError> {
        Ok(Product::total_of(&self.get_cart().await?))
    }

    /// Asks the service to stop after the requests already queued.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending shutdown");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|_| CartError::ServiceCommunication("Service closed".to_string()))
    }
}

client_method!(CartClient => fn add_product(product_id: ProductId) -> Vec<Product> as CartRequest::AddProduct, Error = CartError);
client_method!(CartClient => fn remove_product(product_id: ProductId) -> Vec<Product> as CartRequest::RemoveProduct, Error = CartError);
client_method!(CartClient => fn update_product_amount(update: UpdateProductAmount) -> Vec<Product> as CartRequest::UpdateProductAmount, Error = CartError);
client_method!(CartClient => fn get_cart() -> Vec<Product> as CartRequest::GetCart, Error = CartError);

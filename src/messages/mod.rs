use tokio::sync::oneshot;
use crate::domain::{Product, ProductId, UpdateProductAmount};
use crate::error::CartError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Reply carrying the cart state after the request was applied.
pub type CartResponse = ServiceResponse<Vec<Product>, CartError>;

/// Typed messages for the cart service. Each variant includes parameters
/// and a oneshot channel for the response.
#[derive(Debug)]
pub enum CartRequest {
    AddProduct {
        product_id: ProductId,
        respond_to: CartResponse,
    },
    RemoveProduct {
        product_id: ProductId,
        respond_to: CartResponse,
    },
    UpdateProductAmount {
        update: UpdateProductAmount,
        respond_to: CartResponse,
    },
    GetCart {
        respond_to: CartResponse,
    },
    Shutdown,
}

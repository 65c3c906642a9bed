use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{is_valid_price, CatalogProduct, Product, ProductId};
use crate::error::CartError;

/// Payload for setting the quantity of a line item.
///
/// `amount` is signed so that non-positive requests coming from the UI can be
/// represented and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Ordered collection of line items, at most one per product id, none with a
/// zero amount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from untrusted line items, e.g. a persisted snapshot.
    ///
    /// # Errors
    /// Returns a description of the first duplicate id, zero amount or
    /// out-of-range price found.
    pub fn from_items(items: Vec<Product>) -> Result<Self, String> {
        let mut seen = HashSet::new();
        for item in &items {
            if item.amount == 0 {
                return Err(format!("Line item {} has a zero amount", item.id));
            }
            if !is_valid_price(item.price) {
                return Err(format!("Line item {} has an invalid price {}", item.id, item.price));
            }
            if !seen.insert(item.id) {
                return Err(format!("Duplicate line item for product {}", item.id));
            }
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Product> {
        self.items
    }

    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.items.iter().find(|item| item.id == product_id)
    }

    /// Quantity held for a product, zero when absent.
    pub fn amount_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |item| item.amount)
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> Decimal {
        Product::total_of(&self.items)
    }

    /// Adds one unit of an existing line item.
    ///
    /// # Errors
    /// `NotFound` if the product is not in the cart, `OutOfStock` if the new
    /// amount would exceed `ceiling`.
    pub fn increment(&mut self, product_id: ProductId, ceiling: u32) -> Result<u32, CartError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == product_id)
            .ok_or(CartError::NotFound(product_id))?;

        let requested = u64::from(item.amount) + 1;
        check_ceiling(requested, ceiling)?;
        item.amount += 1;
        Ok(item.amount)
    }

    /// Appends a new line item with amount 1.
    ///
    /// # Errors
    /// `OutOfStock` if `ceiling` is zero, `AlreadyInCart` if the product is
    /// already held (use [`Cart::increment`] for those), `InvalidPrice` if the
    /// catalog price is negative or above [`MAX_UNIT_PRICE`](super::MAX_UNIT_PRICE).
    pub fn insert(&mut self, product: CatalogProduct, ceiling: u32) -> Result<(), CartError> {
        check_ceiling(1, ceiling)?;
        if !is_valid_price(product.price) {
            return Err(CartError::InvalidPrice(product.id));
        }
        if self.get(product.id).is_some() {
            return Err(CartError::AlreadyInCart(product.id));
        }
        self.items.push(Product::from_catalog(product, 1));
        Ok(())
    }

    /// Deletes the line item for a product and returns it.
    ///
    /// # Errors
    /// `NotFound` if the product is not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> Result<Product, CartError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == product_id)
            .ok_or(CartError::NotFound(product_id))?;
        Ok(self.items.remove(index))
    }

    /// Replaces the amount of an existing line item and returns the previous one.
    ///
    /// # Errors
    /// `InvalidAmount` for `amount <= 0`, `NotFound` if the product is not in
    /// the cart, `OutOfStock` if `amount` exceeds `ceiling`.
    pub fn set_amount(&mut self, product_id: ProductId, amount: i64, ceiling: u32) -> Result<u32, CartError> {
        if amount <= 0 {
            return Err(CartError::InvalidAmount(amount));
        }
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == product_id)
            .ok_or(CartError::NotFound(product_id))?;

        check_ceiling(amount as u64, ceiling)?;
        let previous = item.amount;
        item.amount = amount as u32;
        Ok(previous)
    }
}

/// Fails with `OutOfStock` when `requested` is above `ceiling`.
pub fn check_ceiling(requested: u64, ceiling: u32) -> Result<(), CartError> {
    if requested > u64::from(ceiling) {
        return Err(CartError::OutOfStock {
            requested,
            available: ceiling,
        });
    }
    Ok(())
}

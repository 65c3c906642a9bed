use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

/// Catalog identifier of a product.
pub type ProductId = u64;

/// Highest unit price accepted from the catalog or a snapshot.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// A line item held in the cart.
///
/// Everything except `amount` is copied from the catalog when the item is first
/// added and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: Url,
    pub amount: u32,
}

/// Product metadata as served by `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: Url,
}

impl Product {
    /// Builds a line item from catalog metadata.
    ///
    /// # Arguments
    /// * `product` - Metadata fetched from the catalog
    /// * `amount` - Quantity held in the cart
    pub fn from_catalog(product: CatalogProduct, amount: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount,
        }
    }

    /// Unit price times the quantity held, saturating at `Decimal::MAX`.
    pub fn subtotal(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.amount))
    }

    /// Sum of subtotals, saturating at `Decimal::MAX`.
    pub fn total_of(items: &[Product]) -> Decimal {
        items
            .iter()
            .map(Product::subtotal)
            .fold(Decimal::ZERO, |total, subtotal| total.saturating_add(subtotal))
    }
}

/// Whether `price` lies in `0..=MAX_UNIT_PRICE`.
pub fn is_valid_price(price: Decimal) -> bool {
    !price.is_sign_negative() && price <= MAX_UNIT_PRICE
}

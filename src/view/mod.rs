//! Cart table view-model and its per-row controls.
//!
//! Rendering is left to the caller; this module decides what each row shows
//! and which cart operation each control triggers.

use rust_decimal::Decimal;
use url::Url;

use crate::clients::CartClient;
use crate::domain::{Product, ProductId, UpdateProductAmount};
use crate::error::CartError;

/// One row of the cart table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRow {
    pub id: ProductId,
    pub title: String,
    pub image: Url,
    pub price: String,
    pub amount: u32,
    pub subtotal: String,
    /// Decrement never takes an item below one; removal is a separate control.
    pub decrement_enabled: bool,
}

impl From<&Product> for CartRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            image: product.image.clone(),
            price: format_price(product.price),
            amount: product.amount,
            subtotal: format_price(product.subtotal()),
            decrement_enabled: product.amount > 1,
        }
    }
}

/// Cart page state: the last cart returned by the service, refreshed after
/// every control action.
#[derive(Debug, Clone)]
pub struct CartView {
    client: CartClient,
    items: Vec<Product>,
}

impl CartView {
    pub async fn load(client: CartClient) -> Result<Self, CartError> {
        let items = client.get_cart().await?;
        Ok(Self { client, items })
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn rows(&self) -> Vec<CartRow> {
        self.items.iter().map(CartRow::from).collect()
    }

    /// Number of distinct products, as shown in the header badge.
    pub fn cart_size(&self) -> usize {
        self.items.len()
    }

    pub fn total(&self) -> Decimal {
        Product::total_of(&self.items)
    }

    pub fn total_formatted(&self) -> String {
        format_price(self.total())
    }

    pub async fn increment(&mut self, product_id: ProductId) -> Result<(), CartError> {
        self.items = self.client.add_product(product_id).await?;
        Ok(())
    }

    /// Lowers the amount by one. Does nothing for items at one or not shown.
    pub async fn decrement(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let Some(current) = self.items.iter().find(|item| item.id == product_id).map(|item| item.amount) else {
            return Ok(());
        };
        if current <= 1 {
            return Ok(());
        }
        self.set_amount(product_id, i64::from(current) - 1).await
    }

    pub async fn set_amount(&mut self, product_id: ProductId, amount: i64) -> Result<(), CartError> {
        self.items = self
            .client
            .update_product_amount(UpdateProductAmount { product_id, amount })
            .await?;
        Ok(())
    }

    pub async fn remove(&mut self, product_id: ProductId) -> Result<(), CartError> {
        self.items = self.client.remove_product(product_id).await?;
        Ok(())
    }

    pub async fn refresh(&mut self) -> Result<(), CartError> {
        self.items = self.client.get_cart().await?;
        Ok(())
    }
}

/// Formats a price as Brazilian reais, e.g. `R$ 1.234,56`.
pub fn format_price(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}R$ {},{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_framework::{create_mock_client, expect_get_cart, expect_remove, expect_update, sample_product};

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Decimal::new(1799, 1)), "R$ 179,90");
        assert_eq!(format_price(Decimal::new(123456, 2)), "R$ 1.234,56");
        assert_eq!(format_price(Decimal::new(100000000, 2)), "R$ 1.000.000,00");
        assert_eq!(format_price(Decimal::ZERO), "R$ 0,00");
        assert_eq!(format_price(Decimal::new(-5, 1)), "-R$ 0,50");
        assert_eq!(format_price(Decimal::new(99999, 3)), "R$ 100,00");
    }

    #[test]
    fn test_rows_disable_decrement_at_one() {
        let row = CartRow::from(&sample_product(1, 1));
        assert!(!row.decrement_enabled);

        let row = CartRow::from(&sample_product(2, 3));
        assert!(row.decrement_enabled);
        assert_eq!(row.price, "R$ 179,90");
        assert_eq!(row.subtotal, "R$ 539,70");
    }

    #[tokio::test]
    async fn test_load_and_total() {
        let (client, mut receiver) = create_mock_client(10);

        let load = tokio::spawn(CartView::load(client));
        let responder = expect_get_cart(&mut receiver).await.expect("Expected GetCart request");
        responder.send(Ok(vec![sample_product(1, 2), sample_product(2, 1)])).unwrap();

        let view = load.await.unwrap().unwrap();
        assert_eq!(view.cart_size(), 2);
        assert_eq!(view.total_formatted(), "R$ 539,70");
    }

    #[tokio::test]
    async fn test_decrement_sends_amount_minus_one() {
        let (client, mut receiver) = create_mock_client(10);
        let mut view = CartView {
            client,
            items: vec![sample_product(1, 3)],
        };

        let task = tokio::spawn(async move {
            view.decrement(1).await.map(|_| view)
        });

        let (update, responder) = expect_update(&mut receiver).await.expect("Expected UpdateProductAmount request");
        assert_eq!(update, UpdateProductAmount { product_id: 1, amount: 2 });
        responder.send(Ok(vec![sample_product(1, 2)])).unwrap();

        let view = task.await.unwrap().unwrap();
        assert_eq!(view.items()[0].amount, 2);
    }

    #[tokio::test]
    async fn test_decrement_at_one_sends_nothing() {
        let (client, mut receiver) = create_mock_client(10);
        let mut view = CartView {
            client,
            items: vec![sample_product(1, 1)],
        };

        view.decrement(1).await.unwrap();
        view.decrement(99).await.unwrap();

        drop(view);
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_remove_failure_keeps_rows() {
        let (client, mut receiver) = create_mock_client(10);
        let mut view = CartView {
            client,
            items: vec![sample_product(1, 2)],
        };

        let task = tokio::spawn(async move {
            let result = view.remove(1).await;
            (result, view)
        });

        let (product_id, responder) = expect_remove(&mut receiver).await.expect("Expected RemoveProduct request");
        assert_eq!(product_id, 1);
        responder.send(Err(CartError::NotFound(1))).unwrap();

        let (result, view) = task.await.unwrap();
        assert_eq!(result, Err(CartError::NotFound(1)));
        assert_eq!(view.rows().len(), 1);
    }
}

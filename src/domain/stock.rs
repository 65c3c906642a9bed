use serde::{Deserialize, Serialize};
use super::ProductId;

/// Units available for a product, as served by `GET /stock/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

/// How the cart treats the server-side stock level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockPolicy {
    /// Stock is only read, as an upper bound on the quantity in the cart.
    #[default]
    Ceiling,
    /// Stock is written back so that it excludes what the cart holds.
    Reserve,
}

impl StockPolicy {
    /// Largest quantity the cart may hold for a product.
    ///
    /// # Arguments
    /// * `held` - Quantity currently in the cart
    /// * `available` - Stock level reported by the catalog
    ///
    /// Under `Reserve` the reported stock already excludes `held`.
    pub fn ceiling(self, held: u32, available: u32) -> u32 {
        match self {
            StockPolicy::Ceiling => available,
            StockPolicy::Reserve => held.saturating_add(available),
        }
    }

    /// Stock level to write back after the cart quantity changed by `delta`,
    /// or `None` when nothing should be written.
    pub fn write_back(self, stock: Stock, delta: i64) -> Option<Stock> {
        match self {
            StockPolicy::Ceiling => None,
            StockPolicy::Reserve if delta == 0 => None,
            StockPolicy::Reserve => {
                let remaining = (i64::from(stock.amount) - delta).clamp(0, i64::from(u32::MAX));
                Some(Stock {
                    id: stock.id,
                    amount: remaining as u32,
                })
            }
        }
    }
}

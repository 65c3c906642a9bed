use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::CatalogApi;
use crate::domain::{CatalogProduct, ProductId, Stock};
use crate::error::CatalogError;

/// HTTP client for the REST inventory service.
///
/// Endpoints are resolved against `base_url`:
/// - `GET {base_url}/products/{id}`
/// - `GET {base_url}/stock/{id}`
/// - `PUT {base_url}/stock/{id}`
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    /// Create a new catalog client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the inventory service (e.g., "http://localhost:3333")
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, resource: &str, id: ProductId) -> String {
        format!("{}/{}/{}", self.base_url, resource, id)
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str, id: ProductId) -> Result<T, CatalogError> {
        let url = self.url(resource, id);
        debug!(%url, "Sending GET request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        check_status(response, &url)
            .await?
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

async fn check_status(response: Response, url: &str) -> Result<Response, CatalogError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(CatalogError::NotFound(url.to_string()));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::Service(format!("{} returned {}: {}", url, status, body)));
    }
    Ok(response)
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    #[instrument(skip(self))]
    async fn get_product(&self, id: ProductId) -> Result<CatalogProduct, CatalogError> {
        self.get_json("products", id).await
    }

    #[instrument(skip(self))]
    async fn get_stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.get_json("stock", id).await
    }

    #[instrument(skip(self), fields(product_id = stock.id, amount = stock.amount))]
    async fn put_stock(&self, stock: Stock) -> Result<(), CatalogError> {
        let url = self.url("stock", stock.id);
        debug!(%url, "Sending PUT request");

        let response = self
            .client
            .put(&url)
            .json(&stock)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        check_status(response, &url).await?;
        Ok(())
    }
}

use reqwest::Client;
use shared::{
    domain::{Product, ProductId},
    protocol::CreateProductRequest,
};
use thiserror::Error;
use tracing::debug;

pub mod state;

pub use state::{CatalogOp, CatalogPhase, CatalogState, OperationError, ProductDraft};

/// Failures from the remote catalog service, one variant per operation so
/// callers can surface them independently.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to load product list: {0}")]
    Load(#[source] reqwest::Error),
    #[error("failed to delete product {id}: {source}")]
    Delete {
        id: ProductId,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to save product {id}: {source}")]
    Save {
        id: ProductId,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to create product: {0}")]
    Create(#[source] reqwest::Error),
    #[error("failed to fetch image {url}: {source}")]
    ImageFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// HTTP client for the product catalog REST service.
pub struct CatalogApi {
    http: Client,
    base_url: String,
}

impl CatalogApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn products_url(&self) -> String {
        format!("{}/produtos", self.base_url)
    }

    fn product_url(&self, id: ProductId) -> String {
        format!("{}/produtos/{}", self.base_url, id.0)
    }

    /// Fetch the full record set. Issued once at startup; the caller keeps
    /// the in-memory mirror current afterwards.
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .http
            .get(self.products_url())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(CatalogError::Load)?;
        let products: Vec<Product> = response.json().await.map_err(CatalogError::Load)?;
        debug!(count = products.len(), "catalog: product list fetched");
        Ok(products)
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        self.http
            .delete(self.product_url(id))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| CatalogError::Delete { id, source })?;
        debug!(product_id = id.0, "catalog: product deleted");
        Ok(())
    }

    /// Update a record with the full draft payload. Returns the server's
    /// representation, which may differ from the submitted one.
    pub async fn update_product(&self, product: &Product) -> Result<Product, CatalogError> {
        let id = product.id;
        let response = self
            .http
            .put(self.product_url(id))
            .json(product)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| CatalogError::Save { id, source })?;
        let updated: Product = response
            .json()
            .await
            .map_err(|source| CatalogError::Save { id, source })?;
        debug!(product_id = id.0, "catalog: product updated");
        Ok(updated)
    }

    pub async fn create_product(
        &self,
        request: &CreateProductRequest,
    ) -> Result<Product, CatalogError> {
        let response = self
            .http
            .post(self.products_url())
            .json(request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(CatalogError::Create)?;
        let created: Product = response.json().await.map_err(CatalogError::Create)?;
        debug!(product_id = created.id.0, "catalog: product created");
        Ok(created)
    }

    /// Download raw image bytes for a product card preview.
    pub async fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| CatalogError::ImageFetch {
                url: url.to_string(),
                source,
            })?;
        let bytes = response.bytes().await.map_err(|source| CatalogError::ImageFetch {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests;

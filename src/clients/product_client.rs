use tracing::{debug, info, instrument, warn};
use crate::actor_framework::ResourceClient;
use crate::config::PaginationConfig;
use crate::domain::{Category, Product, ProductCreate, ProductId, ProductPatch, ProductSnapshot};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use crate::query::{paginate, Page, PageRequest};

/// Catalog listing filter.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<Category>,
    /// Case-insensitive substring of the name or description.
    pub search: Option<String>,
    pub page: PageRequest,
}

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
    pagination: PaginationConfig,
}

impl_client_methods!(ProductClient, Product, ProductError, product);

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", result))
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>, pagination: PaginationConfig) -> Self {
        Self { inner, pagination }
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        let id = self.inner.create(product).await.map_err(ProductError::from)?;
        info!(product_id = %id, "Product created");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(ProductError::from)
    }

    /// Every product, unsorted.
    #[instrument(skip(self))]
    pub async fn all_products(&self) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        self.inner.list().await.map_err(ProductError::from)
    }

    /// Filtered catalog page, newest first.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ProductQuery) -> Result<Page<Product>, ProductError> {
        let search = query.search.as_deref().map(str::trim).filter(|term| !term.is_empty());
        let mut products: Vec<Product> = self
            .all_products()
            .await?
            .into_iter()
            .filter(|product| query.category.map_or(true, |category| product.category == category))
            .filter(|product| search.map_or(true, |term| product.matches_search(term)))
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(products, query.page, &self.pagination))
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Takes `quantity` out of stock and returns the product as it was at
    /// that moment, with the stock left over.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: ProductId, quantity: u32) -> Result<(ProductSnapshot, u32), ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReserveStock(quantity)).await {
            Ok(ProductActionResult::ReserveStock { snapshot, remaining }) => {
                debug!(remaining, "Stock reserved");
                Ok((snapshot, remaining))
            }
            Ok(other) => Err(unexpected(other)),
            Err(e) => {
                let err = ProductError::from(e);
                warn!(error = %err, "Stock reservation refused");
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn restore_stock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::RestoreStock(quantity)).await? {
            ProductActionResult::RestoreStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }
}

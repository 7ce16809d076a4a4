//! HTTP catalog API.

use crate::catalog::{Category, CategoryDraft, Product, ProductDraft};
use crate::client::ApiClient;
use crate::identity::TokenSource;
use crate::ids::{CategoryId, ProductId};
use crate::page::Paged;
use shopkit_data::{ClientRequestBuilder, FetchClient, FetchError};
use std::str::FromStr;
use std::sync::Arc;

const PRODUCTS_PATH: &str = "/products";
const CATEGORIES_PATH: &str = "/categories";

/// Listing order for [`ProductApi::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl ProductSort {
    /// The backend's `sort` parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            ProductSort::Newest => "createdAt,desc",
            ProductSort::PriceAsc => "price,asc",
            ProductSort::PriceDesc => "price,desc",
        }
    }
}

/// Error parsing a [`ProductSort`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort order: {0} (expected newest, price-asc or price-desc)")]
pub struct UnknownSort(pub String);

impl FromStr for ProductSort {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(ProductSort::Newest),
            "price-asc" | "price_asc" => Ok(ProductSort::PriceAsc),
            "price-desc" | "price_desc" => Ok(ProductSort::PriceDesc),
            _ => Err(UnknownSort(s.to_string())),
        }
    }
}

/// Filters for [`ProductApi::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: u32,
    pub size: u32,
    pub sort: ProductSort,
    /// Category name; `"all"` is the same as no filter.
    pub category: Option<String>,
    /// Name search.
    pub name: Option<String>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort: ProductSort::default(),
            category: None,
            name: None,
        }
    }
}

impl ProductQuery {
    fn apply(&self, mut builder: ClientRequestBuilder) -> ClientRequestBuilder {
        builder = builder
            .query("page", self.page)
            .query("size", self.size)
            .query("sort", self.sort.as_param());
        if let Some(category) = self.category.as_deref().filter(|c| *c != "all") {
            builder = builder.query("category", category);
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            builder = builder.query("name", name);
        }
        builder
    }
}

/// Client for the `/products` resource.
///
/// Reads are public; `create`, `update`, `delete` and `low_stock` need an
/// admin token.
#[derive(Clone)]
pub struct ProductApi {
    client: ApiClient,
}

impl ProductApi {
    pub fn new(client: FetchClient) -> Self {
        Self {
            client: ApiClient::new(client),
        }
    }

    /// Attach a bearer token source to every call.
    pub fn with_token_source(mut self, token: Arc<dyn TokenSource>) -> Self {
        self.client = self.client.with_token_source(token);
        self
    }

    /// `GET /products`, unpaged.
    pub async fn all(&self) -> Result<Vec<Product>, FetchError> {
        self.client.get(PRODUCTS_PATH).send_json().await
    }

    /// `GET /products?page=&size=&sort=&category=&name=`.
    pub async fn list(&self, query: &ProductQuery) -> Result<Paged<Product>, FetchError> {
        query.apply(self.client.get(PRODUCTS_PATH)).send_json().await
    }

    /// `GET /products/{id}`.
    pub async fn get(&self, id: &ProductId) -> Result<Product, FetchError> {
        self.client
            .get(format!("{PRODUCTS_PATH}/{id}"))
            .send_json()
            .await
    }

    /// `GET /products/category/{name}`.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Product>, FetchError> {
        self.client
            .get(format!("{PRODUCTS_PATH}/category/{category}"))
            .send_json()
            .await
    }

    /// `GET /products/low-stock?threshold=`.
    pub async fn low_stock(&self, threshold: i64) -> Result<Vec<Product>, FetchError> {
        self.client
            .get(format!("{PRODUCTS_PATH}/low-stock"))
            .query("threshold", threshold)
            .send_json()
            .await
    }

    /// `POST /products`.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, FetchError> {
        let product: Product = self
            .client
            .post(PRODUCTS_PATH)
            .json(draft)?
            .send_json()
            .await?;
        tracing::debug!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// `PUT /products/{id}`.
    pub async fn update(&self, id: &ProductId, draft: &ProductDraft) -> Result<Product, FetchError> {
        self.client
            .put(format!("{PRODUCTS_PATH}/{id}"))
            .json(draft)?
            .send_json()
            .await
    }

    /// `DELETE /products/{id}`.
    pub async fn delete(&self, id: &ProductId) -> Result<(), FetchError> {
        self.client
            .delete(format!("{PRODUCTS_PATH}/{id}"))
            .send_empty()
            .await?;
        tracing::debug!(product_id = %id, "Product deleted");
        Ok(())
    }
}

/// Client for the `/categories` resource.
#[derive(Clone)]
pub struct CategoryApi {
    client: ApiClient,
}

impl CategoryApi {
    pub fn new(client: FetchClient) -> Self {
        Self {
            client: ApiClient::new(client),
        }
    }

    pub fn with_token_source(mut self, token: Arc<dyn TokenSource>) -> Self {
        self.client = self.client.with_token_source(token);
        self
    }

    pub async fn all(&self) -> Result<Vec<Category>, FetchError> {
        self.client.get(CATEGORIES_PATH).send_json().await
    }

    pub async fn get(&self, id: &CategoryId) -> Result<Category, FetchError> {
        self.client
            .get(format!("{CATEGORIES_PATH}/{id}"))
            .send_json()
            .await
    }

    pub async fn create(&self, draft: &CategoryDraft) -> Result<Category, FetchError> {
        self.client
            .post(CATEGORIES_PATH)
            .json(draft)?
            .send_json()
            .await
    }

    pub async fn update(
        &self,
        id: &CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, FetchError> {
        self.client
            .put(format!("{CATEGORIES_PATH}/{id}"))
            .json(draft)?
            .send_json()
            .await
    }

    pub async fn delete(&self, id: &CategoryId) -> Result<(), FetchError> {
        self.client
            .delete(format!("{CATEGORIES_PATH}/{id}"))
            .send_empty()
            .await
    }
}

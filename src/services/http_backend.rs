//! HTTP Backend
//!
//! reqwest client for the product REST API. Only list and search bodies are
//! parsed; mutations observe the HTTP status alone.

use reqwest::{Client, Response};
use snafu::ResultExt;
use tracing::debug;

use crate::constants::{
    CREATE_PRODUCT_PATH, DELETE_PRODUCT_PATH, LIST_PRODUCTS_PATH, SEARCH_PRODUCTS_PATH,
    UPDATE_PRODUCT_PATH,
};
use crate::domain::config::BackendConfig;
use crate::domain::product::{Page, PageResponse, ProductDraft, ProductId};
use crate::domain::query::ProductRequest;
use crate::error::{DecodeSnafu, NetworkSnafu, Result, ServerSnafu};

use super::ProductBackend;

/// REST backend
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend for the configured base URL
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = config.url()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context(NetworkSnafu {
                endpoint: base_url.as_str(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Absolute URL for an endpoint path
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Fail on anything but 2xx
fn check_status(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        ServerSnafu {
            endpoint,
            status: status.as_u16(),
        }
        .fail()
    }
}

impl ProductBackend for HttpBackend {
    async fn fetch_page(&self, request: &ProductRequest) -> Result<Page> {
        let (path, params) = match request {
            ProductRequest::List {
                page_size,
                page_number,
            } => (
                LIST_PRODUCTS_PATH,
                vec![
                    ("pageSize", page_size.to_string()),
                    ("pageNumber", page_number.to_string()),
                ],
            ),
            ProductRequest::Search {
                name,
                page_size,
                page_number,
            } => (
                SEARCH_PRODUCTS_PATH,
                vec![
                    ("name", name.clone()),
                    ("pageSize", page_size.to_string()),
                    ("pageNumber", page_number.to_string()),
                ],
            ),
        };

        debug!(endpoint = path, ?params, "Fetching products");

        let response = self
            .client
            .get(self.endpoint(path))
            .query(&params)
            .send()
            .await
            .context(NetworkSnafu { endpoint: path })?;
        let response = check_status(path, response)?;
        let body = response
            .bytes()
            .await
            .context(NetworkSnafu { endpoint: path })?;

        let parsed: PageResponse = serde_json::from_slice(&body).map_err(|e| {
            DecodeSnafu {
                endpoint: path,
                message: e.to_string(),
            }
            .build()
        })?;

        Ok(parsed.into_page(request.page_number(), request.page_size()))
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<()> {
        debug!(name = %draft.name, "Creating product");
        let response = self
            .client
            .post(self.endpoint(CREATE_PRODUCT_PATH))
            .json(draft)
            .send()
            .await
            .context(NetworkSnafu {
                endpoint: CREATE_PRODUCT_PATH,
            })?;
        check_status(CREATE_PRODUCT_PATH, response)?;
        Ok(())
    }

    async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> Result<()> {
        debug!(%id, "Updating product");
        let response = self
            .client
            .put(self.endpoint(UPDATE_PRODUCT_PATH))
            .query(&[("id", id.to_string())])
            .json(draft)
            .send()
            .await
            .context(NetworkSnafu {
                endpoint: UPDATE_PRODUCT_PATH,
            })?;
        check_status(UPDATE_PRODUCT_PATH, response)?;
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<()> {
        debug!(%id, "Deleting product");
        let response = self
            .client
            .delete(self.endpoint(DELETE_PRODUCT_PATH))
            .query(&[("id", id.to_string())])
            .send()
            .await
            .context(NetworkSnafu {
                endpoint: DELETE_PRODUCT_PATH,
            })?;
        check_status(DELETE_PRODUCT_PATH, response)?;
        Ok(())
    }
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .finish()
    }
}

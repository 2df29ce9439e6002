//! Product Backend
//!
//! The seam between the catalog state and whatever serves product data.
//! [`HttpBackend`](super::HttpBackend) talks to the REST API; tests plug in
//! scripted doubles.

use std::future::Future;
use std::sync::Arc;

use crate::domain::product::{Page, ProductDraft, ProductId};
use crate::domain::query::ProductRequest;
use crate::error::Result;

/// Backend operations consumed by the catalog
pub trait ProductBackend: Send + Sync + 'static {
    /// Fetch one page of products for a list or search request
    fn fetch_page(&self, request: &ProductRequest) -> impl Future<Output = Result<Page>> + Send;

    /// Create a product; the backend assigns the id
    fn create_product(&self, draft: &ProductDraft) -> impl Future<Output = Result<()>> + Send;

    /// Replace an existing product
    fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Remove a product
    fn delete_product(&self, id: &ProductId) -> impl Future<Output = Result<()>> + Send;
}

impl<B: ProductBackend> ProductBackend for Arc<B> {
    fn fetch_page(&self, request: &ProductRequest) -> impl Future<Output = Result<Page>> + Send {
        (**self).fetch_page(request)
    }

    fn create_product(&self, draft: &ProductDraft) -> impl Future<Output = Result<()>> + Send {
        (**self).create_product(draft)
    }

    fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).update_product(id, draft)
    }

    fn delete_product(&self, id: &ProductId) -> impl Future<Output = Result<()>> + Send {
        (**self).delete_product(id)
    }
}

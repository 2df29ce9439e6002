//! Product - Catalog Records and Pages

use serde::{Deserialize, Serialize};

/// Backend-assigned product identifier
///
/// The client never mints ids. Backends hand out either integers or strings,
/// and the id is echoed back verbatim in id-scoped endpoints.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl From<i64> for ProductId {
    fn from(n: i64) -> Self {
        ProductId::Number(n)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId::Text(s.to_string())
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        ProductId::Text(s)
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{n}"),
            ProductId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A product record as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
}

/// Body of create and update requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
}

/// List/search response body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub page_items: Vec<Product>,
    pub total_number_of_pages: u32,
}

/// One server-returned batch of products plus pagination metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Product>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl PageResponse {
    /// Attach the request coordinates the response was fetched for
    pub fn into_page(self, page_number: u32, page_size: u32) -> Page {
        Page {
            items: self.page_items,
            page_number,
            page_size,
            total_pages: self.total_number_of_pages,
        }
    }
}

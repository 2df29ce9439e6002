//! Catalog Constants
//!
//! Centralized defaults and backend endpoint paths.

/// Backend base URL used when no configuration overrides it
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Request timeout for backend calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Pagination defaults
pub const DEFAULT_PAGE_SIZE: u32 = 9;
pub const FIRST_PAGE: u32 = 1;

/// Default log filter directive
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "catalog.toml";

/// Log file prefix inside the data directory
pub const LOG_FILE_PREFIX: &str = "product-catalog.log";

/// Backend endpoints
pub const LIST_PRODUCTS_PATH: &str = "/Products/GetAllProducts";
pub const SEARCH_PRODUCTS_PATH: &str = "/Products/SearchProducts";
pub const CREATE_PRODUCT_PATH: &str = "/Products/CreateProduct";
pub const UPDATE_PRODUCT_PATH: &str = "/Products/UpdateProductById";
pub const DELETE_PRODUCT_PATH: &str = "/Products/DeleteProductById";

/// Store-level error messages shown to the user
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch products";
pub const ADD_FAILED_MESSAGE: &str = "Failed to add product";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update product";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete product";
